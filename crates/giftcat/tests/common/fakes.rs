//! Scripted stand-ins for the coordinator's injected collaborators.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use giftcat::catalog::ContentItem;
use giftcat::polling::{Destination, Navigator, Notice, Notifier, Sleeper};
use giftcat::{
    CatalogContentRecord, CatalogId, ContentReader, DraftStore, FetchError, MemoryDraftStore,
    PollingCoordinator, StatusReader, StatusRecord, StoreError,
};

/// One scripted answer from the status endpoint.
#[derive(Debug, Clone)]
pub enum StatusStep {
    Slots([&'static str; 3]),
    Unavailable,
}

/// Replays a status script, repeating the last step once exhausted.
pub struct ScriptedStatusReader {
    steps: Mutex<VecDeque<StatusStep>>,
    last: Mutex<StatusStep>,
    calls: AtomicUsize,
}

impl ScriptedStatusReader {
    pub fn new(steps: Vec<StatusStep>) -> Self {
        let last = steps.last().cloned().unwrap_or(StatusStep::Unavailable);
        Self {
            steps: Mutex::new(steps.into()),
            last: Mutex::new(last),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(slots: [&'static str; 3]) -> Self {
        Self::new(vec![StatusStep::Slots(slots)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusReader for ScriptedStatusReader {
    async fn read_status(&self, catalog_id: &CatalogId) -> Result<StatusRecord, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.lock().unwrap().clone());

        match step {
            StatusStep::Slots(slots) => Ok(StatusRecord::new(
                catalog_id.clone(),
                0,
                slots.map(str::to_string),
            )),
            StatusStep::Unavailable => Err(FetchError::Unsuccessful {
                reason: "scripted miss".to_string(),
            }),
        }
    }
}

/// Returns the same content on every call, or fails every call.
pub struct FixedContentReader {
    items: Option<[ContentItem; 3]>,
    calls: AtomicUsize,
}

impl FixedContentReader {
    pub fn with_items(items: [ContentItem; 3]) -> Self {
        Self {
            items: Some(items),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            items: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentReader for FixedContentReader {
    async fn read_content(
        &self,
        catalog_id: &CatalogId,
    ) -> Result<CatalogContentRecord, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.items {
            Some(items) => Ok(CatalogContentRecord::new(catalog_id.clone(), items.clone())),
            None => Err(FetchError::Unsuccessful {
                reason: "scripted content failure".to_string(),
            }),
        }
    }
}

/// Records requested waits without sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Everything the user would have seen, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Notice(Notice),
    Navigate(Destination),
}

#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<Destination> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Navigate(d) => Some(d),
                HostEvent::Notice(_) => None,
            })
            .collect()
    }
}

impl Navigator for RecordingHost {
    fn navigate(&self, destination: &Destination) {
        self.events
            .lock()
            .unwrap()
            .push(HostEvent::Navigate(destination.clone()));
    }
}

impl Notifier for RecordingHost {
    fn notify(&self, notice: Notice) {
        self.events.lock().unwrap().push(HostEvent::Notice(notice));
    }
}

/// A store whose reads work but whose writes always fail.
#[derive(Default)]
pub struct ReadOnlyStore {
    inner: MemoryDraftStore,
}

impl ReadOnlyStore {
    pub fn seeded(entries: &[(&str, &str)]) -> Self {
        let store = Self::default();
        for (key, value) in entries {
            store.inner.set(key, value).unwrap();
        }
        store
    }
}

impl DraftStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::LockPoisoned)
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::LockPoisoned)
    }
}

pub fn item(title: &str, desc: &str, img: &str) -> ContentItem {
    ContentItem {
        title: title.to_string(),
        long_description: desc.to_string(),
        image_data: img.to_string(),
    }
}

/// A memory store seeded the way the item submitter leaves it.
pub fn seeded_store(catalog_id: &str, url_count: &str) -> Arc<MemoryDraftStore> {
    let store = Arc::new(MemoryDraftStore::new());
    store.set("catalogId", catalog_id).unwrap();
    store.set("urlCount", url_count).unwrap();
    store
}

/// Coordinator wiring with every collaborator kept for inspection.
pub struct Session {
    pub status: Arc<ScriptedStatusReader>,
    pub content: Arc<FixedContentReader>,
    pub sleeper: Arc<RecordingSleeper>,
    pub host: Arc<RecordingHost>,
    pub coordinator: PollingCoordinator,
}

impl Session {
    pub fn new(
        status: ScriptedStatusReader,
        content: FixedContentReader,
        store: Arc<dyn DraftStore>,
    ) -> Self {
        let status = Arc::new(status);
        let content = Arc::new(content);
        let sleeper = Arc::new(RecordingSleeper::default());
        let host = Arc::new(RecordingHost::default());
        let coordinator = PollingCoordinator::new(
            status.clone(),
            content.clone(),
            store,
            sleeper.clone(),
            host.clone(),
            host.clone(),
        );

        Self {
            status,
            content,
            sleeper,
            host,
            coordinator,
        }
    }
}
