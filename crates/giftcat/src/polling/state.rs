//! Polling session state machine.
//!
//! `transition` is pure: it maps the current state and an observed event to the
//! next state and the single action the driver must perform next. Timers,
//! network and storage live entirely in the driver.
//!
//! ```text
//! Init ──Started──▶ Fetching(1) ──Incomplete/Unavailable──▶ Polling(1) ──WaitElapsed──▶ Fetching(2) …
//!   │                   │  └─(last attempt)──▶ Terminal(TimedOut)
//!   │                   └─Complete──▶ Completing ──DraftPersisted──▶ Terminal(Completed)
//!   │                                     └─ContentFailed──▶ Terminal(ContentUnavailable)
//!   └─PreconditionFailed──▶ Terminal(PreconditionFailed)
//! ```

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::catalog::CatalogId;

use super::host::{Destination, Notice};
use super::policy::PollPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Init,
    /// Waiting after attempt `attempt` before the next one.
    Polling { attempt: u32 },
    /// Status request for attempt `attempt` in flight.
    Fetching { attempt: u32 },
    /// Status complete; content fetch and draft write in flight.
    Completing,
    Terminal(TerminalReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    Completed,
    PreconditionFailed,
    ContentUnavailable,
    TimedOut,
}

impl TerminalReason {
    pub fn destination(&self, catalog_id: Option<&CatalogId>) -> Destination {
        match (self, catalog_id) {
            (TerminalReason::Completed, Some(id)) => Destination::Confirm {
                catalog_id: id.clone(),
            },
            (TerminalReason::Completed, None) | (TerminalReason::PreconditionFailed, _) => {
                Destination::Create
            }
            (TerminalReason::ContentUnavailable, _) | (TerminalReason::TimedOut, _) => {
                Destination::Select
            }
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        match self {
            TerminalReason::Completed => None,
            TerminalReason::PreconditionFailed => Some(Notice::SessionInvalid),
            TerminalReason::ContentUnavailable => Some(Notice::ContentFetchFailed),
            TerminalReason::TimedOut => Some(Notice::Timeout),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TerminalReason::Completed)
    }
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminalReason::Completed => "completed",
            TerminalReason::PreconditionFailed => "precondition_failed",
            TerminalReason::ContentUnavailable => "content_unavailable",
            TerminalReason::TimedOut => "timed_out",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvent {
    Started,
    PreconditionFailed,
    /// Status fetched and every expected item is done.
    StatusComplete,
    /// Status fetched but not complete yet.
    StatusIncomplete { done: usize, expected: usize },
    /// Status could not be read this attempt.
    StatusUnavailable,
    WaitElapsed,
    DraftPersisted,
    ContentFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    FetchStatus { attempt: u32 },
    Wait(Duration),
    FetchContent,
    Finish(TerminalReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: PollState,
    pub action: PollAction,
}

/// An event that cannot occur in the given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event {event:?} is not valid in state {state:?}")]
pub struct UnexpectedEvent {
    pub state: PollState,
    pub event: PollEvent,
}

fn to(next: PollState, action: PollAction) -> Transition {
    Transition { next, action }
}

fn finish(reason: TerminalReason) -> Transition {
    to(PollState::Terminal(reason), PollAction::Finish(reason))
}

pub fn transition(
    state: PollState,
    event: PollEvent,
    policy: &PollPolicy,
) -> Result<Transition, UnexpectedEvent> {
    use PollEvent as E;
    use PollState as S;

    let t = match (state, event) {
        (S::Init, E::Started) => to(
            S::Fetching { attempt: 1 },
            PollAction::FetchStatus { attempt: 1 },
        ),
        (S::Init, E::PreconditionFailed) => finish(TerminalReason::PreconditionFailed),

        (S::Fetching { .. }, E::StatusComplete) => to(S::Completing, PollAction::FetchContent),
        (S::Fetching { attempt }, E::StatusIncomplete { .. } | E::StatusUnavailable) => {
            if attempt < policy.max_attempts {
                to(S::Polling { attempt }, PollAction::Wait(policy.interval))
            } else {
                finish(TerminalReason::TimedOut)
            }
        }

        (S::Polling { attempt }, E::WaitElapsed) => {
            let next = attempt + 1;
            to(
                S::Fetching { attempt: next },
                PollAction::FetchStatus { attempt: next },
            )
        }

        (S::Completing, E::DraftPersisted) => finish(TerminalReason::Completed),
        (S::Completing, E::ContentFailed) => finish(TerminalReason::ContentUnavailable),

        (state, event) => return Err(UnexpectedEvent { state, event }),
    };

    Ok(t)
}
