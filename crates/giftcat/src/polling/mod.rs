//! OGP status polling: a pure state machine plus the async driver that runs it.

mod coordinator;
mod host;
mod policy;
mod state;

pub use coordinator::{PollingCoordinator, SessionOutcome};
pub use host::{Destination, Navigator, Notice, Notifier, Sleeper, TokioSleeper};
pub use policy::PollPolicy;
pub use state::{
    transition, PollAction, PollEvent, PollState, TerminalReason, Transition, UnexpectedEvent,
};
