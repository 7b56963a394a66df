//! Application state with change notification.

mod state;

pub use state::{AppState, LoadOutcome, LoadState, LoadTicket, StateChange, SubscriptionId};
