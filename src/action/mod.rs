//! Action state wrapper around asynchronous calls.

pub mod notify;
pub mod runner;

pub use notify::{ChannelNotifier, Notifier};
pub use runner::{ActionState, ApiAction};
