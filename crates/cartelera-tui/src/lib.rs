//! Terminal movie browser for cartelera.
//!
//! The view owns a [`BrowserState`] and mutates it only on the event loop.
//! Network work is spawned through a [`Dispatcher`] whose outcomes come back
//! over a channel tagged with the ticket of the request that produced them.

mod browser;
/// Fetch dispatching.
pub mod dispatcher;
/// Key handling.
pub mod input;
/// Browser state and fetch messages.
pub mod state;
mod ui;

pub use browser::{apply_outcome, run_browser};
pub use dispatcher::Dispatcher;
pub use state::{BrowserState, FetchOutcome, FetchRequest, Flow, InputMode};
