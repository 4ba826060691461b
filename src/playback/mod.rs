pub mod controller;
pub mod state;
pub mod ticker;

pub use controller::{PlaybackController, TickOutcome, DEFAULT_TICK_INTERVAL};
pub use state::PlaybackState;
pub use ticker::{Tick, Ticker, TickerError, TickerHandle};
