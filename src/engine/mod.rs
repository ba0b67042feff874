//! Engine controller: the long-lived state behind the UCI loop.

mod controller;
pub mod time;

pub use controller::Engine;
pub use time::think_time;
