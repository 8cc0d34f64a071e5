//! Utility functions and helpers

pub mod clock;
pub mod hostname;

pub use clock::{Clock, SystemClock};
pub use hostname::resolve_hostname;
