#![forbid(unsafe_code)]

pub mod error;
pub mod exam;
pub mod model;
pub mod sampling;
pub mod scoring;
pub mod time;
pub mod timer;

pub use error::Error;
pub use time::Clock;
