pub mod aggregate;
pub mod coerce;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod output;
pub mod reading;

pub use error::{Error, Result};
