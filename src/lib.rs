pub mod adapters;
pub mod config;
pub mod error;
pub mod ui;
pub mod validate;
pub mod version;

pub use error::{Result, StampError};
