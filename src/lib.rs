pub mod config;
pub mod domain;
pub mod error;
pub mod manager;
pub mod store;
pub mod ui;

pub use error::{Result, VertagError};
