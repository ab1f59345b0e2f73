//! Shared configuration, error and record types for the FocusLock backend.

pub mod config;
pub mod error;
pub mod types;

pub use error::{FocusError, Result};
