//! Shared configuration, error and domain vocabulary for the clientbook crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
