//! Persistence for clients, contacts and the links between them.

pub mod db;
pub mod error;
pub mod model;
pub mod store;
