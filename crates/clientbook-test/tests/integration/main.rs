//! HTTP integration tests against a router wired to an in-memory store.

mod clients;
mod contacts;
mod helpers;
mod links;
