//! Business rules for clients, contacts and the links between them.
//!
//! Every operation takes the store handle explicitly.

pub mod client;
pub mod client_code;
pub mod contact;
pub mod error;
pub mod link;
#[cfg(test)]
mod test_support;
pub mod validation;
