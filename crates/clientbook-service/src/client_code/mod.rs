//! Client code allocation.
//!
//! ## Summary
//! A client code is six characters, `PPPNNN`: a three-character prefix derived
//! from the client's name followed by a zero-padded sequence number that is
//! unique within that prefix. Codes are assigned once at creation and never
//! change.

pub mod allocator;
pub mod code;
pub mod prefix;

pub use allocator::{allocate_code, first_free_code, next_sequence};
pub use code::{ClientCode, MAX_SEQUENCE};
pub use prefix::{Prefix, derive_prefix};
