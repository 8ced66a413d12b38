pub mod client;
pub mod client_contact;
pub mod contact;
