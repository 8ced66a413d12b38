//! The storage boundary consumed by the service layer.
//!
//! ## Summary
//! `Store` is the handle services receive explicitly (never a global). It offers
//! point lookups, unique-indexed inserts, the descending prefix query used for
//! client-code allocation and exact-match existence checks. Every backend reports
//! index rejections as `DbError::UniqueViolation` carrying one of the constraint
//! names in [`constraint`], so callers can tell a uniqueness race from a generic
//! failure.

pub mod memory;
pub mod pg;

use futures::future::BoxFuture;

use clientbook_core::types::EntityKind;

use crate::error::DbResult;
use crate::model::client::{Client, ClientWithLinkCount, NewClient};
use crate::model::client_contact::{ClientContact, NewClientContact};
use crate::model::contact::{Contact, ContactChanges, ContactWithLinkCount, NewContact};

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Index names shared by every backend.
pub mod constraint {
    pub const CLIENT_CODE: &str = "client_client_code_key";
    pub const CONTACT_EMAIL: &str = "contact_email_lower_key";
    pub const CLIENT_CONTACT_PAIR: &str = "client_contact_pair_key";
    pub const CLIENT_CONTACT_CLIENT_FK: &str = "client_contact_client_id_fkey";
    pub const CLIENT_CONTACT_CONTACT_FK: &str = "client_contact_contact_id_fkey";
}

pub type StoreFuture<'a, T> = BoxFuture<'a, DbResult<T>>;

pub trait ClientStore: Send + Sync {
    fn client_by_id(&self, id: i32) -> StoreFuture<'_, Option<Client>>;

    /// All clients ordered by name, with their link counts.
    fn list_clients(&self) -> StoreFuture<'_, Vec<ClientWithLinkCount>>;

    /// The lexicographically greatest code starting with `prefix`.
    fn greatest_code_with_prefix<'a>(&'a self, prefix: &'a str)
    -> StoreFuture<'a, Option<String>>;

    fn client_code_exists<'a>(&'a self, code: &'a str) -> StoreFuture<'a, bool>;

    /// Inserts if no client holds the code; rejects with
    /// `UniqueViolation { constraint: CLIENT_CODE }` otherwise.
    fn insert_client<'a>(&'a self, new_client: NewClient<'a>) -> StoreFuture<'a, Client>;

    fn rename_client<'a>(&'a self, id: i32, name: &'a str) -> StoreFuture<'a, Option<Client>>;

    /// Deletes the row; links cascade. Returns whether a row was removed.
    fn delete_client(&self, id: i32) -> StoreFuture<'_, bool>;
}

pub trait ContactStore: Send + Sync {
    fn contact_by_id(&self, id: i32) -> StoreFuture<'_, Option<Contact>>;

    /// All contacts ordered by surname then name, with their link counts.
    fn list_contacts(&self) -> StoreFuture<'_, Vec<ContactWithLinkCount>>;

    /// Case-insensitive email check, ignoring the contact `exclude`.
    fn contact_email_taken<'a>(
        &'a self,
        email: &'a str,
        exclude: Option<i32>,
    ) -> StoreFuture<'a, bool>;

    fn insert_contact<'a>(&'a self, new_contact: NewContact<'a>) -> StoreFuture<'a, Contact>;

    fn update_contact<'a>(
        &'a self,
        id: i32,
        changes: ContactChanges<'a>,
    ) -> StoreFuture<'a, Option<Contact>>;

    /// Deletes the row; links cascade. Returns whether a row was removed.
    fn delete_contact(&self, id: i32) -> StoreFuture<'_, bool>;
}

pub trait LinkStore: Send + Sync {
    fn link_exists(&self, client_id: i32, contact_id: i32) -> StoreFuture<'_, bool>;

    /// Inserts a link; rejects a duplicate pair with
    /// `UniqueViolation { constraint: CLIENT_CONTACT_PAIR }`.
    fn insert_link(&self, new_link: NewClientContact) -> StoreFuture<'_, ClientContact>;

    /// Returns whether a row was removed.
    fn delete_link(&self, client_id: i32, contact_id: i32) -> StoreFuture<'_, bool>;

    fn count_links(&self, kind: EntityKind, id: i32) -> StoreFuture<'_, i64>;

    /// Contacts linked to a client, ordered by surname then name.
    fn contacts_for_client(&self, client_id: i32) -> StoreFuture<'_, Vec<Contact>>;

    /// Clients linked to a contact, ordered by name.
    fn clients_for_contact(&self, contact_id: i32) -> StoreFuture<'_, Vec<Client>>;

    /// Clients not linked to a contact, ordered by name.
    fn clients_not_linked_to(&self, contact_id: i32) -> StoreFuture<'_, Vec<Client>>;
}

/// A complete entity store.
pub trait Store: ClientStore + ContactStore + LinkStore {}

impl<T: ClientStore + ContactStore + LinkStore> Store for T {}
