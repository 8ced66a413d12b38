//! A store whose existence checks always miss, so the unique indexes of the
//! wrapped store are what reject duplicates. This is what a request sees when
//! another request commits between its check and its write.

use clientbook_core::types::EntityKind;
use clientbook_db::model::client::{Client, ClientWithLinkCount, NewClient};
use clientbook_db::model::client_contact::{ClientContact, NewClientContact};
use clientbook_db::model::contact::{Contact, ContactChanges, ContactWithLinkCount, NewContact};
use clientbook_db::store::{ClientStore, ContactStore, LinkStore, MemoryStore, StoreFuture};

pub struct StaleStore {
    pub inner: MemoryStore,
    /// Client removed right after its next lookup.
    vanishing_client: Option<i32>,
}

impl StaleStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            vanishing_client: None,
        }
    }

    pub fn with_vanishing_client(mut self, id: i32) -> Self {
        self.vanishing_client = Some(id);
        self
    }
}

impl ClientStore for StaleStore {
    fn client_by_id(&self, id: i32) -> StoreFuture<'_, Option<Client>> {
        Box::pin(async move {
            let found = self.inner.client_by_id(id).await?;
            if self.vanishing_client == Some(id) {
                self.inner.delete_client(id).await?;
            }
            Ok(found)
        })
    }

    fn list_clients(&self) -> StoreFuture<'_, Vec<ClientWithLinkCount>> {
        self.inner.list_clients()
    }

    fn greatest_code_with_prefix<'a>(
        &'a self,
        _prefix: &'a str,
    ) -> StoreFuture<'a, Option<String>> {
        Box::pin(async { Ok(None) })
    }

    fn client_code_exists<'a>(&'a self, _code: &'a str) -> StoreFuture<'a, bool> {
        Box::pin(async { Ok(false) })
    }

    fn insert_client<'a>(&'a self, new_client: NewClient<'a>) -> StoreFuture<'a, Client> {
        self.inner.insert_client(new_client)
    }

    fn rename_client<'a>(&'a self, id: i32, name: &'a str) -> StoreFuture<'a, Option<Client>> {
        self.inner.rename_client(id, name)
    }

    fn delete_client(&self, id: i32) -> StoreFuture<'_, bool> {
        self.inner.delete_client(id)
    }
}

impl ContactStore for StaleStore {
    fn contact_by_id(&self, id: i32) -> StoreFuture<'_, Option<Contact>> {
        self.inner.contact_by_id(id)
    }

    fn list_contacts(&self) -> StoreFuture<'_, Vec<ContactWithLinkCount>> {
        self.inner.list_contacts()
    }

    fn contact_email_taken<'a>(
        &'a self,
        _email: &'a str,
        _exclude: Option<i32>,
    ) -> StoreFuture<'a, bool> {
        Box::pin(async { Ok(false) })
    }

    fn insert_contact<'a>(&'a self, new_contact: NewContact<'a>) -> StoreFuture<'a, Contact> {
        self.inner.insert_contact(new_contact)
    }

    fn update_contact<'a>(
        &'a self,
        id: i32,
        changes: ContactChanges<'a>,
    ) -> StoreFuture<'a, Option<Contact>> {
        self.inner.update_contact(id, changes)
    }

    fn delete_contact(&self, id: i32) -> StoreFuture<'_, bool> {
        self.inner.delete_contact(id)
    }
}

impl LinkStore for StaleStore {
    fn link_exists(&self, _client_id: i32, _contact_id: i32) -> StoreFuture<'_, bool> {
        Box::pin(async { Ok(false) })
    }

    fn insert_link(&self, new_link: NewClientContact) -> StoreFuture<'_, ClientContact> {
        self.inner.insert_link(new_link)
    }

    fn delete_link(&self, client_id: i32, contact_id: i32) -> StoreFuture<'_, bool> {
        self.inner.delete_link(client_id, contact_id)
    }

    fn count_links(&self, kind: EntityKind, id: i32) -> StoreFuture<'_, i64> {
        self.inner.count_links(kind, id)
    }

    fn contacts_for_client(&self, client_id: i32) -> StoreFuture<'_, Vec<Contact>> {
        self.inner.contacts_for_client(client_id)
    }

    fn clients_for_contact(&self, contact_id: i32) -> StoreFuture<'_, Vec<Client>> {
        self.inner.clients_for_contact(contact_id)
    }

    fn clients_not_linked_to(&self, contact_id: i32) -> StoreFuture<'_, Vec<Client>> {
        self.inner.clients_not_linked_to(contact_id)
    }
}
