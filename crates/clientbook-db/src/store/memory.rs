//! In-process store emulating the Postgres schema's indexes.
//!
//! Every write runs under one write lock, so each call is atomic with respect to
//! the others. Reads and writes issued as separate calls can still interleave
//! with other tasks, which is what makes this backend useful for exercising the
//! allocator's retry path.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tokio::sync::RwLock;

use clientbook_core::types::EntityKind;

use crate::error::DbError;
use crate::model::client::{Client, ClientWithLinkCount, NewClient};
use crate::model::client_contact::{ClientContact, NewClientContact};
use crate::model::contact::{Contact, ContactChanges, ContactWithLinkCount, NewContact};

use super::{ClientStore, ContactStore, LinkStore, StoreFuture, constraint};

#[derive(Debug, Default)]
struct Tables {
    clients: BTreeMap<i32, Client>,
    contacts: BTreeMap<i32, Contact>,
    links: BTreeMap<i32, ClientContact>,
    next_client_id: i32,
    next_contact_id: i32,
    next_link_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

fn unique_violation(name: &str) -> DbError {
    DbError::UniqueViolation {
        constraint: name.to_string(),
    }
}

/// Clients by name, as the name index orders them.
fn sorted_clients<'a>(clients: impl Iterator<Item = &'a Client>) -> Vec<Client> {
    let mut clients: Vec<Client> = clients.cloned().collect();
    clients.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    clients
}

/// Contacts by surname then name.
fn sorted_contacts<'a>(contacts: impl Iterator<Item = &'a Contact>) -> Vec<Contact> {
    let mut contacts: Vec<Contact> = contacts.cloned().collect();
    contacts.sort_by(|a, b| {
        a.surname
            .cmp(&b.surname)
            .then_with(|| a.name.cmp(&b.name))
            .then(a.id.cmp(&b.id))
    });
    contacts
}

impl Tables {
    fn email_taken(&self, email: &str, exclude: Option<i32>) -> bool {
        let email = email.to_lowercase();
        self.contacts
            .values()
            .any(|c| Some(c.id) != exclude && c.email.to_lowercase() == email)
    }

    fn link_counts(&self, kind: EntityKind) -> HashMap<i32, i64> {
        let mut counts = HashMap::new();
        for link in self.links.values() {
            let key = match kind {
                EntityKind::Client => link.client_id,
                EntityKind::Contact => link.contact_id,
            };
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    fn linked_ids(&self, kind: EntityKind, id: i32) -> Vec<i32> {
        self.links
            .values()
            .filter_map(|link| match kind {
                EntityKind::Client if link.client_id == id => Some(link.contact_id),
                EntityKind::Contact if link.contact_id == id => Some(link.client_id),
                _ => None,
            })
            .collect()
    }

    fn cascade(&mut self, kind: EntityKind, id: i32) {
        self.links.retain(|_, link| match kind {
            EntityKind::Client => link.client_id != id,
            EntityKind::Contact => link.contact_id != id,
        });
    }
}

/// Store keeping every table in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStore for MemoryStore {
    fn client_by_id(&self, id: i32) -> StoreFuture<'_, Option<Client>> {
        Box::pin(async move { Ok(self.tables.read().await.clients.get(&id).cloned()) })
    }

    fn list_clients(&self) -> StoreFuture<'_, Vec<ClientWithLinkCount>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            let counts = tables.link_counts(EntityKind::Client);
            Ok(sorted_clients(tables.clients.values())
                .into_iter()
                .map(|client| ClientWithLinkCount {
                    link_count: counts.get(&client.id).copied().unwrap_or(0),
                    client,
                })
                .collect())
        })
    }

    fn greatest_code_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables
                .clients
                .values()
                .map(|c| c.client_code.as_str())
                .filter(|code| code.starts_with(prefix))
                .max()
                .map(str::to_string))
        })
    }

    fn client_code_exists<'a>(&'a self, code: &'a str) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables.clients.values().any(|c| c.client_code == code))
        })
    }

    fn insert_client<'a>(&'a self, new_client: NewClient<'a>) -> StoreFuture<'a, Client> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if tables
                .clients
                .values()
                .any(|c| c.client_code == new_client.client_code)
            {
                return Err(unique_violation(constraint::CLIENT_CODE));
            }

            let client = Client {
                id: next_id(&mut tables.next_client_id),
                name: new_client.name.to_string(),
                email: new_client.email.to_string(),
                client_code: new_client.client_code.to_string(),
                updated_at: Utc::now(),
            };
            tables.clients.insert(client.id, client.clone());
            Ok(client)
        })
    }

    fn rename_client<'a>(&'a self, id: i32, name: &'a str) -> StoreFuture<'a, Option<Client>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            Ok(tables.clients.get_mut(&id).map(|client| {
                client.name = name.to_string();
                client.updated_at = Utc::now();
                client.clone()
            }))
        })
    }

    fn delete_client(&self, id: i32) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let removed = tables.clients.remove(&id).is_some();
            if removed {
                tables.cascade(EntityKind::Client, id);
            }
            Ok(removed)
        })
    }
}

impl ContactStore for MemoryStore {
    fn contact_by_id(&self, id: i32) -> StoreFuture<'_, Option<Contact>> {
        Box::pin(async move { Ok(self.tables.read().await.contacts.get(&id).cloned()) })
    }

    fn list_contacts(&self) -> StoreFuture<'_, Vec<ContactWithLinkCount>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            let counts = tables.link_counts(EntityKind::Contact);
            Ok(sorted_contacts(tables.contacts.values())
                .into_iter()
                .map(|contact| ContactWithLinkCount {
                    link_count: counts.get(&contact.id).copied().unwrap_or(0),
                    contact,
                })
                .collect())
        })
    }

    fn contact_email_taken<'a>(
        &'a self,
        email: &'a str,
        exclude: Option<i32>,
    ) -> StoreFuture<'a, bool> {
        Box::pin(async move { Ok(self.tables.read().await.email_taken(email, exclude)) })
    }

    fn insert_contact<'a>(&'a self, new_contact: NewContact<'a>) -> StoreFuture<'a, Contact> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if tables.email_taken(new_contact.email, None) {
                return Err(unique_violation(constraint::CONTACT_EMAIL));
            }

            let contact = Contact {
                id: next_id(&mut tables.next_contact_id),
                name: new_contact.name.to_string(),
                surname: new_contact.surname.to_string(),
                email: new_contact.email.to_string(),
                updated_at: Utc::now(),
            };
            tables.contacts.insert(contact.id, contact.clone());
            Ok(contact)
        })
    }

    fn update_contact<'a>(
        &'a self,
        id: i32,
        changes: ContactChanges<'a>,
    ) -> StoreFuture<'a, Option<Contact>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if !tables.contacts.contains_key(&id) {
                return Ok(None);
            }
            if tables.email_taken(changes.email, Some(id)) {
                return Err(unique_violation(constraint::CONTACT_EMAIL));
            }

            Ok(tables.contacts.get_mut(&id).map(|contact| {
                contact.name = changes.name.to_string();
                contact.surname = changes.surname.to_string();
                contact.email = changes.email.to_string();
                contact.updated_at = Utc::now();
                contact.clone()
            }))
        })
    }

    fn delete_contact(&self, id: i32) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let removed = tables.contacts.remove(&id).is_some();
            if removed {
                tables.cascade(EntityKind::Contact, id);
            }
            Ok(removed)
        })
    }
}

impl LinkStore for MemoryStore {
    fn link_exists(&self, client_id: i32, contact_id: i32) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables
                .links
                .values()
                .any(|l| l.client_id == client_id && l.contact_id == contact_id))
        })
    }

    fn insert_link(&self, new_link: NewClientContact) -> StoreFuture<'_, ClientContact> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if !tables.clients.contains_key(&new_link.client_id) {
                return Err(DbError::ForeignKeyViolation {
                    constraint: constraint::CLIENT_CONTACT_CLIENT_FK.to_string(),
                });
            }
            if !tables.contacts.contains_key(&new_link.contact_id) {
                return Err(DbError::ForeignKeyViolation {
                    constraint: constraint::CLIENT_CONTACT_CONTACT_FK.to_string(),
                });
            }
            if tables.links.values().any(|l| {
                l.client_id == new_link.client_id && l.contact_id == new_link.contact_id
            }) {
                return Err(unique_violation(constraint::CLIENT_CONTACT_PAIR));
            }

            let link = ClientContact {
                id: next_id(&mut tables.next_link_id),
                client_id: new_link.client_id,
                contact_id: new_link.contact_id,
                updated_at: Utc::now(),
            };
            tables.links.insert(link.id, link.clone());
            Ok(link)
        })
    }

    fn delete_link(&self, client_id: i32, contact_id: i32) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let before = tables.links.len();
            tables
                .links
                .retain(|_, l| !(l.client_id == client_id && l.contact_id == contact_id));
            Ok(tables.links.len() < before)
        })
    }

    fn count_links(&self, kind: EntityKind, id: i32) -> StoreFuture<'_, i64> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables
                .link_counts(kind)
                .get(&id)
                .copied()
                .unwrap_or(0))
        })
    }

    fn contacts_for_client(&self, client_id: i32) -> StoreFuture<'_, Vec<Contact>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            let ids = tables.linked_ids(EntityKind::Client, client_id);
            Ok(sorted_contacts(ids.iter().filter_map(|id| tables.contacts.get(id))))
        })
    }

    fn clients_for_contact(&self, contact_id: i32) -> StoreFuture<'_, Vec<Client>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            let ids = tables.linked_ids(EntityKind::Contact, contact_id);
            Ok(sorted_clients(ids.iter().filter_map(|id| tables.clients.get(id))))
        })
    }

    fn clients_not_linked_to(&self, contact_id: i32) -> StoreFuture<'_, Vec<Client>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            let linked = tables.linked_ids(EntityKind::Contact, contact_id);
            Ok(sorted_clients(
                tables
                    .clients
                    .values()
                    .filter(|client| !linked.contains(&client.id)),
            ))
        })
    }
}
