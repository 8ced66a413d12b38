//! Postgres-backed store over a bb8 connection pool.

use clientbook_core::types::EntityKind;

use crate::db::DbProvider;
use crate::db::connection::DbPool;
use crate::db::query::{client, contact, link};
use crate::model::client::{Client, ClientWithLinkCount, NewClient};
use crate::model::client_contact::{ClientContact, NewClientContact};
use crate::model::contact::{Contact, ContactChanges, ContactWithLinkCount, NewContact};

use super::{ClientStore, ContactStore, LinkStore, StoreFuture};

/// Store that checks a pooled connection out for every operation.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ClientStore for PgStore {
    #[tracing::instrument(skip(self))]
    fn client_by_id(&self, id: i32) -> StoreFuture<'_, Option<Client>> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(client::by_id(&mut conn, id).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn list_clients(&self) -> StoreFuture<'_, Vec<ClientWithLinkCount>> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(client::list_with_link_counts(&mut conn).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn greatest_code_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(client::greatest_code_with_prefix(&mut conn, prefix).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn client_code_exists<'a>(&'a self, code: &'a str) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(client::code_exists(&mut conn, code).await?)
        })
    }

    #[tracing::instrument(skip(self, new_client), fields(code = new_client.client_code))]
    fn insert_client<'a>(&'a self, new_client: NewClient<'a>) -> StoreFuture<'a, Client> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(client::insert(&mut conn, &new_client).await?)
        })
    }

    #[tracing::instrument(skip(self, name))]
    fn rename_client<'a>(&'a self, id: i32, name: &'a str) -> StoreFuture<'a, Option<Client>> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(client::rename(&mut conn, id, name).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn delete_client(&self, id: i32) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(client::delete(&mut conn, id).await?)
        })
    }
}

impl ContactStore for PgStore {
    #[tracing::instrument(skip(self))]
    fn contact_by_id(&self, id: i32) -> StoreFuture<'_, Option<Contact>> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(contact::by_id(&mut conn, id).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn list_contacts(&self) -> StoreFuture<'_, Vec<ContactWithLinkCount>> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(contact::list_with_link_counts(&mut conn).await?)
        })
    }

    #[tracing::instrument(skip(self, email))]
    fn contact_email_taken<'a>(
        &'a self,
        email: &'a str,
        exclude: Option<i32>,
    ) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(contact::email_taken(&mut conn, email, exclude).await?)
        })
    }

    #[tracing::instrument(skip(self, new_contact))]
    fn insert_contact<'a>(&'a self, new_contact: NewContact<'a>) -> StoreFuture<'a, Contact> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(contact::insert(&mut conn, &new_contact).await?)
        })
    }

    #[tracing::instrument(skip(self, changes))]
    fn update_contact<'a>(
        &'a self,
        id: i32,
        changes: ContactChanges<'a>,
    ) -> StoreFuture<'a, Option<Contact>> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(contact::update(&mut conn, id, &changes).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn delete_contact(&self, id: i32) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(contact::delete(&mut conn, id).await?)
        })
    }
}

impl LinkStore for PgStore {
    #[tracing::instrument(skip(self))]
    fn link_exists(&self, client_id: i32, contact_id: i32) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(link::exists(&mut conn, client_id, contact_id).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn insert_link(&self, new_link: NewClientContact) -> StoreFuture<'_, ClientContact> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(link::insert(&mut conn, &new_link).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn delete_link(&self, client_id: i32, contact_id: i32) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(link::delete_pair(&mut conn, client_id, contact_id).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn count_links(&self, kind: EntityKind, id: i32) -> StoreFuture<'_, i64> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(link::count_for(&mut conn, kind, id).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn contacts_for_client(&self, client_id: i32) -> StoreFuture<'_, Vec<Contact>> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(link::contacts_for_client(&mut conn, client_id).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn clients_for_contact(&self, contact_id: i32) -> StoreFuture<'_, Vec<Client>> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(link::clients_for_contact(&mut conn, contact_id).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn clients_not_linked_to(&self, contact_id: i32) -> StoreFuture<'_, Vec<Client>> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            Ok(link::clients_not_linked_to(&mut conn, contact_id).await?)
        })
    }
}
