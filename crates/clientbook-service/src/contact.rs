//! Contact creation, editing and lookup.

use serde::Serialize;

use clientbook_core::types::EntityKind;
use clientbook_db::model::client::Client;
use clientbook_db::model::contact::{Contact, ContactChanges, NewContact};
use clientbook_db::store::{Store, constraint};

use crate::error::{ServiceError, ServiceResult};
use crate::{link, validation};

/// Input for creating a contact.
#[derive(Debug, Clone)]
pub struct CreateContactContext {
    pub name: String,
    pub surname: String,
    pub email: String,
    /// Clients to link the new contact to.
    pub client_ids: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct UpdateContactContext {
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactSummary {
    pub contact: Contact,
    pub client_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactDetail {
    pub contact: Contact,
    /// Linked clients, by name.
    pub clients: Vec<Client>,
    /// Clients not linked yet, by name.
    pub available_clients: Vec<Client>,
}

/// Trimmed contact fields.
struct ContactFields<'a> {
    name: &'a str,
    surname: &'a str,
    email: &'a str,
}

impl<'a> ContactFields<'a> {
    fn new(name: &'a str, surname: &'a str, email: &'a str) -> ServiceResult<Self> {
        let fields = Self {
            name: name.trim(),
            surname: surname.trim(),
            email: email.trim(),
        };
        validation::validate_contact(fields.name, fields.surname, fields.email)?;
        Ok(fields)
    }
}

/// Maps a store rejection of the email index to the user-facing error.
fn map_email_violation(err: clientbook_db::error::DbError, email: &str) -> ServiceError {
    if err.is_unique_violation_of(constraint::CONTACT_EMAIL) {
        ServiceError::DuplicateEmail {
            email: email.to_string(),
        }
    } else {
        err.into()
    }
}

async fn ensure_email_free(
    store: &dyn Store,
    email: &str,
    exclude: Option<i32>,
) -> ServiceResult<()> {
    if store.contact_email_taken(email, exclude).await? {
        tracing::debug!("Contact email already in use");
        return Err(ServiceError::DuplicateEmail {
            email: email.to_string(),
        });
    }
    Ok(())
}

/// ## Summary
/// Creates a contact and links it to the selected clients.
///
/// Every selected client is checked before anything is written, so an unknown
/// client id leaves the store untouched. Repeated ids link once. If a client
/// disappears before it is linked, the new contact is deleted again.
///
/// ## Side Effects
/// - Inserts one contact row
/// - Inserts one link row per distinct selected client
///
/// ## Errors
/// Returns `ServiceError::ValidationFailed` for invalid fields,
/// `ServiceError::DuplicateEmail` if another contact has the email (compared
/// case-insensitively) and `ServiceError::NotFound` for an unknown client.
#[tracing::instrument(skip(store, ctx), fields(email = %ctx.email))]
pub async fn create_contact(
    store: &dyn Store,
    ctx: &CreateContactContext,
) -> ServiceResult<Contact> {
    let fields = ContactFields::new(&ctx.name, &ctx.surname, &ctx.email)?;
    ensure_email_free(store, fields.email, None).await?;

    let mut client_ids = ctx.client_ids.clone();
    client_ids.sort_unstable();
    client_ids.dedup();
    for &client_id in &client_ids {
        if store.client_by_id(client_id).await?.is_none() {
            return Err(ServiceError::not_found(EntityKind::Client, client_id));
        }
    }

    let contact = store
        .insert_contact(NewContact {
            name: fields.name,
            surname: fields.surname,
            email: fields.email,
        })
        .await
        .map_err(|e| map_email_violation(e, fields.email))?;

    for client_id in client_ids {
        if let Err(e) = link::link(store, client_id, contact.id).await {
            tracing::warn!(contact_id = contact.id, client_id, "Linking failed, removing contact");
            store.delete_contact(contact.id).await?;
            return Err(e);
        }
    }

    tracing::info!(contact_id = contact.id, "Contact created");
    Ok(contact)
}

/// ## Summary
/// Updates a contact's name, surname and email.
///
/// ## Errors
/// Returns `ServiceError::ValidationFailed` for invalid fields,
/// `ServiceError::DuplicateEmail` if a different contact has the email and
/// `ServiceError::NotFound` if the contact does not exist.
#[tracing::instrument(skip(store, ctx))]
pub async fn update_contact(
    store: &dyn Store,
    id: i32,
    ctx: &UpdateContactContext,
) -> ServiceResult<Contact> {
    let fields = ContactFields::new(&ctx.name, &ctx.surname, &ctx.email)?;

    if store.contact_by_id(id).await?.is_none() {
        return Err(ServiceError::not_found(EntityKind::Contact, id));
    }
    ensure_email_free(store, fields.email, Some(id)).await?;

    let contact = store
        .update_contact(
            id,
            ContactChanges {
                name: fields.name,
                surname: fields.surname,
                email: fields.email,
            },
        )
        .await
        .map_err(|e| map_email_violation(e, fields.email))?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Contact, id))?;

    tracing::info!("Contact updated");
    Ok(contact)
}

/// ## Summary
/// Loads a contact with its linked clients and the clients it could still be
/// linked to.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the contact does not exist.
#[tracing::instrument(skip(store))]
pub async fn get_contact(store: &dyn Store, id: i32) -> ServiceResult<ContactDetail> {
    let contact = store
        .contact_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Contact, id))?;
    let clients = store.clients_for_contact(id).await?;
    let available_clients = store.clients_not_linked_to(id).await?;

    Ok(ContactDetail {
        contact,
        clients,
        available_clients,
    })
}

/// ## Summary
/// Lists contacts by surname then name with the number of clients linked to
/// each.
///
/// ## Errors
/// Returns a database error if the store fails.
#[tracing::instrument(skip(store))]
pub async fn list_contacts(store: &dyn Store) -> ServiceResult<Vec<ContactSummary>> {
    Ok(store
        .list_contacts()
        .await?
        .into_iter()
        .map(|row| ContactSummary {
            contact: row.contact,
            client_count: row.link_count,
        })
        .collect())
}
