//! Client creation, renaming and lookup.

use serde::Serialize;

use clientbook_core::config::ClientsConfig;
use clientbook_core::types::EntityKind;
use clientbook_db::model::client::{Client, NewClient};
use clientbook_db::model::contact::Contact;
use clientbook_db::store::{Store, constraint};

use crate::client_code::{ClientCode, allocate_code, derive_prefix, first_free_code};
use crate::error::{ServiceError, ServiceResult};
use crate::validation;

/// Input for creating a client. The code is always generated.
#[derive(Debug, Clone)]
pub struct CreateClientContext {
    pub name: String,
    /// Generated from the code when absent.
    pub email: Option<String>,
}

/// Input for editing a client. Email and code are fixed after creation.
#[derive(Debug, Clone)]
pub struct UpdateClientContext {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    pub client: Client,
    pub contact_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientDetail {
    pub client: Client,
    pub contacts: Vec<Contact>,
}

fn placeholder_email(code: &ClientCode, defaults: &ClientsConfig) -> String {
    format!(
        "{}@{}",
        code.as_str().to_lowercase(),
        defaults.placeholder_email_domain
    )
}

/// Inserts one candidate, reporting a lost race on the code as
/// `ConflictRetryable`.
async fn insert_with_code(
    store: &dyn Store,
    name: &str,
    email: &str,
    code: &ClientCode,
) -> ServiceResult<Client> {
    validation::validate_client(name, email, code.as_str())?;

    store
        .insert_client(NewClient {
            name,
            email,
            client_code: code.as_str(),
        })
        .await
        .map_err(|e| {
            if e.is_unique_violation_of(constraint::CLIENT_CODE) {
                ServiceError::ConflictRetryable {
                    code: code.to_string(),
                }
            } else {
                e.into()
            }
        })
}

/// ## Summary
/// Creates a client with a freshly allocated code.
///
/// When another writer claims the allocated code before the insert lands, the
/// sequence advances and the insert is retried until it succeeds or the prefix
/// runs out.
///
/// ## Side Effects
/// - Inserts one client row
///
/// ## Errors
/// Returns `ServiceError::ValidationFailed` for an invalid name or email,
/// `ServiceError::AllocationExhausted` when the name's prefix has no free
/// sequence left, or a database error.
#[tracing::instrument(skip(store, defaults, ctx), fields(name = %ctx.name))]
pub async fn create_client(
    store: &dyn Store,
    defaults: &ClientsConfig,
    ctx: &CreateClientContext,
) -> ServiceResult<Client> {
    let name = ctx.name.trim();
    let email = ctx
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty());

    validation::validate_client_name(name)?;

    let prefix = derive_prefix(name);
    let mut code = allocate_code(store, name).await?;

    loop {
        let email = email.map_or_else(|| placeholder_email(&code, defaults), str::to_string);

        match insert_with_code(store, name, &email, &code).await {
            Ok(client) => {
                tracing::info!(
                    client_id = client.id,
                    code = %client.client_code,
                    "Client created"
                );
                return Ok(client);
            }
            Err(ServiceError::ConflictRetryable { code: taken }) => {
                tracing::warn!(code = %taken, "Client code claimed concurrently, retrying");
                code = first_free_code(store, &prefix, code.sequence() + 1).await?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// ## Summary
/// Renames a client. The email and code are left as they are.
///
/// ## Errors
/// Returns `ServiceError::ValidationFailed` for an invalid name and
/// `ServiceError::NotFound` if the client does not exist.
#[tracing::instrument(skip(store, ctx))]
pub async fn update_client(
    store: &dyn Store,
    id: i32,
    ctx: &UpdateClientContext,
) -> ServiceResult<Client> {
    let name = ctx.name.trim();
    validation::validate_client_name(name)?;

    let client = store
        .rename_client(id, name)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Client, id))?;

    tracing::info!("Client renamed");
    Ok(client)
}

/// ## Summary
/// Loads a client with its linked contacts, ordered by surname then name.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the client does not exist.
#[tracing::instrument(skip(store))]
pub async fn get_client(store: &dyn Store, id: i32) -> ServiceResult<ClientDetail> {
    let client = store
        .client_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Client, id))?;
    let contacts = store.contacts_for_client(id).await?;

    Ok(ClientDetail { client, contacts })
}

/// ## Summary
/// Lists clients by name with the number of contacts linked to each.
///
/// ## Errors
/// Returns a database error if the store fails.
#[tracing::instrument(skip(store))]
pub async fn list_clients(store: &dyn Store) -> ServiceResult<Vec<ClientSummary>> {
    Ok(store
        .list_clients()
        .await?
        .into_iter()
        .map(|row| ClientSummary {
            client: row.client,
            contact_count: row.link_count,
        })
        .collect())
}
