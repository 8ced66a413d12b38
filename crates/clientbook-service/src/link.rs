//! Client/contact links and the deletion guard that depends on them.
//!
//! ## Summary
//! A client/contact pair is either linked or not. Linking a linked pair and
//! unlinking an unlinked pair are no-ops; the boolean results report whether
//! the state changed. Entities with links cannot be deleted.

use clientbook_core::types::EntityKind;
use clientbook_db::model::client_contact::NewClientContact;
use clientbook_db::store::{Store, constraint};

use crate::error::{ServiceError, ServiceResult};

async fn require_exists(store: &dyn Store, kind: EntityKind, id: i32) -> ServiceResult<()> {
    let found = match kind {
        EntityKind::Client => store.client_by_id(id).await?.is_some(),
        EntityKind::Contact => store.contact_by_id(id).await?.is_some(),
    };
    if found {
        Ok(())
    } else {
        Err(ServiceError::not_found(kind, id))
    }
}

/// ## Summary
/// Links a client and a contact.
///
/// Returns `true` if a link was created and `false` if the pair was already
/// linked.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if either entity does not exist, and
/// `ServiceError::LinkConflict` if a concurrent request linked the same pair
/// between the check and the insert.
#[tracing::instrument(skip(store))]
pub async fn link(store: &dyn Store, client_id: i32, contact_id: i32) -> ServiceResult<bool> {
    require_exists(store, EntityKind::Client, client_id).await?;
    require_exists(store, EntityKind::Contact, contact_id).await?;

    if store.link_exists(client_id, contact_id).await? {
        tracing::debug!("Pair already linked");
        return Ok(false);
    }

    match store
        .insert_link(NewClientContact {
            client_id,
            contact_id,
        })
        .await
    {
        Ok(row) => {
            tracing::info!(link_id = row.id, "Linked client and contact");
            Ok(true)
        }
        Err(e) if e.is_unique_violation_of(constraint::CLIENT_CONTACT_PAIR) => {
            tracing::warn!("Pair was linked concurrently");
            Err(ServiceError::LinkConflict {
                client_id,
                contact_id,
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// ## Summary
/// Removes the link between a client and a contact.
///
/// Returns `true` if a link was removed and `false` if there was none.
///
/// ## Errors
/// Returns a database error if the store fails.
#[tracing::instrument(skip(store))]
pub async fn unlink(store: &dyn Store, client_id: i32, contact_id: i32) -> ServiceResult<bool> {
    let removed = store.delete_link(client_id, contact_id).await?;
    if removed {
        tracing::info!("Unlinked client and contact");
    } else {
        tracing::debug!("Pair was not linked");
    }
    Ok(removed)
}

async fn has_no_links(store: &dyn Store, id: i32, kind: EntityKind) -> ServiceResult<bool> {
    Ok(store.count_links(kind, id).await? == 0)
}

/// ## Summary
/// Whether an entity may be deleted, i.e. has no links.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the entity does not exist, or a database
/// error if the store fails.
#[tracing::instrument(skip(store))]
pub async fn can_delete(store: &dyn Store, id: i32, kind: EntityKind) -> ServiceResult<bool> {
    require_exists(store, kind, id).await?;
    has_no_links(store, id, kind).await
}

/// ## Summary
/// Deletes a client or contact that has no links.
///
/// The guard is evaluated here as well, so a linked entity is refused without
/// issuing the delete.
///
/// ## Errors
/// Returns `ServiceError::DeletionBlocked` if the entity has links and
/// `ServiceError::NotFound` if it does not exist.
#[tracing::instrument(skip(store))]
pub async fn delete(store: &dyn Store, id: i32, kind: EntityKind) -> ServiceResult<()> {
    require_exists(store, kind, id).await?;

    if !has_no_links(store, id, kind).await? {
        tracing::warn!("Refusing to delete entity with linked records");
        return Err(ServiceError::DeletionBlocked { kind, id });
    }

    let removed = match kind {
        EntityKind::Client => store.delete_client(id).await?,
        EntityKind::Contact => store.delete_contact(id).await?,
    };
    if !removed {
        return Err(ServiceError::not_found(kind, id));
    }

    tracing::info!("Deleted {kind}");
    Ok(())
}
