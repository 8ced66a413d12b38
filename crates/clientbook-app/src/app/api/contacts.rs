use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Deserialize;

use clientbook_core::types::EntityKind;
use clientbook_db::model::contact::Contact;
use clientbook_service::contact::{
    self, ContactDetail, ContactSummary, CreateContactContext, UpdateContactContext,
};

use super::CONTACTS_ROUTE_COMPONENT;
use super::linking::{DeletableHandler, DeleteHandler, ID_PARAM, LinkHandler};
use super::response::{parse_body, path_id, render_result};
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// Create contact request payload
#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    /// Clients to link the new contact to.
    #[serde(default)]
    pub client_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
}

async fn list(depot: &mut Depot) -> AppResult<Vec<ContactSummary>> {
    let store = get_store_from_depot(depot)?;
    Ok(contact::list_contacts(store.as_ref()).await?)
}

#[handler]
async fn list_contacts_handler(depot: &mut Depot, res: &mut Response) {
    let result = list(depot).await;
    render_result(res, StatusCode::OK, result);
}

async fn create(req: &mut Request, depot: &mut Depot) -> AppResult<Contact> {
    let body: CreateContactRequest = parse_body(req).await?;
    let store = get_store_from_depot(depot)?;

    let ctx = CreateContactContext {
        name: body.name,
        surname: body.surname,
        email: body.email,
        client_ids: body.client_ids,
    };
    Ok(contact::create_contact(store.as_ref(), &ctx).await?)
}

/// ## Summary
/// POST /contacts - Creates a contact, optionally linked to clients.
///
/// ## Side Effects
/// - Creates a contact row
/// - Creates one link row per selected client
///
/// ## Errors
/// Returns HTTP 404 if a selected client does not exist
/// Returns HTTP 422 with field messages if validation fails or the email is taken
#[handler]
async fn create_contact_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing create contact request");
    let result = create(req, depot).await;
    render_result(res, StatusCode::CREATED, result);
}

async fn detail(req: &mut Request, depot: &mut Depot) -> AppResult<ContactDetail> {
    let id = path_id(req, ID_PARAM)?;
    let store = get_store_from_depot(depot)?;
    Ok(contact::get_contact(store.as_ref(), id).await?)
}

/// ## Summary
/// GET /contacts/{id} - A contact with its linked and linkable clients.
#[handler]
async fn get_contact_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = detail(req, depot).await;
    render_result(res, StatusCode::OK, result);
}

async fn update(req: &mut Request, depot: &mut Depot) -> AppResult<Contact> {
    let id = path_id(req, ID_PARAM)?;
    let body: UpdateContactRequest = parse_body(req).await?;
    let store = get_store_from_depot(depot)?;

    let ctx = UpdateContactContext {
        name: body.name,
        surname: body.surname,
        email: body.email,
    };
    Ok(contact::update_contact(store.as_ref(), id, &ctx).await?)
}

#[handler]
async fn update_contact_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = update(req, depot).await;
    render_result(res, StatusCode::OK, result);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(CONTACTS_ROUTE_COMPONENT)
        .get(list_contacts_handler)
        .post(create_contact_handler)
        .push(
            Router::with_path("{id}")
                .get(get_contact_handler)
                .put(update_contact_handler)
                .delete(DeleteHandler {
                    kind: EntityKind::Contact,
                })
                .push(Router::with_path("deletable").get(DeletableHandler {
                    kind: EntityKind::Contact,
                }))
                .push(
                    Router::with_path("clients/{client_id}")
                        .put(LinkHandler {
                            owner: EntityKind::Contact,
                            linked: true,
                        })
                        .delete(LinkHandler {
                            owner: EntityKind::Contact,
                            linked: false,
                        }),
                ),
        )
}
