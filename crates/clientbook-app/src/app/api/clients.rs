use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Deserialize;

use clientbook_core::types::EntityKind;
use clientbook_db::model::client::Client;
use clientbook_service::client::{
    self, ClientDetail, ClientSummary, CreateClientContext, UpdateClientContext,
};

use super::CLIENTS_ROUTE_COMPONENT;
use super::linking::{DeletableHandler, DeleteHandler, ID_PARAM, LinkHandler};
use super::response::{parse_body, path_id, render_result};
use crate::config::clients_config_from_depot;
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// Create client request payload
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// ## Summary
/// Update client request payload. Only the name can change.
#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    pub name: String,
}

async fn list(depot: &mut Depot) -> AppResult<Vec<ClientSummary>> {
    let store = get_store_from_depot(depot)?;
    Ok(client::list_clients(store.as_ref()).await?)
}

/// ## Summary
/// GET /clients - Lists clients by name with their contact counts.
#[handler]
async fn list_clients_handler(depot: &mut Depot, res: &mut Response) {
    let result = list(depot).await;
    render_result(res, StatusCode::OK, result);
}

async fn create(req: &mut Request, depot: &mut Depot) -> AppResult<Client> {
    let body: CreateClientRequest = parse_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let defaults = clients_config_from_depot(depot);

    let ctx = CreateClientContext {
        name: body.name,
        email: body.email,
    };
    Ok(client::create_client(store.as_ref(), &defaults, &ctx).await?)
}

/// ## Summary
/// POST /clients - Creates a client with a generated client code.
///
/// ## Side Effects
/// - Creates a client row
///
/// ## Errors
/// Returns HTTP 400 if the body is not valid JSON
/// Returns HTTP 422 with field messages if validation fails
/// Returns HTTP 503 if the name's code prefix is exhausted
#[handler]
async fn create_client_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing create client request");
    let result = create(req, depot).await;
    render_result(res, StatusCode::CREATED, result);
}

async fn detail(req: &mut Request, depot: &mut Depot) -> AppResult<ClientDetail> {
    let id = path_id(req, ID_PARAM)?;
    let store = get_store_from_depot(depot)?;
    Ok(client::get_client(store.as_ref(), id).await?)
}

/// ## Summary
/// GET /clients/{id} - A client with its linked contacts.
#[handler]
async fn get_client_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = detail(req, depot).await;
    render_result(res, StatusCode::OK, result);
}

async fn update(req: &mut Request, depot: &mut Depot) -> AppResult<Client> {
    let id = path_id(req, ID_PARAM)?;
    let body: UpdateClientRequest = parse_body(req).await?;
    let store = get_store_from_depot(depot)?;

    let ctx = UpdateClientContext { name: body.name };
    Ok(client::update_client(store.as_ref(), id, &ctx).await?)
}

/// ## Summary
/// PUT /clients/{id} - Renames a client.
///
/// ## Errors
/// Returns HTTP 404 if the client does not exist
/// Returns HTTP 422 with field messages if validation fails
#[handler]
async fn update_client_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = update(req, depot).await;
    render_result(res, StatusCode::OK, result);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(CLIENTS_ROUTE_COMPONENT)
        .get(list_clients_handler)
        .post(create_client_handler)
        .push(
            Router::with_path("{id}")
                .get(get_client_handler)
                .put(update_client_handler)
                .delete(DeleteHandler {
                    kind: EntityKind::Client,
                })
                .push(Router::with_path("deletable").get(DeletableHandler {
                    kind: EntityKind::Client,
                }))
                .push(
                    Router::with_path("contacts/{contact_id}")
                        .put(LinkHandler {
                            owner: EntityKind::Client,
                            linked: true,
                        })
                        .delete(LinkHandler {
                            owner: EntityKind::Client,
                            linked: false,
                        }),
                ),
        )
}
