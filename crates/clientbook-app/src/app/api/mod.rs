mod app_specific;
mod clients;
mod contacts;
mod linking;
pub mod response;


use salvo::Router;

// Re-export route constants from core
pub use clientbook_core::constants::{
    API_ROUTE_COMPONENT, CLIENTS_ROUTE_COMPONENT, CLIENTS_ROUTE_PREFIX, CONTACTS_ROUTE_COMPONENT,
    CONTACTS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the API router: health check, clients and contacts.
///
/// Handlers expect a `StoreHandler` (and optionally a `ConfigHandler`) hooped
/// in front of this router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(clients::routes())
        .push(contacts::routes())
}
