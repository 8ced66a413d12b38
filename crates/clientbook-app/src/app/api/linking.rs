//! Handlers shared by the client and contact routes: deletion, the deletion
//! guard and linking from either side.

use salvo::http::StatusCode;
use salvo::{Depot, FlowCtrl, Request, Response, async_trait};

use clientbook_core::types::EntityKind;
use clientbook_service::link;

use super::response::{DeletableResponse, LinkResponse, path_id, render_error, render_result};
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

/// Route parameter holding the id of the entity the route is rooted at.
pub const ID_PARAM: &str = "id";

/// Route parameter naming the other side of a link from `owner`'s routes.
fn counterpart_param(owner: EntityKind) -> &'static str {
    match owner.counterpart() {
        EntityKind::Client => "client_id",
        EntityKind::Contact => "contact_id",
    }
}

/// `DELETE /{kind}s/{id}`
pub struct DeleteHandler {
    pub kind: EntityKind,
}

async fn delete_entity(req: &mut Request, depot: &mut Depot, kind: EntityKind) -> AppResult<()> {
    let id = path_id(req, ID_PARAM)?;
    let store = get_store_from_depot(depot)?;
    link::delete(store.as_ref(), id, kind).await?;
    Ok(())
}

#[async_trait]
impl salvo::Handler for DeleteHandler {
    #[tracing::instrument(skip_all, fields(kind = %self.kind))]
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        _ctrl: &mut FlowCtrl,
    ) {
        match delete_entity(req, depot, self.kind).await {
            Ok(()) => {
                res.status_code(StatusCode::NO_CONTENT);
            }
            Err(e) => render_error(res, &e),
        }
    }
}

/// `GET /{kind}s/{id}/deletable`
pub struct DeletableHandler {
    pub kind: EntityKind,
}

async fn deletable(
    req: &mut Request,
    depot: &mut Depot,
    kind: EntityKind,
) -> AppResult<DeletableResponse> {
    let id = path_id(req, ID_PARAM)?;
    let store = get_store_from_depot(depot)?;
    let deletable = link::can_delete(store.as_ref(), id, kind).await?;
    Ok(DeletableResponse { deletable })
}

#[async_trait]
impl salvo::Handler for DeletableHandler {
    #[tracing::instrument(skip_all, fields(kind = %self.kind))]
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        _ctrl: &mut FlowCtrl,
    ) {
        let result = deletable(req, depot, self.kind).await;
        render_result(res, StatusCode::OK, result);
    }
}

/// `PUT` (link) or `DELETE` (unlink) on
/// `/clients/{id}/contacts/{contact_id}` and `/contacts/{id}/clients/{client_id}`.
pub struct LinkHandler {
    /// The entity the route is rooted at.
    pub owner: EntityKind,
    /// `true` to link, `false` to unlink.
    pub linked: bool,
}

impl LinkHandler {
    /// ## Summary
    /// Resolves the route's ids into a `(client_id, contact_id)` pair.
    fn pair(&self, req: &Request) -> AppResult<(i32, i32)> {
        let owner_id = path_id(req, ID_PARAM)?;
        let other_id = path_id(req, counterpart_param(self.owner))?;
        Ok(match self.owner {
            EntityKind::Client => (owner_id, other_id),
            EntityKind::Contact => (other_id, owner_id),
        })
    }

    async fn apply(&self, req: &mut Request, depot: &mut Depot) -> AppResult<LinkResponse> {
        let (client_id, contact_id) = self.pair(req)?;
        let store = get_store_from_depot(depot)?;

        let success = if self.linked {
            link::link(store.as_ref(), client_id, contact_id).await?
        } else {
            link::unlink(store.as_ref(), client_id, contact_id).await?
        };
        Ok(LinkResponse { success })
    }
}

#[async_trait]
impl salvo::Handler for LinkHandler {
    #[tracing::instrument(skip_all, fields(owner = %self.owner, linked = self.linked))]
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        _ctrl: &mut FlowCtrl,
    ) {
        let result = self.apply(req, depot).await;
        render_result(res, StatusCode::OK, result);
    }
}
