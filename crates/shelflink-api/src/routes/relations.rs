//! Relation routes: kind listing, membership views, reconcile, link CRUD

use std::collections::BTreeSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shelflink_core::model::{Link, ReconcileOutcome};
use shelflink_core::ShelfError;
use shelflink_engine::commands::reconcile::reconcile;

use crate::error::ApiResult;
use crate::state::AppState;

/// Membership view of one owner in one kind
#[derive(Debug, Serialize)]
pub struct Membership {
    pub owner_id: i64,
    pub targets: BTreeSet<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DesiredTargets {
    pub target_ids: BTreeSet<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NewLink {
    pub owner_id: i64,
    pub target_id: i64,
    #[serde(default)]
    pub payload: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LinkCreated {
    pub link_id: i64,
}

/// Partial link update: whichever fields are present are applied
#[derive(Debug, Deserialize)]
pub struct LinkPatch {
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub target_id: Option<i64>,
    #[serde(default)]
    pub payload: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/relations", get(list_kinds))
        .route(
            "/relations/:kind/owners/:owner_id",
            get(get_membership).put(put_membership),
        )
        .route("/relations/:kind/links", post(create_link))
        .route(
            "/relations/:kind/links/:link_id",
            patch(patch_link).delete(delete_link),
        )
        .route(
            "/relations/:kind/owners/:owner_id/targets/:target_id",
            delete(delete_pair),
        )
}

async fn list_kinds(State(state): State<AppState>) -> Json<Vec<String>> {
    let kinds = state
        .registry()
        .kinds()
        .into_iter()
        .map(String::from)
        .collect();
    Json(kinds)
}

async fn get_membership(
    State(state): State<AppState>,
    Path((kind, owner_id)): Path<(String, i64)>,
) -> ApiResult<Json<Membership>> {
    let conn = state.conn();
    let def = state.registry().relation(&kind)?;
    if !state
        .relations()
        .entity_exists(&conn, &def.owner_entity, owner_id)?
    {
        return Err(ShelfError::UnknownReference {
            entity: def.owner_entity.clone(),
            id: owner_id,
        }
        .into());
    }
    let targets = state.relations().list_links(&conn, &kind, owner_id)?;
    Ok(Json(Membership { owner_id, targets }))
}

async fn put_membership(
    State(state): State<AppState>,
    Path((kind, owner_id)): Path<(String, i64)>,
    Json(body): Json<DesiredTargets>,
) -> ApiResult<Json<ReconcileOutcome>> {
    let conn = state.conn();
    let outcome = reconcile(state.relations(), &conn, &kind, owner_id, &body.target_ids)?;
    Ok(Json(outcome))
}

async fn create_link(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(body): Json<NewLink>,
) -> ApiResult<(StatusCode, Json<LinkCreated>)> {
    let conn = state.conn();
    let link_id =
        state
            .relations()
            .add_link(&conn, &kind, body.owner_id, body.target_id, body.payload)?;
    Ok((StatusCode::CREATED, Json(LinkCreated { link_id })))
}

async fn patch_link(
    State(state): State<AppState>,
    Path((kind, link_id)): Path<(String, i64)>,
    Json(body): Json<LinkPatch>,
) -> ApiResult<Json<Link>> {
    let conn = state.conn();
    let relations = state.relations();
    let current = relations.get_link(&conn, &kind, link_id)?;

    let owner_id = body.owner_id.unwrap_or(current.owner_id);
    let target_id = body.target_id.unwrap_or(current.target_id);
    if (owner_id, target_id) != (current.owner_id, current.target_id) {
        relations.retarget_link(&conn, &kind, link_id, owner_id, target_id)?;
    }
    if let Some(payload) = body.payload {
        relations.set_link_payload(&conn, &kind, link_id, payload)?;
    }

    let updated = relations.get_link(&conn, &kind, link_id)?;
    Ok(Json(updated))
}

async fn delete_link(
    State(state): State<AppState>,
    Path((kind, link_id)): Path<(String, i64)>,
) -> ApiResult<StatusCode> {
    let conn = state.conn();
    if state.relations().remove_link_by_id(&conn, &kind, link_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ShelfError::not_found(format!("{kind} link"), link_id).into())
    }
}

async fn delete_pair(
    State(state): State<AppState>,
    Path((kind, owner_id, target_id)): Path<(String, i64, i64)>,
) -> ApiResult<StatusCode> {
    let conn = state.conn();
    if state
        .relations()
        .remove_link(&conn, &kind, owner_id, target_id)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ShelfError::not_found(format!("{kind} link"), target_id).into())
    }
}
