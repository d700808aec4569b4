//! Generic CRUD routes, one nested router per catalog entity
//!
//! Every entity gets the same five routes over its [`EntityStore`]; the
//! entity type parameter supplies table, columns, and validation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shelflink_core::model::{
    Author, Customer, Genre, Location, Order, OrderItem, Publisher, SalesRate,
};
use shelflink_core::ShelfError;
use shelflink_store::entity::{Entity, EntityStore};

use crate::error::ApiResult;
use crate::state::AppState;

/// Body of every successful create: the new row id
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/authors", entity_routes::<Author>())
        .nest("/genres", entity_routes::<Genre>())
        .nest("/publishers", entity_routes::<Publisher>())
        .nest("/locations", entity_routes::<Location>())
        .nest("/customers", entity_routes::<Customer>())
        .nest("/sales-rates", entity_routes::<SalesRate>())
        .nest("/orders", entity_routes::<Order>())
        .nest("/order-items", entity_routes::<OrderItem>())
}

fn entity_routes<E>() -> Router<AppState>
where
    E: Entity + Serialize + Send + Sync + 'static,
    E::Draft: DeserializeOwned + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list::<E>).post(create::<E>))
        .route("/:id", get(fetch::<E>).put(update::<E>).delete(remove::<E>))
}

async fn list<E>(State(state): State<AppState>) -> ApiResult<Json<Vec<E>>>
where
    E: Entity + Serialize + Send + Sync + 'static,
{
    let conn = state.conn();
    let rows = EntityStore::<E>::new().list(&conn)?;
    Ok(Json(rows))
}

async fn fetch<E>(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<E>>
where
    E: Entity + Serialize + Send + Sync + 'static,
{
    let conn = state.conn();
    let row = EntityStore::<E>::new().get(&conn, id)?;
    Ok(Json(row))
}

async fn create<E>(
    State(state): State<AppState>,
    Json(draft): Json<E::Draft>,
) -> ApiResult<(StatusCode, Json<Created>)>
where
    E: Entity + Send + Sync + 'static,
    E::Draft: DeserializeOwned + Send + Sync + 'static,
{
    let conn = state.conn();
    let id = EntityStore::<E>::new().insert(&conn, &draft)?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

async fn update<E>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<E::Draft>,
) -> ApiResult<Json<E>>
where
    E: Entity + Serialize + Send + Sync + 'static,
    E::Draft: DeserializeOwned + Send + Sync + 'static,
{
    let conn = state.conn();
    let store = EntityStore::<E>::new();
    store.update(&conn, id, &draft)?;
    let row = store.get(&conn, id)?;
    Ok(Json(row))
}

async fn remove<E>(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode>
where
    E: Entity + Send + Sync + 'static,
{
    let conn = state.conn();
    if EntityStore::<E>::new().delete(&conn, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ShelfError::not_found(E::ENTITY, id).into())
    }
}
