//! Book routes: CRUD plus aggregated related-label projections
//!
//! List and detail rows embed a `related` map, one derived field per
//! relation kind the book owns, built by the batched aggregator rather
//! than per-row queries.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use shelflink_core::errors::Result;
use shelflink_core::model::{Book, BookDraft, OwnerRecord, TargetRecord};
use shelflink_core::ShelfError;
use shelflink_engine::commands::aggregate::aggregate;
use shelflink_store::entities::BookStore;

use crate::error::ApiResult;
use crate::routes::entities::Created;
use crate::state::AppState;

/// One book with its aggregated related-label map
#[derive(Debug, Serialize)]
pub struct BookRow {
    #[serde(flatten)]
    pub book: Book,
    pub related: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct BookQuery {
    pub title: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/books/:id/authors", get(book_authors))
        .route("/books/:id/genres", get(book_genres))
        .route("/books/:id/locations", get(book_locations))
}

async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> ApiResult<Json<Vec<BookRow>>> {
    let conn = state.conn();
    let store = BookStore::new();
    let books = match query.title.as_deref() {
        Some(fragment) => store.search_by_title(&conn, fragment)?,
        None => store.base.list(&conn)?,
    };
    let rows = with_related(&state, &conn, books)?;
    Ok(Json(rows))
}

async fn get_book(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<BookRow>> {
    let conn = state.conn();
    let book = BookStore::new().base.get(&conn, id)?;
    let row = single_row(&state, &conn, book, id)?;
    Ok(Json(row))
}

async fn create_book(
    State(state): State<AppState>,
    Json(draft): Json<BookDraft>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    let conn = state.conn();
    let id = BookStore::new().base.insert(&conn, &draft)?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<BookDraft>,
) -> ApiResult<Json<BookRow>> {
    let conn = state.conn();
    let store = BookStore::new();
    store.base.update(&conn, id, &draft)?;
    let book = store.base.get(&conn, id)?;
    let row = single_row(&state, &conn, book, id)?;
    Ok(Json(row))
}

async fn delete_book(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let conn = state.conn();
    if BookStore::new().base.delete(&conn, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ShelfError::not_found("book", id).into())
    }
}

async fn book_authors(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<TargetRecord>>> {
    related_targets(&state, "author", id)
}

async fn book_genres(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<TargetRecord>>> {
    related_targets(&state, "genre", id)
}

async fn book_locations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<TargetRecord>>> {
    related_targets(&state, "location", id)
}

/// Labeled targets linked to one book in the kind joining it to `target_entity`
fn related_targets(
    state: &AppState,
    target_entity: &str,
    book_id: i64,
) -> ApiResult<Json<Vec<TargetRecord>>> {
    let conn = state.conn();
    let def = state.registry().relation_between("book", target_entity)?;
    if !state.relations().entity_exists(&conn, "book", book_id)? {
        return Err(ShelfError::not_found("book", book_id).into());
    }
    let records = state.relations().target_records(&conn, &def.kind, book_id)?;
    Ok(Json(records))
}

/// Project the `related` map onto a batch of books with one aggregator pass
fn with_related(state: &AppState, conn: &Connection, books: Vec<Book>) -> Result<Vec<BookRow>> {
    let owners: Vec<OwnerRecord> = books
        .iter()
        .map(|b| OwnerRecord::new(b.id, b.title.clone()))
        .collect();
    let kinds: Vec<String> = state
        .registry()
        .relations_owned_by("book")
        .iter()
        .map(|def| def.kind.clone())
        .collect();
    let projected = aggregate(state.relations(), conn, &owners, &kinds)?;
    Ok(books
        .into_iter()
        .zip(projected)
        .map(|(book, row)| BookRow {
            book,
            related: row.related,
        })
        .collect())
}

fn single_row(state: &AppState, conn: &Connection, book: Book, id: i64) -> Result<BookRow> {
    with_related(state, conn, vec![book])?
        .into_iter()
        .next()
        .ok_or_else(|| ShelfError::not_found("book", id))
}
