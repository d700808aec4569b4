//! Route assembly

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod books;
pub mod entities;
pub mod health;
pub mod relations;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(books::router())
        .merge(entities::router())
        .merge(relations::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
