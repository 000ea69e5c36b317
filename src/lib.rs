// Library exports for adboard
// This allows integration tests and external code to use adboard modules

pub mod accounts;
pub mod adverts;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::accounts::SqliteAccountDirectory;
use crate::adverts::{AdvertService, SqliteAdvertStore};
use crate::state::{AppState, DbPool};

/// Wire the SQLite stores into an `AdvertService`.
pub fn build_service(pool: &DbPool) -> AdvertService {
    AdvertService::new(
        Arc::new(SqliteAdvertStore::new(pool.clone())),
        Arc::new(SqliteAccountDirectory::new(pool.clone())),
    )
}

pub fn build_state(pool: &DbPool) -> AppState {
    AppState {
        service: build_service(pool),
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::adverts::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
