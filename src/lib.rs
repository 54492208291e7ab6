//! Folio Server Library
//!
//! PDF upload service: each upload is converted to markdown and both
//! artifacts are stored side by side in object storage.
//!
//! # Modules
//!
//! - `validate`: Upload file-type check
//! - `convert`: PDF to markdown via MuPDF
//! - `documents`: Document persistence over blob storage
//! - `storage`: S3 and in-memory blob stores
//! - `routes`: HTTP handlers

pub mod config;
pub mod convert;
pub mod documents;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
pub mod validate;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the complete HTTP surface
pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config().server.max_upload_bytes;

    Router::new()
        .merge(routes::health::router())
        .merge(routes::upload::router())
        .merge(routes::documents::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Allow every origin, method and header, with credentials.
///
/// Wildcards cannot be combined with credentials, so the request values
/// are mirrored back instead.
// TODO: restrict origins to the frontend deployment before production use
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
