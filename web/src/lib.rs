#![deny(missing_docs)]

//! # oasprobe Web Library
//!
//! Route handlers, the SQLite endpoint store, configuration and the response
//! envelope.

use actix_multipart::form::MultipartFormConfig;
use actix_web::{get, web, HttpResponse, Responder};
use oasprobe_core::{AppResult, EndpointStore, HttpTransport, Pipeline};

/// Re-export diesel so models can access `crate::diesel`.
pub use diesel;

/// Server configuration.
pub mod config;

/// Uniform JSON envelope.
pub mod envelope;

/// HTTP error mapping.
pub mod error;

/// `/swagger/*` handlers.
pub mod handlers;

/// Database schema.
pub mod schema;

/// Database models.
pub mod models;

/// Diesel-backed endpoint store.
pub mod store;

use envelope::Envelope;
use error::ApiError;

/// Pipeline shared by all workers.
pub type AppPipeline = Pipeline<dyn EndpointStore, HttpTransport>;

/// A simple health check handler.
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Liveness probe answering with an envelope.
#[get("/ping")]
pub async fn ping() -> impl Responder {
    Envelope::message("pong").into_response()
}

/// Runs a blocking store call on actix's thread pool.
pub(crate) async fn blocking<F, R>(f: F) -> Result<R, ApiError>
where
    F: FnOnce() -> AppResult<R> + Send + 'static,
    R: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

/// Registers extractor limits, error handlers and every route.
///
/// Extractor failures (bad JSON, oversized upload, bad path id) are rendered
/// as 400 envelopes.
pub fn configure(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(max_upload_bytes)
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        MultipartFormConfig::default()
            .total_limit(max_upload_bytes)
            .memory_limit(max_upload_bytes)
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(health_check)
    .service(ping)
    .service(handlers::validate_file)
    .service(handlers::validate_text)
    .service(handlers::parse_document)
    .service(handlers::list_endpoints)
    .service(handlers::test_endpoint)
    .service(handlers::test_stored_endpoint)
    .service(handlers::update_endpoint)
    .service(handlers::get_endpoint)
    .service(handlers::delete_endpoint);
}
