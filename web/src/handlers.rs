//! # Route Handlers
//!
//! The `/swagger/*` HTTP surface over the shared [`AppPipeline`].

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::{blocking, AppPipeline};
use actix_multipart::form::bytes::Bytes;
use actix_multipart::form::MultipartForm;
use actix_web::{delete, get, post, put, web, HttpResponse};
use oasprobe_core::{import_document, AppError, DocumentSource, EndpointDefinition, ValidationResult};
use serde::{Deserialize, Serialize};

/// Multipart upload carrying one document in the `file` field.
#[derive(MultipartForm)]
pub struct UploadForm {
    /// The uploaded document.
    pub file: Bytes,
}

/// Body of `POST /swagger/validate/text`.
#[derive(Debug, Deserialize)]
pub struct TextDocument {
    /// Pasted document text.
    pub content: String,
}

/// Body of `POST /swagger/parse`.
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    /// Document text (raw or already validated).
    pub content: String,
    /// Document id to store under; a fresh one is allocated when absent.
    #[serde(default)]
    pub swagger_id: Option<i64>,
}

/// Query of `GET /swagger/endpoints`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Owning document id.
    pub swagger_id: Option<i64>,
}

/// Query of the test routes.
#[derive(Debug, Deserialize)]
pub struct TestQuery {
    /// Origin the endpoint is invoked against.
    pub base_url: String,
}

/// Payload returned by the validation routes.
#[derive(Debug, Serialize)]
pub struct ValidationPayload {
    /// Diagnostic or success message.
    pub message: String,
    /// Normalized JSON content (file uploads only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

fn validation_response(
    result: ValidationResult,
    with_content: bool,
) -> Result<HttpResponse, ApiError> {
    if !result.valid {
        return Err(ApiError::BadRequest(result.message));
    }
    let payload = ValidationPayload {
        message: result.message.clone(),
        content: if with_content { result.content } else { None },
    };
    Ok(Envelope::ok(result.message, payload).into_response())
}

/// Validates an uploaded `.json`, `.yaml` or `.yml` document.
#[post("/swagger/validate/file")]
pub async fn validate_file(
    MultipartForm(form): MultipartForm<UploadForm>,
) -> Result<HttpResponse, ApiError> {
    let upload = form.file;
    let content_type = upload
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_string());
    log::debug!(
        "validating upload {:?} ({} bytes)",
        upload.file_name,
        upload.data.len()
    );

    let source = DocumentSource::file(upload.file_name, content_type, upload.data.to_vec());
    validation_response(import_document(source), true)
}

/// Validates pasted document text.
#[post("/swagger/validate/text")]
pub async fn validate_text(body: web::Json<TextDocument>) -> Result<HttpResponse, ApiError> {
    let source = DocumentSource::text(body.into_inner().content);
    validation_response(import_document(source), false)
}

/// Validates, extracts and stores a document's endpoints.
#[post("/swagger/parse")]
pub async fn parse_document(
    pipeline: web::Data<AppPipeline>,
    body: web::Json<ParseRequest>,
) -> Result<HttpResponse, ApiError> {
    let ParseRequest {
        content,
        swagger_id,
    } = body.into_inner();

    let validated = import_document(DocumentSource::text(content));
    let content = match validated.content {
        Some(content) if validated.valid => content,
        _ => return Err(ApiError::BadRequest(validated.message)),
    };

    let summary = blocking(move || pipeline.extract_and_store(&content, swagger_id)).await?;
    let message = format!(
        "parsed {} endpoints into document {} ({} skipped)",
        summary.endpoints.len(),
        summary.document_id,
        summary.skipped_count
    );
    Ok(Envelope::ok(message, summary.endpoints).into_response())
}

/// Lists the endpoints of one document.
#[get("/swagger/endpoints")]
pub async fn list_endpoints(
    pipeline: web::Data<AppPipeline>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let swagger_id = query.swagger_id.ok_or_else(|| {
        ApiError::BadRequest("the swagger_id query parameter is required".into())
    })?;

    let endpoints = blocking(move || pipeline.store().list(swagger_id)).await?;
    Ok(Envelope::ok("ok", endpoints).into_response())
}

/// Fetches one endpoint.
#[get("/swagger/endpoint/{id}")]
pub async fn get_endpoint(
    pipeline: web::Data<AppPipeline>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let endpoint = blocking(move || pipeline.store().get(id))
        .await?
        .ok_or(AppError::EndpointNotFound(id))?;
    Ok(Envelope::ok("ok", endpoint).into_response())
}

/// Replaces an edited endpoint.
#[put("/swagger/endpoint")]
pub async fn update_endpoint(
    pipeline: web::Data<AppPipeline>,
    body: web::Json<EndpointDefinition>,
) -> Result<HttpResponse, ApiError> {
    let endpoint = body.into_inner();
    let updated = blocking(move || pipeline.store().update(endpoint)).await?;
    Ok(Envelope::ok("updated", updated).into_response())
}

/// Deletes one endpoint.
#[delete("/swagger/endpoint/{id}")]
pub async fn delete_endpoint(
    pipeline: web::Data<AppPipeline>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    if !blocking(move || pipeline.store().delete(id)).await? {
        return Err(AppError::EndpointNotFound(id).into());
    }
    Ok(Envelope::message("deleted").into_response())
}

/// Test-invokes a definition sent in the body (saved or not).
#[post("/swagger/endpoint/test")]
pub async fn test_endpoint(
    pipeline: web::Data<AppPipeline>,
    query: web::Query<TestQuery>,
    body: web::Json<EndpointDefinition>,
) -> Result<HttpResponse, ApiError> {
    let outcome = pipeline.test_endpoint(&body, &query.base_url).await?;
    Ok(Envelope::ok(outcome_message(outcome.error.as_deref()), outcome).into_response())
}

/// Test-invokes a stored endpoint.
#[post("/swagger/endpoint/{id}/test")]
pub async fn test_stored_endpoint(
    pipeline: web::Data<AppPipeline>,
    id: web::Path<i64>,
    query: web::Query<TestQuery>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let lookup = pipeline.clone();
    let endpoint = blocking(move || lookup.store().get(id))
        .await?
        .ok_or(AppError::EndpointNotFound(id))?;

    let outcome = pipeline.test_endpoint(&endpoint, &query.base_url).await?;
    Ok(Envelope::ok(outcome_message(outcome.error.as_deref()), outcome).into_response())
}

fn outcome_message(error: Option<&str>) -> &'static str {
    match error {
        Some(_) => "request was not delivered",
        None => "request completed",
    }
}
