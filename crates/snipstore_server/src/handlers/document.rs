//! Document HTTP handlers.

use crate::{error::HttpError, AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use snipstore_core::models::document::{CreateDocumentRequest, Document, Extension};
use snipstore_core::AppError;

fn validate_content(content: &str, max_document_size: usize) -> Result<(), AppError> {
    if content.is_empty() {
        return Err(AppError::BadRequest(
            "Document content must not be empty".to_string(),
        ));
    }
    if content.len() > max_document_size {
        return Err(AppError::BadRequest(format!(
            "Document size exceeds maximum of {} bytes",
            max_document_size
        )));
    }
    Ok(())
}

/// Report malformed or oversized bodies in the API's JSON error shape.
fn map_json_rejection(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}

fn parse_extension(raw: &str) -> Result<Extension, AppError> {
    raw.parse::<Extension>()
        .map_err(|err| AppError::BadRequest(format!("Invalid extension: {}", err)))
}

/// Create a new document under a freshly allocated id.
///
/// # Arguments
/// - `state`: Application state.
/// - `req`: Document creation payload.
///
/// # Returns
/// The created document as JSON.
///
/// # Errors
/// Returns an error if validation, id allocation, or persistence fails.
pub async fn create_document(
    State(state): State<AppState>,
    payload: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> Result<Json<Document>, HttpError> {
    let Json(req) = payload.map_err(map_json_rejection)?;
    validate_content(&req.content, state.config.max_document_size)?;
    let extension = parse_extension(&req.extension)?;

    let document = state.handler.new_document(&req.content, extension)?;
    Ok(Json(document))
}

/// Fetch a document by id.
///
/// # Returns
/// The document as JSON.
///
/// # Errors
/// Returns 404 if the document does not exist, or a storage error.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, HttpError> {
    state
        .handler
        .get_document(&id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound.into())
}

/// Fetch only the content of a document as plain text.
///
/// # Errors
/// Returns 404 if the document does not exist, or a storage error.
pub async fn get_raw_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let content = state
        .handler
        .get_raw_document(&id)?
        .ok_or(AppError::NotFound)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        content,
    )
        .into_response())
}
