//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{LinkResponse, ShortenRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link, or returns the existing one for the same URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com", "ttl": 24 }
/// ```
///
/// `ttl` is in hours and optional; without it the link never expires.
///
/// # Response
///
/// - **201 Created**: a new record was stored
/// - **200 OK**: a record for this URL already existed; `ttl` was ignored
///
/// ```json
/// {
///   "id": "aZ3_k9Q",
///   "originalUrl": "https://example.com",
///   "shortUrl": "https://s.example.com/aZ3_k9Q",
///   "clicks": 0,
///   "createdAt": "2025-01-01T00:00:00Z",
///   "expiresAt": "2025-01-02T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: malformed body, missing or invalid `originalUrl`
/// - **500 Internal Server Error**: store failure or identifier space exhausted
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let original_url = payload.original_url.unwrap_or_default();
    let outcome = state.shortener.shorten(&original_url, payload.ttl).await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(outcome.into_record().into())))
}
