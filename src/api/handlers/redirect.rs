//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::application::services::Resolution;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validator::location_header_value;

/// Redirects an identifier to its original URL.
///
/// # Endpoint
///
/// `GET /{id}`
///
/// Resolution (cache lookup, store fallback, click counting) is done by
/// [`crate::application::services::Resolver`].
///
/// # Response Codes
///
/// - **302 Found**: `Location` is the original URL, percent-encoded
/// - **404 Not Found**: unknown identifier
/// - **410 Gone**: the link has expired
/// - **500 Internal Server Error**: store failure
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match state.resolver.resolve(&id).await? {
        Resolution::Found(url) => Ok((
            StatusCode::FOUND,
            [(header::LOCATION, location_header_value(&url))],
        )
            .into_response()),
        Resolution::Expired => Err(AppError::expired(
            "Short link has expired",
            json!({ "id": id }),
        )),
        Resolution::NotFound => Err(AppError::not_found(
            "Short link not found",
            json!({ "id": id }),
        )),
    }
}
