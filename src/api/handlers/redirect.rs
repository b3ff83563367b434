//! Handler for short URL redirect.

use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, warn};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the active link; unknown or deleted codes (and paths that can
///    never be a code, such as invalid UTF-8) get a bare 404
/// 2. Count the click (single atomic store update)
/// 3. Return 302 Found with `Location: <target>`
///
/// # Click Tracking
///
/// Click accounting is best-effort: if the update fails the error is logged
/// and the visitor is redirected anyway.
///
/// # Errors
///
/// Store failures during lookup surface as 500 with a JSON error body, as
/// does a stored target that is not a valid header value. No click is
/// counted in either case.
pub async fn redirect_handler(
    path: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let Ok(Path(code)) = path else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let link = match state.link_service.get_link(&code).await {
        Ok(link) => link,
        Err(AppError::NotFound(_)) => {
            debug!(code, "Redirect for unknown code");
            return Ok(StatusCode::NOT_FOUND.into_response());
        }
        Err(e) => return Err(e),
    };

    let location = HeaderValue::try_from(link.target_url.as_str()).map_err(|e| {
        error!(code, error = %e, "Stored target is not a valid Location header");
        AppError::internal("Invalid redirect target")
    })?;

    match state.link_service.record_click(&link.code).await {
        Ok(true) => {}
        Ok(false) => debug!(code, "Link deleted before click was recorded"),
        Err(e) => warn!(code, error = %e, "Failed to record click"),
    }

    debug!(code, target = %link.target_url, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
