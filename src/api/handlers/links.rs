//! Handlers for link management endpoints (create, list, get, delete).

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse, ListLinksQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "code": "promo24"   // optional, 6-8 letters or digits
/// }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: the new link record
/// - **400 Bad Request**: malformed body, URL, or code
/// - **409 Conflict**: code already used (even by a deleted link)
/// - **500 Internal Server Error**: code generation exhausted or store failure
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(&payload.url, payload.code.as_deref())
        .await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, short_url)),
    ))
}

/// Lists active links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?q=<substring>`
///
/// `q` filters by case-insensitive substring of code or target URL. A blank
/// or missing `q` returns every active link. An unparseable query string
/// (such as a repeated `q`) is a 400.
pub async fn list_links_handler(
    State(state): State<AppState>,
    query: Result<Query<ListLinksQuery>, QueryRejection>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let Query(query) = query?;
    let links = state.link_service.list_links(query.q.as_deref()).await?;

    let body = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.code);
            LinkResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(body))
}

/// Returns one active link with its click statistics.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist or was deleted.
pub async fn get_link_handler(
    path: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let Path(code) = path?;
    let link = state.link_service.get_link(&code).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(LinkResponse::from_link(link, short_url)))
}

/// Soft-deletes a short link by setting its `deleted_at` timestamp.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// The row stays in storage and its code is never handed out again.
/// Redirects, lookups and listings stop seeing it immediately.
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist or is already deleted.
pub async fn delete_link_handler(
    path: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let Path(code) = path?;
    state.link_service.delete_link(&code).await?;

    Ok(StatusCode::NO_CONTENT)
}
