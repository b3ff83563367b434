#![allow(dead_code)]

use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use linkshort::application::services::LinkService;
use linkshort::domain::repositories::LinkRepository;
use linkshort::infrastructure::persistence::MemoryLinkRepository;
use linkshort::routes::{app_router, router};
use linkshort::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;

pub const TEST_BASE_URL: &str = "https://sho.rt";

/// Builds application state over the given repository.
pub fn create_test_state(repository: Arc<dyn LinkRepository>) -> AppState {
    let link_service = Arc::new(LinkService::new(repository, TEST_BASE_URL));
    AppState::new(link_service, Instant::now())
}

/// Full router backed by a fresh in-memory store.
///
/// The repository is returned too, so tests can inspect rows that the API
/// no longer exposes (soft-deleted links).
pub fn make_server() -> (TestServer, Arc<MemoryLinkRepository>) {
    let repository = Arc::new(MemoryLinkRepository::new());
    let state = create_test_state(repository.clone());
    let server = TestServer::new(router(state)).unwrap();
    (server, repository)
}

/// Same as [`make_server`], but serves the production router including
/// trailing-slash normalization.
pub fn make_normalized_server() -> (TestServer, Arc<MemoryLinkRepository>) {
    let repository = Arc::new(MemoryLinkRepository::new());
    let state = create_test_state(repository.clone());
    let app = ServiceExt::<Request>::into_make_service(app_router(state));
    let server = TestServer::new(app).unwrap();
    (server, repository)
}

pub async fn create_test_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO links (code, target_url) VALUES ($1, $2)")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_deleted_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO links (code, target_url, deleted_at) VALUES ($1, $2, NOW())")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}
