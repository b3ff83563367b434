//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkTotals, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for short links.
///
/// "Active" means `deleted_at IS NULL`. Codes stay reserved after a soft
/// delete, so [`LinkRepository::code_exists`] and [`LinkRepository::create`]
/// consider every stored row.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with zero clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already stored, deleted or not.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Returns true if any link, including a soft-deleted one, uses `code`.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Finds an active link by code.
    async fn find_active_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists active links, newest first.
    ///
    /// When `search` is `Some`, only links whose code or target URL contains
    /// it (case-insensitively) are returned.
    async fn list_active(&self, search: Option<String>) -> Result<Vec<Link>, AppError>;

    /// Adds one click to an active link and moves `last_clicked_at` forward to `at`.
    ///
    /// Returns `Ok(false)` if no active link has this code.
    async fn record_click(&self, code: &str, at: DateTime<Utc>) -> Result<bool, AppError>;

    /// Sets `deleted_at = at` on an active link.
    ///
    /// Returns `Ok(false)` if the link is absent or already deleted.
    async fn soft_delete(&self, code: &str, at: DateTime<Utc>) -> Result<bool, AppError>;

    /// Aggregate counts over all stored links.
    async fn totals(&self) -> Result<LinkTotals, AppError>;
}
