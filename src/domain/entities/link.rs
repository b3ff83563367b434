//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with click accounting.
///
/// `code` is unique across every link ever stored, including soft-deleted ones.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub clicks: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a fresh, never-clicked link.
    pub fn new(id: i64, code: String, target_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            code,
            target_url,
            clicks: 0,
            last_clicked_at: None,
            created_at,
            deleted_at: None,
        }
    }

    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Applies one redirect at time `at`.
    ///
    /// `last_clicked_at` never moves backwards, even if `at` is older than
    /// the stored value.
    pub fn register_click(&mut self, at: DateTime<Utc>) {
        self.clicks += 1;
        self.last_clicked_at = Some(self.last_clicked_at.map_or(at, |last| last.max(at)));
    }

    /// Returns true if `needle` (already lowercased) occurs in the code or
    /// target URL, ignoring case.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.code.to_lowercase().contains(needle) || self.target_url.to_lowercase().contains(needle)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
}

/// Aggregate counts across the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinkTotals {
    pub total: i64,
    pub active: i64,
    pub deleted: i64,
    pub clicks: i64,
}
