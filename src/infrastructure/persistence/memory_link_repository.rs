//! In-process link repository.
//!
//! Keeps every link, including soft-deleted ones, in a `Vec` behind a
//! [`RwLock`]. Intended for local runs (`STORAGE_BACKEND=memory`) and tests;
//! contents are lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entities::{Link, LinkTotals, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
pub struct MemoryLinkRepository {
    links: RwLock<Vec<Link>>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.write().await;

        if links.iter().any(|l| l.code == new_link.code) {
            return Err(AppError::conflict("Code already exists"));
        }

        let id = links.last().map_or(1, |l| l.id + 1);
        let link = Link::new(id, new_link.code, new_link.target_url, Utc::now());
        links.push(link.clone());

        Ok(link)
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.read().await.iter().any(|l| l.code == code))
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .read()
            .await
            .iter()
            .find(|l| l.code == code && !l.is_deleted())
            .cloned())
    }

    async fn list_active(&self, search: Option<String>) -> Result<Vec<Link>, AppError> {
        let needle = search.map(|s| s.to_lowercase());

        let mut found: Vec<Link> = self
            .links
            .read()
            .await
            .iter()
            .filter(|l| !l.is_deleted())
            .filter(|l| needle.as_deref().is_none_or(|n| l.matches_search(n)))
            .cloned()
            .collect();

        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(found)
    }

    async fn record_click(&self, code: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut links = self.links.write().await;

        match links.iter_mut().find(|l| l.code == code && !l.is_deleted()) {
            Some(link) => {
                link.register_click(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, code: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut links = self.links.write().await;

        match links.iter_mut().find(|l| l.code == code && !l.is_deleted()) {
            Some(link) => {
                link.deleted_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn totals(&self) -> Result<LinkTotals, AppError> {
        let links = self.links.read().await;
        let deleted = links.iter().filter(|l| l.is_deleted()).count() as i64;
        let total = links.len() as i64;

        Ok(LinkTotals {
            total,
            active: total - deleted,
            deleted,
            clicks: links.iter().map(|l| l.clicks).sum(),
        })
    }
}
