//! Link creation, lookup, listing, deletion, and click accounting.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, LinkTotals, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::retry::{Attempt, RetryError, bounded_retry};
use crate::utils::url_validator::validate_target_url;

/// Number of random candidates tried before giving up on code generation.
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Service for creating and retrieving shortened links.
///
/// Stateless apart from its repository handle and the public base URL used
/// to build short URLs; safe to share across requests behind an `Arc`.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// Trailing slashes on `base_url` are dropped.
    pub fn new(link_repository: Arc<dyn LinkRepository>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            link_repository,
            base_url,
        }
    }

    /// Creates a short link.
    ///
    /// # Code Selection
    ///
    /// - If `custom_code` is provided, it is trimmed, validated and used as-is
    /// - Otherwise a random 6-character code is generated, with up to
    ///   [`MAX_GENERATION_ATTEMPTS`] candidates tried on collision
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or custom code is invalid.
    /// Returns [`AppError::Conflict`] if the custom code was ever used before.
    /// Returns [`AppError::Generation`] if every generated candidate collided.
    pub async fn create_short_link(
        &self,
        target_url: &str,
        custom_code: Option<&str>,
    ) -> Result<Link, AppError> {
        let target_url = validate_target_url(target_url)
            .map_err(|e| AppError::bad_request(e.to_string()))?
            .to_string();

        let link = match custom_code {
            Some(custom) => self.create_with_custom_code(target_url, custom.trim()).await?,
            None => self.create_with_generated_code(target_url).await?,
        };

        info!(code = %link.code, "Short link created");
        Ok(link)
    }

    async fn create_with_custom_code(
        &self,
        target_url: String,
        code: &str,
    ) -> Result<Link, AppError> {
        validate_custom_code(code)?;

        if self.link_repository.code_exists(code).await? {
            return Err(AppError::conflict("Code already exists"));
        }

        self.link_repository
            .create(NewLink {
                code: code.to_string(),
                target_url,
            })
            .await
    }

    /// Picks a fresh random code and inserts the link.
    ///
    /// A candidate that passes the existence check but loses the insert race
    /// to a concurrent request counts as a collision too.
    async fn create_with_generated_code(&self, target_url: String) -> Result<Link, AppError> {
        let result = bounded_retry(MAX_GENERATION_ATTEMPTS, || {
            let target_url = target_url.clone();
            async move {
                let code = generate_code();

                match self.link_repository.code_exists(&code).await {
                    Ok(false) => {}
                    Ok(true) => {
                        debug!(code = %code, "Generated code collided");
                        return Err(Attempt::Retry);
                    }
                    Err(e) => return Err(Attempt::Fatal(e)),
                }

                match self
                    .link_repository
                    .create(NewLink { code, target_url })
                    .await
                {
                    Ok(link) => Ok(link),
                    Err(AppError::Conflict(_)) => Err(Attempt::Retry),
                    Err(e) => Err(Attempt::Fatal(e)),
                }
            }
        })
        .await;

        result.map_err(|e| match e {
            RetryError::Exhausted { attempts } => {
                warn!(attempts, "Short code generation exhausted");
                AppError::Generation("Failed to generate code".to_string())
            }
            RetryError::Fatal(e) => e,
        })
    }

    /// Retrieves an active link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or soft-deleted.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Not found"))
    }

    /// Lists active links, newest first.
    ///
    /// A `query` that is blank after trimming returns every active link.
    pub async fn list_links(&self, query: Option<&str>) -> Result<Vec<Link>, AppError> {
        let search = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        self.link_repository.list_active(search).await
    }

    /// Soft-deletes an active link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is unknown or already deleted.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        if !self.link_repository.soft_delete(code, Utc::now()).await? {
            return Err(AppError::not_found("Not found"));
        }

        info!(code, "Short link deleted");
        Ok(())
    }

    /// Counts one redirect through `code`.
    ///
    /// Returns `Ok(false)` if the link vanished (deleted) since it was looked up.
    pub async fn record_click(&self, code: &str) -> Result<bool, AppError> {
        self.link_repository.record_click(code, Utc::now()).await
    }

    /// Aggregate counts over every stored link.
    pub async fn totals(&self) -> Result<LinkTotals, AppError> {
        self.link_repository.totals().await
    }

    /// Public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;

    const BASE_URL: &str = "https://sho.rt";

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, code.to_string(), url.to_string(), Utc::now())
    }

    fn service(repo: MockLinkRepository) -> LinkService {
        LinkService::new(Arc::new(repo), BASE_URL)
    }

    #[tokio::test]
    async fn test_create_short_link_generated_code() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_code_exists()
            .times(1)
            .returning(|_| Ok(false));

        mock_repo
            .expect_create()
            .withf(|new_link| {
                new_link.code.len() == 6
                    && new_link.code.chars().all(|c| c.is_ascii_alphanumeric())
                    && new_link.target_url == "https://example.com"
            })
            .times(1)
            .returning(|new_link| Ok(create_test_link(1, &new_link.code, &new_link.target_url)));

        let link = service(mock_repo)
            .create_short_link("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(link.code.len(), 6);
        assert_eq!(link.target_url, "https://example.com");
        assert_eq!(link.clicks, 0);
        assert!(link.last_clicked_at.is_none());
    }

    #[tokio::test]
    async fn test_create_short_link_trims_url() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo.expect_code_exists().returning(|_| Ok(false));
        mock_repo
            .expect_create()
            .withf(|new_link| new_link.target_url == "https://example.com/a")
            .times(1)
            .returning(|new_link| Ok(create_test_link(1, &new_link.code, &new_link.target_url)));

        let result = service(mock_repo)
            .create_short_link("  https://example.com/a  ", None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_short_link_retries_on_collision() {
        let mut mock_repo = MockLinkRepository::new();
        let mut calls = 0;

        mock_repo
            .expect_code_exists()
            .times(3)
            .returning(move |_| {
                calls += 1;
                Ok(calls < 3)
            });
        mock_repo
            .expect_create()
            .times(1)
            .returning(|new_link| Ok(create_test_link(1, &new_link.code, &new_link.target_url)));

        let result = service(mock_repo)
            .create_short_link("https://example.com", None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_short_link_insert_race_counts_as_collision() {
        let mut mock_repo = MockLinkRepository::new();
        let mut lost_race = false;

        mock_repo
            .expect_code_exists()
            .times(2)
            .returning(|_| Ok(false));
        mock_repo
            .expect_create()
            .times(2)
            .returning(move |new_link| {
                if !lost_race {
                    lost_race = true;
                    return Err(AppError::conflict("Code already exists"));
                }
                Ok(create_test_link(2, &new_link.code, &new_link.target_url))
            });

        let link = service(mock_repo)
            .create_short_link("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(link.id, 2);
    }

    #[tokio::test]
    async fn test_create_short_link_generation_exhausted() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_code_exists()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|_| Ok(true));
        mock_repo.expect_create().times(0);

        let result = service(mock_repo)
            .create_short_link("https://example.com", None)
            .await;

        assert!(matches!(result, Err(AppError::Generation(_))));
    }

    #[tokio::test]
    async fn test_create_short_link_store_failure_is_not_retried() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_code_exists()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error")));
        mock_repo.expect_create().times(0);

        let result = service(mock_repo)
            .create_short_link("https://example.com", None)
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_url() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_code_exists().times(0);
        mock_repo.expect_create().times(0);

        let svc = service(mock_repo);

        for input in ["not a url", "", "   ", "ftp://example.com"] {
            let result = svc.create_short_link(input, None).await;
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_short_link_with_custom_code() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_code_exists()
            .withf(|code| code == "MyCode12")
            .times(1)
            .returning(|_| Ok(false));

        mock_repo
            .expect_create()
            .withf(|new_link| new_link.code == "MyCode12")
            .times(1)
            .returning(|new_link| Ok(create_test_link(10, &new_link.code, &new_link.target_url)));

        let link = service(mock_repo)
            .create_short_link("https://example.com", Some(" MyCode12 "))
            .await
            .unwrap();

        assert_eq!(link.code, "MyCode12");
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_custom_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_code_exists().times(0);
        mock_repo.expect_create().times(0);

        let svc = service(mock_repo);

        for code in ["abc", "abcdefghi", "bad-code", ""] {
            let result = svc.create_short_link("https://example.com", Some(code)).await;
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "{code:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_short_link_custom_code_conflict() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_code_exists()
            .withf(|code| code == "taken123")
            .times(1)
            .returning(|_| Ok(true));
        mock_repo.expect_create().times(0);

        let result = service(mock_repo)
            .create_short_link("https://example.com", Some("taken123"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_active_by_code()
            .withf(|code| code == "gone12")
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_repo).get_link("gone12").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_links_blank_query_means_no_filter() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_list_active()
            .withf(|search| search.is_none())
            .times(2)
            .returning(|_| Ok(vec![]));

        let svc = service(mock_repo);
        svc.list_links(None).await.unwrap();
        svc.list_links(Some("   ")).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_links_trims_query() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_list_active()
            .withf(|search| search.as_deref() == Some("foo"))
            .times(1)
            .returning(|_| Ok(vec![]));

        service(mock_repo).list_links(Some(" foo ")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_link_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_soft_delete()
            .times(1)
            .returning(|_, _| Ok(false));

        let result = service(mock_repo).delete_link("abc123").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_link_success() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_soft_delete()
            .withf(|code, _| code == "abc123")
            .times(1)
            .returning(|_, _| Ok(true));

        assert!(service(mock_repo).delete_link("abc123").await.is_ok());
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let svc = LinkService::new(Arc::new(MockLinkRepository::new()), "http://localhost:3000/");
        assert_eq!(svc.short_url("abc123"), "http://localhost:3000/abc123");
    }
}
