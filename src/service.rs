//! Author Service
//!
//! Use cases behind the `/api/authors` endpoints. This is the only layer
//! that touches both the repository and the cache; every mutation commits
//! through the repository first and invalidates the list tag afterwards.

use std::sync::Arc;

use bytes::Bytes;
use futures::FutureExt;
use tracing::{debug, info};

use crate::cache::{ListKey, TagAwareCache};
use crate::domain::{Author, AuthorId, PageRequest};
use crate::error::{AppError, Result};
use crate::models::{AuthorRequest, AuthorView};
use crate::repository::AuthorRepository;

/// Tag shared by every cached author list page.
pub const AUTHOR_CACHE_TAG: &str = "authorCache";

/// Resource kind segment of author list cache keys.
pub const AUTHOR_LIST_KIND: &str = "author";

/// Page size bounds applied to list requests.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 15,
            max_limit: 100,
        }
    }
}

pub struct AuthorService {
    repository: Arc<dyn AuthorRepository>,
    cache: Arc<dyn TagAwareCache>,
    limits: PageLimits,
}

impl AuthorService {
    pub fn new(
        repository: Arc<dyn AuthorRepository>,
        cache: Arc<dyn TagAwareCache>,
        limits: PageLimits,
    ) -> Self {
        Self {
            repository,
            cache,
            limits,
        }
    }

    pub fn cache(&self) -> &Arc<dyn TagAwareCache> {
        &self.cache
    }

    // == List ==
    /// Serialized JSON array of one page of authors, served from the cache
    /// when possible.
    pub async fn list(&self, page: Option<i64>, limit: Option<i64>) -> Result<Bytes> {
        let request =
            PageRequest::from_query(page, limit, self.limits.default_limit, self.limits.max_limit)?;
        let key = ListKey::new(AUTHOR_LIST_KIND, request.page, request.limit).to_string();

        let repository = Arc::clone(&self.repository);
        let producer = async move {
            let authors = repository.find_page(request).await?;
            let views: Vec<AuthorView> = authors.iter().map(AuthorView::from).collect();
            serde_json::to_vec(&views)
                .map(Bytes::from)
                .map_err(|e| AppError::Internal(format!("failed to serialize authors: {}", e)))
        }
        .boxed();

        self.cache.get(&key, &[AUTHOR_CACHE_TAG], producer).await
    }

    // == Find ==
    pub async fn find(&self, id: AuthorId) -> Result<Author> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    // == Create ==
    /// Parses, validates and stores a new author, then drops cached lists.
    pub async fn create(&self, body: &[u8]) -> Result<Author> {
        let author = AuthorRequest::parse(body)?.into_author();
        ensure_valid(&author)?;

        let saved = self.repository.save(author).await?;
        self.invalidate_lists().await;

        info!(id = ?saved.id, "author created");
        Ok(saved)
    }

    // == Update ==
    /// Replaces both names of an existing author. A missing author is
    /// reported before the body is looked at.
    pub async fn update(&self, id: AuthorId, body: &[u8]) -> Result<Author> {
        let mut current = self.find(id).await?;

        let changes = AuthorRequest::parse(body)?;
        changes.apply_to(&mut current);
        ensure_valid(&current)?;

        let saved = self.repository.save(current).await?;
        self.invalidate_lists().await;

        info!(id, "author updated");
        Ok(saved)
    }

    // == Delete ==
    pub async fn delete(&self, id: AuthorId) -> Result<()> {
        if !self.repository.remove(id).await? {
            return Err(not_found(id));
        }
        self.invalidate_lists().await;

        info!(id, "author deleted");
        Ok(())
    }

    async fn invalidate_lists(&self) {
        let removed = self.cache.invalidate_tags(&[AUTHOR_CACHE_TAG]).await;
        debug!(removed, "author list cache invalidated");
    }
}

fn ensure_valid(author: &Author) -> Result<()> {
    let violations = author.validate();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations))
    }
}

fn not_found(id: AuthorId) -> AppError {
    AppError::NotFound(format!("Author {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{NullCache, ReadThroughCache};
    use crate::repository::InMemoryAuthorRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts page queries, optionally slowing each one down.
    #[derive(Default)]
    struct CountingRepository {
        inner: InMemoryAuthorRepository,
        page_queries: AtomicUsize,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl AuthorRepository for CountingRepository {
        async fn find_page(&self, request: PageRequest) -> Result<Vec<Author>> {
            self.page_queries.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.inner.find_page(request).await
        }

        async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>> {
            self.inner.find_by_id(id).await
        }

        async fn save(&self, author: Author) -> Result<Author> {
            self.inner.save(author).await
        }

        async fn remove(&self, id: AuthorId) -> Result<bool> {
            self.inner.remove(id).await
        }
    }

    fn service_with(repository: Arc<CountingRepository>) -> (AuthorService, Arc<ReadThroughCache>) {
        let cache = Arc::new(ReadThroughCache::new(100, None));
        let service = AuthorService::new(repository, cache.clone(), PageLimits::default());
        (service, cache)
    }

    fn names(payload: &Bytes) -> Vec<String> {
        let views: Vec<AuthorView> = serde_json::from_slice(payload).unwrap();
        views.into_iter().map(|v| v.first_name).collect()
    }

    const JANE: &[u8] = br#"{"firstName":"Jane","lastName":"Doe"}"#;

    #[tokio::test]
    async fn test_repeated_list_hits_cache() {
        let repository = Arc::new(CountingRepository::default());
        let (service, cache) = service_with(repository.clone());

        let first = service.list(Some(1), Some(15)).await.unwrap();
        let second = service.list(Some(1), Some(15)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repository.page_queries.load(Ordering::SeqCst), 1);
        assert!(cache.contains("list:author:1:15").await);
    }

    #[tokio::test]
    async fn test_default_and_clamped_limits_share_keys() {
        let repository = Arc::new(CountingRepository::default());
        let (service, cache) = service_with(repository.clone());

        service.list(None, None).await.unwrap();
        service.list(Some(1), Some(15)).await.unwrap();
        service.list(Some(1), Some(5000)).await.unwrap();
        service.list(Some(1), Some(100)).await.unwrap();

        assert_eq!(repository.page_queries.load(Ordering::SeqCst), 2);
        assert_eq!(
            cache.keys_for_tag(AUTHOR_CACHE_TAG).await,
            vec!["list:author:1:100".to_string(), "list:author:1:15".to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_invalidates_lists() {
        let repository = Arc::new(CountingRepository::default());
        let (service, _cache) = service_with(repository.clone());

        assert!(names(&service.list(None, None).await.unwrap()).is_empty());

        let created = service.create(JANE).await.unwrap();
        assert_eq!(created.id, Some(1));

        assert_eq!(names(&service.list(None, None).await.unwrap()), vec!["Jane"]);
        assert_eq!(repository.page_queries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_create_keeps_cache() {
        let repository = Arc::new(CountingRepository::default());
        let (service, cache) = service_with(repository.clone());
        service.list(None, None).await.unwrap();

        let result = service.create(br#"{"firstName":"","lastName":"Doe"}"#).await;
        assert!(matches!(result, Err(AppError::Validation(v)) if v[0].field == "firstName"));

        let result = service.create(b"not json").await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));

        assert!(cache.contains("list:author:1:15").await);
        assert_eq!(repository.inner.len().await, 0);
    }

    #[tokio::test]
    async fn test_update_flow() {
        let repository = Arc::new(CountingRepository::default());
        let (service, cache) = service_with(repository.clone());
        service.create(JANE).await.unwrap();
        service.list(None, None).await.unwrap();

        let result = service.update(1, br#"{"firstName":"Janet","lastName":"   "}"#).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(cache.contains("list:author:1:15").await);
        assert_eq!(service.find(1).await.unwrap().first_name, "Jane");

        let result = service.update(2, JANE).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        service
            .update(1, br#"{"firstName":"Janet","lastName":"Doe"}"#)
            .await
            .unwrap();
        assert!(!cache.contains("list:author:1:15").await);
        assert_eq!(names(&service.list(None, None).await.unwrap()), vec!["Janet"]);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let repository = Arc::new(CountingRepository::default());
        let (service, cache) = service_with(repository.clone());
        service.create(JANE).await.unwrap();
        service.list(None, None).await.unwrap();

        assert!(matches!(service.delete(9).await, Err(AppError::NotFound(_))));
        assert!(cache.contains("list:author:1:15").await);

        service.delete(1).await.unwrap();
        assert!(names(&service.list(None, None).await.unwrap()).is_empty());
        assert!(matches!(service.find(1).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_lists_query_once() {
        let repository = Arc::new(CountingRepository {
            delay: Some(Duration::from_millis(50)),
            ..Default::default()
        });
        let (service, _cache) = service_with(repository.clone());
        let service = Arc::new(service);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.list(Some(1), Some(15)).await })
            })
            .collect();

        let mut payloads = Vec::new();
        for handle in handles {
            payloads.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(repository.page_queries.load(Ordering::SeqCst), 1);
        assert!(payloads.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[tokio::test]
    async fn test_null_cache_always_queries() {
        let repository = Arc::new(CountingRepository::default());
        let service =
            AuthorService::new(repository.clone(), Arc::new(NullCache::new()), PageLimits::default());

        service.list(None, None).await.unwrap();
        service.list(None, None).await.unwrap();

        assert_eq!(repository.page_queries.load(Ordering::SeqCst), 2);
    }
}
