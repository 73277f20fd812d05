//! API Handlers
//!
//! HTTP request handlers for the authors endpoints. Each handler is a thin
//! adapter over `AuthorService`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::cache::{NullCache, ReadThroughCache, TagAwareCache};
use crate::config::Config;
use crate::domain::AuthorId;
use crate::error::{AppError, Result};
use crate::models::{AuthorView, HealthResponse, ListQuery, StatsResponse};
use crate::repository::{AuthorRepository, InMemoryAuthorRepository, SqliteAuthorRepository};
use crate::service::{AuthorService, PageLimits};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub authors: Arc<AuthorService>,
    /// Absolute base for `Location` headers, without trailing slash
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(authors: AuthorService, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            authors: Arc::new(authors),
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Builds the state with an in-memory repository, ignoring
    /// `database_url`.
    pub fn in_memory(config: &Config) -> Self {
        Self::assemble(config, Arc::new(InMemoryAuthorRepository::new()))
    }

    /// Builds the state from configuration, connecting to SQLite when
    /// `database_url` is set.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let repository: Arc<dyn AuthorRepository> = match &config.database_url {
            Some(url) => {
                info!("Using SQLite repository at {}", url);
                Arc::new(SqliteAuthorRepository::connect(url).await?)
            }
            None => {
                info!("DATABASE_URL not set, using in-memory repository");
                Arc::new(InMemoryAuthorRepository::new())
            }
        };
        Ok(Self::assemble(config, repository))
    }

    fn assemble(config: &Config, repository: Arc<dyn AuthorRepository>) -> Self {
        let cache: Arc<dyn TagAwareCache> = if config.cache_enabled {
            Arc::new(ReadThroughCache::from_config(config))
        } else {
            info!("Cache disabled, every list read goes to the repository");
            Arc::new(NullCache::new())
        };
        let limits = PageLimits {
            default_limit: config.default_page_limit,
            max_limit: config.max_page_limit,
        };

        Self::new(
            AuthorService::new(repository, cache, limits),
            config.public_base_url.clone(),
        )
    }

    pub fn cache(&self) -> Arc<dyn TagAwareCache> {
        Arc::clone(self.authors.cache())
    }

    fn location_of(&self, id: AuthorId) -> String {
        format!("{}/api/authors/{}", self.base_url, id)
    }
}

/// Handler for GET /api/authors?page=&limit=
///
/// Returns the cached JSON array as is.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let payload = state.authors.list(query.page, query.limit).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], payload).into_response())
}

/// Handler for GET /api/authors/:id
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<AuthorId>,
) -> Result<Json<AuthorView>> {
    let author = state.authors.find(id).await?;
    Ok(Json(AuthorView::from(&author)))
}

/// Handler for POST /api/authors
///
/// Responds 201 with the created author and a `Location` header.
pub async fn create_handler(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let author = state.authors.create(&body).await?;
    let id = author
        .id
        .ok_or_else(|| AppError::Internal("saved author has no id".to_string()))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, state.location_of(id))],
        Json(AuthorView::from(&author)),
    )
        .into_response())
}

/// Handler for PUT /api/authors/:id
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<AuthorId>,
    body: Bytes,
) -> Result<StatusCode> {
    state.authors.update(id, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/authors/:id
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<AuthorId>,
) -> Result<StatusCode> {
    state.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache().stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::in_memory(&Config::default())
    }

    fn body(json: &'static str) -> Bytes {
        Bytes::from_static(json.as_bytes())
    }

    #[tokio::test]
    async fn test_create_sets_location() {
        let state = test_state();

        let response = create_handler(
            State(state.clone()),
            body(r#"{"firstName":"Jane","lastName":"Doe"}"#),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::LOCATION],
            "http://localhost:3000/api/authors/1"
        );
    }

    #[tokio::test]
    async fn test_get_missing_author() {
        let result = get_handler(State(test_state()), Path(1)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete_return_no_content() {
        let state = test_state();
        create_handler(
            State(state.clone()),
            body(r#"{"firstName":"Jane","lastName":"Doe"}"#),
        )
        .await
        .unwrap();

        let status = update_handler(
            State(state.clone()),
            Path(1),
            body(r#"{"firstName":"Janet","lastName":"Doe"}"#),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let status = delete_handler(State(state.clone()), Path(1)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        list_handler(State(state.clone()), Query(ListQuery::default()))
            .await
            .unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.misses, 1);
        assert_eq!(response.total_entries, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = Config {
            public_base_url: "https://api.example.com/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            AppState::in_memory(&config).location_of(5),
            "https://api.example.com/api/authors/5"
        );
    }
}
