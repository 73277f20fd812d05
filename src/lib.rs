//! Authors API - paginated author listing behind a tag-invalidated cache
//!
//! List pages are served through a read-through cache that coalesces
//! concurrent misses per key. Every write invalidates all cached list pages
//! through a shared tag.

pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use service::{AuthorService, AUTHOR_CACHE_TAG};
pub use tasks::spawn_cleanup_task;
