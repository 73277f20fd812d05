//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Purges expired list pages from the cache

mod cleanup;

pub use cleanup::spawn_cleanup_task;
