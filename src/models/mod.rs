//! Request and Response models for the authors API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{AuthorRequest, ListQuery};
pub use responses::{AuthorView, HealthResponse, StatsResponse};
