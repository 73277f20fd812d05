//! Request DTOs for the authors API
//!
//! Defines the structure of incoming query strings and bodies.

use serde::Deserialize;

use crate::domain::Author;
use crate::error::{AppError, Result};

/// Query string of `GET /api/authors`.
///
/// Values are kept signed so that `page=0` or `limit=-1` reach the
/// pagination checks and get a descriptive error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Body of `POST /api/authors` and `PUT /api/authors/:id`.
///
/// Missing names deserialize as None and are reported by validation
/// rather than as a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl AuthorRequest {
    /// Parses a JSON body, mapping syntax errors to `InvalidRequest`.
    pub fn parse(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| AppError::InvalidRequest(format!("Invalid JSON body: {}", e)))
    }

    /// Builds an unsaved author.
    pub fn into_author(self) -> Author {
        Author::new(
            self.first_name.unwrap_or_default(),
            self.last_name.unwrap_or_default(),
        )
    }

    /// Overwrites both names of `author`; absent names become empty.
    pub fn apply_to(self, author: &mut Author) {
        author.first_name = self.first_name.unwrap_or_default();
        author.last_name = self.last_name.unwrap_or_default();
    }
}
