//! Repository Module
//!
//! Persistence port for authors and its implementations.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::domain::{Author, AuthorId, PageRequest};
use crate::error::Result;

pub use memory::InMemoryAuthorRepository;
pub use sqlite::{create_pool, SqliteAuthorRepository};

// == Author Repository ==
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// One page of authors ordered by id.
    async fn find_page(&self, request: PageRequest) -> Result<Vec<Author>>;

    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>>;

    /// Inserts an author without id, or overwrites the stored one with the
    /// same id. Returns the saved author with its id set.
    ///
    /// Saving an id that does not exist yields `AppError::NotFound`.
    async fn save(&self, author: Author) -> Result<Author>;

    /// Deletes by id. Returns false when nothing was deleted.
    async fn remove(&self, id: AuthorId) -> Result<bool>;
}
