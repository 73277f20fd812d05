//! In-memory author repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Author, AuthorId, PageRequest};
use crate::error::{AppError, Result};
use crate::repository::AuthorRepository;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<AuthorId, Author>,
    next_id: AuthorId,
}

/// Process-local repository; ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryAuthorRepository {
    table: RwLock<Table>,
}

impl InMemoryAuthorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn find_page(&self, request: PageRequest) -> Result<Vec<Author>> {
        let table = self.table.read().await;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);

        Ok(table
            .rows
            .values()
            .skip(offset)
            .take(request.limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn save(&self, author: Author) -> Result<Author> {
        let mut table = self.table.write().await;

        let id = match author.id {
            Some(id) if table.rows.contains_key(&id) => id,
            Some(id) => return Err(AppError::NotFound(format!("author {}", id))),
            None => {
                table.next_id += 1;
                table.next_id
            }
        };

        let saved = author.with_id(id);
        table.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn remove(&self, id: AuthorId) -> Result<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
