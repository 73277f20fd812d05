//! SQLite author repository backed by sqlx.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use crate::domain::{Author, AuthorId, PageRequest};
use crate::error::{AppError, Result};
use crate::repository::AuthorRepository;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL
)"#;

/// Opens a pool for `database_url`, creating the database file if needed.
///
/// `sqlite::memory:` gets a single connection that is never recycled, since
/// every connection to it would otherwise see its own empty database.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Storage(format!("invalid database URL {}: {}", database_url, e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    let in_memory = database_url.contains(":memory:");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;
    Ok(pool)
}

#[derive(Debug, sqlx::FromRow)]
struct AuthorRow {
    id: i64,
    first_name: String,
    last_name: String,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Author::new(row.first_name, row.last_name).with_id(row.id)
    }
}

pub struct SqliteAuthorRepository {
    pool: SqlitePool,
}

impl SqliteAuthorRepository {
    /// Wraps `pool` and makes sure the `authors` table exists.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        info!("authors table ready");
        Ok(Self { pool })
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::new(create_pool(database_url).await?).await
    }
}

#[async_trait]
impl AuthorRepository for SqliteAuthorRepository {
    async fn find_page(&self, request: PageRequest) -> Result<Vec<Author>> {
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let rows: Vec<AuthorRow> = sqlx::query_as(
            "SELECT id, first_name, last_name FROM authors ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(i64::from(request.limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>> {
        let row: Option<AuthorRow> =
            sqlx::query_as("SELECT id, first_name, last_name FROM authors WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Author::from))
    }

    async fn save(&self, author: Author) -> Result<Author> {
        match author.id {
            None => {
                let result =
                    sqlx::query("INSERT INTO authors (first_name, last_name) VALUES (?, ?)")
                        .bind(&author.first_name)
                        .bind(&author.last_name)
                        .execute(&self.pool)
                        .await?;
                Ok(author.with_id(result.last_insert_rowid()))
            }
            Some(id) => {
                let result =
                    sqlx::query("UPDATE authors SET first_name = ?, last_name = ? WHERE id = ?")
                        .bind(&author.first_name)
                        .bind(&author.last_name)
                        .bind(id)
                        .execute(&self.pool)
                        .await?;
                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound(format!("author {}", id)));
                }
                Ok(author)
            }
        }
    }

    async fn remove(&self, id: AuthorId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
