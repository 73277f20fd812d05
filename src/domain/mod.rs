//! Domain Module
//!
//! The author entity and list pagination.

mod author;
mod pagination;

pub use author::{Author, AuthorId, MAX_NAME_LENGTH};
pub use pagination::PageRequest;
