//! API Module
//!
//! HTTP handlers and routing for the authors REST API.
//!
//! # Endpoints
//! - `GET /api/authors` - Paginated author list
//! - `POST /api/authors` - Create an author
//! - `GET /api/authors/:id` - Fetch one author
//! - `PUT /api/authors/:id` - Update an author
//! - `DELETE /api/authors/:id` - Delete an author
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
