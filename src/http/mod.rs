//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the page, download and status endpoints
//! - Form handling for the list and download branches
//! - HTML rendering of the single page
//! - Request logging middleware

pub mod handlers;
pub mod middleware;
pub mod page;
pub mod routes;

pub use routes::create_router;
