//! HTTP layer.
//!
//! - **[`handlers`]**: axum route handlers for the upload form and the
//!   PDF download route

pub mod handlers;
