//! Web UI Module
//!
//! Server-rendered public site and admin area. Pages read straight from the
//! content store on every request; forms call the actions in [`crate::api`].

mod routes;
mod templates;

use axum::Router;
use std::sync::Arc;

use crate::api::AppState;

pub use routes::render_error;

/// Create the web UI router.
/// Mount this with `.merge(web_ui::router())` in main.rs
pub fn router() -> Router<Arc<AppState>> {
    routes::create_router()
}
