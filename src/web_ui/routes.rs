//! Web UI route table.

mod admin_handlers;
mod auth_handlers;
mod public_handlers;
mod utils;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::AppState;

pub use utils::render_error;

/// Create the site router: public pages, login and the gated admin area
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public site
        .route("/", get(public_handlers::home))
        .route("/about", get(public_handlers::about))
        .route("/blog", get(public_handlers::blog))
        .route("/blog/:slug", get(public_handlers::post))
        .route("/classes", get(public_handlers::classes))
        .route(
            "/classes/:slug",
            get(public_handlers::class_detail).post(public_handlers::register_for_class),
        )
        .route(
            "/contact",
            get(public_handlers::contact).post(public_handlers::send_message),
        )
        // Session
        .route(
            "/login",
            get(auth_handlers::login_page).post(auth_handlers::login_submit),
        )
        .route("/logout", get(auth_handlers::logout).post(auth_handlers::logout))
        .merge(admin_router())
        .layer(middleware::from_fn(auth_handlers::admin_gate))
}

fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(admin_handlers::dashboard))
        // Blog
        .route("/admin/blog", get(admin_handlers::posts))
        .route(
            "/admin/blog/new",
            get(admin_handlers::new_post).post(admin_handlers::create_post),
        )
        .route(
            "/admin/blog/edit/:slug",
            get(admin_handlers::edit_post).post(admin_handlers::update_post),
        )
        .route("/admin/blog/delete/:slug", post(admin_handlers::delete_post))
        // Classes
        .route("/admin/classes", get(admin_handlers::classes))
        .route(
            "/admin/classes/new",
            get(admin_handlers::new_class).post(admin_handlers::create_class),
        )
        .route(
            "/admin/classes/edit/:slug",
            get(admin_handlers::edit_class).post(admin_handlers::update_class),
        )
        .route("/admin/classes/delete/:slug", post(admin_handlers::delete_class))
        // Page content
        .route(
            "/admin/content/edit/:page",
            get(admin_handlers::edit_content).post(admin_handlers::update_content),
        )
        .route(
            "/admin/content/timeline/:index",
            post(admin_handlers::update_timeline_event),
        )
        .route(
            "/admin/content/timeline/:index/delete",
            post(admin_handlers::delete_timeline_event),
        )
        // Inbox
        .route("/admin/messages", get(admin_handlers::messages))
        .route("/admin/messages/delete/:id", post(admin_handlers::delete_message))
        .route("/admin/registrations", get(admin_handlers::registrations))
        .route(
            "/admin/registrations/delete/:id",
            post(admin_handlers::delete_registration),
        )
        // Settings
        .route("/admin/settings", get(admin_handlers::settings))
        .route(
            "/admin/settings/account",
            get(admin_handlers::account).post(admin_handlers::update_account),
        )
}
