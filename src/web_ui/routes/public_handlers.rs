//! Public site pages and the two visitor forms.

use axum::{
    extract::{Form, Path, Query, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use super::utils::{page_context, record_view, redirect_with_result, render_template, PageQuery};
use crate::api::inbox::{self, NewMessage, NewRegistration};
use crate::api::AppState;
use crate::error::{Result, ServerError};

/// Posts shown on the home page
const RECENT_POSTS: usize = 3;

/// Registration form as posted from a class page
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub german_level: Option<String>,
    #[serde(default)]
    pub learning_goal: Option<String>,
    #[serde(default)]
    pub motivation: Option<String>,
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    record_view(&state, &headers, "/").await;

    let mut context = page_context(&query);
    let home = state.store.get_home_content().await;
    let mut posts = state.store.get_posts().await;
    posts.truncate(RECENT_POSTS);

    context.insert("home", &home);
    context.insert("recent_posts", &posts);
    render_template("home.html", &context)
}

pub async fn about(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    record_view(&state, &headers, "/about").await;

    let mut context = page_context(&query);
    context.insert("about", &state.store.get_about_content().await);
    context.insert("timeline", &state.store.get_timeline().await);
    render_template("about.html", &context)
}

pub async fn blog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    record_view(&state, &headers, "/blog").await;

    let mut context = page_context(&query);
    context.insert("posts", &state.store.get_posts().await);
    render_template("blog.html", &context)
}

pub async fn post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let post = state
        .store
        .get_posts()
        .await
        .into_iter()
        .find(|p| p.slug == slug)
        .ok_or_else(|| ServerError::PostNotFound(slug.clone()))?;

    record_view(&state, &headers, &format!("/blog/{}", slug)).await;

    let mut context = page_context(&query);
    context.insert("post", &post);
    Ok(render_template("post.html", &context))
}

pub async fn classes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    record_view(&state, &headers, "/classes").await;

    let mut context = page_context(&query);
    context.insert("classes", &state.store.get_classes().await);
    render_template("classes.html", &context)
}

pub async fn class_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let class = state
        .store
        .get_classes()
        .await
        .into_iter()
        .find(|c| c.slug == slug)
        .ok_or_else(|| ServerError::ClassNotFound(slug.clone()))?;

    record_view(&state, &headers, &format!("/classes/{}", slug)).await;

    let mut context = page_context(&query);
    context.insert("class", &class);
    Ok(render_template("class.html", &context))
}

pub async fn register_for_class(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response> {
    let class = state
        .store
        .get_classes()
        .await
        .into_iter()
        .find(|c| c.slug == slug)
        .ok_or_else(|| ServerError::ClassNotFound(slug.clone()))?;

    let result = inbox::save_class_registration(
        &state.store,
        NewRegistration {
            name: form.name,
            email: form.email,
            phone: form.phone,
            class_name: class.title.get(query.language()).to_string(),
            class_slug: class.slug,
            german_level: form.german_level,
            learning_goal: form.learning_goal,
            motivation: form.motivation,
        },
    )
    .await;

    let back = format!("/classes/{}?lang={}", slug, query.language());
    Ok(redirect_with_result(&back, &result))
}

pub async fn contact(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    record_view(&state, &headers, "/contact").await;

    let mut context = page_context(&query);
    context.insert("contact", &state.store.get_contact_content().await);
    render_template("contact.html", &context)
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    Form(form): Form<NewMessage>,
) -> Response {
    let result = inbox::save_contact_message(&state.store, form).await;
    redirect_with_result(&format!("/contact?lang={}", query.language()), &result)
}
