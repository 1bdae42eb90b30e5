//! Admin area: dashboard, editors and inbox.
//!
//! Record and page edits are posted as a single `payload` field holding the
//! JSON of the whole record; new posts and classes use the field-per-language
//! forms.

use axum::{
    extract::{Form, Path, Query, State},
    response::Response,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Context;

use super::utils::{page_context, percent_encode, redirect_with_result, render_template, PageQuery};
use crate::api::content::{self, FormData};
use crate::api::{analytics, inbox, ActionResult, AppState};
use crate::cms::types::{
    AboutContent, Class, ContactContent, HomeContent, Language, Post, TimelineEvent,
};
use crate::cms::{select_credential_source, CredentialSource};
use crate::error::{Result, ServerError};

/// JSON editor submission
#[derive(Deserialize)]
pub struct PayloadForm {
    pub payload: String,
}

#[derive(Serialize)]
struct Counts {
    posts: usize,
    classes: usize,
    messages: usize,
    registrations: usize,
}

fn parse_payload<T: DeserializeOwned>(form: &PayloadForm) -> std::result::Result<T, ActionResult> {
    serde_json::from_str(&form.payload)
        .map_err(|e| ActionResult::fail(format!("Invalid JSON payload: {}", e)))
}

fn json_editor(query: &PageQuery, heading: &str, action: &str, value: &impl Serialize) -> Result<Response> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    let mut context = page_context(query);
    context.insert("heading", heading);
    context.insert("action", action);
    context.insert("payload", &payload);
    Ok(render_template("admin/json_editor.html", &context))
}

fn language_codes() -> Vec<&'static str> {
    Language::ALL.iter().map(Language::code).collect()
}

pub async fn dashboard(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    let store = &state.store;
    let summary = analytics::get_analytics_data(store, state.site_host.as_deref()).await;
    let counts = Counts {
        posts: store.get_posts().await.len(),
        classes: store.get_classes().await.len(),
        messages: store.get_messages().await.len(),
        registrations: store.get_registrations().await.len(),
    };

    let mut context = page_context(&query);
    context.insert("analytics", &summary);
    context.insert("counts", &counts);
    render_template("admin/dashboard.html", &context)
}

// Posts

pub async fn posts(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    let mut context = page_context(&query);
    context.insert("posts", &state.store.get_posts().await);
    render_template("admin/posts.html", &context)
}

pub async fn new_post(Query(query): Query<PageQuery>) -> Response {
    let mut context = page_context(&query);
    context.insert("languages", &language_codes());
    render_template("admin/new_post.html", &context)
}

pub async fn create_post(State(state): State<Arc<AppState>>, Form(form): Form<FormData>) -> Response {
    let result = content::create_post(&state.store, &form).await;
    match &result.slug {
        Some(slug) if result.success => {
            redirect_with_result(&format!("/admin/blog/edit/{}", percent_encode(slug)), &result)
        }
        _ => redirect_with_result("/admin/blog/new", &result),
    }
}

pub async fn edit_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let post = state
        .store
        .load_posts()
        .await?
        .into_iter()
        .find(|p| p.slug == slug)
        .ok_or_else(|| ServerError::PostNotFound(slug.clone()))?;

    json_editor(
        &query,
        &format!("Edit post: {}", post.title.en),
        &format!("/admin/blog/edit/{}", percent_encode(&slug)),
        &post,
    )
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Form(form): Form<PayloadForm>,
) -> Response {
    let back = format!("/admin/blog/edit/{}", percent_encode(&slug));
    let mut post: Post = match parse_payload(&form) {
        Ok(post) => post,
        Err(rejected) => return redirect_with_result(&back, &rejected),
    };
    // The slug is the post's identity and comes from the URL
    post.slug = slug;
    let result = content::update_post(&state.store, &post).await;
    redirect_with_result(&back, &result)
}

pub async fn delete_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let result = content::delete_post(&state.store, &slug).await;
    redirect_with_result("/admin/blog", &result)
}

// Classes

pub async fn classes(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    let mut context = page_context(&query);
    context.insert("classes", &state.store.get_classes().await);
    render_template("admin/classes.html", &context)
}

pub async fn new_class(Query(query): Query<PageQuery>) -> Response {
    let mut context = page_context(&query);
    context.insert("languages", &language_codes());
    render_template("admin/new_class.html", &context)
}

pub async fn create_class(State(state): State<Arc<AppState>>, Form(form): Form<FormData>) -> Response {
    let result = content::create_class(&state.store, &form).await;
    match &result.slug {
        Some(slug) if result.success => {
            redirect_with_result(&format!("/admin/classes/edit/{}", percent_encode(slug)), &result)
        }
        _ => redirect_with_result("/admin/classes/new", &result),
    }
}

pub async fn edit_class(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let class = state
        .store
        .load_classes()
        .await?
        .into_iter()
        .find(|c| c.slug == slug)
        .ok_or_else(|| ServerError::ClassNotFound(slug.clone()))?;

    json_editor(
        &query,
        &format!("Edit class: {}", class.title.en),
        &format!("/admin/classes/edit/{}", percent_encode(&slug)),
        &class,
    )
}

pub async fn update_class(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Form(form): Form<PayloadForm>,
) -> Response {
    let back = format!("/admin/classes/edit/{}", percent_encode(&slug));
    let mut class: Class = match parse_payload(&form) {
        Ok(class) => class,
        Err(rejected) => return redirect_with_result(&back, &rejected),
    };
    class.slug = slug;
    let result = content::update_class(&state.store, &class).await;
    redirect_with_result(&back, &result)
}

pub async fn delete_class(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let result = content::delete_class(&state.store, &slug).await;
    redirect_with_result("/admin/classes", &result)
}

// Page content

/// Editable singleton pages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContentPage {
    Home,
    About,
    Contact,
    Timeline,
}

impl ContentPage {
    fn parse(page: &str) -> Result<Self> {
        match page {
            "home" => Ok(ContentPage::Home),
            "about" => Ok(ContentPage::About),
            "contact" => Ok(ContentPage::Contact),
            "timeline" => Ok(ContentPage::Timeline),
            other => Err(ServerError::PageNotFound(other.to_string())),
        }
    }
}

pub async fn edit_content(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let action = format!("/admin/content/edit/{}", page);
    let store = &state.store;
    match ContentPage::parse(&page)? {
        ContentPage::Home => json_editor(&query, "Home page", &action, &store.load_home_content().await?),
        ContentPage::About => json_editor(&query, "About page", &action, &store.load_about_content().await?),
        ContentPage::Contact => {
            json_editor(&query, "Contact page", &action, &store.load_contact_content().await?)
        }
        ContentPage::Timeline => json_editor(&query, "Timeline", &action, &store.load_timeline().await?),
    }
}

pub async fn update_content(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
    Form(form): Form<PayloadForm>,
) -> Result<Response> {
    let back = format!("/admin/content/edit/{}", page);
    let store = &state.store;
    let result = match ContentPage::parse(&page)? {
        ContentPage::Home => match parse_payload::<HomeContent>(&form) {
            Ok(home) => content::update_home_content(store, &home).await,
            Err(rejected) => rejected,
        },
        ContentPage::About => match parse_payload::<AboutContent>(&form) {
            Ok(about) => content::update_about_content(store, &about).await,
            Err(rejected) => rejected,
        },
        ContentPage::Contact => match parse_payload::<ContactContent>(&form) {
            Ok(contact) => content::update_contact_content(store, &contact).await,
            Err(rejected) => rejected,
        },
        ContentPage::Timeline => match parse_payload::<Vec<TimelineEvent>>(&form) {
            Ok(timeline) => content::update_timeline(store, &timeline).await,
            Err(rejected) => rejected,
        },
    };
    Ok(redirect_with_result(&back, &result))
}

pub async fn update_timeline_event(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Form(form): Form<PayloadForm>,
) -> Response {
    let result = match parse_payload::<TimelineEvent>(&form) {
        Ok(event) => content::update_timeline_event(&state.store, index, &event).await,
        Err(rejected) => rejected,
    };
    redirect_with_result("/admin/content/edit/timeline", &result)
}

pub async fn delete_timeline_event(State(state): State<Arc<AppState>>, Path(index): Path<usize>) -> Response {
    let result = content::delete_timeline_event(&state.store, index).await;
    redirect_with_result("/admin/content/edit/timeline", &result)
}

// Inbox

pub async fn messages(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    let mut context = page_context(&query);
    context.insert("messages", &state.store.get_messages().await);
    render_template("admin/messages.html", &context)
}

pub async fn delete_message(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let result = inbox::delete_contact_message(&state.store, &id).await;
    redirect_with_result("/admin/messages", &result)
}

pub async fn registrations(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    let mut context = page_context(&query);
    context.insert("registrations", &state.store.get_registrations().await);
    render_template("admin/registrations.html", &context)
}

pub async fn delete_registration(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let result = inbox::delete_class_registration(&state.store, &id).await;
    redirect_with_result("/admin/registrations", &result)
}

// Settings

fn settings_context(state: &AppState, query: &PageQuery) -> Context {
    let from_config = matches!(
        select_credential_source(&state.credential_config()),
        CredentialSource::Config(_)
    );
    let mut context = page_context(query);
    context.insert("storage_configured", &state.store.is_configured());
    context.insert("credentials_from_config", &from_config);
    context
}

pub async fn settings(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    render_template("admin/settings.html", &settings_context(&state, &query))
}

pub async fn account(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    let admin = state
        .store
        .resolve_admin_user_with(&state.credential_config())
        .await;
    let mut context = settings_context(&state, &query);
    context.insert("email", &admin.email);
    render_template("admin/account.html", &context)
}

pub async fn update_account(State(state): State<Arc<AppState>>, Form(form): Form<FormData>) -> Response {
    let config = state.credential_config();
    let result = content::update_user_credentials(&state.store, &config, &form).await;
    redirect_with_result("/admin/settings/account", &result)
}
