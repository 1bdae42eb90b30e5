//! Shared utilities and helper functions for web UI.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use tera::Context;

use crate::api::{analytics, ActionResult, AppState};
use crate::cms::types::Language;
use crate::web_ui::templates;

/// Query parameters every page understands
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub lang: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
}

impl PageQuery {
    /// Requested language, `en` when absent or unsupported
    pub fn language(&self) -> Language {
        self.lang
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(Language::En)
    }
}

/// Flash message carried through a redirect
#[derive(Debug, Serialize)]
pub struct Notice {
    pub status: String,
    pub message: String,
}

/// Context with the language and any pending notice filled in
pub fn page_context(query: &PageQuery) -> Context {
    let mut context = Context::new();
    context.insert("lang", query.language().code());
    if let Some(message) = query.message.as_deref().filter(|m| !m.is_empty()) {
        let status = match query.status.as_deref() {
            Some("ok") => "ok",
            _ => "error",
        };
        context.insert(
            "notice",
            &Notice {
                status: status.to_string(),
                message: message.to_string(),
            },
        );
    }
    context
}

/// Helper to render a template
pub fn render_template(name: &str, context: &Context) -> Response {
    match templates::render(name, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Template error: {}", e)).into_response()
        }
    }
}

/// Helper to render an error page
pub fn render_error(status: StatusCode, message: &str) -> Response {
    let mut context = Context::new();
    context.insert("lang", Language::En.code());
    context.insert("message", message);

    match templates::render("error.html", &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(_) => (status, message.to_string()).into_response(),
    }
}

/// Percent-encode everything outside the unreserved set, for query values and path segments
pub fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Redirect to `path`, reporting `result` as a notice
pub fn redirect_with_result(path: &str, result: &ActionResult) -> Response {
    let separator = if path.contains('?') { '&' } else { '?' };
    let status = if result.success { "ok" } else { "error" };
    Redirect::to(&format!(
        "{}{}status={}&message={}",
        path,
        separator,
        status,
        percent_encode(&result.message)
    ))
    .into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Record a view of `path` with the client details from `headers`
pub async fn record_view(state: &AppState, headers: &HeaderMap, path: &str) {
    let ip = header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim);
    analytics::track_page_view(
        &state.store,
        path,
        ip,
        header_str(headers, "user-agent"),
        header_str(headers, "referer"),
    )
    .await;
}
