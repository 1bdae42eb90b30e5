//! Login, logout and the admin gate.

use axum::{
    body::Body,
    extract::{Form, Query, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::utils::{percent_encode, page_context, render_template, PageQuery};
use crate::api::auth::{clear_session_cookie, session_cookie, session_from_headers, verify_login};
use crate::api::AppState;

/// Login form data
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub redirect: String,
}

/// Only same-site absolute paths are followed after login. Browsers read
/// `/\host` as `//host`, and control characters cannot go in a header.
fn safe_redirect(target: &str) -> &str {
    let local = target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\");
    if local && !target.chars().any(char::is_control) {
        target
    } else {
        "/admin"
    }
}

/// Login page (GET)
pub async fn login_page(Query(query): Query<HashMap<String, String>>) -> Response {
    let mut context = page_context(&PageQuery::default());
    if let Some(error) = query.get("error") {
        context.insert("error", error);
    }
    context.insert(
        "redirect",
        query.get("redirect").map(String::as_str).unwrap_or("/admin"),
    );
    render_template("login.html", &context)
}

/// Login submit (POST)
pub async fn login_submit(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    let config = state.credential_config();
    if verify_login(&state.store, &config, &form.email, &form.password).await {
        tracing::info!("Admin {} logged in", form.email);
        let mut response = Redirect::to(safe_redirect(&form.redirect)).into_response();
        if let Ok(cookie) = session_cookie(&form.email).parse() {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
        return response;
    }

    Redirect::to(&format!(
        "/login?error={}&redirect={}",
        percent_encode("Invalid email or password."),
        percent_encode(safe_redirect(&form.redirect))
    ))
    .into_response()
}

/// Logout (GET)
pub async fn logout() -> Response {
    Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(header::LOCATION, "/")
        .header(header::SET_COOKIE, clear_session_cookie())
        .body(Body::empty())
        .unwrap_or_else(|_| Redirect::to("/").into_response())
}

/// Send requests for `/admin*` without a session cookie to the login page
pub async fn admin_gate(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if path.starts_with("/admin") && session_from_headers(request.headers()).is_none() {
        tracing::debug!("No session for {}, redirecting to login", path);
        return Redirect::to(&format!("/login?redirect={}", percent_encode(path))).into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_redirect() {
        assert_eq!(safe_redirect("/admin/blog"), "/admin/blog");
        assert_eq!(safe_redirect("//evil.example"), "/admin");
        assert_eq!(safe_redirect("https://evil.example"), "/admin");
        assert_eq!(safe_redirect(""), "/admin");
        assert_eq!(safe_redirect("/\\evil.example"), "/admin");
        assert_eq!(safe_redirect("/admin\r\nX-Injected: 1"), "/admin");
        assert_eq!(safe_redirect("/admin\tblog"), "/admin");
        assert_eq!(safe_redirect("/admin/blog?lang=de"), "/admin/blog?lang=de");
    }
}
