//! Admin login check and the session cookie it hands out.

use axum::http::HeaderMap;
use url::form_urlencoded;

use crate::cms::{ContentStore, CredentialConfig};

/// Cookie whose presence opens the admin area
pub const AUTH_COOKIE: &str = "auth-token";
/// Session length in seconds
pub const SESSION_MAX_AGE: u64 = 24 * 60 * 60;

/// Compare the submitted credentials against the resolved admin user
pub async fn verify_login(
    store: &ContentStore,
    config: &CredentialConfig,
    email: &str,
    password: &str,
) -> bool {
    let admin = store.resolve_admin_user_with(config).await;
    let ok = admin.email == email && admin.password == password;
    if !ok {
        tracing::info!("Rejected admin login for {}", email);
    }
    ok
}

/// Session cookie for `email`. The value is form-encoded so `;`, `,` and
/// spaces cannot end it early.
pub fn session_cookie(email: &str) -> String {
    let value: String = form_urlencoded::byte_serialize(email.as_bytes()).collect();
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        AUTH_COOKIE, value, SESSION_MAX_AGE
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; SameSite=Lax", AUTH_COOKIE)
}

/// Value of the session cookie, if the request carries one
pub fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all("cookie") {
        let Ok(cookie_header) = value.to_str() else {
            continue;
        };
        for part in cookie_header.split(';') {
            if let Some((name, value)) = part.trim().split_once('=') {
                if name == AUTH_COOKIE && !value.is_empty() {
                    // A bare token parses as a lone key
                    return form_urlencoded::parse(value.as_bytes())
                        .next()
                        .map(|(email, _)| email.into_owned());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::seed;
    use crate::storage::MemoryStorage;
    use axum::http::HeaderValue;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_verify_login_against_blob_user() {
        let store = ContentStore::with_backend(Arc::new(MemoryStorage::new()));
        let config = CredentialConfig::default();
        let admin = seed().admin_user.clone();

        assert!(verify_login(&store, &config, &admin.email, &admin.password).await);
        assert!(!verify_login(&store, &config, &admin.email, "wrong").await);
        assert!(!verify_login(&store, &config, "other@example.com", &admin.password).await);
    }

    #[tokio::test]
    async fn test_verify_login_prefers_configured_user() {
        let store = ContentStore::unconfigured();
        let config = CredentialConfig::new(Some("env@site"), Some("s3cret"));
        assert!(verify_login(&store, &config, "env@site", "s3cret").await);
        assert!(!verify_login(&store, &config, "admin@example.com", "password").await);
    }

    #[test]
    fn test_session_cookie_round_trip() {
        assert_eq!(
            session_cookie("a@b.c"),
            "auth-token=a%40b.c; Path=/; Max-Age=86400; SameSite=Lax"
        );

        let mut headers = HeaderMap::new();
        assert_eq!(session_from_headers(&headers), None);

        headers.insert("cookie", HeaderValue::from_static("theme=dark; auth-token=a@b.c"));
        assert_eq!(session_from_headers(&headers).as_deref(), Some("a@b.c"));

        headers.insert("cookie", HeaderValue::from_static("auth-token="));
        assert_eq!(session_from_headers(&headers), None);
    }

    #[test]
    fn test_session_cookie_survives_separators_in_email() {
        let email = "x; y,z@b.c";
        let cookie = session_cookie(email);
        let (pair, attributes) = cookie.split_once("; ").unwrap();
        assert_eq!(pair, "auth-token=x%3B+y%2Cz%40b.c");
        assert_eq!(attributes, "Path=/; Max-Age=86400; SameSite=Lax");

        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_str(pair).unwrap());
        assert_eq!(session_from_headers(&headers).as_deref(), Some(email));
    }
}
