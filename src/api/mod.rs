//! Server actions.
//!
//! Every mutation the site performs goes through here and reports back with an
//! [`ActionResult`]; store failures are logged and turned into
//! `success = false` rather than propagated to the page.

pub mod analytics;
pub mod auth;
pub mod content;
pub mod inbox;

use serde::Serialize;

use crate::cms::{ContentStore, CredentialConfig};

/// Application state shared across handlers
pub struct AppState {
    pub store: ContentStore,
    /// Fixed admin credentials. `None` re-reads the environment on every call.
    pub credentials: Option<CredentialConfig>,
    /// Host name of this site, used to recognise internal referrers
    pub site_host: Option<String>,
}

impl AppState {
    pub fn new(store: ContentStore) -> Self {
        Self {
            store,
            credentials: None,
            site_host: None,
        }
    }

    pub fn with_credentials(mut self, credentials: CredentialConfig) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_site_host(mut self, host: impl Into<String>) -> Self {
        self.site_host = Some(host.into());
        self
    }

    pub fn credential_config(&self) -> CredentialConfig {
        self.credentials
            .clone()
            .unwrap_or_else(CredentialConfig::from_env)
    }
}

/// Outcome of a server action as shown to the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            slug: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Id for a new inbox record: RFC 3339 timestamp plus a random suffix
pub(crate) fn new_record_id(now: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", now, &suffix[..9])
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
