//! Admin credential resolution.
//!
//! `ADMIN_EMAIL` and `ADMIN_PASSWORD` win whenever both are set. Otherwise the
//! credentials come from the `cms/adminUser.json` blob. The source is picked
//! again on every call.

use super::domain::keys;
use super::seed::seed;
use super::store::{ContentStore, StoreResult};
use super::types::AdminUser;

/// Admin credentials as found in process configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CredentialConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CredentialConfig {
    pub fn new(email: Option<&str>, password: Option<&str>) -> Self {
        Self {
            email: email.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            email: var("ADMIN_EMAIL"),
            password: var("ADMIN_PASSWORD"),
        }
    }
}

/// Where the authoritative admin credentials live
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    Config(AdminUser),
    Blob,
}

pub fn select_credential_source(config: &CredentialConfig) -> CredentialSource {
    match (&config.email, &config.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            CredentialSource::Config(AdminUser {
                email: email.clone(),
                password: password.clone(),
            })
        }
        _ => CredentialSource::Blob,
    }
}

impl ContentStore {
    /// Resolve the admin user using the current environment
    pub async fn resolve_admin_user(&self) -> AdminUser {
        self.resolve_admin_user_with(&CredentialConfig::from_env())
            .await
    }

    pub async fn resolve_admin_user_with(&self, config: &CredentialConfig) -> AdminUser {
        match select_credential_source(config) {
            CredentialSource::Config(user) => user,
            CredentialSource::Blob => {
                tracing::warn!(
                    "ADMIN_EMAIL or ADMIN_PASSWORD not set. Falling back to blob storage for the admin user; not recommended for production."
                );
                self.fetch(keys::ADMIN_USER, seed().admin_user.clone())
                    .await
                    .into_value()
            }
        }
    }

    /// Save the admin user using the current environment
    pub async fn save_admin_user(&self, user: &AdminUser) -> StoreResult<()> {
        self.save_admin_user_with(&CredentialConfig::from_env(), user)
            .await
    }

    /// Persist `user` unless configuration is authoritative, in which case
    /// the write is skipped.
    pub async fn save_admin_user_with(
        &self,
        config: &CredentialConfig,
        user: &AdminUser,
    ) -> StoreResult<()> {
        match select_credential_source(config) {
            CredentialSource::Config(_) => {
                tracing::warn!("Cannot save admin user while it is defined by environment variables.");
                Ok(())
            }
            CredentialSource::Blob => self.write(keys::ADMIN_USER, user).await,
        }
    }
}
