//! Content store for the site.
//!
//! A thin typed layer over blob storage: every entity is one JSON blob under
//! `cms/`, seeded from embedded defaults on first read.

mod credentials;
mod domain;
mod seed;
mod slug;
mod store;
pub mod types;

pub use credentials::{select_credential_source, CredentialConfig, CredentialSource};
pub use domain::keys;
pub use seed::{seed, SeedData};
pub use slug::slugify;
pub use store::{blob_path, ContentStore, Edit, Fetched, StoreError, StoreResult, MAX_UPDATE_ATTEMPTS};

#[cfg(test)]
pub(crate) use store::tests as store_tests;
