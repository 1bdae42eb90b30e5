//! Default content used to bootstrap empty blobs.
//!
//! The seed ships inside the binary as JSON so editors can change it without
//! touching Rust code.

use once_cell::sync::Lazy;
use serde::Deserialize;

use super::types::{
    AboutContent, AdminUser, Class, ClassRegistration, ContactContent, ContactMessage,
    HomeContent, PageView, Post, TimelineEvent,
};

const SEED_JSON: &str = include_str!("seed.json");

/// The initial state of every CMS blob
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub home_content: HomeContent,
    pub about_content: AboutContent,
    pub contact_content: ContactContent,
    pub admin_user: AdminUser,
    pub posts: Vec<Post>,
    pub classes: Vec<Class>,
    pub timeline: Vec<TimelineEvent>,
    pub registrations: Vec<ClassRegistration>,
    pub messages: Vec<ContactMessage>,
    pub analytics: Vec<PageView>,
}

static SEED: Lazy<SeedData> =
    Lazy::new(|| serde_json::from_str(SEED_JSON).expect("Embedded seed data is invalid"));

/// Shared view of the embedded seed
pub fn seed() -> &'static SeedData {
    &SEED
}
