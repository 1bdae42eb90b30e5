//! Content management actions: page content, posts, classes, timeline and
//! admin credentials.

use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::{now_rfc3339, ActionResult};
use crate::cms::types::{
    AboutContent, AdminUser, Class, ClassSchedule, ContactContent, HomeContent, Language,
    LocalizedText, Post, SeoContent, TimelineEvent,
};
use crate::cms::{slugify, ContentStore, CredentialConfig, Edit, StoreResult};

/// Form fields as submitted by the admin editors
pub type FormData = HashMap<String, String>;

fn field<'a>(form: &'a FormData, name: &str) -> &'a str {
    form.get(name).map(String::as_str).unwrap_or("")
}

fn localized(form: &FormData, prefix: &str) -> LocalizedText {
    let mut text = LocalizedText::default();
    for lang in Language::ALL {
        text.set(lang, field(form, &format!("{}-{}", prefix, lang)));
    }
    text
}

/// Split each language's field on `separator` and zip the pieces by position.
/// Shorter lists are padded with empty strings.
fn localized_list(form: &FormData, prefix: &str, separator: char) -> Vec<LocalizedText> {
    let per_lang: Vec<(Language, Vec<&str>)> = Language::ALL
        .iter()
        .map(|&lang| {
            let items = field(form, &format!("{}-{}", prefix, lang))
                .split(separator)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            (lang, items)
        })
        .collect();

    let longest = per_lang.iter().map(|(_, items)| items.len()).max().unwrap_or(0);
    (0..longest)
        .map(|i| {
            let mut text = LocalizedText::default();
            for (lang, items) in &per_lang {
                text.set(*lang, items.get(i).copied().unwrap_or(""));
            }
            text
        })
        .collect()
}

/// Parse a lowercase enum value such as `workshop` or `b1`
fn choice<T: DeserializeOwned>(form: &FormData, name: &str) -> Result<T, ActionResult> {
    let raw = field(form, name);
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| ActionResult::fail(format!("Invalid value for {}: \"{}\"", name, raw)))
}

fn optional_number<T: std::str::FromStr>(form: &FormData, name: &str) -> Result<Option<T>, ActionResult> {
    match field(form, name).trim() {
        "" => Ok(None),
        raw => raw
            .parse()
            .map(Some)
            .map_err(|_| ActionResult::fail(format!("Invalid number for {}: \"{}\"", name, raw))),
    }
}

/// Non-negative amount, decimals allowed
fn optional_price(form: &FormData, name: &str) -> Result<Option<serde_json::Number>, ActionResult> {
    match optional_number::<serde_json::Number>(form, name)? {
        Some(price) if price.as_f64().map_or(true, |p| p < 0.0) => Err(ActionResult::fail(format!(
            "Invalid number for {}: \"{}\"",
            name,
            field(form, name).trim()
        ))),
        price => Ok(price),
    }
}

fn seo(form: &FormData) -> SeoContent {
    SeoContent {
        title: localized(form, "seo-title"),
        description: localized(form, "seo-desc"),
    }
}

/// Report a store result as an action result
fn finish(result: StoreResult<ActionResult>, what: &str, failure: &str) -> ActionResult {
    match result {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to {}: {}", what, e);
            ActionResult::fail(failure)
        }
    }
}

// Page content

pub async fn update_home_content(store: &ContentStore, content: &HomeContent) -> ActionResult {
    let result = store.save_home_content(content).await;
    finish(
        result.map(|_| ActionResult::ok("Home page content updated successfully!")),
        "update home content",
        "Failed to update content.",
    )
}

pub async fn update_about_content(store: &ContentStore, content: &AboutContent) -> ActionResult {
    let result = store.save_about_content(content).await;
    finish(
        result.map(|_| ActionResult::ok("About page content updated successfully!")),
        "update about content",
        "Failed to update content.",
    )
}

pub async fn update_contact_content(store: &ContentStore, content: &ContactContent) -> ActionResult {
    let result = store.save_contact_content(content).await;
    finish(
        result.map(|_| ActionResult::ok("Contact page content updated successfully!")),
        "update contact content",
        "Failed to update content.",
    )
}

pub async fn update_timeline(store: &ContentStore, timeline: &[TimelineEvent]) -> ActionResult {
    let result = store.save_timeline(timeline).await;
    finish(
        result.map(|_| ActionResult::ok("Timeline updated successfully!")),
        "update timeline",
        "Failed to update timeline.",
    )
}

pub async fn update_timeline_event(
    store: &ContentStore,
    index: usize,
    event: &TimelineEvent,
) -> ActionResult {
    let result = store
        .update_timeline(|timeline| match timeline.get_mut(index) {
            Some(slot) => {
                *slot = event.clone();
                Edit::Save(ActionResult::ok("Timeline event updated successfully!"))
            }
            None => Edit::Discard(ActionResult::fail("Timeline event not found.")),
        })
        .await;
    finish(result, "update timeline event", "Failed to update timeline.")
}

pub async fn delete_timeline_event(store: &ContentStore, index: usize) -> ActionResult {
    let result = store
        .update_timeline(|timeline| {
            if index >= timeline.len() {
                return Edit::Discard(ActionResult::fail("Timeline event not found."));
            }
            timeline.remove(index);
            Edit::Save(ActionResult::ok("Timeline event deleted successfully!"))
        })
        .await;
    finish(result, "delete timeline event", "Failed to update timeline.")
}

// Posts

/// Build a post from the editor form. The slug and date are left empty.
pub fn post_from_form(form: &FormData) -> Result<Post, ActionResult> {
    if field(form, "title-en").is_empty() {
        return Err(ActionResult::fail("title_required"));
    }

    Ok(Post {
        slug: String::new(),
        title: localized(form, "title"),
        excerpt: localized(form, "excerpt"),
        content: localized(form, "content"),
        author: field(form, "author").to_string(),
        date: String::new(),
        category: choice(form, "category")?,
        image_url: field(form, "imageUrl").to_string(),
        image_hint: field(form, "imageHint").to_string(),
        tags: localized_list(form, "tags", ','),
        seo: seo(form),
    })
}

pub async fn create_post(store: &ContentStore, form: &FormData) -> ActionResult {
    let mut post = match post_from_form(form) {
        Ok(post) => post,
        Err(rejected) => return rejected,
    };
    post.slug = slugify(field(form, "title-en"));
    post.date = now_rfc3339();

    let result = store
        .update_posts(|posts| {
            if posts.iter().any(|p| p.slug == post.slug) {
                return Edit::Discard(ActionResult::fail(format!(
                    "A post with slug \"{}\" already exists.",
                    post.slug
                )));
            }
            posts.insert(0, post.clone());
            Edit::Save(ActionResult::ok("Post created successfully!").with_slug(&post.slug))
        })
        .await;
    finish(result, "create post", "Failed to create post.")
}

pub async fn update_post(store: &ContentStore, updated: &Post) -> ActionResult {
    let result = store
        .update_posts(|posts| match posts.iter_mut().find(|p| p.slug == updated.slug) {
            Some(slot) => {
                *slot = updated.clone();
                Edit::Save(ActionResult::ok("Post updated successfully!"))
            }
            None => Edit::Discard(ActionResult::fail("Post not found.")),
        })
        .await;
    finish(result, "update post", "Failed to update post.")
}

pub async fn delete_post(store: &ContentStore, slug: &str) -> ActionResult {
    let result = store
        .update_posts(|posts| {
            posts.retain(|p| p.slug != slug);
            Edit::Save(ActionResult::ok("Post deleted successfully!"))
        })
        .await;
    finish(result, "delete post", "Failed to delete post.")
}

// Classes

/// Build a class from the editor form. The slug is left empty.
pub fn class_from_form(form: &FormData) -> Result<Class, ActionResult> {
    if field(form, "title-en").is_empty() {
        return Err(ActionResult::fail("title_required"));
    }

    Ok(Class {
        slug: String::new(),
        title: localized(form, "title"),
        class_type: choice(form, "type")?,
        level: choice(form, "level")?,
        status: choice(form, "status")?,
        excerpt: localized(form, "excerpt"),
        description: localized(form, "description"),
        objectives: localized_list(form, "objectives", '\n'),
        prerequisites: localized_list(form, "prerequisites", '\n'),
        image_url: field(form, "imageUrl").to_string(),
        image_hint: field(form, "imageHint").to_string(),
        schedule: ClassSchedule {
            days: localized(form, "schedule-days"),
            time: field(form, "scheduleTime").to_string(),
        },
        price: optional_price(form, "price")?,
        max_students: optional_number(form, "maxStudents")?,
        seo: seo(form),
    })
}

pub async fn create_class(store: &ContentStore, form: &FormData) -> ActionResult {
    let mut class = match class_from_form(form) {
        Ok(class) => class,
        Err(rejected) => return rejected,
    };
    class.slug = slugify(field(form, "title-en"));

    let result = store
        .update_classes(|classes| {
            if classes.iter().any(|c| c.slug == class.slug) {
                return Edit::Discard(ActionResult::fail(format!(
                    "A class with slug \"{}\" already exists.",
                    class.slug
                )));
            }
            classes.insert(0, class.clone());
            Edit::Save(ActionResult::ok("Class created successfully!").with_slug(&class.slug))
        })
        .await;
    finish(result, "create class", "Failed to create class.")
}

pub async fn update_class(store: &ContentStore, updated: &Class) -> ActionResult {
    let result = store
        .update_classes(|classes| match classes.iter_mut().find(|c| c.slug == updated.slug) {
            Some(slot) => {
                *slot = updated.clone();
                Edit::Save(ActionResult::ok("Class updated successfully!"))
            }
            None => Edit::Discard(ActionResult::fail("Class not found.")),
        })
        .await;
    finish(result, "update class", "Failed to update class.")
}

pub async fn delete_class(store: &ContentStore, slug: &str) -> ActionResult {
    let result = store
        .update_classes(|classes| {
            classes.retain(|c| c.slug != slug);
            Edit::Save(ActionResult::ok("Class deleted successfully!"))
        })
        .await;
    finish(result, "delete class", "Failed to delete class.")
}

// Credentials

pub async fn update_user_credentials(
    store: &ContentStore,
    config: &CredentialConfig,
    form: &FormData,
) -> ActionResult {
    let current_password = field(form, "currentPassword");
    let new_email = field(form, "newEmail");
    let new_password = field(form, "newPassword");
    let confirm_password = field(form, "confirmPassword");

    if current_password.is_empty() || new_email.is_empty() {
        return ActionResult::fail("Missing required fields.");
    }

    let admin = store.resolve_admin_user_with(config).await;
    if admin.password != current_password {
        return ActionResult::fail("Incorrect current password.");
    }

    if !new_password.is_empty() && new_password != confirm_password {
        return ActionResult::fail("New passwords do not match.");
    }

    let updated = AdminUser {
        email: new_email.to_string(),
        password: if new_password.is_empty() {
            admin.password
        } else {
            new_password.to_string()
        },
    };

    let result = store.save_admin_user_with(config, &updated).await;
    finish(
        result.map(|_| ActionResult::ok("Credentials updated successfully!")),
        "update user credentials",
        "Failed to update credentials.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::seed;
    use crate::cms::types::{ClassLevel, ClassType, PostCategory};
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn memory_store() -> ContentStore {
        ContentStore::with_backend(Arc::new(MemoryStorage::new()))
    }

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn post_form(title: &str) -> FormData {
        form(&[
            ("title-en", title),
            ("title-de", "Titel"),
            ("excerpt-en", "Short"),
            ("content-en", "Body"),
            ("author", "Anna"),
            ("category", "tips"),
            ("tags-en", "grammar, cases,"),
            ("tags-de", "Grammatik"),
        ])
    }

    #[test]
    fn test_post_from_form_zips_tags() {
        let post = post_from_form(&post_form("Hello")).unwrap();
        assert_eq!(post.category, PostCategory::Tips);
        assert_eq!(post.title, LocalizedText::new("Hello", "Titel", ""));
        assert_eq!(
            post.tags,
            vec![
                LocalizedText::new("grammar", "Grammatik", ""),
                LocalizedText::new("cases", "", ""),
            ]
        );
    }

    #[test]
    fn test_class_from_form_parses_choices_and_numbers() {
        let class = class_from_form(&form(&[
            ("title-en", "Evening B1"),
            ("type", "group"),
            ("level", "b1"),
            ("status", "active"),
            ("objectives-en", "Speak\n\nWrite\n"),
            ("price", "120"),
            ("maxStudents", ""),
        ]))
        .unwrap();
        assert_eq!(class.class_type, ClassType::Group);
        assert_eq!(class.level, ClassLevel::B1);
        assert_eq!(class.objectives.len(), 2);
        assert_eq!(class.price, Some(120.into()));
        assert_eq!(class.max_students, None);

        let bad = class_from_form(&form(&[("title-en", "X"), ("type", "lecture")])).unwrap_err();
        assert!(!bad.success);
    }

    #[test]
    fn test_class_price_allows_decimals() {
        let priced = |price: &str| {
            class_from_form(&form(&[
                ("title-en", "Evening B1"),
                ("type", "group"),
                ("level", "b1"),
                ("status", "active"),
                ("price", price),
            ]))
        };
        let price = priced("49.5").unwrap().price.unwrap();
        assert_eq!(price.as_f64(), Some(49.5));
        assert_eq!(priced("1500000").unwrap().price, Some(1_500_000.into()));
        assert!(priced("-1").is_err());
        assert!(priced("NaN").is_err());
        assert!(priced("free").is_err());
    }

    #[tokio::test]
    async fn test_create_post_requires_english_title() {
        let store = memory_store();
        let result = create_post(&store, &post_form("")).await;
        assert_eq!(result, ActionResult::fail("title_required"));
    }

    #[tokio::test]
    async fn test_create_post_prepends_and_returns_slug() {
        let store = memory_store();
        let result = create_post(&store, &post_form("Hello, World!")).await;
        assert!(result.success);
        assert_eq!(result.slug.as_deref(), Some("hello-world"));

        let posts = store.get_posts().await;
        assert_eq!(posts.len(), seed().posts.len() + 1);
        assert_eq!(posts[0].slug, "hello-world");
        assert!(!posts[0].date.is_empty());
    }

    #[tokio::test]
    async fn test_create_post_rejects_slug_collision() {
        let store = memory_store();
        assert!(create_post(&store, &post_form("Hello World")).await.success);
        let before = store.get_posts().await.len();

        let result = create_post(&store, &post_form("hello   world")).await;
        assert!(!result.success);
        assert_eq!(result.message, "A post with slug \"hello-world\" already exists.");
        assert_eq!(store.get_posts().await.len(), before);
    }

    #[tokio::test]
    async fn test_update_and_delete_post() {
        let store = memory_store();
        let mut post = store.get_posts().await.remove(0);
        post.author = "Someone Else".into();

        assert!(update_post(&store, &post).await.success);
        assert_eq!(store.get_posts().await[0].author, "Someone Else");

        post.slug = "no-such-post".into();
        assert_eq!(update_post(&store, &post).await, ActionResult::fail("Post not found."));

        let first = store.get_posts().await[0].slug.clone();
        assert!(delete_post(&store, &first).await.success);
        assert!(store.get_posts().await.iter().all(|p| p.slug != first));
    }

    #[tokio::test]
    async fn test_create_class_rejects_collision() {
        let store = memory_store();
        let class_form = form(&[
            ("title-en", "Evening B1"),
            ("type", "group"),
            ("level", "b1"),
            ("status", "active"),
        ]);
        let created = create_class(&store, &class_form).await;
        assert_eq!(created.slug.as_deref(), Some("evening-b1"));

        let result = create_class(&store, &class_form).await;
        assert!(!result.success);
        assert_eq!(result.message, "A class with slug \"evening-b1\" already exists.");
        assert_eq!(store.get_classes().await.len(), seed().classes.len() + 1);
    }

    #[tokio::test]
    async fn test_page_content_replaced_whole() {
        let store = memory_store();
        let mut home = seed().home_content.clone();
        home.slogan = LocalizedText::new("Speak", "Sprich", "");

        let result = update_home_content(&store, &home).await;
        assert!(result.success, "{}", result.message);
        assert_eq!(store.get_home_content().await, home);

        let broken = ContentStore::with_backend(Arc::new(crate::cms::store_tests::BrokenBackend));
        let result = update_home_content(&broken, &home).await;
        assert!(!result.success);
        assert_eq!(result.message, "Failed to update content.");
    }

    #[tokio::test]
    async fn test_timeline_event_by_index() {
        let store = memory_store();
        let len = store.get_timeline().await.len();
        let event = TimelineEvent {
            year: "2030".into(),
            ..Default::default()
        };

        assert!(update_timeline_event(&store, 0, &event).await.success);
        assert_eq!(store.get_timeline().await[0].year, "2030");
        assert!(!update_timeline_event(&store, len, &event).await.success);

        assert!(delete_timeline_event(&store, 0).await.success);
        assert_eq!(store.get_timeline().await.len(), len - 1);
        assert!(!delete_timeline_event(&store, len).await.success);
    }

    #[tokio::test]
    async fn test_update_user_credentials() {
        let store = memory_store();
        let config = CredentialConfig::default();
        let admin = seed().admin_user.clone();

        let missing = update_user_credentials(&store, &config, &form(&[("newEmail", "x@y")])).await;
        assert_eq!(missing.message, "Missing required fields.");

        let wrong = update_user_credentials(
            &store,
            &config,
            &form(&[("currentPassword", "nope"), ("newEmail", "x@y")]),
        )
        .await;
        assert_eq!(wrong.message, "Incorrect current password.");

        let mismatch = update_user_credentials(
            &store,
            &config,
            &form(&[
                ("currentPassword", admin.password.as_str()),
                ("newEmail", "x@y"),
                ("newPassword", "a"),
                ("confirmPassword", "b"),
            ]),
        )
        .await;
        assert_eq!(mismatch.message, "New passwords do not match.");

        // Empty new password keeps the old one
        let ok = update_user_credentials(
            &store,
            &config,
            &form(&[("currentPassword", admin.password.as_str()), ("newEmail", "new@site")]),
        )
        .await;
        assert_eq!(ok, ActionResult::ok("Credentials updated successfully!"));
        let stored = store.resolve_admin_user_with(&config).await;
        assert_eq!(stored.email, "new@site");
        assert_eq!(stored.password, admin.password);
    }
}
