//! One getter/setter pair per CMS entity.
//!
//! Each pair binds a fixed key to the accessor and writer with its seed
//! default. Nothing here validates shapes; the actions layer does that.

use super::seed::seed;
use super::store::{ContentStore, Edit, StoreResult};
use super::types::{
    AboutContent, Class, ClassRegistration, ContactContent, ContactMessage, HomeContent,
    PageView, Post, TimelineEvent,
};

/// Blob keys under the `cms` namespace
pub mod keys {
    pub const HOME: &str = "homeContent.json";
    pub const ABOUT: &str = "aboutContent.json";
    pub const CONTACT: &str = "contactContent.json";
    pub const ADMIN_USER: &str = "adminUser.json";
    pub const POSTS: &str = "posts.json";
    pub const CLASSES: &str = "classes.json";
    pub const TIMELINE: &str = "timeline.json";
    pub const REGISTRATIONS: &str = "registrations.json";
    pub const MESSAGES: &str = "messages.json";
    pub const ANALYTICS: &str = "analytics.json";
}

impl ContentStore {
    // Page content. `load_*` variants fail on read errors instead of
    // falling back to the seed, for editors that would save the value back.

    pub async fn get_home_content(&self) -> HomeContent {
        self.fetch(keys::HOME, seed().home_content.clone()).await.into_value()
    }

    pub async fn load_home_content(&self) -> StoreResult<HomeContent> {
        self.fetch(keys::HOME, seed().home_content.clone()).await.into_result()
    }

    pub async fn save_home_content(&self, content: &HomeContent) -> StoreResult<()> {
        self.write(keys::HOME, content).await
    }

    pub async fn get_about_content(&self) -> AboutContent {
        self.fetch(keys::ABOUT, seed().about_content.clone()).await.into_value()
    }

    pub async fn load_about_content(&self) -> StoreResult<AboutContent> {
        self.fetch(keys::ABOUT, seed().about_content.clone()).await.into_result()
    }

    pub async fn save_about_content(&self, content: &AboutContent) -> StoreResult<()> {
        self.write(keys::ABOUT, content).await
    }

    pub async fn get_contact_content(&self) -> ContactContent {
        self.fetch(keys::CONTACT, seed().contact_content.clone()).await.into_value()
    }

    pub async fn load_contact_content(&self) -> StoreResult<ContactContent> {
        self.fetch(keys::CONTACT, seed().contact_content.clone()).await.into_result()
    }

    pub async fn save_contact_content(&self, content: &ContactContent) -> StoreResult<()> {
        self.write(keys::CONTACT, content).await
    }

    // Collections

    pub async fn get_posts(&self) -> Vec<Post> {
        self.fetch(keys::POSTS, seed().posts.clone()).await.into_value()
    }

    pub async fn load_posts(&self) -> StoreResult<Vec<Post>> {
        self.fetch(keys::POSTS, seed().posts.clone()).await.into_result()
    }

    pub async fn save_posts(&self, posts: &[Post]) -> StoreResult<()> {
        self.write(keys::POSTS, &posts).await
    }

    pub async fn update_posts<R, F>(&self, edit: F) -> StoreResult<R>
    where
        F: FnMut(&mut Vec<Post>) -> Edit<R>,
    {
        self.update(keys::POSTS, seed().posts.clone(), edit).await
    }

    pub async fn get_classes(&self) -> Vec<Class> {
        self.fetch(keys::CLASSES, seed().classes.clone()).await.into_value()
    }

    pub async fn load_classes(&self) -> StoreResult<Vec<Class>> {
        self.fetch(keys::CLASSES, seed().classes.clone()).await.into_result()
    }

    pub async fn save_classes(&self, classes: &[Class]) -> StoreResult<()> {
        self.write(keys::CLASSES, &classes).await
    }

    pub async fn update_classes<R, F>(&self, edit: F) -> StoreResult<R>
    where
        F: FnMut(&mut Vec<Class>) -> Edit<R>,
    {
        self.update(keys::CLASSES, seed().classes.clone(), edit).await
    }

    pub async fn get_timeline(&self) -> Vec<TimelineEvent> {
        self.fetch(keys::TIMELINE, seed().timeline.clone()).await.into_value()
    }

    pub async fn load_timeline(&self) -> StoreResult<Vec<TimelineEvent>> {
        self.fetch(keys::TIMELINE, seed().timeline.clone()).await.into_result()
    }

    pub async fn save_timeline(&self, timeline: &[TimelineEvent]) -> StoreResult<()> {
        self.write(keys::TIMELINE, &timeline).await
    }

    pub async fn update_timeline<R, F>(&self, edit: F) -> StoreResult<R>
    where
        F: FnMut(&mut Vec<TimelineEvent>) -> Edit<R>,
    {
        self.update(keys::TIMELINE, seed().timeline.clone(), edit).await
    }

    pub async fn get_registrations(&self) -> Vec<ClassRegistration> {
        self.fetch(keys::REGISTRATIONS, seed().registrations.clone())
            .await
            .into_value()
    }

    pub async fn save_registrations(&self, registrations: &[ClassRegistration]) -> StoreResult<()> {
        self.write(keys::REGISTRATIONS, &registrations).await
    }

    pub async fn update_registrations<R, F>(&self, edit: F) -> StoreResult<R>
    where
        F: FnMut(&mut Vec<ClassRegistration>) -> Edit<R>,
    {
        self.update(keys::REGISTRATIONS, seed().registrations.clone(), edit)
            .await
    }

    pub async fn get_messages(&self) -> Vec<ContactMessage> {
        self.fetch(keys::MESSAGES, seed().messages.clone()).await.into_value()
    }

    pub async fn save_messages(&self, messages: &[ContactMessage]) -> StoreResult<()> {
        self.write(keys::MESSAGES, &messages).await
    }

    pub async fn update_messages<R, F>(&self, edit: F) -> StoreResult<R>
    where
        F: FnMut(&mut Vec<ContactMessage>) -> Edit<R>,
    {
        self.update(keys::MESSAGES, seed().messages.clone(), edit).await
    }

    pub async fn get_analytics(&self) -> Vec<PageView> {
        self.fetch(keys::ANALYTICS, seed().analytics.clone()).await.into_value()
    }

    pub async fn save_analytics(&self, views: &[PageView]) -> StoreResult<()> {
        self.write(keys::ANALYTICS, &views).await
    }

    pub async fn update_analytics<R, F>(&self, edit: F) -> StoreResult<R>
    where
        F: FnMut(&mut Vec<PageView>) -> Edit<R>,
    {
        self.update(keys::ANALYTICS, seed().analytics.clone(), edit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::types::{ClassLevel, ClassSchedule, ClassStatus, ClassType, LocalizedText, SeoContent};
    use crate::storage::{BlobBackend, MemoryStorage};
    use std::sync::Arc;

    fn memory_store() -> (ContentStore, Arc<MemoryStorage>) {
        let backend = Arc::new(MemoryStorage::new());
        (ContentStore::with_backend(backend.clone()), backend)
    }

    fn registration(id: &str) -> ClassRegistration {
        ClassRegistration {
            id: id.to_string(),
            name: format!("Student {}", id),
            email: format!("{}@example.com", id),
            phone: "123".into(),
            class_name: "A1".into(),
            class_slug: "a1-beginner-course".into(),
            submitted_at: "2024-06-01T10:00:00Z".into(),
            german_level: None,
            learning_goal: None,
            motivation: None,
        }
    }

    fn class(slug: &str) -> Class {
        Class {
            slug: slug.to_string(),
            title: LocalizedText::new(slug, slug, slug),
            class_type: ClassType::Group,
            level: ClassLevel::A2,
            status: ClassStatus::Active,
            excerpt: LocalizedText::default(),
            description: LocalizedText::default(),
            objectives: vec![],
            prerequisites: vec![],
            image_url: String::new(),
            image_hint: String::new(),
            schedule: ClassSchedule::default(),
            price: None,
            max_students: None,
            seo: SeoContent::default(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_posts_ignore_saves() {
        let store = ContentStore::unconfigured();
        let posts = store.get_posts().await;
        assert_eq!(posts, seed().posts);

        store.save_posts(&[]).await.unwrap();
        assert_eq!(store.get_posts().await, seed().posts);
    }

    #[tokio::test]
    async fn test_home_content_seeded_on_first_read() {
        let (store, backend) = memory_store();

        let first = store.get_home_content().await;
        assert_eq!(first, seed().home_content);
        assert_eq!(backend.write_count(), 1);
        assert!(backend.head("cms", keys::HOME).await.is_ok());

        let second = store.get_home_content().await;
        assert_eq!(second, first);
        assert_eq!(backend.write_count(), 1);
    }

    #[tokio::test]
    async fn test_entities_live_under_their_own_keys() {
        let (store, backend) = memory_store();
        store.get_posts().await;
        store.get_classes().await;
        store.get_timeline().await;
        store.get_registrations().await;
        store.get_messages().await;
        store.get_analytics().await;
        store.get_about_content().await;
        store.get_contact_content().await;

        for key in [
            "aboutContent.json",
            "analytics.json",
            "classes.json",
            "contactContent.json",
            "messages.json",
            "posts.json",
            "registrations.json",
            "timeline.json",
        ] {
            assert!(backend.head("cms", key).await.is_ok(), "{} not seeded", key);
        }
        assert!(backend.head("cms", "homeContent.json").await.is_err());
        assert_eq!(backend.write_count(), 8);
    }

    #[tokio::test]
    async fn test_unserialized_writers_lose_updates() {
        // Two editors each read the list, append their class, and save the whole list
        let (store, _backend) = memory_store();
        store.save_classes(&[class("existing")]).await.unwrap();

        let mut first = store.get_classes().await;
        let mut second = store.get_classes().await;

        first.push(class("from-first"));
        second.push(class("from-second"));
        store.save_classes(&first).await.unwrap();
        store.save_classes(&second).await.unwrap();

        let slugs: Vec<String> = store.get_classes().await.into_iter().map(|c| c.slug).collect();
        assert_eq!(slugs, vec!["existing", "from-second"]);
    }

    #[tokio::test]
    async fn test_versioned_updates_keep_both_writers() {
        let (store, _backend) = memory_store();
        store.save_classes(&[class("existing")]).await.unwrap();

        let (a, b) = tokio::join!(
            store.update_classes(|list| {
                list.push(class("from-first"));
                Edit::Save(())
            }),
            store.update_classes(|list| {
                list.push(class("from-second"));
                Edit::Save(())
            }),
        );
        a.unwrap();
        b.unwrap();

        let mut slugs: Vec<String> = store.get_classes().await.into_iter().map(|c| c.slug).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["existing", "from-first", "from-second"]);
    }

    #[tokio::test]
    async fn test_registration_delete_by_id_keeps_others() {
        let (store, _backend) = memory_store();
        store
            .save_registrations(&[registration("c"), registration("a"), registration("b")])
            .await
            .unwrap();

        store
            .update_registrations(|list| {
                list.retain(|r| r.id != "a");
                Edit::Save(())
            })
            .await
            .unwrap();

        let ids: Vec<String> = store.get_registrations().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }
}
