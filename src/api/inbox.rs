//! Contact messages and class registrations submitted by visitors.

use serde::Deserialize;

use super::{new_record_id, now_rfc3339, ActionResult};
use crate::cms::types::{ClassRegistration, ContactMessage};
use crate::cms::{ContentStore, Edit};

/// Contact form submission
#[derive(Clone, Debug, Deserialize)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

/// Class registration form submission
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub class_slug: String,
    #[serde(default)]
    pub german_level: Option<String>,
    #[serde(default)]
    pub learning_goal: Option<String>,
    #[serde(default)]
    pub motivation: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn save_contact_message(store: &ContentStore, data: NewMessage) -> ActionResult {
    let now = now_rfc3339();
    let message = ContactMessage {
        id: new_record_id(&now),
        name: data.name,
        email: data.email,
        subject: data.subject,
        message: data.message,
        submitted_at: now,
    };

    let result = store
        .update_messages(|messages| {
            messages.insert(0, message.clone());
            Edit::Save(())
        })
        .await;

    match result {
        Ok(()) => ActionResult::ok("Message sent successfully!"),
        Err(e) => {
            tracing::error!("Failed to save contact message: {}", e);
            ActionResult::fail("An unknown error occurred.")
        }
    }
}

pub async fn delete_contact_message(store: &ContentStore, id: &str) -> ActionResult {
    let result = store
        .update_messages(|messages| {
            messages.retain(|m| m.id != id);
            Edit::Save(())
        })
        .await;

    match result {
        Ok(()) => ActionResult::ok("Message deleted successfully."),
        Err(e) => {
            tracing::error!("Failed to delete contact message: {}", e);
            ActionResult::fail("Failed to delete message.")
        }
    }
}

pub async fn save_class_registration(store: &ContentStore, data: NewRegistration) -> ActionResult {
    let now = now_rfc3339();
    let registration = ClassRegistration {
        id: new_record_id(&now),
        name: data.name,
        email: data.email,
        phone: data.phone,
        class_name: data.class_name,
        class_slug: data.class_slug,
        submitted_at: now,
        german_level: non_empty(data.german_level),
        learning_goal: non_empty(data.learning_goal),
        motivation: non_empty(data.motivation),
    };

    let result = store
        .update_registrations(|registrations| {
            registrations.insert(0, registration.clone());
            Edit::Save(())
        })
        .await;

    match result {
        Ok(()) => ActionResult::ok("Registration successful!"),
        Err(e) => {
            tracing::error!("Failed to save class registration: {}", e);
            ActionResult::fail("An unknown error occurred.")
        }
    }
}

pub async fn delete_class_registration(store: &ContentStore, id: &str) -> ActionResult {
    let result = store
        .update_registrations(|registrations| {
            registrations.retain(|r| r.id != id);
            Edit::Save(())
        })
        .await;

    match result {
        Ok(()) => ActionResult::ok("Registration deleted successfully."),
        Err(e) => {
            tracing::error!("Failed to delete class registration: {}", e);
            ActionResult::fail("Failed to delete registration.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::store_tests::BrokenBackend;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn memory_store() -> ContentStore {
        ContentStore::with_backend(Arc::new(MemoryStorage::new()))
    }

    fn registration(name: &str) -> NewRegistration {
        NewRegistration {
            name: name.to_string(),
            email: format!("{}@example.com", name),
            phone: String::new(),
            class_name: "A1 Beginner".into(),
            class_slug: "a1-beginner-course".into(),
            german_level: Some("  ".into()),
            learning_goal: Some("Move to Berlin".into()),
            motivation: None,
        }
    }

    #[tokio::test]
    async fn test_messages_newest_first_with_generated_ids() {
        let store = memory_store();
        for name in ["first", "second"] {
            let result = save_contact_message(
                &store,
                NewMessage {
                    name: name.into(),
                    email: "v@example.com".into(),
                    subject: "Hi".into(),
                    message: "Hello".into(),
                },
            )
            .await;
            assert_eq!(result, ActionResult::ok("Message sent successfully!"));
        }

        let messages = store.get_messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].name, "second");
        assert_ne!(messages[0].id, messages[1].id);
        assert!(messages[0].id.starts_with(&messages[0].submitted_at));
        assert_eq!(messages[0].id.len(), messages[0].submitted_at.len() + 9);
    }

    #[tokio::test]
    async fn test_delete_registration_removes_only_that_id() {
        let store = memory_store();
        for name in ["ana", "ben", "cem"] {
            assert!(save_class_registration(&store, registration(name)).await.success);
        }
        let before = store.get_registrations().await;
        let target = before[1].id.clone();

        let result = delete_class_registration(&store, &target).await;
        assert_eq!(result, ActionResult::ok("Registration deleted successfully."));

        let after = store.get_registrations().await;
        let names: Vec<&str> = after.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["cem", "ana"]);
        assert!(after.iter().all(|r| r.id != target));
    }

    #[tokio::test]
    async fn test_blank_optional_answers_are_dropped() {
        let store = memory_store();
        save_class_registration(&store, registration("ana")).await;
        let stored = &store.get_registrations().await[0];
        assert_eq!(stored.german_level, None);
        assert_eq!(stored.learning_goal.as_deref(), Some("Move to Berlin"));
    }

    #[tokio::test]
    async fn test_store_failure_reported_not_raised() {
        let store = ContentStore::with_backend(Arc::new(BrokenBackend));
        let result = delete_contact_message(&store, "anything").await;
        assert_eq!(result, ActionResult::fail("Failed to delete message."));
    }
}
