//! Domain records persisted by the content store.
//!
//! Field names serialize in camelCase so the blobs keep the layout the site
//! has always written (`cms/posts.json` etc).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported site languages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    De,
    Fa,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::De, Language::Fa];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Fa => "fa",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "de" => Ok(Language::De),
            "fa" => Ok(Language::Fa),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Text in every supported language. Missing keys read back as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedText {
    pub en: String,
    pub de: String,
    pub fa: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, de: impl Into<String>, fa: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            de: de.into(),
            fa: fa.into(),
        }
    }

    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.en,
            Language::De => &self.de,
            Language::Fa => &self.fa,
        }
    }

    pub fn set(&mut self, lang: Language, value: impl Into<String>) {
        let slot = match lang {
            Language::En => &mut self.en,
            Language::De => &mut self.de,
            Language::Fa => &mut self.fa,
        };
        *slot = value.into();
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoContent {
    pub title: LocalizedText,
    pub description: LocalizedText,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    Language,
    Culture,
    Tips,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: LocalizedText,
    pub excerpt: LocalizedText,
    pub content: LocalizedText,
    pub author: String,
    /// RFC 3339 publish timestamp
    pub date: String,
    pub category: PostCategory,
    pub image_url: String,
    pub image_hint: String,
    pub tags: Vec<LocalizedText>,
    pub seo: SeoContent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    Private,
    Group,
    Workshop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    Active,
    Full,
    Inactive,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSchedule {
    pub days: LocalizedText,
    pub time: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub slug: String,
    pub title: LocalizedText,
    #[serde(rename = "type")]
    pub class_type: ClassType,
    pub level: ClassLevel,
    pub status: ClassStatus,
    pub excerpt: LocalizedText,
    pub description: LocalizedText,
    pub objectives: Vec<LocalizedText>,
    pub prerequisites: Vec<LocalizedText>,
    pub image_url: String,
    pub image_hint: String,
    pub schedule: ClassSchedule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Whole or fractional amount, kept as written
    pub price: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_students: Option<u32>,
    pub seo: SeoContent,
}

/// One entry of the about page timeline. Identity is its list position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub year: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeContent {
    pub slogan: LocalizedText,
    pub sub_slogan: LocalizedText,
    pub cta_classes: LocalizedText,
    pub cta_free_course: LocalizedText,
    pub mission_title: LocalizedText,
    pub mission_text: LocalizedText,
    pub manifesto_title: LocalizedText,
    pub manifesto_text: LocalizedText,
    pub recent_posts_title: LocalizedText,
    pub read_more: LocalizedText,
    pub cta_title: LocalizedText,
    pub cta_text: LocalizedText,
    pub seo: SeoContent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    pub title: LocalizedText,
    pub story: LocalizedText,
    pub qualifications_title: LocalizedText,
    pub testdaf_title: LocalizedText,
    pub testdaf_description: LocalizedText,
    pub timeline_title: LocalizedText,
    pub seo: SeoContent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactContent {
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub contact_info: LocalizedText,
    pub email: String,
    pub address: LocalizedText,
    pub linkedin_url: String,
    pub telegram_url: String,
    pub seo: SeoContent,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminUser")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRegistration {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub class_name: String,
    pub class_slug: String,
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub german_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub submitted_at: String,
}

/// Append-only analytics record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub path: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub ip: String,
    pub user_agent: String,
    pub referrer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_text_missing_keys_default_to_empty() {
        let text: LocalizedText = serde_json::from_str(r#"{"en":"Hello"}"#).unwrap();
        assert_eq!(text.get(Language::En), "Hello");
        assert_eq!(text.get(Language::De), "");
        assert_eq!(text.get(Language::Fa), "");

        // Always written with every language key
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json, serde_json::json!({"en": "Hello", "de": "", "fa": ""}));
    }

    #[test]
    fn test_class_wire_names() {
        let class = Class {
            slug: "a1".into(),
            title: LocalizedText::default(),
            class_type: ClassType::Workshop,
            level: ClassLevel::B1,
            status: ClassStatus::Full,
            excerpt: LocalizedText::default(),
            description: LocalizedText::default(),
            objectives: vec![],
            prerequisites: vec![],
            image_url: "img".into(),
            image_hint: "hint".into(),
            schedule: ClassSchedule::default(),
            price: None,
            max_students: Some(8),
            seo: SeoContent::default(),
        };
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["type"], "workshop");
        assert_eq!(json["level"], "b1");
        assert_eq!(json["status"], "full");
        assert_eq!(json["imageUrl"], "img");
        assert_eq!(json["maxStudents"], 8);
        assert!(json.get("price").is_none());

        // Stored prices may be whole or fractional
        let mut stored = json;
        stored["price"] = serde_json::json!(49.5);
        let decoded: Class = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(decoded.price.and_then(|p| p.as_f64()), Some(49.5));
        stored["price"] = serde_json::json!(120);
        let decoded: Class = serde_json::from_value(stored).unwrap();
        assert_eq!(serde_json::to_value(&decoded).unwrap()["price"].to_string(), "120");
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("fa".parse::<Language>().unwrap(), Language::Fa);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::De.to_string(), "de");
    }

    #[test]
    fn test_admin_user_debug_hides_password() {
        let user = AdminUser {
            email: "a@b.c".into(),
            password: "secret".into(),
        };
        assert!(!format!("{:?}", user).contains("secret"));
    }
}
