//! Content drafts, library items, and the small vocabulary enums shared by
//! every crate (platform, content type, language, tone, business type).

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Tiktok,
    Facebook,
    Twitter,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Facebook,
        Platform::Twitter,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "instagram" | "ig" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::Tiktok),
            "facebook" | "fb" => Ok(Platform::Facebook),
            "twitter" | "x" => Ok(Platform::Twitter),
            _ => Err(CoreError::InvalidPlatform(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Image,
    Video,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Image => write!(f, "image"),
            ContentType::Video => write!(f, "video"),
        }
    }
}

impl FromStr for ContentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(ContentType::Image),
            "video" => Ok(ContentType::Video),
            _ => Err(CoreError::InvalidContentType(s.to_string())),
        }
    }
}

/// Output language for generated copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en", alias = "English")]
    English,
    #[serde(rename = "am", alias = "Amharic")]
    Amharic,
}

impl Language {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Amharic => "am",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "am" | "amharic" => Ok(Language::Amharic),
            _ => Err(CoreError::InvalidLanguage(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Playful,
    Professional,
    Casual,
    Elegant,
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tone::Playful => write!(f, "playful"),
            Tone::Professional => write!(f, "professional"),
            Tone::Casual => write!(f, "casual"),
            Tone::Elegant => write!(f, "elegant"),
        }
    }
}

impl FromStr for Tone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "playful" => Ok(Tone::Playful),
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            "elegant" => Ok(Tone::Elegant),
            _ => Err(CoreError::InvalidTone(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessType {
    Cafe,
    Retail,
    Salon,
    Photography,
}

impl std::fmt::Display for BusinessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessType::Cafe => write!(f, "cafe"),
            BusinessType::Retail => write!(f, "retail"),
            BusinessType::Salon => write!(f, "salon"),
            BusinessType::Photography => write!(f, "photography"),
        }
    }
}

impl FromStr for BusinessType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cafe" | "café" => Ok(BusinessType::Cafe),
            "retail" => Ok(BusinessType::Retail),
            "salon" => Ok(BusinessType::Salon),
            "photography" => Ok(BusinessType::Photography),
            _ => Err(CoreError::InvalidBusinessType(s.to_string())),
        }
    }
}

/// One shot of a storyboard: how long it plays and the text shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryboardShot {
    /// Duration in seconds.
    pub duration: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// A draft before the store has assigned its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDraft {
    pub title: String,
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub platform: Platform,
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storyboard: Option<Vec<StoryboardShot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlays: Option<Vec<Overlay>>,
}

/// A persisted draft. `id` and `created_at` are assigned by the draft store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDraft {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub content: NewDraft,
}

impl ContentDraft {
    #[must_use]
    pub fn new(content: NewDraft, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            content,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Draft,
    Scheduled,
    Published,
}

impl std::fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftStatus::Draft => write!(f, "draft"),
            DraftStatus::Scheduled => write!(f, "scheduled"),
            DraftStatus::Published => write!(f, "published"),
        }
    }
}

impl FromStr for DraftStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(DraftStatus::Draft),
            "scheduled" => Ok(DraftStatus::Scheduled),
            "published" => Ok(DraftStatus::Published),
            _ => Err(CoreError::InvalidStatus(s.to_string())),
        }
    }
}

/// Display-only engagement counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u64,
    pub comments: u64,
    pub views: u64,
}

/// A draft kept in the library, with its publishing status and the
/// optimistic-concurrency `version` token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryItem {
    #[serde(flatten)]
    pub draft: ContentDraft,
    pub status: DraftStatus,
    #[serde(default)]
    pub engagement: Engagement,
    pub version: u64,
}

impl LibraryItem {
    /// Wraps a freshly saved draft as a library entry at version 1.
    #[must_use]
    pub fn from_draft(draft: ContentDraft) -> Self {
        Self {
            draft,
            status: DraftStatus::Draft,
            engagement: Engagement::default(),
            version: 1,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.draft.id
    }
}

/// A partial update for a library item. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryPatch {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub overlays: Option<Vec<Overlay>>,
    pub status: Option<DraftStatus>,
    pub engagement: Option<Engagement>,
}

impl LibraryPatch {
    #[must_use]
    pub fn status(status: DraftStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch in place and bumps the item's version.
    pub fn apply(self, item: &mut LibraryItem) {
        let content = &mut item.draft.content;
        if let Some(title) = self.title {
            content.title = title;
        }
        if let Some(caption) = self.caption {
            content.caption = caption;
        }
        if let Some(hashtags) = self.hashtags {
            content.hashtags = hashtags;
        }
        if let Some(image_url) = self.image_url {
            content.image_url = Some(image_url);
        }
        if let Some(video_url) = self.video_url {
            content.video_url = Some(video_url);
        }
        if let Some(overlays) = self.overlays {
            content.overlays = Some(overlays);
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(engagement) = self.engagement {
            item.engagement = engagement;
        }
        item.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_draft() -> NewDraft {
        NewDraft {
            title: "Caramel Macadamia Latte".to_string(),
            caption: "Try our new latte!".to_string(),
            hashtags: vec!["Latte".to_string()],
            image_url: Some("https://cdn.example.com/latte.png".to_string()),
            video_url: None,
            platform: Platform::Instagram,
            content_type: ContentType::Image,
            storyboard: None,
            overlays: None,
        }
    }

    #[test]
    fn platform_parses_aliases_case_insensitively() {
        assert_eq!("Instagram".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
        assert!(matches!(
            "myspace".parse::<Platform>(),
            Err(CoreError::InvalidPlatform(_))
        ));
    }

    #[test]
    fn language_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::Amharic).unwrap(), "\"am\"");
        let parsed: Language = serde_json::from_str("\"English\"").unwrap();
        assert_eq!(parsed, Language::English);
    }

    #[test]
    fn content_draft_flattens_content_fields() {
        let draft = ContentDraft::new(sample_new_draft(), Uuid::new_v4(), Utc::now());
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["caption"], "Try our new latte!");
        assert_eq!(json["platform"], "instagram");
        assert!(json.get("video_url").is_none());
        let back: ContentDraft = serde_json::from_value(json).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn library_item_defaults_to_draft_status() {
        let draft = ContentDraft::new(sample_new_draft(), Uuid::new_v4(), Utc::now());
        let item = LibraryItem::from_draft(draft);
        assert_eq!(item.status, DraftStatus::Draft);
        assert_eq!(item.engagement, Engagement::default());
        assert_eq!(item.version, 1);
    }

    #[test]
    fn patch_only_touches_set_fields_and_bumps_version() {
        let draft = ContentDraft::new(sample_new_draft(), Uuid::new_v4(), Utc::now());
        let mut item = LibraryItem::from_draft(draft);
        let patch = LibraryPatch {
            caption: Some("Weekend special".to_string()),
            status: Some(DraftStatus::Scheduled),
            ..LibraryPatch::default()
        };
        patch.apply(&mut item);

        assert_eq!(item.draft.content.caption, "Weekend special");
        assert_eq!(item.draft.content.title, "Caramel Macadamia Latte");
        assert_eq!(item.status, DraftStatus::Scheduled);
        assert_eq!(item.version, 2);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(LibraryPatch::default().is_empty());
        assert!(!LibraryPatch::status(DraftStatus::Published).is_empty());
    }
}
