//! First-run sample content for the library.

use chrono::{DateTime, TimeZone, Utc};
use socialspark_core::{
    ContentDraft, ContentType, DraftStatus, Engagement, LibraryItem, NewDraft, Platform,
};
use uuid::Uuid;

/// A library entry to insert when seeding. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedItem {
    pub draft: NewDraft,
    pub created_at: DateTime<Utc>,
    pub status: DraftStatus,
    pub engagement: Engagement,
}

impl SeedItem {
    #[must_use]
    pub fn into_library_item(self, id: Uuid) -> LibraryItem {
        LibraryItem {
            draft: ContentDraft::new(self.draft, id, self.created_at),
            status: self.status,
            engagement: self.engagement,
            version: 1,
        }
    }
}

/// The four demo items shown on a fresh install.
#[must_use]
pub fn sample_library() -> Vec<SeedItem> {
    vec![
        item(
            "Caramel Macadamia Latte",
            "Try our new Caramel Macadamia Latte! Perfect coffee blend...",
            &["AddisAbebaCafe", "EthiopianCoffee", "Latte"],
            Platform::Instagram,
            ContentType::Image,
            (Some("/ethiopian-cafe-latte-with-caramel-and-macadamia-nu.png"), None),
            15,
            DraftStatus::Published,
            (45, 8, 234),
        ),
        item(
            "Behind the Scenes",
            "Watch how we make our signature latte...",
            &["BehindTheScenes", "CoffeeProcess", "Barista"],
            Platform::Tiktok,
            ContentType::Video,
            (
                Some("/short-video-of-latte-being-made.png"),
                Some("/short-video-of-latte-being-made.mp4"),
            ),
            14,
            DraftStatus::Draft,
            (0, 0, 0),
        ),
        item(
            "Weekend Special",
            "Weekend vibes with our special blend...",
            &["WeekendSpecial", "CoffeeLovers", "Relax"],
            Platform::Instagram,
            ContentType::Image,
            (Some("/weekend-coffee-special.png"), None),
            13,
            DraftStatus::Scheduled,
            (0, 0, 0),
        ),
        item(
            "Customer Review",
            "Amazing feedback from our lovely customers...",
            &["CustomerLove", "Reviews", "HappyCustomers"],
            Platform::Instagram,
            ContentType::Image,
            (Some("/happy-customer-with-coffee.png"), None),
            12,
            DraftStatus::Published,
            (67, 12, 345),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn item(
    title: &str,
    caption: &str,
    hashtags: &[&str],
    platform: Platform,
    content_type: ContentType,
    (image_url, video_url): (Option<&str>, Option<&str>),
    january_day: u32,
    status: DraftStatus,
    (likes, comments, views): (u64, u64, u64),
) -> SeedItem {
    SeedItem {
        draft: NewDraft {
            title: title.to_string(),
            caption: caption.to_string(),
            hashtags: hashtags.iter().map(|h| (*h).to_string()).collect(),
            image_url: image_url.map(str::to_string),
            video_url: video_url.map(str::to_string),
            platform,
            content_type,
            storyboard: None,
            overlays: None,
        },
        created_at: Utc
            .with_ymd_and_hms(2024, 1, january_day, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now),
        status,
        engagement: Engagement {
            likes,
            comments,
            views,
        },
    }
}
