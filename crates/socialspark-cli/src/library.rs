//! `library` command handlers.

use anyhow::Context;
use clap::Subcommand;
use socialspark_core::{ContentType, DraftStatus, LibraryItem, LibraryPatch, Platform};
use socialspark_store::{sample_library, Bucket};
use socialspark_studio::{
    copy_to_bucket, edit_library_item, filter_library, hashtags_text, share_text, LibraryFilter,
};
use uuid::Uuid;

use crate::app::App;

#[derive(Debug, Subcommand)]
pub enum LibraryCommands {
    /// List library items
    List {
        /// Match against title or caption (case-insensitive)
        #[arg(long)]
        query: Option<String>,
        /// image or video
        #[arg(long = "type")]
        content_type: Option<ContentType>,
        #[arg(long)]
        platform: Option<Platform>,
        #[arg(long)]
        status: Option<DraftStatus>,
    },
    /// Show one item in full
    Show { id: Uuid },
    /// Delete an item
    Remove { id: Uuid },
    /// Change an item's status (draft, scheduled, published)
    Status {
        id: Uuid,
        status: DraftStatus,
        /// Fail if the item changed since this version was read
        #[arg(long)]
        expect_version: Option<u64>,
    },
    /// Print caption and hashtags ready to paste
    Share { id: Uuid },
    /// Insert sample content when the library is empty
    Seed,
    /// Copy an item into the editor bucket
    Edit { id: Uuid },
    /// Save edits to an item's title, caption, hashtags or image
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        caption: Option<String>,
        /// Replaces all hashtags; repeat or comma-separate
        #[arg(long = "hashtag", value_delimiter = ',')]
        hashtags: Vec<String>,
        #[arg(long)]
        image_url: Option<String>,
        /// Fail if the item changed since this version was read
        #[arg(long)]
        expect_version: Option<u64>,
    },
}

pub(crate) async fn run_library(app: &App, command: LibraryCommands) -> anyhow::Result<()> {
    match command {
        LibraryCommands::List {
            query,
            content_type,
            platform,
            status,
        } => {
            let items = app.store.get_library().await?;
            let filter = LibraryFilter {
                query,
                content_type,
                platform,
                status,
            };
            print_list(&filter_library(&items, &filter));
        }
        LibraryCommands::Show { id } => {
            let item = find(app, id).await?;
            print_item(&item);
        }
        LibraryCommands::Remove { id } => {
            if app.store.remove_from_library(id).await? {
                println!("removed {id}");
            } else {
                anyhow::bail!("no library item {id}");
            }
        }
        LibraryCommands::Status {
            id,
            status,
            expect_version,
        } => {
            let item = app
                .store
                .update_in_library(id, LibraryPatch::status(status), expect_version)
                .await?;
            println!("{id} is now {} (version {})", item.status, item.version);
        }
        LibraryCommands::Share { id } => {
            let item = find(app, id).await?;
            println!("{}", share_text(&item));
        }
        LibraryCommands::Seed => {
            let inserted = app.store.seed_library_if_empty(sample_library()).await?;
            if inserted == 0 {
                println!("library already has content; nothing seeded");
            } else {
                println!("seeded {inserted} sample items");
            }
        }
        LibraryCommands::Edit { id } => {
            let draft = copy_to_bucket(app.store.as_ref(), id, Bucket::Editor).await?;
            println!("copied \"{}\" to the editor", draft.content.title);
        }
        LibraryCommands::Update {
            id,
            title,
            caption,
            hashtags,
            image_url,
            expect_version,
        } => {
            let patch = LibraryPatch {
                title,
                caption,
                hashtags: (!hashtags.is_empty()).then_some(hashtags),
                image_url,
                ..LibraryPatch::default()
            };
            let item = edit_library_item(app.store.as_ref(), id, patch, expect_version).await?;
            println!("{id} saved (version {})", item.version);
        }
    }
    Ok(())
}

async fn find(app: &App, id: Uuid) -> anyhow::Result<LibraryItem> {
    app.store
        .get_from_library(id)
        .await?
        .with_context(|| format!("no library item {id}"))
}

fn print_list(items: &[&LibraryItem]) {
    if items.is_empty() {
        println!("no matching items; run `library seed` for sample content");
        return;
    }
    println!(
        "{:<38}{:<11}{:<7}{:<11}{:<5}TITLE",
        "ID", "PLATFORM", "TYPE", "STATUS", "VER"
    );
    for item in items {
        let content = &item.draft.content;
        let title = if content.title.chars().count() > 40 {
            format!("{}...", content.title.chars().take(40).collect::<String>())
        } else {
            content.title.clone()
        };
        println!(
            "{:<38}{:<11}{:<7}{:<11}{:<5}{}",
            item.id().to_string(),
            content.platform.to_string(),
            content.content_type.to_string(),
            item.status.to_string(),
            item.version,
            title
        );
    }
}

fn print_item(item: &LibraryItem) {
    let content = &item.draft.content;
    println!("id:         {}", item.id());
    println!("title:      {}", content.title);
    println!("created:    {}", item.draft.created_at.format("%Y-%m-%d %H:%M UTC"));
    println!("platform:   {} ({})", content.platform, content.content_type);
    println!("status:     {} (version {})", item.status, item.version);
    println!(
        "engagement: {} likes, {} comments, {} views",
        item.engagement.likes, item.engagement.comments, item.engagement.views
    );
    println!("caption:    {}", content.caption);
    println!("hashtags:   {}", hashtags_text(item));
    if let Some(url) = &content.image_url {
        println!("image:      {url}");
    }
    if let Some(url) = &content.video_url {
        println!("video:      {url}");
    }
}
