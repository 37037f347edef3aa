//! `task`, `schedule`, `export` and `store` command handlers.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use socialspark_api::{ScheduleStatus, TaskPoller, TaskStatusResponse};
use socialspark_core::Platform;
use socialspark_store::{connect_pool, ping, run_migrations, DraftStore, PoolConfig};
use socialspark_studio::{
    compose_post_text, export_draft, optimal_times, parse_run_at, schedule_post, Generator,
    SchedulePostInput,
};
use uuid::Uuid;

use crate::app::{ctrl_c_token, App};

#[derive(Debug, Subcommand)]
pub enum TaskCommands {
    /// Poll a render task until it finishes and print the video URL
    Wait {
        task_id: String,
        /// Give up after this many seconds (0 waits until interrupted)
        #[arg(long)]
        deadline_secs: Option<u64>,
        /// Library item to receive the finished video URL
        #[arg(long)]
        draft: Option<Uuid>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommands {
    /// Suggested posting times for a platform
    Times { platform: Platform },
}

#[derive(Debug, clap::Args)]
pub struct ScheduleArgs {
    /// Asset (draft) id to publish
    #[arg(long)]
    pub asset: Option<String>,
    /// Target platform; repeat or comma-separate for several
    #[arg(long = "platform", value_delimiter = ',')]
    pub platforms: Vec<Platform>,
    /// Post text; defaults to the stored draft's caption and hashtags
    #[arg(long)]
    pub text: Option<String>,
    /// When to publish: RFC 3339, or local YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum StoreCommands {
    /// Delete every bucket and library item
    Clear,
    /// Apply pending Postgres migrations (needs DATABASE_URL)
    Migrate,
}

pub(crate) async fn run_task_wait(
    app: &App,
    task_id: &str,
    deadline_secs: Option<u64>,
    draft: Option<Uuid>,
) -> anyhow::Result<()> {
    let mut policy = app.poll_policy();
    if let Some(secs) = deadline_secs {
        policy = policy.with_deadline((secs > 0).then_some(Duration::from_secs(secs)));
    }
    let report = |status: &TaskStatusResponse| eprintln!("task {task_id}: {}", status.status);

    let Some(draft_id) = draft else {
        let url = TaskPoller::new(&app.client, policy)
            .wait(task_id, &ctrl_c_token(), report)
            .await?;
        println!("{url}");
        return Ok(());
    };

    let item = Generator::new(&app.client)
        .with_poll_policy(policy)
        .attach_render(app.store.as_ref(), task_id, draft_id, &ctrl_c_token(), report)
        .await?;
    if let Some(url) = &item.draft.content.video_url {
        println!("{url}");
    }
    println!("library item {draft_id} updated (version {})", item.version);
    Ok(())
}

pub(crate) fn print_optimal_times(platform: Platform) {
    let times: Vec<String> = optimal_times(platform)
        .iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();
    println!("{platform}: {}", times.join(", "));
}

pub(crate) async fn run_schedule(app: &App, args: ScheduleArgs) -> anyhow::Result<()> {
    let asset_id = args
        .asset
        .context("--asset is required (or use `schedule times PLATFORM`)")?;
    let run_at = args
        .at
        .as_deref()
        .map(|at| parse_run_at(at, Utc::now()))
        .transpose()?;
    let post_text = match args.text {
        Some(text) => text,
        None => default_post_text(app.store.as_ref(), &asset_id).await?,
    };

    let outcome = schedule_post(
        &app.client,
        app.store.as_ref(),
        SchedulePostInput {
            asset_id,
            platforms: args.platforms,
            post_text,
            run_at,
        },
    )
    .await?;

    let response = &outcome.response;
    match response.status {
        ScheduleStatus::Queued => {
            let when = response
                .scheduled_for
                .map_or_else(|| "now".to_string(), |t| t.to_rfc3339());
            println!("queued for {when}");
            if let Some(post_id) = &response.platform_post_id {
                println!("platform post id: {post_id}");
            }
            if let Some(item) = &outcome.library_item {
                println!("library item {} marked {}", item.id(), item.status);
            }
            Ok(())
        }
        ScheduleStatus::Failed => anyhow::bail!("the server did not queue the post"),
    }
}

async fn default_post_text(store: &dyn DraftStore, asset_id: &str) -> anyhow::Result<String> {
    let id = Uuid::parse_str(asset_id)
        .with_context(|| format!("--text is required: '{asset_id}' is not a stored draft id"))?;
    let draft = store
        .find_content_by_id(id)
        .await?
        .with_context(|| format!("--text is required: no stored draft {id}"))?;
    Ok(compose_post_text(&draft.content))
}

pub(crate) async fn run_export(app: &App, id: Uuid) -> anyhow::Result<()> {
    let response = export_draft(&app.client, app.store.as_ref(), id).await?;
    println!("{}", response.asset_url);
    Ok(())
}

pub(crate) async fn run_store(app: &App, command: StoreCommands) -> anyhow::Result<()> {
    match command {
        StoreCommands::Clear => {
            app.store.clear_all().await?;
            println!("draft store cleared");
        }
        StoreCommands::Migrate => {
            let url = app
                .config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set to run migrations")?;
            let pool = connect_pool(url, PoolConfig::default())
                .await
                .context("failed to connect to DATABASE_URL")?;
            ping(&pool).await?;
            let applied = run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}
