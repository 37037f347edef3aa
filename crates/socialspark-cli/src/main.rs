mod app;
mod generate;
mod library;
mod publish;

use clap::{Parser, Subcommand};
use socialspark_core::{BusinessType, ContentType, Language, Platform, Tone};
use socialspark_store::Bucket;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::app::App;
use crate::library::LibraryCommands;
use crate::publish::{ScheduleArgs, ScheduleCommands, StoreCommands, TaskCommands};

#[derive(Debug, Parser)]
#[command(name = "socialspark")]
#[command(about = "Generate, organise and schedule social media content")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a caption, image and (for video) a rendered clip from an idea
    Generate(GenerateArgs),
    /// Browse and manage the content library
    Library {
        #[command(subcommand)]
        command: LibraryCommands,
    },
    /// Render task utilities
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Schedule a post, or show suggested posting times
    #[command(args_conflicts_with_subcommands = true)]
    Schedule {
        #[command(subcommand)]
        command: Option<ScheduleCommands>,
        #[command(flatten)]
        post: ScheduleArgs,
    },
    /// Export a stored draft as a downloadable asset
    Export {
        /// Draft id (library item or bucket draft)
        id: Uuid,
    },
    /// Draft store maintenance
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

#[derive(Debug, clap::Args)]
struct GenerateArgs {
    /// What the post is about, e.g. "new caramel latte"
    #[arg(long)]
    idea: String,
    #[arg(long, default_value = "instagram")]
    platform: Platform,
    /// image or video
    #[arg(long = "type", default_value = "image")]
    content_type: ContentType,
    #[arg(long, default_value = "playful")]
    tone: Tone,
    #[arg(long, default_value = "cafe")]
    business: BusinessType,
    /// en or am; defaults to SOCIALSPARK_DEFAULT_LANGUAGE
    #[arg(long)]
    language: Option<Language>,
    /// Number of hashtags to ask for
    #[arg(long = "hashtags", default_value = "4")]
    hashtags_count: u32,
    /// Number of storyboard shots (video only)
    #[arg(long = "shots", default_value = "3")]
    number_of_shots: u32,
    /// Call to action for the video storyboard
    #[arg(long)]
    cta: Option<String>,
    /// Image aspect ratio, e.g. 1:1 or 9:16
    #[arg(long)]
    aspect_ratio: Option<String>,
    /// Brand preset name from the brands file
    #[arg(long)]
    brand: Option<String>,
    /// Return the render task id instead of waiting for the video
    #[arg(long)]
    no_wait: bool,
    /// Save the result into this bucket (library, editor, scheduler, ...)
    #[arg(long)]
    save: Option<Bucket>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("socialspark ready; run `socialspark --help` for commands");
        return Ok(());
    };

    let config = socialspark_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    tracing::debug!(?config, "configuration loaded");

    // `schedule times` is answered offline; everything else opens the store.
    match command {
        Commands::Schedule {
            command: Some(ScheduleCommands::Times { platform }),
            ..
        } => {
            publish::print_optimal_times(platform);
            Ok(())
        }
        Commands::Schedule {
            command: None,
            post,
        } => publish::run_schedule(&App::new(config).await?, post).await,
        Commands::Generate(args) => generate::run_generate(&App::new(config).await?, args).await,
        Commands::Library { command } => {
            library::run_library(&App::new(config).await?, command).await
        }
        Commands::Task {
            command:
                TaskCommands::Wait {
                    task_id,
                    deadline_secs,
                    draft,
                },
        } => publish::run_task_wait(&App::new(config).await?, &task_id, deadline_secs, draft).await,
        Commands::Export { id } => publish::run_export(&App::new(config).await?, id).await,
        Commands::Store { command } => publish::run_store(&App::new(config).await?, command).await,
    }
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
