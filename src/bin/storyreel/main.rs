//! StoryReel command-line client
//!
//! Drives the story-video backend from a terminal: check health, inspect
//! options, analyze example scripts, run generations and manage the gallery.
//!
//! Usage:
//!   storyreel generate --topic "The lighthouse keeper" [OPTIONS]

mod generate;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use storyreel::health::{HealthMonitor, HealthStatus};
use storyreel::stock::{resolve_query, PexelsClient, StockFilter};
use storyreel::studio::options::{
    duration_label, CaptionStyle, ColorFilter, HookIntensity, ImageMode, ImageStyle, MediaSource,
    OptionSpec, Pacing, StoryType, VOICES,
};
use storyreel::{ExampleScript, GalleryStore, HttpVideoApi, JsonGallery, Settings, VideoApi};

#[derive(Parser)]
#[command(
    name = "storyreel",
    about = "Generate narrated story videos with an AI video backend",
    version
)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short = 'c', long, env = "STORYREEL_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the settings file)
    #[arg(short = 'b', long)]
    base_url: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether the backend is reachable
    Health {
        /// Keep checking and report every change
        #[arg(long)]
        watch: bool,
    },
    /// List narrator voices offered by the backend
    Voices,
    /// List effects and filters offered by the backend
    Effects,
    /// Print the built-in option tables
    Options,
    /// Extract a structural template from an example script
    Analyze {
        /// Script file (.txt)
        file: PathBuf,
        /// Script type sent to the analyzer
        #[arg(long, default_value = "documentary")]
        script_type: String,
    },
    /// Run a generation and wait for the video
    Generate(generate::GenerateArgs),
    /// Search stock photos and clips
    Stock {
        /// Search text
        #[arg(default_value = "")]
        query: String,
        /// Keyword used when no query is given (repeatable)
        #[arg(short = 'k', long = "keyword")]
        keywords: Vec<String>,
        /// Only images
        #[arg(long, conflicts_with = "videos")]
        images: bool,
        /// Only videos
        #[arg(long)]
        videos: bool,
    },
    /// Manage finished videos
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
}

#[derive(Subcommand)]
enum GalleryAction {
    /// List saved videos, newest first
    List,
    /// Delete a saved video record
    Delete { id: String },
}

fn init_logging(settings: &Settings, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if json || settings.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_table(title: &str, rows: &[OptionSpec]) {
    println!("{}:", title);
    for row in rows {
        println!("  {:<24} {:<26} {}", row.id, row.name, row.description);
    }
    println!();
}

fn gallery_from(settings: &Settings) -> anyhow::Result<JsonGallery> {
    let path = settings
        .gallery
        .path
        .clone()
        .context("No gallery configured. Set gallery.path or STORYREEL_GALLERY_PATH.")?;
    Ok(JsonGallery::new(path))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(url) = &cli.base_url {
        settings.api.base_url = url.clone();
    }
    init_logging(&settings, cli.json_logs);

    let api = HttpVideoApi::new(&settings.api)?;

    match cli.command {
        Command::Health { watch } => {
            if !watch {
                let online = api.check_health().await;
                println!("{}: {}", api.base_url(), if online { "online" } else { "offline" });
                if !online {
                    std::process::exit(1);
                }
                return Ok(());
            }

            let monitor = HealthMonitor::start(Arc::new(api.clone()), settings.api.health_interval());
            let mut rx = monitor.subscribe();
            loop {
                rx.changed().await?;
                let status = *rx.borrow();
                if status != HealthStatus::Checking {
                    println!("{}: {}", api.base_url(), status);
                }
            }
        }
        Command::Voices => {
            let voices = api.list_voices().await.context("failed to fetch voices")?;
            println!("{}", serde_json::to_string_pretty(&voices)?);
        }
        Command::Effects => {
            let effects = api.list_effects().await.context("failed to fetch effects")?;
            println!("{}", serde_json::to_string_pretty(&effects)?);
        }
        Command::Options => {
            print_table("Story types", &StoryType::table());
            print_table("Image styles", &ImageStyle::table());
            print_table("Image modes", &ImageMode::table());
            print_table("Hook intensity", &HookIntensity::table());
            print_table("Pacing", &Pacing::table());
            print_table("Color filters", &ColorFilter::table());
            print_table("Caption styles", &CaptionStyle::table());
            print_table("Media sources", &MediaSource::table());
            println!("Voices:");
            for voice in VOICES {
                println!(
                    "  {:<16} {:<14} {:<7} {:<24} {}",
                    voice.id, voice.name, voice.gender, voice.style, voice.engine
                );
            }
            println!();
            println!("Durations: 1-60 min");
            for minutes in [1, 6, 16, 31] {
                println!("  from {:>2} min: {}", minutes, duration_label(minutes));
            }
        }
        Command::Analyze { file, script_type } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let script = ExampleScript::from_file(&file, content)?.with_script_type(script_type);
            let template = api.analyze_script(&script).await.context("analysis failed")?;
            println!("{}", serde_json::to_string_pretty(&template)?);
        }
        Command::Generate(args) => {
            generate::run(api, &settings, args).await?;
        }
        Command::Stock {
            query,
            keywords,
            images,
            videos,
        } => {
            let key = settings
                .stock
                .api_key
                .as_deref()
                .context("No Pexels API key. Set stock.api_key or PEXELS_API_KEY.")?;
            let Some(query) = resolve_query(&query, &keywords) else {
                anyhow::bail!("Give a search query or at least one --keyword");
            };
            let filter = if images {
                StockFilter::Images
            } else if videos {
                StockFilter::Videos
            } else {
                StockFilter::Both
            };

            let client = PexelsClient::new(key)?;
            let items = client.search(&query, filter).await;
            println!("{} results for \"{}\"", items.len(), query);
            for item in items {
                let link = item
                    .video_url
                    .as_deref()
                    .or(item.large_url.as_deref())
                    .unwrap_or(&item.thumbnail);
                println!("  {:>10} {:?} {:<20} {}", item.id, item.kind, item.photographer, link);
            }
        }
        Command::Gallery { action } => {
            let gallery = gallery_from(&settings)?;
            match action {
                GalleryAction::List => {
                    let records = gallery.list().await?;
                    if records.is_empty() {
                        println!("Gallery is empty.");
                    }
                    for r in records {
                        println!(
                            "{}  {}  {} min  {}  {}",
                            r.id,
                            r.created_at.format("%Y-%m-%d %H:%M"),
                            r.duration,
                            r.topic,
                            api.resolve_asset_url(&r.video_path)
                        );
                    }
                }
                GalleryAction::Delete { id } => {
                    if gallery.delete(&id).await? {
                        println!("Deleted {}", id);
                    } else {
                        anyhow::bail!("No gallery record with id {}", id);
                    }
                }
            }
        }
    }

    Ok(())
}
