//! Surfcast CLI: drives the upload orchestrator and the catalog read paths.
//!
//! Configuration comes from the environment (see `.env.example`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use surfcast_cli::{init_tracing, print_json, ConsoleNotifier, ConsoleProgress, IdentityArgs};
use surfcast_core::{AppError, Config, Coordinates};
use surfcast_db::{
    connect, run_migrations, BeachRepository, NearbyBeaches, RecordStore, UserRepository,
    VideoRepository,
};
use surfcast_processing::{
    FfmpegThumbnailer, FileSource, LocalFiles, SourceKind, UploadDeps, UploadPolicy,
    UploadSession,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "surfcast", about = "Surfcast beach video CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a video to a beach
    Upload {
        /// Path to the video file
        file: PathBuf,
        /// Beach id to upload to
        #[arg(long)]
        beach: String,
        #[arg(long)]
        caption: Option<String>,
        /// Video length in seconds, when known
        #[arg(long)]
        duration: Option<i32>,
        #[command(flatten)]
        identity: IdentityArgs,
    },
    /// List beaches sorted by distance from a point
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Number of catalog pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// List approved videos for a beach, newest first
    Videos {
        beach: String,
        #[arg(long, default_value = "20")]
        limit: i64,
        #[arg(long, default_value = "0")]
        offset: i64,
    },
    /// Get a single video record by ID
    Video {
        /// Video UUID
        id: String,
    },
    /// User profile operations
    Profile {
        #[command(subcommand)]
        sub: ProfileCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        sub: DbCommands,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Create the profile row for a user if it does not exist
    Sync {
        #[command(flatten)]
        identity: IdentityArgs,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.is_production());
    config.validate().context("Invalid configuration")?;

    let pool = connect(&config).await?;

    match cli.command {
        Commands::Upload {
            file,
            beach,
            caption,
            duration,
            identity,
        } => {
            let session = identity.session();
            // Uploads reference the profile row
            if let Some(user) = session.user() {
                UserRepository::new(pool.clone())
                    .ensure_profile(user)
                    .await
                    .context("Failed to sync user profile")?;
            }

            let storage = surfcast_storage::create_storage(&config)
                .await
                .context("Failed to initialize storage")?;
            let thumbnails = FfmpegThumbnailer::new(config.ffmpeg_path().to_string())?;

            let deps = UploadDeps {
                storage,
                records: Arc::new(VideoRepository::new(pool.clone())),
                files: Arc::new(LocalFiles),
                source: Arc::new(FileSource::new(file, duration)),
                thumbnails: Arc::new(thumbnails),
                notifier: Arc::new(ConsoleNotifier),
                progress: Arc::new(ConsoleProgress),
            };
            let mut upload = UploadSession::new(deps, UploadPolicy::from_config(&config));

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            upload.pick(SourceKind::Library).await?;
            if let Some(caption) = caption {
                upload.set_caption(caption);
            }
            let record = upload.confirm(&session, &beach, &cancel).await?;
            print_json(&record)?;
        }
        Commands::Nearby { lat, lon, pages } => {
            let beaches = BeachRepository::new(pool.clone());
            let mut feed = NearbyBeaches::new(Coordinates::new(lat, lon), config.beach_page_size());
            for _ in 0..pages.max(1) {
                if !feed.has_more() {
                    break;
                }
                feed.load_next(&beaches).await?;
            }
            print_json(&serde_json::json!({
                "beaches": feed.beaches(),
                "has_more": feed.has_more(),
            }))?;
        }
        Commands::Videos {
            beach,
            limit,
            offset,
        } => {
            let videos = VideoRepository::new(pool.clone())
                .list_approved_for_beach(&beach, limit, offset)
                .await?;
            let items: Vec<_> = videos
                .iter()
                .map(|v| {
                    serde_json::json!({
                        "video": v,
                        "uploader_name": v.uploader_name(),
                    })
                })
                .collect();
            print_json(&items)?;
        }
        Commands::Video { id } => {
            let id = Uuid::parse_str(&id).context("Invalid video id")?;
            let record = VideoRepository::new(pool.clone())
                .find_upload(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Video {}", id)))?;
            print_json(&record)?;
        }
        Commands::Profile { sub } => match sub {
            ProfileCommands::Sync { identity } => {
                let session = identity.session();
                let user = session.require_user()?;
                let profile = UserRepository::new(pool.clone())
                    .ensure_profile(user)
                    .await?;
                print_json(&profile)?;
            }
        },
        Commands::Db { sub } => match sub {
            DbCommands::Migrate => {
                run_migrations(&pool).await?;
                print_json(&serde_json::json!({ "success": true, "message": "Migrations applied" }))?;
            }
        },
    }

    Ok(())
}
