//! vidcast: upload videos and cover images to a hosted video service.
//!
//! Configuration comes from `~/.config/vidcast/config.json` (or `--config`)
//! plus `VIDCAST_ACCESS_TOKEN` / `VIDCAST_APP_ID`.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use vidcast_remote::{Client, VideoPatch};
use vidcast_transfer::{ProgressStage, UploadProgress};
use vidcast_upload::{MediaHost, ThumbnailActivator, UploadControl, UploadOrchestrator};

use config::CliConfig;

#[derive(Parser)]
#[command(name = "vidcast", version, about = "Hosted video upload CLI")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a video file and wait until it is playable
    Upload {
        /// Path to the video file
        file: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Upload a JPEG and make it the video's cover image
    Thumbnail {
        video_id: String,
        /// Path to the JPEG image
        image: PathBuf,
    },
    /// Create a video for a direct upload by another party
    Ticket {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show a video's metadata
    Info { video_id: String },
    /// Change a video's title or description
    Update {
        video_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a video
    Delete { video_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = CliConfig::load(cli.config.as_deref())?;
    let client = Client::new(&cfg.remote).context("failed to build remote client")?;
    let host: Arc<dyn MediaHost> = Arc::new(client);
    let orchestrator = UploadOrchestrator::new(host.clone(), cfg.pipeline);

    match cli.command {
        Commands::Upload {
            file,
            title,
            description,
        } => {
            let payload = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;

            let (control, events) = UploadControl::with_events(orchestrator.config().event_buffer);
            let printer = tokio::spawn(print_progress(events, cli.json));
            let cancel = control.cancel_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupted, cancelling upload");
                    cancel.cancel();
                }
            });

            let result = orchestrator
                .upload_video(Bytes::from(payload), &title, &description, &control)
                .await;
            drop(control);
            let _ = printer.await;

            let result = result?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!("video id:  {}", result.video_id);
                println!("playback:  {}", result.playback_url);
                println!("page:      {}", result.canonical_link);
                println!("duration:  {}s", result.duration_seconds);
            }
        }
        Commands::Thumbnail { video_id, image } => {
            let image = tokio::fs::read(&image)
                .await
                .with_context(|| format!("failed to read {}", image.display()))?;
            let result = ThumbnailActivator::new(host)
                .upload_thumbnail(&video_id, Bytes::from(image))
                .await?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!("{}", result.thumbnail_url);
            }
        }
        Commands::Ticket { title, description } => {
            let ticket = orchestrator.issue_upload_ticket(&title, &description).await?;
            if cli.json {
                print_json(&ticket)?;
            } else {
                println!("video id:   {}", ticket.remote_video_id);
                println!("upload to:  {}", ticket.upload_locator);
                println!("complete:   {}", ticket.completion_locator);
                println!("max bytes:  {}", ticket.max_payload_bytes);
            }
        }
        Commands::Info { video_id } => {
            let meta = orchestrator.get_video(&video_id).await?;
            if cli.json {
                print_json(&meta)?;
            } else {
                println!("{} ({})", meta.name, meta.status);
                println!("page:      {}", meta.link);
                println!("duration:  {}s", meta.duration);
            }
        }
        Commands::Update {
            video_id,
            title,
            description,
        } => {
            let patch = VideoPatch {
                name: title,
                description,
            };
            let meta = orchestrator.update_video(&video_id, &patch).await?;
            if cli.json {
                print_json(&meta)?;
            } else {
                println!("updated {}", meta.id());
            }
        }
        Commands::Delete { video_id } => {
            orchestrator.delete_video(&video_id).await?;
            if !cli.json {
                println!("deleted {video_id}");
            }
        }
    }

    Ok(())
}

async fn print_progress(mut rx: tokio::sync::mpsc::Receiver<UploadProgress>, json: bool) {
    while let Some(event) = rx.recv().await {
        if json {
            if let Ok(line) = serde_json::to_string(&event) {
                eprintln!("{line}");
            }
            continue;
        }
        match event.stage {
            ProgressStage::Uploading => eprintln!(
                "[{:>5.1}%] uploading {}/{} bytes",
                event.percent,
                event.bytes_transferred.unwrap_or_default(),
                event.total_bytes.unwrap_or_default()
            ),
            ProgressStage::Error => eprintln!(
                "[{:>5.1}%] error: {}",
                event.percent,
                event.error.as_deref().unwrap_or("unknown")
            ),
            stage => eprintln!("[{:>5.1}%] {stage:?}", event.percent),
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize result")?;
    println!("{out}");
    Ok(())
}
