//! # Polaroid CLI
//!
//! Command-line interface for composing instant-film prints.
//!
//! ## Usage
//!
//! ```bash
//! # Compose a print from a photo
//! polaroid compose beach.jpg --caption "Beach day" --timestamp overlay -o print.jpg
//!
//! # Compose, save to recent moments and export
//! polaroid compose selfie.png --facing front --font handwritten --save --export
//!
//! # Browse recent moments
//! polaroid recent list
//! polaroid recent export 1704110400000
//!
//! # Run the local HTTP studio
//! polaroid serve --listen 127.0.0.1:8080
//! ```

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use polaroid::{
    PolaroidError,
    capture::{Provenance, RawCapture, snapshot_from_frame},
    config::StudioConfig,
    export::{DirectoryTarget, ExportGateway, ExportOutcome},
    session::{Persisted, Studio},
    storage::JsonFileStore,
    style::{FontChoice, StyleParameters, TimestampMode},
};

/// Polaroid - Instant-film print compositor
#[derive(Parser, Debug)]
#[command(name = "polaroid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Recent-moments store (overrides config)
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Export directory (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Minutes east of UTC used for timestamps (overrides config)
    #[arg(long, global = true, allow_hyphen_values = true)]
    utc_offset: Option<i32>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose a print from an image file
    Compose {
        /// Input image (JPEG, PNG, ...)
        input: PathBuf,

        /// Caption below the photo
        #[arg(long, default_value = "")]
        caption: String,

        #[arg(long, value_enum, default_value_t = FontChoice::Typewriter)]
        font: FontChoice,

        #[arg(long, value_enum, default_value_t = TimestampMode::Off)]
        timestamp: TimestampMode,

        /// Skip the instant-film color grade
        #[arg(long)]
        no_filter: bool,

        /// Treat the input as a raw camera frame from this camera
        #[arg(long, value_enum, default_value_t = Provenance::Imported)]
        facing: Provenance,

        /// Capture time (RFC 3339), defaults to now
        #[arg(long, value_name = "TIME")]
        at: Option<DateTime<Utc>>,

        /// Write the print here
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Save into recent moments
        #[arg(long)]
        save: bool,

        /// Export into the export directory
        #[arg(long)]
        export: bool,
    },

    /// Manage recent moments
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },

    /// Run the local HTTP studio
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long)]
        listen: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum RecentAction {
    /// List moments, most recent first
    List,
    /// Remove one moment
    Remove { id: u64 },
    /// Remove all moments
    Clear,
    /// Re-compose a stored moment into the export directory
    Export { id: u64 },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<StudioConfig, PolaroidError> {
    let mut config = match &cli.config {
        Some(path) => StudioConfig::load(path)?,
        None => StudioConfig::default(),
    };
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    if let Some(dir) = &cli.export_dir {
        config.export_dir = dir.clone();
    }
    if let Some(offset) = cli.utc_offset {
        config.utc_offset_minutes = offset;
    }
    if let Commands::Serve {
        listen: Some(listen),
    } = &cli.command
    {
        config.listen_addr = listen.clone();
    }
    config.validate()?;
    Ok(config)
}

fn open_studio(config: &StudioConfig) -> Result<Studio<JsonFileStore>, PolaroidError> {
    Ok(Studio::new(
        config.composer()?,
        config.store(),
        config.autosave_delay(),
    ))
}

async fn run(cli: Cli) -> Result<(), PolaroidError> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Compose {
            input,
            caption,
            font,
            timestamp,
            no_filter,
            facing,
            at,
            output,
            save,
            export,
        } => {
            let style = StyleParameters::default()
                .with_font(font)?
                .with_caption(caption)?
                .with_timestamp(timestamp)
                .with_filter(!no_filter);

            let bytes = tokio::fs::read(&input).await?;
            let decoded = RawCapture::decode_async(bytes, Provenance::Imported).await?;
            let raw = match facing {
                Provenance::Imported => decoded,
                camera => snapshot_from_frame(decoded.image(), camera)?,
            };
            let captured_at = at.unwrap_or_else(Utc::now);

            let mut studio = open_studio(&config)?;
            let id = studio.begin(raw, captured_at);
            studio.edit(style)?;

            let artifact = if save {
                let (artifact, persisted) = studio.flush().await?;
                match persisted {
                    Persisted::Saved => println!("Saved moment {}", id),
                    _ => println!("Print composed, but it could not be saved (see log)"),
                }
                artifact
            } else {
                let artifact = studio.preview_async().await?;
                studio.close();
                artifact
            };

            if let Some(path) = output {
                tokio::fs::write(&path, &artifact.encoded).await?;
                println!("Wrote {}", path.display());
            }

            if export {
                let gateway = ExportGateway::new(DirectoryTarget::new(&config.export_dir));
                report_export(gateway.export(&artifact, false).await?);
            }
        }

        Commands::Recent { action } => {
            let mut studio = open_studio(&config)?;
            match action {
                RecentAction::List => {
                    let moments = studio.list()?;
                    if moments.is_empty() {
                        println!("No recent moments.");
                    }
                    for m in moments {
                        println!(
                            "{:>14}  {}  {:<11}  {:<7}  {}{}",
                            m.id,
                            m.timestamp.format("%Y-%m-%d %H:%M:%S"),
                            m.font.name(),
                            format!("{:?}", m.timestamp_mode).to_lowercase(),
                            if m.filter_enabled { "" } else { "[no filter] " },
                            m.caption.replace('\n', " / "),
                        );
                    }
                }
                RecentAction::Remove { id } => {
                    if !studio.remove(id)? {
                        return Err(PolaroidError::MomentNotFound(id));
                    }
                    println!("Removed moment {}", id);
                }
                RecentAction::Clear => {
                    studio.clear()?;
                    println!("Cleared recent moments");
                }
                RecentAction::Export { id } => {
                    studio.reopen(id)?;
                    let artifact = studio.preview_async().await?;
                    let gateway = ExportGateway::new(DirectoryTarget::new(&config.export_dir));
                    report_export(gateway.export(&artifact, false).await?);
                }
            }
        }

        Commands::Serve { .. } => {
            polaroid::server::serve(config).await?;
        }
    }

    Ok(())
}

fn report_export(outcome: ExportOutcome) {
    match outcome {
        ExportOutcome::Shared => println!("Shared"),
        ExportOutcome::Downloaded(path) => println!("Exported {}", path.display()),
        ExportOutcome::Cancelled => println!("Export cancelled"),
    }
}
