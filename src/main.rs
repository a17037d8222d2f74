//! frame-art: daily AI art for a Samsung Frame TV
//!
//! Generates an image for the day, enhances it, and pushes it to the TV
//! in art mode. The helper subcommands cover each step on its own, plus
//! power control for cron.
//!
//! ## Rust concepts
//! - `#[tokio::main]` async entry point
//! - clap derive with nested subcommands
//! - `anyhow::Context` at the edges, typed errors underneath
//! - `std::process::ExitCode` so cron sees distinct failures
//!
//! ## Usage
//! ```sh
//! frame-art run --weather --attempts 3
//! frame-art upload enhanced_images/art_20260101_080000_upscale-sharp.png
//! frame-art power on --mac 64:1c:ae:01:2b:ff
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use frame_art::config::Settings;
use frame_art::enhance::{self, DEFAULT_PRESET};
use frame_art::error::{PipelineError, PowerError, PublishError, TvError};
use frame_art::generate::{ImageGenerator, ImageModel};
use frame_art::library;
use frame_art::pipeline::{self, DailyArt, Rerun, RunOptions};
use frame_art::power;
use frame_art::publish::{ContentIdStore, Publisher};
use frame_art::tv::{ArtRemote, SamsungTv};
use frame_art::wol::{self, MacAddress};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Daily AI art for a Samsung Frame TV
#[derive(Parser)]
#[command(name = "frame-art")]
#[command(about = "Generate daily AI art and display it on a Samsung Frame TV")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, global = true)]
    debug: bool,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate, enhance and upload today's image
    Run {
        /// Custom prompt instead of the dated one
        #[arg(long)]
        prompt: Option<String>,

        /// Use this image instead of generating one
        #[arg(long)]
        image: Option<PathBuf>,

        /// Enhancement preset
        #[arg(long, default_value = DEFAULT_PRESET)]
        preset: String,

        /// Upload the image as generated
        #[arg(long)]
        no_enhance: bool,

        /// Stop before uploading
        #[arg(long)]
        skip_upload: bool,

        /// Shade the prompt with the current weather
        #[arg(long)]
        weather: bool,

        /// Image model (dall-e-3 or gpt-image-1)
        #[arg(long)]
        model: Option<ImageModel>,

        /// Times to attempt the whole run
        #[arg(long, default_value = "1")]
        attempts: u32,

        /// Seconds between run attempts
        #[arg(long, default_value = "300")]
        retry_delay: u64,
    },

    /// Generate an image without uploading it
    Generate {
        #[arg(long)]
        prompt: Option<String>,

        #[arg(long)]
        weather: bool,

        #[arg(long)]
        model: Option<ImageModel>,
    },

    /// Print the prompt for a date
    Prompt {
        /// Date as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,

        #[arg(long)]
        weather: bool,
    },

    /// Enhance an image with a preset
    Enhance {
        input: PathBuf,

        #[arg(long, default_value = DEFAULT_PRESET)]
        preset: String,

        /// Output directory (default: the enhanced images directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Enhance with several presets and build a comparison grid
    Compare {
        input: PathBuf,

        /// Comma-separated presets (default: all)
        #[arg(long, value_delimiter = ',')]
        presets: Vec<String>,

        #[arg(long, default_value = "comparison")]
        out_dir: PathBuf,
    },

    /// List enhancement presets
    Presets,

    /// List local generated and enhanced images
    Images {
        #[arg(long)]
        json: bool,
    },

    /// Upload an image (default: the newest local one) and display it
    Upload {
        path: Option<PathBuf>,

        /// Upload without changing the displayed art
        #[arg(long)]
        no_select: bool,
    },

    /// Display an already uploaded image
    Select { content_id: String },

    /// List the art stored on the TV
    List,

    /// Show TV and art mode status
    Status,

    /// Turn the TV on (into art mode) or off
    Power {
        action: Toggle,

        /// TV address (overrides SAMSUNG_TV_IP)
        #[arg(long)]
        ip: Option<String>,

        /// MAC address for Wake-on-LAN (overrides SAMSUNG_TV_MAC)
        #[arg(long)]
        mac: Option<MacAddress>,
    },

    /// Turn art mode on or off without changing power
    Art {
        action: Toggle,

        #[arg(long)]
        ip: Option<String>,

        #[arg(long)]
        mac: Option<MacAddress>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

// ── Logging ──────────────────────────────────────────────────────────

fn init_logging(debug: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));

    // No ANSI codes: output usually ends up in cron mail or a log file.
    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .compact();

    let file = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .compact()
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();
    Ok(())
}

// ── Commands ─────────────────────────────────────────────────────────

fn connect(settings: &Settings) -> Result<SamsungTv> {
    let config = settings.tv_config()?;
    tracing::debug!("TV at {}:{}", config.host, config.port);
    Ok(SamsungTv::new(config)?)
}

fn publisher(settings: &Settings) -> Result<Publisher<SamsungTv>> {
    Ok(Publisher::new(
        connect(settings)?,
        ContentIdStore::new(settings.last_id_file()),
    ))
}

async fn generate(settings: Settings, prompt: Option<String>, weather: bool, model: Option<ImageModel>) -> Result<()> {
    let daily = DailyArt::new(settings);
    let prompt = match prompt {
        Some(prompt) => prompt,
        None => {
            daily
                .prompt_for(chrono::Local::now().date_naive(), weather)
                .await
        }
    };

    let mut generator = ImageGenerator::from_settings(daily.settings())?;
    if let Some(model) = model {
        generator = generator.with_model(model);
    }
    let image = generator.generate(&prompt).await?;
    println!("{}", image.path.display());
    if let Some(revised) = image.revised_prompt {
        tracing::info!("Revised prompt: {}", revised);
    }
    Ok(())
}

async fn upload(settings: &Settings, path: Option<PathBuf>, select: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => {
            let latest = library::latest_image(&[settings.enhanced_dir.as_path(), settings.generated_dir.as_path()])
                .context("no local images to upload; pass a path")?;
            tracing::info!("Uploading newest image {}", latest.name);
            latest.path
        }
    };

    let mut publisher = publisher(settings)?;
    let result = publisher.publish(&path, select).await;
    publisher.tv().close().await;
    let content_id = result.with_context(|| format!("uploading {}", path.display()))?;
    println!("{content_id}");
    Ok(())
}

async fn select(settings: &Settings, content_id: &str) -> Result<()> {
    let mut publisher = publisher(settings)?;
    let result: Result<(), PublishError> = async {
        publisher.ensure_available().await?;
        publisher.set_active_art(content_id).await
    }
    .await;
    publisher.tv().close().await;
    result.with_context(|| format!("selecting {content_id}"))
}

async fn list(settings: &Settings) -> Result<()> {
    let mut tv = connect(settings)?;
    let result = tv.content_list().await;
    tv.close().await;

    let items = result.context("reading the TV's content list")?;
    println!("{} items on the TV", items.len());
    for item in items {
        println!(
            "{}\t{}",
            item.content_id,
            item.category_id.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn status(settings: &Settings) -> Result<()> {
    let mut tv = connect(settings)?;
    println!("TV: {}", tv.host());

    if !tv.is_reachable(Duration::from_secs(5)).await {
        println!("Reachable: no");
        return Ok(());
    }
    println!("Reachable: yes");

    match tv.device_info().await {
        Ok(info) => {
            let device = info.device;
            println!("Name: {}", info.name.as_deref().unwrap_or("unknown"));
            println!("Model: {}", device.model_name.as_deref().unwrap_or("unknown"));
            println!("Frame TV: {}", device.frame_tv_support.as_deref().unwrap_or("unknown"));
            println!("Power: {}", device.power_state.as_deref().unwrap_or("unknown"));
        }
        Err(e) => tracing::warn!("Could not read device info: {}", e),
    }

    match tv.art_mode().await {
        Ok(mode) => println!("Art mode: {mode}"),
        Err(e) => println!("Art mode: unavailable ({e})"),
    }
    match tv.current_artwork().await {
        Ok(Some(item)) => println!("Current artwork: {}", item.content_id),
        Ok(None) => println!("Current artwork: unknown"),
        Err(e) => tracing::warn!("Could not read current artwork: {}", e),
    }
    tv.close().await;
    Ok(())
}

/// Power and art commands report through exit codes, not `anyhow`.
async fn power_command(
    settings: Result<Settings, frame_art::error::ConfigError>,
    ip: Option<String>,
    mac: Option<MacAddress>,
    run: impl AsyncFnOnce(&mut SamsungTv, Option<MacAddress>) -> Result<power::PowerOutcome, PowerError>,
) -> ExitCode {
    let outcome: Result<power::PowerOutcome, PowerError> = async {
        let settings = settings?.with_overrides(ip, mac);

        let config = settings.tv_config()?;
        let mut tv = SamsungTv::new(config).map_err(|e| PowerError::Connection(e.to_string()))?;
        let outcome = run(&mut tv, settings.tv_mac).await;
        tv.close().await;
        outcome
    }
    .await;

    match outcome {
        Ok(outcome) => {
            tracing::info!("{}", outcome);
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn dispatch(command: Command) -> Result<ExitCode> {
    let settings = || Settings::load().context("loading configuration");

    match command {
        Command::Power { action, ip, mac } => {
            return Ok(power_command(Settings::load(), ip, mac, async |tv, mac| match action {
                Toggle::On => power::turn_on(tv, mac, wol::wake).await,
                Toggle::Off => power::turn_off(tv).await,
            })
            .await);
        }
        Command::Art { action, ip, mac } => {
            let on = matches!(action, Toggle::On);
            return Ok(power_command(Settings::load(), ip, mac, async |tv, mac| {
                power::set_art(tv, on, mac, wol::wake).await
            })
            .await);
        }
        Command::Run {
            prompt,
            image,
            preset,
            no_enhance,
            skip_upload,
            weather,
            model,
            attempts,
            retry_delay,
        } => {
            let options = RunOptions {
                prompt,
                image,
                preset: (!no_enhance).then_some(preset),
                skip_upload,
                use_weather: weather,
                model,
            };
            let rerun = Rerun {
                attempts,
                delay: Duration::from_secs(retry_delay),
            };
            let daily = DailyArt::new(settings()?);
            let report = daily
                .run(&options, rerun, || {
                    let config = daily.settings().tv_config()?;
                    SamsungTv::new(config).map_err(pipeline::connect_error)
                })
                .await?;
            tracing::info!("Image: {}", report.image.display());
            if let Some(id) = report.content_id {
                tracing::info!("Displayed content ID: {}", id);
            }
        }
        Command::Generate {
            prompt,
            weather,
            model,
        } => generate(settings()?, prompt, weather, model).await?,
        Command::Prompt { date, weather } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let prompt = DailyArt::new(settings()?).prompt_for(date, weather).await;
            println!("{prompt}");
        }
        Command::Enhance {
            input,
            preset,
            out_dir,
        } => {
            let out_dir = match out_dir {
                Some(dir) => dir,
                None => settings()?.enhanced_dir,
            };
            let path = tokio::task::spawn_blocking(move || enhance::enhance_file(&input, &preset, &out_dir))
                .await
                .context("enhancement task panicked")??;
            println!("{}", path.display());
        }
        Command::Compare {
            input,
            presets,
            out_dir,
        } => {
            let comparison =
                tokio::task::spawn_blocking(move || enhance::compare_presets(&input, &presets, &out_dir))
                    .await
                    .context("comparison task panicked")??;
            for (name, path) in &comparison.outputs {
                println!("{name}\t{}", path.display());
            }
            println!("grid\t{}", comparison.grid.display());
        }
        Command::Presets => {
            for name in enhance::preset_names() {
                let marker = if name == DEFAULT_PRESET { " (default)" } else { "" };
                println!("{name}{marker}");
            }
        }
        Command::Images { json } => {
            let settings = settings()?;
            let mut images = library::list_images(&settings.generated_dir);
            images.extend(library::list_images(&settings.enhanced_dir));
            if json {
                println!("{}", serde_json::to_string_pretty(&images)?);
            } else {
                for image in &images {
                    println!("{}\t{}", image.path.display(), image.size);
                }
            }
        }
        Command::Upload { path, no_select } => upload(&settings()?, path, !no_select).await?,
        Command::Select { content_id } => select(&settings()?, &content_id).await?,
        Command::List => list(&settings()?).await?,
        Command::Status => status(&settings()?).await?,
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.debug, cli.log_file.as_ref()) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    match dispatch(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(failure_code(&e))
        }
    }
}

/// 2 when talking to the TV failed, as for `power`; 1 for everything else.
fn failure_code(e: &anyhow::Error) -> u8 {
    let tv_failed = matches!(
        e.downcast_ref::<PipelineError>(),
        Some(PipelineError::Publish(PublishError::Tv(_)))
    ) || matches!(e.downcast_ref::<PublishError>(), Some(PublishError::Tv(_)))
        || e.is::<TvError>();
    if tv_failed { 2 } else { 1 }
}
