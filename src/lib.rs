//! Daily AI art for a Samsung Frame TV.
//!
//! The library behind the `frame-art` binary:
//! - Prompt building from the date, holidays and (optionally) weather
//! - Image generation through an OpenAI-compatible images API
//! - Local enhancement presets
//! - Upload and selection over the TV's art-mode API, with retries
//! - Power and art-mode control for cron
//!
//! `main.rs` wires these to subcommands; everything here is usable (and
//! tested) without a TV on the network.

pub mod config;
pub mod enhance;
pub mod error;
pub mod generate;
pub mod library;
pub mod pipeline;
pub mod power;
pub mod prompt;
pub mod publish;
pub mod retry;
pub mod tv;
pub mod weather;
pub mod wol;

pub use config::Settings;
pub use error::{PipelineError, PowerError, PublishError, TvError};
