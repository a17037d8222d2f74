//! Error types, one enum per concern.
//!
//! ## Rust concepts
//! - `thiserror` derives `Display` and `std::error::Error` from attributes
//! - `#[from]` lets `?` convert lower-level errors automatically
//! - Classification methods (`is_retryable`, `is_transport`) keep retry
//!   decisions next to the error definitions

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// ── Configuration ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set (add it to the environment or the .env file)")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

// ── Image generation ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("image API response had no image: {0}")]
    EmptyResponse(String),

    #[error("could not decode image payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Rate limits, server errors and transient network failures are
    /// worth another attempt. Everything else is a caller problem.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => crate::retry::is_retryable_status(*status),
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::EmptyResponse(_) | Self::Decode(_) | Self::Config(_) | Self::Write { .. } => false,
        }
    }
}

// ── Enhancement ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("unknown preset {name:?} (available: {available})")]
    UnknownPreset { name: String, available: String },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("nothing to compare: no enhanced images")]
    NothingToCompare,
}

// ── TV transport ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TvError {
    #[error("TV at {0} is unreachable; it may be powered off or in deep sleep")]
    Unreachable(String),

    #[error("timed out after {0:?} waiting for the TV")]
    Timeout(Duration),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid TV address: {0}")]
    Url(#[from] url::ParseError),

    #[error("TV refused the connection ({0}); accept the prompt on the TV and retry")]
    Unauthorized(String),

    #[error("channel closed by the TV")]
    Closed,

    #[error("art request {request:?} failed with error number {code}")]
    Art { request: String, code: String },

    #[error("unexpected response from TV: {0}")]
    Protocol(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for TvError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(e))
    }
}

impl TvError {
    /// Failures of the connection itself. The cached channel is dropped
    /// so the next call reconnects.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Unreachable(_)
                | Self::Timeout(_)
                | Self::WebSocket(_)
                | Self::Io(_)
                | Self::Closed
                | Self::Http(_)
        )
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.is_transport() || matches!(self, Self::Art { .. })
    }

    /// `-7` is what the TV answers when it is already in the requested
    /// art mode state, or cannot switch from the current one.
    #[must_use]
    pub fn is_already_in_state(&self) -> bool {
        matches!(self, Self::Art { code, .. } if code == "-7")
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

// ── Publishing ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("image {0} not found")]
    ImageNotFound(PathBuf),

    #[error("unsupported image type {0:?}; the TV accepts jpg and png")]
    UnsupportedType(String),

    #[error("I/O error reading {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Tv(#[from] TvError),

    #[error("all methods to set active art failed for {0}")]
    SelectFailed(String),
}

// ── Power control ────────────────────────────────────────────────────

/// Failures of `power on|off`, each with the exit code cron sees.
#[derive(Debug, Error)]
pub enum PowerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("{0}")]
    Failed(String),
}

impl PowerError {
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::Connection(_) => 2,
            Self::Failed(_) => 3,
        }
    }
}

// ── Daily run ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("image generation failed: {0}")]
    Generate(#[from] GenerateError),

    #[error("upload failed: {0}")]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Whether re-running the whole job could help. Missing settings and
    /// bad input files will fail the same way again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Generate(GenerateError::Config(_)) => false,
            Self::Publish(PublishError::ImageNotFound(_) | PublishError::UnsupportedType(_)) => false,
            Self::Publish(PublishError::Tv(TvError::Unauthorized(_))) => false,
            Self::Generate(_) | Self::Publish(_) => true,
        }
    }
}
