//! Samsung Frame TV: the art-mode and remote-key requests this tool uses.
//!
//! ## Architecture
//! - [`ArtRemote`] is the seam. Publishing and power control are written
//!   against it and tested with an in-memory fake.
//! - [`SamsungTv`] implements it over two lazily opened WebSocket
//!   channels (art and remote control).
//! - A transport failure drops the affected channel; the next call
//!   reconnects.
//!
//! ## Rust concepts
//! - `async fn` in a trait (no boxing, static dispatch only)
//! - `Option::take` / `Option::insert` to move a connection in and out
//!   of a struct around an `.await`
//! - Builder methods returning `Self`

pub mod art;
mod channel;
#[cfg(test)]
pub mod fake;
mod tls;
mod transfer;

pub use art::{ContentItem, KeyAction};
pub use channel::Channel;

use crate::error::TvError;
use art::{ART_CHANNEL, ArtRequest, REMOTE_CHANNEL};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::TcpStream;
use url::Url;

pub const SECURE_PORT: u16 = 8002;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

pub const KEY_ART: &str = "KEY_ART";
pub const KEY_POWER: &str = "KEY_POWER";

// ── Configuration ────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct TvConfig {
    pub host: String,
    pub port: u16,
    /// Shown on the TV's "allow this device?" prompt.
    pub name: String,
    pub token_file: Option<PathBuf>,
    /// Upper bound on any single wait for the TV.
    pub timeout: Duration,
}

impl TvConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: SECURE_PORT,
            name: crate::config::DEFAULT_CLIENT_NAME.to_string(),
            token_file: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_token_file(mut self, path: impl AsRef<Path>) -> Self {
        self.token_file = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Port 8002 is TLS; the legacy 8001 (and anything else) is plain.
    pub fn is_secure(&self) -> bool {
        self.port == SECURE_PORT
    }

    pub fn channel_url(&self, channel: &str, token: Option<&str>) -> Result<Url, TvError> {
        let scheme = if self.is_secure() { "wss" } else { "ws" };
        let mut url = format!(
            "{scheme}://{}:{}/api/v2/channels/{channel}?name={}",
            self.host,
            self.port,
            STANDARD.encode(&self.name)
        );
        if let Some(token) = token {
            url.push_str("&token=");
            url.push_str(token);
        }
        Ok(Url::parse(&url)?)
    }

    pub fn rest_url(&self) -> String {
        let scheme = if self.is_secure() { "https" } else { "http" };
        format!("{scheme}://{}:{}/api/v2/", self.host, self.port)
    }

    pub fn load_token(&self) -> Option<String> {
        let path = self.token_file.as_ref()?;
        std::fs::read_to_string(path)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Persist a token the TV handed out. Failure only costs a new
    /// authorization prompt next time, so it is logged, not returned.
    pub fn save_token(&self, token: &str) {
        let Some(path) = &self.token_file else {
            return;
        };
        if self.load_token().as_deref() == Some(token) {
            return;
        }
        match std::fs::write(path, token) {
            Ok(()) => tracing::info!("Saved TV token to {}", path.display()),
            Err(e) => tracing::warn!("Could not save TV token to {}: {}", path.display(), e),
        }
    }
}

/// Large files take the TV a while to ingest.
pub fn upload_timeout(bytes: usize) -> Duration {
    let megabytes = bytes as f64 / (1024.0 * 1024.0);
    DEFAULT_TIMEOUT.max(Duration::from_secs_f64(megabytes * 5.0))
}

// ── Shared types ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileType {
    Jpg,
    Png,
}

impl FileType {
    /// jpg/jpeg and png, by extension, case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtMode {
    On,
    Off,
    Unknown(String),
}

impl ArtMode {
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("on") => Self::On,
            Some("off") => Self::Off,
            other => Self::Unknown(other.unwrap_or("missing").to_string()),
        }
    }
}

impl fmt::Display for ArtMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown(value) => write!(f, "unknown ({value})"),
        }
    }
}

/// The parts of `GET /api/v2/` worth showing.
#[derive(Clone, Debug, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub device: DeviceDetails,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetails {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default, rename = "FrameTVSupport")]
    pub frame_tv_support: Option<String>,
    #[serde(default, rename = "PowerState")]
    pub power_state: Option<String>,
    #[serde(default)]
    pub wifi_mac: Option<String>,
}

// ── The seam ─────────────────────────────────────────────────────────

#[allow(async_fn_in_trait)]
pub trait ArtRemote {
    /// Address used in log and error messages.
    fn host(&self) -> &str;

    /// Whether the TV accepts connections on its API port.
    async fn is_reachable(&mut self, timeout: Duration) -> bool;

    async fn art_mode(&mut self) -> Result<ArtMode, TvError>;
    async fn set_art_mode(&mut self, on: bool) -> Result<(), TvError>;

    /// Newest first, as the TV reports it.
    async fn content_list(&mut self) -> Result<Vec<ContentItem>, TvError>;
    async fn current_artwork(&mut self) -> Result<Option<ContentItem>, TvError>;

    /// Upload image bytes and return the new content ID.
    async fn upload(&mut self, data: &[u8], file_type: FileType) -> Result<String, TvError>;
    async fn select_image(&mut self, content_id: &str) -> Result<(), TvError>;
    /// Set the matte to `none`.
    async fn change_matte(&mut self, content_id: &str) -> Result<(), TvError>;

    async fn send_key(&mut self, key: &str) -> Result<(), TvError>;
    async fn hold_key(&mut self, key: &str, duration: Duration) -> Result<(), TvError>;

    async fn close(&mut self) {}
}

// ── Samsung implementation ───────────────────────────────────────────

pub struct SamsungTv {
    config: TvConfig,
    http: reqwest::Client,
    art: Option<Channel>,
    remote: Option<Channel>,
}

impl SamsungTv {
    pub fn new(config: TvConfig) -> Result<Self, TvError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            config,
            http,
            art: None,
            remote: None,
        })
    }

    pub async fn device_info(&self) -> Result<DeviceInfo, TvError> {
        Ok(self
            .http
            .get(self.config.rest_url())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn take_channel(&mut self, name: &'static str) -> Result<Channel, TvError> {
        let slot = if name == ART_CHANNEL {
            &mut self.art
        } else {
            &mut self.remote
        };
        match slot.take() {
            Some(channel) => Ok(channel),
            None => Channel::open(&self.config, name).await,
        }
    }

    /// Put a channel back unless the call that used it broke it.
    fn restore_channel<T>(&mut self, name: &'static str, channel: Channel, result: &Result<T, TvError>) {
        if let Err(e) = result {
            if e.is_transport() {
                tracing::debug!("Dropping {} channel after: {}", name, e);
                return;
            }
        }
        if name == ART_CHANNEL {
            self.art = Some(channel);
        } else {
            self.remote = Some(channel);
        }
    }

    async fn art_request(&mut self, request: ArtRequest) -> Result<Option<Value>, TvError> {
        let mut channel = self.take_channel(ART_CHANNEL).await?;
        let result = channel.request(&request).await;
        self.restore_channel(ART_CHANNEL, channel, &result);
        result
    }

    async fn art_reply(&mut self, request: ArtRequest) -> Result<Value, TvError> {
        let name = request.name;
        self.art_request(request)
            .await?
            .ok_or_else(|| TvError::Protocol(format!("no reply to {name}")))
    }

    async fn remote_key(&mut self, action: KeyAction, key: &str) -> Result<(), TvError> {
        let mut channel = self.take_channel(REMOTE_CHANNEL).await?;
        let result = channel.send(&art::remote_key(action, key)).await;
        self.restore_channel(REMOTE_CHANNEL, channel, &result);
        result
    }
}

impl ArtRemote for SamsungTv {
    fn host(&self) -> &str {
        &self.config.host
    }

    async fn is_reachable(&mut self, timeout: Duration) -> bool {
        let addr = (self.config.host.as_str(), self.config.port);
        matches!(
            tokio::time::timeout(timeout, TcpStream::connect(addr)).await,
            Ok(Ok(_))
        )
    }

    async fn art_mode(&mut self) -> Result<ArtMode, TvError> {
        let reply = self.art_reply(art::get_artmode_status()).await?;
        Ok(ArtMode::from_value(reply["value"].as_str()))
    }

    async fn set_art_mode(&mut self, on: bool) -> Result<(), TvError> {
        self.art_request(art::set_artmode_status(on)).await.map(|_| ())
    }

    async fn content_list(&mut self) -> Result<Vec<ContentItem>, TvError> {
        let reply = self.art_reply(art::get_content_list()).await?;
        art::content_list(&reply)
    }

    async fn current_artwork(&mut self) -> Result<Option<ContentItem>, TvError> {
        let reply = self.art_reply(art::get_current_artwork()).await?;
        Ok(art::current_artwork(&reply))
    }

    async fn upload(&mut self, data: &[u8], file_type: FileType) -> Result<String, TvError> {
        let timeout = upload_timeout(data.len()).max(self.config.timeout);
        let mut channel = self.take_channel(ART_CHANNEL).await?;
        let result = channel.upload(data, file_type, timeout).await;
        self.restore_channel(ART_CHANNEL, channel, &result);
        result
    }

    async fn select_image(&mut self, content_id: &str) -> Result<(), TvError> {
        self.art_request(art::select_image(content_id)).await.map(|_| ())
    }

    async fn change_matte(&mut self, content_id: &str) -> Result<(), TvError> {
        self.art_request(art::change_matte(content_id)).await.map(|_| ())
    }

    async fn send_key(&mut self, key: &str) -> Result<(), TvError> {
        tracing::debug!("Sending {}", key);
        self.remote_key(KeyAction::Click, key).await
    }

    async fn hold_key(&mut self, key: &str, duration: Duration) -> Result<(), TvError> {
        tracing::debug!("Holding {} for {:?}", key, duration);
        self.remote_key(KeyAction::Press, key).await?;
        tokio::time::sleep(duration).await;
        self.remote_key(KeyAction::Release, key).await
    }

    async fn close(&mut self) {
        if let Some(channel) = self.art.take() {
            channel.close().await;
        }
        if let Some(channel) = self.remote.take() {
            channel.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn secure_port_uses_wss_and_https() {
        let config = TvConfig::new("192.168.1.50").with_name("DailyArtApp");
        let url = config.channel_url(ART_CHANNEL, Some("12345")).unwrap();
        assert_eq!(
            url.as_str(),
            "wss://192.168.1.50:8002/api/v2/channels/com.samsung.art-app?name=RGFpbHlBcnRBcHA=&token=12345"
        );
        assert_eq!(config.rest_url(), "https://192.168.1.50:8002/api/v2/");
    }

    #[test]
    fn other_ports_are_plain() {
        let config = TvConfig::new("tv.local").with_port(8001);
        let url = config.channel_url(REMOTE_CHANNEL, None).unwrap();
        assert_eq!(url.scheme(), "ws");
        assert_eq!(url.path(), "/api/v2/channels/samsung.remote.control");
        assert!(!url.as_str().contains("token="));
        assert_eq!(config.rest_url(), "http://tv.local:8001/api/v2/");
    }

    #[test]
    fn token_round_trips_through_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tv-token.txt");
        let config = TvConfig::new("tv").with_token_file(&path);

        assert_eq!(config.load_token(), None);
        config.save_token("98765");
        assert_eq!(config.load_token().as_deref(), Some("98765"));

        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(config.load_token(), None);
    }

    #[test]
    fn no_token_file_means_no_token() {
        let config = TvConfig::new("tv");
        config.save_token("ignored");
        assert_eq!(config.load_token(), None);
    }

    #[rstest]
    #[case(0, 300)]
    #[case(10 * 1024 * 1024, 300)]
    #[case(100 * 1024 * 1024, 500)]
    fn upload_timeout_grows_with_size(#[case] bytes: usize, #[case] secs: u64) {
        assert_eq!(upload_timeout(bytes), Duration::from_secs(secs));
    }

    #[rstest]
    #[case("a.jpg", Some(FileType::Jpg))]
    #[case("a.JPEG", Some(FileType::Jpg))]
    #[case("a.png", Some(FileType::Png))]
    #[case("a.webp", None)]
    #[case("a", None)]
    fn file_types(#[case] path: &str, #[case] expected: Option<FileType>) {
        assert_eq!(FileType::from_path(Path::new(path)), expected);
    }

    #[test]
    fn art_mode_values() {
        assert_eq!(ArtMode::from_value(Some("on")), ArtMode::On);
        assert_eq!(ArtMode::from_value(Some("off")), ArtMode::Off);
        assert_eq!(ArtMode::from_value(None).to_string(), "unknown (missing)");
    }

    #[test]
    fn parses_device_info() {
        let body = serde_json::json!({
            "name": "[TV] Samsung Frame",
            "device": {
                "modelName": "QE55LS03B",
                "FrameTVSupport": "true",
                "PowerState": "on",
                "wifiMac": "64:1c:ae:01:2b:ff"
            }
        });
        let info: DeviceInfo = serde_json::from_value(body).unwrap();
        assert_eq!(info.device.model_name.as_deref(), Some("QE55LS03B"));
        assert_eq!(info.device.frame_tv_support.as_deref(), Some("true"));
        assert_eq!(info.device.power_state.as_deref(), Some("on"));
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut tv = SamsungTv::new(TvConfig::new("127.0.0.1").with_port(port)).unwrap();
        assert!(!tv.is_reachable(Duration::from_secs(1)).await);
    }
}
