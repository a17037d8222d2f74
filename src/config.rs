//! Runtime settings from the environment and an optional `.env` file.
//!
//! `Settings::load()` reads `.env` (if present) and then the process
//! environment. `Settings::from_lookup()` takes any key → value function,
//! which is what the tests use instead of touching real env vars.

use crate::error::ConfigError;
use crate::generate::ImageModel;
use crate::wol::MacAddress;
use secrecy::SecretString;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_TV_PORT: u16 = 8002;
pub const DEFAULT_CLIENT_NAME: &str = "DailyArtApp";
pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

#[derive(Clone, Debug)]
pub struct Settings {
    pub tv_ip: Option<String>,
    pub tv_mac: Option<MacAddress>,
    pub tv_port: u16,
    pub tv_token_file: PathBuf,
    pub client_name: String,
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: String,
    pub model: ImageModel,
    pub weather: Option<Coordinates>,
    pub generated_dir: PathBuf,
    pub enhanced_dir: PathBuf,
    pub state_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Settings {
    /// Read `.env` (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Trimmed, with empty values treated as unset.
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tv_mac = get("SAMSUNG_TV_MAC")
            .map(|v| v.parse::<MacAddress>())
            .transpose()?;
        let tv_port = parse_or(get("SAMSUNG_TV_PORT"), "SAMSUNG_TV_PORT", DEFAULT_TV_PORT)?;
        let model = parse_or(get("FRAME_ART_MODEL"), "FRAME_ART_MODEL", ImageModel::default())?;

        let latitude = get("WEATHER_LATITUDE")
            .map(|v| parse::<f64>(v, "WEATHER_LATITUDE"))
            .transpose()?;
        let longitude = get("WEATHER_LONGITUDE")
            .map(|v| parse::<f64>(v, "WEATHER_LONGITUDE"))
            .transpose()?;
        let weather = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("WEATHER_LONGITUDE")),
            (None, Some(_)) => return Err(ConfigError::Missing("WEATHER_LATITUDE")),
        };

        Ok(Self {
            tv_ip: get("SAMSUNG_TV_IP"),
            tv_mac,
            tv_port,
            tv_token_file: get("SAMSUNG_TV_TOKEN_FILE")
                .map_or_else(|| PathBuf::from("tv-token.txt"), PathBuf::from),
            client_name: get("SAMSUNG_TV_NAME").unwrap_or_else(|| DEFAULT_CLIENT_NAME.into()),
            openai_api_key: get("OPENAI_API_KEY").map(SecretString::from),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE.into()),
            model,
            weather,
            generated_dir: get("FRAME_ART_GENERATED_DIR")
                .map_or_else(|| PathBuf::from("generated_images"), PathBuf::from),
            enhanced_dir: get("FRAME_ART_ENHANCED_DIR")
                .map_or_else(|| PathBuf::from("enhanced_images"), PathBuf::from),
            state_dir: get("FRAME_ART_STATE_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from),
        })
    }

    /// Command-line `--ip` and `--mac` take precedence over the environment.
    #[must_use]
    pub fn with_overrides(mut self, ip: Option<String>, mac: Option<MacAddress>) -> Self {
        self.tv_ip = ip.or(self.tv_ip);
        self.tv_mac = mac.or(self.tv_mac);
        self
    }

    /// The TV address, or an error telling the user where to set it.
    pub fn require_tv_ip(&self) -> Result<&str, ConfigError> {
        self.tv_ip.as_deref().ok_or(ConfigError::Missing("SAMSUNG_TV_IP"))
    }

    pub fn tv_config(&self) -> Result<crate::tv::TvConfig, ConfigError> {
        let host = self.require_tv_ip()?;
        Ok(crate::tv::TvConfig::new(host)
            .with_port(self.tv_port)
            .with_name(&self.client_name)
            .with_token_file(&self.tv_token_file))
    }

    pub fn last_id_file(&self) -> PathBuf {
        self.state_dir.join("last_uploaded_id.txt")
    }
}

fn parse<T: FromStr>(value: String, key: &'static str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn parse_or<T: FromStr>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    value.map_or(Ok(default), |v| parse(v, key))
}
