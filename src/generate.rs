//! Image generation through an OpenAI-compatible images API.
//!
//! ## Rust concepts
//! - `backon::Retryable` turns an async closure into a retrying future
//! - `secrecy::SecretString` keeps the API key out of `Debug` output
//! - `serde` structs with `Option` fields to accept either response shape

use crate::config::Settings;
use crate::error::{ConfigError, GenerateError};
use backon::{ExponentialBuilder, Retryable};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

// ── Models ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageModel {
    /// Landscape 1792x1024, returns a download URL.
    #[default]
    DallE3,
    /// Landscape 1536x1024, returns base64 image data.
    GptImage1,
}

impl ImageModel {
    pub fn api_name(self) -> &'static str {
        match self {
            Self::DallE3 => "dall-e-3",
            Self::GptImage1 => "gpt-image-1",
        }
    }

    pub fn request_body(self, prompt: &str) -> serde_json::Value {
        match self {
            Self::DallE3 => json!({
                "model": self.api_name(),
                "prompt": prompt,
                "n": 1,
                "size": "1792x1024",
                "quality": "hd",
                "style": "natural",
            }),
            Self::GptImage1 => json!({
                "model": self.api_name(),
                "prompt": prompt,
                "n": 1,
                "size": "1536x1024",
                "quality": "high",
            }),
        }
    }
}

impl FromStr for ImageModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dall-e-3" | "dalle3" => Ok(Self::DallE3),
            "gpt-image-1" => Ok(Self::GptImage1),
            other => Err(format!("unknown image model: {other}")),
        }
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
    b64_json: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull the human-readable message out of an error body, falling back to
/// (a prefix of) the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.chars().take(400).collect())
}

// ── Generator ────────────────────────────────────────────────────────

/// A saved image and the prompt file written next to it.
#[derive(Clone, Debug)]
pub struct GeneratedImage {
    pub path: PathBuf,
    pub prompt_path: PathBuf,
    pub revised_prompt: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ImageGenerator {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<SecretString>,
    model: ImageModel,
    output_dir: PathBuf,
    backoff: ExponentialBuilder,
}

impl ImageGenerator {
    pub fn new(
        api_base: impl Into<String>,
        api_key: Option<SecretString>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, GenerateError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(180))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.into(),
            api_key,
            model: ImageModel::default(),
            output_dir: output_dir.into(),
            backoff: ExponentialBuilder::default()
                .with_min_delay(Duration::from_secs(2))
                .with_max_delay(Duration::from_secs(30))
                .with_max_times(3)
                .with_jitter(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, GenerateError> {
        Ok(Self::new(
            settings.openai_base_url.clone(),
            settings.openai_api_key.clone(),
            settings.generated_dir.clone(),
        )?
        .with_model(settings.model))
    }

    #[must_use]
    pub fn with_model(mut self, model: ImageModel) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: ExponentialBuilder) -> Self {
        self.backoff = backoff;
        self
    }

    /// Generate one image for `prompt` and save it with its prompt.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage, GenerateError> {
        let key = self
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().trim().is_empty())
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        tracing::info!("Generating image with {}: {}", self.model, prompt);
        let body = self.model.request_body(prompt);

        let response = (|| async { self.request(key, &body).await })
            .retry(self.backoff)
            .when(GenerateError::is_retryable)
            .notify(|e, delay| {
                tracing::warn!("Image request failed: {}. Retrying in {:?}", e, delay);
            })
            .await?;

        let image = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| GenerateError::EmptyResponse("no entries in data".into()))?;

        let bytes = match (image.b64_json, image.url) {
            (Some(b64), _) => STANDARD.decode(b64.trim())?,
            (None, Some(url)) => self.download(&url).await?,
            (None, None) => {
                return Err(GenerateError::EmptyResponse(
                    "entry has neither url nor b64_json".into(),
                ));
            }
        };

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let saved = save_image(
            &self.output_dir,
            &stamp,
            &bytes,
            prompt,
            image.revised_prompt.as_deref(),
        )
        .await?;
        tracing::info!("Image saved to {}", saved.path.display());
        Ok(saved)
    }

    async fn request(
        &self,
        key: &SecretString,
        body: &serde_json::Value,
    ) -> Result<ImagesResponse, GenerateError> {
        let url = format!("{}/images/generations", self.api_base.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .bearer_auth(key.expose_secret().trim())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }
        Ok(response.json().await?)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, GenerateError> {
        let response = self
            .http
            .get(url)
            .timeout(Duration::from_secs(60))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// File extension for the actual encoded format. The API does not say,
/// and the TV cares.
pub fn extension_for(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => "jpg",
        Ok(ImageFormat::WebP) => "webp",
        _ => "png",
    }
}

async fn save_image(
    dir: &Path,
    stamp: &str,
    bytes: &[u8],
    prompt: &str,
    revised_prompt: Option<&str>,
) -> Result<GeneratedImage, GenerateError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| GenerateError::Write { path, source }
    };

    tokio::fs::create_dir_all(dir).await.map_err(write_err(dir))?;

    let path = dir.join(format!("art_{stamp}.{}", extension_for(bytes)));
    tokio::fs::write(&path, bytes).await.map_err(write_err(&path))?;

    let mut text = prompt.to_string();
    if let Some(revised) = revised_prompt {
        text.push_str("\n\nRevised prompt: ");
        text.push_str(revised);
    }
    let prompt_path = dir.join(format!("art_{stamp}_prompt.txt"));
    tokio::fs::write(&prompt_path, text)
        .await
        .map_err(write_err(&prompt_path))?;

    Ok(GeneratedImage {
        path,
        prompt_path,
        revised_prompt: revised_prompt.map(str::to_string),
    })
}
