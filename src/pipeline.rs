//! The daily job: get an image, enhance it, put it on the TV.
//!
//! Each step degrades instead of failing where it can. Weather is
//! optional, a failed enhancement falls back to the original image, and
//! a failed run is re-run after a delay. Re-runs reuse an image that was
//! already prepared, so a flaky TV does not cost another generation.

use crate::config::Settings;
use crate::enhance;
use crate::error::{PipelineError, PublishError};
use crate::generate::{ImageGenerator, ImageModel};
use crate::prompt;
use crate::publish::{ContentIdStore, Publisher};
use crate::tv::ArtRemote;
use crate::weather::{self, WeatherClient};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Use this prompt instead of building one for today.
    pub prompt: Option<String>,
    /// Use this image instead of generating one, if it exists.
    pub image: Option<PathBuf>,
    /// Enhancement preset; `None` uploads the image as is.
    pub preset: Option<String>,
    pub skip_upload: bool,
    pub use_weather: bool,
    pub model: Option<ImageModel>,
}

/// How often the whole run is attempted, and the pause between runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rerun {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for Rerun {
    fn default() -> Self {
        Self {
            attempts: 1,
            delay: Duration::from_secs(300),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub image: PathBuf,
    pub content_id: Option<String>,
}

pub struct DailyArt {
    settings: Settings,
    weather: WeatherClient,
}

impl DailyArt {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            weather: WeatherClient::default(),
        }
    }

    #[must_use]
    pub fn with_weather_client(mut self, client: WeatherClient) -> Self {
        self.weather = client;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// A mood phrase for the current weather, when coordinates are set
    /// and the lookup works.
    pub async fn weather_modifier(&self) -> Option<&'static str> {
        let Some(at) = self.settings.weather else {
            tracing::info!("Weather requested but no coordinates configured");
            return None;
        };
        let current = self.weather.current(at).await?;
        let modifier = weather::prompt_modifier(&current, &mut rand::thread_rng());
        if let Some(m) = modifier {
            tracing::info!("Weather modifier: {}", m);
        }
        modifier
    }

    /// The prompt for `date`, optionally shaded by today's weather.
    pub async fn prompt_for(&self, date: NaiveDate, use_weather: bool) -> String {
        let modifier = if use_weather {
            self.weather_modifier().await
        } else {
            None
        };
        prompt::art_prompt(date, modifier, &mut rand::thread_rng())
    }

    async fn generate(&self, options: &RunOptions) -> Result<PathBuf, PipelineError> {
        let prompt = match &options.prompt {
            Some(custom) if options.use_weather => match self.weather_modifier().await {
                Some(m) => format!("{custom} {m}."),
                None => custom.clone(),
            },
            Some(custom) => custom.clone(),
            None => {
                self.prompt_for(chrono::Local::now().date_naive(), options.use_weather)
                    .await
            }
        };

        let mut generator = ImageGenerator::from_settings(&self.settings)?;
        if let Some(model) = options.model {
            generator = generator.with_model(model);
        }
        Ok(generator.generate(&prompt).await?.path)
    }

    async fn enhance(&self, source: PathBuf, preset: &str) -> PathBuf {
        let input = source.clone();
        let preset_name = preset.to_string();
        let out_dir = self.settings.enhanced_dir.clone();
        tracing::info!("Enhancing {} with preset {}", source.display(), preset);

        let result =
            tokio::task::spawn_blocking(move || enhance::enhance_file(&input, &preset_name, &out_dir))
                .await;
        match result {
            Ok(Ok(path)) => {
                tracing::info!("Enhanced image saved to {}", path.display());
                path
            }
            Ok(Err(e)) => {
                tracing::warn!("Enhancement failed ({}), using the original image", e);
                source
            }
            Err(e) => {
                tracing::warn!("Enhancement task failed ({}), using the original image", e);
                source
            }
        }
    }

    /// Steps up to (not including) the upload.
    pub async fn prepare(&self, options: &RunOptions) -> Result<PathBuf, PipelineError> {
        let source = match &options.image {
            Some(path) if path.is_file() => {
                tracing::info!("Using existing image {}", path.display());
                path.clone()
            }
            Some(path) => {
                tracing::warn!("Image {} not found, generating a new one", path.display());
                self.generate(options).await?
            }
            None => self.generate(options).await?,
        };

        Ok(match &options.preset {
            Some(preset) => self.enhance(source, preset).await,
            None => source,
        })
    }

    /// Upload `image` and make it the displayed art.
    pub async fn publish<R: ArtRemote>(&self, tv: R, image: &Path) -> Result<String, PipelineError> {
        let store = ContentIdStore::new(self.settings.last_id_file());
        let mut publisher = Publisher::new(tv, store);
        let result = publisher.publish(image, true).await;
        publisher.tv().close().await;
        Ok(result?)
    }

    /// Run the job, re-running failed attempts per `rerun`. `connect`
    /// builds a fresh TV session for each attempt.
    pub async fn run<R, C>(&self, options: &RunOptions, rerun: Rerun, mut connect: C) -> Result<RunReport, PipelineError>
    where
        R: ArtRemote,
        C: FnMut() -> Result<R, PipelineError>,
    {
        let attempts = rerun.attempts.max(1);
        let mut prepared: Option<PathBuf> = None;
        let mut attempt = 1;

        loop {
            tracing::info!("Starting daily art run (attempt {}/{})", attempt, attempts);
            let result = self.attempt(options, &mut prepared, &mut connect).await;
            match result {
                Ok(report) => {
                    tracing::info!("Daily art run completed");
                    return Ok(report);
                }
                Err(e) if attempt < attempts && e.is_retryable() => {
                    tracing::warn!(
                        "Run attempt {}/{} failed: {}. Re-running in {}s...",
                        attempt,
                        attempts,
                        e,
                        rerun.delay.as_secs()
                    );
                    tokio::time::sleep(rerun.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("Daily art run failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    async fn attempt<R, C>(
        &self,
        options: &RunOptions,
        prepared: &mut Option<PathBuf>,
        connect: &mut C,
    ) -> Result<RunReport, PipelineError>
    where
        R: ArtRemote,
        C: FnMut() -> Result<R, PipelineError>,
    {
        let image = match prepared.clone() {
            Some(image) => image,
            None => {
                let image = self.prepare(options).await?;
                *prepared = Some(image.clone());
                image
            }
        };

        if options.skip_upload {
            tracing::info!("Skipping upload; image is at {}", image.display());
            return Ok(RunReport {
                image,
                content_id: None,
            });
        }

        let tv = connect()?;
        let content_id = self.publish(tv, &image).await?;
        Ok(RunReport {
            image,
            content_id: Some(content_id),
        })
    }
}

/// Wraps a transport setup failure for [`DailyArt::run`]'s `connect`.
pub fn connect_error(e: crate::error::TvError) -> PipelineError {
    PipelineError::Publish(PublishError::Tv(e))
}
