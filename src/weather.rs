//! Current conditions from Open-Meteo, turned into a mood phrase for the
//! prompt. Weather is decoration: every failure here is logged and
//! swallowed.

use crate::config::Coordinates;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::time::Duration;

pub const OPEN_METEO_BASE: &str = "https://api.open-meteo.com";

#[derive(Clone, Debug, PartialEq)]
pub struct Weather {
    pub condition: &'static str,
    pub temperature_c: Option<f64>,
    pub code: Option<u16>,
}

#[derive(Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<Current>,
}

#[derive(Deserialize)]
struct Current {
    temperature_2m: Option<f64>,
    weather_code: Option<u16>,
}

/// WMO weather interpretation codes.
pub fn describe(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new(OPEN_METEO_BASE)
    }
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Current conditions, or `None` if anything goes wrong.
    pub async fn current(&self, at: Coordinates) -> Option<Weather> {
        match self.fetch(at).await {
            Ok(weather) => {
                tracing::info!(
                    "Weather: {} ({})",
                    weather.condition,
                    weather
                        .temperature_c
                        .map_or_else(|| "temperature unknown".to_string(), |t| format!("{t}°C"))
                );
                Some(weather)
            }
            Err(e) => {
                tracing::warn!("Error fetching weather: {}", e);
                None
            }
        }
    }

    async fn fetch(&self, at: Coordinates) -> Result<Weather, reqwest::Error> {
        let url = format!("{}/v1/forecast", self.base_url.trim_end_matches('/'));
        let body: ForecastResponse = self
            .http
            .get(url)
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("current", "temperature_2m,weather_code".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .timeout(Duration::from_secs(10))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let current = body.current.unwrap_or(Current {
            temperature_2m: None,
            weather_code: None,
        });
        Ok(Weather {
            condition: current.weather_code.map_or("Unknown", describe),
            temperature_c: current.temperature_2m,
            code: current.weather_code,
        })
    }
}

// ── Prompt modifiers ─────────────────────────────────────────────────

const CLEAR: [&str; 5] = [
    "bathed in warm sunlight, clear blue skies, natural lighting",
    "warm golden sunlight, crisp clear day, long soft shadows",
    "gentle sunshine, pale blue sky, luminous atmosphere",
    "dappled sunlight, bright and airy, peaceful mood",
    "sun-lit scene, gentle contrasts, natural colours",
];

const CLOUDY: [&str; 5] = [
    "soft diffused lighting, dramatic cloudy sky, atmospheric mood",
    "overcast sky, gentle even lighting, contemplative mood",
    "brooding clouds, muted tones, peaceful grey light",
    "silvery cloud cover, soft shadows, tranquil atmosphere",
    "layered clouds, filtered light, subtle colour palette",
];

const FOG: [&str; 5] = [
    "misty atmosphere, ethereal fog, mysterious mood, soft edges",
    "thick morning mist, shapes emerging from haze, dreamlike quality",
    "veiled in fog, muted distant forms, intimate foreground",
    "swirling mist, ghostly atmosphere, limited visibility adding mystery",
    "soft foggy glow, silhouettes fading into grey, hushed mood",
];

const RAIN: [&str; 5] = [
    "rainy atmosphere, wet surfaces reflecting light, cozy rainy day vibe",
    "gentle rainfall, glistening wet textures, fresh and clean feeling",
    "rain-soaked scene, puddles reflecting sky, rich saturated colours",
    "steady drizzle, soft grey tones, peaceful melancholy",
    "rain streaming down, blurred backgrounds, intimate sheltered feeling",
];

const SNOW: [&str; 5] = [
    "snowy scene, winter wonderland, falling snow, soft white textures",
    "fresh snowfall, pristine white blanket, hushed winter silence",
    "snow-covered landscape, cool blue shadows on white, crisp cold air",
    "gentle snowflakes drifting, frosted surfaces, cozy winter mood",
    "deep snow, muted colours against white, peaceful winter stillness",
];

const THUNDER: [&str; 5] = [
    "dramatic storm lighting, dark skies, powerful atmosphere",
    "brooding thunderclouds, flashes of light, electric tension",
    "stormy drama, wind-swept scene, raw natural power",
    "dark turbulent sky, moments before the storm, charged atmosphere",
    "dramatic contrast of dark clouds and bright breaks, moody intensity",
];

/// The phrase group matching the conditions, checked in the same order
/// as the WMO ranges: clear, cloudy, fog, rain, snow, thunder.
fn modifier_group(weather: &Weather) -> Option<&'static [&'static str]> {
    let condition = weather.condition.to_lowercase();
    let code = weather.code;
    let code_in = |codes: &[u16]| code.is_some_and(|c| codes.contains(&c));

    if condition.contains("clear") || code == Some(0) {
        Some(&CLEAR)
    } else if condition.contains("cloud") || code_in(&[2, 3]) {
        Some(&CLOUDY)
    } else if condition.contains("fog") || code_in(&[45, 48]) {
        Some(&FOG)
    } else if condition.contains("rain")
        || condition.contains("drizzle")
        || code_in(&[51, 53, 55, 61, 63, 65, 80, 81, 82])
    {
        Some(&RAIN)
    } else if condition.contains("snow") || code_in(&[71, 73, 75, 77, 85, 86]) {
        Some(&SNOW)
    } else if condition.contains("thunder") || code_in(&[95, 96, 99]) {
        Some(&THUNDER)
    } else {
        None
    }
}

pub fn prompt_modifier<R: Rng + ?Sized>(weather: &Weather, rng: &mut R) -> Option<&'static str> {
    modifier_group(weather)?.choose(rng).copied()
}
