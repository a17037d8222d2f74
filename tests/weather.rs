use chrono::NaiveDate;
use frame_art::config::{Coordinates, Settings};
use frame_art::pipeline::DailyArt;
use frame_art::weather::{Weather, WeatherClient};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LONDON: Coordinates = Coordinates {
    latitude: 51.5,
    longitude: -0.12,
};

async fn forecast(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "51.5"))
        .and(query_param("longitude", "-0.12"))
        .and(query_param("current", "temperature_2m,weather_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn reads_current_conditions() {
    let server = MockServer::start().await;
    forecast(
        &server,
        serde_json::json!({ "current": { "temperature_2m": 8.5, "weather_code": 63 } }),
    )
    .await;

    let weather = WeatherClient::new(server.uri()).current(LONDON).await;
    assert_eq!(
        weather,
        Some(Weather {
            condition: "Moderate rain",
            temperature_c: Some(8.5),
            code: Some(63),
        })
    );
}

#[tokio::test]
async fn missing_current_block_is_unknown() {
    let server = MockServer::start().await;
    forecast(&server, serde_json::json!({ "latitude": 51.5 })).await;

    let weather = WeatherClient::new(server.uri()).current(LONDON).await.unwrap();
    assert_eq!(weather.condition, "Unknown");
    assert_eq!(weather.code, None);
}

#[tokio::test]
async fn server_errors_mean_no_weather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert_eq!(WeatherClient::new(server.uri()).current(LONDON).await, None);
}

#[tokio::test]
async fn snowy_weather_shades_the_prompt() {
    let server = MockServer::start().await;
    forecast(
        &server,
        serde_json::json!({ "current": { "temperature_2m": -2.0, "weather_code": 73 } }),
    )
    .await;

    let env: HashMap<&str, &str> = [
        ("WEATHER_LATITUDE", "51.5"),
        ("WEATHER_LONGITUDE", "-0.12"),
    ]
    .into();
    let settings = Settings::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
    let daily = DailyArt::new(settings).with_weather_client(WeatherClient::new(server.uri()));

    let date = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
    let prompt = daily.prompt_for(date, true).await;
    assert!(prompt.contains("Reflect today's weather: "));
    assert!(prompt.contains("snow"));

    let plain = daily.prompt_for(date, false).await;
    assert!(!plain.contains("Reflect today's weather"));
}
