use async_trait::async_trait;
use chrono::{DateTime, Local};
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::Config;
use crate::model::{FetchOutcome, LookupResult, WeatherSnapshot};

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Shown alongside the demo payload when the API is unreachable.
const OFFLINE_MESSAGE: &str = "Internet aloqasi yoʼq. Demo maʼlumotlar.";

/// City-name substrings that select the capital fallback payload.
const CAPITAL_ALIASES: [&str; 2] = ["tashkent", "toshkent"];

#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    /// Look up current weather for a city.
    ///
    /// Never fails past this boundary: a rejecting or unreachable upstream
    /// yields a fixed fallback snapshot, tagged accordingly in the result.
    async fn fetch(&self, city: &str) -> LookupResult;
}

/// `WeatherLookup` backed by the OpenWeather current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherLookup {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherLookup {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: OPENWEATHER_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at a different endpoint, e.g. a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherLookup {
    async fn fetch(&self, city: &str) -> LookupResult {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::debug!(%err, "weather request never completed, serving demo data");
                return LookupResult {
                    snapshot: demo_snapshot(),
                    outcome: FetchOutcome::Offline {
                        message: OFFLINE_MESSAGE.to_string(),
                    },
                };
            }
        };

        let status = res.status();
        if !status.is_success() {
            tracing::debug!(%status, city, "weather request rejected, serving fallback");
            return LookupResult {
                snapshot: rejected_fallback(city),
                outcome: FetchOutcome::ApiRejected,
            };
        }

        match res.json::<OwCurrentResponse>().await {
            Ok(parsed) => LookupResult {
                snapshot: map_current(parsed),
                outcome: FetchOutcome::Live,
            },
            // The API did answer, so an unreadable body counts as a
            // rejection, not as being offline.
            Err(err) => {
                tracing::debug!(%err, city, "failed to decode weather response, serving fallback");
                LookupResult {
                    snapshot: rejected_fallback(city),
                    outcome: FetchOutcome::ApiRejected,
                }
            }
        }
    }
}

/// Construct the live lookup service from config.
pub fn lookup_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherLookup>> {
    let api_key = config.weather_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No weather API key configured.\n\
             Hint: run `obhavo configure` and enter your OpenWeather API key."
        )
    })?;

    Ok(Box::new(OpenWeatherLookup::new(api_key.to_owned())))
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    visibility: u32,
}

fn map_current(parsed: OwCurrentResponse) -> WeatherSnapshot {
    let (condition, description, icon) = match parsed.weather.into_iter().next() {
        Some(w) => (w.main, w.description, w.icon),
        None => ("Unknown".to_string(), String::new(), String::new()),
    };

    WeatherSnapshot {
        name: parsed.name,
        country: parsed.sys.country,
        temp_c: parsed.main.temp.round() as i32,
        feels_like_c: parsed.main.feels_like.round() as i32,
        humidity_pct: parsed.main.humidity,
        pressure_hpa: parsed.main.pressure,
        visibility_m: parsed.visibility,
        wind_speed_mps: parsed.wind.speed,
        wind_deg: parsed.wind.deg.unwrap_or(0),
        condition,
        description,
        icon,
        sunrise: local_time_of_day(parsed.sys.sunrise),
        sunset: local_time_of_day(parsed.sys.sunset),
        latitude: None,
        longitude: None,
    }
}

fn local_time_of_day(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default()
}

fn is_capital_query(city: &str) -> bool {
    let lower = city.to_lowercase();
    CAPITAL_ALIASES.iter().any(|alias| lower.contains(alias))
}

fn rejected_fallback(city: &str) -> WeatherSnapshot {
    if is_capital_query(city) {
        fog_snapshot()
    } else {
        clear_snapshot(city)
    }
}

/// Fixed payload for capital-city queries the API rejected.
fn fog_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        name: "Tashkent".to_string(),
        country: "UZ".to_string(),
        temp_c: -1,
        feels_like_c: -5,
        humidity_pct: 92,
        pressure_hpa: 1039,
        visibility_m: 600,
        wind_speed_mps: 1.8,
        wind_deg: 110,
        condition: "Fog".to_string(),
        description: "Qalin tuman".to_string(),
        icon: "50d".to_string(),
        sunrise: "07:48".to_string(),
        sunset: "17:18".to_string(),
        latitude: None,
        longitude: None,
    }
}

/// Fixed payload for any other rejected query; keeps the requested name.
fn clear_snapshot(city: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        name: city.to_string(),
        country: "XX".to_string(),
        temp_c: 24,
        feels_like_c: 23,
        humidity_pct: 55,
        pressure_hpa: 1012,
        visibility_m: 10000,
        wind_speed_mps: 5.2,
        wind_deg: 200,
        condition: "Clear".to_string(),
        description: "Ochiq osmon".to_string(),
        icon: "01d".to_string(),
        sunrise: "06:15".to_string(),
        sunset: "19:30".to_string(),
        latitude: None,
        longitude: None,
    }
}

/// Fixed payload shown when the API is unreachable, whatever was queried.
fn demo_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        name: "Tashkent".to_string(),
        country: "UZ".to_string(),
        temp_c: 0,
        feels_like_c: -4,
        humidity_pct: 90,
        pressure_hpa: 1035,
        visibility_m: 1000,
        wind_speed_mps: 2.0,
        wind_deg: 90,
        condition: "Clouds".to_string(),
        description: "Bulutli".to_string(),
        icon: "04d".to_string(),
        sunrise: "07:50".to_string(),
        sunset: "17:20".to_string(),
        latitude: None,
        longitude: None,
    }
}
