use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One current-weather reading for one query.
///
/// A snapshot is fully replaced on every fetch (live or fallback), never
/// merged with the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    pub country: String,
    pub temp_c: i32,
    pub feels_like_c: i32,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub visibility_m: u32,
    pub wind_speed_mps: f64,
    pub wind_deg: u16,
    /// Coarse category, e.g. "Clear", "Clouds", "Rain", "Fog".
    pub condition: String,
    pub description: String,
    /// Upstream icon code, e.g. "01d".
    pub icon: String,
    /// Local time of day, "HH:MM".
    pub sunrise: String,
    pub sunset: String,
    /// The current-weather mapping never fills these in; favoriting falls
    /// back to 0.0.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A persisted favorite city row from the `weather_favorites` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteCity {
    /// Assigned by the store, never by the client.
    pub id: i64,
    pub city_name: String,
    pub country: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FavoriteCity {
    pub fn notes(&self) -> &str {
        self.notes.as_deref().unwrap_or_default()
    }
}

/// Which favorite is in edit mode, plus the draft notes text.
///
/// Exists only between start-edit and save/cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub id: i64,
    pub draft: String,
}

/// How a lookup resolved. The three outcomes are ordinary values, not
/// errors: callers must be able to tell "the API answered with an error"
/// apart from "the API was unreachable", because the two carry different
/// fixed payloads and only the latter is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Upstream answered 2xx with a parseable body.
    Live,
    /// Upstream answered with a non-success status or an unreadable body;
    /// the snapshot is a fixed fallback payload.
    ApiRejected,
    /// No response was received at all; the snapshot is the fixed demo
    /// payload and `message` is shown to the user.
    Offline { message: String },
}

/// The result of one weather lookup: a snapshot plus the outcome tag.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub snapshot: WeatherSnapshot,
    pub outcome: FetchOutcome,
}

impl LookupResult {
    pub fn is_offline(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Offline { .. })
    }

    pub fn offline_message(&self) -> Option<&str> {
        match &self.outcome {
            FetchOutcome::Offline { message } => Some(message),
            _ => None,
        }
    }
}
