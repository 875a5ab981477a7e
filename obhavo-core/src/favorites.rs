use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode, header};
use serde_json::json;
use std::fmt::Debug;
use thiserror::Error;

use crate::Config;
use crate::model::{FavoriteCity, WeatherSnapshot};

/// The one logical table favorites live in.
pub const FAVORITES_TABLE: &str = "weather_favorites";

/// A favorites CRUD call that did not go through.
///
/// The store reports failures explicitly; the controller is the layer that
/// decides to swallow them and keep the last-known list.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("favorites request never completed")]
    Transport(#[source] reqwest::Error),

    #[error("favorites request rejected with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("favorites response could not be decoded")]
    Decode(#[source] reqwest::Error),
}

#[async_trait]
pub trait FavoritesStore: Send + Sync + Debug {
    /// All favorites, newest first (created_at descending).
    async fn list(&self) -> Result<Vec<FavoriteCity>, StoreError>;

    /// Insert a favorite built from the snapshot: its name and country,
    /// coordinates defaulted to 0.0, notes empty. The id is assigned by
    /// the store.
    async fn add(&self, snapshot: &WeatherSnapshot) -> Result<(), StoreError>;

    /// Replace the notes of one favorite and bump its updated_at.
    async fn update(&self, id: i64, notes: &str) -> Result<(), StoreError>;

    /// Delete one favorite.
    async fn remove(&self, id: i64) -> Result<(), StoreError>;
}

/// `FavoritesStore` backed by a hosted PostgREST-style table endpoint.
#[derive(Debug, Clone)]
pub struct RestFavoritesStore {
    base_url: String,
    api_key: String,
    http: Client,
}

impl RestFavoritesStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
            http: Client::new(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{FAVORITES_TABLE}", self.base_url)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn check(res: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status,
            body: truncate_body(&body),
        })
    }
}

#[async_trait]
impl FavoritesStore for RestFavoritesStore {
    async fn list(&self) -> Result<Vec<FavoriteCity>, StoreError> {
        let res = self
            .authed(self.http.get(self.table_url()))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(StoreError::Transport)?;

        Self::check(res)
            .await?
            .json::<Vec<FavoriteCity>>()
            .await
            .map_err(StoreError::Decode)
    }

    async fn add(&self, snapshot: &WeatherSnapshot) -> Result<(), StoreError> {
        let row = json!([{
            "city_name": snapshot.name,
            "country": snapshot.country,
            "latitude": snapshot.latitude.unwrap_or(0.0),
            "longitude": snapshot.longitude.unwrap_or(0.0),
            "notes": "",
        }]);

        let res = self
            .authed(self.http.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(StoreError::Transport)?;

        Self::check(res).await.map(|_| ())
    }

    async fn update(&self, id: i64, notes: &str) -> Result<(), StoreError> {
        let patch = json!({
            "notes": notes,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let res = self
            .authed(self.http.patch(self.table_url()))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await
            .map_err(StoreError::Transport)?;

        Self::check(res).await.map(|_| ())
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        let res = self
            .authed(self.http.delete(self.table_url()))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(StoreError::Transport)?;

        Self::check(res).await.map(|_| ())
    }
}

/// Construct the live store from config.
pub fn store_from_config(config: &Config) -> anyhow::Result<Box<dyn FavoritesStore>> {
    let store = config.store().ok_or_else(|| {
        anyhow::anyhow!(
            "No favorites backend configured.\n\
             Hint: run `obhavo configure` and enter the store URL and key."
        )
    })?;

    Ok(Box::new(RestFavoritesStore::new(
        store.url.clone(),
        store.api_key.clone(),
    )))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back off to a char boundary so multibyte bodies cannot panic.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
