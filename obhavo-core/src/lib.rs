//! Core library for the `obhavo` weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather lookup service and its fallback policy
//! - The favorites store backed by a hosted table
//! - The view-state controller the presentation layer renders from
//!
//! It is used by `obhavo-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod controller;
pub mod favorites;
pub mod lookup;
pub mod model;

pub use config::{Config, StoreConfig, WeatherConfig};
pub use controller::Controller;
pub use favorites::{FavoritesStore, RestFavoritesStore, StoreError};
pub use lookup::{OpenWeatherLookup, WeatherLookup};
pub use model::{EditState, FavoriteCity, FetchOutcome, LookupResult, WeatherSnapshot};
