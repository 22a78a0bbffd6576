//! Core library for the `skyglass` weather lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather gateway and payload normalization
//! - Bounded search history over durable storage
//! - The lookup coordinator that turns triggers into a single published state
//!
//! It is used by `skyglass-cli`, but any presentation layer can drive the
//! [`LookupCoordinator`] and render its [`LookupState`].

pub mod config;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod history;
pub mod location;
pub mod model;
pub mod normalize;
pub mod storage;

pub use config::Config;
pub use coordinator::{LookupCoordinator, Resolution};
pub use error::ErrorKind;
pub use gateway::{OpenWeatherGateway, WeatherGateway, gateway_from_config};
pub use history::HistoryStore;
pub use location::{FixedPosition, Geolocator, NoPosition};
pub use model::{
    ConditionCategory, Coordinates, CurrentConditions, ForecastDay, HistoryEntry, LocationKey,
    LookupState,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
