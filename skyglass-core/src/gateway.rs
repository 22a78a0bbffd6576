use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::ErrorKind,
    model::{Coordinates, CurrentConditions, ForecastDay},
};

pub mod openweather;

pub use openweather::OpenWeatherGateway;

/// Remote weather queries. One outbound request per call, no retries.
#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    async fn fetch_current_by_name(&self, name: &str) -> Result<CurrentConditions, ErrorKind>;

    async fn fetch_current_by_coords(
        &self,
        coords: Coordinates,
    ) -> Result<CurrentConditions, ErrorKind>;

    async fn fetch_forecast_by_name(&self, name: &str) -> Result<Vec<ForecastDay>, ErrorKind>;
}

/// Construct the production gateway from config.
pub fn gateway_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherGateway>> {
    let api_key = config.resolve_api_key();
    if api_key.is_empty() {
        tracing::warn!("No API key configured; the provider will reject requests");
    }

    let gateway = OpenWeatherGateway::new(
        config.base_url.clone(),
        api_key,
        std::time::Duration::from_secs(config.timeout_secs),
    )?;

    Ok(Box::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_from_config_builds_without_key() {
        let cfg = Config::default();
        assert!(gateway_from_config(&cfg).is_ok());
    }
}
