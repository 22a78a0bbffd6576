//! Reconciles geolocation and manual search triggers into one [`LookupState`].
//!
//! Every resolution attempt takes a sequence token when it starts. Its result
//! is published only if no later attempt has started since, so a slow earlier
//! search can never overwrite a later one.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

use crate::{
    error::ErrorKind,
    gateway::WeatherGateway,
    history::HistoryStore,
    location::Geolocator,
    model::{HistoryEntry, LocationKey, LookupState},
};

/// Whether an attempt's outcome became the published state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Superseded,
}

#[derive(Debug)]
struct Inner {
    latest_token: u64,
    store: HistoryStore,
    history: Vec<HistoryEntry>,
}

#[derive(Debug)]
pub struct LookupCoordinator {
    gateway: Arc<dyn WeatherGateway>,
    geolocator: Arc<dyn Geolocator>,
    state: watch::Sender<LookupState>,
    inner: Mutex<Inner>,
}

impl LookupCoordinator {
    pub fn new(
        gateway: Arc<dyn WeatherGateway>,
        geolocator: Arc<dyn Geolocator>,
        mut store: HistoryStore,
    ) -> Self {
        let history = store.load();
        let (state, _) = watch::channel(LookupState::Idle);

        Self {
            gateway,
            geolocator,
            state,
            inner: Mutex::new(Inner {
                latest_token: 0,
                store,
                history,
            }),
        }
    }

    /// Look up weather for the device position, if one is available.
    ///
    /// Returns `None` without touching state when the position is denied or
    /// unavailable.
    pub async fn startup(&self) -> Option<Resolution> {
        let coords = match self.geolocator.current_position().await {
            Ok(coords) => coords,
            Err(kind) => {
                tracing::debug!("Skipping automatic lookup: {kind}");
                return None;
            }
        };

        let token = self.begin();
        let key = LocationKey::coords(coords.latitude, coords.longitude);
        Some(self.resolve(token, key).await)
    }

    /// Look up weather for a user-entered place name.
    ///
    /// Blank input is rejected with `ValidationError` and leaves state as is.
    pub async fn search_by_name(&self, raw: &str) -> Result<Resolution, ErrorKind> {
        let key = LocationKey::name(raw)?;
        let token = self.begin();
        Ok(self.resolve(token, key).await)
    }

    /// Re-run the search for the history entry at `index`.
    pub async fn select_history(&self, index: usize) -> Result<Resolution, ErrorKind> {
        let name = self
            .inner
            .lock()
            .history
            .get(index)
            .cloned()
            .ok_or(ErrorKind::ValidationError)?;

        self.search_by_name(&name).await
    }

    pub fn state(&self) -> LookupState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.subscribe()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.lock().history.clone()
    }

    fn begin(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.latest_token += 1;
        self.state.send_replace(LookupState::Loading);
        inner.latest_token
    }

    async fn resolve(&self, token: u64, key: LocationKey) -> Resolution {
        tracing::debug!(token, %key, "Resolving location");

        let fetched = match &key {
            LocationKey::Name(name) => self.gateway.fetch_current_by_name(name).await,
            LocationKey::Coords(coords) => self.gateway.fetch_current_by_coords(*coords).await,
        };

        let current = match fetched {
            Ok(current) => current,
            Err(kind) => {
                tracing::info!(token, %key, "Lookup failed: {kind}");
                return self.publish(token, LookupState::Failed(kind));
            }
        };

        // History and forecast follow the provider's name, not the raw input.
        if !self.record_history(token, &current.name) {
            return Resolution::Superseded;
        }

        let forecast = match self.gateway.fetch_forecast_by_name(&current.name).await {
            Ok(days) => days,
            Err(kind) => {
                tracing::warn!(name = %current.name, "Forecast unavailable: {kind}");
                Vec::new()
            }
        };

        self.publish(token, LookupState::Ready { current, forecast })
    }

    fn record_history(&self, token: u64, name: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.latest_token != token {
            tracing::debug!(token, "Discarding superseded lookup");
            return false;
        }

        // A single small file write; holding the lock keeps history writes ordered.
        inner.history = inner.store.record(name);
        true
    }

    fn publish(&self, token: u64, next: LookupState) -> Resolution {
        let inner = self.inner.lock();
        if inner.latest_token != token {
            tracing::debug!(token, latest = inner.latest_token, "Discarding superseded lookup");
            return Resolution::Superseded;
        }

        self.state.send_replace(next);
        Resolution::Applied
    }
}
