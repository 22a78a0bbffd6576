use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::ErrorKind, model::Coordinates};

/// Device position source. Failure is always `PermissionDeniedOrUnavailable`.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, ErrorKind>;
}

/// A position supplied up front, e.g. from command-line flags.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, ErrorKind> {
        Ok(self.0)
    }
}

/// No position source available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPosition;

#[async_trait]
impl Geolocator for NoPosition {
    async fn current_position(&self) -> Result<Coordinates, ErrorKind> {
        Err(ErrorKind::PermissionDeniedOrUnavailable)
    }
}
