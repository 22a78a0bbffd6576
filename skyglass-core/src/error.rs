use thiserror::Error;

/// Every way a lookup can go wrong.
///
/// Only `LocationNotFound`, `NetworkFailure` and `MalformedResponse` ever reach
/// [`LookupState::Failed`](crate::LookupState::Failed); the others are handled
/// where they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    #[error("Please enter a city name")]
    ValidationError,

    #[error("City not found")]
    LocationNotFound,

    #[error("Could not reach the weather provider")]
    NetworkFailure,

    #[error("The weather provider returned an unexpected response")]
    MalformedResponse,

    #[error("Location permission denied or unavailable")]
    PermissionDeniedOrUnavailable,

    #[error("Stored search history could not be read")]
    StorageReadError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(ErrorKind::LocationNotFound.to_string(), "City not found");
        assert!(ErrorKind::ValidationError.to_string().contains("city name"));
    }
}
