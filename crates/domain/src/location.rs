#[allow(async_fn_in_trait)]
pub trait LocationProvider {
    /// Request a single reading of the current position.
    async fn location(&self) -> Result<Location, LocationError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LocationError {
    #[error("location is not supported")]
    Unsupported,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Provider for environments without any location support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    async fn location(&self) -> Result<Location, LocationError> {
        Err(LocationError::Unsupported)
    }
}
