use thiserror::Error;

/// The only way classification can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("Invalid observation: `{field}` {reason}")]
    InvalidObservation { field: &'static str, reason: String },
}

impl ClassifyError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidObservation { field, reason: reason.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error(
        "Invalid coordinates ({latitude}, {longitude}): \
         latitude must be -90..=90, longitude must be -180..=180"
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}
