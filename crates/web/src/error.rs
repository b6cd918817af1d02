use micro_rest::routing::RouteError;
use thiserror::Error;

/// A malformed element of a preference header such as `Accept`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("invalid quality value in '{token}'")]
    InvalidQuality { token: String },

    #[error("invalid media range '{token}'")]
    InvalidMediaRange { token: String },

    #[error("invalid range '{token}'")]
    InvalidRange { token: String },
}

impl PreferenceError {
    pub fn invalid_quality<S: ToString>(token: S) -> Self {
        Self::InvalidQuality { token: token.to_string() }
    }

    pub fn invalid_media_range<S: ToString>(token: S) -> Self {
        Self::InvalidMediaRange { token: token.to_string() }
    }

    pub fn invalid_range<S: ToString>(token: S) -> Self {
        Self::InvalidRange { token: token.to_string() }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    #[error("base reference '{base}' must be absolute")]
    RelativeBase { base: String },

    #[error(transparent)]
    Route(#[from] RouteError),
}
