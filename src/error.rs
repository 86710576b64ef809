use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Failures talking to the remote catalog.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Failures surfaced by the list and form views.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Another request is still in flight")]
    Busy,

    #[error("The form has not finished loading")]
    NotReady,

    #[error("Form is invalid: {0}")]
    Invalid(ValidationErrors),

    #[error("Failed to read image {}: {source}", .path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not an image ({mime})", .path.display())]
    NotAnImage { path: PathBuf, mime: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<ValidationErrors> for ViewError {
    fn from(errors: ValidationErrors) -> Self {
        ViewError::Invalid(errors)
    }
}
