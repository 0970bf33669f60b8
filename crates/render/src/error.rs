//! Render errors including response I/O.

use pagerender_core::{BuildRejected, ValidationErrors};
use thiserror::Error;

/// Failures reported by a response collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("Failed to render template {name}: {reason}")]
    Template { name: String, reason: String },

    #[error("Failed to send payload: {0}")]
    Send(String),

    #[error("Response already finished")]
    Finished,
}

/// Render errors.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Rejected(#[from] BuildRejected),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
