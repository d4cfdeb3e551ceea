//! Error Types
//!
//! This module defines the error types used throughout the server.
//!
//! # Overview
//!
//! The main error type [`ServerError`] covers all failure modes described by
//! the render-request protocol:
//! - Malformed or out-of-range request parameters
//! - Failures reported by the external renderer
//! - Unexpected I/O or internal failures
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, ServerError>`.

use thiserror::Error;

/// The main error type for the render server.
///
/// Each variant corresponds to one of the three abstract error kinds the
/// render-request protocol distinguishes: `BadRequest`, `RenderFailed`, and
/// `InternalError`. The HTTP boundary collapses all of them to the same wire
/// shape (see [`crate::http::error_response`]), but keeping them distinct
/// here lets the rest of the server log and test them precisely.
#[derive(Error, Debug)]
pub enum ServerError {
    // ========================================================================
    // Bad Request — malformed or out-of-range client input
    // ========================================================================
    /// A declared field was missing from the request.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A field name was present that the schema does not declare.
    #[error("unrecognized field: {0}")]
    UnknownField(String),

    /// A field's value could not be coerced to its declared semantic type,
    /// or was outside that type's declared domain.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidField {
        /// The field name.
        field: String,
        /// Human-readable description of why the value was rejected.
        reason: String,
    },

    /// The multipart body did not contain exactly one file part named `scene`.
    #[error("expected exactly one file part named 'scene': {0}")]
    ScenePartMissing(String),

    /// The multipart body itself could not be parsed.
    #[error("malformed multipart body: {0}")]
    MultipartError(String),

    // ========================================================================
    // Render Failed — the external renderer rejected the request
    // ========================================================================
    /// The glTF scene has no node named `"Camera Node"`.
    #[error("camera node not found in scene")]
    CameraNodeMissing,

    /// The renderer reported a failure while executing the pipeline.
    #[error("render failed: {0}")]
    RenderFailed(String),

    /// The renderer did not produce the expected output file.
    #[error("renderer did not produce an output file at {0}")]
    OutputFileMissing(String),

    // ========================================================================
    // Internal Error — unexpected failures
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// PNG encode/decode error.
    #[error("image error: {0}")]
    ImageError(String),

    /// A background (blocking) task failed to complete.
    #[error("task join error: {0}")]
    TaskJoinError(String),
}

impl ServerError {
    /// Classifies this error into the abstract kind the protocol specifies,
    /// mostly for logging severity — the wire response is uniform (see §7).
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerError::MissingField(_)
            | ServerError::UnknownField(_)
            | ServerError::InvalidField { .. }
            | ServerError::ScenePartMissing(_)
            | ServerError::MultipartError(_) => ErrorKind::BadRequest,

            ServerError::CameraNodeMissing
            | ServerError::RenderFailed(_)
            | ServerError::OutputFileMissing(_) => ErrorKind::RenderFailed,

            ServerError::IoError(_)
            | ServerError::GltfError(_)
            | ServerError::ImageError(_)
            | ServerError::TaskJoinError(_) => ErrorKind::InternalError,
        }
    }
}

/// The three abstract error kinds the render-request protocol distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Parameter missing, unknown, ill-typed, or outside declared domain.
    BadRequest,
    /// External renderer refused the scene, camera node not found, or the
    /// expected output file was not produced.
    RenderFailed,
    /// Unexpected exception, e.g. a filesystem failure.
    InternalError,
}

impl From<gltf::Error> for ServerError {
    fn from(err: gltf::Error) -> Self {
        ServerError::GltfError(err.to_string())
    }
}

impl From<image::ImageError> for ServerError {
    fn from(err: image::ImageError) -> Self {
        ServerError::ImageError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::TaskJoinError(err.to_string())
    }
}

/// Alias for `Result<T, ServerError>`.
pub type Result<T> = std::result::Result<T, ServerError>;
