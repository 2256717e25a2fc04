use std::fmt;

use crate::sandbox::{RenderError, RenderedSurface};

pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    RetrievalCompleted {
        generation: Generation,
        result: Result<RetrievalOutput, FetchError>,
    },
    SurfaceSettled(RenderedSurface),
    RenderFailed {
        generation: Generation,
        error: RenderError,
    },
}

/// Successful answer of the retrieval collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalOutput {
    pub title: Option<String>,
    pub content: String,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Human-readable message supplied by the collaborator, if any.
    pub fn remote_message(&self) -> Option<&str> {
        match &self.kind {
            FailureKind::HttpStatus { error, .. } => error.as_deref(),
            FailureKind::RemoteError { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    Network,
    Timeout,
    /// Non-success status; `error` is the body's `error` field when present.
    HttpStatus { status: u16, error: Option<String> },
    /// Success status whose body carried an explicit `error` field.
    RemoteError { status: u16, error: String },
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid retrieval endpoint"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus { status, .. } => write!(f, "http status {status}"),
            FailureKind::RemoteError { status, error } => {
                write!(f, "remote error (status {status}): {error}")
            }
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}
