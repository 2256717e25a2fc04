/// Tag issued for every validated submission; later submissions get larger values.
pub type Generation = u64;

/// Shown when a failure carries no usable message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to fetch content";
/// Displayed title when the retrieved page has none.
pub const NO_TITLE: &str = "No title";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalResult {
    pub title: Option<String>,
    pub content: String,
}

impl RetrievalResult {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(NO_TITLE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never completed (connect, DNS, timeout, body read).
    Transport,
    /// The collaborator answered with a non-success status or an explicit error.
    Remote { status: Option<u16> },
    /// The response body was not the expected JSON document.
    MalformedResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalFailure {
    pub kind: FailureKind,
    pub message: Option<String>,
}

impl RetrievalFailure {
    pub fn transport() -> Self {
        Self {
            kind: FailureKind::Transport,
            message: None,
        }
    }

    pub fn remote(status: Option<u16>, message: Option<String>) -> Self {
        Self {
            kind: FailureKind::Remote { status },
            message,
        }
    }

    pub fn malformed() -> Self {
        Self {
            kind: FailureKind::MalformedResponse,
            message: None,
        }
    }

    /// Text for the error banner. Only remote failures surface their own message.
    pub fn display_message(&self) -> &str {
        match self.kind {
            FailureKind::Remote { .. } => self
                .message
                .as_deref()
                .filter(|message| !message.is_empty())
                .unwrap_or(FALLBACK_ERROR_MESSAGE),
            FailureKind::Transport | FailureKind::MalformedResponse => FALLBACK_ERROR_MESSAGE,
        }
    }
}
