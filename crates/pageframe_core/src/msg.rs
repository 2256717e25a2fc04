use crate::{Generation, RetrievalFailure, RetrievalResult, SurfaceSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// The URL input regained focus.
    InputFocused,
    /// User submitted the current URL input.
    UrlSubmitted,
    /// The retrieval collaborator answered (or failed to) for a submission.
    RetrievalCompleted {
        generation: Generation,
        result: Result<RetrievalResult, RetrievalFailure>,
    },
    /// The sandboxed surface finished loading and was measured.
    SurfaceSettled(SurfaceSummary),
    /// The renderer could not mount the retrieved content.
    RenderFailed {
        generation: Generation,
        reason: String,
    },
}

impl Msg {
    /// Submission this message reports on, if it belongs to one.
    pub fn generation(&self) -> Option<Generation> {
        match self {
            Msg::RetrievalCompleted { generation, .. } | Msg::RenderFailed { generation, .. } => {
                Some(*generation)
            }
            Msg::SurfaceSettled(summary) => Some(summary.generation),
            Msg::InputChanged(_) | Msg::InputFocused | Msg::UrlSubmitted => None,
        }
    }
}
