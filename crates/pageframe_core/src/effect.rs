use crate::{Generation, SubmissionRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Bring the results section into view once layout has settled.
    ScrollToResults,
    /// Send the submission to the retrieval collaborator.
    Retrieve {
        generation: Generation,
        request: SubmissionRequest,
    },
    /// Replace the active sandboxed surface with freshly retrieved markup.
    RenderSurface {
        generation: Generation,
        content: String,
    },
}
