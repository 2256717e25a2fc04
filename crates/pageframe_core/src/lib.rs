//! Pageframe core: pure request/render state machine and view-model helpers.
mod effect;
mod msg;
mod presenter;
mod retrieval;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use presenter::{ErrorBanner, WARNING_GLYPH};
pub use retrieval::{
    FailureKind, Generation, RetrievalFailure, RetrievalResult, SubmissionRequest,
    FALLBACK_ERROR_MESSAGE, NO_TITLE,
};
pub use state::{AppState, InfoBar, SurfaceSummary, UiRegions, ViewState};
pub use update::update;
pub use validate::{validate_input, ValidationError, EMPTY_INPUT_MESSAGE};
pub use view_model::AppViewModel;
