//! Pageframe engine: retrieval client, sandboxed rendering and effect execution.
mod engine;
mod layout;
mod markup;
mod preview;
mod retrieve;
mod sandbox;
mod scroll;
mod types;

pub use engine::{
    start_engine, start_engine_with, EngineConfig, EngineError, EngineEvents, EngineHandle,
};
pub use layout::{BlockFlowProbe, LayoutProbe};
pub use markup::{rewrite_links, RewrittenDocument, LINK_REL, LINK_TARGET};
pub use preview::{prepare_preview, MAX_PREVIEW_CONTENT};
pub use retrieve::{ReqwestRetriever, RetrievalSettings, Retriever, FETCH_PATH};
pub use sandbox::{
    AccessError, DocumentWriter, RenderError, RenderedSurface, RendererSettings, SandboxPolicy,
    SandboxRenderer, SettleReport, Surface,
};
pub use scroll::{
    ScrollBehavior, ScrollBlock, ScrollCoordinator, ScrollOptions, ScrollTarget,
    DEFAULT_SETTLE_DELAY,
};
pub use types::{EngineEvent, FailureKind, FetchError, Generation, RetrievalOutput};
