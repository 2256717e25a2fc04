use std::sync::mpsc;
use std::thread;

use engine_logging::{engine_info, engine_warn};
use pageframe_core::{Effect, Msg, RetrievalFailure, RetrievalResult, SurfaceSummary};
use pageframe_engine::{
    EngineEvent, EngineEvents, EngineHandle, FailureKind, FetchError, RenderedSurface,
    RetrievalOutput, ScrollOptions, ScrollTarget, SettleReport,
};

use super::app::Inbound;

/// Executes core effects against the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, events: EngineEvents, tx: mpsc::Sender<Inbound>) -> Self {
        spawn_event_loop(events, tx);
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScrollToResults => self.engine.scroll_to_results(),
                Effect::Retrieve {
                    generation,
                    request,
                } => {
                    engine_info!(
                        "Retrieve generation={} url_len={} url={}",
                        generation,
                        request.url.len(),
                        request.url
                    );
                    self.engine.retrieve(generation, request.url);
                }
                Effect::RenderSurface {
                    generation,
                    content,
                } => {
                    engine_info!("Render generation={} bytes={}", generation, content.len());
                    self.engine.render(generation, content);
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, tx: mpsc::Sender<Inbound>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if tx.send(Inbound::Msg(map_event(event))).is_err() {
                return;
            }
        }
        engine_info!("Engine event channel closed");
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RetrievalCompleted { generation, result } => Msg::RetrievalCompleted {
            generation,
            result: result.map(map_output).map_err(|err| {
                engine_warn!(
                    "Retrieval for generation {} failed: {} ({})",
                    generation,
                    err.kind,
                    err.message
                );
                map_failure(err)
            }),
        },
        EngineEvent::SurfaceSettled(surface) => Msg::SurfaceSettled(map_surface(surface)),
        EngineEvent::RenderFailed { generation, error } => Msg::RenderFailed {
            generation,
            reason: error.to_string(),
        },
    }
}

fn map_output(output: RetrievalOutput) -> RetrievalResult {
    RetrievalResult {
        title: output.title,
        content: output.content,
    }
}

fn map_failure(err: FetchError) -> RetrievalFailure {
    match err.kind {
        FailureKind::InvalidEndpoint | FailureKind::Network | FailureKind::Timeout => {
            RetrievalFailure::transport()
        }
        FailureKind::HttpStatus { status, error } => RetrievalFailure::remote(Some(status), error),
        FailureKind::RemoteError { status, error } => {
            RetrievalFailure::remote(Some(status), Some(error))
        }
        FailureKind::TooLarge { .. } | FailureKind::MalformedResponse => {
            RetrievalFailure::malformed()
        }
    }
}

fn map_surface(surface: RenderedSurface) -> SurfaceSummary {
    let (height_px, links_rewritten) = match surface.report {
        SettleReport::Measured {
            height_px,
            links_rewritten,
        } => (Some(height_px), Some(links_rewritten)),
        SettleReport::GeometryUnknown => (None, None),
    };
    SurfaceSummary {
        generation: surface.generation,
        sandbox: surface.sandbox,
        height_px,
        links_rewritten,
        preview: surface.preview,
    }
}

/// Scroll requests from the engine land back in the dispatcher, which prints the results section.
pub struct ResultsScroller {
    tx: mpsc::Sender<Inbound>,
}

impl ResultsScroller {
    pub fn new(tx: mpsc::Sender<Inbound>) -> Self {
        Self { tx }
    }
}

impl ScrollTarget for ResultsScroller {
    fn scroll_into_view(&self, _options: ScrollOptions) {
        let _ = self.tx.send(Inbound::ScrollToResults);
    }
}

#[cfg(test)]
mod tests {
    use pageframe_core::{FailureKind as CoreKind, FALLBACK_ERROR_MESSAGE};
    use pageframe_engine::RenderError;

    use super::*;

    fn fetch_error(kind: FailureKind) -> FetchError {
        FetchError {
            kind,
            message: "detail".to_string(),
        }
    }

    #[test]
    fn transport_failures_use_fallback_message() {
        for kind in [FailureKind::Network, FailureKind::Timeout, FailureKind::InvalidEndpoint] {
            let failure = map_failure(fetch_error(kind));
            assert_eq!(failure.kind, CoreKind::Transport);
            assert_eq!(failure.display_message(), FALLBACK_ERROR_MESSAGE);
        }
    }

    #[test]
    fn remote_failures_keep_their_message() {
        let failure = map_failure(fetch_error(FailureKind::HttpStatus {
            status: 404,
            error: Some("Not found".to_string()),
        }));
        assert_eq!(failure.kind, CoreKind::Remote { status: Some(404) });
        assert_eq!(failure.display_message(), "Not found");

        let failure = map_failure(fetch_error(FailureKind::HttpStatus {
            status: 502,
            error: None,
        }));
        assert_eq!(failure.display_message(), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn oversized_body_is_malformed() {
        let failure = map_failure(fetch_error(FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(20),
        }));
        assert_eq!(failure.kind, CoreKind::MalformedResponse);
    }

    #[test]
    fn unknown_geometry_maps_to_empty_measurements() {
        let msg = map_event(EngineEvent::SurfaceSettled(RenderedSurface {
            generation: 2,
            sandbox: "allow-scripts".to_string(),
            report: SettleReport::GeometryUnknown,
            preview: "text".to_string(),
        }));
        match msg {
            Msg::SurfaceSettled(summary) => {
                assert_eq!(summary.generation, 2);
                assert_eq!(summary.height_px, None);
                assert_eq!(summary.links_rewritten, None);
            }
            other => panic!("unexpected msg: {other:?}"),
        }
    }

    #[test]
    fn render_failure_carries_reason() {
        let msg = map_event(EngineEvent::RenderFailed {
            generation: 5,
            error: RenderError::LoadAborted,
        });
        assert_eq!(
            msg,
            Msg::RenderFailed {
                generation: 5,
                reason: RenderError::LoadAborted.to_string()
            }
        );
    }
}
