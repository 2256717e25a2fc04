use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, with_generation};
use tokio::sync::Mutex;

use crate::retrieve::{ReqwestRetriever, RetrievalSettings, Retriever};
use crate::sandbox::{RendererSettings, SandboxRenderer};
use crate::scroll::{ScrollCoordinator, ScrollTarget, DEFAULT_SETTLE_DELAY};
use crate::{EngineEvent, Generation};

enum EngineCommand {
    Retrieve { generation: Generation, url: String },
    Render { generation: Generation, content: String },
    ScrollToResults,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub retrieval: RetrievalSettings,
    pub renderer: RendererSettings,
    pub scroll_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retrieval: RetrievalSettings::default(),
            renderer: RendererSettings::default(),
            scroll_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Sends commands to the engine thread.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn retrieve(&self, generation: Generation, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Retrieve {
            generation,
            url: url.into(),
        });
    }

    pub fn render(&self, generation: Generation, content: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Render {
            generation,
            content: content.into(),
        });
    }

    pub fn scroll_to_results(&self) {
        let _ = self.cmd_tx.send(EngineCommand::ScrollToResults);
    }
}

/// Receives events emitted by the engine thread.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    /// Blocks until the next event. `None` once the engine thread has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

pub fn start_engine(
    config: EngineConfig,
    scroll_target: Arc<dyn ScrollTarget>,
) -> Result<(EngineHandle, EngineEvents), EngineError> {
    let retriever = Arc::new(ReqwestRetriever::new(config.retrieval.clone()));
    start_engine_with(config, retriever, scroll_target)
}

/// Starts the engine thread with a caller-supplied retrieval collaborator.
pub fn start_engine_with(
    config: EngineConfig,
    retriever: Arc<dyn Retriever>,
    scroll_target: Arc<dyn ScrollTarget>,
) -> Result<(EngineHandle, EngineEvents), EngineError> {
    let runtime = tokio::runtime::Runtime::new()?;
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();

    let renderer = Arc::new(Mutex::new(SandboxRenderer::new(config.renderer.clone())));
    let latest_render = Arc::new(AtomicU64::new(0));
    let scroll = ScrollCoordinator::new(config.scroll_delay, scroll_target);

    thread::spawn(move || {
        while let Ok(command) = cmd_rx.recv() {
            match command {
                EngineCommand::Retrieve { generation, url } => {
                    let retriever = retriever.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(with_generation(generation, async move {
                        let result = retriever.retrieve(&url).await;
                        let _ = event_tx.send(EngineEvent::RetrievalCompleted { generation, result });
                    }));
                }
                EngineCommand::Render {
                    generation,
                    content,
                } => {
                    latest_render.fetch_max(generation, Ordering::SeqCst);
                    let renderer = renderer.clone();
                    let latest_render = latest_render.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(with_generation(generation, async move {
                        let mut renderer = renderer.lock().await;
                        if generation < latest_render.load(Ordering::SeqCst) {
                            engine_debug!("Skipping superseded render for generation {}", generation);
                            return;
                        }
                        let event = match renderer.render(generation, &content).await {
                            Ok(surface) => EngineEvent::SurfaceSettled(surface),
                            Err(error) => EngineEvent::RenderFailed { generation, error },
                        };
                        let _ = event_tx.send(event);
                    }));
                }
                EngineCommand::ScrollToResults => {
                    let _guard = runtime.enter();
                    let _ = scroll.schedule();
                }
            }
        }
        engine_info!("Engine command channel closed; shutting down");
    });

    Ok((EngineHandle { cmd_tx }, EngineEvents { event_rx }))
}
