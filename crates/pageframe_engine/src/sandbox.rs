use engine_logging::{engine_debug, engine_warn};
use scraper::Html;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::layout::{BlockFlowProbe, LayoutProbe};
use crate::markup::rewrite_links;
use crate::preview::prepare_preview;
use crate::Generation;

/// Capabilities granted to embedded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxPolicy {
    pub allow_scripts: bool,
    /// Lets the document keep its own origin. Without it the document gets an
    /// opaque origin and the host can no longer inspect it.
    pub allow_same_origin: bool,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            allow_scripts: true,
            allow_same_origin: true,
        }
    }
}

impl SandboxPolicy {
    /// Value of the `sandbox` attribute. Empty means every restriction applies.
    pub fn attribute(&self) -> String {
        let mut tokens = Vec::with_capacity(2);
        if self.allow_same_origin {
            tokens.push("allow-same-origin");
        }
        if self.allow_scripts {
            tokens.push("allow-scripts");
        }
        tokens.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("surface document was never opened")]
    NotOpened,
    #[error("surface load was aborted before the document was closed")]
    LoadAborted,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("embedded document has an opaque origin")]
    CrossOrigin,
    #[error("embedded document has not finished loading")]
    NotLoaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleReport {
    Measured { height_px: u32, links_rewritten: usize },
    /// Content is shown but could not be inspected.
    GeometryUnknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSurface {
    pub generation: Generation,
    pub sandbox: String,
    pub report: SettleReport,
    pub preview: String,
}

/// Writes markup into a surface. Dropping it without [`DocumentWriter::close`]
/// aborts the surface's load.
pub struct DocumentWriter {
    buffer: String,
    tx: watch::Sender<Option<String>>,
}

impl DocumentWriter {
    pub fn write(&mut self, markup: &str) {
        self.buffer.push_str(markup);
    }

    pub fn close(self) {
        self.tx.send_replace(Some(self.buffer));
    }
}

/// An isolated embedded document.
#[derive(Debug)]
pub struct Surface {
    generation: Generation,
    policy: SandboxPolicy,
    markup: Option<String>,
    height_px: Option<u32>,
    load_rx: Option<watch::Receiver<Option<String>>>,
}

impl Surface {
    pub fn new(generation: Generation, policy: SandboxPolicy) -> Self {
        Self {
            generation,
            policy,
            markup: None,
            height_px: None,
            load_rx: None,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn policy(&self) -> SandboxPolicy {
        self.policy
    }

    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    pub fn height_px(&self) -> Option<u32> {
        self.height_px
    }

    /// Starts a fresh document, discarding anything loaded before.
    pub fn open(&mut self) -> DocumentWriter {
        let (tx, rx) = watch::channel(None);
        self.markup = None;
        self.height_px = None;
        self.load_rx = Some(rx);
        DocumentWriter {
            buffer: String::new(),
            tx,
        }
    }

    /// Resolves once the writer has closed the document.
    pub async fn loaded(&mut self) -> Result<(), RenderError> {
        let rx = self.load_rx.as_mut().ok_or(RenderError::NotOpened)?;
        let markup = {
            let loaded = rx
                .wait_for(Option::is_some)
                .await
                .map_err(|_| RenderError::LoadAborted)?;
            loaded.clone().unwrap_or_default()
        };
        self.markup = Some(markup);
        Ok(())
    }

    /// Host-side access to the embedded document, as a script on the host page would have.
    pub fn document(&self) -> Result<Html, AccessError> {
        if !self.policy.allow_same_origin {
            return Err(AccessError::CrossOrigin);
        }
        let markup = self.markup.as_deref().ok_or(AccessError::NotLoaded)?;
        Ok(Html::parse_document(markup))
    }

    /// Resizes the surface to its content and rewrites its links.
    /// Access failures are logged and reported, never propagated.
    pub fn settle(&mut self, probe: &dyn LayoutProbe) -> SettleReport {
        let document = match self.document() {
            Ok(document) => document,
            Err(err) => {
                engine_warn!(
                    "Surface for generation {} rendered but geometry unknown: {}",
                    self.generation,
                    err
                );
                return SettleReport::GeometryUnknown;
            }
        };

        let height_px = probe.content_height(&document);
        let rewritten = rewrite_links(&document);
        self.height_px = Some(height_px);
        self.markup = Some(rewritten.html);
        SettleReport::Measured {
            height_px,
            links_rewritten: rewritten.links_rewritten,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RendererSettings {
    pub policy: SandboxPolicy,
}

/// Owns the single active surface of the results region.
pub struct SandboxRenderer {
    settings: RendererSettings,
    probe: Box<dyn LayoutProbe>,
    active: Option<Surface>,
}

impl SandboxRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self::with_probe(settings, Box::new(BlockFlowProbe::default()))
    }

    pub fn with_probe(settings: RendererSettings, probe: Box<dyn LayoutProbe>) -> Self {
        Self {
            settings,
            probe,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&Surface> {
        self.active.as_ref()
    }

    /// Mounts `content` in a fresh surface, waits for it to load, then settles it.
    pub async fn render(
        &mut self,
        generation: Generation,
        content: &str,
    ) -> Result<RenderedSurface, RenderError> {
        let surface = mount_slot(&mut self.active, generation, self.settings.policy);
        let mut writer = surface.open();
        writer.write(content);
        writer.close();
        surface.loaded().await?;

        let report = surface.settle(self.probe.as_ref());
        let preview = surface.markup().map(prepare_preview).unwrap_or_default();
        Ok(RenderedSurface {
            generation,
            sandbox: surface.policy().attribute(),
            report,
            preview,
        })
    }
}

/// Replaces whatever occupies `slot` with a new, empty surface.
/// The results region never holds more than one.
fn mount_slot(
    slot: &mut Option<Surface>,
    generation: Generation,
    policy: SandboxPolicy,
) -> &mut Surface {
    if let Some(previous) = slot.take() {
        engine_debug!(
            "Discarding surface for generation {} in favour of {}",
            previous.generation(),
            generation
        );
    }
    slot.insert(Surface::new(generation, policy))
}
