use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use engine_logging::engine_trace;
use tokio::task::JoinHandle;

/// Time given to a just-triggered visibility change to reach layout.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollOptions {
    /// Smooth scroll aligning the results section to the top of the viewport.
    pub const RESULTS: Self = Self {
        behavior: ScrollBehavior::Smooth,
        block: ScrollBlock::Start,
    };
}

/// The viewport that holds the results section.
pub trait ScrollTarget: Send + Sync {
    fn scroll_into_view(&self, options: ScrollOptions);
}

/// Schedules delayed scrolls of the results section.
///
/// Requests that arrive while one is still waiting replace it, so a burst of
/// transitions produces a single scroll once the last one has settled.
#[derive(Clone)]
pub struct ScrollCoordinator {
    delay: Duration,
    target: Arc<dyn ScrollTarget>,
    latest: Arc<AtomicU64>,
}

impl ScrollCoordinator {
    pub fn new(delay: Duration, target: Arc<dyn ScrollTarget>) -> Self {
        Self {
            delay,
            target,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Must be called from within a tokio runtime. The task yields `true` if it scrolled.
    pub fn schedule(&self) -> JoinHandle<bool> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = self.latest.clone();
        let target = self.target.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != ticket {
                engine_trace!("Scroll request {} superseded", ticket);
                return false;
            }
            target.scroll_into_view(ScrollOptions::RESULTS);
            true
        })
    }
}
