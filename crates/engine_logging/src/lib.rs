#![deny(missing_docs)]
//! Shared logging utilities for the pageframe workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a submission tag for correlating log lines (thread-local, carried across
//! async tasks by [`with_generation`]), and a minimal test initializer for the
//! global logger.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

thread_local! {
    /// Generation of the submission currently being handled on this thread.
    static ACTIVE_GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Tags subsequent log lines on this thread with a submission generation.
/// Passing 0 removes the tag.
pub fn set_active_generation(generation: u64) {
    ACTIVE_GENERATION.with(|v| v.set(generation));
}

/// Returns the submission generation tagged on this thread, or 0 if none.
pub fn active_generation() -> u64 {
    ACTIVE_GENERATION.with(|v| v.get())
}

/// Tags this thread with `generation` until dropped, then restores the previous tag.
#[must_use = "the tag is removed when the scope is dropped"]
pub struct GenerationScope {
    previous: u64,
}

impl GenerationScope {
    /// Tags the current thread with `generation`.
    pub fn enter(generation: u64) -> Self {
        let previous = active_generation();
        set_active_generation(generation);
        Self { previous }
    }
}

impl Drop for GenerationScope {
    fn drop(&mut self) {
        set_active_generation(self.previous);
    }
}

/// Future that carries a generation tag across every poll, whichever thread runs it.
pub struct WithGeneration<F> {
    generation: u64,
    inner: Pin<Box<F>>,
}

/// Wraps `future` so log lines it emits are tagged with `generation`.
pub fn with_generation<F: Future>(generation: u64, future: F) -> WithGeneration<F> {
    WithGeneration {
        generation,
        inner: Box::pin(future),
    }
}

impl<F: Future> Future for WithGeneration<F> {
    type Output = F::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<F::Output> {
        let _scope = GenerationScope::enter(self.generation);
        self.inner.as_mut().poll(cx)
    }
}

/// Formats the log prefix for the active generation. Empty when untagged.
#[doc(hidden)]
pub fn generation_prefix() -> String {
    match active_generation() {
        0 => String::new(),
        generation => format!("[gen {generation}] "),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::generation_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::generation_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::generation_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::generation_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::generation_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
