//! PDF Quote Saver - Clipboard monitoring module
//!
//! Polls the system clipboard and runs the citation pipeline for every new
//! piece of copied text

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use arboard::Clipboard;

use crate::window::{WindowError, WindowInspector};

use super::pipeline::{CitationPipeline, PipelineOutcome};

/// Clipboard access error type
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard error: {0}")]
    Access(#[from] arboard::Error),
}

/// Error raised during one monitor iteration
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Window(#[from] WindowError),
}

/// Readable clipboard text
pub trait ClipboardSource {
    /// Current clipboard text, or None if the clipboard holds no text
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError>;
}

/// The OS clipboard
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        // New Clipboard instance each read to ensure getting latest data
        let mut clipboard = Clipboard::new()?;
        match clipboard.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Change detector for clipboard text
#[derive(Debug, Default, Clone)]
pub struct QuoteWatcher {
    last_seen: String,
}

impl QuoteWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` and return true if it is a new, non-blank quote
    pub fn observe(&mut self, current: &str) -> bool {
        if current == self.last_seen || current.trim().is_empty() {
            return false;
        }
        self.last_seen = current.to_string();
        true
    }
}

/// Result of a single poll
#[derive(Debug)]
pub enum TickOutcome {
    /// Clipboard unchanged or blank
    Idle,
    /// A new quote went through the pipeline
    Processed(PipelineOutcome),
}

/// Clipboard monitor
pub struct ClipboardMonitor<C, W> {
    clipboard: C,
    window: W,
    watcher: QuoteWatcher,
    pipeline: CitationPipeline,
    /// Sleep between polls
    poll_interval: Duration,
    /// Sleep after an unexpected error
    error_backoff: Duration,
}

impl<C: ClipboardSource, W: WindowInspector> ClipboardMonitor<C, W> {
    /// Create a new monitor
    pub fn new(
        clipboard: C,
        window: W,
        pipeline: CitationPipeline,
        poll_interval: Duration,
        error_backoff: Duration,
    ) -> Self {
        Self {
            clipboard,
            window,
            watcher: QuoteWatcher::new(),
            pipeline,
            poll_interval,
            error_backoff,
        }
    }

    /// Poll the clipboard once, running the pipeline on a new quote
    pub fn tick(&mut self) -> Result<TickOutcome, MonitorError> {
        let current = self.clipboard.read_text()?.unwrap_or_default();
        if !self.watcher.observe(&current) {
            return Ok(TickOutcome::Idle);
        }

        log::debug!("[Monitor] New clipboard text detected ({} chars)", current.chars().count());
        let title = self.window.active_window_title()?;
        log::info!("[Monitor] Active Window Title: {}", title);

        Ok(TickOutcome::Processed(self.pipeline.process(&current, &title)))
    }

    /// Poll until `running` is cleared
    ///
    /// The flag is only checked between iterations; a tick in progress
    /// always runs to completion.
    pub fn run(&mut self, running: &AtomicBool) {
        log::info!(
            "[Monitor] Monitoring clipboard every {}ms... Press 'Ctrl+C' in your PDF reader to copy text.",
            self.poll_interval.as_millis()
        );

        while running.load(Ordering::SeqCst) {
            let delay = match self.tick() {
                Ok(_) => self.poll_interval,
                Err(e) => {
                    log::error!("[Monitor] Unexpected error: {}", e);
                    self.error_backoff
                }
            };
            thread::sleep(delay);
        }

        log::info!("[Monitor] Exiting...");
    }
}
