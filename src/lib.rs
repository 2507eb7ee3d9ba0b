//! PDF Quote Saver - Saves quotes copied from PDF readers
//!
//! Watches the clipboard while a PDF reader is focused, finds the page the
//! copied text came from, and appends a citation to a Word document.

pub mod clipboard;
pub mod config;
pub mod pdf;
pub mod storage;
pub mod window;

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use clipboard::{CitationPipeline, ClipboardMonitor, SystemClipboard};
use config::Settings;
use pdf::PdfLocator;
use storage::QuoteDocument;
use window::ForegroundWindow;

/// Clear `running` when Ctrl+C is pressed
///
/// The signal is awaited on its own thread; the monitor loop itself stays
/// synchronous and notices the flag at the top of its next iteration.
fn spawn_interrupt_listener(running: Arc<AtomicBool>) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("interrupt-listener".to_string())
        .spawn(move || {
            if let Err(e) = runtime.block_on(tokio::signal::ctrl_c()) {
                log::error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
            log::info!("Interrupt received, stopping...");
            running.store(false, Ordering::SeqCst);
        })?;

    Ok(())
}

/// Build the clipboard monitor from settings
fn build_monitor(settings: &Settings) -> ClipboardMonitor<SystemClipboard, ForegroundWindow> {
    let locator = PdfLocator::new(settings.search_dirs.clone(), settings.max_search_depth);
    let document = QuoteDocument::new(settings.output_path.clone(), settings.heading.clone());

    ClipboardMonitor::new(
        SystemClipboard,
        ForegroundWindow,
        CitationPipeline::new(locator, document),
        settings.poll_interval(),
        settings.error_backoff(),
    )
}

/// Application main entry point
pub fn run() -> ExitCode {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("PDF Quote Saver starting...");

    let settings = Settings::load();
    log::debug!("Settings: {:?}", settings);

    let document = QuoteDocument::new(settings.output_path.clone(), settings.heading.clone());
    if let Err(e) = document.ensure_exists() {
        log::error!("Failed to prepare {}: {}", document.path().display(), e);
        return ExitCode::FAILURE;
    }

    let running = Arc::new(AtomicBool::new(true));
    if let Err(e) = spawn_interrupt_listener(Arc::clone(&running)) {
        log::warn!("Ctrl+C handling unavailable, stop the process externally: {}", e);
    }

    build_monitor(&settings).run(&running);
    ExitCode::SUCCESS
}
