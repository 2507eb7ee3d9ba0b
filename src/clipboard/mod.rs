//! PDF Quote Saver - Clipboard module
//!
//! Provides clipboard monitoring and the citation pipeline it drives

pub mod models;
pub mod monitor;
pub mod pipeline;

pub use models::Citation;
pub use monitor::{
    ClipboardError, ClipboardMonitor, ClipboardSource, MonitorError, QuoteWatcher, SystemClipboard,
    TickOutcome,
};
pub use pipeline::{CitationPipeline, PipelineOutcome};
