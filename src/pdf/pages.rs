//! PDF Quote Saver - Page finder
//!
//! Scans a PDF page by page for copied text

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use lopdf::Document;

/// Outcome of a page search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLookup {
    /// 1-based page containing the text
    Found(u32),
    /// Every page was scanned without a match
    NotFound,
    /// The PDF could not be opened or parsed
    ReadError(String),
}

/// Renders as the page number, or "Unknown" when no page was found
impl fmt::Display for PageLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLookup::Found(page) => write!(f, "{}", page),
            PageLookup::NotFound | PageLookup::ReadError(_) => f.write_str("Unknown"),
        }
    }
}

/// Find the first page whose extracted text contains `text` verbatim
pub fn find_page_number(pdf_path: &Path, text: &str) -> PageLookup {
    let document = match Document::load(pdf_path) {
        Ok(document) => document,
        Err(e) => {
            log::error!("[Pages] Error reading PDF: {}", e);
            return PageLookup::ReadError(e.to_string());
        }
    };

    let lookup = guard_scan(|| scan_pages(&document, text));
    match &lookup {
        PageLookup::Found(page) => log::debug!("[Pages] Text found on page {}", page),
        PageLookup::NotFound => log::info!("[Pages] Text not found in {}", pdf_path.display()),
        PageLookup::ReadError(e) => log::error!("[Pages] Error reading PDF: {}", e),
    }
    lookup
}

fn scan_pages(document: &Document, text: &str) -> PageLookup {
    for page_number in document.get_pages().into_keys() {
        match document.extract_text(&[page_number]) {
            Ok(page_text) if page_text.contains(text) => return PageLookup::Found(page_number),
            Ok(_) => {}
            Err(e) => {
                log::debug!("[Pages] Could not extract text from page {}: {}", page_number, e);
            }
        }
    }

    PageLookup::NotFound
}

/// Run a page scan, turning a panic inside lopdf (damaged font or content
/// dictionaries trip its internal assertions) into a read error
fn guard_scan<F: FnOnce() -> PageLookup>(scan: F) -> PageLookup {
    panic::catch_unwind(AssertUnwindSafe(scan)).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "PDF parser panicked".to_string());
        PageLookup::ReadError(reason)
    })
}
