//! PDF Quote Saver - PDF module
//!
//! Locates PDFs on disk and finds the page a quote came from

pub mod locator;
pub mod pages;

pub use locator::PdfLocator;
pub use pages::{find_page_number, PageLookup};
