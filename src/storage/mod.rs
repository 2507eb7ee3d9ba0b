//! PDF Quote Saver - Storage module
//!
//! Persists saved quotes to the output Word document

pub mod document;

pub use document::{DocumentError, QuoteDocument, SavedParagraph};
