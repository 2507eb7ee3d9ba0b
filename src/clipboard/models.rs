//! PDF Quote Saver - Citation data models
//!
//! Defines the record appended to the quotes document for each saved quote

use crate::pdf::PageLookup;

/// Width of the rule written after each citation
pub const SEPARATOR_WIDTH: usize = 40;

/// A quote together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Citation {
    /// Copied text, exactly as read from the clipboard
    pub quote: String,
    /// PDF file name as shown in the reader's title bar
    pub source: String,
    /// Page the quote was found on
    pub page: PageLookup,
}

impl Citation {
    pub fn new(quote: impl Into<String>, source: impl Into<String>, page: PageLookup) -> Self {
        Self {
            quote: quote.into(),
            source: source.into(),
            page,
        }
    }

    /// The three paragraphs written to the document, in order
    pub fn paragraphs(&self) -> [String; 3] {
        [
            format!("Quote: {}", self.quote),
            format!("Source: {}, Page: {}", self.source, self.page),
            separator(),
        ]
    }
}

/// Separator rule between citations
pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}
