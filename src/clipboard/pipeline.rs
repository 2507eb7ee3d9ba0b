//! PDF Quote Saver - Citation pipeline
//!
//! Turns a newly copied quote into a saved citation: window title, PDF name,
//! file path, page number, document append

use crate::pdf::{find_page_number, PdfLocator};
use crate::storage::{DocumentError, QuoteDocument};
use crate::window::extract_pdf_name;

use super::models::Citation;

/// What happened to a copied quote
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Focused window title does not name a PDF
    NoPdfDetected,
    /// The named PDF is not in any search directory
    PdfNotFound { name: String },
    /// Citation appended to the document
    Saved(Citation),
    /// Citation built but the document could not be written
    SaveFailed { citation: Citation, error: DocumentError },
}

/// Locates the source of a quote and records it
#[derive(Debug, Clone)]
pub struct CitationPipeline {
    locator: PdfLocator,
    document: QuoteDocument,
}

impl CitationPipeline {
    pub fn new(locator: PdfLocator, document: QuoteDocument) -> Self {
        Self { locator, document }
    }

    #[cfg(test)]
    pub(crate) fn document(&self) -> &QuoteDocument {
        &self.document
    }

    /// Process one quote copied while `window_title` was focused
    pub fn process(&self, quote: &str, window_title: &str) -> PipelineOutcome {
        let Some(pdf_name) = extract_pdf_name(window_title) else {
            log::info!("[Pipeline] No valid PDF detected.");
            return PipelineOutcome::NoPdfDetected;
        };
        log::info!("[Pipeline] Detected PDF Name: {}", pdf_name);

        let Some(pdf_path) = self.locator.find(&pdf_name) else {
            log::info!("[Pipeline] PDF file not found: {}", pdf_name);
            log::info!("Suggestions:");
            log::info!("- Ensure the PDF is located in one of the searched directories.");
            log::info!("- Check for filename mismatches (e.g., spaces, capitalization).");
            log::info!("- Verify that the extracted name matches an actual file.");
            return PipelineOutcome::PdfNotFound { name: pdf_name };
        };
        log::info!("[Pipeline] PDF Path Found: {}", pdf_path.display());

        let page = find_page_number(&pdf_path, quote);
        let citation = Citation::new(quote, pdf_name, page);

        match self.document.append(&citation) {
            Ok(()) => PipelineOutcome::Saved(citation),
            Err(error) => {
                log::error!("[Pipeline] Error saving to document: {}", error);
                PipelineOutcome::SaveFailed { citation, error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::models::separator;
    use crate::pdf::pages::fixtures::write_pdf;
    use crate::pdf::PageLookup;
    use std::fs;
    use std::path::Path;

    fn pipeline(search_dirs: &[&Path], output: &Path) -> CitationPipeline {
        CitationPipeline::new(
            PdfLocator::new(search_dirs.iter().map(|dir| dir.to_path_buf()).collect(), 32),
            QuoteDocument::new(output, "Saved Quotes"),
        )
    }

    fn texts(document: &QuoteDocument) -> Vec<String> {
        document
            .paragraphs()
            .unwrap()
            .into_iter()
            .map(|paragraph| paragraph.text)
            .collect()
    }

    #[test]
    fn saves_citation_with_page_number() {
        let documents = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        write_pdf(&downloads.path().join("spec.pdf"), &["one", "two", "Hello World", "four"]);
        let output = documents.path().join("Saved Quotes.docx");
        let pipeline = pipeline(&[documents.path(), downloads.path()], &output);
        pipeline.document().ensure_exists().unwrap();

        let outcome = pipeline.process("Hello World", "spec.pdf - Reader");

        match outcome {
            PipelineOutcome::Saved(citation) => assert_eq!(citation.page, PageLookup::Found(3)),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            texts(pipeline.document()),
            vec![
                "Saved Quotes".to_string(),
                "Quote: Hello World".to_string(),
                "Source: spec.pdf, Page: 3".to_string(),
                separator(),
            ]
        );
    }

    #[test]
    fn missing_pdf_leaves_document_untouched() {
        let documents = tempfile::tempdir().unwrap();
        let output = documents.path().join("Saved Quotes.docx");
        let pipeline = pipeline(&[documents.path()], &output);
        pipeline.document().ensure_exists().unwrap();
        let before = fs::read(&output).unwrap();

        let outcome = pipeline.process("Hello World", "spec.pdf - Reader");

        assert!(matches!(outcome, PipelineOutcome::PdfNotFound { ref name } if name == "spec.pdf"));
        assert_eq!(fs::read(&output).unwrap(), before);
    }

    #[test]
    fn title_without_pdf_short_circuits() {
        let documents = tempfile::tempdir().unwrap();
        let output = documents.path().join("Saved Quotes.docx");
        let pipeline = pipeline(&[documents.path()], &output);

        let outcome = pipeline.process("Hello World", "Untitled - Notepad");

        assert!(matches!(outcome, PipelineOutcome::NoPdfDetected));
        assert!(!output.exists());
    }

    #[test]
    fn unmatched_text_is_saved_with_unknown_page() {
        let documents = tempfile::tempdir().unwrap();
        write_pdf(&documents.path().join("Notes.pdf"), &["alpha", "beta"]);
        let output = documents.path().join("Saved Quotes.docx");
        let pipeline = pipeline(&[documents.path()], &output);

        let outcome = pipeline.process("gamma", "notes.PDF - Viewer");

        assert!(matches!(outcome, PipelineOutcome::Saved(_)));
        assert_eq!(texts(pipeline.document())[2], "Source: notes.PDF, Page: Unknown");
    }

    #[test]
    fn write_failure_is_reported() {
        let documents = tempfile::tempdir().unwrap();
        write_pdf(&documents.path().join("spec.pdf"), &["Hello World"]);
        let output = documents.path().join("Saved Quotes.docx");
        fs::write(&output, b"corrupt").unwrap();
        let pipeline = pipeline(&[documents.path()], &output);

        let outcome = pipeline.process("Hello World", "spec.pdf");

        match outcome {
            PipelineOutcome::SaveFailed { citation, .. } => {
                assert_eq!(citation.page, PageLookup::Found(1))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
