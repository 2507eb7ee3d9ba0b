//! PDF Quote Saver - Quotes document operations
//!
//! Appends citations to a Word (.docx) document. The document is created
//! once with a heading and afterwards only ever appended to.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use roxmltree::Node;
use zip::ZipArchive;

use crate::clipboard::Citation;

/// Package part holding the document body
const DOCUMENT_PART: &str = "word/document.xml";

/// Style id used for the heading paragraph
const HEADING_STYLE: &str = "Heading1";

/// Document error type
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Failed to create document: {0}")]
    Create(String),
    #[error("Malformed document {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: &'static str },
}

/// A paragraph read back from the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedParagraph {
    pub text: String,
    pub style: Option<String>,
}

/// The persistent quotes document
#[derive(Debug, Clone)]
pub struct QuoteDocument {
    path: PathBuf,
    heading: String,
}

impl QuoteDocument {
    pub fn new(path: impl Into<PathBuf>, heading: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            heading: heading.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the document with its heading if it does not exist yet
    ///
    /// Returns true when a new document was written.
    pub fn ensure_exists(&self) -> Result<bool, DocumentError> {
        if self.path.is_file() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        self.write_via_temp(|file| {
            Docx::new()
                .add_style(
                    Style::new(HEADING_STYLE, StyleType::Paragraph)
                        .name("Heading 1")
                        .bold()
                        .size(32),
                )
                .add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(&self.heading))
                        .style(HEADING_STYLE),
                )
                .build()
                .pack(file)
                .map_err(|e| DocumentError::Create(e.to_string()))
        })?;

        log::info!("[Document] New document created at {}", self.path.display());
        Ok(true)
    }

    /// Append a citation as three paragraphs and save the document
    pub fn append(&self, citation: &Citation) -> Result<(), DocumentError> {
        self.ensure_exists()?;

        let document_xml = self
            .read_part(DOCUMENT_PART)?
            .ok_or_else(|| self.malformed("missing word/document.xml"))?;

        let fragment: String = citation
            .paragraphs()
            .iter()
            .map(|text| paragraph_xml(text))
            .collect();

        let index = self.insertion_index(&document_xml)?;
        let mut updated = String::with_capacity(document_xml.len() + fragment.len());
        updated.push_str(&document_xml[..index]);
        updated.push_str(&fragment);
        updated.push_str(&document_xml[index..]);

        let mut replacements = HashMap::new();
        replacements.insert(DOCUMENT_PART.to_string(), updated.into_bytes());
        self.rewrite_with_parts(&replacements)?;

        log::info!("[Document] Quote saved to {}", self.path.display());
        Ok(())
    }

    /// Read every body paragraph, in document order
    pub fn paragraphs(&self) -> Result<Vec<SavedParagraph>, DocumentError> {
        let document_xml = self
            .read_part(DOCUMENT_PART)?
            .ok_or_else(|| self.malformed("missing word/document.xml"))?;
        let document = roxmltree::Document::parse(&document_xml)?;

        let paragraphs = document
            .descendants()
            .filter(|node| has_tag(*node, "p"))
            .map(|paragraph| SavedParagraph {
                text: extract_paragraph_text(paragraph),
                style: paragraph_style(paragraph),
            })
            .collect();

        Ok(paragraphs)
    }

    /// Byte offset in document.xml where new paragraphs go: before the
    /// body's trailing sectPr, or before </w:body> when there is none
    fn insertion_index(&self, document_xml: &str) -> Result<usize, DocumentError> {
        let document = roxmltree::Document::parse(document_xml)?;
        let body = document
            .descendants()
            .find(|node| has_tag(*node, "body"))
            .ok_or_else(|| self.malformed("missing <w:body>"))?;

        if let Some(section) = body
            .children()
            .filter(|node| node.is_element())
            .last()
            .filter(|node| has_tag(*node, "sectPr"))
        {
            return Ok(section.range().start);
        }

        let range = body.range();
        document_xml[range.clone()]
            .rfind("</")
            .map(|offset| range.start + offset)
            .ok_or_else(|| self.malformed("empty <w:body/>"))
    }

    fn read_part(&self, part_name: &str) -> Result<Option<String>, DocumentError> {
        let file = File::open(&self.path)?;
        let mut archive = ZipArchive::new(file)?;
        let mut entry = match archive.by_name(part_name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut value = String::new();
        entry.read_to_string(&mut value)?;
        Ok(Some(value))
    }

    /// Rewrite the package through a temp file, replacing the given parts
    fn rewrite_with_parts(&self, replacements: &HashMap<String, Vec<u8>>) -> Result<(), DocumentError> {
        self.write_via_temp(|file| {
            let mut archive = ZipArchive::new(File::open(&self.path)?)?;
            let mut writer = zip::ZipWriter::new(file);

            for index in 0..archive.len() {
                let mut entry = archive.by_index(index)?;
                if entry.is_dir() {
                    continue;
                }
                let name = entry.name().to_string();
                let options =
                    zip::write::SimpleFileOptions::default().compression_method(entry.compression());
                writer.start_file(name.as_str(), options)?;

                match replacements.get(&name) {
                    Some(updated) => writer.write_all(updated)?,
                    None => {
                        let mut original = Vec::new();
                        entry.read_to_end(&mut original)?;
                        writer.write_all(&original)?;
                    }
                }
            }

            writer.finish()?;
            Ok(())
        })
    }

    /// Write a complete package to the temp sibling, then rename it over the
    /// document. On failure the temp file is removed and the existing
    /// document is left as it was.
    fn write_via_temp<F>(&self, write: F) -> Result<(), DocumentError>
    where
        F: FnOnce(File) -> Result<(), DocumentError>,
    {
        let temp_path = self.temp_path();
        let result = File::create(&temp_path)
            .map_err(DocumentError::from)
            .and_then(write)
            .and_then(|()| fs::rename(&temp_path, &self.path).map_err(DocumentError::from));

        if result.is_err() {
            if let Err(e) = fs::remove_file(&temp_path) {
                log::debug!("[Document] Could not remove {}: {}", temp_path.display(), e);
            }
        }
        result
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("docx.tmp")
    }

    fn malformed(&self, reason: &'static str) -> DocumentError {
        DocumentError::Malformed {
            path: self.path.clone(),
            reason,
        }
    }
}

fn xml_escape_text(value: &str) -> String {
    value
        .chars()
        // Control characters other than tab are not allowed in XML 1.0
        .filter(|c| *c == '\t' || !c.is_control())
        .collect::<String>()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Plain paragraph; line breaks in the text become <w:br/>
fn paragraph_xml(text: &str) -> String {
    let mut xml = String::from("<w:p><w:r>");
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            xml.push_str("<w:br/>");
        }
        xml.push_str("<w:t xml:space=\"preserve\">");
        xml.push_str(&xml_escape_text(line));
        xml.push_str("</w:t>");
    }
    xml.push_str("</w:r></w:p>");
    xml
}

fn has_tag(node: Node<'_, '_>, expected: &str) -> bool {
    node.is_element() && node.tag_name().name() == expected
}

fn paragraph_style(paragraph: Node<'_, '_>) -> Option<String> {
    paragraph
        .children()
        .find(|node| has_tag(*node, "pPr"))?
        .children()
        .find(|node| has_tag(*node, "pStyle"))?
        .attributes()
        .find(|attribute| attribute.name() == "val")
        .map(|attribute| attribute.value().to_string())
}

fn extract_paragraph_text(paragraph: Node<'_, '_>) -> String {
    let mut value = String::new();

    for node in paragraph.descendants().filter(|node| node.is_element()) {
        if has_tag(node, "t") {
            if let Some(text) = node.text() {
                value.push_str(text);
            }
        } else if has_tag(node, "tab") {
            value.push('\t');
        } else if has_tag(node, "br") || has_tag(node, "cr") {
            value.push('\n');
        }
    }

    value
}
