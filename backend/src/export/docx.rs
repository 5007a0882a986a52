//! `.docx` transcript writer
//!
//! Builds the whole package in memory. Layout per turn: a "You:" quote
//! paragraph, a "Bot:" paragraph, an optional bulleted reference list and an
//! empty spacer paragraph.

use crate::chat::models::Turn;
use crate::error::AppError;
use crate::export::parts;
use std::io::{Cursor, Write};
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// MIME type of a WordprocessingML document
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Attachment filename for a user's transcript
///
/// Characters that are unsafe in a `Content-Disposition` header are replaced.
pub fn download_filename(username: &str) -> String {
    let safe: String = username
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("conversation_{}.docx", safe)
}

/// Renders conversations as `.docx` documents
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptExporter {
    include_references: bool,
}

impl TranscriptExporter {
    /// Create an exporter; `include_references` adds link lists under answers
    pub fn new(include_references: bool) -> Self {
        Self { include_references }
    }

    /// Render `turns` for `username` into a `.docx` byte buffer
    pub fn render(&self, username: &str, turns: &[Turn]) -> Result<Vec<u8>, AppError> {
        let document = self.document_xml(username, turns);
        let bytes = write_package(&document)?;

        tracing::debug!(
            username = %username,
            turns = turns.len(),
            bytes = bytes.len(),
            "Transcript rendered"
        );

        Ok(bytes)
    }

    fn document_xml(&self, username: &str, turns: &[Turn]) -> String {
        let mut body = String::from(parts::DOCUMENT_HEAD);
        body.push_str(&paragraph(
            Some("Title"),
            &format!("Conversation History for {}", username),
        ));

        for turn in turns {
            body.push_str(&paragraph(
                Some("IntenseQuote"),
                &format!("You: {}", turn.question),
            ));
            body.push_str(&paragraph(None, &format!("Bot: {}", turn.answer)));

            if self.include_references && !turn.links.is_empty() {
                body.push_str(&paragraph(None, "References:"));
                for link in &turn.links {
                    body.push_str(&paragraph(Some("ListBullet"), link));
                }
            }

            body.push_str(&paragraph(None, ""));
        }

        body.push_str(parts::DOCUMENT_TAIL);
        body
    }
}

fn write_package(document: &str) -> ZipResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let entries = [
        ("[Content_Types].xml", parts::CONTENT_TYPES),
        ("_rels/.rels", parts::ROOT_RELS),
        ("word/_rels/document.xml.rels", parts::DOCUMENT_RELS),
        ("word/styles.xml", parts::STYLES),
        ("word/numbering.xml", parts::NUMBERING),
        ("word/document.xml", document),
    ];
    for (name, content) in entries {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

/// One paragraph; newlines in `text` become line breaks
fn paragraph(style: Option<&str>, text: &str) -> String {
    let mut xml = String::from("<w:p>");
    if let Some(style) = style {
        xml.push_str(&format!("<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>", style));
    }
    if !text.is_empty() {
        xml.push_str("<w:r>");
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                xml.push_str("<w:br/>");
            }
            xml.push_str("<w:t xml:space=\"preserve\">");
            xml.push_str(&escape_xml(line.trim_end_matches('\r')));
            xml.push_str("</w:t>");
        }
        xml.push_str("</w:r>");
    }
    xml.push_str("</w:p>");
    xml
}

/// Escape markup characters and drop characters XML 1.0 cannot carry
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push(c),
            c if c.is_control() => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}
