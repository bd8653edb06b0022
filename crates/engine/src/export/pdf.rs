use std::io::BufWriter;

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::{Document, Section};
use crate::{EngineError, ResultEngine};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const ROW: f32 = 10.0;
/// Distance from the top after which the next row goes on a new page.
const PAGE_BREAK: f32 = 250.0;

fn pdf_error(context: &str, err: impl std::fmt::Display) -> EngineError {
    EngineError::Export(format!("{context}: {err}"))
}

/// Writes the cursor position as distance from the top of the page.
struct Writer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    top: f32,
    heading: Option<String>,
}

impl Writer {
    fn new(title: &str) -> ResultEngine<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| pdf_error("PDF font error", e))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| pdf_error("PDF font error", e))?;
        Ok(Self {
            doc,
            layer,
            font,
            bold,
            top: MARGIN,
            heading: None,
        })
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.font };
        self.layer
            .use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - self.top), font);
    }

    /// Moves one row down, starting a new page past the break line.
    fn advance(&mut self) {
        self.top += ROW;
        if self.top > PAGE_BREAK {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.top = MARGIN;
            if let Some(heading) = self.heading.clone() {
                self.text(&format!("{heading} (continued)"), 13.0, MARGIN, true);
                self.top += ROW;
            }
        }
    }

    fn row(&mut self, cells: &[String], bold: bool) {
        let count = cells.len().max(1);
        let width = (PAGE_WIDTH - 2.0 * MARGIN) / count as f32;
        // Helvetica at 10pt averages about 2 mm per character.
        let max_chars = ((width / 2.0) as usize).max(4);
        for (i, cell) in cells.iter().enumerate() {
            let x = MARGIN + width * i as f32;
            self.text(&clip(cell, max_chars), 10.0, x, bold);
        }
        self.advance();
    }

    fn finish(self) -> ResultEngine<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| pdf_error("PDF save error", e))?;
        buf.into_inner()
            .map_err(|e| pdf_error("PDF buffer error", e))
    }
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

/// Renders `document` as an A4 PDF using the built-in Helvetica fonts.
pub fn render_pdf(document: &Document) -> ResultEngine<Vec<u8>> {
    let mut writer = Writer::new(&document.title)?;
    writer.text(&document.title, 18.0, MARGIN, true);
    writer.advance();

    for section in &document.sections {
        match section {
            Section::Heading(heading) => {
                writer.advance();
                writer.heading = Some(heading.clone());
                writer.text(heading, 13.0, MARGIN, true);
                writer.advance();
            }
            Section::Summary(pairs) => {
                for (label, value) in pairs {
                    writer.row(&[label.clone(), value.clone()], false);
                }
            }
            Section::Table { headers, rows } => {
                writer.row(headers, true);
                for row in rows {
                    writer.row(row, false);
                }
            }
            Section::Paragraph(text) => {
                writer.text(text, 10.0, MARGIN, false);
                writer.advance();
            }
        }
    }

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_long_cells() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a very long description", 10), "a very ...");
    }

    #[test]
    fn empty_document_renders() {
        let document = Document {
            title: "Empty".to_string(),
            sections: Vec::new(),
        };
        assert!(render_pdf(&document).unwrap().starts_with(b"%PDF"));
    }
}
