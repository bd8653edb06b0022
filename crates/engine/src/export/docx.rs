use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

use super::{Document, Section};
use crate::{EngineError, ResultEngine};

fn text(value: &str, bold: bool, size: usize) -> Paragraph {
    let run = Run::new().add_text(value).size(size);
    Paragraph::new().add_run(if bold { run.bold() } else { run })
}

fn table_row(cells: &[String], bold: bool) -> TableRow {
    TableRow::new(
        cells
            .iter()
            .map(|cell| TableCell::new().add_paragraph(text(cell, bold, 20)))
            .collect(),
    )
}

/// Renders `document` as a Word file. Summaries and tables become Word
/// tables; sizes are in half-points.
pub fn render_docx(document: &Document) -> ResultEngine<Vec<u8>> {
    let mut docx = Docx::new().add_paragraph(text(&document.title, true, 36));

    for section in &document.sections {
        docx = match section {
            Section::Heading(heading) => docx.add_paragraph(text(heading, true, 28)),
            Section::Summary(pairs) => docx.add_table(Table::new(
                pairs
                    .iter()
                    .map(|(label, value)| table_row(&[label.clone(), value.clone()], false))
                    .collect(),
            )),
            Section::Table { headers, rows } => {
                let mut table_rows = vec![table_row(headers, true)];
                table_rows.extend(rows.iter().map(|row| table_row(row, false)));
                docx.add_table(Table::new(table_rows))
            }
            Section::Paragraph(body) => docx.add_paragraph(text(body, false, 20)),
        };
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| EngineError::Export(format!("DOCX pack error: {e}")))?;
    Ok(cursor.into_inner())
}
