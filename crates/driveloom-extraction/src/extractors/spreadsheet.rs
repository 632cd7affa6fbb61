//! Spreadsheet extraction (`spec.md` §4.B "spreadsheets emit blocks per
//! reasonable row-group of a sheet").

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use driveloom_core::types::Location;

use crate::block::{Block, Document};
use crate::error::{ExtractionError, ExtractionResult};

/// Rows grouped into one block at a time; keeps blocks in the same
/// ballpark size as a paragraph of prose.
const ROWS_PER_BLOCK: usize = 20;

pub fn extract(bytes: &[u8]) -> ExtractionResult<Document> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| ExtractionError::Spreadsheet(e.to_string()))?;

    let mut blocks = Document::new();

    for sheet_name in workbook.sheet_names().to_vec() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ExtractionError::Spreadsheet(e.to_string()))?;

        let rows: Vec<&[Data]> = range.rows().collect();
        for (group_index, group) in rows.chunks(ROWS_PER_BLOCK).enumerate() {
            let text = group
                .iter()
                .map(|row| {
                    row.iter()
                        .map(data_to_string)
                        .collect::<Vec<_>>()
                        .join("\t")
                })
                .collect::<Vec<_>>()
                .join("\n");

            if text.trim().is_empty() {
                continue;
            }

            let start = group_index * ROWS_PER_BLOCK + 1;
            let end = start + group.len() - 1;
            let location = Location::Sheet {
                sheet_name: sheet_name.clone(),
                row_range: format!("{start}-{end}"),
            };
            blocks.push(Block::new(text, location));
        }
    }

    Ok(blocks)
}

fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERROR({e:?})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_bytes_produce_a_spreadsheet_error() {
        let err = extract(b"not an xlsx file").unwrap_err();
        assert!(matches!(err, ExtractionError::Spreadsheet(_)));
    }
}
