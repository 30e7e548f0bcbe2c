//! TSV reader for master-data dumps

use crate::error::{Error, Result};
use crate::table::{Column, Row, Table};
use std::fs;
use std::path::{Path, PathBuf};

/// Parse a TSV file into a Table
pub fn parse_tsv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    read_table(&content, path.to_path_buf())
}

/// Parse TSV from a string (useful for testing)
pub fn parse_tsv_str(content: &str, source_name: &str) -> Result<Table> {
    read_table(content, PathBuf::from(source_name))
}

fn read_table(content: &str, path: PathBuf) -> Result<Table> {
    // Dumps end with a newline and sometimes stray spaces; neither is data.
    let content = content.trim_end();

    let mut tsv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(true)
        .flexible(true) // Short rows are legal, missing fields read as absent
        // Records end at `\n` only; a lone `\r` inside an html cell is data.
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(content.as_bytes());

    let headers = tsv_reader.headers().map_err(|e| Error::Tsv {
        path: path.clone(),
        source: e,
    })?;

    let columns: Vec<Column> = cells_without_cr(headers)
        .into_iter()
        .enumerate()
        .map(|(i, name)| Column::new(name, i))
        .collect();

    let mut rows = Vec::new();
    for result in tsv_reader.records() {
        let record = result.map_err(|e| Error::Tsv {
            path: path.clone(),
            source: e,
        })?;

        rows.push(Row::new(cells_without_cr(&record)));
    }

    Ok(Table {
        columns,
        rows,
        source_path: path,
    })
}

/// Record fields with the `\r` of a CRLF line ending removed
fn cells_without_cr(record: &csv::StringRecord) -> Vec<String> {
    let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
    if let Some(last) = cells.last_mut() {
        if last.ends_with('\r') {
            last.pop();
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_tsv() {
        let tsv = "col1\tcol2\nval1\tval2";
        let table = parse_tsv_str(tsv, "test.tsv").unwrap();

        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].name, "col1");
        assert_eq!(table.columns[1].name, "col2");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells, vec!["val1", "val2"]);
    }

    #[test]
    fn test_trailing_newline_is_not_a_row() {
        let tsv = "series_code\thtml\nS1\t<p>A</p>\n";
        let table = parse_tsv_str(tsv, "test.tsv").unwrap();

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0].get(1), Some("<p>A</p>"));
    }

    #[test]
    fn test_lone_carriage_return_stays_in_cell() {
        let tsv = "series_code\thtml\nS1\t<p>a\rb</p>\nS2\tx";
        let table = parse_tsv_str(tsv, "wysiwyg.tsv").unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].cells, vec!["S1", "<p>a\rb</p>"]);
        assert_eq!(table.rows[1].cells, vec!["S2", "x"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let tsv = "series_code\thtml\r\nS1\t\r\nS2\t<p>A</p>\r\n";
        let table = parse_tsv_str(tsv, "wysiwyg.tsv").unwrap();

        assert_eq!(table.columns[1].name, "html");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].get(1), Some(""));
        assert_eq!(table.rows[1].get(1), Some("<p>A</p>"));
    }

    #[test]
    fn test_short_rows_are_kept_short() {
        let tsv = "a\tb\tc\n1\t2\n";
        let table = parse_tsv_str(tsv, "test.tsv").unwrap();

        assert_eq!(table.rows[0].cells.len(), 2);
        assert_eq!(table.rows[0].get(2), None);
    }

    #[test]
    fn test_empty_cells_are_present() {
        let tsv = "a\tb\tc\n\t\tx\n";
        let table = parse_tsv_str(tsv, "test.tsv").unwrap();

        assert_eq!(table.rows[0].get(0), Some(""));
        assert_eq!(table.rows[0].get(2), Some("x"));
    }

    #[test]
    fn test_quotes_are_literal() {
        let tsv = "series_code\thtml\nS1\t<a href=\"x\">link</a>";
        let table = parse_tsv_str(tsv, "test.tsv").unwrap();

        assert_eq!(table.rows[0].get(1), Some("<a href=\"x\">link</a>"));
    }

    #[test]
    fn test_empty_source_has_no_columns() {
        let table = parse_tsv_str("", "empty.tsv").unwrap();
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = parse_tsv("definitely/not/here.tsv").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
