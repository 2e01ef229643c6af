//! Polymorphic data source, spec.md §4.H: a uniform interface the view
//! layer uses over either an mmap'd file or an in-memory analysis table.
//!
//! A `FieldDesc` is only meaningful alongside the buffer it indexes into,
//! and the two implementations here index into two different buffers
//! (mmap bytes vs. table-owned `String`s). Keeping `DataSource` object-safe
//! without leaking an implementation-specific buffer type means rendering
//! happens inside the implementation instead: `get_cell` returns the
//! logical string directly. The file implementation still keeps a one-row
//! `FieldDesc` cache to make column-wise access cheap; it just renders
//! before returning instead of after.

use dsv_parse::{render_field, split_line, FieldDesc};
use dsv_text::{decode_for_display, Encoding};
use std::borrow::Cow;

pub trait DataSource {
    fn row_count(&self) -> usize;
    fn col_count(&self) -> usize;
    fn get_cell(&mut self, row: usize, col: usize) -> Cow<'_, str>;
    fn get_header(&self, col: usize) -> &str;
    fn get_column_width(&self, col: usize) -> usize;
}

/// Backs a view directly onto mmap'd bytes plus the line-offset index built
/// by `dsv-ingest`. Re-splits a line only when the requested row differs
/// from the last one split.
pub struct FileDataSource {
    data: std::sync::Arc<dsv_ingest::FileData>,
    encoding: Encoding,
    delimiter: u8,
    line_offsets: Vec<usize>,
    has_header: bool,
    header_fields: Vec<FieldDesc>,
    rendered_headers: Vec<String>,
    max_cols: usize,
    default_column_width: usize,
    cached_row: Option<usize>,
    cached_fields: Vec<FieldDesc>,
}

impl FileDataSource {
    /// `has_header` overrides `parsed.has_header` so the CLI's
    /// `--headerless` flag (spec.md §6) can force every line to be data
    /// without re-scanning the file. `parsed.header_fields` (always parsed
    /// from line 0, regardless of `has_header`) still supplies the column
    /// count either way; headerless files get synthetic `Column N` titles
    /// instead of rendering line 0's content as a header.
    ///
    /// Cells are decoded through `data.encoding` rather than a bare UTF-8
    /// lossy pass, so Latin-1/Windows-1252 files (spec.md §8 boundary case)
    /// render their accented bytes instead of replacement characters.
    pub fn new(
        data: std::sync::Arc<dsv_ingest::FileData>,
        parsed: &dsv_ingest::ParsedData,
        has_header: bool,
        max_cols: usize,
        default_column_width: usize,
    ) -> Self {
        let encoding = data.encoding;
        let rendered_headers = if has_header {
            parsed
                .header_fields
                .iter()
                .map(|f| decode_for_display(&render_field(data.bytes(), f), encoding))
                .collect()
        } else {
            (0..parsed.header_fields.len()).map(|c| format!("Column {c}")).collect()
        };
        Self {
            data,
            encoding,
            delimiter: parsed.delimiter,
            line_offsets: parsed.line_offsets.clone(),
            has_header,
            header_fields: parsed.header_fields.clone(),
            rendered_headers,
            max_cols,
            default_column_width,
            cached_row: None,
            cached_fields: Vec::new(),
        }
    }

    /// Row index `row` (0-based within the data rows, header excluded) into
    /// an absolute line index.
    fn line_index(&self, row: usize) -> usize {
        if self.has_header {
            row + 1
        } else {
            row
        }
    }

    fn ensure_row_cached(&mut self, row: usize) {
        if self.cached_row == Some(row) {
            return;
        }
        let Some(&line_start) = self.line_offsets.get(self.line_index(row)) else {
            self.cached_fields.clear();
            self.cached_row = Some(row);
            return;
        };
        self.cached_fields = split_line(self.data.bytes(), self.delimiter, line_start, self.max_cols);
        self.cached_row = Some(row);
    }
}

impl DataSource for FileDataSource {
    fn row_count(&self) -> usize {
        let total = self.line_offsets.len();
        if self.has_header {
            total.saturating_sub(1)
        } else {
            total
        }
    }

    fn col_count(&self) -> usize {
        self.header_fields.len()
    }

    fn get_cell(&mut self, row: usize, col: usize) -> Cow<'_, str> {
        self.ensure_row_cached(row);
        match self.cached_fields.get(col) {
            Some(field) => Cow::Owned(decode_for_display(&render_field(self.data.bytes(), field), self.encoding)),
            None => Cow::Borrowed(""),
        }
    }

    fn get_header(&self, col: usize) -> &str {
        self.rendered_headers.get(col).map(String::as_str).unwrap_or("")
    }

    fn get_column_width(&self, _col: usize) -> usize {
        self.default_column_width
    }
}

/// Backs a view onto an in-memory table (the result of frequency analysis,
/// or any other synthesized dataset). Precomputes per-column widths as
/// `max(header_len, max_over_rows(cell_len))`, per spec.md §4.H.
pub struct MemoryDataSource {
    table: crate::table::InMemoryTable,
    column_widths: Vec<usize>,
}

impl MemoryDataSource {
    pub fn new(table: crate::table::InMemoryTable, encoding: Encoding) -> Self {
        let col_count = table.col_count();
        let mut column_widths = vec![0usize; col_count];
        for (c, width) in column_widths.iter_mut().enumerate() {
            *width = dsv_text::display_width(decode_for_display(table.get_header(c).as_bytes(), encoding).as_bytes(), encoding);
        }
        for row in &table.rows {
            for (c, cell) in row.iter().enumerate().take(col_count) {
                let w = dsv_text::display_width(cell.as_bytes(), encoding);
                if w > column_widths[c] {
                    column_widths[c] = w;
                }
            }
        }
        Self { table, column_widths }
    }

    pub fn table(&self) -> &crate::table::InMemoryTable {
        &self.table
    }
}

impl DataSource for MemoryDataSource {
    fn row_count(&self) -> usize {
        self.table.row_count()
    }

    fn col_count(&self) -> usize {
        self.table.col_count()
    }

    fn get_cell(&mut self, row: usize, col: usize) -> Cow<'_, str> {
        Cow::Borrowed(self.table.get_cell(row, col))
    }

    fn get_header(&self, col: usize) -> &str {
        self.table.get_header(col)
    }

    fn get_column_width(&self, col: usize) -> usize {
        self.column_widths.get(col).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::InMemoryTable;

    #[test]
    fn memory_source_computes_widths_from_headers_and_cells() {
        let mut t = InMemoryTable::create(None, vec!["name".into(), "n".into()]);
        t.add_row(vec![Some("alexandria".into()), Some("1".into())]);
        t.add_row(vec![Some("bo".into()), Some("22".into())]);
        let src = MemoryDataSource::new(t, Encoding::Ascii);
        assert_eq!(src.get_column_width(0), "alexandria".len());
        assert_eq!(src.get_column_width(1), 2); // header "n"=1, max cell "22"=2
    }

    #[test]
    fn file_source_decodes_latin1_cells_instead_of_emitting_replacement_characters() {
        use std::io::Write;

        // 0xE9 is Latin-1 for 'é'; as UTF-8 lossy it would decode to U+FFFD.
        let contents = vec![b'a', b',', b'b', b'\n', b'1', b',', 0xE9, b'\n'];
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&contents).unwrap();
        f.flush().unwrap();

        let ingest_config = dsv_ingest::IngestConfig {
            encoding: dsv_text::EncodingDetectionConfig {
                force_encoding: Some(Encoding::Latin1),
                ..Default::default()
            },
            ..Default::default()
        };
        let (file_data, parsed) = dsv_ingest::load_file(f.path(), &ingest_config).unwrap();
        let mut src = FileDataSource::new(std::sync::Arc::new(file_data), &parsed, true, 256, 10);
        assert_eq!(src.get_cell(0, 1), "\u{E9}");
    }

    #[test]
    fn memory_source_row_and_col_counts() {
        let mut t = InMemoryTable::create(None, vec!["a".into()]);
        t.add_row(vec![Some("x".into())]);
        let mut src = MemoryDataSource::new(t, Encoding::Ascii);
        assert_eq!(src.row_count(), 1);
        assert_eq!(src.col_count(), 1);
        assert_eq!(src.get_cell(0, 0), "x");
    }
}
