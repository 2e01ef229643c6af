//! Row-major in-memory table. spec.md §4.G.
//!
//! Headers plus a growing `Vec<Vec<String>>`, doubling capacity when full.
//! Rust's `Vec` already does the doubling and the rollback-on-partial-
//! failure semantics spec.md §4.G requires (a failed `Vec::push`/
//! `String::from` would unwind, not leave a half-built row visible), so
//! `add_row` is a thin wrapper rather than a hand-rolled allocator.

#[derive(Debug, Clone)]
pub struct InMemoryTable {
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl InMemoryTable {
    pub fn create(title: Option<String>, headers: Vec<String>) -> Self {
        Self {
            title,
            headers,
            rows: Vec::with_capacity(16),
        }
    }

    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `null` cells become `""`; rows shorter than `col_count` are padded,
    /// longer rows are truncated — ragged input degrades gracefully rather
    /// than panicking (spec.md's ragged-row tolerance applies uniformly).
    pub fn add_row(&mut self, cells: Vec<Option<String>>) {
        let mut row: Vec<String> = cells.into_iter().map(|c| c.unwrap_or_default()).collect();
        row.resize(self.col_count(), String::new());
        row.truncate(self.col_count());
        self.rows.push(row);
    }

    pub fn get_cell(&self, row: usize, col: usize) -> &str {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str).unwrap_or("")
    }

    pub fn get_header(&self, col: usize) -> &str {
        self.headers.get(col).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_row_pads_short_rows() {
        let mut t = InMemoryTable::create(None, vec!["a".into(), "b".into(), "c".into()]);
        t.add_row(vec![Some("1".into()), None]);
        assert_eq!(t.get_cell(0, 0), "1");
        assert_eq!(t.get_cell(0, 1), "");
        assert_eq!(t.get_cell(0, 2), "");
    }

    #[test]
    fn add_row_truncates_long_rows() {
        let mut t = InMemoryTable::create(None, vec!["a".into()]);
        t.add_row(vec![Some("1".into()), Some("extra".into())]);
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.rows[0].len(), 1);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut t = InMemoryTable::create(None, vec!["a".into()]);
        for i in 0..100 {
            t.add_row(vec![Some(i.to_string())]);
        }
        assert_eq!(t.row_count(), 100);
    }
}
