//! Tab-separated export → rectangular cell grid.
//!
//! Spreadsheet TSV exports drop trailing empty cells on short rows, so every
//! consumer downstream assumes the grid has been padded to a uniform width.

/// Rectangular table of string cells. Every row has the same length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellGrid {
    rows: Vec<Vec<String>>,
}

impl CellGrid {
    /// Build a grid from arbitrary rows, right-padding short rows with `""`.
    ///
    /// Idempotent: an already-rectangular input comes back unchanged.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in rows.iter_mut() {
            row.resize(width, String::new());
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns (0 for an empty grid).
    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Cell at `(row, col)`, or `""` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Parse a raw TSV export into a [`CellGrid`].
///
/// Lines split on `\n`; each line has trailing whitespace trimmed (which also
/// eats a `\r`) before splitting on tabs. Never fails: empty input yields a
/// single row holding one empty cell.
pub fn parse_tsv(text: &str) -> CellGrid {
    let rows = text
        .split('\n')
        .map(|line| {
            line.trim_end()
                .split('\t')
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();
    CellGrid::from_rows(rows)
}
