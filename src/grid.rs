use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => n.is_nan(),
        }
    }

    /// Trimmed textual form; numbers without a fractional part print as integers.
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
        }
    }

    pub fn non_blank_text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.text())
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

pub fn is_blank_row(cells: &[Cell]) -> bool {
    cells.iter().all(Cell::is_blank)
}

/// Header row plus data rows. Data row `i` of `rows` sits at grid index `i + 1`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawGrid {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawGrid {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let headers = headers
            .into_iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        Self { headers, rows }
    }

    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let headers = rows.remove(0).iter().map(Cell::text).collect();
        Self::new(headers, rows)
    }

    pub fn from_str_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let cells = rows
            .iter()
            .map(|row| row.iter().map(|c| Cell::from(c.as_ref())).collect())
            .collect();
        Self::from_rows(cells)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn header_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Data rows paired with their grid index (header is index 0).
    pub fn indexed_rows(&self) -> impl Iterator<Item = (usize, &[Cell])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (idx + 1, row.as_slice()))
    }

    pub fn row(&self, grid_index: usize) -> Option<&[Cell]> {
        grid_index
            .checked_sub(1)
            .and_then(|idx| self.rows.get(idx))
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}
