use crate::error::{ConversionError, ConversionResult};
use crate::grid::{Cell, RawGrid};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn read_csv_grid<R: Read>(reader: R) -> ConversionResult<RawGrid> {
    read_csv_grid_with_progress(reader, &mut |_, _| {})
}

/// Like [`read_csv_grid`], reporting 0 before decoding and 50 once decoded.
pub fn read_csv_grid_with_progress<R: Read>(
    reader: R,
    progress: &mut dyn FnMut(u8, &str),
) -> ConversionResult<RawGrid> {
    progress(0, "reading");
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from).collect());
    }
    if rows.is_empty() {
        return Err(ConversionError::EmptyGrid);
    }
    let grid = RawGrid::from_rows(rows);
    tracing::debug!(
        columns = grid.headers().len(),
        rows = grid.rows().len(),
        "csv grid decoded"
    );
    progress(50, "decoded");
    Ok(grid)
}

impl RawGrid {
    pub fn from_csv_reader<R: Read>(reader: R) -> ConversionResult<Self> {
        read_csv_grid(reader)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> ConversionResult<Self> {
        let file = File::open(path)?;
        read_csv_grid(file)
    }
}
