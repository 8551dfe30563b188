//! Grid loading and unified-layout export.

pub mod csv_grid;
pub mod unified_export;

pub use csv_grid::{read_csv_grid, read_csv_grid_with_progress};
pub use unified_export::{UnifiedRecord, export_unified_csv, export_unified_csv_path};
