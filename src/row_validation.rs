use crate::config::ConversionConfig;
use crate::date::decode_cell;
use crate::error::{Fix, RowValidationError, RowValidationWarning};
use crate::grid::{Cell, RawGrid, is_blank_row};
use crate::normalize::{numeric_progress, parse_level, parse_progress};
use crate::record::{ScheduleRow, end_defaults_to_start};
use crate::schema::{BoundColumns, StatusPolicy};
use crate::task::StatusClass;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<RowValidationError>,
    pub warnings: Vec<RowValidationWarning>,
    pub fixes: Vec<Fix>,
    pub valid_row_count: usize,
    /// Grid indices of rows without errors, in input order.
    pub valid_rows: Vec<usize>,
}

impl ValidationReport {
    pub fn is_row_valid(&self, row: usize) -> bool {
        self.valid_rows.binary_search(&row).is_ok()
    }

    pub fn errors_for_row(&self, row: usize) -> impl Iterator<Item = &RowValidationError> {
        self.errors.iter().filter(move |err| err.row() == row)
    }
}

pub fn validate_rows(
    grid: &RawGrid,
    columns: &BoundColumns,
    config: &ConversionConfig,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for header in columns.missing_recommended() {
        report.warnings.push(RowValidationWarning::MissingOptionalColumn {
            column: header.to_string(),
        });
    }

    for (row_idx, cells) in grid.indexed_rows() {
        if is_blank_row(cells) {
            report.warnings.push(RowValidationWarning::BlankRow { row: row_idx });
            continue;
        }
        let row = ScheduleRow::from_cells(row_idx, cells, columns);
        let errors_before = report.errors.len();
        validate_row(&row, columns, config, &mut report);
        if report.errors.len() == errors_before {
            report.valid_row_count += 1;
            report.valid_rows.push(row_idx);
        } else {
            tracing::debug!(row = row_idx, "row rejected by validation");
        }
    }

    report.valid = report.errors.is_empty() && report.valid_row_count > 0;
    tracing::info!(
        valid_rows = report.valid_row_count,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        fixes = report.fixes.len(),
        "row validation finished"
    );
    report
}

fn validate_row(
    row: &ScheduleRow,
    columns: &BoundColumns,
    config: &ConversionConfig,
    report: &mut ValidationReport,
) {
    if row.name.trim().is_empty() {
        report
            .errors
            .push(RowValidationError::BlankName { row: row.row });
        return;
    }

    let start = decode_cell(&row.start);
    if start.is_none() {
        report.errors.push(RowValidationError::InvalidStartDate {
            row: row.row,
            value: row.start.text(),
        });
    }

    let end = if row.end.is_blank() && end_defaults_to_start(columns.layout()) {
        start
    } else {
        let end = decode_cell(&row.end);
        if end.is_none() {
            report.errors.push(RowValidationError::InvalidEndDate {
                row: row.row,
                value: row.end.text(),
            });
        }
        end
    };

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            report.errors.push(RowValidationError::StartAfterEnd {
                row: row.row,
                start,
                end,
            });
        } else {
            let days = (end - start).num_days();
            if days > config.long_span_days {
                report
                    .warnings
                    .push(RowValidationWarning::LongSpan { row: row.row, days });
            }
        }
    }

    match &row.status {
        Some(status) if !status.is_blank() => {
            check_status(row.row, status, columns.layout().status_policy(), report)
        }
        _ => default_status(row.row, report),
    }

    if let Some(level) = &row.organization_level {
        if parse_level(level).is_none() {
            report.warnings.push(RowValidationWarning::InvalidOrganizationLevel {
                row: row.row,
                value: level.clone(),
            });
        }
    }
}

fn default_status(row: usize, report: &mut ValidationReport) {
    report.warnings.push(RowValidationWarning::MissingStatus { row });
    report.fixes.push(Fix {
        row,
        field: "status".to_string(),
        value: StatusClass::Planned.as_str().to_string(),
    });
}

fn check_status(row: usize, status: &Cell, policy: StatusPolicy, report: &mut ValidationReport) {
    match policy {
        StatusPolicy::Label => {
            if StatusClass::from_label(&status.text()).is_none() {
                report.warnings.push(RowValidationWarning::UnrecognizedStatus {
                    row,
                    value: status.text(),
                });
                report.fixes.push(Fix {
                    row,
                    field: "status".to_string(),
                    value: StatusClass::Planned.as_str().to_string(),
                });
            }
        }
        StatusPolicy::Numeric => {
            let in_range = parse_progress(status).is_some_and(|p| (0..=100).contains(&p));
            if !in_range {
                report.warnings.push(RowValidationWarning::InvalidProgress {
                    row,
                    value: status.text(),
                });
                report.fixes.push(Fix {
                    row,
                    field: "progress".to_string(),
                    value: numeric_progress(status).to_string(),
                });
            }
        }
    }
}
