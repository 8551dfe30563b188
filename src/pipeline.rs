use crate::config::ConversionConfig;
use crate::dependencies::resolve_dependencies;
use crate::error::{
    AggregationWarning, ConversionError, ConversionResult, DependencyResolutionWarning,
    TimelineWarning,
};
use crate::frame::tasks_to_dataframe;
use crate::graph::check_dependency_timeline;
use crate::grid::RawGrid;
use crate::hierarchy::{Hierarchy, structure_meetings};
use crate::io::read_csv_grid_with_progress;
use crate::meetings::{MeetingGroup, aggregate_meetings};
use crate::normalize::normalize_rows;
use crate::record::type_rows;
use crate::row_validation::{ValidationReport, validate_rows};
use crate::schema::{Field, Layout, detect_columns};
use crate::task::{Task, TaskKind};
use chrono::NaiveDate;
use polars::prelude::{DataFrame, PolarsResult};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConversionReport {
    pub validation: ValidationReport,
    pub dependency_warnings: Vec<DependencyResolutionWarning>,
    pub aggregation_warnings: Vec<AggregationWarning>,
    pub timeline_warnings: Vec<TimelineWarning>,
}

impl ConversionReport {
    pub fn error_count(&self) -> usize {
        self.validation.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.validation.warnings.len()
            + self.dependency_warnings.len()
            + self.aggregation_warnings.len()
            + self.timeline_warnings.len()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Every error and warning rendered for display, errors first.
    pub fn messages(&self) -> Vec<String> {
        let mut out: Vec<String> = self.validation.errors.iter().map(ToString::to_string).collect();
        out.extend(self.validation.warnings.iter().map(ToString::to_string));
        out.extend(self.validation.fixes.iter().map(ToString::to_string));
        out.extend(self.dependency_warnings.iter().map(ToString::to_string));
        out.extend(self.aggregation_warnings.iter().map(ToString::to_string));
        out.extend(self.timeline_warnings.iter().map(ToString::to_string));
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub layout: Layout,
    pub task_count: usize,
    pub meeting_count: usize,
    pub group_count: usize,
    pub edge_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub first_start: Option<NaiveDate>,
    pub last_end: Option<NaiveDate>,
}

impl ConversionSummary {
    pub fn to_summary_line(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("layout={}", self.layout));
        parts.push(format!("tasks={}", self.task_count));
        if self.meeting_count > 0 {
            parts.push(format!("meetings={}", self.meeting_count));
        }
        if self.group_count > 0 {
            parts.push(format!("groups={}", self.group_count));
        }
        if self.edge_count > 0 {
            parts.push(format!("edges={}", self.edge_count));
        }
        if let (Some(start), Some(end)) = (self.first_start, self.last_end) {
            parts.push(format!("span={}..{}", start, end));
        }
        parts.push(format!("errors={}", self.error_count));
        parts.push(format!("warnings={}", self.warning_count));
        parts.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub layout: Layout,
    /// Row tasks in input order, then meeting group bars in level order.
    pub tasks: Vec<Task>,
    pub meeting_groups: Vec<MeetingGroup>,
    pub hierarchy: Hierarchy,
    pub report: ConversionReport,
}

impl Conversion {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn tasks_of_kind(&self, kind: TaskKind) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.kind == kind)
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        tasks_to_dataframe(&self.tasks)
    }

    pub fn to_json(&self) -> ConversionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> ConversionSummary {
        ConversionSummary {
            layout: self.layout,
            task_count: self.tasks.len(),
            meeting_count: self.tasks_of_kind(TaskKind::Meeting).count(),
            group_count: self.meeting_groups.len(),
            edge_count: self.tasks.iter().map(|t| t.dependencies.len()).sum(),
            error_count: self.report.error_count(),
            warning_count: self.report.warning_count(),
            first_start: self.tasks.iter().map(|t| t.start).min(),
            last_end: self.tasks.iter().map(|t| t.end).max(),
        }
    }
}

pub fn convert(grid: &RawGrid, config: &ConversionConfig) -> ConversionResult<Conversion> {
    convert_with_progress(grid, config, &mut |_, _| {})
}

/// Runs the whole pipeline, reporting 75 when conversion starts and 100 when done.
pub fn convert_with_progress(
    grid: &RawGrid,
    config: &ConversionConfig,
    progress: &mut dyn FnMut(u8, &str),
) -> ConversionResult<Conversion> {
    if grid.is_empty() {
        return Err(ConversionError::EmptyGrid);
    }
    progress(75, "converting");

    let columns = detect_columns(grid.headers())?;
    let layout = columns.layout();
    if grid.rows().is_empty() {
        return Err(ConversionError::NoDataRows);
    }

    let validation = validate_rows(grid, &columns, config);
    if validation.valid_row_count == 0 {
        tracing::warn!(errors = validation.errors.len(), "no valid rows");
        return Err(ConversionError::NoValidRows {
            report: Box::new(validation),
        });
    }

    let rows = type_rows(grid.indexed_rows(), &columns);
    let mut tasks = normalize_rows(&rows, &validation.valid_rows, layout);
    if tasks.is_empty() {
        return Err(ConversionError::NoValidRows {
            report: Box::new(validation),
        });
    }

    let dependency_warnings = resolve_dependencies(&mut tasks, &rows, columns.has(Field::Id));

    let (meeting_groups, mut aggregation_warnings) = if config.aggregate_meetings {
        aggregate_meetings(&tasks, &config.group_names)
    } else {
        (Vec::new(), Vec::new())
    };
    let (hierarchy, level_warnings) = structure_meetings(&tasks);
    aggregation_warnings.extend(level_warnings);

    tasks.extend(meeting_groups.iter().map(|group| group.task.clone()));

    let timeline_warnings = if config.check_timeline {
        check_dependency_timeline(&tasks)
    } else {
        Vec::new()
    };

    let conversion = Conversion {
        layout,
        tasks,
        meeting_groups,
        hierarchy,
        report: ConversionReport {
            validation,
            dependency_warnings,
            aggregation_warnings,
            timeline_warnings,
        },
    };
    tracing::info!(summary = %conversion.summary().to_summary_line(), "conversion finished");
    progress(100, "done");
    Ok(conversion)
}

/// Decodes CSV text and converts it, reporting 0, 50, 75 and 100.
pub fn convert_csv_reader<R: Read>(
    reader: R,
    config: &ConversionConfig,
    progress: &mut dyn FnMut(u8, &str),
) -> ConversionResult<Conversion> {
    let grid = read_csv_grid_with_progress(reader, progress)?;
    convert_with_progress(&grid, config, progress)
}

pub fn convert_csv_path<P: AsRef<Path>>(
    path: P,
    config: &ConversionConfig,
) -> ConversionResult<Conversion> {
    let file = File::open(path)?;
    convert_csv_reader(file, config, &mut |_, _| {})
}
