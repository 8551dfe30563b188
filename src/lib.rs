pub mod config;
pub mod date;
pub mod dependencies;
pub mod error;
pub mod frame;
pub mod graph;
pub mod grid;
pub mod hierarchy;
pub mod io;
pub mod meetings;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod recurrence;
pub mod row_validation;
pub mod schema;
pub mod task;

pub use config::{ConversionConfig, MeetingGroupNames};
pub use error::{
    AggregationWarning, ConversionError, ConversionResult, DependencyResolutionWarning,
    RowValidationError, RowValidationWarning, SchemaDetectionError, TimelineWarning,
};
pub use grid::{Cell, RawGrid};
pub use hierarchy::{Hierarchy, HierarchyEdge, Relationship};
pub use meetings::MeetingGroup;
pub use pipeline::{Conversion, ConversionReport, ConversionSummary, convert, convert_with_progress};
pub use recurrence::expand_recurring;
pub use schema::{ColumnMapping, Layout, detect_layout};
pub use task::{StatusClass, Task, TaskEdit, TaskKind};
