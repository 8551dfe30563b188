use crate::date::format_date;
use crate::error::ConversionResult;
use crate::schema::UNIFIED_HEADERS;
use crate::task::Task;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One row of the 19-column unified layout. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    pub id: String,
    pub name: String,
    pub start: String,
    pub end: String,
    pub progress: u8,
    pub dependencies: String,
    pub assignee: String,
    pub event_type: String,
    pub organization_level: String,
    pub organization_type: String,
    pub decision_authority: String,
    pub report_to: String,
    pub attendees: String,
    pub location: String,
    pub agenda: String,
    pub timeline_color: String,
    pub priority: String,
    pub frequency: String,
    pub memo: String,
}

impl From<&Task> for UnifiedRecord {
    fn from(task: &Task) -> Self {
        let meeting = task.meeting.clone().unwrap_or_default();
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            start: format_date(task.start),
            end: format_date(task.end),
            progress: task.progress,
            dependencies: task.dependencies.join(","),
            assignee: task.assignee.clone().unwrap_or_default(),
            event_type: task.kind.as_str().to_string(),
            organization_level: meeting
                .organization_level
                .map(|level| level.to_string())
                .unwrap_or_default(),
            organization_type: meeting
                .organization_type
                .map(String::from)
                .unwrap_or_default(),
            decision_authority: meeting
                .decision_authority
                .map(String::from)
                .unwrap_or_default(),
            report_to: meeting.report_to.unwrap_or_default(),
            attendees: meeting.attendees.unwrap_or_default(),
            location: meeting.location.unwrap_or_default(),
            agenda: meeting.agenda.unwrap_or_default(),
            timeline_color: task.timeline_color.clone().unwrap_or_default(),
            priority: task.priority.clone().unwrap_or_default(),
            frequency: meeting.frequency.map(String::from).unwrap_or_default(),
            memo: task.memo.clone().unwrap_or_default(),
        }
    }
}

pub fn export_unified_csv<W: Write>(tasks: &[Task], writer: W) -> ConversionResult<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(UNIFIED_HEADERS)?;
    for task in tasks {
        writer.serialize(UnifiedRecord::from(task))?;
    }
    writer.flush()?;
    tracing::info!(tasks = tasks.len(), "unified csv exported");
    Ok(())
}

pub fn export_unified_csv_path<P: AsRef<Path>>(tasks: &[Task], path: P) -> ConversionResult<()> {
    let file = File::create(path)?;
    export_unified_csv(tasks, file)
}
