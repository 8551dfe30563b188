use crate::grid::Cell;
use crate::schema::{BoundColumns, Field, Layout};

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    /// Grid index; the header row is 0.
    pub row: usize,
    pub source_id: Option<String>,
    pub name: String,
    pub start: Cell,
    pub end: Cell,
    /// `None` when the layout has no status column bound.
    pub status: Option<Cell>,
    pub event_type: Option<String>,
    pub dependencies: Option<String>,
    pub assignee: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub memo: Option<String>,
    pub timeline_color: Option<String>,
    pub organization_level: Option<String>,
    pub organization_type: Option<String>,
    pub decision_authority: Option<String>,
    pub report_to: Option<String>,
    pub frequency: Option<String>,
    pub attendees: Option<String>,
    pub location: Option<String>,
    pub agenda: Option<String>,
}

/// Right-pads `cells` with empty cells up to `width`.
///
/// Cells already present, the dependencies cell included, keep their values.
pub fn pad_row(cells: &[Cell], width: usize) -> Vec<Cell> {
    let mut padded = cells.to_vec();
    if padded.len() < width {
        tracing::debug!(have = cells.len(), width, "padding short row");
        padded.resize(width, Cell::Empty);
    }
    padded
}

impl ScheduleRow {
    pub fn from_cells(row: usize, cells: &[Cell], columns: &BoundColumns) -> Self {
        let cells = pad_row(cells, columns.width());
        let cell = |field: Field| -> Cell {
            columns
                .index(field)
                .and_then(|idx| cells.get(idx))
                .cloned()
                .unwrap_or_default()
        };
        let text = |field: Field| -> Option<String> { cell(field).non_blank_text() };

        Self {
            row,
            source_id: text(Field::Id),
            name: cell(Field::EventName).text(),
            start: cell(Field::StartDate),
            end: cell(Field::EndDate),
            status: columns.has(Field::Status).then(|| cell(Field::Status)),
            event_type: text(Field::EventType),
            dependencies: text(Field::Dependencies),
            assignee: text(Field::Assignee),
            category: text(Field::Category),
            priority: text(Field::Priority),
            memo: text(Field::Memo),
            timeline_color: text(Field::TimelineColor),
            organization_level: text(Field::OrganizationLevel),
            organization_type: text(Field::OrganizationType),
            decision_authority: text(Field::DecisionAuthority),
            report_to: text(Field::ReportTo),
            frequency: text(Field::Frequency),
            attendees: text(Field::Attendees),
            location: text(Field::Location),
            agenda: text(Field::Agenda),
        }
    }

    pub fn has_meeting_columns(&self) -> bool {
        self.organization_level.is_some()
            || self.organization_type.is_some()
            || self.decision_authority.is_some()
            || self.report_to.is_some()
            || self.frequency.is_some()
    }
}

pub fn type_rows<'a, I>(rows: I, columns: &BoundColumns) -> Vec<ScheduleRow>
where
    I: IntoIterator<Item = (usize, &'a [Cell])>,
{
    rows.into_iter()
        .filter(|(_, cells)| !crate::grid::is_blank_row(cells))
        .map(|(row, cells)| ScheduleRow::from_cells(row, cells, columns))
        .collect()
}

/// Whether the layout reads the optional end date as "same day as start".
pub fn end_defaults_to_start(layout: Layout) -> bool {
    matches!(layout, Layout::Meeting)
}
