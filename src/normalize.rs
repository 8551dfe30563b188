use crate::date::decode_cell;
use crate::grid::Cell;
use crate::record::{ScheduleRow, end_defaults_to_start};
use crate::schema::{Layout, StatusPolicy};
use crate::task::{
    DecisionAuthority, Frequency, MeetingAttributes, OrganizationType, StatusClass, Task,
    TaskKind, row_task_id,
};

/// Leading integer of a progress cell, read the way spreadsheets users type it
/// ("50", "50%", "12.5"). `None` when there is no leading integer.
pub fn parse_progress(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        Cell::Number(_) => None,
        Cell::Text(text) => {
            let text = text.trim();
            let (sign, digits) = match text.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, text.strip_prefix('+').unwrap_or(text)),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|value| sign * value)
        }
    }
}

/// Progress under the numeric policy: the leading integer, else 0, clamped to 0..=100.
pub fn numeric_progress(cell: &Cell) -> u8 {
    parse_progress(cell).unwrap_or(0).clamp(0, 100) as u8
}

pub fn derive_status(status: Option<&Cell>, policy: StatusPolicy) -> (u8, StatusClass) {
    match policy {
        StatusPolicy::Numeric => {
            let progress = status.map(numeric_progress).unwrap_or(0);
            (progress, StatusClass::from_progress(progress))
        }
        StatusPolicy::Label => {
            let class = status
                .and_then(|cell| StatusClass::from_label(&cell.text()))
                .unwrap_or(StatusClass::Planned);
            (class.implied_progress(), class)
        }
    }
}

pub(crate) fn parse_level(text: &str) -> Option<u8> {
    let text = text.trim();
    text.parse::<u8>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && (0.0..=255.0).contains(v))
            .map(|v| v as u8)
    })
}

fn meeting_attributes(row: &ScheduleRow) -> MeetingAttributes {
    MeetingAttributes {
        organization_level: row.organization_level.as_deref().and_then(parse_level),
        organization_type: row.organization_type.clone().map(OrganizationType::from),
        decision_authority: row.decision_authority.clone().map(DecisionAuthority::from),
        report_to: row.report_to.clone(),
        frequency: row.frequency.clone().map(Frequency::from),
        attendees: row.attendees.clone(),
        location: row.location.clone(),
        agenda: row.agenda.clone(),
    }
}

/// Converts one validated row into a task.
///
/// Returns `None` for rows the validator already flagged: blank name,
/// undecodable dates, or start after end.
pub fn normalize_row(row: &ScheduleRow, layout: Layout) -> Option<Task> {
    let name = row.name.trim();
    if name.is_empty() {
        tracing::debug!(row = row.row, "skipping row with blank name");
        return None;
    }
    let Some(start) = decode_cell(&row.start) else {
        tracing::debug!(row = row.row, value = %row.start.text(), "skipping row with invalid start");
        return None;
    };
    let end = match decode_cell(&row.end) {
        Some(end) => end,
        None if row.end.is_blank() && end_defaults_to_start(layout) => start,
        None => {
            tracing::debug!(row = row.row, value = %row.end.text(), "skipping row with invalid end");
            return None;
        }
    };
    if start > end {
        tracing::debug!(row = row.row, %start, %end, "skipping row with start after end");
        return None;
    }

    let kind = match (layout, row.event_type.as_deref()) {
        (Layout::Unified, Some(event_type)) => TaskKind::from_event_type(event_type),
        _ => layout.default_kind(),
    };
    let (progress, status_class) = derive_status(row.status.as_ref(), layout.status_policy());

    let mut task = Task::new(row_task_id(row.row), name, start, end, kind);
    task.progress = progress;
    task.status_class = status_class;
    task.source_id = row.source_id.clone();
    task.assignee = row.assignee.clone();
    task.category = row.category.clone();
    task.priority = row.priority.clone();
    task.memo = row.memo.clone();
    task.timeline_color = row.timeline_color.clone();
    if kind.is_meeting() || row.has_meeting_columns() {
        task.meeting = Some(meeting_attributes(row));
    }
    Some(task)
}

pub fn normalize_rows(rows: &[ScheduleRow], valid_rows: &[usize], layout: Layout) -> Vec<Task> {
    let tasks: Vec<Task> = rows
        .iter()
        .filter(|row| valid_rows.binary_search(&row.row).is_ok())
        .filter_map(|row| normalize_row(row, layout))
        .collect();
    tracing::info!(layout = %layout, tasks = tasks.len(), "rows normalized");
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_reads_leading_integer() {
        assert_eq!(parse_progress(&Cell::from("50")), Some(50));
        assert_eq!(parse_progress(&Cell::from("75%")), Some(75));
        assert_eq!(parse_progress(&Cell::from("12.9")), Some(12));
        assert_eq!(parse_progress(&Cell::from("-5")), Some(-5));
        assert_eq!(parse_progress(&Cell::from("done")), None);
        assert_eq!(parse_progress(&Cell::Number(33.7)), Some(33));
        assert_eq!(parse_progress(&Cell::Empty), None);
    }

    #[test]
    fn numeric_progress_clamps() {
        assert_eq!(numeric_progress(&Cell::from("150")), 100);
        assert_eq!(numeric_progress(&Cell::from("-5")), 0);
        assert_eq!(numeric_progress(&Cell::from("n/a")), 0);
    }

    #[test]
    fn label_policy_maps_labels_to_progress() {
        let completed = Cell::from("完了");
        assert_eq!(
            derive_status(Some(&completed), StatusPolicy::Label),
            (100, StatusClass::Completed)
        );
        let running = Cell::from("in-progress");
        assert_eq!(
            derive_status(Some(&running), StatusPolicy::Label),
            (50, StatusClass::InProgress)
        );
        assert_eq!(derive_status(None, StatusPolicy::Label), (0, StatusClass::Planned));
    }

    #[test]
    fn numeric_policy_classifies_progress() {
        let half = Cell::from("40");
        assert_eq!(
            derive_status(Some(&half), StatusPolicy::Numeric),
            (40, StatusClass::InProgress)
        );
        let done = Cell::Number(100.0);
        assert_eq!(
            derive_status(Some(&done), StatusPolicy::Numeric),
            (100, StatusClass::Completed)
        );
    }

    #[test]
    fn levels_accept_integers_only() {
        assert_eq!(parse_level("1"), Some(1));
        assert_eq!(parse_level(" 3.0 "), Some(3));
        assert_eq!(parse_level("board"), None);
        assert_eq!(parse_level("2.5"), None);
    }
}
