use crate::date::clamped_date;
use crate::task::{Frequency, Task};
use chrono::{Datelike, NaiveDate};

fn occurrence(template: &Task, id: String, date: NaiveDate) -> Task {
    let mut task = template.clone();
    task.id = id;
    task.start = date;
    task.end = date;
    task
}

fn monthly(template: &Task, window_start: NaiveDate, window_end: NaiveDate) -> Vec<Task> {
    let day = template.start.day();
    let mut out = Vec::new();
    let (mut year, mut month) = (window_start.year(), window_start.month());
    loop {
        let Some(date) = clamped_date(year, month, day) else {
            break;
        };
        if date > window_end {
            break;
        }
        if date >= window_start {
            let id = format!("{}-{}", template.id, out.len() + 1);
            out.push(occurrence(template, id, date));
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    out
}

fn annual(template: &Task, window_start: NaiveDate, window_end: NaiveDate) -> Vec<Task> {
    let (month, day) = (template.start.month(), template.start.day());
    (window_start.year()..=window_end.year())
        .filter_map(|year| clamped_date(year, month, day).map(|date| (year, date)))
        .filter(|(_, date)| *date >= window_start && *date <= window_end)
        .map(|(year, date)| occurrence(template, format!("{}-{year}", template.id), date))
        .collect()
}

/// Expands meeting templates into dated one-day occurrences within
/// `[window_start, window_end]`.
///
/// Monthly templates repeat on their day of month, annual ones on their
/// month and day. Ad hoc templates pass through unchanged; templates without
/// a recognized frequency produce nothing.
pub fn expand_recurring(
    templates: &[Task],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<Task> {
    if window_start > window_end {
        return Vec::new();
    }
    let mut out = Vec::new();
    for template in templates {
        let frequency = template.meeting.as_ref().and_then(|m| m.frequency.as_ref());
        match frequency {
            Some(Frequency::Monthly) => out.extend(monthly(template, window_start, window_end)),
            Some(Frequency::Annual) => out.extend(annual(template, window_start, window_end)),
            Some(Frequency::Adhoc) => out.push(template.clone()),
            Some(Frequency::Other(raw)) => {
                tracing::debug!(task = %template.id, frequency = %raw, "unknown frequency, not expanded");
            }
            None => {}
        }
    }
    tracing::info!(templates = templates.len(), occurrences = out.len(), "recurring meetings expanded");
    out
}
