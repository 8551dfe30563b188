use chrono::NaiveDate;
use renovation_timeline::frame::{date_from_days, tasks_to_dataframe};
use renovation_timeline::task::{
    DecisionAuthority, Frequency, MeetingAttributes, OrganizationType, TaskEditError,
    default_level_color, organization_level_name, row_task_id,
};
use renovation_timeline::{StatusClass, Task, TaskEdit, TaskKind};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn edits_only_touch_dates_and_memo() {
    let mut task = Task::new("task-1", "Paint", d(2025, 1, 1), d(2025, 1, 10), TaskKind::Construction)
        .with_progress(40);
    task.apply_edit(TaskEdit {
        start: Some(d(2025, 1, 3)),
        end: None,
        memo: Some("moved for weather".into()),
    })
    .unwrap();
    assert_eq!(task.start, d(2025, 1, 3));
    assert_eq!(task.end, d(2025, 1, 10));
    assert_eq!(task.memo.as_deref(), Some("moved for weather"));
    assert_eq!(task.progress, 40);
    assert_eq!(task.status_class, StatusClass::InProgress);
}

#[test]
fn edit_breaking_date_order_is_rejected() {
    let mut task = Task::new("task-1", "Paint", d(2025, 1, 1), d(2025, 1, 10), TaskKind::Construction);
    let err = task
        .apply_edit(TaskEdit {
            end: Some(d(2024, 12, 31)),
            ..TaskEdit::default()
        })
        .unwrap_err();
    assert_eq!(
        err,
        TaskEditError::StartAfterEnd {
            task_id: "task-1".into(),
            start: d(2025, 1, 1),
            end: d(2024, 12, 31),
        }
    );
    assert_eq!(task.end, d(2025, 1, 10));
}

#[test]
fn meeting_vocabularies_keep_unknown_values() {
    assert_eq!(OrganizationType::from("board_meeting".to_string()).level(), Some(2));
    assert_eq!(
        OrganizationType::from("owners_forum".to_string()),
        OrganizationType::Other("owners_forum".into())
    );
    assert_eq!(DecisionAuthority::from("final".to_string()).label(), "Final decision");
    assert_eq!(Frequency::from("adhoc".to_string()), Frequency::Adhoc);
    assert_eq!(String::from(Frequency::Other("weekly".into())), "weekly");
    assert_eq!(organization_level_name(3), "Repair committee");
    assert_eq!(default_level_color(1), "#8B0000");
    assert_eq!(default_level_color(9), "#666666");
    assert_eq!(row_task_id(7), "task-7");
}

#[test]
fn task_serializes_with_snake_case_kind() {
    let mut task = Task::new("meeting_group_board_meeting", "Board", d(2025, 1, 10), d(2025, 3, 10), TaskKind::MeetingGroup);
    task.meeting = Some(MeetingAttributes {
        organization_level: Some(2),
        organization_type: Some(OrganizationType::BoardMeeting),
        ..MeetingAttributes::default()
    });
    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["kind"], "meeting_group");
    assert_eq!(json["start"], "2025-01-10");
    assert_eq!(json["meeting"]["organization_type"], "board_meeting");
    let back: Task = serde_json::from_value(json).unwrap();
    assert_eq!(back, task);
}

#[test]
fn dataframe_has_one_row_per_task() {
    let first = Task::new("task-1", "Paint", d(2025, 1, 1), d(2025, 1, 10), TaskKind::Construction)
        .with_progress(100);
    let mut second = Task::new("task-2", "Roof", d(2025, 1, 11), d(2025, 1, 20), TaskKind::Construction);
    second.dependencies = vec!["task-1".into()];

    let df = tasks_to_dataframe(&[first, second]).unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(df.column("id").unwrap().str().unwrap().get(1), Some("task-2"));
    assert_eq!(df.column("status_class").unwrap().str().unwrap().get(0), Some("completed"));
    let starts = df.column("start").unwrap().date().unwrap();
    assert_eq!(starts.get(1).and_then(date_from_days), Some(d(2025, 1, 11)));
    let deps = df.column("dependencies").unwrap().list().unwrap();
    let second_deps = deps.get_as_series(1).unwrap();
    assert_eq!(second_deps.str().unwrap().get(0), Some("task-1"));
    assert_eq!(df.column("organization_level").unwrap().i32().unwrap().get(0), None);
}
