use chrono::NaiveDate;
use renovation_timeline::schema::UNIFIED_HEADERS;
use renovation_timeline::{
    Cell, ConversionConfig, ConversionError, Layout, RawGrid, SchemaDetectionError, StatusClass,
    TaskKind, convert, convert_with_progress,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn unified_row<'a>(values: &[(&str, &'a str)]) -> Vec<&'a str> {
    UNIFIED_HEADERS
        .iter()
        .map(|h| {
            values
                .iter()
                .find(|(k, _)| k == h)
                .map(|(_, v)| *v)
                .unwrap_or("")
        })
        .collect()
}

#[test]
fn english_row_becomes_planned_construction_task() {
    let grid = RawGrid::from_str_rows(&[
        vec!["name", "start", "end", "progress", "assignee"],
        vec!["Paint", "2025-01-01", "2025-03-01", "0", "A"],
    ]);
    let conversion = convert(&grid, &ConversionConfig::default()).unwrap();
    assert_eq!(conversion.layout, Layout::English);
    assert_eq!(conversion.tasks.len(), 1);
    let task = &conversion.tasks[0];
    assert_eq!(task.id, "task-1");
    assert_eq!(task.name, "Paint");
    assert_eq!(task.kind, TaskKind::Construction);
    assert_eq!(task.progress, 0);
    assert_eq!(task.status_class, StatusClass::Planned);
    assert_eq!(task.start, d(2025, 1, 1));
    assert_eq!(task.end, d(2025, 3, 1));
    assert_eq!(task.assignee.as_deref(), Some("A"));
}

#[test]
fn numeric_progress_sets_status_class() {
    let grid = RawGrid::from_str_rows(&[
        vec!["name", "start", "end", "progress"],
        vec!["Scaffold", "2025-01-01", "2025-01-05", "100"],
        vec!["Facade", "2025-01-06", "2025-02-05", "35%"],
        vec!["Roof", "2025-02-06", "2025-03-05", ""],
    ]);
    let conversion = convert(&grid, &ConversionConfig::default()).unwrap();
    let classes: Vec<(u8, StatusClass)> = conversion
        .tasks
        .iter()
        .map(|t| (t.progress, t.status_class))
        .collect();
    assert_eq!(
        classes,
        vec![
            (100, StatusClass::Completed),
            (35, StatusClass::InProgress),
            (0, StatusClass::Planned),
        ]
    );
}

#[test]
fn localized_labels_derive_progress() {
    let grid = RawGrid::from_str_rows(&[
        vec!["イベント名", "開始日", "終了日", "ステータス", "種類"],
        vec!["足場設置", "2025/01/06", "2025/01/10", "完了", "工事"],
        vec!["外壁塗装", "2025年1月11日", "2025年2月10日", "進行中", "工事"],
        vec!["防水", "2025-02-11", "2025-02-20", "未定", "工事"],
    ]);
    let conversion = convert(&grid, &ConversionConfig::default()).unwrap();
    assert_eq!(conversion.layout, Layout::Localized);
    let progress: Vec<u8> = conversion.tasks.iter().map(|t| t.progress).collect();
    assert_eq!(progress, vec![100, 50, 0]);
    assert_eq!(conversion.tasks[0].category.as_deref(), Some("工事"));
    assert_eq!(conversion.tasks[2].status_class, StatusClass::Planned);
    assert_eq!(conversion.report.validation.fixes.len(), 1);
}

#[test]
fn unified_event_type_overrides_kind_per_row() {
    let grid = RawGrid::from_str_rows(&[
        UNIFIED_HEADERS.to_vec(),
        unified_row(&[
            ("id", "T1"),
            ("name", "Scaffold"),
            ("start", "2025-01-06"),
            ("end", "2025-01-20"),
            ("progress", "20"),
            ("event_type", "construction"),
        ]),
        unified_row(&[
            ("id", "BM-1"),
            ("name", "Board"),
            ("start", "2025-01-10"),
            ("end", "2025-01-10"),
            ("event_type", "meeting"),
            ("organization_level", "2"),
            ("organization_type", "board_meeting"),
            ("decision_authority", "executive"),
            ("timeline_color", "#123456"),
        ]),
        unified_row(&[
            ("id", "T2"),
            ("name", "Facade"),
            ("start", "2025-01-21"),
            ("end", "2025-02-20"),
            ("event_type", "construction"),
            ("dependencies", "T1,BM-1"),
        ]),
    ]);
    let conversion = convert(&grid, &ConversionConfig::default()).unwrap();
    assert_eq!(conversion.layout, Layout::Unified);
    assert_eq!(conversion.task("task-1").unwrap().kind, TaskKind::Construction);
    let board = conversion.task("task-2").unwrap();
    assert_eq!(board.kind, TaskKind::Meeting);
    assert_eq!(board.color(), Some("#123456"));
    assert_eq!(
        board.meeting.as_ref().unwrap().decision_authority.as_ref().unwrap().label(),
        "Executive authority"
    );
    assert_eq!(
        conversion.task("task-3").unwrap().dependencies,
        vec!["task-1", "meeting_group_board_meeting"]
    );
    assert!(conversion.task("meeting_group_board_meeting").is_some());
    assert!(conversion.report.timeline_warnings.is_empty());
}

#[test]
fn serial_date_cells_are_decoded() {
    let grid = RawGrid::new(
        vec!["name".into(), "start".into(), "end".into()],
        vec![vec![Cell::from("Paint"), Cell::Number(45658.0), Cell::Number(45726.75)]],
    );
    let conversion = convert(&grid, &ConversionConfig::default()).unwrap();
    assert_eq!(conversion.tasks[0].start, d(2025, 1, 1));
    assert_eq!(conversion.tasks[0].end, d(2025, 3, 10));
}

#[test]
fn hard_failures_abort_conversion() {
    let config = ConversionConfig::default();

    let err = convert(&RawGrid::default(), &config).unwrap_err();
    assert!(matches!(err, ConversionError::EmptyGrid));

    let header_only = RawGrid::from_str_rows(&[vec!["name", "start", "end"]]);
    assert!(matches!(
        convert(&header_only, &config).unwrap_err(),
        ConversionError::NoDataRows
    ));

    let unknown = RawGrid::from_str_rows(&[vec!["a", "b"], vec!["1", "2"]]);
    assert!(matches!(
        convert(&unknown, &config).unwrap_err(),
        ConversionError::Schema(SchemaDetectionError::NoMatchingLayout { .. })
    ));

    let all_bad = RawGrid::from_str_rows(&[
        vec!["name", "start", "end"],
        vec!["Paint", "2025-03-01", "2025-01-01"],
    ]);
    match convert(&all_bad, &config).unwrap_err() {
        ConversionError::NoValidRows { report } => assert_eq!(report.errors.len(), 1),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn progress_callback_reports_conversion_stages() {
    let grid = RawGrid::from_str_rows(&[
        vec!["name", "start", "end"],
        vec!["Paint", "2025-01-01", "2025-01-05"],
    ]);
    let mut seen = Vec::new();
    convert_with_progress(&grid, &ConversionConfig::default(), &mut |pct, stage| {
        seen.push((pct, stage.to_string()));
    })
    .unwrap();
    assert_eq!(seen, vec![(75, "converting".to_string()), (100, "done".to_string())]);
}

#[test]
fn summary_line_and_json_output() {
    let grid = RawGrid::from_str_rows(&[
        vec!["id", "name", "start", "end", "progress", "dependencies", "assignee"],
        vec!["T1", "Demolition", "2025-01-01", "2025-01-10", "100", "", "A"],
        vec!["T2", "Framing", "2025-01-11", "2025-01-20", "0", "T1", "B"],
    ]);
    let conversion = convert(&grid, &ConversionConfig::default()).unwrap();
    let summary = conversion.summary();
    assert_eq!(summary.task_count, 2);
    assert_eq!(summary.edge_count, 1);
    assert_eq!(
        summary.to_summary_line(),
        "layout=english, tasks=2, edges=1, span=2025-01-01..2025-01-20, errors=0, warnings=0"
    );

    let json: serde_json::Value = serde_json::from_str(&conversion.to_json().unwrap()).unwrap();
    assert_eq!(json["layout"], "english");
    assert_eq!(json["tasks"][1]["status_class"], "planned");
    assert_eq!(json["tasks"][0]["status_class"], "completed");
    assert_eq!(json["tasks"][1]["dependencies"][0], "task-1");
}

#[test]
fn long_span_threshold_comes_from_config() {
    let grid = RawGrid::from_str_rows(&[
        vec!["id", "name", "start", "end", "progress", "dependencies", "assignee"],
        vec!["T1", "Facade", "2025-01-01", "2025-03-01", "0", "", "A"],
    ]);
    let strict = ConversionConfig::from_json_str(r#"{ "long_span_days": 30 }"#).unwrap();
    assert!(strict.aggregate_meetings);
    let conversion = convert(&grid, &strict).unwrap();
    assert_eq!(conversion.report.warning_count(), 1);
    let relaxed = convert(&grid, &ConversionConfig::default()).unwrap();
    assert_eq!(relaxed.report.warning_count(), 0);
}

#[test]
fn huge_serial_rejects_only_its_row() {
    let grid = RawGrid::new(
        vec!["name".into(), "start".into(), "end".into()],
        vec![
            vec![Cell::from("Paint"), Cell::Number(1e15), Cell::from("2025-01-05")],
            vec![Cell::from("Roof"), Cell::from("2025-01-06"), Cell::from("2025-01-10")],
        ],
    );
    let conversion = convert(&grid, &ConversionConfig::default()).unwrap();
    assert_eq!(conversion.tasks.len(), 1);
    assert_eq!(conversion.tasks[0].name, "Roof");
    assert_eq!(conversion.report.error_count(), 1);
}
