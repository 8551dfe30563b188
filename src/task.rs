use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Construction,
    Meeting,
    MeetingGroup,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Construction => "construction",
            TaskKind::Meeting => "meeting",
            TaskKind::MeetingGroup => "meeting_group",
        }
    }

    /// Per-row `event_type` value. Unknown values fall back to construction.
    pub fn from_event_type(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "meeting" | "meeting_group" => TaskKind::Meeting,
            _ => TaskKind::Construction,
        }
    }

    pub fn is_meeting(&self) -> bool {
        matches!(self, TaskKind::Meeting | TaskKind::MeetingGroup)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusClass {
    Planned,
    InProgress,
    Completed,
}

impl StatusClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Planned => "planned",
            StatusClass::InProgress => "in-progress",
            StatusClass::Completed => "completed",
        }
    }

    pub fn from_progress(progress: u8) -> Self {
        if progress >= 100 {
            StatusClass::Completed
        } else if progress > 0 {
            StatusClass::InProgress
        } else {
            StatusClass::Planned
        }
    }

    /// Recognizes the English labels and their Japanese equivalents.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "planned" | "予定" => Some(StatusClass::Planned),
            "in-progress" | "in progress" | "in_progress" | "進行中" => {
                Some(StatusClass::InProgress)
            }
            "completed" | "完了" => Some(StatusClass::Completed),
            _ => None,
        }
    }

    pub fn implied_progress(&self) -> u8 {
        match self {
            StatusClass::Planned => 0,
            StatusClass::InProgress => 50,
            StatusClass::Completed => 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrganizationType {
    GeneralMeeting,
    BoardMeeting,
    RepairCommittee,
    Other(String),
}

impl OrganizationType {
    pub const KNOWN: [OrganizationType; 3] = [
        OrganizationType::GeneralMeeting,
        OrganizationType::BoardMeeting,
        OrganizationType::RepairCommittee,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            OrganizationType::GeneralMeeting => "general_meeting",
            OrganizationType::BoardMeeting => "board_meeting",
            OrganizationType::RepairCommittee => "repair_committee",
            OrganizationType::Other(raw) => raw,
        }
    }

    /// Governance tier: 1 assembly, 2 board, 3 committee.
    pub fn level(&self) -> Option<u8> {
        match self {
            OrganizationType::GeneralMeeting => Some(1),
            OrganizationType::BoardMeeting => Some(2),
            OrganizationType::RepairCommittee => Some(3),
            OrganizationType::Other(_) => None,
        }
    }
}

impl From<String> for OrganizationType {
    fn from(value: String) -> Self {
        match value.trim() {
            "general_meeting" => OrganizationType::GeneralMeeting,
            "board_meeting" => OrganizationType::BoardMeeting,
            "repair_committee" => OrganizationType::RepairCommittee,
            other => OrganizationType::Other(other.to_string()),
        }
    }
}

impl From<OrganizationType> for String {
    fn from(value: OrganizationType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DecisionAuthority {
    Final,
    Executive,
    Advisory,
    Other(String),
}

impl DecisionAuthority {
    pub fn as_str(&self) -> &str {
        match self {
            DecisionAuthority::Final => "final",
            DecisionAuthority::Executive => "executive",
            DecisionAuthority::Advisory => "advisory",
            DecisionAuthority::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DecisionAuthority::Final => "Final decision",
            DecisionAuthority::Executive => "Executive authority",
            DecisionAuthority::Advisory => "Advisory",
            DecisionAuthority::Other(_) => "Unknown",
        }
    }
}

impl From<String> for DecisionAuthority {
    fn from(value: String) -> Self {
        match value.trim() {
            "final" => DecisionAuthority::Final,
            "executive" => DecisionAuthority::Executive,
            "advisory" => DecisionAuthority::Advisory,
            other => DecisionAuthority::Other(other.to_string()),
        }
    }
}

impl From<DecisionAuthority> for String {
    fn from(value: DecisionAuthority) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Annual,
    Monthly,
    Adhoc,
    Other(String),
}

impl Frequency {
    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Annual => "annual",
            Frequency::Monthly => "monthly",
            Frequency::Adhoc => "adhoc",
            Frequency::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Annual => "Once a year",
            Frequency::Monthly => "Once a month",
            Frequency::Adhoc => "Ad hoc",
            Frequency::Other(_) => "Unknown",
        }
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        match value.trim() {
            "annual" => Frequency::Annual,
            "monthly" => Frequency::Monthly,
            "adhoc" => Frequency::Adhoc,
            other => Frequency::Other(other.to_string()),
        }
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}

pub fn organization_level_name(level: u8) -> &'static str {
    match level {
        1 => "General assembly",
        2 => "Board of directors",
        3 => "Repair committee",
        _ => "Unknown",
    }
}

pub fn default_level_color(level: u8) -> &'static str {
    match level {
        1 => "#8B0000",
        2 => "#FF8C00",
        3 => "#32CD32",
        _ => "#666666",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeetingAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_type: Option<OrganizationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_authority: Option<DecisionAuthority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda: Option<String>,
}

impl MeetingAttributes {
    pub fn is_empty(&self) -> bool {
        self == &MeetingAttributes::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub progress: u8,
    pub status_class: StatusClass,
    pub kind: TaskKind,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting: Option<MeetingAttributes>,
}

pub fn row_task_id(row: usize) -> String {
    format!("task-{row}")
}

impl Task {
    /// Callers must pass `start <= end`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        kind: TaskKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start,
            end,
            progress: 0,
            status_class: StatusClass::Planned,
            kind,
            dependencies: Vec::new(),
            source_id: None,
            assignee: None,
            category: None,
            priority: None,
            memo: None,
            timeline_color: None,
            meeting: None,
        }
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self.status_class = StatusClass::from_progress(self.progress);
        self
    }

    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn organization_level(&self) -> Option<u8> {
        self.meeting.as_ref().and_then(|m| m.organization_level)
    }

    pub fn organization_type(&self) -> Option<&OrganizationType> {
        self.meeting.as_ref().and_then(|m| m.organization_type.as_ref())
    }

    pub fn report_to(&self) -> Option<&str> {
        self.meeting.as_ref().and_then(|m| m.report_to.as_deref())
    }

    /// Row color, falling back to the organization level default.
    pub fn color(&self) -> Option<&str> {
        self.timeline_color
            .as_deref()
            .or_else(|| self.organization_level().map(default_level_color))
    }

    /// Applies an externally made edit. Only dates and memo can change.
    pub fn apply_edit(&mut self, edit: TaskEdit) -> Result<(), TaskEditError> {
        let start = edit.start.unwrap_or(self.start);
        let end = edit.end.unwrap_or(self.end);
        if start > end {
            return Err(TaskEditError::StartAfterEnd {
                task_id: self.id.clone(),
                start,
                end,
            });
        }
        self.start = start;
        self.end = end;
        if let Some(memo) = edit.memo {
            self.memo = if memo.trim().is_empty() {
                None
            } else {
                Some(memo)
            };
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskEditError {
    #[error("task {task_id}: start {start} would be after end {end}")]
    StartAfterEnd {
        task_id: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{} .. {}] {}% {}",
            self.id,
            self.name,
            self.start,
            self.end,
            self.progress,
            self.status_class.as_str()
        )
    }
}
