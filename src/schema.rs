use crate::error::SchemaDetectionError;
use crate::task::TaskKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    EventName,
    StartDate,
    EndDate,
    Status,
    Category,
    Assignee,
    EventType,
    Dependencies,
    OrganizationLevel,
    OrganizationType,
    DecisionAuthority,
    ReportTo,
    Attendees,
    Location,
    Agenda,
    TimelineColor,
    Priority,
    Frequency,
    Memo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    Numeric,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Unified,
    English,
    Meeting,
    Localized,
}

/// Detection priority. The unified layout must stay first: its headers also
/// satisfy the English signature.
pub const DETECTION_ORDER: [Layout; 4] = [
    Layout::Unified,
    Layout::English,
    Layout::Meeting,
    Layout::Localized,
];

pub const UNIFIED_HEADERS: [&str; 19] = [
    "id",
    "name",
    "start",
    "end",
    "progress",
    "dependencies",
    "assignee",
    "event_type",
    "organization_level",
    "organization_type",
    "decision_authority",
    "report_to",
    "attendees",
    "location",
    "agenda",
    "timeline_color",
    "priority",
    "frequency",
    "memo",
];

const UNIFIED_COLUMNS: &[(Field, &str)] = &[
    (Field::Id, "id"),
    (Field::EventName, "name"),
    (Field::StartDate, "start"),
    (Field::EndDate, "end"),
    (Field::Status, "progress"),
    (Field::Dependencies, "dependencies"),
    (Field::Assignee, "assignee"),
    (Field::EventType, "event_type"),
    (Field::OrganizationLevel, "organization_level"),
    (Field::OrganizationType, "organization_type"),
    (Field::DecisionAuthority, "decision_authority"),
    (Field::ReportTo, "report_to"),
    (Field::Attendees, "attendees"),
    (Field::Location, "location"),
    (Field::Agenda, "agenda"),
    (Field::TimelineColor, "timeline_color"),
    (Field::Priority, "priority"),
    (Field::Frequency, "frequency"),
    (Field::Memo, "memo"),
];

const ENGLISH_COLUMNS: &[(Field, &str)] = &[
    (Field::Id, "id"),
    (Field::EventName, "name"),
    (Field::StartDate, "start"),
    (Field::EndDate, "end"),
    (Field::Status, "progress"),
    (Field::Dependencies, "dependencies"),
    (Field::Assignee, "assignee"),
    (Field::Priority, "priority"),
    (Field::Memo, "memo"),
];

const MEETING_COLUMNS: &[(Field, &str)] = &[
    (Field::Id, "id"),
    (Field::EventName, "name"),
    (Field::StartDate, "start_date"),
    (Field::EndDate, "end_date"),
    (Field::Dependencies, "dependencies"),
    (Field::OrganizationLevel, "organization_level"),
    (Field::OrganizationType, "organization_type"),
    (Field::DecisionAuthority, "decision_authority"),
    (Field::ReportTo, "report_to"),
    (Field::Attendees, "attendees"),
    (Field::Location, "location"),
    (Field::Agenda, "agenda"),
    (Field::Frequency, "frequency"),
    (Field::Priority, "priority"),
];

const LOCALIZED_COLUMNS: &[(Field, &str)] = &[
    (Field::Id, "id"),
    (Field::EventName, "イベント名"),
    (Field::StartDate, "開始日"),
    (Field::EndDate, "終了日"),
    (Field::Status, "ステータス"),
    (Field::Category, "種類"),
    (Field::Dependencies, "dependencies"),
];

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Unified => "unified",
            Layout::English => "english",
            Layout::Meeting => "meeting",
            Layout::Localized => "localized",
        }
    }

    /// Headers that must all be present for this layout to be selected.
    pub fn signature(&self) -> &'static [&'static str] {
        match self {
            Layout::Unified => &["event_type"],
            Layout::English => &["name", "start", "end"],
            Layout::Meeting => &["start_date", "end_date"],
            Layout::Localized => &["イベント名"],
        }
    }

    pub fn status_policy(&self) -> StatusPolicy {
        match self {
            Layout::Unified | Layout::English => StatusPolicy::Numeric,
            Layout::Meeting | Layout::Localized => StatusPolicy::Label,
        }
    }

    pub fn default_kind(&self) -> TaskKind {
        match self {
            Layout::Meeting => TaskKind::Meeting,
            _ => TaskKind::Construction,
        }
    }

    pub fn mapping(&self) -> ColumnMapping {
        match self {
            Layout::Unified => ColumnMapping {
                layout: *self,
                columns: UNIFIED_COLUMNS,
                required: &[Field::EventName, Field::StartDate, Field::EndDate],
                recommended: &[],
            },
            Layout::English => ColumnMapping {
                layout: *self,
                columns: ENGLISH_COLUMNS,
                required: &[Field::EventName, Field::StartDate, Field::EndDate],
                recommended: &[Field::Status, Field::Dependencies, Field::Assignee],
            },
            Layout::Meeting => ColumnMapping {
                layout: *self,
                columns: MEETING_COLUMNS,
                required: &[Field::EventName, Field::StartDate],
                recommended: &[
                    Field::EndDate,
                    Field::OrganizationLevel,
                    Field::OrganizationType,
                    Field::Frequency,
                    Field::Priority,
                ],
            },
            Layout::Localized => ColumnMapping {
                layout: *self,
                columns: LOCALIZED_COLUMNS,
                required: &[Field::EventName, Field::StartDate, Field::EndDate],
                recommended: &[Field::Status, Field::Category],
            },
        }
    }

    fn matches(&self, headers: &[String]) -> bool {
        self.signature()
            .iter()
            .all(|sig| headers.iter().any(|h| h == sig))
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub layout: Layout,
    pub columns: &'static [(Field, &'static str)],
    pub required: &'static [Field],
    pub recommended: &'static [Field],
}

impl ColumnMapping {
    pub fn header_for(&self, field: Field) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, header)| *header)
    }

    pub fn is_required(&self, field: Field) -> bool {
        self.required.contains(&field)
    }

    /// Resolves header positions. Fails when a required column is absent.
    pub fn bind(&self, headers: &[String]) -> Result<BoundColumns, SchemaDetectionError> {
        let mut indices = HashMap::new();
        for (field, header) in self.columns {
            if let Some(idx) = headers.iter().position(|h| h == header) {
                indices.insert(*field, idx);
            }
        }
        for field in self.required {
            if !indices.contains_key(field) {
                return Err(SchemaDetectionError::MissingRequiredColumn {
                    layout: self.layout,
                    column: self.header_for(*field).unwrap_or_default().to_string(),
                    headers: headers.to_vec(),
                });
            }
        }
        Ok(BoundColumns {
            mapping: self.clone(),
            indices,
            width: headers.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundColumns {
    mapping: ColumnMapping,
    indices: HashMap<Field, usize>,
    width: usize,
}

impl BoundColumns {
    pub fn layout(&self) -> Layout {
        self.mapping.layout
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn has(&self, field: Field) -> bool {
        self.indices.contains_key(&field)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn missing_recommended(&self) -> Vec<&'static str> {
        self.mapping
            .recommended
            .iter()
            .filter(|field| !self.has(**field))
            .filter_map(|field| self.mapping.header_for(*field))
            .collect()
    }
}

/// Picks the first layout in [`DETECTION_ORDER`] whose signature is present.
pub fn detect_layout(headers: &[String]) -> Result<ColumnMapping, SchemaDetectionError> {
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(SchemaDetectionError::EmptyHeader);
    }
    let layout = DETECTION_ORDER
        .iter()
        .find(|layout| layout.matches(headers))
        .ok_or_else(|| SchemaDetectionError::NoMatchingLayout {
            headers: headers.to_vec(),
        })?;
    let mapping = layout.mapping();
    for field in mapping.required {
        let header = mapping.header_for(*field).unwrap_or_default();
        if !headers.iter().any(|h| h == header) {
            return Err(SchemaDetectionError::MissingRequiredColumn {
                layout: *layout,
                column: header.to_string(),
                headers: headers.to_vec(),
            });
        }
    }
    tracing::debug!(layout = %layout, "column layout detected");
    Ok(mapping)
}

pub fn detect_columns(headers: &[String]) -> Result<BoundColumns, SchemaDetectionError> {
    detect_layout(headers)?.bind(headers)
}
