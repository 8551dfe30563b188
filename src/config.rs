use crate::error::ConversionResult;
use crate::task::OrganizationType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingGroupNames {
    pub general_meeting: String,
    pub board_meeting: String,
    pub repair_committee: String,
}

impl Default for MeetingGroupNames {
    fn default() -> Self {
        Self {
            general_meeting: "General Meeting".to_string(),
            board_meeting: "Board Meeting (monthly)".to_string(),
            repair_committee: "Repair Committee (monthly)".to_string(),
        }
    }
}

impl MeetingGroupNames {
    /// Unknown types are grouped with board meetings and share its name.
    pub fn name_for(&self, organization_type: &OrganizationType) -> &str {
        match organization_type {
            OrganizationType::GeneralMeeting => &self.general_meeting,
            OrganizationType::RepairCommittee => &self.repair_committee,
            OrganizationType::BoardMeeting | OrganizationType::Other(_) => &self.board_meeting,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Spans longer than this many days get a warning.
    pub long_span_days: i64,
    pub aggregate_meetings: bool,
    pub check_timeline: bool,
    pub group_names: MeetingGroupNames,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            long_span_days: 365,
            aggregate_meetings: true,
            check_timeline: true,
            group_names: MeetingGroupNames::default(),
        }
    }
}

impl ConversionConfig {
    pub fn from_json_str(text: &str) -> ConversionResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> ConversionResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
