use crate::config::MeetingGroupNames;
use crate::dependencies::meeting_group_id;
use crate::error::AggregationWarning;
use crate::task::{MeetingAttributes, OrganizationType, Task, TaskKind, default_level_color};
use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingGroup {
    pub task: Task,
    pub organization_type: OrganizationType,
    pub members: Vec<Task>,
}

impl MeetingGroup {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn level(&self) -> Option<u8> {
        self.organization_type.level()
    }

    pub fn meeting_count(&self) -> usize {
        self.members.len()
    }
}

fn bucket_for(task: &Task, warnings: &mut Vec<AggregationWarning>) -> OrganizationType {
    match task.organization_type() {
        None => OrganizationType::BoardMeeting,
        Some(OrganizationType::Other(raw)) => {
            tracing::warn!(task = %task.id, value = %raw, "unknown organization type, grouped with board meetings");
            warnings.push(AggregationWarning::UnknownOrganizationType {
                task_id: task.id.clone(),
                value: raw.clone(),
            });
            OrganizationType::BoardMeeting
        }
        Some(known) => known.clone(),
    }
}

fn group_task(organization_type: &OrganizationType, name: &str, members: &[Task]) -> Option<Task> {
    let start = members.iter().map(|m| m.start).min()?;
    let mut end = members.iter().map(|m| m.start).max()?;
    if end == start {
        end = start + Duration::days(1);
    }
    let level = organization_type.level();
    let mut task = Task::new(
        meeting_group_id(organization_type),
        name,
        start,
        end,
        TaskKind::MeetingGroup,
    );
    task.timeline_color = level.map(|l| default_level_color(l).to_string());
    task.meeting = Some(MeetingAttributes {
        organization_level: level,
        organization_type: Some(organization_type.clone()),
        ..MeetingAttributes::default()
    });
    Some(task)
}

/// Buckets meeting tasks by organization type and emits one group per
/// non-empty bucket, in level order.
pub fn aggregate_meetings(
    tasks: &[Task],
    names: &MeetingGroupNames,
) -> (Vec<MeetingGroup>, Vec<AggregationWarning>) {
    let mut warnings = Vec::new();
    let mut buckets: [Vec<Task>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    for task in tasks.iter().filter(|t| t.kind == TaskKind::Meeting) {
        let organization_type = bucket_for(task, &mut warnings);
        let slot = match organization_type {
            OrganizationType::GeneralMeeting => 0,
            OrganizationType::RepairCommittee => 2,
            _ => 1,
        };
        buckets[slot].push(task.clone());
    }

    let groups: Vec<MeetingGroup> = OrganizationType::KNOWN
        .iter()
        .zip(buckets)
        .filter_map(|(organization_type, members)| {
            let task = group_task(organization_type, names.name_for(organization_type), &members)?;
            tracing::debug!(
                group = %task.id,
                meetings = members.len(),
                start = %task.start,
                end = %task.end,
                "meeting group built"
            );
            Some(MeetingGroup {
                task,
                organization_type: organization_type.clone(),
                members,
            })
        })
        .collect();

    tracing::info!(groups = groups.len(), warnings = warnings.len(), "meetings aggregated");
    (groups, warnings)
}
