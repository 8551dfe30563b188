use crate::error::AggregationWarning;
use crate::task::{Task, default_level_color};
use serde::{Deserialize, Serialize};

/// Level assumed for meetings that do not state one.
pub const DEFAULT_LEVEL: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    ReportsTo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEdge {
    pub from: String,
    pub to: String,
    pub relationship: Relationship,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hierarchy {
    pub level1: Vec<Task>,
    pub level2: Vec<Task>,
    pub level3: Vec<Task>,
    pub edges: Vec<HierarchyEdge>,
}

impl Hierarchy {
    pub fn level(&self, level: u8) -> &[Task] {
        match level {
            1 => &self.level1,
            2 => &self.level2,
            3 => &self.level3,
            _ => &[],
        }
    }

    pub fn meeting_count(&self) -> usize {
        self.level1.len() + self.level2.len() + self.level3.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meeting_count() == 0
    }
}

/// `report_to` may name the parent by task id or by its source id.
fn reports_to(child: &Task, parent: &Task) -> bool {
    match child.report_to() {
        Some(target) => target == parent.id || parent.source_id.as_deref() == Some(target),
        None => false,
    }
}

fn connect(parents: &[Task], children: &[Task], edges: &mut Vec<HierarchyEdge>) {
    for parent in parents {
        for child in children.iter().filter(|child| reports_to(child, parent)) {
            edges.push(HierarchyEdge {
                from: parent.id.clone(),
                to: child.id.clone(),
                relationship: Relationship::ReportsTo,
            });
        }
    }
}

/// Non-meeting tasks are ignored. Meetings outside levels 1-3 are left out
/// with a warning.
pub fn structure_meetings(tasks: &[Task]) -> (Hierarchy, Vec<AggregationWarning>) {
    let mut hierarchy = Hierarchy::default();
    let mut warnings = Vec::new();

    for task in tasks.iter().filter(|t| t.kind.is_meeting()) {
        let level = task.organization_level().unwrap_or(DEFAULT_LEVEL);
        let mut meeting = task.clone();
        let attributes = meeting.meeting.get_or_insert_with(Default::default);
        attributes.organization_level = Some(level);
        if meeting.timeline_color.is_none() {
            meeting.timeline_color = Some(default_level_color(level).to_string());
        }
        match level {
            1 => hierarchy.level1.push(meeting),
            2 => hierarchy.level2.push(meeting),
            3 => hierarchy.level3.push(meeting),
            _ => {
                tracing::warn!(task = %task.id, level, "organization level outside 1..=3");
                warnings.push(AggregationWarning::UnknownOrganizationLevel {
                    task_id: task.id.clone(),
                    level,
                });
            }
        }
    }

    connect(&hierarchy.level1, &hierarchy.level2, &mut hierarchy.edges);
    connect(&hierarchy.level2, &hierarchy.level3, &mut hierarchy.edges);

    tracing::info!(
        level1 = hierarchy.level1.len(),
        level2 = hierarchy.level2.len(),
        level3 = hierarchy.level3.len(),
        edges = hierarchy.edges.len(),
        "meeting hierarchy structured"
    );
    (hierarchy, warnings)
}
