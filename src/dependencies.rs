use crate::error::DependencyResolutionWarning;
use crate::record::ScheduleRow;
use crate::task::{OrganizationType, Task, row_task_id};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyReference {
    /// `from`: the current row depends on `from`.
    Implicit { from: String },
    /// `from:to`: `to` depends on `from`, wherever the token appears.
    Explicit { from: String, to: String },
}

impl DependencyReference {
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        match token.split_once(':') {
            Some((from, to)) => Some(DependencyReference::Explicit {
                from: from.trim().to_string(),
                to: to.trim().to_string(),
            }),
            None => Some(DependencyReference::Implicit {
                from: token.to_string(),
            }),
        }
    }
}

pub fn split_tokens(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn meeting_group_id(organization_type: &OrganizationType) -> String {
    format!("meeting_group_{}", organization_type.as_str())
}

/// Short-code override: any token mentioning GM, BM or RC points at the
/// corresponding meeting group bar, checked in that order.
pub fn meeting_group_for_token(token: &str) -> Option<String> {
    let organization_type = if token.contains("GM") {
        OrganizationType::GeneralMeeting
    } else if token.contains("BM") {
        OrganizationType::BoardMeeting
    } else if token.contains("RC") {
        OrganizationType::RepairCommittee
    } else {
        return None;
    };
    Some(meeting_group_id(&organization_type))
}

/// Source id to task id, for rows that produced a task. Later rows win on duplicates.
pub fn build_id_lookup(tasks: &[Task], rows: &[ScheduleRow]) -> HashMap<String, String> {
    let task_ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let mut lookup = HashMap::new();
    for row in rows {
        let task_id = row_task_id(row.row);
        if !task_ids.contains(task_id.as_str()) {
            continue;
        }
        if let Some(source_id) = &row.source_id {
            lookup.insert(source_id.clone(), task_id);
        }
    }
    lookup
}

struct Resolver<'a> {
    lookup: &'a HashMap<String, String>,
    task_ids: HashSet<String>,
}

impl Resolver<'_> {
    fn resolve(&self, token: &str) -> Option<String> {
        meeting_group_for_token(token).or_else(|| self.lookup.get(token).cloned())
    }

    /// Explicit targets must name a task of this dataset.
    fn resolve_target(&self, token: &str) -> Option<String> {
        self.resolve(token).filter(|id| self.task_ids.contains(id))
    }
}

fn push_unique(deps: &mut Vec<String>, id: String) {
    if !deps.contains(&id) {
        deps.push(id);
    }
}

/// Tasks whose tokens all fail to resolve end up with no dependencies.
pub fn resolve_dependencies(
    tasks: &mut [Task],
    rows: &[ScheduleRow],
    id_column_present: bool,
) -> Vec<DependencyResolutionWarning> {
    let mut warnings = Vec::new();
    if !id_column_present {
        tracing::warn!("no id column; dependency resolution skipped");
        warnings.push(DependencyResolutionWarning::NoIdColumn);
        return warnings;
    }

    let lookup = build_id_lookup(tasks, rows);
    let resolver = Resolver {
        lookup: &lookup,
        task_ids: tasks.iter().map(|t| t.id.clone()).collect(),
    };
    let cells: HashMap<String, &str> = rows
        .iter()
        .filter_map(|row| {
            row.dependencies
                .as_deref()
                .map(|cell| (row_task_id(row.row), cell))
        })
        .collect();

    let mut resolved: Vec<Vec<String>> = vec![Vec::new(); tasks.len()];
    let mut explicit: Vec<(String, String)> = Vec::new();

    for (idx, task) in tasks.iter().enumerate() {
        let Some(cell) = cells.get(&task.id) else {
            continue;
        };
        let tokens = split_tokens(cell);
        let mut unresolved = Vec::new();
        let mut resolved_any = false;
        for token in &tokens {
            match DependencyReference::parse(token) {
                Some(DependencyReference::Implicit { from }) => match resolver.resolve(&from) {
                    Some(id) => {
                        push_unique(&mut resolved[idx], id);
                        resolved_any = true;
                    }
                    None => unresolved.push(token.clone()),
                },
                Some(DependencyReference::Explicit { from, to }) => {
                    match (resolver.resolve(&from), resolver.resolve_target(&to)) {
                        (Some(from_id), Some(to_id)) => {
                            explicit.push((to_id, from_id));
                            resolved_any = true;
                        }
                        _ => unresolved.push(token.clone()),
                    }
                }
                None => {}
            }
        }

        if tokens.is_empty() {
            continue;
        }
        if !resolved_any {
            tracing::warn!(task = %task.id, ?tokens, "no dependency could be resolved");
            resolved[idx].clear();
            warnings.push(DependencyResolutionWarning::Unresolved {
                task_id: task.id.clone(),
                tokens,
            });
        } else if !unresolved.is_empty() {
            tracing::warn!(task = %task.id, ?unresolved, "dropping unresolved dependencies");
            warnings.push(DependencyResolutionWarning::PartiallyResolved {
                task_id: task.id.clone(),
                tokens: unresolved,
            });
        }
    }

    for (task, deps) in tasks.iter_mut().zip(resolved) {
        task.dependencies = deps;
    }
    for (target, dependency) in explicit {
        if let Some(task) = tasks.iter_mut().find(|t| t.id == target) {
            push_unique(&mut task.dependencies, dependency);
        }
    }

    let edges: usize = tasks.iter().map(|t| t.dependencies.len()).sum();
    tracing::info!(edges, warnings = warnings.len(), "dependencies resolved");
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_implicit_and_explicit_tokens() {
        assert_eq!(
            DependencyReference::parse(" T1 "),
            Some(DependencyReference::Implicit { from: "T1".into() })
        );
        assert_eq!(
            DependencyReference::parse("T5:T6"),
            Some(DependencyReference::Explicit {
                from: "T5".into(),
                to: "T6".into()
            })
        );
        assert_eq!(DependencyReference::parse("  "), None);
    }

    #[test]
    fn short_codes_follow_precedence() {
        assert_eq!(
            meeting_group_for_token("GM-legacy-3").as_deref(),
            Some("meeting_group_general_meeting")
        );
        assert_eq!(
            meeting_group_for_token("BM12").as_deref(),
            Some("meeting_group_board_meeting")
        );
        assert_eq!(
            meeting_group_for_token("RC-1").as_deref(),
            Some("meeting_group_repair_committee")
        );
        assert_eq!(
            meeting_group_for_token("GM-BM").as_deref(),
            Some("meeting_group_general_meeting")
        );
        assert_eq!(meeting_group_for_token("T1"), None);
    }

    #[test]
    fn split_tokens_drops_blanks() {
        assert_eq!(split_tokens("T1, ,T2,"), vec!["T1", "T2"]);
    }
}
