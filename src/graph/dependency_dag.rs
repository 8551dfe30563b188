use crate::error::TimelineWarning;
use crate::task::Task;
use chrono::NaiveDate;
use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

pub struct DependencyDag {
    pub graph: DiGraph<String, ()>,
    pub id_to_index: HashMap<String, NodeIndex>,
    pub spans: HashMap<String, (NaiveDate, NaiveDate)>,
    /// (task id, dependency id) pairs whose dependency is not in the set.
    pub missing: Vec<(String, String)>,
}

impl DependencyDag {
    pub fn build(tasks: &[Task]) -> Self {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::new();
        let mut spans = HashMap::new();
        let mut missing = Vec::new();

        // Add nodes first
        for task in tasks {
            if id_to_index.contains_key(&task.id) {
                continue;
            }
            let node_ix = graph.add_node(task.id.clone());
            id_to_index.insert(task.id.clone(), node_ix);
            spans.insert(task.id.clone(), (task.start, task.end));
        }

        for task in tasks {
            let Some(&v) = id_to_index.get(&task.id) else {
                continue;
            };
            for dep in &task.dependencies {
                match id_to_index.get(dep) {
                    Some(&u) => {
                        if graph.find_edge(u, v).is_none() {
                            graph.add_edge(u, v, ());
                        }
                    }
                    None => missing.push((task.id.clone(), dep.clone())),
                }
            }
        }

        Self {
            graph,
            id_to_index,
            spans,
            missing,
        }
    }

    /// Ids in dependency order, or `None` when the graph has a cycle.
    pub fn topological_order(&self) -> Option<Vec<String>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(|ix| self.graph[ix].clone()).collect())
    }

    /// One representative id per dependency cycle, sorted.
    pub fn cycles(&self) -> Vec<String> {
        if toposort(&self.graph, None).is_ok() {
            return Vec::new();
        }
        let mut reps: Vec<String> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || self.graph.find_edge(scc[0], scc[0]).is_some()
            })
            .filter_map(|scc| scc.iter().map(|ix| self.graph[*ix].clone()).min())
            .collect();
        reps.sort();
        reps
    }

    pub fn dependents(&self, id: &str) -> Vec<&str> {
        let Some(&ix) = self.id_to_index.get(id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(ix, Direction::Outgoing)
            .map(|succ| self.graph[succ].as_str())
            .collect()
    }

    /// Edges whose dependency ends after the dependent starts.
    pub fn conflicts(&self) -> Vec<TimelineWarning> {
        let mut out = Vec::new();
        for edge in self.graph.raw_edges() {
            let from = &self.graph[edge.source()];
            let to = &self.graph[edge.target()];
            let (Some((_, from_end)), Some((to_start, _))) =
                (self.spans.get(from), self.spans.get(to))
            else {
                continue;
            };
            if from_end > to_start {
                out.push(TimelineWarning::Conflict {
                    from: from.clone(),
                    to: to.clone(),
                    days: (*from_end - *to_start).num_days(),
                });
            }
        }
        out
    }
}

pub fn check_dependency_timeline(tasks: &[Task]) -> Vec<TimelineWarning> {
    let dag = DependencyDag::build(tasks);
    let mut warnings: Vec<TimelineWarning> = dag
        .missing
        .iter()
        .map(|(task_id, dependency)| TimelineWarning::MissingReference {
            task_id: task_id.clone(),
            dependency: dependency.clone(),
        })
        .collect();
    warnings.extend(dag.conflicts());
    warnings.extend(
        dag.cycles()
            .into_iter()
            .map(|task_id| TimelineWarning::Cycle { task_id }),
    );
    for warning in &warnings {
        tracing::warn!(%warning, "dependency timeline");
    }
    tracing::info!(
        nodes = dag.graph.node_count(),
        edges = dag.graph.edge_count(),
        warnings = warnings.len(),
        "dependency timeline checked"
    );
    warnings
}
