use super::types::{GoalNode, Graph, GraphNode, KeyResultNode, NodeId};
use std::collections::HashSet;

/// Keep the Key Results matching `predicate` and the ancestors leading to them
///
/// Goals and Areas without a surviving child are dropped, and the children
/// of the remaining ones are narrowed to the survivors.
pub fn filter_by_key_result(graph: &Graph, predicate: impl Fn(&KeyResultNode) -> bool) -> Graph {
    let key_results: Vec<KeyResultNode> = graph
        .key_results
        .iter()
        .filter(|k| predicate(*k))
        .cloned()
        .collect();
    let kept: HashSet<&NodeId> = key_results.iter().map(|k| &k.id).collect();

    let goals: Vec<GoalNode> = graph
        .goals
        .iter()
        .filter_map(|goal| narrowed(goal, &kept))
        .collect();
    let kept: HashSet<&NodeId> = goals.iter().map(|g| &g.id).collect();

    let areas = graph
        .areas
        .iter()
        .filter_map(|area| narrowed(area, &kept))
        .collect();

    Graph {
        areas,
        goals,
        key_results,
        date: graph.date,
        period_kind: graph.period_kind,
    }
}

/// Keep the Goals matching `predicate` with all their Key Results
///
/// Areas owning at least one surviving Goal are kept with their children
/// untouched, so they may still list Goals that were filtered out.
pub fn filter_by_goal(graph: &Graph, predicate: impl Fn(&GoalNode) -> bool) -> Graph {
    let goals: Vec<GoalNode> = graph
        .goals
        .iter()
        .filter(|g| predicate(*g))
        .cloned()
        .collect();

    let areas = graph
        .areas
        .iter()
        .filter(|area| goals.iter().any(|g| area.children.contains(&g.id)))
        .cloned()
        .collect();
    let key_results = graph
        .key_results
        .iter()
        .filter(|k| goals.iter().any(|g| g.children.contains(&k.id)))
        .cloned()
        .collect();

    Graph {
        areas,
        goals,
        key_results,
        date: graph.date,
        period_kind: graph.period_kind,
    }
}

/// Give every Goal owned by several Areas a single display parent
///
/// The first Area, in graph order, listing a Goal becomes its
/// `display_parent_id`. Every owning Area keeps the Goal among its children.
pub fn dedupe_goals_across_areas(mut graph: Graph) -> Graph {
    let mut seen: HashSet<NodeId> = HashSet::new();
    for area in &graph.areas {
        for goal_id in &area.children {
            if !seen.insert(goal_id.clone()) {
                continue;
            }
            if let Some(goal) = graph.goals.iter_mut().find(|g| &g.id == goal_id) {
                goal.display_parent_id = Some(area.id.clone());
            }
        }
    }
    graph
}

/// Copy of `node` with children limited to `kept`, `None` if none remain
fn narrowed(node: &GraphNode<NodeId>, kept: &HashSet<&NodeId>) -> Option<GraphNode<NodeId>> {
    let children: Vec<NodeId> = node
        .children
        .iter()
        .filter(|id| kept.contains(id))
        .cloned()
        .collect();
    if children.is_empty() {
        return None;
    }
    Some(GraphNode {
        children,
        ..node.clone()
    })
}
