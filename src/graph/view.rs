//! Per-period presentation of a focus graph
//!
//! - daily: "focused" Key Results are those with a task due by the graph's
//!   date; focusing one schedules its next open task for that date
//! - weekly: Goals are deduplicated across Areas; "focused" Key Results are
//!   those whose note is focused in the week
//! - monthly: Goals are deduplicated across Areas; "focused" Goals are those
//!   whose note is focused in the month

use super::filters::{dedupe_goals_across_areas, filter_by_goal, filter_by_key_result};
use super::types::{Graph, KeyResultNode, PeriodKind};
use crate::focus::FocusResolver;
use crate::storage::DocumentStore;
use crate::tasks::edit::reschedule;
use crate::vault::DocumentQuery;
use anyhow::{Result, bail};
use tracing::debug;

/// Prepare a built graph for display
///
/// With `only_focused`, the graph is narrowed to its focused nodes.
pub fn focus_view<Q: DocumentQuery>(
    graph: Graph,
    query: &Q,
    focus: &FocusResolver,
    only_focused: bool,
) -> Graph {
    match graph.period_kind {
        PeriodKind::Daily if only_focused => filter_by_key_result(&graph, has_today_task),
        PeriodKind::Daily => graph,
        PeriodKind::Weekly => {
            let graph = dedupe_goals_across_areas(graph);
            if !only_focused {
                return graph;
            }
            let label = graph.period_kind.label(graph.date);
            filter_by_key_result(&graph, |k| is_note_focused(query, focus, &k.file_path, &label))
        }
        PeriodKind::Monthly => {
            let graph = dedupe_goals_across_areas(graph);
            if !only_focused {
                return graph;
            }
            let label = graph.period_kind.label(graph.date);
            filter_by_goal(&graph, |g| is_note_focused(query, focus, &g.file_path, &label))
        }
    }
}

/// Whether the node backed by the note at `path` is focused in the graph's period
pub fn is_node_focused<Q: DocumentQuery>(
    graph: &Graph,
    query: &Q,
    focus: &FocusResolver,
    path: &str,
) -> bool {
    match graph.period_kind {
        PeriodKind::Daily => graph
            .key_results
            .iter()
            .find(|k| k.file_path == path)
            .is_some_and(has_today_task),
        PeriodKind::Weekly | PeriodKind::Monthly => {
            let label = graph.period_kind.label(graph.date);
            is_note_focused(query, focus, path, &label)
        }
    }
}

/// Focus or unfocus the node backed by the note at `path`
///
/// In daily graphs this reschedules a task of the Key Result: its task due
/// today loses its due date, or else its first open task not yet due is
/// scheduled for the graph's date. In weekly and monthly graphs the note's
/// focus field gains or loses the period. Returns the new focus state.
pub async fn toggle_node_focus<Q: DocumentQuery, S: DocumentStore>(
    graph: &Graph,
    query: &Q,
    store: &S,
    focus: &FocusResolver,
    path: &str,
) -> Result<bool> {
    if graph.node_id_by_path(path).is_none() {
        bail!("{} is not part of the {} graph", path, graph.period_kind);
    }

    match graph.period_kind {
        PeriodKind::Daily => {
            let Some(key_result) = graph.key_results.iter().find(|k| k.file_path == path) else {
                bail!("Only key results can be focused in a daily graph");
            };

            if let Some(today) = key_result.children.iter().find(|t| t.is_today) {
                let raw = &today.raw_task;
                reschedule(store, &raw.path, raw.line, Some(raw), None).await?;
                debug!(path, line = raw.line, "Unscheduled task");
                return Ok(false);
            }

            let Some(next) = key_result
                .children
                .iter()
                .find(|t| !t.completed && !t.is_today)
            else {
                bail!("{} has no open task to schedule", key_result.name);
            };
            let raw = &next.raw_task;
            reschedule(store, &raw.path, raw.line, Some(raw), Some(graph.date)).await?;
            debug!(path, line = raw.line, date = %graph.date, "Scheduled task");
            Ok(true)
        }
        PeriodKind::Weekly | PeriodKind::Monthly => {
            let label = graph.period_kind.label(graph.date);
            let focused = is_note_focused(query, focus, path, &label);
            focus.toggle_focus(store, path, focused, &label).await?;
            Ok(!focused)
        }
    }
}

fn has_today_task(key_result: &KeyResultNode) -> bool {
    key_result.children.iter().any(|task| task.is_today)
}

fn is_note_focused<Q: DocumentQuery>(
    query: &Q,
    focus: &FocusResolver,
    path: &str,
    label: &str,
) -> bool {
    query
        .document(path)
        .is_some_and(|doc| focus.is_focused(doc, label))
}
