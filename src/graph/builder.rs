//! Graph derivation from the notes of a vault
//!
//! Building a graph for an anchor note:
//! 1. classify the anchor as a daily, weekly or monthly note
//! 2. derive the quarter, month and week labels from the start of its period
//! 3. select the Areas, Goals and Key Results focused in those periods
//! 4. attach every node to the parents its link fields name, inheriting the
//!    highest parent order
//! 5. boost Key Results with tasks due by the anchor date
//! 6. propagate orders upward (Key Results to Goals, then Goals to Areas)
//! 7. sort every level by descending order

use super::types::{
    AreaNode, GoalNode, Graph, GraphNode, KeyResultNode, NodeId, PeriodKind, ScheduledTask,
};
use crate::config::VaultConfig;
use crate::focus::{FocusResolver, is_complete};
use crate::tasks::blocks::DUE_MARKER;
use crate::vault::period::{
    month_label, month_start, parse_month, parse_week, quarter_label, week_label, week_start,
};
use crate::vault::{Document, DocumentQuery, FieldValue, TaskRecord};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

/// Order multiplier lifting Key Results with tasks due by the anchor date
/// above every other Key Result of the same parent order
const TODAY_BOOST: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("note {path} does not exist")]
    MissingAnchor { path: String },

    #[error("note {path} is not a daily, weekly or monthly note")]
    NotATimeNote { path: String },
}

/// Builds focus graphs from a document index
pub struct GraphBuilder<'a, Q> {
    query: &'a Q,
    config: &'a VaultConfig,
    focus: FocusResolver,
}

/// Labels of the periods containing the anchor note
struct Periods {
    quarter: String,
    month: String,
    week: String,
}

impl<'a, Q: DocumentQuery> GraphBuilder<'a, Q> {
    pub fn new(query: &'a Q, config: &'a VaultConfig) -> Self {
        Self {
            query,
            config,
            focus: FocusResolver::new(config.focus_field.clone()),
        }
    }

    /// Build the graph for the periodic note at `anchor`
    ///
    /// Returns `None`, after logging why, when the note is missing or is not
    /// a periodic note.
    pub fn build(&self, anchor: &str) -> Option<Graph> {
        match self.try_build(anchor) {
            Ok(graph) => Some(graph),
            Err(e) => {
                warn!(error = %e, "Cannot build focus graph");
                None
            }
        }
    }

    pub fn try_build(&self, anchor: &str) -> Result<Graph, GraphError> {
        let document = self
            .query
            .document(anchor)
            .ok_or_else(|| GraphError::MissingAnchor {
                path: anchor.to_string(),
            })?;
        let (kind, date) = classify(document).ok_or_else(|| GraphError::NotATimeNote {
            path: anchor.to_string(),
        })?;

        let start = match kind {
            PeriodKind::Monthly => month_start(date),
            PeriodKind::Daily | PeriodKind::Weekly => week_start(date),
        };
        let periods = Periods {
            quarter: quarter_label(start),
            month: month_label(start),
            week: week_label(start),
        };
        debug!(
            anchor,
            kind = %kind,
            quarter = %periods.quarter,
            month = %periods.month,
            week = %periods.week,
            "Building focus graph"
        );

        let areas = self.select_areas(&periods);
        let goals = self.select_goals(kind, &periods);
        let key_results = self.select_key_results(kind, &periods, &goals);

        let mut area_nodes: Vec<AreaNode> = areas
            .iter()
            .enumerate()
            .map(|(i, doc)| GraphNode::new(format!("a-{}", i), &doc.name, &doc.path, i as i64))
            .collect();

        let mut goal_nodes: Vec<GoalNode> = Vec::with_capacity(goals.len());
        for (i, doc) in goals.iter().enumerate() {
            let id = format!("g-{}", i);
            let order = attach(doc.field(&self.config.area_field), &mut area_nodes, &id);
            goal_nodes.push(GraphNode::new(id, &doc.name, &doc.path, order));
        }

        let mut key_result_nodes: Vec<KeyResultNode> = Vec::with_capacity(key_results.len());
        for (i, doc) in key_results.iter().enumerate() {
            let id = format!("k-{}", i);
            let parent_order = attach(doc.field(&self.config.goal_field), &mut goal_nodes, &id);

            let tasks: Vec<ScheduledTask> = doc
                .tasks
                .iter()
                .filter(|task| !task.completed)
                .map(|task| self.schedule(task, date))
                .collect();
            let due_today = tasks.iter().any(|task| task.is_today);

            let order = if due_today {
                parent_order * TODAY_BOOST
            } else {
                parent_order
            };
            let mut node = GraphNode::new(id, &doc.name, &doc.path, order);
            node.children = tasks;
            key_result_nodes.push(node);
        }

        propagate(&mut key_result_nodes, &mut goal_nodes);
        propagate(&mut goal_nodes, &mut area_nodes);

        sort_by_order(&mut area_nodes);
        sort_by_order(&mut goal_nodes);
        sort_by_order(&mut key_result_nodes);

        debug!(
            areas = area_nodes.len(),
            goals = goal_nodes.len(),
            key_results = key_result_nodes.len(),
            "Built focus graph"
        );

        Ok(Graph {
            areas: area_nodes,
            goals: goal_nodes,
            key_results: key_result_nodes,
            date,
            period_kind: kind,
        })
    }

    fn select_areas(&self, periods: &Periods) -> Vec<&'a Document> {
        self.query
            .documents(&self.config.areas_folder)
            .into_iter()
            .filter(|doc| self.focus.is_focused(doc, &periods.quarter) && !is_complete(doc))
            .collect()
    }

    /// The monthly view shows every open Goal, the others only those
    /// focused in the month
    fn select_goals(&self, kind: PeriodKind, periods: &Periods) -> Vec<&'a Document> {
        self.query
            .documents(&self.config.goals_folder)
            .into_iter()
            .filter(|doc| !is_complete(doc))
            .filter(|doc| kind == PeriodKind::Monthly || self.focus.is_focused(doc, &periods.month))
            .collect()
    }

    /// Daily views pick Key Results focused in the week, weekly views those
    /// of a selected Goal, monthly views none
    fn select_key_results(
        &self,
        kind: PeriodKind,
        periods: &Periods,
        goals: &[&Document],
    ) -> Vec<&'a Document> {
        let candidates = self
            .query
            .documents(&self.config.key_results_folder)
            .into_iter()
            .filter(|doc| !is_complete(doc));

        match kind {
            PeriodKind::Daily => candidates
                .filter(|doc| self.focus.is_focused(doc, &periods.week))
                .collect(),
            PeriodKind::Weekly => candidates
                .filter(|doc| {
                    doc.field(&self.config.goal_field).is_some_and(|value| {
                        value
                            .links()
                            .iter()
                            .any(|link| goals.iter().any(|goal| goal.path == link.path))
                    })
                })
                .collect(),
            PeriodKind::Monthly => Vec::new(),
        }
    }

    fn schedule(&self, task: &TaskRecord, date: NaiveDate) -> ScheduledTask {
        let scheduled_date = task
            .field(DUE_MARKER)
            .and_then(FieldValue::as_link)
            .and_then(|link| self.query.document(&link.path))
            .and_then(|doc| doc.day);
        ScheduledTask {
            scheduled_date,
            completed: task.completed,
            is_today: scheduled_date.is_some_and(|day| day <= date),
            raw_task: task.clone(),
        }
    }
}

/// Kind and date of a periodic note
///
/// Weekly and monthly notes are dated by the first day of their period.
fn classify(document: &Document) -> Option<(PeriodKind, NaiveDate)> {
    if let Some(day) = document.day {
        return Some((PeriodKind::Daily, day));
    }
    if let Some(monday) = parse_week(&document.name) {
        return Some((PeriodKind::Weekly, monday));
    }
    parse_month(&document.name).map(|first| (PeriodKind::Monthly, first))
}

/// Register `id` as a child of every parent `field` links to
///
/// Returns the highest order among the parents found, 0 when none is.
fn attach(field: Option<&FieldValue>, parents: &mut [GraphNode<NodeId>], id: &str) -> i64 {
    let Some(field) = field else {
        return 0;
    };
    let mut order = 0;
    for link in field.links() {
        if let Some(parent) = parents.iter_mut().find(|p| p.file_path == link.path) {
            if !parent.children.iter().any(|child| child == id) {
                parent.children.push(id.to_string());
            }
            order = order.max(parent.order);
        }
    }
    order
}

/// Share orders between every child and its owners
///
/// A child and all of its owners end at the highest of their orders.
fn propagate<C>(children: &mut [GraphNode<C>], parents: &mut [GraphNode<NodeId>]) {
    for child in children.iter_mut() {
        let mut order = child.order;
        for parent in parents.iter().filter(|p| p.children.contains(&child.id)) {
            order = order.max(parent.order);
        }
        child.order = order;
        for parent in parents
            .iter_mut()
            .filter(|p| p.children.contains(&child.id))
        {
            parent.order = order;
        }
    }
}

/// Stable sort, highest order first
fn sort_by_order<C>(nodes: &mut [GraphNode<C>]) {
    nodes.sort_by(|a, b| b.order.cmp(&a.order));
}
