use crate::vault::TaskRecord;
use crate::vault::period::{day_label, month_label, week_label};
use chrono::NaiveDate;
use std::fmt;

/// Identifier of a node within one graph (`a-0`, `g-3`, `k-1`)
pub type NodeId = String;

/// Time span of the periodic note a graph is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodKind {
    /// Name of the periodic note of this kind containing `date`
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            PeriodKind::Daily => day_label(date),
            PeriodKind::Weekly => week_label(date),
            PeriodKind::Monthly => month_label(date),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PeriodKind::Daily => "daily",
            PeriodKind::Weekly => "weekly",
            PeriodKind::Monthly => "monthly",
        })
    }
}

/// One Area, Goal or Key Result
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode<C> {
    pub id: NodeId,
    pub name: String,
    pub file_path: String,
    /// Sort priority, higher first
    pub order: i64,
    pub children: Vec<C>,
    /// Owner under which a node shared by several parents is shown in full
    pub display_parent_id: Option<NodeId>,
}

impl<C> GraphNode<C> {
    pub fn new(id: NodeId, name: &str, file_path: &str, order: i64) -> Self {
        Self {
            id,
            name: name.to_string(),
            file_path: file_path.to_string(),
            order,
            children: Vec::new(),
            display_parent_id: None,
        }
    }
}

/// An incomplete task of a Key Result
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    /// Day of the note the task's due field links to
    pub scheduled_date: Option<NaiveDate>,
    pub completed: bool,
    /// Scheduled on or before the graph's date
    pub is_today: bool,
    pub raw_task: TaskRecord,
}

/// Children are the ids of Goal nodes
pub type AreaNode = GraphNode<NodeId>;
/// Children are the ids of Key Result nodes
pub type GoalNode = GraphNode<NodeId>;
pub type KeyResultNode = GraphNode<ScheduledTask>;

/// The focus graph of one periodic note
///
/// Nodes live in flat collections sorted by descending `order`; parents
/// refer to their children by id, so a Goal owned by several Areas is a
/// single node.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub areas: Vec<AreaNode>,
    pub goals: Vec<GoalNode>,
    pub key_results: Vec<KeyResultNode>,
    /// Start of the period of the anchor note
    pub date: NaiveDate,
    pub period_kind: PeriodKind,
}

impl Graph {
    pub fn area(&self, id: &str) -> Option<&AreaNode> {
        self.areas.iter().find(|n| n.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&GoalNode> {
        self.goals.iter().find(|n| n.id == id)
    }

    pub fn key_result(&self, id: &str) -> Option<&KeyResultNode> {
        self.key_results.iter().find(|n| n.id == id)
    }

    /// Goals owned by `area`, in graph order
    pub fn goals_of<'a>(&'a self, area: &'a AreaNode) -> impl Iterator<Item = &'a GoalNode> {
        self.goals.iter().filter(|g| area.children.contains(&g.id))
    }

    /// Key Results owned by `goal`, in graph order
    pub fn key_results_of<'a>(
        &'a self,
        goal: &'a GoalNode,
    ) -> impl Iterator<Item = &'a KeyResultNode> {
        self.key_results
            .iter()
            .filter(|k| goal.children.contains(&k.id))
    }

    /// Id of the node backed by the note at `path`
    pub fn node_id_by_path(&self, path: &str) -> Option<&str> {
        let areas = self.areas.iter().map(|n| (&n.id, &n.file_path));
        let goals = self.goals.iter().map(|n| (&n.id, &n.file_path));
        let key_results = self.key_results.iter().map(|n| (&n.id, &n.file_path));
        areas
            .chain(goals)
            .chain(key_results)
            .find(|(_, file_path)| file_path.as_str() == path)
            .map(|(id, _)| id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty() && self.goals.is_empty() && self.key_results.is_empty()
    }
}
