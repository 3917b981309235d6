//! Focus graph: Areas, Goals, Key Results and their tasks
//!
//! - `types`: graph nodes and the `Graph` container
//! - `builder`: derives a `Graph` from the notes of a vault for one periodic note
//! - `filters`: narrowing and deduplication of a built graph
//! - `view`: the per-period presentation of a graph and focus toggling

mod builder;
mod filters;
mod types;
pub mod view;

pub use builder::{GraphBuilder, GraphError};
pub use filters::{dedupe_goals_across_areas, filter_by_goal, filter_by_key_result};
pub use types::{
    AreaNode, GoalNode, Graph, GraphNode, KeyResultNode, NodeId, PeriodKind, ScheduledTask,
};
