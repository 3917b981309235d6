//! Text rendering of graphs and tasks for tool responses

use crate::graph::{Graph, GraphNode, KeyResultNode, NodeId, ScheduledTask};
use crate::tasks::{Block, Task};
use crate::vault::period::day_label;
use std::fmt::Write;

/// Render a graph as an indented outline
///
/// Every node shows its order and note path; `focused` decides which nodes
/// are starred. A Goal owned by several Areas is listed in full under its
/// display parent and as a reference under the others.
///
/// # Arguments
/// * `graph` - Graph to render, already narrowed for its period
/// * `focused` - Whether the node backed by a note path is focused
///
/// # Returns
/// A header line followed by one line per node and task
pub fn format_graph(graph: &Graph, focused: impl Fn(&str) -> bool) -> String {
    let mut out = format!(
        "{} focus graph for {}\n",
        capitalize(&graph.period_kind.to_string()),
        graph.period_kind.label(graph.date)
    );
    if graph.is_empty() {
        out.push_str("\nNothing is focused in this period.\n");
        return out;
    }

    for area in &graph.areas {
        write_node(&mut out, 0, area, &focused);
        for goal in graph.goals_of(area) {
            match &goal.display_parent_id {
                Some(parent) if parent != &area.id => {
                    let shown_under = graph
                        .area(parent)
                        .map_or(parent.as_str(), |a| a.name.as_str());
                    let _ = writeln!(out, "  - {} (see {})", goal.name, shown_under);
                }
                _ => write_goal(&mut out, graph, goal, &focused),
            }
        }
    }

    // Goals and Key Results whose parents were not selected
    let orphans: Vec<&GraphNode<NodeId>> = graph
        .goals
        .iter()
        .filter(|g| !graph.areas.iter().any(|a| a.children.contains(&g.id)))
        .collect();
    if !orphans.is_empty() {
        out.push_str("- (no area)\n");
        for goal in orphans {
            write_goal(&mut out, graph, goal, &focused);
        }
    }

    let loose: Vec<&KeyResultNode> = graph
        .key_results
        .iter()
        .filter(|k| !graph.goals.iter().any(|g| g.children.contains(&k.id)))
        .collect();
    if !loose.is_empty() {
        out.push_str("- (no goal)\n");
        for key_result in loose {
            write_key_result(&mut out, 1, key_result, &focused);
        }
    }

    out
}

fn write_goal(
    out: &mut String,
    graph: &Graph,
    goal: &GraphNode<NodeId>,
    focused: &impl Fn(&str) -> bool,
) {
    write_node(out, 1, goal, focused);
    for key_result in graph.key_results_of(goal) {
        write_key_result(out, 2, key_result, focused);
    }
}

fn write_key_result(
    out: &mut String,
    depth: usize,
    key_result: &KeyResultNode,
    focused: &impl Fn(&str) -> bool,
) {
    write_node(out, depth, key_result, focused);
    for task in &key_result.children {
        let _ = writeln!(
            out,
            "{}- {}",
            "  ".repeat(depth + 1),
            format_scheduled_task(task)
        );
    }
}

fn write_node<C>(
    out: &mut String,
    depth: usize,
    node: &GraphNode<C>,
    focused: &impl Fn(&str) -> bool,
) {
    let star = if focused(&node.file_path) { "★ " } else { "" };
    let _ = writeln!(
        out,
        "{}- {}{} (order {}) [{}]",
        "  ".repeat(depth),
        star,
        node.name,
        node.order,
        node.file_path
    );
}

/// One line for a Key Result task: schedule, location and text
pub fn format_scheduled_task(task: &ScheduledTask) -> String {
    let schedule = match (task.scheduled_date, task.is_today) {
        (Some(date), true) => format!("[due {}] ", day_label(date)),
        (Some(date), false) => format!("[{}] ", day_label(date)),
        (None, _) => String::new(),
    };
    format!(
        "{}line {}: {}",
        schedule,
        task.raw_task.line + 1,
        task.raw_task.text.trim()
    )
}

/// Describe a parsed task block by block
pub fn format_task(task: &Task) -> String {
    let mut out = format!("Task: {}\n", task.render());
    for block in task.blocks() {
        let _ = writeln!(out, "- {}", describe_block(block));
    }
    if let Some(origin) = task.origin() {
        let _ = writeln!(out, "Location: {} line {}", origin.path, origin.line + 1);
    }
    out
}

fn describe_block(block: &Block) -> String {
    match block {
        Block::Checkbox { is_checked, indent } => format!(
            "checkbox: {} (indent {})",
            if *is_checked { "done" } else { "open" },
            indent
        ),
        Block::Text { content } => format!("text: {}", content),
        Block::Link {
            target,
            alias: Some(alias),
        } => format!("link: {} ({})", target, alias),
        Block::Link { target, alias: None } => format!("link: {}", target),
        Block::Due(field) => format!("due: {}", day_label(field.date)),
        Block::Completed(field) => format!("completed: {}", day_label(field.date)),
        Block::Recurring(rule) => format!("recurs: {}", rule),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
