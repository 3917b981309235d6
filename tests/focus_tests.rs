//! Period focus of notes and focus toggling from graphs

mod common;

use common::*;
use focus_mcp::graph::view::{focus_view, is_node_focused, toggle_node_focus};
use focus_mcp::{DocumentQuery, FocusResolver, GraphBuilder, VaultConfig};

fn resolver() -> FocusResolver {
    FocusResolver::new("Focused In")
}

#[tokio::test]
async fn test_toggle_focus_on_disk() {
    let vault = TestVault::sample();
    let store = vault.store();
    let note = goal("Get promoted");

    resolver()
        .toggle_focus(&store, &note, false, "2024-03")
        .await
        .unwrap();
    assert_eq!(
        vault.read(&note),
        "Area:: [[Career]]\nFocused In:: [[2024-02]], [[2024-03]]"
    );
    let index = vault.index();
    assert!(resolver().is_focused(index.document(&note).unwrap(), "2024-03"));

    resolver()
        .toggle_focus(&store, &note, true, "2024-02")
        .await
        .unwrap();
    assert_eq!(
        vault.read(&note),
        "Area:: [[Career]]\nFocused In:: [[2024-03]]"
    );
}

#[tokio::test]
async fn test_toggle_focus_adds_missing_field() {
    let vault = TestVault::new(&[(goal("Read more"), "Area:: [[Health]]\n")]);
    let store = vault.store();

    resolver()
        .toggle_focus(&store, &goal("Read more"), false, "2024-W9")
        .await
        .unwrap();
    assert_eq!(
        vault.read(&goal("Read more")),
        "Area:: [[Health]]\nFocused In:: [[2024-W9]]\n"
    );
}

#[test]
fn test_weekly_only_focused_view() {
    let vault = TestVault::sample();
    vault.write(
        &key_result("Ship feature"),
        "Goal:: [[Get promoted]]\nFocused In:: [[2024-W8]]\n- [ ] write design doc",
    );
    let index = vault.index();
    let config = VaultConfig::default();
    let graph = GraphBuilder::new(&index, &config)
        .build("Journal/2024-W9.md")
        .unwrap();
    let focus = resolver();

    assert!(!is_node_focused(&graph, &index, &focus, &key_result("Ship feature")));
    assert!(is_node_focused(&graph, &index, &focus, &key_result("Leave at six")));

    let view = focus_view(graph, &index, &focus, true);
    let names: Vec<&str> = view.key_results.iter().map(|k| k.name.as_str()).collect();
    assert_eq!(names, ["Leave at six", "Run 30k per week"]);
    assert!(!view.goals.iter().any(|g| g.name == "Get promoted"));
}

#[tokio::test]
async fn test_monthly_node_focus_round_trip() {
    let vault = TestVault::sample();
    let store = vault.store();
    let config = VaultConfig::default();
    let focus = resolver();
    let note = goal("Run a marathon");

    let index = vault.index();
    let graph = GraphBuilder::new(&index, &config)
        .build("Journal/2024-02.md")
        .unwrap();
    assert!(is_node_focused(&graph, &index, &focus, &note));

    let focused = toggle_node_focus(&graph, &index, &store, &focus, &note)
        .await
        .unwrap();
    assert!(!focused);
    assert_eq!(
        vault.read(&note),
        "Area:: [[Health]]\nFocused In:: [[2024-03]]"
    );

    // The index is a snapshot: rebuild it to observe the edit
    let index = vault.index();
    let graph = GraphBuilder::new(&index, &config)
        .build("Journal/2024-02.md")
        .unwrap();
    assert!(!is_node_focused(&graph, &index, &focus, &note));
    let focused = toggle_node_focus(&graph, &index, &store, &focus, &note)
        .await
        .unwrap();
    assert!(focused);
    assert_eq!(
        vault.read(&note),
        "Area:: [[Health]]\nFocused In:: [[2024-03]], [[2024-02]]"
    );
}

#[tokio::test]
async fn test_daily_node_focus_schedules_next_task() {
    let vault = TestVault::sample();
    let store = vault.store();
    let config = VaultConfig::default();
    let focus = resolver();
    let note = key_result("Ship feature");

    let index = vault.index();
    let graph = GraphBuilder::new(&index, &config)
        .build("Journal/2024-03-01.md")
        .unwrap();
    assert!(!is_node_focused(&graph, &index, &focus, &note));

    let focused = toggle_node_focus(&graph, &index, &store, &focus, &note)
        .await
        .unwrap();
    assert!(focused);
    assert_eq!(
        vault.read(&note).lines().nth(2),
        Some("- [ ] write design doc [🗓:: [[2024-03-01]]]")
    );

    let index = vault.index();
    let graph = GraphBuilder::new(&index, &config)
        .build("Journal/2024-03-01.md")
        .unwrap();
    assert!(is_node_focused(&graph, &index, &focus, &note));
    let focused = toggle_node_focus(&graph, &index, &store, &focus, &note)
        .await
        .unwrap();
    assert!(!focused);
    assert_eq!(
        vault.read(&note).lines().nth(2),
        Some("- [ ] write design doc")
    );
}
