//! Task toggling and rescheduling on notes stored on disk

mod common;

use chrono::NaiveDate;
use common::*;
use focus_mcp::DocumentQuery;
use focus_mcp::tasks::edit::{reschedule, toggle_line};
use focus_mcp::tasks::ToggleContext;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ctx(today: NaiveDate) -> ToggleContext<'static> {
    ToggleContext {
        today,
        log_path: RECURRING_LOG,
    }
}

#[tokio::test]
async fn test_toggle_plain_task_round_trip() {
    let vault = TestVault::new(&[("Inbox.md".to_string(), "# Inbox\n- [ ] buy milk\n")]);
    let store = vault.store();

    let task = toggle_line(&store, "Inbox.md", 1, None, &ctx(date(2024, 3, 1)))
        .await
        .unwrap();
    assert!(task.is_checked());
    assert_eq!(
        vault.read("Inbox.md"),
        "# Inbox\n- [x] buy milk [✅:: [[2024-03-01]]]\n"
    );

    toggle_line(&store, "Inbox.md", 1, None, &ctx(date(2024, 3, 2)))
        .await
        .unwrap();
    assert_eq!(vault.read("Inbox.md"), "# Inbox\n- [ ] buy milk\n");
}

#[tokio::test]
async fn test_recurring_task_logs_to_shared_log() {
    let vault = TestVault::sample();
    let store = vault.store();
    let note = key_result("Leave at six");

    // Lenient rule: the next occurrence counts from the toggle date
    let next = toggle_line(&store, &note, 2, None, &ctx(date(2024, 3, 1)))
        .await
        .unwrap();
    assert_eq!(
        next.render(),
        "- [ ] leave on time [🗓:: [[2024-03-02]]] [🔁:: every day]"
    );
    assert_eq!(
        vault.read(&note).lines().nth(2),
        Some("- [ ] leave on time [🗓:: [[2024-03-02]]] [🔁:: every day]")
    );
    assert_eq!(
        vault.read(RECURRING_LOG),
        "- [x] leave on time [🗓:: [[2024-02-28]]] [🔁:: every day] [✅:: [[2024-03-01]]]"
    );
}

#[tokio::test]
async fn test_recurring_task_logs_in_place() {
    let vault = TestVault::new(&[(
        "Plants.md".to_string(),
        "# Plants\n- [ ] water [🗓:: [[2024-01-10]]] [🔁:: every 3 days!@]\n- [ ] repot",
    )]);
    let store = vault.store();

    let next = toggle_line(&store, "Plants.md", 1, None, &ctx(date(2024, 1, 20)))
        .await
        .unwrap();
    // Strict rule: counted from the due date, not from the toggle date
    assert_eq!(next.due().map(|d| d.date), Some(date(2024, 1, 13)));
    assert_eq!(
        vault.read("Plants.md"),
        "# Plants\n\
         - [ ] water [🗓:: [[2024-01-13]]] [🔁:: every 3 days!@]\n\
         - [x] water [🗓:: [[2024-01-10]]] [🔁:: every 3 days!@] [✅:: [[2024-01-20]]]\n\
         - [ ] repot"
    );
    assert!(!vault.path().join(RECURRING_LOG).exists());
}

#[tokio::test]
async fn test_recurring_task_without_due_is_unchanged() {
    let original = "- [ ] stretch [🔁:: every day!]";
    let vault = TestVault::new(&[("Habits.md".to_string(), original)]);
    let store = vault.store();

    let task = toggle_line(&store, "Habits.md", 0, None, &ctx(date(2024, 3, 1)))
        .await
        .unwrap();
    assert!(!task.is_checked());
    assert_eq!(vault.read("Habits.md"), original);
}

#[tokio::test]
async fn test_toggle_rejects_non_task_lines() {
    let vault = TestVault::sample();
    let store = vault.store();
    let note = key_result("Ship feature");

    assert!(
        toggle_line(&store, &note, 0, None, &ctx(date(2024, 3, 1)))
            .await
            .is_err()
    );
    assert!(
        toggle_line(&store, &note, 42, None, &ctx(date(2024, 3, 1)))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_reschedule_uses_indexed_record() {
    let vault = TestVault::sample();
    let store = vault.store();
    let note = key_result("Run 30k per week");
    let index = vault.index();
    let record = index
        .document(&note)
        .and_then(|doc| doc.tasks.iter().find(|t| t.line == 4))
        .cloned()
        .unwrap();

    let task = reschedule(&store, &note, 4, Some(&record), Some(date(2024, 3, 2)))
        .await
        .unwrap();
    assert_eq!(task.render(), "- [ ] intervals [🗓:: [[2024-03-02]]]");

    reschedule(&store, &note, 3, None, None).await.unwrap();
    assert_eq!(vault.read(&note).lines().nth(3), Some("- [ ] long run"));
}

#[tokio::test]
async fn test_toggle_keeps_crlf_line_endings() {
    let vault = TestVault::new(&[(
        "Plants.md".to_string(),
        "# Plants\r\n- [ ] water [🗓:: [[2024-01-10]]] [🔁:: every 3 days!@]\r\n- [ ] repot\r\n",
    )]);
    let store = vault.store();

    toggle_line(&store, "Plants.md", 1, None, &ctx(date(2024, 1, 20)))
        .await
        .unwrap();
    assert_eq!(
        vault.read("Plants.md"),
        "# Plants\r\n\
         - [ ] water [🗓:: [[2024-01-13]]] [🔁:: every 3 days!@]\r\n\
         - [x] water [🗓:: [[2024-01-10]]] [🔁:: every 3 days!@] [✅:: [[2024-01-20]]]\r\n\
         - [ ] repot\r\n"
    );

    toggle_line(&store, "Plants.md", 4, None, &ctx(date(2024, 1, 20)))
        .await
        .unwrap_err();
    toggle_line(&store, "Plants.md", 3, None, &ctx(date(2024, 1, 20)))
        .await
        .unwrap();
    assert!(vault.read("Plants.md").ends_with("- [x] repot [✅:: [[2024-01-20]]]\r\n"));
}
