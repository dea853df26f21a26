// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use spendlog::coordinator::EventStream;
use spendlog::{Coordinator, Expense, ExpenseEvent, ExpenseState, SqliteStore, StoreFault};

fn setup() -> (Arc<SqliteStore>, Coordinator, EventStream) {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (coordinator, events) = Coordinator::new(store.clone());
    (store, coordinator, events)
}

fn now() -> i64 {
    Local::now().timestamp_millis()
}

fn drain(events: &mut EventStream) -> Vec<ExpenseEvent> {
    let mut out = Vec::new();
    while let Ok(ev) = events.try_recv() {
        out.push(ev);
    }
    out
}

async fn wait_until(c: &Coordinator, pred: impl Fn(&ExpenseState) -> bool) {
    let mut rx = c.watch_state();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if pred(&rx.borrow_and_update()) {
                break;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("state never reached the expected shape");
}

#[tokio::test]
async fn add_signals_saved_and_round_trips() {
    let (_store, c, mut events) = setup();
    let draft = Expense::draft("Coffee", 50.0, "Food", now())
        .with_notes(Some("oat milk".into()))
        .with_receipt(Some("content://media/42".into()));

    let id = c.add_expense(draft.clone()).await.unwrap();
    assert_eq!(drain(&mut events), vec![ExpenseEvent::Saved]);

    let stored = c.engine().observe_by_id(id).next().await.unwrap().unwrap();
    assert_eq!(stored, Some(draft.with_id(id)));

    c.settled().await;
    let state = c.state();
    assert_eq!(state.expenses.len(), 1);
    assert_eq!(state.total_amount, 50.0);
    assert_eq!(state.today_total, 50.0);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn deleting_unknown_id_reports_failure_and_keeps_list() {
    let (_store, c, mut events) = setup();
    c.add_expense(Expense::draft("Bus", 20.0, "Travel", now()))
        .await
        .unwrap();
    drain(&mut events);
    let before = c.engine().observe_all().current().unwrap();

    let ok = c
        .delete_expense(Expense::draft("", 0.0, "", 0).with_id(9999))
        .await;
    assert!(!ok);
    let evs = drain(&mut events);
    assert_eq!(evs.len(), 1);
    match &evs[0] {
        ExpenseEvent::Message(text) => {
            assert!(text.starts_with("Delete failed: "));
            assert!(text.contains("9999"));
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(c.engine().observe_all().current().unwrap(), before);
}

#[tokio::test]
async fn update_faults_become_messages_too() {
    let (_store, c, mut events) = setup();
    let ok = c
        .update_expense(Expense::draft("Ghost", 1.0, "Other", now()).with_id(77))
        .await;
    assert!(!ok);
    assert_eq!(
        drain(&mut events),
        vec![ExpenseEvent::Message(format!(
            "Update failed: {}",
            StoreFault::NotFound(77)
        ))]
    );
}

#[tokio::test]
async fn update_and_delete_flow_back_into_state() {
    let (_store, c, mut events) = setup();
    let id = c
        .add_expense(Expense::draft("Taxi", 300.0, "Travel", now()))
        .await
        .unwrap();
    let mut edited = c
        .engine()
        .observe_by_id(id)
        .current()
        .unwrap()
        .unwrap();
    edited.amount = 250.0;
    assert!(c.update_expense(edited).await);
    wait_until(&c, |s| s.total_amount == 250.0).await;

    let current = c.state().expenses[0].clone();
    assert!(c.delete_expense(current).await);
    wait_until(&c, |s| s.expenses.is_empty() && s.total_amount == 0.0).await;

    assert_eq!(
        drain(&mut events),
        vec![
            ExpenseEvent::Saved,
            ExpenseEvent::Message("Updated successfully".into()),
            ExpenseEvent::Message("Deleted successfully".into()),
        ]
    );
}

#[tokio::test]
async fn duplicate_check_uses_cached_records() {
    let (_store, c, _events) = setup();
    c.settled().await;
    assert!(!c.is_duplicate("Lunch", "120", "Food"));

    c.add_expense(Expense::draft("Lunch", 120.0, "Food", now()))
        .await
        .unwrap();
    c.settled().await;

    assert!(c.is_duplicate("lunch", "120", "Food"));
    assert!(c.is_duplicate("LUNCH", "120.0", "Food"));
    assert!(!c.is_duplicate("Lunch", "120", "food"));
    assert!(!c.is_duplicate("Lunch", "121", "Food"));
    assert!(!c.is_duplicate("Lunch", "12O", "Food"));
    assert!(!c.is_duplicate("Lunch", "", "Food"));
}

#[tokio::test]
async fn concurrent_adds_all_land() {
    let (_store, c, mut events) = setup();
    let (a, b, d) = tokio::join!(
        c.add_expense(Expense::draft("A", 1.0, "Food", now())),
        c.add_expense(Expense::draft("B", 2.0, "Food", now())),
        c.add_expense(Expense::draft("C", 4.0, "Food", now())),
    );
    let mut ids = vec![a.unwrap(), b.unwrap(), d.unwrap()];
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert_eq!(drain(&mut events), vec![ExpenseEvent::Saved; 3]);
    wait_until(&c, |s| s.total_amount == 7.0 && s.expenses.len() == 3).await;
}

#[tokio::test]
async fn read_faults_are_sticky_and_do_not_stop_updates() {
    let (store, c, mut events) = setup();
    c.settled().await;

    // A row whose amount cannot be read back as a number.
    store
        .with_connection(|conn| {
            conn.execute(
                "INSERT INTO expenses(title, amount, category, timestamp) VALUES ('bad', 'abc', 'Food', 0)",
                [],
            )
            .map(|_| ())
            .map_err(StoreFault::from)
        })
        .unwrap();

    c.add_expense(Expense::draft("Fine", 10.0, "Food", now()))
        .await
        .unwrap();
    wait_until(&c, |s| s.error_message.is_some()).await;

    store
        .with_connection(|conn| {
            conn.execute("DELETE FROM expenses WHERE title='bad'", [])
                .map(|_| ())
                .map_err(StoreFault::from)
        })
        .unwrap();
    c.add_expense(Expense::draft("Also fine", 5.0, "Food", now()))
        .await
        .unwrap();
    wait_until(&c, |s| s.expenses.len() == 2 && s.total_amount == 15.0).await;

    let state = c.state();
    assert!(state.error_message.is_some());
    assert_eq!(state.total_amount, 15.0);
    assert_eq!(drain(&mut events), vec![ExpenseEvent::Saved, ExpenseEvent::Saved]);
}
