// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Local;
use spendlog::commands::{expenses, reports, Session};
use spendlog::{cli, ExpenseEvent, SqliteStore};

fn session() -> Session {
    Session::new(SqliteStore::open_in_memory().unwrap())
}

fn matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["spendlog"];
    full.extend_from_slice(args);
    cli::build_cli().get_matches_from(full)
}

async fn run_add(s: &mut Session, args: &[&str]) -> Option<i64> {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    let m = matches(&full);
    let (_, sub) = m.subcommand().unwrap();
    expenses::add(s, sub).await.unwrap()
}

#[tokio::test]
async fn add_sanitizes_amount_and_caps_notes() {
    let mut s = session();
    let long_note = "n".repeat(140);
    let id = run_add(
        &mut s,
        &["--title", " Chai ", "--amount", "₹1,20.5", "--category", "Food", "--note", &long_note],
    )
    .await
    .unwrap();
    let stored = s
        .coordinator
        .engine()
        .observe_by_id(id)
        .current()
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Chai");
    assert_eq!(stored.amount, 120.5);
    assert_eq!(stored.notes.unwrap().chars().count(), 100);
    assert_eq!(stored.receipt_image, None);
}

#[tokio::test]
async fn garbage_amount_is_stored_as_zero() {
    let mut s = session();
    let id = run_add(&mut s, &["--title", "Mystery", "--amount", "abc"])
        .await
        .unwrap();
    let stored = s.coordinator.engine().observe_by_id(id).current().unwrap().unwrap();
    assert_eq!(stored.amount, 0.0);
    assert_eq!(stored.category, "Staff");
}

#[tokio::test]
async fn other_category_takes_custom_label() {
    let mut s = session();
    let id = run_add(
        &mut s,
        &["--title", "Novel", "--amount", "300", "--category", "Other", "--custom-category", "Books"],
    )
    .await
    .unwrap();
    let stored = s.coordinator.engine().observe_by_id(id).current().unwrap().unwrap();
    assert_eq!(stored.category, "Books");
}

#[tokio::test]
async fn duplicate_add_is_refused_without_force() {
    let mut s = session();
    let args = ["--title", "Lunch", "--amount", "120", "--category", "Food"];
    assert!(run_add(&mut s, &args).await.is_some());
    assert_eq!(s.drain_events(), Vec::<ExpenseEvent>::new());

    assert!(run_add(&mut s, &["--title", "LUNCH", "--amount", "120", "--category", "Food"])
        .await
        .is_none());

    let mut forced = args.to_vec();
    forced.push("--force");
    assert!(run_add(&mut s, &forced).await.is_some());
    s.ready().await;
    assert_eq!(s.coordinator.state().expenses.len(), 2);
}

#[tokio::test]
async fn list_filters_to_day_and_groups() {
    let mut s = session();
    run_add(&mut s, &["--title", "Train", "--amount", "40", "--category", "Travel"]).await;
    run_add(&mut s, &["--title", "Samosa", "--amount", "15", "--category", "Food"]).await;
    run_add(&mut s, &["--title", "Tea", "--amount", "10", "--category", "Food"]).await;
    run_add(
        &mut s,
        &["--title", "Old", "--amount", "999", "--category", "Food", "--at", "2020-01-01"],
    )
    .await;

    let m = matches(&["list", "--json"]);
    let (_, sub) = m.subcommand().unwrap();
    let listing = expenses::list(&s, sub).await.unwrap();
    assert_eq!(listing.date, Local::now().date_naive().format("%Y-%m-%d").to_string());
    assert_eq!(listing.count, 3);
    assert_eq!(listing.total, 65.0);
    let keys: Vec<_> = listing.groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["Food", "Travel"]);
    assert_eq!(listing.groups[0].total, 25.0);

    let m = matches(&["list", "--date", "2020-01-01", "--group", "day", "--json"]);
    let (_, sub) = m.subcommand().unwrap();
    let listing = expenses::list(&s, sub).await.unwrap();
    assert_eq!(listing.count, 1);
    assert_eq!(listing.groups[0].key, "2020-01-01");
}

#[tokio::test]
async fn rm_unknown_id_reports_failure() {
    let mut s = session();
    run_add(&mut s, &["--title", "Keep", "--amount", "5"]).await;
    s.drain_events();

    let m = matches(&["rm", "4242"]);
    let (_, sub) = m.subcommand().unwrap();
    assert!(!expenses::remove(&mut s, sub).await.unwrap());
    s.ready().await;
    assert_eq!(s.coordinator.state().expenses.len(), 1);
}

#[tokio::test]
async fn edit_replaces_selected_fields() {
    let mut s = session();
    let id = run_add(&mut s, &["--title", "Cab", "--amount", "300", "--category", "Travel"])
        .await
        .unwrap();
    let id_text = id.to_string();
    let m = matches(&["edit", &id_text, "--amount", "275", "--note", "shared"]);
    let (_, sub) = m.subcommand().unwrap();
    assert!(expenses::edit(&mut s, sub).await.unwrap());

    let stored = s.coordinator.engine().observe_by_id(id).current().unwrap().unwrap();
    assert_eq!(stored.title, "Cab");
    assert_eq!(stored.amount, 275.0);
    assert_eq!(stored.notes.as_deref(), Some("shared"));
}

#[tokio::test]
async fn report_matches_engine_totals() {
    let mut s = session();
    run_add(&mut s, &["--title", "Fuel", "--amount", "100", "--category", "Travel"]).await;
    run_add(&mut s, &["--title", "Food", "--amount", "200", "--category", "Food"]).await;
    run_add(
        &mut s,
        &["--title", "Stamp", "--amount", "5", "--category", "Other", "--at", "2024-05-05"],
    )
    .await;

    let m = matches(&["report", "--json"]);
    let (_, sub) = m.subcommand().unwrap();
    let report = reports::handle(&s, sub).await.unwrap();
    assert_eq!(report.total, 305.0);
    assert_eq!(report.today, 300.0);
    assert_eq!(report.daily.len(), 2);
    assert_eq!(report.daily["2024-05-05"], 5.0);
    assert_eq!(report.last_days.len(), 7);
    assert_eq!(report.categories["Travel"], 100.0);
}

#[tokio::test]
async fn edit_other_category_takes_custom_label() {
    let mut s = session();
    let id = run_add(&mut s, &["--title", "Gift", "--amount", "500", "--category", "Food"])
        .await
        .unwrap();
    let id_text = id.to_string();
    let m = matches(&["edit", &id_text, "--category", "Other", "--custom-category", "Gifts"]);
    let (_, sub) = m.subcommand().unwrap();
    assert!(expenses::edit(&mut s, sub).await.unwrap());

    let stored = s.coordinator.engine().observe_by_id(id).current().unwrap().unwrap();
    assert_eq!(stored.category, "Gifts");
    assert_eq!(stored.amount, 500.0);
}
