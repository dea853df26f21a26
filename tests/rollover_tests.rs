// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

// Changes the process time zone, so it lives in its own test binary.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Timelike, Utc};
use spendlog::{Coordinator, Expense, SqliteStore};

/// Sets `TZ` to a fixed offset east of UTC, in hours.
fn use_offset(hours: i32) {
    // POSIX offsets are west-positive.
    let tz = format!("LOC{}", -hours);
    // SAFETY: this binary has a single test and sets TZ before any other
    // thread reads the environment.
    unsafe { std::env::set_var("TZ", tz) };
}

#[tokio::test]
async fn today_total_waits_for_a_write_after_the_day_changes() {
    // Local time starts at 22:xx and moves to 00:xx of the next day.
    let mut before = 22 - Utc::now().hour() as i32;
    if before > 12 {
        before -= 24;
    }
    use_offset(before);
    let first_day = Local::now().date_naive();

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (c, _events) = Coordinator::new(store);
    let three_hours_ago = Local::now().timestamp_millis() - 3 * 3_600_000;
    c.add_expense(Expense::draft("Dinner", 10.0, "Food", three_hours_ago))
        .await
        .unwrap();
    c.settled().await;
    assert_eq!(c.state().today_total, 10.0);

    use_offset(before + 2);
    // chrono rechecks TZ at most once a second.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_ne!(Local::now().date_naive(), first_day);

    // No write yet: the cached figure is stale but the state is settled.
    tokio::time::timeout(Duration::from_secs(3), c.settled())
        .await
        .expect("settled must not depend on the clock");
    assert_eq!(c.state().today_total, 10.0);
    assert_eq!(c.engine().observe_today_total().current(), Ok(0.0));

    c.add_expense(Expense::draft("Breakfast", 5.0, "Food", Local::now().timestamp_millis()))
        .await
        .unwrap();
    c.settled().await;
    let state = c.state();
    assert_eq!(state.today_total, 5.0);
    assert_eq!(state.total_amount, 15.0);
}
