// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure folds over a snapshot of expenses.
//!
//! Every derived view is recomputed from the complete snapshot each time it
//! changes; nothing here keeps state between calls. Day grouping converts the
//! stored epoch timestamp to a calendar day in the given timezone at the time
//! of computation, so the same record can land on a different day when read
//! under a different timezone.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::models::{CategoryTotals, DailyTotals, Expense};

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar day of `timestamp` (epoch millis) in `tz`.
///
/// Timestamps outside chrono's range fall back to the epoch so that every
/// record still belongs to exactly one day.
pub fn day_in<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> NaiveDate {
    DateTime::from_timestamp_millis(timestamp)
        .unwrap_or_default()
        .with_timezone(tz)
        .date_naive()
}

pub fn local_day(timestamp: i64) -> NaiveDate {
    day_in(timestamp, &Local)
}

pub fn day_key(day: NaiveDate) -> String {
    day.format(DAY_KEY_FORMAT).to_string()
}

pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

pub fn on_day<'a, Tz: TimeZone>(
    expenses: &'a [Expense],
    day: NaiveDate,
    tz: &'a Tz,
) -> impl Iterator<Item = &'a Expense> + 'a {
    expenses
        .iter()
        .filter(move |e| day_in(e.timestamp, tz) == day)
}

pub fn total_on_day<Tz: TimeZone>(expenses: &[Expense], day: NaiveDate, tz: &Tz) -> f64 {
    on_day(expenses, day, tz).map(|e| e.amount).sum()
}

/// Sum for the current local day, with "today" read from the clock now.
pub fn today_total(expenses: &[Expense]) -> f64 {
    total_on_day(expenses, Local::now().date_naive(), &Local)
}

pub fn daily_totals_in<Tz: TimeZone>(expenses: &[Expense], tz: &Tz) -> DailyTotals {
    let mut out = BTreeMap::new();
    for e in expenses {
        *out.entry(day_key(day_in(e.timestamp, tz))).or_insert(0.0) += e.amount;
    }
    out
}

pub fn daily_totals(expenses: &[Expense]) -> DailyTotals {
    daily_totals_in(expenses, &Local)
}

pub fn category_totals(expenses: &[Expense]) -> CategoryTotals {
    let mut out = BTreeMap::new();
    for e in expenses {
        *out.entry(e.category.clone()).or_insert(0.0) += e.amount;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Category,
    Day,
}

/// Buckets records by category or by local day, keeping snapshot order
/// inside each bucket.
pub fn group_records<Tz: TimeZone>(
    expenses: &[Expense],
    grouping: Grouping,
    tz: &Tz,
) -> BTreeMap<String, Vec<Expense>> {
    let mut out: BTreeMap<String, Vec<Expense>> = BTreeMap::new();
    for e in expenses {
        let key = match grouping {
            Grouping::Category => e.category.clone(),
            Grouping::Day => day_key(day_in(e.timestamp, tz)),
        };
        out.entry(key).or_default().push(e.clone());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    /// `None` for padding bars.
    pub day: Option<String>,
    pub amount: f64,
}

/// Fixed-width window for the bar chart.
///
/// Keeps the most recent `n` days when there are more; pads on the left with
/// zero bars when there are fewer.
pub fn last_days(totals: &DailyTotals, n: usize) -> Vec<ChartBar> {
    let skip = totals.len().saturating_sub(n);
    let pad = n.saturating_sub(totals.len());
    std::iter::repeat_n(
        ChartBar {
            day: None,
            amount: 0.0,
        },
        pad,
    )
    .chain(totals.iter().skip(skip).map(|(day, amount)| ChartBar {
        day: Some(day.clone()),
        amount: *amount,
    }))
    .collect()
}
