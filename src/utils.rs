// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, TimeZone};
use clap::ArgMatches;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;

pub const SUGGESTED_CATEGORIES: [&str; 5] = ["Staff", "Travel", "Food", "Utility", "Other"];
pub const DEFAULT_CATEGORY: &str = "Staff";
pub const NOTES_LIMIT: usize = 100;
pub const CHART_DAYS: usize = 7;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn required<'a>(m: &'a ArgMatches, id: &str) -> Result<&'a String> {
    m.get_one::<String>(id)
        .with_context(|| format!("Missing required argument '{}'", id))
}

/// Amount entry keeps only digits and dots.
pub fn amount_text(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Lenient amount entry: anything unparseable is 0.
pub fn sanitize_amount(s: &str) -> f64 {
    amount_text(s).parse::<f64>().unwrap_or(0.0)
}

pub fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

pub fn cap_notes(s: Option<&str>) -> Option<String> {
    non_blank(s).map(|n| n.chars().take(NOTES_LIMIT).collect())
}

/// "Other" with a custom label uses the label.
pub fn resolve_category(choice: &str, custom: Option<&str>) -> String {
    match non_blank(custom) {
        Some(label) if choice.eq_ignore_ascii_case("Other") => label,
        _ => choice.to_string(),
    }
}

/// Current local time of day placed on `day`, or now when `day` is `None`.
pub fn timestamp_on(day: Option<NaiveDate>) -> i64 {
    let now = Local::now();
    let Some(day) = day else {
        return now.timestamp_millis();
    };
    let naive = day.and_time(now.time());
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| now.timestamp_millis())
}

pub fn fmt_local(timestamp: i64, pattern: &str) -> String {
    match Local.timestamp_millis_opt(timestamp).earliest() {
        Some(dt) => dt.format(pattern).to_string(),
        None => timestamp.to_string(),
    }
}

/// Money for display, rounded half-even to two places. Values outside the
/// decimal range print as plain floats.
pub fn fmt_money(amount: f64, symbol: &str) -> String {
    match Decimal::from_f64_retain(amount) {
        Some(d) => format!("{}{:.2}", symbol, d.round_dp(2)),
        None => format!("{}{:.2}", symbol, amount),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
