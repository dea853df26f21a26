// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt::Write as _;

use anyhow::{anyhow, Result};
use serde::Serialize;

use super::Session;
use crate::aggregate::{self, ChartBar};
use crate::engine::Aggregator;
use crate::live::LiveQuery;
use crate::models::{CategoryTotals, DailyTotals};
use crate::utils::{fmt_money, maybe_print_json, pretty_table, CHART_DAYS};

const BAR_WIDTH: usize = 30;

#[derive(Debug, Serialize)]
pub struct Report {
    pub total: f64,
    pub today: f64,
    pub daily: DailyTotals,
    pub last_days: Vec<ChartBar>,
    pub categories: CategoryTotals,
}

async fn first<T: 'static>(mut query: LiveQuery<T>) -> Result<T> {
    match query.next().await {
        Some(v) => Ok(v?),
        None => Err(anyhow!("store closed")),
    }
}

/// Reads one value from each aggregate view.
pub async fn build_report(engine: &Aggregator) -> Result<Report> {
    let daily = first(engine.observe_daily_totals()).await?;
    Ok(Report {
        total: first(engine.observe_all_time_total()).await?,
        today: first(engine.observe_today_total()).await?,
        last_days: aggregate::last_days(&daily, CHART_DAYS),
        daily,
        categories: first(engine.observe_category_totals()).await?,
    })
}

/// Horizontal text bars, one per day, scaled to the largest day.
pub fn render_chart(bars: &[ChartBar], symbol: &str) -> String {
    let max = bars.iter().map(|b| b.amount).fold(0.0_f64, f64::max);
    let mut out = String::new();
    for (i, bar) in bars.iter().enumerate() {
        let label = match &bar.day {
            Some(day) => day.clone(),
            None => format!("Day {}", i + 1),
        };
        let width = if max > 0.0 {
            ((bar.amount / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<10} {:<w$} {}",
            label,
            "█".repeat(width),
            fmt_money(bar.amount, symbol),
            w = BAR_WIDTH
        );
    }
    out
}

/// Plain-text report for sharing.
pub fn share_text(report: &Report, symbol: &str) -> String {
    let mut out = String::from("Expense Report\n");
    let _ = writeln!(out, "Total: {}\n", fmt_money(report.total, symbol));
    out.push_str("Category Totals:\n");
    for (category, amount) in &report.categories {
        let _ = writeln!(out, "- {}: {}", category, fmt_money(*amount, symbol));
    }
    let _ = write!(out, "\nLast {} Days:\n", CHART_DAYS);
    for bar in &report.last_days {
        if let Some(day) = &bar.day {
            let _ = writeln!(out, "- {}: {}", day, fmt_money(bar.amount, symbol));
        }
    }
    out
}

pub async fn handle(session: &Session, sub: &clap::ArgMatches) -> Result<Report> {
    session.ready().await;
    let report = build_report(session.coordinator.engine()).await?;
    let symbol = session.currency_symbol()?;

    if sub.get_flag("share") {
        print!("{}", share_text(&report, &symbol));
        return Ok(report);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(report);
    }

    println!("Smart Expense Report");
    println!("Total expenses: {}", fmt_money(report.total, &symbol));
    println!("Spent today:    {}", fmt_money(report.today, &symbol));
    println!("\nLast {} Days", CHART_DAYS);
    print!("{}", render_chart(&report.last_days, &symbol));
    println!("\nCategory Totals");
    let mut items: Vec<_> = report.categories.iter().collect();
    items.sort_by(|a, b| b.1.total_cmp(a.1));
    let rows = items
        .into_iter()
        .map(|(c, a)| vec![c.clone(), fmt_money(*a, &symbol)])
        .collect();
    println!("{}", pretty_table(&["Category", "Spent"], rows));
    Ok(report)
}
