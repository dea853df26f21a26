// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::json;

use super::Session;
use crate::models::Expense;
use crate::utils::{fmt_local, fmt_money, required};

pub async fn handle(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;

    session.ready().await;
    let state = session.coordinator.state();
    let symbol = session.currency_symbol()?;
    export(&state.expenses, &fmt, Path::new(out), &symbol)?;
    println!("Exported {} expenses to {}", state.expenses.len(), out);
    Ok(())
}

/// Writes the snapshot in `fmt` (txt, csv or json). Unknown formats write
/// nothing.
pub fn export(expenses: &[Expense], fmt: &str, out: &Path, symbol: &str) -> Result<()> {
    match fmt {
        "txt" => std::fs::write(out, document(expenses, symbol))
            .with_context(|| format!("Write {}", out.display()))?,
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "date", "title", "amount", "category", "notes", "receipt",
            ])?;
            for e in expenses {
                wtr.write_record([
                    e.id.to_string(),
                    fmt_local(e.timestamp, "%Y-%m-%d %H:%M"),
                    e.title.clone(),
                    e.amount.to_string(),
                    e.category.clone(),
                    e.notes.clone().unwrap_or_default(),
                    e.receipt_image.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = expenses
                .iter()
                .map(|e| {
                    json!({
                        "id": e.id, "date": fmt_local(e.timestamp, "%Y-%m-%d %H:%M"),
                        "title": e.title, "amount": e.amount, "category": e.category,
                        "notes": e.notes, "receipt_image": e.receipt_image, "timestamp": e.timestamp
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use txt|csv|json)", other),
    }
    tracing::info!(format = fmt, path = %out.display(), count = expenses.len(), "export written");
    Ok(())
}

/// The printable report: one block per expense, most recent first.
pub fn document(expenses: &[Expense], symbol: &str) -> String {
    let mut out = String::from("Expense Report\n\n");
    for e in expenses {
        let _ = writeln!(out, "Title: {}", e.title);
        let _ = writeln!(out, "Amount: {}", fmt_money(e.amount, symbol));
        let _ = writeln!(out, "Category: {}", e.category);
        let _ = writeln!(out, "Date: {}", fmt_local(e.timestamp, "%Y-%m-%d %H:%M"));
        if let Some(notes) = &e.notes {
            let _ = writeln!(out, "Notes: {}", notes);
        }
        out.push('\n');
    }
    out
}
