// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::{print_events, Session};
use crate::aggregate::{self, Grouping};
use crate::models::Expense;
use crate::utils::{
    amount_text, cap_notes, fmt_local, fmt_money, maybe_print_json, non_blank, parse_date,
    pretty_table, required, resolve_category, sanitize_amount, timestamp_on,
};

pub async fn add(session: &mut Session, sub: &clap::ArgMatches) -> Result<Option<i64>> {
    let title = required(sub, "title")?.trim().to_string();
    let amount = amount_text(required(sub, "amount")?);
    let category = resolve_category(
        required(sub, "category")?,
        sub.get_one::<String>("custom-category").map(String::as_str),
    );
    let day = sub
        .get_one::<String>("at")
        .map(|s| parse_date(s))
        .transpose()?;

    session.ready().await;
    if !sub.get_flag("force") && session.coordinator.is_duplicate(&title, &amount, &category) {
        println!(
            "'{}' for {} in {} is already recorded; pass --force to save it again",
            title, amount, category
        );
        return Ok(None);
    }

    let draft = Expense::draft(title, sanitize_amount(&amount), category, timestamp_on(day))
        .with_notes(cap_notes(sub.get_one::<String>("note").map(String::as_str)))
        .with_receipt(non_blank(sub.get_one::<String>("receipt").map(String::as_str)));
    let id = session.coordinator.add_expense(draft).await;
    print_events(&session.drain_events());
    Ok(id)
}

#[derive(Debug, Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub time: String,
    pub title: String,
    pub category: String,
    pub amount: f64,
    pub notes: String,
    pub receipt: bool,
}

impl From<&Expense> for ExpenseRow {
    fn from(e: &Expense) -> Self {
        Self {
            id: e.id,
            time: fmt_local(e.timestamp, "%I:%M %p"),
            title: e.title.clone(),
            category: e.category.clone(),
            amount: e.amount,
            notes: e.notes.clone().unwrap_or_default(),
            receipt: e.receipt_image.is_some(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExpenseGroup {
    pub key: String,
    pub total: f64,
    pub expenses: Vec<ExpenseRow>,
}

#[derive(Debug, Serialize)]
pub struct DayListing {
    pub date: String,
    pub total: f64,
    pub count: usize,
    pub groups: Vec<ExpenseGroup>,
}

/// Records of one local day, grouped the way the list view groups them.
pub fn day_listing(expenses: &[Expense], day: NaiveDate, grouping: Grouping) -> DayListing {
    let on_day: Vec<Expense> = aggregate::on_day(expenses, day, &Local).cloned().collect();
    let groups = aggregate::group_records(&on_day, grouping, &Local)
        .into_iter()
        .map(|(key, list)| ExpenseGroup {
            key,
            total: aggregate::total(&list),
            expenses: list.iter().map(ExpenseRow::from).collect(),
        })
        .collect();
    DayListing {
        date: aggregate::day_key(day),
        total: aggregate::total(&on_day),
        count: on_day.len(),
        groups,
    }
}

pub async fn list(session: &Session, sub: &clap::ArgMatches) -> Result<DayListing> {
    let day = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let grouping = match sub.get_one::<String>("group").map(String::as_str) {
        Some("day") => Grouping::Day,
        _ => Grouping::Category,
    };

    session.ready().await;
    let state = session.coordinator.state();
    if let Some(err) = &state.error_message {
        eprintln!("warning: {}", err);
    }
    let listing = day_listing(&state.expenses, day, grouping);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &listing)? {
        let symbol = session.currency_symbol()?;
        println!(
            "{}  total {}  ({} expenses)",
            listing.date,
            fmt_money(listing.total, &symbol),
            listing.count
        );
        if listing.count == 0 {
            println!("No expenses recorded for this day.");
        }
        for group in &listing.groups {
            println!("\n{}  {}", group.key, fmt_money(group.total, &symbol));
            let rows = group
                .expenses
                .iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.time.clone(),
                        r.title.clone(),
                        r.category.clone(),
                        fmt_money(r.amount, &symbol),
                        r.notes.clone(),
                        if r.receipt { "yes".into() } else { String::new() },
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["ID", "Time", "Title", "Category", "Amount", "Notes", "Receipt"],
                    rows
                )
            );
        }
    }
    Ok(listing)
}

/// Current value of one record, read through the live query.
async fn fetch(session: &Session, id: i64) -> Result<Option<Expense>> {
    let mut query = session.coordinator.engine().observe_by_id(id);
    match query.next().await {
        Some(found) => Ok(found?),
        None => Err(anyhow!("store closed")),
    }
}

pub async fn show(session: &Session, sub: &clap::ArgMatches) -> Result<Expense> {
    let id = *sub
        .get_one::<i64>("ID")
        .ok_or_else(|| anyhow!("Missing expense id"))?;
    let Some(e) = fetch(session, id).await? else {
        bail!("Expense {} not found", id);
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &e)? {
        let symbol = session.currency_symbol()?;
        let rows = vec![
            vec!["ID".into(), e.id.to_string()],
            vec!["Title".into(), e.title.clone()],
            vec!["Amount".into(), fmt_money(e.amount, &symbol)],
            vec!["Category".into(), e.category.clone()],
            vec!["Date".into(), fmt_local(e.timestamp, "%Y-%m-%d %H:%M")],
            vec!["Notes".into(), e.notes.clone().unwrap_or_default()],
            vec!["Receipt".into(), e.receipt_image.clone().unwrap_or_default()],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(e)
}

pub async fn edit(session: &mut Session, sub: &clap::ArgMatches) -> Result<bool> {
    let id = *sub
        .get_one::<i64>("ID")
        .ok_or_else(|| anyhow!("Missing expense id"))?;
    let Some(mut e) = fetch(session, id).await? else {
        bail!("Expense {} not found", id);
    };
    if let Some(title) = sub.get_one::<String>("title") {
        e.title = title.trim().to_string();
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        e.amount = sanitize_amount(amount);
    }
    let custom = sub.get_one::<String>("custom-category").map(String::as_str);
    if let Some(category) = sub.get_one::<String>("category") {
        e.category = resolve_category(category, custom);
    } else if let Some(label) = non_blank(custom) {
        e.category = label;
    }
    if let Some(note) = sub.get_one::<String>("note") {
        e.notes = cap_notes(Some(note));
    }
    if let Some(receipt) = sub.get_one::<String>("receipt") {
        e.receipt_image = non_blank(Some(receipt));
    }
    let ok = session.coordinator.update_expense(e).await;
    print_events(&session.drain_events());
    Ok(ok)
}

pub async fn remove(session: &mut Session, sub: &clap::ArgMatches) -> Result<bool> {
    let id = *sub
        .get_one::<i64>("ID")
        .ok_or_else(|| anyhow!("Missing expense id"))?;
    // An unknown id still goes to the store so the failure is reported the
    // same way as any other delete fault.
    let target = fetch(session, id)
        .await?
        .unwrap_or_else(|| Expense::draft("", 0.0, "", 0).with_id(id));
    let ok = session.coordinator.delete_expense(target).await;
    print_events(&session.drain_events());
    Ok(ok)
}
