// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, value_parser, Arg, ArgAction, Command};

use crate::utils::{DEFAULT_CATEGORY, SUGGESTED_CATEGORIES};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("spendlog")
        .about("Single-user expense log with live totals and reports")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("SPENDLOG_DB")
                .value_parser(value_parser!(std::path::PathBuf))
                .help("SQLite database path (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .env("SPENDLOG_LOG")
                .default_value("warn")
                .help("Log filter used when RUST_LOG is unset"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("add")
                .about("Record an expense")
                .arg(arg!(--title <TITLE> "What it was for").required(true))
                .arg(arg!(--amount <AMOUNT> "Amount; non-numeric characters are ignored").required(true))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .default_value(DEFAULT_CATEGORY)
                        .help(format!("One of {}", SUGGESTED_CATEGORIES.join(", "))),
                )
                .arg(arg!(--"custom-category" <LABEL> "Label used when category is Other"))
                .arg(arg!(--note <NOTE> "Optional note, capped at 100 characters"))
                .arg(arg!(--receipt <URI> "Optional receipt image reference"))
                .arg(arg!(--at <DATE> "Record on this local day (YYYY-MM-DD)"))
                .arg(arg!(--force "Save even if it looks like a duplicate")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("Expenses for one day, grouped")
                .arg(arg!(--date <DATE> "Local day (YYYY-MM-DD), defaults to today"))
                .arg(
                    Arg::new("group")
                        .long("group")
                        .value_parser(["category", "day"])
                        .default_value("category"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("show")
                .about("Show one expense")
                .arg(arg!(<ID>).value_parser(value_parser!(i64))),
        ))
        .subcommand(
            Command::new("edit")
                .about("Replace fields of an expense")
                .arg(arg!(<ID>).value_parser(value_parser!(i64)))
                .arg(arg!(--title <TITLE>))
                .arg(arg!(--amount <AMOUNT>))
                .arg(arg!(--category <CATEGORY>))
                .arg(arg!(--"custom-category" <LABEL> "Label used when category is Other"))
                .arg(arg!(--note <NOTE>))
                .arg(arg!(--receipt <URI>)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete an expense")
                .arg(arg!(<ID>).value_parser(value_parser!(i64))),
        )
        .subcommand(json_flags(
            Command::new("report")
                .about("Totals, last 7 days, and category breakdown")
                .arg(arg!(--share "Print the plain-text share version")),
        ))
        .subcommand(
            Command::new("export")
                .about("Write every expense to a file")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("txt")
                        .help("txt|csv|json"),
                )
                .arg(arg!(--out <PATH>).required(true)),
        )
        .subcommand(Command::new("categories").about("List suggested categories"))
        .subcommand(
            Command::new("config")
                .about("Read or change settings")
                .subcommand(Command::new("get").arg(arg!(<KEY>)))
                .subcommand(Command::new("set").arg(arg!(<KEY>)).arg(arg!(<VALUE>))),
        )
}
