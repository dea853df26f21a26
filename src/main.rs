// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use spendlog::{cli, commands, db};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let db_arg = matches.get_one::<PathBuf>("db").cloned();
    let mut session = commands::Session::open(db_arg.as_deref())?;

    match matches.subcommand() {
        Some(("init", _)) => match &db_arg {
            Some(p) => println!("Database initialized at {}", p.display()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("add", sub)) => {
            commands::expenses::add(&mut session, sub).await?;
        }
        Some(("list", sub)) => {
            commands::expenses::list(&session, sub).await?;
        }
        Some(("show", sub)) => {
            commands::expenses::show(&session, sub).await?;
        }
        Some(("edit", sub)) => {
            commands::expenses::edit(&mut session, sub).await?;
        }
        Some(("rm", sub)) => {
            commands::expenses::remove(&mut session, sub).await?;
        }
        Some(("report", sub)) => {
            commands::reports::handle(&session, sub).await?;
        }
        Some(("export", sub)) => commands::exporter::handle(&session, sub).await?,
        Some(("categories", _)) => commands::categories::handle(),
        Some(("config", sub)) => commands::settings::handle(&session, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
