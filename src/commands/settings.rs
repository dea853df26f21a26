// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};

use super::Session;
use crate::db::{get_currency_symbol, get_setting, set_setting};
use crate::utils::required;

const KNOWN_KEYS: [&str; 1] = ["currency_symbol"];

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = required(sub, "KEY")?;
            let value = match key.as_str() {
                "currency_symbol" => Some(session.store.with_connection(get_currency_symbol)?),
                other => session.store.with_connection(|c| get_setting(c, other))?,
            };
            match value {
                Some(v) => println!("{} = {}", key, v),
                None => println!("{} is not set", key),
            }
        }
        Some(("set", sub)) => {
            let key = required(sub, "KEY")?;
            let value = required(sub, "VALUE")?;
            if !KNOWN_KEYS.contains(&key.as_str()) {
                bail!("Unknown setting '{}' (known: {})", key, KNOWN_KEYS.join(", "));
            }
            session.store.with_connection(|c| set_setting(c, key, value))?;
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
