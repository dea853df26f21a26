// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{pretty_table, DEFAULT_CATEGORY, SUGGESTED_CATEGORIES};

pub fn handle() {
    let data = SUGGESTED_CATEGORIES
        .iter()
        .map(|c| {
            let mark = if *c == DEFAULT_CATEGORY { "default" } else { "" };
            vec![c.to_string(), mark.to_string()]
        })
        .collect();
    println!("{}", pretty_table(&["Category", ""], data));
    println!("Any other label is accepted with --category Other --custom-category <LABEL>.");
}
