// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod expenses;
pub mod reports;
pub mod exporter;
pub mod settings;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::coordinator::{Coordinator, EventStream};
use crate::models::ExpenseEvent;
use crate::sqlite::SqliteStore;

/// One open database with its coordinator, shared by every command.
pub struct Session {
    pub store: Arc<SqliteStore>,
    pub coordinator: Coordinator,
    events: EventStream,
}

impl Session {
    pub fn new(store: SqliteStore) -> Self {
        let store = Arc::new(store);
        let (coordinator, events) = Coordinator::new(store.clone());
        Self {
            store,
            coordinator,
            events,
        }
    }

    pub fn open(path: Option<&Path>) -> Result<Self> {
        Ok(Self::new(SqliteStore::open(path)?))
    }

    /// Waits for the cached state to catch up with the store.
    pub async fn ready(&self) {
        self.coordinator.settled().await;
    }

    /// Events raised so far, in order.
    pub fn drain_events(&mut self) -> Vec<ExpenseEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = self.events.try_recv() {
            out.push(ev);
        }
        out
    }

    pub fn currency_symbol(&self) -> Result<String> {
        self.store.with_connection(crate::db::get_currency_symbol)
    }
}

/// Prints write outcomes the way the app surfaces them.
pub fn print_events(events: &[ExpenseEvent]) {
    for ev in events {
        match ev {
            ExpenseEvent::Saved => println!("Expense saved"),
            ExpenseEvent::Message(text) => println!("{}", text),
        }
    }
}
