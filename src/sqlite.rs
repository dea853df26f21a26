// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed record store.
//!
//! Writes run on tokio's blocking pool against a single connection guarded by
//! a mutex. After each committed write the store reloads its state and
//! publishes it while still holding the connection, so subscribers see states
//! in commit order. Reloads are skipped while nobody is subscribed; opening a
//! new live query always reloads first.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tokio::sync::watch;

use crate::db;
use crate::live::{LiveQuery, Published};
use crate::models::Expense;
use crate::store::{RecordStore, StoreFault, StoreState};

const SELECT_ALL: &str = "SELECT id, title, amount, category, notes, receipt_image, timestamp
     FROM expenses ORDER BY timestamp DESC, id DESC";

struct Shared {
    conn: Mutex<Connection>,
    tx: watch::Sender<Published>,
}

impl Shared {
    fn publish(&self, conn: &Connection, force: bool) {
        if !force && self.tx.receiver_count() == 0 {
            return;
        }
        let next = match load_state(conn) {
            Ok(state) => Ok(Arc::new(state)),
            Err(fault) => {
                tracing::warn!(error = %fault, "failed to reload expenses");
                Err(fault)
            }
        };
        self.tx.send_if_modified(|cur| {
            if *cur == next {
                false
            } else {
                *cur = next;
                true
            }
        });
    }
}

pub struct SqliteStore {
    shared: Arc<Shared>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self, StoreFault> {
        db::init_schema(&conn)?;
        let (tx, _) = watch::channel(Ok(Arc::new(StoreState::default())));
        Ok(Self {
            shared: Arc::new(Shared {
                conn: Mutex::new(conn),
                tx,
            }),
        })
    }

    pub fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let conn = db::open_or_init(path)?;
        Ok(Self::new(conn)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreFault> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Runs `f` against the underlying connection. Changes made here are not
    /// published to live queries.
    pub fn with_connection<R, E>(&self, f: impl FnOnce(&Connection) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreFault>,
    {
        let conn = lock(&self.shared)?;
        f(&conn)
    }

    fn subscribe<T: 'static>(
        &self,
        project: impl Fn(&StoreState) -> T + Send + Sync + 'static,
    ) -> LiveQuery<T> {
        let rx = match lock(&self.shared) {
            Ok(conn) => {
                self.shared.publish(&conn, true);
                self.shared.tx.subscribe()
            }
            Err(fault) => {
                let _previous = self.shared.tx.send_replace(Err(fault));
                self.shared.tx.subscribe()
            }
        };
        LiveQuery::new(rx, project)
    }

    async fn write<R: Send + 'static>(
        &self,
        f: impl FnOnce(&Connection) -> Result<R, StoreFault> + Send + 'static,
    ) -> Result<R, StoreFault> {
        let shared = self.shared.clone();
        tokio::task::spawn_blocking(move || {
            let conn = lock(&shared)?;
            let out = f(&conn)?;
            shared.publish(&conn, false);
            Ok(out)
        })
        .await
        .map_err(|e| StoreFault::Unavailable(e.to_string()))?
    }
}

fn lock(shared: &Shared) -> Result<std::sync::MutexGuard<'_, Connection>, StoreFault> {
    shared
        .conn
        .lock()
        .map_err(|e| StoreFault::Unavailable(e.to_string()))
}

fn row_to_expense(r: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: r.get(0)?,
        title: r.get(1)?,
        amount: r.get(2)?,
        category: r.get(3)?,
        notes: r.get(4)?,
        receipt_image: r.get(5)?,
        timestamp: r.get(6)?,
    })
}

fn load_state(conn: &Connection) -> Result<StoreState, StoreFault> {
    let mut stmt = conn.prepare_cached(SELECT_ALL)?;
    let expenses = stmt
        .query_map([], row_to_expense)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    let total: Option<f64> =
        conn.query_row("SELECT SUM(amount) FROM expenses", [], |r| r.get(0))?;
    let today_total: Option<f64> = conn.query_row(
        "SELECT SUM(amount) FROM expenses
         WHERE date(timestamp / 1000, 'unixepoch', 'localtime') = date('now', 'localtime')",
        [],
        |r| r.get(0),
    )?;
    Ok(StoreState {
        expenses,
        total,
        today_total,
    })
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert_or_replace(&self, expense: &Expense) -> Result<i64, StoreFault> {
        let e = expense.clone();
        let id = self
            .write(move |conn| {
                if e.id == 0 {
                    conn.execute(
                        "INSERT INTO expenses(title, amount, category, notes, receipt_image, timestamp)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        params![e.title, e.amount, e.category, e.notes, e.receipt_image, e.timestamp],
                    )?;
                } else {
                    conn.execute(
                        "INSERT OR REPLACE INTO expenses(id, title, amount, category, notes, receipt_image, timestamp)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                        params![e.id, e.title, e.amount, e.category, e.notes, e.receipt_image, e.timestamp],
                    )?;
                }
                Ok(conn.last_insert_rowid())
            })
            .await?;
        tracing::debug!(id, "expense stored");
        Ok(id)
    }

    async fn update(&self, expense: &Expense) -> Result<(), StoreFault> {
        let e = expense.clone();
        self.write(move |conn| {
            let changed = conn.execute(
                "UPDATE expenses
                 SET title=?2, amount=?3, category=?4, notes=?5, receipt_image=?6, timestamp=?7
                 WHERE id=?1",
                params![e.id, e.title, e.amount, e.category, e.notes, e.receipt_image, e.timestamp],
            )?;
            if changed == 0 {
                return Err(StoreFault::NotFound(e.id));
            }
            Ok(())
        })
        .await?;
        tracing::debug!(id = expense.id, "expense updated");
        Ok(())
    }

    async fn delete(&self, expense: &Expense) -> Result<(), StoreFault> {
        let id = expense.id;
        self.write(move |conn| {
            let changed = conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?;
            if changed == 0 {
                return Err(StoreFault::NotFound(id));
            }
            Ok(())
        })
        .await?;
        tracing::debug!(id, "expense deleted");
        Ok(())
    }

    fn observe_all(&self) -> LiveQuery<Vec<Expense>> {
        self.subscribe(|s| s.expenses.clone())
    }

    fn observe_by_id(&self, id: i64) -> LiveQuery<Option<Expense>> {
        self.subscribe(move |s| s.expenses.iter().find(|e| e.id == id).cloned())
    }

    fn observe_sum_of_all_amounts(&self) -> LiveQuery<Option<f64>> {
        self.subscribe(|s| s.total)
    }

    fn observe_sum_for_current_local_day(&self) -> LiveQuery<Option<f64>> {
        self.subscribe(|s| s.today_total)
    }
}
