// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Write-side mediation and the cached view state.
//!
//! Writes go straight to the store; the cached state only changes when the
//! store's live queries report the result back. Store faults on the write
//! path never escape: they become [`ExpenseEvent::Message`] notifications on
//! an unbounded, ordered channel.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::aggregate;
use crate::engine::Aggregator;
use crate::live::LiveQuery;
use crate::models::{Expense, ExpenseEvent};
use crate::store::{RecordStore, StoreFault};

/// Last-seen values of the live queries, plus a sticky read-path error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseState {
    pub expenses: Vec<Expense>,
    pub total_amount: f64,
    pub today_total: f64,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

pub type EventStream = mpsc::UnboundedReceiver<ExpenseEvent>;

pub struct Coordinator {
    store: Arc<dyn RecordStore>,
    engine: Aggregator,
    state: Arc<watch::Sender<ExpenseState>>,
    events: mpsc::UnboundedSender<ExpenseEvent>,
    collectors: Vec<JoinHandle<()>>,
}

impl Coordinator {
    /// Starts the collectors that keep [`ExpenseState`] current. Must be
    /// called from within a tokio runtime.
    pub fn new(store: Arc<dyn RecordStore>) -> (Self, EventStream) {
        let engine = Aggregator::new(store.clone());
        let (state, _) = watch::channel(ExpenseState {
            is_loading: true,
            ..ExpenseState::default()
        });
        let state = Arc::new(state);
        let (events, rx) = mpsc::unbounded_channel();

        // Today's total is folded from the same emission as the list, so the
        // two never disagree and the day is only re-read on a change.
        let collectors = vec![
            collect(engine.observe_all(), state.clone(), |s, list| {
                s.today_total = aggregate::today_total(&list);
                s.expenses = list;
                s.is_loading = false;
            }),
            collect(engine.observe_all_time_total(), state.clone(), |s, total| {
                s.total_amount = total;
            }),
        ];

        (
            Self {
                store,
                engine,
                state,
                events,
                collectors,
            },
            rx,
        )
    }

    pub fn engine(&self) -> &Aggregator {
        &self.engine
    }

    pub fn state(&self) -> ExpenseState {
        self.state.borrow().clone()
    }

    pub fn watch_state(&self) -> watch::Receiver<ExpenseState> {
        self.state.subscribe()
    }

    /// Waits until the cached state matches what the store currently
    /// publishes. Does not consult the clock, so a stale `today_total`
    /// after a day change still counts as settled.
    pub async fn settled(&self) {
        let all = self.engine.observe_all();
        let total = self.engine.observe_all_time_total();
        let mut rx = self.state.subscribe();
        loop {
            let ready = {
                let s = rx.borrow_and_update();
                !s.is_loading
                    && match (all.current(), total.current()) {
                        (Ok(list), Ok(t)) => s.total_amount == t && s.expenses == list,
                        _ => s.error_message.is_some(),
                    }
            };
            if ready || rx.changed().await.is_err() {
                return;
            }
        }
    }

    fn emit(&self, event: ExpenseEvent) {
        // Nobody listening is not an error for the writer.
        let _ = self.events.send(event);
    }

    /// Stores a new record. Returns the assigned id, or `None` after
    /// reporting the failure as a message.
    pub async fn add_expense(&self, draft: Expense) -> Option<i64> {
        match self.store.insert_or_replace(&draft).await {
            Ok(id) => {
                info!(id, title = %draft.title, "expense saved");
                self.emit(ExpenseEvent::Saved);
                Some(id)
            }
            Err(fault) => {
                warn!(error = %fault, "add failed");
                self.emit(ExpenseEvent::Message(format!("Failed: {fault}")));
                None
            }
        }
    }

    pub async fn update_expense(&self, expense: Expense) -> bool {
        self.report(
            self.store.update(&expense).await,
            expense.id,
            "Updated successfully",
            "Update failed",
        )
    }

    pub async fn delete_expense(&self, expense: Expense) -> bool {
        self.report(
            self.store.delete(&expense).await,
            expense.id,
            "Deleted successfully",
            "Delete failed",
        )
    }

    fn report(&self, outcome: Result<(), StoreFault>, id: i64, ok: &str, failed: &str) -> bool {
        match outcome {
            Ok(()) => {
                info!(id, "{ok}");
                self.emit(ExpenseEvent::Message(ok.to_string()));
                true
            }
            Err(fault) => {
                warn!(id, error = %fault, "{failed}");
                self.emit(ExpenseEvent::Message(format!("{failed}: {fault}")));
                false
            }
        }
    }

    /// True when the cached records already hold the same title (ignoring
    /// case), amount, and category. Amount text that does not parse is never
    /// a duplicate.
    pub fn is_duplicate(&self, title: &str, amount: &str, category: &str) -> bool {
        let Ok(amount) = amount.trim().parse::<f64>() else {
            return false;
        };
        let title = title.to_lowercase();
        self.state.borrow().expenses.iter().any(|e| {
            e.title.to_lowercase() == title && e.amount == amount && e.category == category
        })
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        for task in &self.collectors {
            task.abort();
        }
    }
}

fn collect<T: Send + 'static>(
    mut query: LiveQuery<T>,
    state: Arc<watch::Sender<ExpenseState>>,
    apply: impl Fn(&mut ExpenseState, T) + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(item) = query.next().await {
            match item {
                Ok(value) => state.send_modify(|s| apply(s, value)),
                Err(fault) => {
                    warn!(error = %fault, "live query failed");
                    state.send_modify(|s| {
                        s.error_message = Some(fault.to_string());
                        s.is_loading = false;
                    });
                }
            }
        }
    })
}
