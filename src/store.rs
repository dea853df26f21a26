// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record store contract consumed by the aggregation engine and coordinator.

use async_trait::async_trait;
use thiserror::Error;

use crate::live::LiveQuery;
use crate::models::Expense;

/// Any failure coming out of the record store.
///
/// Cloneable so a read-path fault can be published on the snapshot channel
/// alongside successful snapshots.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreFault {
    #[error("database error: {0}")]
    Database(String),
    #[error("no expense with id {0}")]
    NotFound(i64),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreFault {
    fn from(e: rusqlite::Error) -> Self {
        StoreFault::Database(e.to_string())
    }
}

/// Everything one committed store state exposes to live queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// Ordered by timestamp, most recent first.
    pub expenses: Vec<Expense>,
    /// `None` when there are no rows.
    pub total: Option<f64>,
    /// `None` when nothing was recorded on the current local day.
    pub today_total: Option<f64>,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts the record, replacing any row with the same non-zero id.
    /// Returns the id the row is stored under.
    async fn insert_or_replace(&self, expense: &Expense) -> Result<i64, StoreFault>;

    /// Replaces the whole row identified by `expense.id`.
    async fn update(&self, expense: &Expense) -> Result<(), StoreFault>;

    async fn delete(&self, expense: &Expense) -> Result<(), StoreFault>;

    fn observe_all(&self) -> LiveQuery<Vec<Expense>>;

    fn observe_by_id(&self, id: i64) -> LiveQuery<Option<Expense>>;

    fn observe_sum_of_all_amounts(&self) -> LiveQuery<Option<f64>>;

    fn observe_sum_for_current_local_day(&self) -> LiveQuery<Option<f64>>;
}
