// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived, continuously updated views over the record store.
//!
//! Each view is a live query on the store's snapshot channel with a fold from
//! [`crate::aggregate`] applied per emission. There is no incremental
//! bookkeeping: every emission folds the whole snapshot again.

use std::sync::Arc;

use crate::aggregate;
use crate::live::LiveQuery;
use crate::models::{CategoryTotals, DailyTotals, Expense};
use crate::store::RecordStore;

#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn RecordStore>,
}

impl Aggregator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All records, most recent first.
    pub fn observe_all(&self) -> LiveQuery<Vec<Expense>> {
        self.store.observe_all()
    }

    pub fn observe_by_id(&self, id: i64) -> LiveQuery<Option<Expense>> {
        self.store.observe_by_id(id)
    }

    /// Sum of every amount; 0 when the store is empty.
    pub fn observe_all_time_total(&self) -> LiveQuery<f64> {
        self.store
            .observe_sum_of_all_amounts()
            .map(|total| total.unwrap_or(0.0))
    }

    /// Sum for the current local day.
    ///
    /// "Today" is read from the clock when a change is emitted, so an idle
    /// subscription keeps showing the previous day's total after midnight
    /// until the next write. [`LiveQuery::current`] projects again and so
    /// reads the clock at call time.
    pub fn observe_today_total(&self) -> LiveQuery<f64> {
        self.store
            .observe_all()
            .map(|list| aggregate::today_total(&list))
    }

    /// Per-day totals over the full record set, keyed `YYYY-MM-DD`.
    ///
    /// Not windowed; chart consumers slice with [`aggregate::last_days`].
    pub fn observe_daily_totals(&self) -> LiveQuery<DailyTotals> {
        self.store
            .observe_all()
            .map(|list| aggregate::daily_totals(&list))
    }

    pub fn observe_category_totals(&self) -> LiveQuery<CategoryTotals> {
        self.store
            .observe_all()
            .map(|list| aggregate::category_totals(&list))
    }
}
