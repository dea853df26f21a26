// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64, // 0 until the store assigns one
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub notes: Option<String>,
    pub receipt_image: Option<String>,
    pub timestamp: i64, // epoch millis
}

impl Expense {
    /// A record that has not been persisted yet.
    pub fn draft(
        title: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            amount,
            category: category.into(),
            notes: None,
            receipt_image: None,
            timestamp,
        }
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_receipt(mut self, receipt_image: Option<String>) -> Self {
        self.receipt_image = receipt_image;
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

/// `YYYY-MM-DD` (local day) -> summed amount.
pub type DailyTotals = BTreeMap<String, f64>;

/// Category label -> summed amount.
pub type CategoryTotals = BTreeMap<String, f64>;

/// Outcome notifications raised by write operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExpenseEvent {
    Saved,
    Message(String),
}
