// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod coordinator;
pub mod db;
pub mod engine;
pub mod live;
pub mod models;
pub mod sqlite;
pub mod store;
pub mod utils;

pub use coordinator::{Coordinator, ExpenseState};
pub use engine::Aggregator;
pub use live::LiveQuery;
pub use models::{Expense, ExpenseEvent};
pub use sqlite::SqliteStore;
pub use store::{RecordStore, StoreFault, StoreState};
