// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Live queries over the store's published snapshots.
//!
//! A store publishes one immutable [`StoreState`] per committed mutation on a
//! `tokio::sync::watch` channel. A [`LiveQuery`] is a receiver on that
//! channel plus a projection; every consumer holds its own handle, so many
//! views can observe the same store independently. The channel only keeps
//! the latest value: a burst of writes may reach a slow consumer as a single
//! emission of the final state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::store::{StoreFault, StoreState};

/// What a store publishes after each mutation or reload.
pub type Published = Result<Arc<StoreState>, StoreFault>;

type Projection<T> = Arc<dyn Fn(&StoreState) -> T + Send + Sync>;

/// A subscription yielding an initial value and then one value per observed
/// change. Dropping it cancels the subscription.
pub struct LiveQuery<T> {
    rx: watch::Receiver<Published>,
    project: Projection<T>,
    primed: bool,
}

impl<T: 'static> LiveQuery<T> {
    pub fn new(
        rx: watch::Receiver<Published>,
        project: impl Fn(&StoreState) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            rx,
            project: Arc::new(project),
            primed: false,
        }
    }

    fn apply(&self, published: &Published) -> Result<T, StoreFault> {
        match published {
            Ok(state) => Ok((self.project)(state)),
            Err(fault) => Err(fault.clone()),
        }
    }

    /// Latest value without waiting. The projection runs on every call, so
    /// clock-dependent views reflect the time of the call.
    pub fn current(&self) -> Result<T, StoreFault> {
        let published = self.rx.borrow().clone();
        self.apply(&published)
    }

    /// Waits for the next value.
    ///
    /// The first call returns the current value immediately. Returns `None`
    /// once the store has been dropped.
    pub async fn next(&mut self) -> Option<Result<T, StoreFault>> {
        if self.primed {
            self.rx.changed().await.ok()?;
        }
        self.primed = true;
        let published = self.rx.borrow_and_update().clone();
        Some(self.apply(&published))
    }

    /// Derives another view from the same subscription.
    pub fn map<U>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> LiveQuery<U>
    where
        U: 'static,
    {
        let inner = self.project;
        LiveQuery {
            rx: self.rx,
            project: Arc::new(move |state: &StoreState| f(inner(state))),
            primed: self.primed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Expense;

    fn state(amounts: &[f64]) -> Published {
        let expenses = amounts
            .iter()
            .enumerate()
            .map(|(i, a)| Expense::draft("x", *a, "Food", 0).with_id(i as i64 + 1))
            .collect::<Vec<_>>();
        Ok(Arc::new(StoreState {
            total: if expenses.is_empty() {
                None
            } else {
                Some(amounts.iter().sum())
            },
            expenses,
            today_total: None,
        }))
    }

    #[tokio::test]
    async fn first_next_is_current_then_waits_for_change() {
        let (tx, rx) = watch::channel(state(&[1.0]));
        let mut q = LiveQuery::new(rx, |s| s.expenses.len());
        assert_eq!(q.next().await, Some(Ok(1)));

        tx.send_replace(state(&[1.0, 2.0]));
        assert_eq!(q.next().await, Some(Ok(2)));

        drop(tx);
        assert_eq!(q.next().await, None);
    }

    #[tokio::test]
    async fn bursts_coalesce_to_latest() {
        let (tx, rx) = watch::channel(state(&[]));
        let mut q = LiveQuery::new(rx, |s| s.total).map(|t| t.unwrap_or(0.0));
        assert_eq!(q.next().await, Some(Ok(0.0)));
        tx.send_replace(state(&[1.0]));
        tx.send_replace(state(&[1.0, 2.0]));
        tx.send_replace(state(&[1.0, 2.0, 3.0]));
        assert_eq!(q.next().await, Some(Ok(6.0)));
        assert_eq!(q.current(), Ok(6.0));
    }

    #[tokio::test]
    async fn faults_do_not_end_the_subscription() {
        let (tx, rx) = watch::channel(state(&[4.0]));
        let mut q = LiveQuery::new(rx, |s| s.expenses.len());
        q.next().await;
        tx.send_replace(Err(StoreFault::Database("disk I/O error".into())));
        assert!(matches!(q.next().await, Some(Err(StoreFault::Database(_)))));
        tx.send_replace(state(&[4.0, 5.0]));
        assert_eq!(q.next().await, Some(Ok(2)));
    }
}
