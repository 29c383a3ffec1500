//! Usage lifecycle.
//!
//! Every reservation is one [`UsageHistory`] record in a single ledger,
//! newest first. Records move `waiting → current → completed` and never
//! back; all screens read filtered views of the same ledger.

use crate::error::UsageError;
use crate::types::{PaidOrder, UsageHistory, UsageId, UsageStatus};
use bringin_core::environment::IdGenerator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many completed records the home screen previews
pub const RECENT_COMPLETED: usize = 2;

/// The canonical usage history, most recent first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLedger {
    records: Vec<UsageHistory>,
}

impl UsageLedger {
    /// Wrap existing records (most recent first)
    #[must_use]
    pub const fn new(records: Vec<UsageHistory>) -> Self {
        Self { records }
    }

    /// All records, most recent first
    #[must_use]
    pub fn records(&self) -> &[UsageHistory] {
        &self.records
    }

    /// Look up a record
    #[must_use]
    pub fn get(&self, id: &UsageId) -> Option<&UsageHistory> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Record a paid order as `waiting` and put it at the front.
    ///
    /// The payment instant is both `payment_time` and `visit_date`.
    pub fn create_waiting(
        &mut self,
        order: PaidOrder,
        now: DateTime<Utc>,
        ids: &dyn IdGenerator,
    ) -> &UsageHistory {
        let record = UsageHistory {
            id: UsageId::new(ids.next_id("usage")),
            cafe_name: order.cafe_name,
            cafe_address: order.cafe_address,
            visit_date: now,
            drink_ordered: order.drink_ordered,
            duration_minutes: 0,
            status: UsageStatus::Waiting,
            seat_type: Some(order.seat_type),
            start_time: None,
            payment_time: Some(now),
        };
        tracing::info!(usage = %record.id, cafe = %record.cafe_name, "Usage waiting for arrival");
        self.records.insert(0, record);
        &self.records[0]
    }

    /// Owner confirmed the guest arrived: `waiting → current`, start now.
    ///
    /// # Errors
    ///
    /// - [`UsageError::UnknownRecord`] if no record has `id`
    /// - [`UsageError::IllegalTransition`] unless the record is `waiting`;
    ///   the record is left untouched
    pub fn confirm_arrival(&mut self, id: &UsageId, now: DateTime<Utc>) -> Result<(), UsageError> {
        let record = self.transition(id, UsageStatus::Current)?;
        record.start_time = Some(now);
        tracing::info!(usage = %id, "Usage started");
        Ok(())
    }

    /// Close a running usage: `current → completed`.
    ///
    /// Records the whole minutes since `start_time` as the duration and
    /// returns it.
    ///
    /// # Errors
    ///
    /// - [`UsageError::UnknownRecord`] if no record has `id`
    /// - [`UsageError::IllegalTransition`] unless the record is `current`
    pub fn complete_usage(&mut self, id: &UsageId, now: DateTime<Utc>) -> Result<u32, UsageError> {
        let record = self.transition(id, UsageStatus::Completed)?;
        let started = record.start_time.unwrap_or(record.visit_date);
        let minutes = u32::try_from((now - started).num_minutes().max(0)).unwrap_or(u32::MAX);
        record.duration_minutes = minutes;
        tracing::info!(usage = %id, minutes, "Usage completed");
        Ok(minutes)
    }

    fn transition(
        &mut self,
        id: &UsageId,
        to: UsageStatus,
    ) -> Result<&mut UsageHistory, UsageError> {
        let record = self
            .records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| UsageError::UnknownRecord(id.clone()))?;

        if !record.status.can_become(to) {
            tracing::warn!(usage = %id, from = %record.status, %to, "Usage transition rejected");
            return Err(UsageError::IllegalTransition {
                id: id.clone(),
                from: record.status,
                to,
            });
        }
        record.status = to;
        Ok(record)
    }

    /// Records that are `current` or `waiting` (home-screen highlight)
    pub fn active(&self) -> impl Iterator<Item = &UsageHistory> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, UsageStatus::Current | UsageStatus::Waiting))
    }

    /// Records with exactly `status`
    pub fn with_status(&self, status: UsageStatus) -> impl Iterator<Item = &UsageHistory> {
        self.records.iter().filter(move |r| r.status == status)
    }

    /// Records waiting for the owner's confirmation
    pub fn waiting(&self) -> impl Iterator<Item = &UsageHistory> {
        self.with_status(UsageStatus::Waiting)
    }

    /// Records currently occupying a seat (my-page)
    pub fn current(&self) -> impl Iterator<Item = &UsageHistory> {
        self.with_status(UsageStatus::Current)
    }

    /// Finished records (my-page)
    pub fn completed(&self) -> impl Iterator<Item = &UsageHistory> {
        self.with_status(UsageStatus::Completed)
    }

    /// The `n` most recent finished records (home-screen summary)
    pub fn recent_completed(&self, n: usize) -> impl Iterator<Item = &UsageHistory> {
        self.completed().take(n)
    }
}
