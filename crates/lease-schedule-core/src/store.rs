//! Storage seams for payments and generated schedules.
//!
//! The engine reads payments and writes schedules only through these traits.
//! [`InMemoryStore`] backs both with `parking_lot` locked maps.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::lease::{AccountingStandard, LeaseId};
use crate::payments::PaymentRecord;
use crate::schedule::{Schedule, ScheduleBatch, ScheduleEntry};
use crate::LeaseScheduleResult;

/// Source of a lease's payment records.
pub trait PaymentStore: Send + Sync {
    /// All payment records of a lease, in storage order.
    fn payments_for_lease(&self, lease_id: LeaseId) -> LeaseScheduleResult<Vec<PaymentRecord>>;
}

/// Persistence of schedule summaries and their entries, keyed by
/// (lease id, standard).
pub trait ScheduleStore: Send + Sync {
    fn find_schedule(
        &self,
        lease_id: LeaseId,
        standard: AccountingStandard,
    ) -> LeaseScheduleResult<Option<Schedule>>;

    /// Write the summary and every entry together. On error nothing is written.
    fn insert_batch(&self, batch: ScheduleBatch) -> LeaseScheduleResult<()>;

    /// Stored entries ordered by period.
    fn entries(
        &self,
        lease_id: LeaseId,
        standard: AccountingStandard,
    ) -> LeaseScheduleResult<Vec<ScheduleEntry>>;

    /// Remove a summary and its entries. Returns `false` if nothing was stored.
    fn delete_schedule(
        &self,
        lease_id: LeaseId,
        standard: AccountingStandard,
    ) -> LeaseScheduleResult<bool>;
}

type ScheduleKey = (LeaseId, AccountingStandard);

#[derive(Debug, Default)]
pub struct InMemoryStore {
    payments: RwLock<HashMap<LeaseId, Vec<PaymentRecord>>>,
    schedules: RwLock<HashMap<ScheduleKey, ScheduleBatch>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_payment(&self, lease_id: LeaseId, payment: PaymentRecord) {
        self.payments.write().entry(lease_id).or_default().push(payment);
    }

    /// Replace every payment of a lease.
    pub fn set_payments(&self, lease_id: LeaseId, payments: Vec<PaymentRecord>) {
        self.payments.write().insert(lease_id, payments);
    }

    pub fn schedule_count(&self) -> usize {
        self.schedules.read().len()
    }
}

impl PaymentStore for InMemoryStore {
    fn payments_for_lease(&self, lease_id: LeaseId) -> LeaseScheduleResult<Vec<PaymentRecord>> {
        Ok(self
            .payments
            .read()
            .get(&lease_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl ScheduleStore for InMemoryStore {
    fn find_schedule(
        &self,
        lease_id: LeaseId,
        standard: AccountingStandard,
    ) -> LeaseScheduleResult<Option<Schedule>> {
        Ok(self
            .schedules
            .read()
            .get(&(lease_id, standard))
            .map(|b| b.schedule.clone()))
    }

    fn insert_batch(&self, mut batch: ScheduleBatch) -> LeaseScheduleResult<()> {
        let key = (batch.schedule.lease_id, batch.schedule.standard);
        batch.entries.sort_by_key(|e| e.period);
        // Single write lock: readers see either no schedule or the whole batch
        self.schedules.write().insert(key, batch);
        Ok(())
    }

    fn entries(
        &self,
        lease_id: LeaseId,
        standard: AccountingStandard,
    ) -> LeaseScheduleResult<Vec<ScheduleEntry>> {
        Ok(self
            .schedules
            .read()
            .get(&(lease_id, standard))
            .map(|b| b.entries.clone())
            .unwrap_or_default())
    }

    fn delete_schedule(
        &self,
        lease_id: LeaseId,
        standard: AccountingStandard,
    ) -> LeaseScheduleResult<bool> {
        Ok(self.schedules.write().remove(&(lease_id, standard)).is_some())
    }
}
