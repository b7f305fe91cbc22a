//! Stored schedule lifecycle: generate once, read, delete to regenerate.

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::error::LeaseScheduleError;
use crate::lease::{AccountingStandard, LeaseId, LeaseTerms};
use crate::payments::{summarize_payments, PaymentSummary};
use crate::schedule::{generate_from_store, GeneratedSchedule, Schedule, ScheduleEntry};
use crate::store::{PaymentStore, ScheduleStore};
use crate::types::ComputationOutput;
use crate::LeaseScheduleResult;

pub struct ScheduleService<'a, P: ?Sized, S: ?Sized> {
    payments: &'a P,
    schedules: &'a S,
    config: EngineConfig,
}

impl<'a, P, S> ScheduleService<'a, P, S>
where
    P: PaymentStore + ?Sized,
    S: ScheduleStore + ?Sized,
{
    pub fn new(payments: &'a P, schedules: &'a S, config: EngineConfig) -> Self {
        Self {
            payments,
            schedules,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate and persist the schedule of a lease under `standard`.
    ///
    /// An existing schedule is never overwritten: it must be deleted first.
    pub fn generate(
        &self,
        lease_id: LeaseId,
        terms: &LeaseTerms,
        standard: AccountingStandard,
    ) -> LeaseScheduleResult<ComputationOutput<GeneratedSchedule>> {
        if self.schedules.find_schedule(lease_id, standard)?.is_some() {
            tracing::warn!(lease_id, standard = standard.tag(), "schedule already exists");
            return Err(LeaseScheduleError::ScheduleAlreadyExists { lease_id, standard });
        }
        let output = generate_from_store(self.payments, lease_id, terms, standard, &self.config)?;
        self.schedules.insert_batch(output.result.batch.clone())?;
        Ok(output)
    }

    pub fn schedule(
        &self,
        lease_id: LeaseId,
        standard: AccountingStandard,
    ) -> LeaseScheduleResult<Schedule> {
        self.schedules
            .find_schedule(lease_id, standard)?
            .ok_or(LeaseScheduleError::ScheduleNotFound { lease_id, standard })
    }

    pub fn entries(
        &self,
        lease_id: LeaseId,
        standard: AccountingStandard,
    ) -> LeaseScheduleResult<Vec<ScheduleEntry>> {
        let entries = self.schedules.entries(lease_id, standard)?;
        if entries.is_empty() {
            return Err(LeaseScheduleError::ScheduleNotFound { lease_id, standard });
        }
        Ok(entries)
    }

    pub fn delete(&self, lease_id: LeaseId, standard: AccountingStandard) -> LeaseScheduleResult<()> {
        if self.schedules.delete_schedule(lease_id, standard)? {
            tracing::info!(lease_id, standard = standard.tag(), "deleted lease schedule");
            Ok(())
        } else {
            Err(LeaseScheduleError::ScheduleNotFound { lease_id, standard })
        }
    }

    pub fn payment_summary(
        &self,
        lease_id: LeaseId,
        as_of: NaiveDate,
    ) -> LeaseScheduleResult<PaymentSummary> {
        let payments = self.payments.payments_for_lease(lease_id)?;
        Ok(summarize_payments(lease_id, &payments, as_of))
    }
}
