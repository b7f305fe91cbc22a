//! Fixed-frequency leases described by term, payment and frequency instead of
//! an explicit payment calendar.
//!
//! The payment records are synthesized and then run through the same engine
//! as stored payments.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::LeaseScheduleError;
use crate::lease::{AccountingStandard, LeaseClassification, LeaseId, LeaseTerms};
use crate::payments::PaymentRecord;
use crate::schedule::{generate_schedule_at_cadence, GeneratedSchedule, PaymentCadence};
use crate::types::{ComputationOutput, Money, Percent};
use crate::LeaseScheduleResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedFrequencyLease {
    pub commencement_date: NaiveDate,
    pub lease_term_months: u32,
    /// Amount of each payment
    pub periodic_payment: Money,
    #[serde(default)]
    pub payment_frequency: PaymentCadence,
    #[serde(default)]
    pub classification: LeaseClassification,
    /// Annual rate in percent
    pub incremental_borrowing_rate: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<Percent>,
    #[serde(default)]
    pub initial_direct_costs: Money,
    #[serde(default)]
    pub prepaid_rent: Money,
    #[serde(default)]
    pub lease_incentives: Money,
    #[serde(default)]
    pub residual_value: Money,
}

impl FixedFrequencyLease {
    /// Term months divided by the months in one payment period, truncated.
    pub fn period_count(&self) -> u32 {
        self.lease_term_months / self.payment_frequency.months_per_period()
    }

    /// One record per period; period `k` falls due `k` payment intervals
    /// after commencement.
    pub fn synthesize_payments(&self) -> LeaseScheduleResult<Vec<PaymentRecord>> {
        let n = self.period_count();
        if n == 0 {
            return Err(LeaseScheduleError::InvalidLeaseTerm(format!(
                "{} month term yields no {:?} payment periods",
                self.lease_term_months, self.payment_frequency
            )));
        }
        if self.periodic_payment <= Decimal::ZERO {
            return Err(LeaseScheduleError::InvalidInput {
                field: "periodic_payment".into(),
                reason: "Payment amount must be positive".into(),
            });
        }
        let step = self.payment_frequency.months_per_period();
        (1..=n)
            .map(|k| {
                let due = self.add_months(k * step)?;
                Ok(PaymentRecord::new(self.periodic_payment, due))
            })
            .collect()
    }

    /// Lease terms with the end date at commencement plus the full term.
    pub fn terms(&self) -> LeaseScheduleResult<LeaseTerms> {
        Ok(LeaseTerms {
            commencement_date: self.commencement_date,
            end_date: self.add_months(self.lease_term_months)?,
            classification: self.classification,
            incremental_borrowing_rate: self.incremental_borrowing_rate,
            discount_rate: self.discount_rate,
            initial_direct_costs: self.initial_direct_costs,
            prepaid_rent: self.prepaid_rent,
            lease_incentives: self.lease_incentives,
            residual_value: self.residual_value,
        })
    }

    fn add_months(&self, months: u32) -> LeaseScheduleResult<NaiveDate> {
        self.commencement_date
            .checked_add_months(Months::new(months))
            .ok_or_else(|| {
                LeaseScheduleError::InvalidLeaseTerm(format!(
                    "date out of range {months} months after {}",
                    self.commencement_date
                ))
            })
    }
}

/// Rates are taken at the declared frequency, so one-period leases are not
/// mistaken for monthly ones.
pub fn generate_fixed_frequency(
    lease_id: LeaseId,
    lease: &FixedFrequencyLease,
    standard: AccountingStandard,
    config: &EngineConfig,
) -> LeaseScheduleResult<ComputationOutput<GeneratedSchedule>> {
    let payments = lease.synthesize_payments()?;
    let terms = lease.terms()?;
    generate_schedule_at_cadence(
        lease_id,
        &terms,
        payments,
        standard,
        lease.payment_frequency,
        config,
    )
}
