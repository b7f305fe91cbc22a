//! Payment records and the loader that feeds them to the engine.
//!
//! Payments are owned by the payment-management subsystem; the engine only
//! reads them through a [`PaymentStore`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LeaseScheduleError;
use crate::lease::LeaseId;
use crate::store::PaymentStore;
use crate::types::Money;
use crate::LeaseScheduleResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    Scheduled,
    Paid,
}

/// A single lease payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment amount (positive)
    pub amount: Money,
    /// Date the payment falls due
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
}

impl PaymentRecord {
    pub fn new(amount: Money, due_date: NaiveDate) -> Self {
        Self {
            amount,
            due_date,
            status: PaymentStatus::Scheduled,
            paid_date: None,
        }
    }
}

/// Mark a payment as settled on `paid_date`.
pub fn mark_paid(record: &mut PaymentRecord, paid_date: NaiveDate) {
    record.status = PaymentStatus::Paid;
    record.paid_date = Some(paid_date);
}

/// Aggregate position of a lease's payments as of a reporting date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub lease_id: LeaseId,
    pub total_amount: Money,
    pub total_paid: Money,
    pub total_scheduled: Money,
    /// Scheduled payments whose due date is before `as_of`
    pub total_overdue: Money,
    pub payment_count: usize,
}

pub fn summarize_payments(
    lease_id: LeaseId,
    payments: &[PaymentRecord],
    as_of: NaiveDate,
) -> PaymentSummary {
    let mut summary = PaymentSummary {
        lease_id,
        total_amount: Decimal::ZERO,
        total_paid: Decimal::ZERO,
        total_scheduled: Decimal::ZERO,
        total_overdue: Decimal::ZERO,
        payment_count: payments.len(),
    };

    for p in payments {
        summary.total_amount += p.amount;
        match p.status {
            PaymentStatus::Paid => summary.total_paid += p.amount,
            PaymentStatus::Scheduled => {
                summary.total_scheduled += p.amount;
                if p.due_date < as_of {
                    summary.total_overdue += p.amount;
                }
            }
        }
    }

    summary
}

/// Check a payment list and return it ordered by due date.
///
/// The sort is stable, so payments sharing a due date keep their stored order.
pub fn prepare_payments(
    lease_id: LeaseId,
    mut payments: Vec<PaymentRecord>,
) -> LeaseScheduleResult<Vec<PaymentRecord>> {
    if payments.is_empty() {
        return Err(LeaseScheduleError::NoPaymentsFound { lease_id });
    }
    for (i, p) in payments.iter().enumerate() {
        if p.amount <= Decimal::ZERO {
            return Err(LeaseScheduleError::InvalidInput {
                field: format!("payments[{i}].amount"),
                reason: "Payment amount must be positive".into(),
            });
        }
    }
    payments.sort_by_key(|p| p.due_date);
    Ok(payments)
}

/// Load the ordered payment schedule of a lease from `store`.
pub fn load_payment_schedule<S: PaymentStore + ?Sized>(
    store: &S,
    lease_id: LeaseId,
) -> LeaseScheduleResult<Vec<PaymentRecord>> {
    let payments = store.payments_for_lease(lease_id)?;
    tracing::debug!(lease_id, count = payments.len(), "loaded payment records");
    prepare_payments(lease_id, payments)
}
