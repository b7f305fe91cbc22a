//! Lease record attributes consumed by the schedule engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LeaseScheduleError;
use crate::types::{percent_to_rate, Money, Percent, Rate};
use crate::LeaseScheduleResult;

/// Identifier of the owning lease record.
pub type LeaseId = u64;

/// Accounting standard a schedule is generated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountingStandard {
    #[serde(rename = "ASC842", alias = "asc842")]
    Asc842,
    #[serde(rename = "IFRS16", alias = "ifrs16")]
    Ifrs16,
}

impl AccountingStandard {
    /// Tag persisted alongside every schedule entry.
    pub fn tag(&self) -> &'static str {
        match self {
            AccountingStandard::Asc842 => "ASC842",
            AccountingStandard::Ifrs16 => "IFRS16",
        }
    }
}

impl fmt::Display for AccountingStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountingStandard::Asc842 => write!(f, "ASC 842"),
            AccountingStandard::Ifrs16 => write!(f, "IFRS 16"),
        }
    }
}

/// ASC 842 lessee classification. IFRS 16 has a single lessee model and
/// ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaseClassification {
    Finance,
    #[default]
    Operating,
}

/// Financial attributes of a lease, immutable for one calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseTerms {
    /// Lease commencement date
    pub commencement_date: NaiveDate,
    /// Lease end date (strictly after commencement)
    pub end_date: NaiveDate,
    /// ASC 842 classification
    #[serde(default)]
    pub classification: LeaseClassification,
    /// Annual incremental borrowing rate in percent (6 = 6%)
    pub incremental_borrowing_rate: Percent,
    /// Annual IFRS 16 discount rate in percent; falls back to the IBR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<Percent>,
    #[serde(default)]
    pub initial_direct_costs: Money,
    #[serde(default)]
    pub prepaid_rent: Money,
    /// Lease incentives received from the lessor
    #[serde(default)]
    pub lease_incentives: Money,
    /// Residual value guarantee, discounted from the end of the final period
    #[serde(default)]
    pub residual_value: Money,
}

impl LeaseTerms {
    /// Annual rate for `standard`, as a fraction.
    pub fn annual_rate(&self, standard: AccountingStandard) -> Rate {
        let pct = match standard {
            AccountingStandard::Asc842 => self.incremental_borrowing_rate,
            AccountingStandard::Ifrs16 => self
                .discount_rate
                .unwrap_or(self.incremental_borrowing_rate),
        };
        percent_to_rate(pct)
    }

    /// Residual value, or `None` when there is nothing to discount.
    pub fn residual(&self) -> Option<Money> {
        if self.residual_value > Decimal::ZERO {
            Some(self.residual_value)
        } else {
            None
        }
    }

    pub fn validate(&self) -> LeaseScheduleResult<()> {
        if self.end_date <= self.commencement_date {
            return Err(LeaseScheduleError::InvalidLeaseTerm(format!(
                "end date {} must be after commencement date {}",
                self.end_date, self.commencement_date
            )));
        }
        if self.incremental_borrowing_rate < Decimal::ZERO {
            return Err(LeaseScheduleError::InvalidInput {
                field: "incremental_borrowing_rate".into(),
                reason: "Rate cannot be negative".into(),
            });
        }
        if let Some(rate) = self.discount_rate {
            if rate < Decimal::ZERO {
                return Err(LeaseScheduleError::InvalidInput {
                    field: "discount_rate".into(),
                    reason: "Rate cannot be negative".into(),
                });
            }
        }
        let amounts = [
            ("initial_direct_costs", self.initial_direct_costs),
            ("prepaid_rent", self.prepaid_rent),
            ("lease_incentives", self.lease_incentives),
            ("residual_value", self.residual_value),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(LeaseScheduleError::InvalidInput {
                    field: field.into(),
                    reason: "Amount cannot be negative".into(),
                });
            }
        }
        Ok(())
    }
}
