//! Per-standard engine settings.
//!
//! ASC 842 and IFRS 16 round at different precisions; each standard carries
//! its own settings so the two can be tuned and tested independently.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseScheduleError;
use crate::lease::AccountingStandard;
use crate::types::{Money, Precision};
use crate::LeaseScheduleResult;

/// Highest precision accepted for currency rounding.
const MAX_PRECISION: Precision = 10;

/// Rounding behaviour for one accounting standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardSettings {
    /// Decimal places for present value and per-period interest
    pub precision: Precision,
    /// Largest terminal balance still considered fully amortized
    pub terminal_tolerance: Money,
}

impl StandardSettings {
    pub fn asc842() -> Self {
        Self {
            precision: 2,
            terminal_tolerance: dec!(0.01),
        }
    }

    pub fn ifrs16() -> Self {
        Self {
            precision: 3,
            terminal_tolerance: dec!(0.001),
        }
    }
}

impl Default for StandardSettings {
    fn default() -> Self {
        Self::asc842()
    }
}

/// Day-gap boundaries used to bucket a payment calendar into a cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceThresholds {
    /// Average gaps up to this many days are monthly
    pub monthly_max_days: u32,
    /// Average gaps up to this many days are quarterly; anything longer is annual
    pub quarterly_max_days: u32,
}

impl Default for CadenceThresholds {
    fn default() -> Self {
        Self {
            monthly_max_days: 35,
            quarterly_max_days: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub asc842: StandardSettings,
    pub ifrs16: StandardSettings,
    pub cadence: CadenceThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asc842: StandardSettings::asc842(),
            ifrs16: StandardSettings::ifrs16(),
            cadence: CadenceThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn settings(&self, standard: AccountingStandard) -> &StandardSettings {
        match standard {
            AccountingStandard::Asc842 => &self.asc842,
            AccountingStandard::Ifrs16 => &self.ifrs16,
        }
    }

    pub fn validate(&self) -> LeaseScheduleResult<()> {
        for (name, s) in [("asc842", &self.asc842), ("ifrs16", &self.ifrs16)] {
            if s.precision > MAX_PRECISION {
                return Err(LeaseScheduleError::InvalidInput {
                    field: format!("{name}.precision"),
                    reason: format!("Precision must be at most {MAX_PRECISION} decimal places"),
                });
            }
            if s.terminal_tolerance < Decimal::ZERO {
                return Err(LeaseScheduleError::InvalidInput {
                    field: format!("{name}.terminal_tolerance"),
                    reason: "Tolerance cannot be negative".into(),
                });
            }
        }
        if self.cadence.monthly_max_days == 0
            || self.cadence.quarterly_max_days <= self.cadence.monthly_max_days
        {
            return Err(LeaseScheduleError::InvalidInput {
                field: "cadence".into(),
                reason: "Thresholds must satisfy 0 < monthly_max_days < quarterly_max_days".into(),
            });
        }
        Ok(())
    }
}
