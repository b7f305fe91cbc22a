//! Periodic rate derivation from the observed payment calendar.
//!
//! There is no stored payment frequency: the cadence is inferred from the
//! average gap between consecutive due dates, which tolerates irregular
//! calendars (month-end drift, skipped months, holidays).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CadenceThresholds;
use crate::payments::PaymentRecord;
use crate::types::Rate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentCadence {
    #[default]
    Monthly,
    Quarterly,
    Annual,
}

impl PaymentCadence {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentCadence::Monthly => 12,
            PaymentCadence::Quarterly => 4,
            PaymentCadence::Annual => 1,
        }
    }

    pub fn months_per_period(&self) -> u32 {
        12 / self.periods_per_year()
    }
}

/// Periodic rate derived for one schedule generation. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRate {
    pub cadence: PaymentCadence,
    /// Annual rate as a fraction
    pub annual_rate: Rate,
    /// annual_rate / periods_per_year
    pub periodic_rate: Rate,
}

/// Mean of the strictly positive day gaps between consecutive dates.
///
/// Returns `None` with fewer than two dates or when no positive gap exists
/// (e.g. every payment on the same day).
pub fn average_gap_days(dates: &[NaiveDate]) -> Option<Decimal> {
    let gaps: Vec<i64> = dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .filter(|g| *g > 0)
        .collect();
    if gaps.is_empty() {
        return None;
    }
    let total: i64 = gaps.iter().sum();
    Some(Decimal::from(total) / Decimal::from(gaps.len() as u64))
}

/// Bucket a due-date sequence into monthly, quarterly or annual.
pub fn infer_cadence(dates: &[NaiveDate], thresholds: &CadenceThresholds) -> PaymentCadence {
    match average_gap_days(dates) {
        None => PaymentCadence::Monthly,
        Some(avg) if avg <= Decimal::from(thresholds.monthly_max_days) => PaymentCadence::Monthly,
        Some(avg) if avg <= Decimal::from(thresholds.quarterly_max_days) => {
            PaymentCadence::Quarterly
        }
        Some(_) => PaymentCadence::Annual,
    }
}

pub fn derive_period_rate(
    payments: &[PaymentRecord],
    annual_rate: Rate,
    thresholds: &CadenceThresholds,
) -> PeriodRate {
    let dates: Vec<NaiveDate> = payments.iter().map(|p| p.due_date).collect();
    period_rate_at(infer_cadence(&dates, thresholds), annual_rate)
}

/// Periodic rate at a known cadence, without looking at the calendar.
pub fn period_rate_at(cadence: PaymentCadence, annual_rate: Rate) -> PeriodRate {
    let periodic_rate = annual_rate / Decimal::from(cadence.periods_per_year());
    tracing::debug!(?cadence, %annual_rate, %periodic_rate, "derived period rate");
    PeriodRate {
        cadence,
        annual_rate,
        periodic_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn calendar(count: u32, step_months: u32) -> Vec<NaiveDate> {
        (0..count)
            .map(|i| start() + Months::new(i * step_months))
            .collect()
    }

    #[test]
    fn test_single_date_defaults_to_monthly() {
        let t = CadenceThresholds::default();
        assert_eq!(infer_cadence(&[start()], &t), PaymentCadence::Monthly);
        assert_eq!(infer_cadence(&[], &t), PaymentCadence::Monthly);
    }

    #[test]
    fn test_regular_calendars() {
        let t = CadenceThresholds::default();
        assert_eq!(infer_cadence(&calendar(12, 1), &t), PaymentCadence::Monthly);
        assert_eq!(infer_cadence(&calendar(8, 3), &t), PaymentCadence::Quarterly);
        assert_eq!(infer_cadence(&calendar(5, 12), &t), PaymentCadence::Annual);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let t = CadenceThresholds::default();
        let d35 = vec![start(), start() + chrono::Days::new(35)];
        let d36 = vec![start(), start() + chrono::Days::new(36)];
        let d100 = vec![start(), start() + chrono::Days::new(100)];
        let d101 = vec![start(), start() + chrono::Days::new(101)];
        assert_eq!(infer_cadence(&d35, &t), PaymentCadence::Monthly);
        assert_eq!(infer_cadence(&d36, &t), PaymentCadence::Quarterly);
        assert_eq!(infer_cadence(&d100, &t), PaymentCadence::Quarterly);
        assert_eq!(infer_cadence(&d101, &t), PaymentCadence::Annual);
    }

    #[test]
    fn test_irregular_calendar_uses_average_gap() {
        // Gaps of 20, 40 and 30 days average to 30 => monthly
        let dates = vec![
            start(),
            start() + chrono::Days::new(20),
            start() + chrono::Days::new(60),
            start() + chrono::Days::new(90),
        ];
        assert_eq!(average_gap_days(&dates), Some(dec!(30)));
        assert_eq!(
            infer_cadence(&dates, &CadenceThresholds::default()),
            PaymentCadence::Monthly
        );
    }

    #[test]
    fn test_duplicate_dates_are_ignored() {
        let dates = vec![start(), start(), start() + Months::new(3)];
        // The zero gap is dropped, leaving a single quarterly gap
        assert_eq!(
            infer_cadence(&dates, &CadenceThresholds::default()),
            PaymentCadence::Quarterly
        );
        assert_eq!(average_gap_days(&[start(), start()]), None);
    }

    #[test]
    fn test_derive_period_rate_divides_by_cadence() {
        let payments: Vec<PaymentRecord> = calendar(4, 3)
            .into_iter()
            .map(|d| PaymentRecord::new(dec!(100), d))
            .collect();
        let r = derive_period_rate(&payments, dec!(0.08), &CadenceThresholds::default());
        assert_eq!(r.cadence, PaymentCadence::Quarterly);
        assert_eq!(r.periodic_rate, dec!(0.02));

        let single = vec![PaymentRecord::new(dec!(5000), start())];
        let r = derive_period_rate(&single, dec!(0.06), &CadenceThresholds::default());
        assert_eq!(r.periodic_rate, dec!(0.005));
    }

    #[test]
    fn test_declared_cadence_ignores_calendar() {
        let r = period_rate_at(PaymentCadence::Annual, dec!(0.06));
        assert_eq!(r.cadence, PaymentCadence::Annual);
        assert_eq!(r.periodic_rate, dec!(0.06));
        assert_eq!(period_rate_at(PaymentCadence::Quarterly, dec!(0.06)).periodic_rate, dec!(0.015));
    }

    #[test]
    fn test_months_per_period() {
        assert_eq!(PaymentCadence::Monthly.months_per_period(), 1);
        assert_eq!(PaymentCadence::Quarterly.months_per_period(), 3);
        assert_eq!(PaymentCadence::Annual.months_per_period(), 12);
    }
}
