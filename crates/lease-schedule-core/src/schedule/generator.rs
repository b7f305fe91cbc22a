//! End-to-end schedule generation for one lease under one standard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::lease::{AccountingStandard, LeaseId, LeaseTerms};
use crate::payments::{load_payment_schedule, prepare_payments, PaymentRecord};
use crate::schedule::amortization::{amortize, AmortizationInput, AmortizationMethod};
use crate::schedule::assembler::{assemble, ScheduleBatch};
use crate::schedule::measurement::{measure_initial, InitialMeasurement};
use crate::schedule::present_value::present_value;
use crate::schedule::rate::{derive_period_rate, period_rate_at, PaymentCadence, PeriodRate};
use crate::store::PaymentStore;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LeaseScheduleResult;

/// Result of a generation run: the derived inputs plus the batch to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    pub period_rate: PeriodRate,
    pub present_value: Money,
    pub initial: InitialMeasurement,
    pub batch: ScheduleBatch,
}

/// Generate a schedule from an explicit payment list.
///
/// Payments are validated and sorted by due date before use. The returned
/// batch is not persisted; see [`crate::service::ScheduleService`] for the
/// stored lifecycle.
#[tracing::instrument(skip(terms, payments, standard, config), fields(standard = %standard))]
pub fn generate_schedule(
    lease_id: LeaseId,
    terms: &LeaseTerms,
    payments: Vec<PaymentRecord>,
    standard: AccountingStandard,
    config: &EngineConfig,
) -> LeaseScheduleResult<ComputationOutput<GeneratedSchedule>> {
    let start = Instant::now();
    terms.validate()?;
    config.validate()?;
    let payments = prepare_payments(lease_id, payments)?;
    run(start, lease_id, terms, &payments, standard, None, config)
}

/// Generate a schedule whose payment cadence is already known.
///
/// The periodic rate is the annual rate divided by `cadence` instead of the
/// cadence inferred from the due dates, which matters for calendars too short
/// to infer from (a single annual payment).
#[tracing::instrument(skip(terms, payments, standard, config), fields(standard = %standard))]
pub fn generate_schedule_at_cadence(
    lease_id: LeaseId,
    terms: &LeaseTerms,
    payments: Vec<PaymentRecord>,
    standard: AccountingStandard,
    cadence: PaymentCadence,
    config: &EngineConfig,
) -> LeaseScheduleResult<ComputationOutput<GeneratedSchedule>> {
    let start = Instant::now();
    terms.validate()?;
    config.validate()?;
    let payments = prepare_payments(lease_id, payments)?;
    run(start, lease_id, terms, &payments, standard, Some(cadence), config)
}

/// Generate a schedule from the payments held in `store`.
#[tracing::instrument(skip(store, terms, standard, config), fields(standard = %standard))]
pub fn generate_from_store<S: PaymentStore + ?Sized>(
    store: &S,
    lease_id: LeaseId,
    terms: &LeaseTerms,
    standard: AccountingStandard,
    config: &EngineConfig,
) -> LeaseScheduleResult<ComputationOutput<GeneratedSchedule>> {
    let start = Instant::now();
    terms.validate()?;
    config.validate()?;
    let payments = load_payment_schedule(store, lease_id)?;
    run(start, lease_id, terms, &payments, standard, None, config)
}

/// `payments` must already be non-empty and ordered by due date. Without a
/// declared cadence it is inferred from the calendar.
fn run(
    start: Instant,
    lease_id: LeaseId,
    terms: &LeaseTerms,
    payments: &[PaymentRecord],
    standard: AccountingStandard,
    cadence: Option<PaymentCadence>,
    config: &EngineConfig,
) -> LeaseScheduleResult<ComputationOutput<GeneratedSchedule>> {
    let settings = config.settings(standard);
    let mut warnings = payment_calendar_warnings(terms, payments);

    let annual_rate = terms.annual_rate(standard);
    let period_rate = match cadence {
        Some(cadence) => period_rate_at(cadence, annual_rate),
        None => derive_period_rate(payments, annual_rate, &config.cadence),
    };
    if period_rate.annual_rate.is_zero() {
        warnings.push("Discount rate is zero: liability equals the undiscounted payments".into());
    }

    let residual = terms.residual();
    let pv = present_value(payments, period_rate.periodic_rate, residual, settings.precision)?;
    tracing::debug!(lease_id, %pv, "present value of lease payments");

    let initial = measure_initial(pv, terms);
    if initial.rou_asset < Decimal::ZERO {
        warnings.push(format!(
            "Initial ROU asset is negative ({}): lease incentives exceed liability plus costs",
            initial.rou_asset
        ));
    }

    let method = AmortizationMethod::for_lease(standard, terms.classification);
    let terminal_liability = residual.unwrap_or(Decimal::ZERO);
    let amortization = amortize(
        method,
        &AmortizationInput {
            payments,
            initial,
            periodic_rate: period_rate.periodic_rate,
            commencement_date: terms.commencement_date,
            initial_direct_costs: terms.initial_direct_costs,
            precision: settings.precision,
        },
    )?;

    if let Some(last) = amortization.entries.last() {
        let liability_gap = (last.lease_liability_ending - terminal_liability).abs();
        if liability_gap > settings.terminal_tolerance {
            warnings.push(format!(
                "Final lease liability {} differs from expected {} by more than {}",
                last.lease_liability_ending, terminal_liability, settings.terminal_tolerance
            ));
        }
        if last.rou_asset_ending > settings.terminal_tolerance {
            warnings.push(format!(
                "Final ROU asset {} is not fully amortized",
                last.rou_asset_ending
            ));
        }
    }

    let batch = assemble(lease_id, &initial, &amortization);
    tracing::info!(
        lease_id,
        standard = standard.tag(),
        periods = amortization.period_count(),
        "generated lease schedule"
    );

    let assumptions = json!({
        "lease_id": lease_id,
        "standard": standard,
        "classification": terms.classification,
        "commencement_date": terms.commencement_date,
        "end_date": terms.end_date,
        "payment_count": payments.len(),
        "precision": settings.precision,
    });
    let output = GeneratedSchedule {
        period_rate,
        present_value: pv,
        initial,
        batch,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        method.description(),
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn payment_calendar_warnings(terms: &LeaseTerms, payments: &[PaymentRecord]) -> Vec<String> {
    let mut warnings = Vec::new();
    let early = payments
        .iter()
        .filter(|p| p.due_date < terms.commencement_date)
        .count();
    if early > 0 {
        warnings.push(format!(
            "{early} payment(s) fall due before the commencement date {}",
            terms.commencement_date
        ));
    }
    let late = payments
        .iter()
        .filter(|p| p.due_date > terms.end_date)
        .count();
    if late > 0 {
        warnings.push(format!(
            "{late} payment(s) fall due after the end date {}",
            terms.end_date
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeaseScheduleError;
    use crate::lease::LeaseClassification;
    use chrono::{Months, NaiveDate};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn terms(classification: LeaseClassification) -> LeaseTerms {
        LeaseTerms {
            commencement_date: start(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            classification,
            incremental_borrowing_rate: dec!(6),
            discount_rate: None,
            initial_direct_costs: Decimal::ZERO,
            prepaid_rent: Decimal::ZERO,
            lease_incentives: Decimal::ZERO,
            residual_value: Decimal::ZERO,
        }
    }

    fn monthly(count: u32, amount: Money) -> Vec<PaymentRecord> {
        (0..count)
            .map(|i| PaymentRecord::new(amount, start() + Months::new(i)))
            .collect()
    }

    #[test]
    fn test_twelve_month_finance_lease() {
        let out = generate_schedule(
            1,
            &terms(LeaseClassification::Finance),
            monthly(12, dec!(1000)),
            AccountingStandard::Asc842,
            &EngineConfig::default(),
        )
        .unwrap();
        let g = &out.result;
        assert_eq!(g.present_value, dec!(11618.93));
        assert_eq!(g.initial.rou_asset, g.initial.lease_liability);
        assert_eq!(g.batch.entries.len(), 12);
        assert_eq!(g.batch.schedule.totals.total_payments, dec!(12000));
        let last = g.batch.entries.last().unwrap();
        assert!(last.lease_liability_ending <= dec!(0.01));
        assert!(last.rou_asset_ending <= dec!(0.01));
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    }

    #[test]
    fn test_payload_carries_initial_row_for_asc842_only() {
        let asc = generate_schedule(
            1,
            &terms(LeaseClassification::Operating),
            monthly(3, dec!(100)),
            AccountingStandard::Asc842,
            &EngineConfig::default(),
        )
        .unwrap();
        let ifrs = generate_schedule(
            1,
            &terms(LeaseClassification::Operating),
            monthly(3, dec!(100)),
            AccountingStandard::Ifrs16,
            &EngineConfig::default(),
        )
        .unwrap();
        let asc_rows = asc.result.batch.schedule.schedule_data["entries"]
            .as_array()
            .map(|a| a.len());
        let ifrs_rows = ifrs.result.batch.schedule.schedule_data["entries"]
            .as_array()
            .map(|a| a.len());
        assert_eq!(asc_rows, Some(4));
        assert_eq!(ifrs_rows, Some(3));
        assert_eq!(asc.result.batch.entries.len(), 3);
        assert_eq!(ifrs.result.batch.schedule.method, AmortizationMethod::Ifrs16);
    }

    #[test]
    fn test_warnings_for_zero_rate_and_calendar_outliers() {
        let mut t = terms(LeaseClassification::Finance);
        t.incremental_borrowing_rate = Decimal::ZERO;
        let mut payments = monthly(3, dec!(100));
        payments.push(PaymentRecord::new(dec!(100), NaiveDate::from_ymd_opt(2023, 12, 1).unwrap()));
        payments.push(PaymentRecord::new(dec!(100), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()));
        let out = generate_schedule(
            1,
            &t,
            payments,
            AccountingStandard::Asc842,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(out.result.present_value, dec!(500));
        assert!(out.warnings.iter().any(|w| w.contains("zero")));
        assert!(out.warnings.iter().any(|w| w.contains("before the commencement")));
        assert!(out.warnings.iter().any(|w| w.contains("after the end date")));
    }

    #[test]
    fn test_final_rounding_drift_is_reported_not_absorbed() {
        // 48 x 1000 at 12%: the last interest charge stays round(990.13 * 1%)
        // and the 0.03 left on the liability exceeds the 0.01 tolerance.
        let mut t = terms(LeaseClassification::Operating);
        t.incremental_borrowing_rate = dec!(12);
        t.end_date = NaiveDate::from_ymd_opt(2027, 12, 31).unwrap();
        let out = generate_schedule(
            1,
            &t,
            monthly(48, dec!(1000)),
            AccountingStandard::Asc842,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(out.result.present_value, dec!(37973.96));
        let last = out.result.batch.entries.last().unwrap();
        assert_eq!(last.interest_expense, dec!(9.90));
        assert_eq!(last.lease_liability_ending, dec!(0.03));
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("Final lease liability 0.03")));
    }

    #[test]
    fn test_declared_cadence_overrides_inference() {
        let mut t = terms(LeaseClassification::Finance);
        t.end_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let payments = vec![PaymentRecord::new(dec!(1000), t.end_date)];
        let out = generate_schedule_at_cadence(
            1,
            &t,
            payments,
            AccountingStandard::Asc842,
            PaymentCadence::Annual,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(out.result.period_rate.periodic_rate, dec!(0.06));
        // 1000 / 1.06 = 943.396...
        assert_eq!(out.result.present_value, dec!(943.40));
    }

    #[test]
    fn test_invalid_term_rejected_before_payments() {
        let mut t = terms(LeaseClassification::Finance);
        t.end_date = t.commencement_date;
        let err = generate_schedule(
            1,
            &t,
            Vec::new(),
            AccountingStandard::Asc842,
            &EngineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LeaseScheduleError::InvalidLeaseTerm(_)));
    }

    #[test]
    fn test_no_payments() {
        let err = generate_schedule(
            9,
            &terms(LeaseClassification::Finance),
            Vec::new(),
            AccountingStandard::Ifrs16,
            &EngineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LeaseScheduleError::NoPaymentsFound { lease_id: 9 }));
    }
}
