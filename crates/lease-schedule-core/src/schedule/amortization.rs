//! Period-by-period amortization of the lease liability and ROU asset.
//!
//! One loop drives all three variants. Each period: record beginning balances,
//! reduce the liability by the payment, accrue interest, compute the asset
//! reduction, then clamp both ending balances at zero. The variants differ
//! only in the interest base and the asset-reduction rule, both selected by
//! matching on [`AmortizationMethod`]:
//!
//! | Method           | Interest base           | Asset reduction                       |
//! |------------------|-------------------------|---------------------------------------|
//! | ASC 842 finance  | post-payment balance    | straight-line, final period remainder |
//! | ASC 842 operating| beginning balance       | straight-line expense less interest   |
//! | IFRS 16          | beginning balance       | straight-line, final period remainder |

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LeaseScheduleError;
use crate::lease::{AccountingStandard, LeaseClassification};
use crate::payments::PaymentRecord;
use crate::schedule::measurement::InitialMeasurement;
use crate::time_value::round_money;
use crate::types::{Money, Precision, Rate};
use crate::LeaseScheduleResult;

/// Decimal places of the operating-lease straight-line expense.
const STRAIGHT_LINE_EXPENSE_DP: Precision = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmortizationMethod {
    Asc842Finance,
    Asc842Operating,
    Ifrs16,
}

impl AmortizationMethod {
    /// IFRS 16 has a single lessee model, so classification only matters for
    /// ASC 842.
    pub fn for_lease(standard: AccountingStandard, classification: LeaseClassification) -> Self {
        match (standard, classification) {
            (AccountingStandard::Ifrs16, _) => AmortizationMethod::Ifrs16,
            (AccountingStandard::Asc842, LeaseClassification::Finance) => {
                AmortizationMethod::Asc842Finance
            }
            (AccountingStandard::Asc842, LeaseClassification::Operating) => {
                AmortizationMethod::Asc842Operating
            }
        }
    }

    pub fn standard(&self) -> AccountingStandard {
        match self {
            AmortizationMethod::Asc842Finance | AmortizationMethod::Asc842Operating => {
                AccountingStandard::Asc842
            }
            AmortizationMethod::Ifrs16 => AccountingStandard::Ifrs16,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AmortizationMethod::Asc842Finance => {
                "ASC 842 finance lease: effective interest on post-payment liability, straight-line ROU amortization"
            }
            AmortizationMethod::Asc842Operating => {
                "ASC 842 operating lease: single straight-line lease cost, ROU amortization as plug"
            }
            AmortizationMethod::Ifrs16 => {
                "IFRS 16: effective interest on beginning liability, straight-line ROU depreciation"
            }
        }
    }

    /// Balance the period's interest accrues on. Callers floor it at zero, so a
    /// finance post-payment balance below zero accrues nothing.
    fn interest_base(&self, beginning: Money, post_payment: Money) -> Money {
        match self {
            AmortizationMethod::Asc842Finance => post_payment,
            AmortizationMethod::Asc842Operating | AmortizationMethod::Ifrs16 => beginning,
        }
    }

    fn asset_rule(
        &self,
        payments: &[PaymentRecord],
        initial: &InitialMeasurement,
        initial_direct_costs: Money,
        precision: Precision,
    ) -> AssetRule {
        let n = Decimal::from(payments.len() as u64);
        match self {
            AmortizationMethod::Asc842Finance | AmortizationMethod::Ifrs16 => {
                AssetRule::StraightLine {
                    per_period: round_money(initial.rou_asset / n, precision),
                }
            }
            AmortizationMethod::Asc842Operating => {
                let total_cost: Money =
                    payments.iter().map(|p| p.amount).sum::<Money>() + initial_direct_costs;
                AssetRule::ExpensePlug {
                    straight_line_expense: round_money(total_cost / n, STRAIGHT_LINE_EXPENSE_DP),
                }
            }
        }
    }

    /// ASC 842 schedules carry a period-0 initial measurement row.
    fn has_initial_row(&self) -> bool {
        self.standard() == AccountingStandard::Asc842
    }
}

#[derive(Debug, Clone, Copy)]
enum AssetRule {
    StraightLine { per_period: Money },
    ExpensePlug { straight_line_expense: Money },
}

impl AssetRule {
    /// Asset reduction for a period, floored at zero and capped at the
    /// remaining balance. The final period always takes the remainder.
    fn reduction(&self, is_final: bool, beginning_asset: Money, interest: Money) -> Money {
        let remaining = beginning_asset.max(Decimal::ZERO);
        if is_final {
            return remaining;
        }
        let raw = match self {
            AssetRule::StraightLine { per_period } => *per_period,
            AssetRule::ExpensePlug {
                straight_line_expense,
            } => *straight_line_expense - interest,
        };
        raw.max(Decimal::ZERO).min(remaining)
    }

    fn total_expense(&self, interest: Money, reduction: Money) -> Money {
        match self {
            AssetRule::StraightLine { .. } => interest + reduction,
            AssetRule::ExpensePlug {
                straight_line_expense,
            } => *straight_line_expense,
        }
    }
}

/// One row of a lease schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Period number; 0 is the initial measurement row
    pub period: u32,
    pub period_date: NaiveDate,
    pub lease_payment: Money,
    pub interest_expense: Money,
    pub principal_reduction: Money,
    pub lease_liability_beginning: Money,
    pub lease_liability_ending: Money,
    pub rou_asset_beginning: Money,
    /// ROU amortization (depreciation under IFRS 16)
    pub amortization: Money,
    pub rou_asset_ending: Money,
    pub total_expense: Money,
}

impl ScheduleEntry {
    pub fn is_initial(&self) -> bool {
        self.period == 0
    }

    fn initial(date: NaiveDate, initial: &InitialMeasurement) -> Self {
        ScheduleEntry {
            period: 0,
            period_date: date,
            lease_payment: Decimal::ZERO,
            interest_expense: Decimal::ZERO,
            principal_reduction: Decimal::ZERO,
            lease_liability_beginning: initial.lease_liability,
            lease_liability_ending: initial.lease_liability,
            rou_asset_beginning: initial.rou_asset,
            amortization: Decimal::ZERO,
            rou_asset_ending: initial.rou_asset,
            total_expense: Decimal::ZERO,
        }
    }
}

/// Everything the loop needs for one schedule.
#[derive(Debug, Clone)]
pub struct AmortizationInput<'a> {
    /// Payments ordered by due date, one per period
    pub payments: &'a [PaymentRecord],
    pub initial: InitialMeasurement,
    pub periodic_rate: Rate,
    pub commencement_date: NaiveDate,
    pub initial_direct_costs: Money,
    pub precision: Precision,
}

/// Output of the amortization loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amortization {
    pub method: AmortizationMethod,
    /// Period-0 row (ASC 842 only); never stored and never totalled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_entry: Option<ScheduleEntry>,
    /// Periods 1..=n
    pub entries: Vec<ScheduleEntry>,
}

impl Amortization {
    /// Entries as held in memory, including the period-0 row when present.
    pub fn working_entries(&self) -> Vec<ScheduleEntry> {
        self.initial_entry
            .iter()
            .chain(self.entries.iter())
            .cloned()
            .collect()
    }

    pub fn period_count(&self) -> usize {
        self.entries.len()
    }
}

pub fn amortize(
    method: AmortizationMethod,
    input: &AmortizationInput<'_>,
) -> LeaseScheduleResult<Amortization> {
    let n = input.payments.len();
    if n == 0 {
        return Err(LeaseScheduleError::InvalidLeaseTerm(
            "schedule requires at least one payment period".into(),
        ));
    }

    let rule = method.asset_rule(
        input.payments,
        &input.initial,
        input.initial_direct_costs,
        input.precision,
    );

    let mut liability = input.initial.lease_liability;
    let mut asset = input.initial.rou_asset;
    let mut entries = Vec::with_capacity(n);

    for (i, payment) in input.payments.iter().enumerate() {
        let period = (i + 1) as u32;
        let is_final = i + 1 == n;

        let liability_beginning = liability;
        let asset_beginning = asset;

        let post_payment = liability_beginning - payment.amount;
        let base = method
            .interest_base(liability_beginning, post_payment)
            .max(Decimal::ZERO);
        let interest = round_money(base * input.periodic_rate, input.precision);
        let liability_ending = post_payment + interest;

        let reduction = rule.reduction(is_final, asset_beginning, interest);
        let asset_ending = asset_beginning - reduction;

        // Rounding drift is absorbed here, not in the interest charge
        liability = liability_ending.max(Decimal::ZERO);
        asset = asset_ending.max(Decimal::ZERO);

        entries.push(ScheduleEntry {
            period,
            period_date: payment.due_date,
            lease_payment: payment.amount,
            interest_expense: interest,
            principal_reduction: payment.amount,
            lease_liability_beginning: liability_beginning,
            lease_liability_ending: liability,
            rou_asset_beginning: asset_beginning,
            amortization: reduction,
            rou_asset_ending: asset,
            total_expense: rule.total_expense(interest, reduction),
        });
    }

    let initial_entry = if method.has_initial_row() {
        Some(ScheduleEntry::initial(input.commencement_date, &input.initial))
    } else {
        None
    };

    Ok(Amortization {
        method,
        initial_entry,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn monthly(count: u32, amount: Money) -> Vec<PaymentRecord> {
        (0..count)
            .map(|i| PaymentRecord::new(amount, start() + Months::new(i)))
            .collect()
    }

    fn input<'a>(payments: &'a [PaymentRecord], pv: Money, precision: Precision) -> AmortizationInput<'a> {
        AmortizationInput {
            payments,
            initial: InitialMeasurement {
                lease_liability: pv,
                rou_asset: pv,
            },
            periodic_rate: dec!(0.005),
            commencement_date: start(),
            initial_direct_costs: Decimal::ZERO,
            precision,
        }
    }

    #[test]
    fn test_method_selection() {
        use AccountingStandard::*;
        use LeaseClassification::*;
        assert_eq!(AmortizationMethod::for_lease(Asc842, Finance), AmortizationMethod::Asc842Finance);
        assert_eq!(AmortizationMethod::for_lease(Asc842, Operating), AmortizationMethod::Asc842Operating);
        assert_eq!(AmortizationMethod::for_lease(Ifrs16, Finance), AmortizationMethod::Ifrs16);
        assert_eq!(AmortizationMethod::for_lease(Ifrs16, Operating), AmortizationMethod::Ifrs16);
    }

    #[test]
    fn test_finance_accrues_on_post_payment_balance() {
        let payments = monthly(12, dec!(1000));
        let a = amortize(AmortizationMethod::Asc842Finance, &input(&payments, dec!(11618.93), 2)).unwrap();
        let first = &a.entries[0];
        // (11618.93 - 1000) * 0.005 = 53.09465
        assert_eq!(first.interest_expense, dec!(53.09));
        assert_eq!(first.principal_reduction, dec!(1000));
        assert_eq!(first.lease_liability_ending, dec!(10672.02));
        // 11618.93 / 12 = 968.244...
        assert_eq!(first.amortization, dec!(968.24));
        assert_eq!(first.total_expense, dec!(1021.33));
    }

    #[test]
    fn test_finance_final_period_clamps_liability_and_takes_asset_remainder() {
        let payments = monthly(12, dec!(1000));
        let a = amortize(AmortizationMethod::Asc842Finance, &input(&payments, dec!(11618.93), 2)).unwrap();
        let last = a.entries.last().unwrap();
        assert_eq!(last.lease_liability_beginning, dec!(938.61));
        // Post-payment balance is negative: no interest, ending floored at zero
        assert_eq!(last.interest_expense, Decimal::ZERO);
        assert_eq!(last.lease_liability_ending, Decimal::ZERO);
        assert_eq!(last.amortization, dec!(968.29));
        assert_eq!(last.rou_asset_ending, Decimal::ZERO);
    }

    #[test]
    fn test_operating_accrues_on_beginning_balance_with_plug() {
        let payments = monthly(12, dec!(1000));
        let a = amortize(AmortizationMethod::Asc842Operating, &input(&payments, dec!(11618.93), 2)).unwrap();
        let first = &a.entries[0];
        assert_eq!(first.interest_expense, dec!(58.09));
        assert_eq!(first.amortization, dec!(941.91));
        assert_eq!(first.lease_liability_ending, dec!(10677.02));
        for e in &a.entries {
            assert_eq!(e.total_expense, dec!(1000.00));
        }
        let last = a.entries.last().unwrap();
        assert_eq!(last.interest_expense, dec!(4.98));
        assert_eq!(last.amortization, dec!(995.02));
        assert_eq!(last.lease_liability_ending, Decimal::ZERO);
        assert_eq!(last.rou_asset_ending, Decimal::ZERO);
    }

    #[test]
    fn test_operating_plug_floors_at_zero() {
        // A straight-line cost below the first period's interest cannot
        // produce negative amortization.
        let payments = vec![
            PaymentRecord::new(dec!(10), start()),
            PaymentRecord::new(dec!(10), start() + Months::new(1)),
        ];
        let mut inp = input(&payments, dec!(5000), 2);
        inp.periodic_rate = dec!(0.10);
        let a = amortize(AmortizationMethod::Asc842Operating, &inp).unwrap();
        assert_eq!(a.entries[0].amortization, Decimal::ZERO);
        assert_eq!(a.entries[0].rou_asset_ending, dec!(5000));
        assert_eq!(a.entries[1].rou_asset_ending, Decimal::ZERO);
    }

    #[test]
    fn test_ifrs16_three_decimal_interest() {
        let payments = monthly(12, dec!(1000));
        let a = amortize(AmortizationMethod::Ifrs16, &input(&payments, dec!(11618.932), 3)).unwrap();
        let first = &a.entries[0];
        // 11618.932 * 0.005 = 58.09466
        assert_eq!(first.interest_expense, dec!(58.095));
        assert_eq!(first.amortization, dec!(968.244));
        assert_eq!(first.total_expense, dec!(1026.339));
        let last = a.entries.last().unwrap();
        assert_eq!(last.lease_liability_ending, Decimal::ZERO);
        assert_eq!(last.rou_asset_ending, Decimal::ZERO);
        assert_eq!(last.amortization, dec!(968.248));
    }

    #[test]
    fn test_initial_row_only_for_asc842() {
        let payments = monthly(3, dec!(100));
        let asc = amortize(AmortizationMethod::Asc842Finance, &input(&payments, dec!(297.02), 2)).unwrap();
        let init = asc.initial_entry.as_ref().unwrap();
        assert!(init.is_initial());
        assert_eq!(init.period_date, start());
        assert_eq!(init.lease_liability_ending, dec!(297.02));
        assert_eq!(init.interest_expense, Decimal::ZERO);
        assert_eq!(asc.working_entries().len(), 4);
        assert_eq!(asc.period_count(), 3);

        let ifrs = amortize(AmortizationMethod::Ifrs16, &input(&payments, dec!(297.02), 3)).unwrap();
        assert!(ifrs.initial_entry.is_none());
        assert_eq!(ifrs.working_entries().len(), 3);
    }

    #[test]
    fn test_single_period_takes_full_asset() {
        let payments = monthly(1, dec!(5000));
        let a = amortize(AmortizationMethod::Ifrs16, &input(&payments, dec!(4975.124), 3)).unwrap();
        assert_eq!(a.entries.len(), 1);
        assert_eq!(a.entries[0].amortization, dec!(4975.124));
        assert_eq!(a.entries[0].rou_asset_ending, Decimal::ZERO);
        assert_eq!(a.entries[0].lease_liability_ending, Decimal::ZERO);
    }

    #[test]
    fn test_residual_liability_left_outstanding() {
        // Two payments of 100 at 10% plus a residual of 121 discounted from
        // period 2: PV = 90.91 + 82.64 + 100 = 273.55
        let payments = monthly(2, dec!(100));
        let mut inp = input(&payments, dec!(273.55), 2);
        inp.periodic_rate = dec!(0.10);
        let a = amortize(AmortizationMethod::Ifrs16, &inp).unwrap();
        let last = a.entries.last().unwrap();
        assert_eq!(last.interest_expense, dec!(20.09));
        assert_eq!(last.lease_liability_ending, dec!(121));
        assert_eq!(last.rou_asset_ending, Decimal::ZERO);
    }

    #[test]
    fn test_final_interest_is_rounded_charge_and_drift_is_left() {
        // 48 x 1000 at 1%: the last beginning balance is 990.13, so the final
        // charge is 9.90 and the 0.03 of accumulated rounding stays visible.
        let payments = monthly(48, dec!(1000));
        let mut inp = input(&payments, dec!(37973.96), 2);
        inp.periodic_rate = dec!(0.01);
        let a = amortize(AmortizationMethod::Asc842Operating, &inp).unwrap();
        let last = a.entries.last().unwrap();
        assert_eq!(last.lease_liability_beginning, dec!(990.13));
        assert_eq!(last.interest_expense, dec!(9.90));
        assert_eq!(last.lease_liability_ending, dec!(0.03));
        assert_eq!(last.rou_asset_ending, Decimal::ZERO);
    }

    #[test]
    fn test_negative_drift_is_clamped_without_touching_interest() {
        let payments = monthly(48, dec!(1000));
        let mut inp = input(&payments, dec!(41598.819), 3);
        inp.periodic_rate = dec!(0.006);
        let a = amortize(AmortizationMethod::Ifrs16, &inp).unwrap();
        let last = a.entries.last().unwrap();
        // 994.033 * 0.006 = 5.964198; 994.033 - 1000 + 5.964 = -0.003
        assert_eq!(last.interest_expense, dec!(5.964));
        assert_eq!(last.lease_liability_ending, Decimal::ZERO);
    }

    #[test]
    fn test_finance_negative_base_accrues_no_interest() {
        let payments = monthly(12, dec!(1000));
        let mut inp = input(&payments, dec!(11999.22), 2);
        inp.periodic_rate = dec!(0.00001);
        let a = amortize(AmortizationMethod::Asc842Finance, &inp).unwrap();
        let last = a.entries.last().unwrap();
        assert_eq!(last.lease_liability_beginning, dec!(999.88));
        assert_eq!(last.interest_expense, Decimal::ZERO);
        assert_eq!(last.lease_liability_ending, Decimal::ZERO);
    }

    #[test]
    fn test_large_gap_is_not_treated_as_rounding() {
        // Payments far below the accruing interest leave the liability growing
        let payments = monthly(2, dec!(10));
        let mut inp = input(&payments, dec!(5000), 2);
        inp.periodic_rate = dec!(0.10);
        let a = amortize(AmortizationMethod::Asc842Operating, &inp).unwrap();
        assert_eq!(a.entries[1].interest_expense, dec!(549.00));
        assert_eq!(a.entries[1].lease_liability_ending, dec!(6029.00));
    }

    #[test]
    fn test_empty_payment_list_is_invalid_term() {
        let payments: Vec<PaymentRecord> = Vec::new();
        let err = amortize(AmortizationMethod::Ifrs16, &input(&payments, dec!(0), 3)).unwrap_err();
        assert!(matches!(err, LeaseScheduleError::InvalidLeaseTerm(_)));
    }
}
