//! Packages amortization output into the persisted summary and entry batch.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

use crate::lease::{AccountingStandard, LeaseId};
use crate::schedule::amortization::{Amortization, AmortizationMethod, ScheduleEntry};
use crate::schedule::measurement::InitialMeasurement;
use crate::types::Money;

/// Sums over the stored (non-initial) entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub total_payments: Money,
    pub total_interest: Money,
    /// Amortization under ASC 842, depreciation under IFRS 16
    pub total_amortization: Money,
}

/// Schedule summary record, one per lease per standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub lease_id: LeaseId,
    pub standard: AccountingStandard,
    pub method: AmortizationMethod,
    pub initial_rou_asset: Money,
    pub initial_lease_liability: Money,
    #[serde(flatten)]
    pub totals: ScheduleTotals,
    /// JSON-safe copy of the working entries: `{ "entries": [...], "payment_count": n }`
    pub schedule_data: Value,
}

/// A summary and its stored entries, written together or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBatch {
    pub schedule: Schedule,
    /// Periods 1..=n; the period-0 row is never stored
    pub entries: Vec<ScheduleEntry>,
}

pub fn sum_totals(entries: &[ScheduleEntry]) -> ScheduleTotals {
    entries
        .iter()
        .filter(|e| !e.is_initial())
        .fold(ScheduleTotals::default(), |mut acc, e| {
            acc.total_payments += e.lease_payment;
            acc.total_interest += e.interest_expense;
            acc.total_amortization += e.amortization;
            acc
        })
}

fn decimal_to_json(value: Decimal) -> Value {
    value
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Decimals become JSON numbers and dates ISO-8601 strings. The typed entry
/// is left untouched.
pub fn json_safe_entry(entry: &ScheduleEntry) -> Value {
    let mut map = Map::new();
    map.insert("period".into(), json!(entry.period));
    map.insert(
        "period_date".into(),
        Value::String(entry.period_date.format("%Y-%m-%d").to_string()),
    );
    let amounts = [
        ("lease_payment", entry.lease_payment),
        ("interest_expense", entry.interest_expense),
        ("principal_reduction", entry.principal_reduction),
        ("lease_liability_beginning", entry.lease_liability_beginning),
        ("lease_liability_ending", entry.lease_liability_ending),
        ("rou_asset_beginning", entry.rou_asset_beginning),
        ("amortization", entry.amortization),
        ("rou_asset_ending", entry.rou_asset_ending),
        ("total_expense", entry.total_expense),
    ];
    for (key, value) in amounts {
        map.insert(key.into(), decimal_to_json(value));
    }
    Value::Object(map)
}

pub fn schedule_payload(working_entries: &[ScheduleEntry], payment_count: usize) -> Value {
    let entries: Vec<Value> = working_entries.iter().map(json_safe_entry).collect();
    json!({
        "entries": entries,
        "payment_count": payment_count,
    })
}

pub fn assemble(
    lease_id: LeaseId,
    initial: &InitialMeasurement,
    amortization: &Amortization,
) -> ScheduleBatch {
    let totals = sum_totals(&amortization.entries);
    let schedule_data = schedule_payload(&amortization.working_entries(), amortization.period_count());

    ScheduleBatch {
        schedule: Schedule {
            lease_id,
            standard: amortization.method.standard(),
            method: amortization.method,
            initial_rou_asset: initial.rou_asset,
            initial_lease_liability: initial.lease_liability,
            totals,
            schedule_data,
        },
        entries: amortization.entries.clone(),
    }
}
