use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;

use lease_schedule_core::config::EngineConfig;
use lease_schedule_core::lease::AccountingStandard;
use lease_schedule_core::payments::{prepare_payments, PaymentRecord};
use lease_schedule_core::schedule::{derive_period_rate, present_value, PeriodRate};
use lease_schedule_core::types::{percent_to_rate, with_metadata, Money, Percent};

use super::StandardArg;
use crate::input;

/// Arguments for a present value calculation
#[derive(Args)]
pub struct PresentValueArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Standard whose rounding precision applies
    #[arg(long, value_enum, default_value = "asc842")]
    pub standard: StandardArg,
}

#[derive(Debug, Deserialize)]
pub struct PresentValueRequest {
    /// Annual discount rate in percent
    pub annual_rate: Percent,
    pub payments: Vec<PaymentRecord>,
    #[serde(default)]
    pub residual_value: Option<Money>,
}

#[derive(Debug, Serialize)]
pub struct PresentValueReport {
    pub present_value: Money,
    #[serde(flatten)]
    pub period_rate: PeriodRate,
    pub payment_count: usize,
}

pub fn run_present_value(
    args: PresentValueArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let request: PresentValueRequest = input::read_request(args.input.as_deref(), "present value")?;
    let standard: AccountingStandard = args.standard.into();
    let precision = config.settings(standard).precision;

    let payments = prepare_payments(0, request.payments)?;
    let period_rate = derive_period_rate(&payments, percent_to_rate(request.annual_rate), &config.cadence);
    let pv = present_value(&payments, period_rate.periodic_rate, request.residual_value, precision)?;

    let report = PresentValueReport {
        present_value: pv,
        period_rate,
        payment_count: payments.len(),
    };
    let assumptions = json!({ "standard": standard, "precision": precision });
    let output = with_metadata(
        "Present value of lease payments, first payment one period out",
        &assumptions,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        report,
    );
    Ok(serde_json::to_value(output)?)
}
