use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lease_schedule_core::config::EngineConfig;
use lease_schedule_core::payments::{prepare_payments, PaymentRecord};
use lease_schedule_core::schedule::rate::average_gap_days;
use lease_schedule_core::schedule::{infer_cadence, PaymentCadence};
use rust_decimal::Decimal;

use crate::input;

/// Arguments for cadence inference
#[derive(Args)]
pub struct CadenceArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CadenceRequest {
    pub payments: Vec<PaymentRecord>,
}

#[derive(Debug, Serialize)]
pub struct CadenceReport {
    pub cadence: PaymentCadence,
    pub periods_per_year: u32,
    pub average_gap_days: Option<Decimal>,
    pub payment_count: usize,
}

pub fn run_cadence(args: CadenceArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let request: CadenceRequest = input::read_request(args.input.as_deref(), "cadence inference")?;
    let payments = prepare_payments(0, request.payments)?;
    let dates: Vec<_> = payments.iter().map(|p| p.due_date).collect();
    let cadence = infer_cadence(&dates, &config.cadence);
    let report = CadenceReport {
        cadence,
        periods_per_year: cadence.periods_per_year(),
        average_gap_days: average_gap_days(&dates).map(|d| d.round_dp(2)),
        payment_count: payments.len(),
    };
    Ok(serde_json::json!({ "result": report }))
}
