use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lease_schedule_core::config::EngineConfig;
use lease_schedule_core::lease::{LeaseId, LeaseTerms};
use lease_schedule_core::payments::PaymentRecord;
use lease_schedule_core::schedule::{generate_schedule, GeneratedSchedule, PaymentCadence};
use lease_schedule_core::types::{ComputationOutput, Money, Rate};

use super::StandardArg;
use crate::input;

/// Arguments for schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Accounting standard to generate under
    #[arg(long, value_enum, default_value = "asc842")]
    pub standard: StandardArg,
}

/// A lease and its payment calendar.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default = "default_lease_id")]
    pub lease_id: LeaseId,
    pub terms: LeaseTerms,
    pub payments: Vec<PaymentRecord>,
}

fn default_lease_id() -> LeaseId {
    1
}

/// Flat view of a generated schedule for table, csv and minimal output.
#[derive(Debug, Serialize)]
pub struct ScheduleReport {
    pub lease_id: LeaseId,
    pub standard: String,
    pub cadence: PaymentCadence,
    pub periodic_rate: Rate,
    pub initial_lease_liability: Money,
    pub initial_rou_asset: Money,
    pub total_payments: Money,
    pub total_interest: Money,
    pub total_amortization: Money,
    pub entries: Value,
}

impl ScheduleReport {
    pub fn from_generated(g: &GeneratedSchedule) -> Self {
        let s = &g.batch.schedule;
        ScheduleReport {
            lease_id: s.lease_id,
            standard: s.standard.to_string(),
            cadence: g.period_rate.cadence,
            periodic_rate: g.period_rate.periodic_rate,
            initial_lease_liability: s.initial_lease_liability,
            initial_rou_asset: s.initial_rou_asset,
            total_payments: s.totals.total_payments,
            total_interest: s.totals.total_interest,
            total_amortization: s.totals.total_amortization,
            entries: s.schedule_data["entries"].clone(),
        }
    }
}

/// Re-wrap a generation result around its flat report.
pub fn report_output(
    output: ComputationOutput<GeneratedSchedule>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let report = ScheduleReport::from_generated(&output.result);
    let wrapped = ComputationOutput {
        result: report,
        methodology: output.methodology,
        assumptions: output.assumptions,
        warnings: output.warnings,
        metadata: output.metadata,
    };
    Ok(serde_json::to_value(wrapped)?)
}

pub fn run_schedule(
    args: ScheduleArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ScheduleRequest = input::read_request(args.input.as_deref(), "schedule generation")?;
    let output = generate_schedule(
        request.lease_id,
        &request.terms,
        request.payments,
        args.standard.into(),
        config,
    )?;
    report_output(output)
}
