use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use lease_schedule_core::config::EngineConfig;
use lease_schedule_core::lease::LeaseId;
use lease_schedule_core::legacy::{generate_fixed_frequency, FixedFrequencyLease};

use super::schedule::report_output;
use super::StandardArg;
use crate::input;

/// Arguments for fixed-frequency schedule generation
#[derive(Args)]
pub struct LegacyScheduleArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Accounting standard to generate under
    #[arg(long, value_enum, default_value = "asc842")]
    pub standard: StandardArg,
}

#[derive(Debug, Deserialize)]
pub struct LegacyScheduleRequest {
    #[serde(default = "default_lease_id")]
    pub lease_id: LeaseId,
    #[serde(flatten)]
    pub lease: FixedFrequencyLease,
}

fn default_lease_id() -> LeaseId {
    1
}

pub fn run_legacy_schedule(
    args: LegacyScheduleArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: LegacyScheduleRequest =
        input::read_request(args.input.as_deref(), "fixed-frequency schedule generation")?;
    let output = generate_fixed_frequency(request.lease_id, &request.lease, args.standard.into(), config)?;
    report_output(output)
}
