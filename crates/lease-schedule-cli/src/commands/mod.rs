pub mod cadence;
pub mod legacy;
pub mod present_value;
pub mod schedule;

use clap::ValueEnum;
use lease_schedule_core::lease::AccountingStandard;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StandardArg {
    Asc842,
    Ifrs16,
}

impl From<StandardArg> for AccountingStandard {
    fn from(arg: StandardArg) -> Self {
        match arg {
            StandardArg::Asc842 => AccountingStandard::Asc842,
            StandardArg::Ifrs16 => AccountingStandard::Ifrs16,
        }
    }
}
