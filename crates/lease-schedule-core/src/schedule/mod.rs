pub mod amortization;
pub mod assembler;
pub mod generator;
pub mod measurement;
pub mod present_value;
pub mod rate;

pub use amortization::{amortize, Amortization, AmortizationInput, AmortizationMethod, ScheduleEntry};
pub use assembler::{assemble, Schedule, ScheduleBatch, ScheduleTotals};
pub use generator::{
    generate_from_store, generate_schedule, generate_schedule_at_cadence, GeneratedSchedule,
};
pub use measurement::{measure_initial, InitialMeasurement};
pub use present_value::present_value;
pub use rate::{derive_period_rate, infer_cadence, period_rate_at, PaymentCadence, PeriodRate};
