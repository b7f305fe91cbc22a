pub mod config;
pub mod error;
pub mod lease;
pub mod payments;
pub mod schedule;
pub mod service;
pub mod store;
pub mod time_value;
pub mod types;

#[cfg(feature = "legacy")]
pub mod legacy;

pub use error::LeaseScheduleError;
pub use types::*;

/// Standard result type for all lease-schedule operations
pub type LeaseScheduleResult<T> = Result<T, LeaseScheduleError>;
