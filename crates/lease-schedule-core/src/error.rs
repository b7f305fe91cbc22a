use thiserror::Error;

use crate::lease::{AccountingStandard, LeaseId};

#[derive(Debug, Error)]
pub enum LeaseScheduleError {
    #[error("No payments found for lease {lease_id}: create payments before generating a schedule")]
    NoPaymentsFound { lease_id: LeaseId },

    #[error("Invalid lease term: {0}")]
    InvalidLeaseTerm(String),

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("{standard} schedule already exists for lease {lease_id}. Delete it first to regenerate.")]
    ScheduleAlreadyExists {
        lease_id: LeaseId,
        standard: AccountingStandard,
    },

    #[error("{standard} schedule not found for lease {lease_id}")]
    ScheduleNotFound {
        lease_id: LeaseId,
        standard: AccountingStandard,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LeaseScheduleError {
    fn from(e: serde_json::Error) -> Self {
        LeaseScheduleError::SerializationError(e.to_string())
    }
}
