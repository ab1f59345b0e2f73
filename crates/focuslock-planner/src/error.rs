use focuslock_core::FocusError;
use focuslock_store::StoreError;
use thiserror::Error;

/// Why a raw period string could not be split into start and end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("period is empty")]
    Empty,

    #[error("period has no '-' separator: {0}")]
    MissingSeparator(String),

    #[error("period has an empty {side} side: {raw}")]
    EmptySide { side: &'static str, raw: String },

    #[error("period has more than one '-' separator: {0}")]
    Ambiguous(String),
}

/// Inputs the schedule generator refuses before doing any arithmetic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("no milestones to schedule")]
    NoMilestones,

    #[error("total hours must be a positive number, got {0}")]
    InvalidTotalHours(f64),
}

/// Failure of the save-then-schedule flow as a whole.
///
/// Only these abort a save; milestone-level problems are logged and skipped.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Request is missing or has an unusable required field.
    #[error(transparent)]
    Invalid(#[from] FocusError),

    /// The assignment itself could not be persisted.
    #[error("could not create assignment: {0}")]
    Store(#[from] StoreError),
}
