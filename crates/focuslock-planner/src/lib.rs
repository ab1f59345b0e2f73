//! `focuslock-planner`: turns an assignment definition into stored
//! milestones with cumulative hour goals.
//!
//! # Flow
//!
//! 1. [`service::save_assignment`] validates the request and inserts the
//!    assignment.
//! 2. Each raw milestone period goes through [`period::parse_period`];
//!    unparseable milestones are skipped.
//! 3. [`service::apply_schedule`] reads the stored milestones back and writes
//!    the goals computed by [`schedule::generate_schedule`].
//!
//! | Total hours | Milestones | Goals            |
//! |-------------|------------|------------------|
//! | 10          | 4          | 3, 5, 8, 10      |
//! | 7           | 1          | 7                |

pub mod error;
pub mod period;
pub mod schedule;
pub mod service;

pub use error::{PeriodError, SaveError, ScheduleError};
pub use period::{parse_period, Period};
pub use schedule::{generate_schedule, MAX_GOAL_HOURS};
pub use service::{
    apply_schedule, save_assignment, RawMilestone, SaveAssignmentRequest, SaveOutcome,
    ScheduleOutcome,
};
