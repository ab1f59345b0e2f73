use async_trait::async_trait;
use focuslock_core::types::{Assignment, Milestone, NewAssignment, NewMilestone, RecordId};

use crate::error::StoreError;

/// Table-oriented persistence used by the planner.
///
/// Implementations are shared across requests behind an `Arc`, so they must
/// be safe for concurrent use. No method retries on failure.
#[async_trait]
pub trait PlannerStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Insert an assignment and return the created row (with its new id).
    /// Returns `NotCreated` when the backend reports no row.
    async fn insert_assignment(&self, new: &NewAssignment) -> Result<Assignment, StoreError>;

    async fn get_assignment(&self, id: &RecordId) -> Result<Option<Assignment>, StoreError>;

    /// The assignment with the highest id, if any.
    async fn latest_assignment(&self) -> Result<Option<Assignment>, StoreError>;

    async fn insert_milestone(&self, new: &NewMilestone) -> Result<Milestone, StoreError>;

    /// All milestones of an assignment in creation (id) order.
    async fn list_milestones(&self, assignment_id: &RecordId)
        -> Result<Vec<Milestone>, StoreError>;

    /// Overwrite one milestone's cumulative goal.
    async fn update_cumulative_goal(
        &self,
        milestone_id: &RecordId,
        goal: u32,
    ) -> Result<(), StoreError>;
}
