//! `check-schedule`: print the latest assignment and its milestone goals.

use std::fmt::Write;

use focuslock_store::{PlannerStore, StoreError};

/// Render the latest assignment as the report printed by `check-schedule`.
pub async fn latest_schedule_report(store: &dyn PlannerStore) -> Result<String, StoreError> {
    let Some(assignment) = store.latest_assignment().await? else {
        return Ok("No assignments found\n".to_string());
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Latest assignment: {} (ID: {})",
        assignment.name, assignment.id
    );

    let milestones = store.list_milestones(&assignment.id).await?;
    if milestones.is_empty() {
        out.push_str("No milestones found\n");
        return Ok(out);
    }

    let _ = writeln!(out, "Found {} milestones:", milestones.len());
    for m in &milestones {
        let _ = writeln!(out, "  - Task: {}", m.task);
        let _ = writeln!(out, "    Period: {} to {}", m.period_start, m.period_end);
        let _ = writeln!(out, "    Cumulative Goal: {} hours", m.cumulative_goal);
    }
    Ok(out)
}
