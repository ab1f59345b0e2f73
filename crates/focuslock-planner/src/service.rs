use focuslock_core::types::{Assignment, NewAssignment, NewMilestone, RecordId};
use focuslock_core::FocusError;
use focuslock_store::PlannerStore;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    error::{SaveError, ScheduleError},
    period::parse_period,
    schedule::{generate_schedule, MAX_GOAL_HOURS},
};

/// Body of a save request. Required fields are optional here so that a
/// missing one is reported by name instead of as a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveAssignmentRequest {
    pub name: Option<String>,
    pub deadline: Option<String>,
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub milestones: Vec<RawMilestone>,
}

/// A milestone as typed by the user, before its period is parsed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMilestone {
    pub task: Option<String>,
    pub period: Option<String>,
    #[serde(default)]
    pub deliverable: Option<String>,
}

impl SaveAssignmentRequest {
    /// Check the required fields and build the row to insert.
    pub fn validate(&self) -> Result<NewAssignment, FocusError> {
        let name = required_text(self.name.as_deref(), "name")?;
        let deadline = required_text(self.deadline.as_deref(), "deadline")?;
        let total_hours = self
            .total_hours
            .ok_or(FocusError::MissingField {
                field: "total_hours",
            })?;
        if !(total_hours.is_finite() && total_hours > 0.0) {
            return Err(FocusError::InvalidField {
                field: "total_hours",
                reason: format!("must be a positive number, got {total_hours}"),
            });
        }
        if total_hours.ceil() > MAX_GOAL_HOURS {
            return Err(FocusError::InvalidField {
                field: "total_hours",
                reason: format!("must be at most {MAX_GOAL_HOURS}, got {total_hours}"),
            });
        }
        Ok(NewAssignment {
            name: name.to_string(),
            deadline: deadline.to_string(),
            total_hours,
        })
    }
}

fn required_text<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, FocusError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FocusError::MissingField { field }),
    }
}

/// Result of the schedule step. None of these fail the save.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleOutcome {
    /// Every milestone received its goal.
    Applied { goals: Vec<u32> },
    /// Goals were computed but `failed` of the writes did not land.
    Partial { goals: Vec<u32>, failed: usize },
    /// The generator refused its inputs, e.g. no milestones were saved.
    Skipped(ScheduleError),
    /// The assignment or its milestones could not be read back.
    Unavailable(String),
}

/// What a save did, beyond the id returned to the client.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub assignment: Assignment,
    pub milestones_saved: usize,
    pub milestones_skipped: usize,
    pub schedule: ScheduleOutcome,
}

/// Persist an assignment and its milestones, then write cumulative goals.
///
/// Only a validation failure or a failed assignment insert aborts. Steps are
/// not transactional: whatever was written before a later failure stays.
pub async fn save_assignment(
    store: &dyn PlannerStore,
    req: SaveAssignmentRequest,
) -> Result<SaveOutcome, SaveError> {
    let new = req.validate()?;
    let assignment = store.insert_assignment(&new).await?;
    info!(
        assignment_id = %assignment.id,
        name = %assignment.name,
        milestones = req.milestones.len(),
        store = store.name(),
        "assignment created"
    );

    let mut saved = 0;
    for (index, raw) in req.milestones.iter().enumerate() {
        let Some(new_milestone) = prepare_milestone(&assignment.id, index, raw) else {
            continue;
        };
        match store.insert_milestone(&new_milestone).await {
            Ok(m) => {
                debug!(milestone_id = %m.id, task = %m.task, "milestone saved");
                saved += 1;
            }
            Err(e) => {
                warn!(assignment_id = %assignment.id, index, error = %e, "milestone insert failed, skipping");
            }
        }
    }

    let schedule = apply_schedule(store, &assignment.id).await;

    Ok(SaveOutcome {
        milestones_skipped: req.milestones.len() - saved,
        milestones_saved: saved,
        assignment,
        schedule,
    })
}

/// Turn a raw milestone into an insertable row, or log why it is skipped.
fn prepare_milestone(
    assignment_id: &RecordId,
    index: usize,
    raw: &RawMilestone,
) -> Option<NewMilestone> {
    let Some(task) = raw.task.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        warn!(assignment_id = %assignment_id, index, "milestone has no task, skipping");
        return None;
    };
    let Some(raw_period) = raw.period.as_deref() else {
        warn!(assignment_id = %assignment_id, index, task, "milestone has no period, skipping");
        return None;
    };
    let period = match parse_period(raw_period) {
        Ok(p) => p,
        Err(e) => {
            warn!(assignment_id = %assignment_id, index, task, error = %e, "unparseable period, skipping");
            return None;
        }
    };
    Some(NewMilestone {
        assignment_id: assignment_id.clone(),
        task: task.to_string(),
        deliverable: raw.deliverable.clone().unwrap_or_default(),
        period_start: period.start,
        period_end: period.end,
        cumulative_goal: 0,
    })
}

/// Recompute and write the goals of one assignment from what is stored.
///
/// The divisor is the number of milestones actually persisted, not what the
/// client sent. Each goal is written separately; failures are counted and
/// logged.
pub async fn apply_schedule(store: &dyn PlannerStore, assignment_id: &RecordId) -> ScheduleOutcome {
    let assignment = match store.get_assignment(assignment_id).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            warn!(%assignment_id, "assignment missing on read-back, no schedule");
            return ScheduleOutcome::Unavailable(format!("assignment {assignment_id} not found"));
        }
        Err(e) => {
            warn!(%assignment_id, error = %e, "assignment read-back failed, no schedule");
            return ScheduleOutcome::Unavailable(e.to_string());
        }
    };
    let milestones = match store.list_milestones(assignment_id).await {
        Ok(m) => m,
        Err(e) => {
            warn!(%assignment_id, error = %e, "milestone read-back failed, no schedule");
            return ScheduleOutcome::Unavailable(e.to_string());
        }
    };

    let goals = match generate_schedule(assignment.total_hours, milestones.len()) {
        Ok(g) => g,
        Err(e) => {
            info!(%assignment_id, reason = %e, "schedule not generated");
            return ScheduleOutcome::Skipped(e);
        }
    };

    let mut failed = 0;
    for (milestone, goal) in milestones.iter().zip(&goals) {
        if let Err(e) = store.update_cumulative_goal(&milestone.id, *goal).await {
            warn!(%assignment_id, milestone_id = %milestone.id, goal, error = %e, "goal update failed");
            failed += 1;
        }
    }

    if failed == 0 {
        info!(%assignment_id, ?goals, "schedule applied");
        ScheduleOutcome::Applied { goals }
    } else {
        warn!(%assignment_id, failed, total = goals.len(), "schedule partially applied");
        ScheduleOutcome::Partial { goals, failed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> SaveAssignmentRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn validate_accepts_complete_request() {
        let req = request(r#"{"name":" Essay ","deadline":"2023-10-20T23:59","total_hours":10}"#);
        let new = req.validate().unwrap();
        assert_eq!(new.name, "Essay");
        assert_eq!(new.total_hours, 10.0);
        assert!(req.milestones.is_empty());
    }

    #[test]
    fn validate_names_the_missing_field() {
        let err = request(r#"{"name":"Essay","total_hours":10}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: deadline");

        let err = request(r#"{"name":"  ","deadline":"2023-10-20","total_hours":10}"#)
            .validate()
            .unwrap_err();
        assert!(matches!(err, FocusError::MissingField { field: "name" }));

        let err = request(r#"{"name":"Essay","deadline":"2023-10-20"}"#)
            .validate()
            .unwrap_err();
        assert!(matches!(err, FocusError::MissingField { field: "total_hours" }));
    }

    #[test]
    fn validate_rejects_non_positive_hours() {
        let err = request(r#"{"name":"Essay","deadline":"2023-10-20","total_hours":0}"#)
            .validate()
            .unwrap_err();
        assert!(matches!(err, FocusError::InvalidField { field: "total_hours", .. }));
    }

    #[test]
    fn validate_rejects_hours_beyond_goal_range() {
        let err = request(r#"{"name":"Essay","deadline":"2023-10-20","total_hours":5e9}"#)
            .validate()
            .unwrap_err();
        assert!(matches!(err, FocusError::InvalidField { field: "total_hours", .. }));

        let ok = request(r#"{"name":"Essay","deadline":"2023-10-20","total_hours":4294967295}"#)
            .validate()
            .unwrap();
        assert_eq!(ok.total_hours, MAX_GOAL_HOURS);
    }

    #[test]
    fn prepare_milestone_skips_incomplete_entries() {
        let id = RecordId::Int(1);
        let no_task = RawMilestone {
            task: None,
            period: Some("14:00-16:00".into()),
            deliverable: None,
        };
        let bad_period = RawMilestone {
            task: Some("Read".into()),
            period: Some("tomorrow".into()),
            deliverable: None,
        };
        let no_period = RawMilestone {
            task: Some("Read".into()),
            period: None,
            deliverable: None,
        };
        assert!(prepare_milestone(&id, 0, &no_task).is_none());
        assert!(prepare_milestone(&id, 1, &bad_period).is_none());
        assert!(prepare_milestone(&id, 2, &no_period).is_none());
    }

    #[test]
    fn prepare_milestone_normalises_period() {
        let raw = RawMilestone {
            task: Some("Outline".into()),
            period: Some("14:00-2023-10-13T16:00".into()),
            deliverable: Some("outline.md".into()),
        };
        let m = prepare_milestone(&RecordId::Int(9), 0, &raw).unwrap();
        assert_eq!(m.assignment_id, RecordId::Int(9));
        assert_eq!(m.period_start, "2023-10-13T14:00");
        assert_eq!(m.period_end, "2023-10-13T16:00");
        assert_eq!(m.deliverable, "outline.md");
        assert_eq!(m.cumulative_goal, 0);
    }
}
