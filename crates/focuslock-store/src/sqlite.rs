use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use focuslock_core::types::{Assignment, Milestone, NewAssignment, NewMilestone, RecordId};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::{db::init_db, error::StoreError, store::PlannerStore};

/// Local SQLite backend with the same tables as the Supabase project.
///
/// Every call runs synchronously under the connection mutex; statements are
/// single-row and short, so they are not moved to a blocking pool.
pub struct SqliteStore {
    db: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "opening SQLite database");
        Self::new(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::new(Connection::open_in_memory()?)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// SQLite ids are integers; a text id can never match a row.
fn row_key(id: &RecordId) -> Option<i64> {
    match id {
        RecordId::Int(n) => Some(*n),
        RecordId::Text(s) => s.parse().ok(),
    }
}

fn row_to_assignment(row: &Row<'_>) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        id: RecordId::Int(row.get(0)?),
        name: row.get(1)?,
        deadline: row.get(2)?,
        total_hours: row.get(3)?,
    })
}

fn row_to_milestone(row: &Row<'_>) -> rusqlite::Result<Milestone> {
    Ok(Milestone {
        id: RecordId::Int(row.get(0)?),
        assignment_id: RecordId::Int(row.get(1)?),
        task: row.get(2)?,
        deliverable: row.get(3)?,
        period_start: row.get(4)?,
        period_end: row.get(5)?,
        cumulative_goal: row.get(6)?,
    })
}

const ASSIGNMENT_COLUMNS: &str = "id, name, deadline, total_hours";
const MILESTONE_COLUMNS: &str =
    "id, assignment_id, task, deliverable, period_start, period_end, cumulative_goal";

#[async_trait]
impl PlannerStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn insert_assignment(&self, new: &NewAssignment) -> Result<Assignment, StoreError> {
        let db = self.conn();
        let now = chrono::Utc::now().to_rfc3339();
        db.execute(
            "INSERT INTO assignments (name, deadline, total_hours, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![new.name, new.deadline, new.total_hours, now],
        )?;
        let id = db.last_insert_rowid();
        debug!(assignment_id = id, "assignment row inserted");
        Ok(Assignment {
            id: RecordId::Int(id),
            name: new.name.clone(),
            deadline: new.deadline.clone(),
            total_hours: new.total_hours,
        })
    }

    async fn get_assignment(&self, id: &RecordId) -> Result<Option<Assignment>, StoreError> {
        let Some(key) = row_key(id) else {
            return Ok(None);
        };
        let db = self.conn();
        let found = db
            .query_row(
                &format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = ?1"),
                [key],
                row_to_assignment,
            )
            .optional()?;
        Ok(found)
    }

    async fn latest_assignment(&self) -> Result<Option<Assignment>, StoreError> {
        let db = self.conn();
        let found = db
            .query_row(
                &format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments ORDER BY id DESC LIMIT 1"),
                [],
                row_to_assignment,
            )
            .optional()?;
        Ok(found)
    }

    async fn insert_milestone(&self, new: &NewMilestone) -> Result<Milestone, StoreError> {
        let assignment_key = row_key(&new.assignment_id).ok_or_else(|| StoreError::NotFound {
            table: "assignments",
            id: new.assignment_id.to_string(),
        })?;
        let db = self.conn();
        let now = chrono::Utc::now().to_rfc3339();
        db.execute(
            "INSERT INTO milestones
             (assignment_id, task, deliverable, period_start, period_end,
              cumulative_goal, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                assignment_key,
                new.task,
                new.deliverable,
                new.period_start,
                new.period_end,
                new.cumulative_goal,
                now
            ],
        )?;
        let id = db.last_insert_rowid();
        debug!(milestone_id = id, assignment_id = assignment_key, "milestone row inserted");
        Ok(Milestone {
            id: RecordId::Int(id),
            assignment_id: RecordId::Int(assignment_key),
            task: new.task.clone(),
            deliverable: new.deliverable.clone(),
            period_start: new.period_start.clone(),
            period_end: new.period_end.clone(),
            cumulative_goal: new.cumulative_goal,
        })
    }

    async fn list_milestones(
        &self,
        assignment_id: &RecordId,
    ) -> Result<Vec<Milestone>, StoreError> {
        let Some(key) = row_key(assignment_id) else {
            return Ok(Vec::new());
        };
        let db = self.conn();
        let mut stmt = db.prepare(&format!(
            "SELECT {MILESTONE_COLUMNS} FROM milestones
             WHERE assignment_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map([key], row_to_milestone)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    async fn update_cumulative_goal(
        &self,
        milestone_id: &RecordId,
        goal: u32,
    ) -> Result<(), StoreError> {
        let not_found = || StoreError::NotFound {
            table: "milestones",
            id: milestone_id.to_string(),
        };
        let key = row_key(milestone_id).ok_or_else(not_found)?;
        let n = self.conn().execute(
            "UPDATE milestones SET cumulative_goal = ?1 WHERE id = ?2",
            rusqlite::params![goal, key],
        )?;
        if n == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
