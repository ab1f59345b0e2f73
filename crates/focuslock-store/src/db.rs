use rusqlite::{Connection, Result};

/// Initialise the planner tables. Safe to call on every startup (idempotent).
///
/// Column names mirror the Supabase tables so rows decode into the same
/// record types regardless of backend.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_assignments_table(conn)?;
    create_milestones_table(conn)?;
    Ok(())
}

fn create_assignments_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS assignments (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            deadline     TEXT NOT NULL,
            total_hours  REAL NOT NULL,
            created_at   TEXT NOT NULL
        );",
    )
}

fn create_milestones_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS milestones (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            assignment_id    INTEGER NOT NULL REFERENCES assignments(id),
            task             TEXT NOT NULL,
            deliverable      TEXT NOT NULL DEFAULT '',
            period_start     TEXT NOT NULL,
            period_end       TEXT NOT NULL,
            cumulative_goal  INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_milestones_assignment
            ON milestones(assignment_id);",
    )
}
