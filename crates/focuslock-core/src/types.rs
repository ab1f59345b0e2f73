use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque record identifier assigned by the store.
///
/// Supabase tables use integer identity columns while other backends may hand
/// out text keys, so both shapes are accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        // Path segments arrive as text; keep numeric ids numeric so filters
        // and foreign keys match the column type.
        match s.parse::<i64>() {
            Ok(n) => RecordId::Int(n),
            Err(_) => RecordId::Text(s.to_string()),
        }
    }
}

/// A persisted assignment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: RecordId,
    pub name: String,
    /// Timestamp text as supplied by the client (ISO-8601).
    pub deadline: String,
    pub total_hours: f64,
}

/// Fields needed to create an assignment; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub name: String,
    pub deadline: String,
    pub total_hours: f64,
}

/// A persisted milestone row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: RecordId,
    pub assignment_id: RecordId,
    pub task: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deliverable: String,
    pub period_start: String,
    pub period_end: String,
    /// Hours that should be done once this milestone's period ends.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cumulative_goal: u32,
}

// Nullable columns come back as JSON null from PostgREST.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields needed to create a milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMilestone {
    pub assignment_id: RecordId,
    pub task: String,
    pub deliverable: String,
    pub period_start: String,
    pub period_end: String,
    pub cumulative_goal: u32,
}
