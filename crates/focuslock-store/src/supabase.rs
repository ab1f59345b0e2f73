use async_trait::async_trait;
use focuslock_core::config::SupabaseConfig;
use focuslock_core::types::{Assignment, Milestone, NewAssignment, NewMilestone, RecordId};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::{error::StoreError, store::PlannerStore};

const ASSIGNMENTS: &str = "assignments";
const MILESTONES: &str = "milestones";

/// Supabase backend speaking PostgREST (`{url}/rest/v1/{table}`).
pub struct SupabaseStore {
    client: reqwest::Client,
    rest_url: String,
    key: String,
}

impl SupabaseStore {
    pub fn new(url: &str, key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            key,
        }
    }

    pub fn from_config(config: &SupabaseConfig) -> Self {
        Self::new(&config.url, config.key.clone())
    }

    /// Base request for `table` with the project key applied both ways
    /// Supabase expects it.
    fn request(&self, method: Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
    }

    /// Send and decode a PostgREST row array. Non-2xx replies become `Api`.
    async fn rows<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let resp = builder.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %text, "Supabase API error");
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        resp.json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

fn eq(id: &RecordId) -> String {
    format!("eq.{id}")
}

#[async_trait]
impl PlannerStore for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn insert_assignment(&self, new: &NewAssignment) -> Result<Assignment, StoreError> {
        debug!(name = %new.name, "inserting assignment");
        let builder = self
            .request(Method::POST, ASSIGNMENTS)
            .header("Prefer", "return=representation")
            .json(new);
        self.rows::<Assignment>(builder)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotCreated { table: ASSIGNMENTS })
    }

    async fn get_assignment(&self, id: &RecordId) -> Result<Option<Assignment>, StoreError> {
        let builder = self
            .request(Method::GET, ASSIGNMENTS)
            .query(&[("select", "*".to_string()), ("id", eq(id)), ("limit", "1".to_string())]);
        Ok(self.rows::<Assignment>(builder).await?.into_iter().next())
    }

    async fn latest_assignment(&self) -> Result<Option<Assignment>, StoreError> {
        let builder = self
            .request(Method::GET, ASSIGNMENTS)
            .query(&[("select", "*"), ("order", "id.desc"), ("limit", "1")]);
        Ok(self.rows::<Assignment>(builder).await?.into_iter().next())
    }

    async fn insert_milestone(&self, new: &NewMilestone) -> Result<Milestone, StoreError> {
        debug!(assignment_id = %new.assignment_id, task = %new.task, "inserting milestone");
        let builder = self
            .request(Method::POST, MILESTONES)
            .header("Prefer", "return=representation")
            .json(new);
        self.rows::<Milestone>(builder)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotCreated { table: MILESTONES })
    }

    async fn list_milestones(
        &self,
        assignment_id: &RecordId,
    ) -> Result<Vec<Milestone>, StoreError> {
        let builder = self.request(Method::GET, MILESTONES).query(&[
            ("select", "*".to_string()),
            ("assignment_id", eq(assignment_id)),
            ("order", "id.asc".to_string()),
        ]);
        self.rows(builder).await
    }

    async fn update_cumulative_goal(
        &self,
        milestone_id: &RecordId,
        goal: u32,
    ) -> Result<(), StoreError> {
        let builder = self
            .request(Method::PATCH, MILESTONES)
            .header("Prefer", "return=representation")
            .query(&[("id", eq(milestone_id))])
            .json(&json!({ "cumulative_goal": goal }));
        let updated: Vec<serde_json::Value> = self.rows(builder).await?;
        if updated.is_empty() {
            return Err(StoreError::NotFound {
                table: MILESTONES,
                id: milestone_id.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Exercises the client against an in-process fake of the PostgREST
    //! endpoints, covering just the filters this store sends.

    use super::*;
    use axum::{
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const KEY: &str = "test-service-key";

    #[derive(Default)]
    struct FakeDb {
        tables: Mutex<HashMap<String, Vec<Value>>>,
        /// When set, every insert answers with an empty representation.
        swallow_inserts: bool,
    }

    type Reply = (StatusCode, Json<Value>);

    fn authorised(headers: &HeaderMap) -> bool {
        let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
        let bearer = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        apikey == Some(KEY) && bearer == Some(KEY)
    }

    fn row_matches(row: &Value, params: &HashMap<String, String>) -> bool {
        ["id", "assignment_id"].iter().all(|col| match params.get(*col) {
            Some(filter) => {
                let want = filter.strip_prefix("eq.").unwrap_or(filter);
                row[*col].to_string().trim_matches('"') == want
            }
            None => true,
        })
    }

    async fn select(
        State(db): State<Arc<FakeDb>>,
        Path(table): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Reply {
        if !authorised(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad key"})));
        }
        let tables = db.tables.lock().unwrap();
        let mut rows: Vec<Value> = tables
            .get(&table)
            .map(|rows| rows.iter().filter(|r| row_matches(r, &params)).cloned().collect())
            .unwrap_or_default();
        if params.get("order").map(String::as_str) == Some("id.desc") {
            rows.reverse();
        }
        if let Some(limit) = params.get("limit").and_then(|l| l.parse().ok()) {
            rows.truncate(limit);
        }
        (StatusCode::OK, Json(Value::Array(rows)))
    }

    async fn insert(
        State(db): State<Arc<FakeDb>>,
        Path(table): Path<String>,
        headers: HeaderMap,
        Json(mut body): Json<Value>,
    ) -> Reply {
        if !authorised(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad key"})));
        }
        if db.swallow_inserts {
            return (StatusCode::CREATED, Json(json!([])));
        }
        let mut tables = db.tables.lock().unwrap();
        let rows = tables.entry(table).or_default();
        body["id"] = json!(rows.len() as i64 + 1);
        rows.push(body.clone());
        (StatusCode::CREATED, Json(json!([body])))
    }

    async fn update(
        State(db): State<Arc<FakeDb>>,
        Path(table): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        Json(patch): Json<Value>,
    ) -> Reply {
        let mut tables = db.tables.lock().unwrap();
        let mut updated = Vec::new();
        for row in tables.entry(table).or_default().iter_mut() {
            if row_matches(row, &params) {
                for (k, v) in patch.as_object().unwrap() {
                    row[k] = v.clone();
                }
                updated.push(row.clone());
            }
        }
        (StatusCode::OK, Json(Value::Array(updated)))
    }

    async fn spawn_fake(db: Arc<FakeDb>) -> String {
        let app = Router::new()
            .route("/rest/v1/{table}", get(select).post(insert).patch(update))
            .with_state(db);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/")
    }

    fn essay() -> NewAssignment {
        NewAssignment {
            name: "Essay".to_string(),
            deadline: "2023-10-20T23:59".to_string(),
            total_hours: 10.0,
        }
    }

    #[tokio::test]
    async fn round_trip_through_postgrest() {
        let url = spawn_fake(Arc::new(FakeDb::default())).await;
        let store = SupabaseStore::new(&url, KEY.to_string());

        let a = store.insert_assignment(&essay()).await.unwrap();
        assert_eq!(a.id, RecordId::Int(1));
        assert_eq!(store.get_assignment(&a.id).await.unwrap(), Some(a.clone()));

        for task in ["Research", "Draft"] {
            store
                .insert_milestone(&NewMilestone {
                    assignment_id: a.id.clone(),
                    task: task.to_string(),
                    deliverable: String::new(),
                    period_start: "2023-10-13T14:00".to_string(),
                    period_end: "16:00".to_string(),
                    cumulative_goal: 0,
                })
                .await
                .unwrap();
        }

        let milestones = store.list_milestones(&a.id).await.unwrap();
        assert_eq!(milestones.len(), 2);
        store
            .update_cumulative_goal(&milestones[1].id, 10)
            .await
            .unwrap();
        let milestones = store.list_milestones(&a.id).await.unwrap();
        assert_eq!(milestones[1].cumulative_goal, 10);
        assert_eq!(milestones[0].cumulative_goal, 0);
    }

    #[tokio::test]
    async fn latest_assignment_orders_by_id_desc() {
        let url = spawn_fake(Arc::new(FakeDb::default())).await;
        let store = SupabaseStore::new(&url, KEY.to_string());
        assert!(store.latest_assignment().await.unwrap().is_none());

        store.insert_assignment(&essay()).await.unwrap();
        let mut second = essay();
        second.name = "Lab report".to_string();
        store.insert_assignment(&second).await.unwrap();

        let latest = store.latest_assignment().await.unwrap().unwrap();
        assert_eq!(latest.name, "Lab report");
    }

    #[tokio::test]
    async fn empty_representation_means_not_created() {
        let db = Arc::new(FakeDb {
            swallow_inserts: true,
            ..FakeDb::default()
        });
        let url = spawn_fake(db).await;
        let store = SupabaseStore::new(&url, KEY.to_string());
        let err = store.insert_assignment(&essay()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotCreated { table: "assignments" }));
    }

    #[tokio::test]
    async fn rejected_key_surfaces_api_error() {
        let url = spawn_fake(Arc::new(FakeDb::default())).await;
        let store = SupabaseStore::new(&url, "wrong-key".to_string());
        let err = store.insert_assignment(&essay()).await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let url = spawn_fake(Arc::new(FakeDb::default())).await;
        let store = SupabaseStore::new(&url, KEY.to_string());
        let err = store
            .update_cumulative_goal(&RecordId::Int(5), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { table: "milestones", .. }));
    }
}
