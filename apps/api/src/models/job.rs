use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    /// Structured object, JSON-encoded string, or comma-separated string.
    /// Resolved by `matching::requirements`.
    pub requirements: Option<Value>,
    pub required_education: Option<String>,
    pub location: Option<String>,
    pub is_active: bool,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
