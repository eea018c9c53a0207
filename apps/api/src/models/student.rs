use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Stored student profile. Form fields are read fresh at score time;
/// `cv_features` holds the extractor output from the latest CV upload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentProfileRow {
    pub user_id: Uuid,
    pub skills: Vec<String>,
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub experience_years: Option<i32>,
    pub location: Option<String>,
    pub cv_features: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
