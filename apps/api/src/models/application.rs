use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_id: Uuid,
    /// Strict match score frozen at apply time. `None` means unscored; 0 is a real score.
    pub match_score: Option<i32>,
    pub status: String,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
}
