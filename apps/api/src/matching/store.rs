//! Data access for the matching core. Every query the handlers need lives
//! here so the core itself never touches the pool.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extractor::CvFeatures;
use crate::models::application::ApplicationRow;
use crate::models::job::JobRow;
use crate::models::student::StudentProfileRow;

/// Postgres SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

pub async fn fetch_student_profile(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<Option<StudentProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentProfileRow>("SELECT * FROM student_profiles WHERE user_id = $1")
        .bind(student_id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Active and approved jobs, newest first.
pub async fn fetch_open_jobs(pool: &PgPool) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        "SELECT * FROM jobs WHERE is_active = TRUE AND is_approved = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

/// Persists extractor output on the student's profile and merges the
/// extracted skills into the stored skill list. Creates the profile row if
/// the student has none yet.
pub async fn save_cv_features(
    pool: &PgPool,
    student_id: Uuid,
    features: &CvFeatures,
) -> Result<StudentProfileRow, AppError> {
    let cv_json = serde_json::to_value(features).map_err(anyhow::Error::from)?;

    let row = sqlx::query_as::<_, StudentProfileRow>(
        r#"
        INSERT INTO student_profiles (user_id, skills, cv_features)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE SET
            skills = ARRAY(
                SELECT DISTINCT s FROM unnest(student_profiles.skills || EXCLUDED.skills) AS s
            ),
            cv_features = EXCLUDED.cv_features,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(student_id)
    .bind(&features.skills)
    .bind(&cv_json)
    .fetch_one(pool)
    .await?;

    info!(
        "Saved CV features for student {student_id} ({} skills on profile)",
        row.skills.len()
    );
    Ok(row)
}

pub struct NewApplication<'a> {
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<&'a str>,
    pub match_score: Option<i32>,
}

/// Inserts an application with its frozen match score. A second application
/// by the same student to the same job is a validation error.
pub async fn insert_application(
    pool: &PgPool,
    params: NewApplication<'_>,
) -> Result<ApplicationRow, AppError> {
    let NewApplication {
        student_id,
        job_id,
        cover_letter,
        match_score,
    } = params;

    let already_applied: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM applications WHERE student_id = $1 AND job_id = $2)",
    )
    .bind(student_id)
    .bind(job_id)
    .fetch_one(pool)
    .await?;
    if already_applied {
        return Err(duplicate_application());
    }

    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (id, student_id, job_id, match_score, status, cover_letter)
        VALUES ($1, $2, $3, $4, 'pending', $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(student_id)
    .bind(job_id)
    .bind(match_score)
    .bind(cover_letter)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        // Lost a race with a concurrent insert.
        let duplicate = e
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == UNIQUE_VIOLATION);
        if duplicate {
            duplicate_application()
        } else {
            AppError::Database(e)
        }
    })?;

    info!(
        "Created application {} (student {student_id}, job {job_id}, score {:?})",
        row.id, row.match_score
    );
    Ok(row)
}

pub async fn fetch_job_applications(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE job_id = $1 ORDER BY match_score DESC NULLS LAST, created_at",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

fn duplicate_application() -> AppError {
    AppError::Validation("You have already applied to this job".to_string())
}
