//! Axum route handlers for scoring, recommendations and applications.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::profile::StudentFeatureProfile;
use crate::matching::ranker::{rank_jobs, RankedJob};
use crate::matching::requirements::JobRequirements;
use crate::matching::scorer::MatchResult;
use crate::matching::store::{self, NewApplication};
use crate::models::application::ApplicationRow;
use crate::models::job::JobRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchScoreRequest {
    pub student_id: Uuid,
    pub job_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MatchScoreResponse {
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub result: MatchResult,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub student_id: Uuid,
    pub jobs: Vec<RankedJob<JobRow>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/students/:id/recommendations
///
/// Exploratory ranking over every open job. Scores here are not reproducible
/// unless `RECOMMENDATION_SEED` is set.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let row = store::fetch_student_profile(&state.db, student_id).await?;
    let profile = row
        .as_ref()
        .map(|r| StudentFeatureProfile::from_row(r, &state.vocabulary));

    let jobs = store::fetch_open_jobs(&state.db)
        .await?
        .into_iter()
        .map(|job| {
            let requirements = JobRequirements::from_job(&job);
            (job, requirements)
        })
        .collect();

    let jobs = rank_jobs(&state.engine, student_id, profile.as_ref(), jobs)?;

    Ok(Json(RecommendationsResponse { student_id, jobs }))
}

/// POST /api/v1/match/score
///
/// Authoritative strict score with sub-scores. Nothing is persisted.
pub async fn handle_match_score(
    State(state): State<AppState>,
    Json(request): Json<MatchScoreRequest>,
) -> Result<Json<MatchScoreResponse>, AppError> {
    let job = store::fetch_job(&state.db, request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", request.job_id)))?;

    let row = store::fetch_student_profile(&state.db, request.student_id).await?;
    let profile = row
        .as_ref()
        .map(|r| StudentFeatureProfile::from_row(r, &state.vocabulary));

    let result = state.engine.score_application(
        request.student_id,
        profile.as_ref(),
        &JobRequirements::from_job(&job),
    )?;

    Ok(Json(MatchScoreResponse {
        student_id: request.student_id,
        job_id: request.job_id,
        result,
    }))
}

/// POST /api/v1/applications
///
/// Scores the student against the job with the strict strategy and freezes
/// the score onto the new application.
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let job = store::fetch_job(&state.db, request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", request.job_id)))?;
    if !(job.is_active && job.is_approved) {
        return Err(AppError::Validation(
            "This job is not accepting applications".to_string(),
        ));
    }

    let row = store::fetch_student_profile(&state.db, request.student_id).await?;
    let profile =
        StudentFeatureProfile::resolve(request.student_id, row.as_ref(), &state.vocabulary)?;
    let result = state.engine.score_application(
        request.student_id,
        Some(&profile),
        &JobRequirements::from_job(&job),
    )?;

    let application = store::insert_application(
        &state.db,
        NewApplication {
            student_id: request.student_id,
            job_id: request.job_id,
            cover_letter: request
                .cover_letter
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty()),
            match_score: Some(i32::from(result.score)),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/jobs/:id/applications
///
/// Highest match score first; unscored applications last.
pub async fn handle_job_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    store::fetch_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let applications = store::fetch_job_applications(&state.db, job_id).await?;
    Ok(Json(applications))
}
