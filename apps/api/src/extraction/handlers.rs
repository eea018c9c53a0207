//! Axum route handlers for CV ingestion.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::decode::{decode_document_blocking, UploadedDocument};
use crate::extraction::extractor::{extract_features, CvFeatures};
use crate::matching::store;
use crate::state::AppState;

/// Multipart field carrying the CV.
const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CvUploadResponse {
    pub student_id: Uuid,
    pub features: CvFeatures,
    /// Stored skill list after merging in the extracted skills.
    pub profile_skills: Vec<String>,
}

/// POST /api/v1/students/:id/cv
///
/// Decodes the uploaded CV, extracts features and persists them on the
/// student's profile.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<CvUploadResponse>, AppError> {
    let document = read_file_field(multipart).await?;
    let size = document.data.len();

    let text = decode_document_blocking(document).await?;
    let features = extract_features(&text, &state.vocabulary);
    info!(
        "Extracted {} skills from {size}-byte CV for student {student_id}",
        features.skills.len()
    );

    let row = store::save_cv_features(&state.db, student_id, &features).await?;

    Ok(Json(CvUploadResponse {
        student_id,
        features,
        profile_skills: row.skills,
    }))
}

/// POST /api/v1/cv/preview
///
/// Runs the extractor over plain text without persisting anything.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<CvFeatures>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    Ok(Json(extract_features(&request.text, &state.vocabulary)))
}

async fn read_file_field(mut multipart: Multipart) -> Result<UploadedDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        return Ok(UploadedDocument {
            file_name,
            content_type,
            data,
        });
    }
    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}
