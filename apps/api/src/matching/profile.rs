//! Student feature profile — the student-side input to the match scorer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::MatchError;
use crate::extraction::extractor::{CvFeatures, NOT_SPECIFIED};
use crate::extraction::vocabulary::Vocabulary;
use crate::models::student::StudentProfileRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFeatureProfile {
    /// Lowercase, trimmed, unique.
    pub skills: BTreeSet<String>,
    /// Ordinal 0–4 on the vocabulary's education ladder.
    pub education_level: u8,
    pub degree: String,
    pub institution: String,
    pub field_of_study: String,
    pub experience_duration_years: u32,
    pub experience_text: String,
    pub education_text: String,
    pub location: String,
}

impl StudentFeatureProfile {
    /// Resolves a stored profile, failing fast when there is none.
    pub fn resolve(
        student_id: Uuid,
        row: Option<&StudentProfileRow>,
        vocab: &Vocabulary,
    ) -> Result<Self, MatchError> {
        row.map(|r| Self::from_row(r, vocab))
            .ok_or(MatchError::ProfileMissing(student_id))
    }

    /// Builds the profile from stored form fields plus cached CV features.
    /// Form fields win; CV features fill gaps.
    pub fn from_row(row: &StudentProfileRow, vocab: &Vocabulary) -> Self {
        let cv = row.cv_features.as_ref().and_then(|value| {
            serde_json::from_value::<CvFeatures>(value.clone())
                .map_err(|e| warn!("Ignoring malformed cv_features for {}: {e}", row.user_id))
                .ok()
        });

        let degree = specified(row.degree.as_deref())
            .or_else(|| cv.as_ref().and_then(|c| specified(Some(c.degree.as_str()))))
            .unwrap_or_default();
        let institution = specified(row.institution.as_deref())
            .or_else(|| cv.as_ref().and_then(|c| specified(Some(c.institution.as_str()))))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string());
        let field_of_study = specified(row.field_of_study.as_deref())
            .or_else(|| cv.as_ref().and_then(|c| specified(Some(c.field_of_study.as_str()))))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string());

        let experience_duration_years = row
            .experience_years
            .and_then(|y| u32::try_from(y).ok())
            .or_else(|| cv.as_ref().map(|c| c.experience_duration_years))
            .unwrap_or(0);

        let experience_text = cv
            .as_ref()
            .and_then(|c| specified(Some(c.experience_text.as_str())))
            .or_else(|| specified(row.experience.as_deref()))
            .unwrap_or_default();

        let education_text = specified(row.education.as_deref()).unwrap_or_else(|| {
            [degree.as_str(), field_of_study.as_str(), institution.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty() && *part != NOT_SPECIFIED)
                .collect::<Vec<_>>()
                .join(" ")
        });

        Self {
            skills: normalize_skills(&row.skills),
            education_level: vocab.education_level(&degree),
            degree,
            institution,
            field_of_study,
            experience_duration_years,
            experience_text,
            education_text,
            location: row.location.as_deref().unwrap_or("").trim().to_string(),
        }
    }
}

/// Lowercases and trims skills into a set, dropping blanks.
pub fn normalize_skills<S: AsRef<str>>(skills: &[S]) -> BTreeSet<String> {
    skills
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trimmed non-empty text that is not the extractor's sentinel.
fn specified(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(NOT_SPECIFIED))
        .map(String::from)
}
