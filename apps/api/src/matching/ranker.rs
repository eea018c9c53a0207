//! Recommendation Ranker — exploratory scoring across every open job for one student.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::MatchError;
use crate::matching::profile::StudentFeatureProfile;
use crate::matching::requirements::JobRequirements;
use crate::matching::scorer::MatchEngine;

/// One entry of the recommendation feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedJob<J> {
    pub job: J,
    pub match_score: u8,
}

/// Scores each job with the exploratory strategy and sorts descending.
///
/// `jobs` pairs whatever the caller wants echoed back with its resolved
/// requirements. Filtering by active/approved is the caller's job. Ties keep
/// their input order. An empty job set is not an error; a missing profile is.
pub fn rank_jobs<J>(
    engine: &MatchEngine,
    student_id: Uuid,
    profile: Option<&StudentFeatureProfile>,
    jobs: Vec<(J, JobRequirements)>,
) -> Result<Vec<RankedJob<J>>, MatchError> {
    let profile = profile.ok_or(MatchError::ProfileMissing(student_id))?;

    let mut ranked: Vec<RankedJob<J>> = jobs
        .into_iter()
        .map(|(job, requirements)| RankedJob {
            match_score: engine.score_exploratory(profile, &requirements).score,
            job,
        })
        .collect();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    info!(
        "Ranked {} jobs for student {student_id} (top score: {:?})",
        ranked.len(),
        ranked.first().map(|r| r.match_score)
    );

    Ok(ranked)
}
