//! Match Scorer — composite 0–100 score for one (student, job) pair.
//!
//! Four sub-scores, each 0–100, combined by fixed weights:
//! skill 0.40, education 0.20, semantic 0.30, location 0.10.
//!
//! Skill matching is pluggable. `StrictSkillMatch` backs the authoritative
//! score frozen onto an application; `ExploratorySkillMatch` backs the
//! recommendation feed and is deliberately looser and non-deterministic.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::MatchError;
use crate::extraction::vocabulary::{LocationRules, Vocabulary};
use crate::matching::jitter::JitterSource;
use crate::matching::profile::StudentFeatureProfile;
use crate::matching::requirements::JobRequirements;
use crate::matching::tfidf::average_term_weight;

/// Score given when one side of a comparison has nothing to compare.
pub const NEUTRAL_SCORE: f64 = 50.0;
/// Ceiling on the exploratory skill score after jitter.
pub const EXPLORATORY_SKILL_CAP: f64 = 95.0;
/// Location score when neither remote work nor a shared area applies.
pub const LOCATION_MISMATCH_SCORE: f64 = 30.0;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// The four weighted components, kept for explainability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub skill: f64,
    pub education: f64,
    pub location: f64,
    pub semantic: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Integer in [0, 100].
    pub score: u8,
    pub subscores: SubScores,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skill: f64,
    pub education: f64,
    pub semantic: f64,
    pub location: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skill: 0.4,
            education: 0.2,
            semantic: 0.3,
            location: 0.1,
        }
    }
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.skill + self.education + self.semantic + self.location
    }
}

/// Weighted sum rounded to the nearest integer. Bounded by construction
/// when every sub-score is in [0, 100] and the weights sum to 1.
pub fn composite_score(subscores: &SubScores, weights: &MatchWeights) -> u8 {
    let total = weights.skill * subscores.skill
        + weights.education * subscores.education
        + weights.semantic * subscores.semantic
        + weights.location * subscores.location;
    total.round() as u8
}

// ────────────────────────────────────────────────────────────────────────────
// Skill matching strategies
// ────────────────────────────────────────────────────────────────────────────

/// Skill-overlap strategy. Callers pick one explicitly per use case.
pub trait SkillMatch: Send + Sync {
    /// Label reported alongside scores.
    fn name(&self) -> &'static str;

    /// 0–100 skill score. `student_skills` is lowercase; `required` is as posted.
    fn score(&self, student_skills: &BTreeSet<String>, required: &[String]) -> f64;
}

/// Case-insensitive exact membership. Used for application scoring.
pub struct StrictSkillMatch;

impl SkillMatch for StrictSkillMatch {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn score(&self, student_skills: &BTreeSet<String>, required: &[String]) -> f64 {
        if required.is_empty() {
            return NEUTRAL_SCORE;
        }
        let matched = required
            .iter()
            .filter(|r| student_skills.contains(&r.trim().to_lowercase()))
            .count();
        matched as f64 / required.len() as f64 * 100.0
    }
}

/// Substring overlap in either direction plus a random boost, capped at 95.
/// Used only for the recommendation feed; results are not reproducible
/// unless the jitter source is.
pub struct ExploratorySkillMatch {
    jitter: Arc<dyn JitterSource>,
    jitter_max: f64,
}

impl ExploratorySkillMatch {
    pub fn new(jitter: Arc<dyn JitterSource>, jitter_max: f64) -> Self {
        Self { jitter, jitter_max }
    }
}

impl SkillMatch for ExploratorySkillMatch {
    fn name(&self) -> &'static str {
        "exploratory"
    }

    fn score(&self, student_skills: &BTreeSet<String>, required: &[String]) -> f64 {
        if required.is_empty() {
            return NEUTRAL_SCORE;
        }
        let matched = required
            .iter()
            .map(|r| r.trim().to_lowercase())
            .filter(|r| {
                student_skills
                    .iter()
                    .filter(|s| !s.is_empty())
                    .any(|s| s.contains(r.as_str()) || r.contains(s.as_str()))
            })
            .count();
        let base = matched as f64 / required.len() as f64 * 100.0;
        (base + self.jitter.sample(self.jitter_max)).min(EXPLORATORY_SKILL_CAP)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-scores
// ────────────────────────────────────────────────────────────────────────────

/// 50 when the job asks for nothing; otherwise 100 if the student's level
/// meets the required level, else 50.
pub fn education_score(student_level: u8, required_education: &str, vocab: &Vocabulary) -> f64 {
    if required_education.trim().is_empty() {
        return NEUTRAL_SCORE;
    }
    if student_level >= vocab.education_level(required_education) {
        100.0
    } else {
        50.0
    }
}

/// Rules in order: empty side → 50, remote → 100, containment → 100,
/// shared metro area → 100, otherwise 30.
pub fn location_score(student_location: &str, job_location: &str, rules: &LocationRules) -> f64 {
    let student = student_location.trim().to_lowercase();
    let job = job_location.trim().to_lowercase();

    if student.is_empty() || job.is_empty() {
        return NEUTRAL_SCORE;
    }
    if student.contains("remote") || job.contains("remote") {
        return 100.0;
    }
    if student.contains(job.as_str()) || job.contains(student.as_str()) {
        return 100.0;
    }
    if rules.shared_metro(&student, &job).is_some() {
        return 100.0;
    }
    LOCATION_MISMATCH_SCORE
}

/// Lexical similarity of the job text against the student's text,
/// remapped onto 0–100 with `(avg + 5) * 10`.
pub fn semantic_score(profile: &StudentFeatureProfile, job: &JobRequirements) -> f64 {
    let student_doc = format!(
        "{} {} {}",
        profile.skills.iter().map(String::as_str).collect::<Vec<_>>().join(" "),
        profile.experience_text,
        profile.education_text
    );
    let job_doc = format!("{} {}", job.description, job.required_skills.join(" "));

    let avg = average_term_weight(&student_doc, &job_doc);
    ((avg + 5.0) * 10.0).clamp(0.0, 100.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Shared scoring engine held in `AppState`. Stateless apart from the
/// jitter source inside the exploratory strategy.
pub struct MatchEngine {
    vocabulary: Arc<Vocabulary>,
    weights: MatchWeights,
    strict: StrictSkillMatch,
    exploratory: ExploratorySkillMatch,
}

impl MatchEngine {
    pub fn new(vocabulary: Arc<Vocabulary>, jitter: Arc<dyn JitterSource>, jitter_max: f64) -> Self {
        Self {
            vocabulary,
            weights: MatchWeights::default(),
            strict: StrictSkillMatch,
            exploratory: ExploratorySkillMatch::new(jitter, jitter_max),
        }
    }

    /// Scores one pair with the given skill strategy.
    pub fn score_with(
        &self,
        profile: &StudentFeatureProfile,
        job: &JobRequirements,
        skill_match: &dyn SkillMatch,
    ) -> MatchResult {
        let subscores = SubScores {
            skill: skill_match.score(&profile.skills, &job.required_skills),
            education: education_score(
                profile.education_level,
                &job.required_education_text,
                &self.vocabulary,
            ),
            location: location_score(&profile.location, &job.location, &self.vocabulary.location),
            semantic: semantic_score(profile, job),
        };
        let score = composite_score(&subscores, &self.weights);

        debug!(
            strategy = skill_match.name(),
            skill = subscores.skill,
            education = subscores.education,
            location = subscores.location,
            semantic = subscores.semantic,
            score,
            "Scored match"
        );

        MatchResult { score, subscores }
    }

    /// Authoritative score for an application. Fails when the student has no profile.
    pub fn score_application(
        &self,
        student_id: Uuid,
        profile: Option<&StudentFeatureProfile>,
        job: &JobRequirements,
    ) -> Result<MatchResult, MatchError> {
        let profile = profile.ok_or(MatchError::ProfileMissing(student_id))?;
        Ok(self.score_with(profile, job, &self.strict))
    }

    /// Best-effort score for the recommendation feed.
    pub fn score_exploratory(
        &self,
        profile: &StudentFeatureProfile,
        job: &JobRequirements,
    ) -> MatchResult {
        self.score_with(profile, job, &self.exploratory)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
