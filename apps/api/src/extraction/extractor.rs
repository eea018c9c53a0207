//! CV feature extractor — turns decoded CV text into a bag of normalized features.
//!
//! Pure and infallible: anything not found degrades to `NOT_SPECIFIED`, an
//! empty list, or zero years. Decoding failures are handled upstream in
//! `extraction::decode`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::vocabulary::Vocabulary;

/// Sentinel for single-valued fields the extractor could not find.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Characters after a skills-section cue that are scanned for listed skills.
const SKILL_SECTION_WINDOW: usize = 500;
/// Length of the experience excerpt taken from the first experience cue.
const EXPERIENCE_EXCERPT_LEN: usize = 1000;
/// Length of the leading excerpt used when the CV has no experience cue.
const FALLBACK_EXCERPT_LEN: usize = 500;

/// Features extracted from a single CV. Persisted as JSON on the student profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvFeatures {
    /// Vocabulary skills found in the document, lowercase, no repeats.
    pub skills: Vec<String>,
    /// Degree/certificate tokens found, uppercased, in vocabulary order.
    pub education: Vec<String>,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub experience_duration_years: u32,
    pub experience_text: String,
}

impl Default for CvFeatures {
    fn default() -> Self {
        Self {
            skills: Vec::new(),
            education: Vec::new(),
            institution: NOT_SPECIFIED.to_string(),
            degree: NOT_SPECIFIED.to_string(),
            field_of_study: NOT_SPECIFIED.to_string(),
            experience_duration_years: 0,
            experience_text: String::new(),
        }
    }
}

/// Extracts all CV features from plain text.
pub fn extract_features(text: &str, vocab: &Vocabulary) -> CvFeatures {
    let lower = text.to_lowercase();

    let features = CvFeatures {
        skills: extract_skills(&lower, vocab),
        education: extract_education_tokens(&lower, vocab),
        institution: first_contained(&lower, &vocab.institutions),
        degree: extract_degree(text, vocab),
        field_of_study: first_contained(&lower, &vocab.fields_of_study),
        experience_duration_years: extract_experience_years(text, vocab),
        experience_text: extract_experience_text(text, vocab),
    };

    debug!(
        skills = features.skills.len(),
        degree = %features.degree,
        years = features.experience_duration_years,
        "Extracted CV features"
    );

    features
}

/// Skills found anywhere in the text, plus skills inside the window that
/// follows each section cue. Result keeps vocabulary order, so it is a set.
fn extract_skills(lower: &str, vocab: &Vocabulary) -> Vec<String> {
    let windows: Vec<&str> = vocab
        .skill_section_cues
        .iter()
        .flat_map(|cue| {
            lower
                .match_indices(cue.as_str())
                .map(move |(idx, _)| window(lower, idx + cue.len(), SKILL_SECTION_WINDOW))
        })
        .collect();

    vocab
        .skills
        .iter()
        .filter(|skill| {
            lower.contains(skill.as_str()) || windows.iter().any(|w| w.contains(skill.as_str()))
        })
        .cloned()
        .collect()
}

fn extract_education_tokens(lower: &str, vocab: &Vocabulary) -> Vec<String> {
    vocab
        .education_keywords
        .iter()
        .filter(|kw| lower.contains(kw.as_str()))
        .map(|kw| kw.to_uppercase())
        .collect()
}

/// First degree pattern (in precedence order) that matches, uppercased with
/// inner whitespace removed so "B Sc" reads as "BSC" and "Ph. D" as "PH.D".
fn extract_degree(text: &str, vocab: &Vocabulary) -> String {
    vocab
        .degree_patterns
        .iter()
        .find_map(|p| p.regex.find(text).map(|m| (p.label.as_str(), m.as_str())))
        .map(|(label, matched)| {
            debug!(label, matched, "Matched degree pattern");
            matched
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase()
        })
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn extract_experience_years(text: &str, vocab: &Vocabulary) -> u32 {
    vocab
        .experience_patterns
        .iter()
        .find_map(|re| {
            re.captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
        })
        .unwrap_or(0)
}

/// Excerpt starting at the earliest experience cue, or the head of the document.
fn extract_experience_text(text: &str, vocab: &Vocabulary) -> String {
    // ASCII lowering keeps byte offsets aligned with `text`.
    let ascii_lower = text.to_ascii_lowercase();
    let start = vocab
        .experience_cues
        .iter()
        .filter_map(|cue| ascii_lower.find(cue.as_str()))
        .min();

    match start {
        Some(idx) => window(text, idx, EXPERIENCE_EXCERPT_LEN).to_string(),
        None => window(text, 0, FALLBACK_EXCERPT_LEN).to_string(),
    }
}

fn first_contained(lower: &str, terms: &[String]) -> String {
    terms
        .iter()
        .find(|t| lower.contains(t.as_str()))
        .cloned()
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

/// Up to `max_chars` characters of `s` starting at byte offset `start`.
fn window(s: &str, start: usize, max_chars: usize) -> &str {
    let tail = s.get(start..).unwrap_or("");
    match tail.char_indices().nth(max_chars) {
        Some((end, _)) => &tail[..end],
        None => tail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SAMPLE_CV: &str = "Obtained B.Sc in Computer Science at University of Lagos, \
        3 years experience in JavaScript and React";

    const SECTIONED_CV: &str = r#"
        Adaeze Okafor
        Profile: Backend developer who enjoys clean APIs.

        Work History
        Paystack — Software Engineer (2019 - 2023)
        Built payment reconciliation services in Python and Django.

        Skills
        Python, Django, PostgreSQL, Docker, Git, Python, teamwork
    "#;

    fn vocab() -> Vocabulary {
        Vocabulary::builtin().unwrap()
    }

    #[test]
    fn test_sample_cv_extraction() {
        let features = extract_features(SAMPLE_CV, &vocab());
        assert_eq!(features.degree, "B.SC");
        assert_eq!(features.field_of_study, "computer science");
        assert_eq!(features.institution, "university of lagos");
        assert_eq!(features.experience_duration_years, 3);
        assert!(features.skills.contains(&"javascript".to_string()));
        assert!(features.skills.contains(&"react".to_string()));
        assert_eq!(features.education, vec!["B.SC".to_string()]);
    }

    #[test]
    fn test_skills_are_a_set() {
        let features = extract_features(SECTIONED_CV, &vocab());
        let unique: HashSet<&String> = features.skills.iter().collect();
        assert_eq!(unique.len(), features.skills.len());
        for skill in ["python", "django", "postgresql", "docker", "git", "teamwork"] {
            assert!(features.skills.contains(&skill.to_string()), "missing {skill}");
        }
    }

    #[test]
    fn test_experience_text_starts_at_first_cue() {
        let features = extract_features(SECTIONED_CV, &vocab());
        assert!(features.experience_text.starts_with("Work History"));
    }

    #[test]
    fn test_experience_text_falls_back_to_document_head() {
        let text = "a".repeat(800);
        let features = extract_features(&text, &vocab());
        assert_eq!(features.experience_text.len(), FALLBACK_EXCERPT_LEN);
    }

    #[test]
    fn test_experience_excerpt_is_capped() {
        let text = format!("Experience {}", "x".repeat(5000));
        let features = extract_features(&text, &vocab());
        assert_eq!(features.experience_text.chars().count(), EXPERIENCE_EXCERPT_LEN);
    }

    #[test]
    fn test_empty_text_degrades_to_sentinels() {
        let features = extract_features("", &vocab());
        assert_eq!(features, CvFeatures::default());
    }

    #[test]
    fn test_degree_precedence_prefers_doctorate() {
        let text = "B.Sc Physics (2010), M.Sc Physics (2013), PhD Physics (2018)";
        let features = extract_features(text, &vocab());
        assert_eq!(features.degree, "PHD");
    }

    #[test]
    fn test_degree_tolerates_punctuation() {
        assert_eq!(extract_features("BSc Economics", &vocab()).degree, "BSC");
        assert_eq!(extract_features("holds a B Sc", &vocab()).degree, "BSC");
        assert_eq!(extract_features("Ph. D candidate", &vocab()).degree, "PH.D");
        assert_eq!(extract_features("HND Accounting", &vocab()).degree, "HND");
    }

    #[test]
    fn test_plus_years_pattern() {
        let features = extract_features("Seasoned engineer, 7+ years in fintech", &vocab());
        assert_eq!(features.experience_duration_years, 7);
    }

    #[test]
    fn test_experience_then_number_pattern() {
        let features = extract_features("Experience: 4", &vocab());
        assert_eq!(features.experience_duration_years, 4);
    }

    #[test]
    fn test_unknown_institution_is_sentinel() {
        let features = extract_features("Graduated from Springfield College", &vocab());
        assert_eq!(features.institution, NOT_SPECIFIED);
        assert_eq!(features.field_of_study, NOT_SPECIFIED);
    }

    #[test]
    fn test_window_respects_char_boundaries() {
        assert_eq!(window("héllo wörld", 0, 4), "héll");
        assert_eq!(window("abc", 10, 4), "");
    }

    #[test]
    fn test_cue_at_end_of_document() {
        let features = extract_features("Rust developer. Skills", &vocab());
        assert_eq!(features.skills, vec!["rust".to_string()]);
    }

    #[test]
    fn test_spaced_degree_spellings_reach_their_level() {
        let vocab = vocab();
        let cases = [
            ("B Sc Economics", "BSC", 2),
            ("B. Sc Economics", "B.SC", 2),
            ("BEng Civil", "BENG", 2),
            ("BTech Computer", "BTECH", 2),
            ("M Sc Statistics", "MSC", 3),
            ("MEng Mechanical", "MENG", 3),
            ("Ph D Physics", "PHD", 4),
        ];
        for (text, degree, level) in cases {
            let features = extract_features(text, &vocab);
            assert_eq!(features.degree, degree, "degree for {text:?}");
            assert_eq!(vocab.education_level(&features.degree), level, "level for {text:?}");
        }
    }
}
