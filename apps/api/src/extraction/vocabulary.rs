//! Reference vocabulary — the term lists behind CV extraction and match scoring.
//!
//! Loaded once at startup from TOML. The built-in copy is compiled into the
//! binary; `VOCABULARY_PATH` swaps in an external file without a rebuild.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use thiserror::Error;

const BUILTIN_VOCABULARY: &str = include_str!("../../vocabulary.toml");

/// Highest ordinal on the education ladder (doctorate).
pub const MAX_EDUCATION_LEVEL: u8 = 4;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid vocabulary TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("education level {level} for '{keyword}' is outside 0..=4")]
    Level { keyword: String, level: u8 },
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    skills: Vec<String>,
    skill_section_cues: Vec<String>,
    education_keywords: Vec<String>,
    institutions: Vec<String>,
    fields_of_study: Vec<String>,
    experience_cues: Vec<String>,
    experience_patterns: Vec<String>,
    degree_patterns: Vec<DegreePatternEntry>,
    education_levels: Vec<EducationLevelEntry>,
    location: LocationRules,
}

#[derive(Debug, Deserialize)]
struct DegreePatternEntry {
    label: String,
    pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EducationLevelEntry {
    pub keyword: String,
    pub level: u8,
}

/// Regional location rule: two locations that both mention the same metro
/// area are treated as a full match even when neither contains the other.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationRules {
    pub metro_areas: Vec<String>,
}

impl LocationRules {
    /// Returns the first metro area mentioned by both (lowercased) locations.
    pub fn shared_metro(&self, a: &str, b: &str) -> Option<&str> {
        self.metro_areas
            .iter()
            .find(|m| a.contains(m.as_str()) && b.contains(m.as_str()))
            .map(String::as_str)
    }
}

/// A degree pattern in precedence order, compiled case-insensitively.
#[derive(Debug, Clone)]
pub struct DegreePattern {
    pub label: String,
    pub regex: Regex,
}

/// Compiled, lowercased reference vocabulary.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub skills: Vec<String>,
    pub skill_section_cues: Vec<String>,
    pub education_keywords: Vec<String>,
    pub institutions: Vec<String>,
    pub fields_of_study: Vec<String>,
    pub experience_cues: Vec<String>,
    pub experience_patterns: Vec<Regex>,
    pub degree_patterns: Vec<DegreePattern>,
    pub education_levels: Vec<EducationLevelEntry>,
    pub location: LocationRules,
}

impl Vocabulary {
    /// Parses the vocabulary compiled into the binary.
    pub fn builtin() -> Result<Self, VocabularyError> {
        Self::from_toml_str(BUILTIN_VOCABULARY)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, VocabularyError> {
        let file: VocabularyFile = toml::from_str(raw)?;

        let experience_patterns = file
            .experience_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;

        let degree_patterns = file
            .degree_patterns
            .into_iter()
            .map(|entry| {
                Ok(DegreePattern {
                    regex: compile(&entry.pattern)?,
                    label: entry.label,
                })
            })
            .collect::<Result<Vec<_>, VocabularyError>>()?;

        let education_levels = file
            .education_levels
            .into_iter()
            .map(|entry| {
                if entry.level > MAX_EDUCATION_LEVEL {
                    return Err(VocabularyError::Level {
                        keyword: entry.keyword,
                        level: entry.level,
                    });
                }
                Ok(EducationLevelEntry {
                    keyword: entry.keyword.to_lowercase(),
                    level: entry.level,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Vocabulary {
            skills: lowercase_unique(file.skills),
            skill_section_cues: lowercase_unique(file.skill_section_cues),
            education_keywords: lowercase_unique(file.education_keywords),
            institutions: lowercase_unique(file.institutions),
            fields_of_study: lowercase_unique(file.fields_of_study),
            experience_cues: lowercase_unique(file.experience_cues),
            experience_patterns,
            degree_patterns,
            education_levels,
            location: LocationRules {
                metro_areas: lowercase_unique(file.location.metro_areas),
            },
        })
    }

    /// Maps free-text degree wording onto the 0–4 education ladder.
    ///
    /// The first ladder keyword contained in the text wins. Non-empty text
    /// with no recognised keyword sits at level 1; empty text is level 0.
    pub fn education_level(&self, degree_text: &str) -> u8 {
        let text = degree_text.trim().to_lowercase();
        if text.is_empty() {
            return 0;
        }
        self.education_levels
            .iter()
            .find(|entry| text.contains(entry.keyword.as_str()))
            .map(|entry| entry.level)
            .unwrap_or(1)
    }
}

fn compile(pattern: &str) -> Result<Regex, VocabularyError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| VocabularyError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Lowercases and trims terms, dropping blanks and repeats but keeping file order.
fn lowercase_unique(terms: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
        skills = ["Rust", "rust", " Go "]
        skill_section_cues = ["skills"]
        education_keywords = ["b.sc"]
        institutions = ["University of Lagos"]
        fields_of_study = ["computer science"]
        experience_cues = ["experience"]
        experience_patterns = ['(\d+)\s*years?']

        [[degree_patterns]]
        label = "bachelors"
        pattern = '\bb\.?\s?sc\b'

        [[education_levels]]
        keyword = "B.Sc"
        level = 2

        [location]
        metro_areas = ["Abuja"]
    "#;

    #[test]
    fn test_builtin_vocabulary_parses() {
        let vocab = Vocabulary::builtin().unwrap();
        assert!(vocab.skills.len() >= 40 && vocab.skills.len() <= 90);
        assert_eq!(vocab.degree_patterns.len(), 5);
        assert_eq!(vocab.degree_patterns[0].label, "doctorate");
        assert_eq!(vocab.location.metro_areas, vec!["lagos".to_string()]);
    }

    #[test]
    fn test_terms_are_lowercased_and_deduplicated() {
        let vocab = Vocabulary::from_toml_str(MINIMAL).unwrap();
        assert_eq!(vocab.skills, vec!["rust".to_string(), "go".to_string()]);
        assert_eq!(vocab.institutions, vec!["university of lagos".to_string()]);
        assert_eq!(vocab.education_levels[0].keyword, "b.sc");
    }

    #[test]
    fn test_degree_patterns_are_case_insensitive() {
        let vocab = Vocabulary::from_toml_str(MINIMAL).unwrap();
        let re = &vocab.degree_patterns[0].regex;
        assert!(re.is_match("B.Sc"));
        assert!(re.is_match("BSc"));
        assert!(re.is_match("b sc"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let broken = MINIMAL.replace(r"'(\d+)\s*years?'", "'(unclosed'");
        let err = Vocabulary::from_toml_str(&broken).unwrap_err();
        assert!(matches!(err, VocabularyError::Pattern { .. }));
    }

    #[test]
    fn test_out_of_range_level_is_rejected() {
        let broken = MINIMAL.replace("level = 2", "level = 7");
        let err = Vocabulary::from_toml_str(&broken).unwrap_err();
        assert!(matches!(err, VocabularyError::Level { level: 7, .. }));
    }

    #[test]
    fn test_from_path_loads_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let vocab = Vocabulary::from_path(file.path()).unwrap();
        assert_eq!(vocab.location.metro_areas, vec!["abuja".to_string()]);
    }

    #[test]
    fn test_education_level_ladder() {
        let vocab = Vocabulary::builtin().unwrap();
        assert_eq!(vocab.education_level("PhD in Physics"), 4);
        assert_eq!(vocab.education_level("M.Sc"), 3);
        assert_eq!(vocab.education_level("Bachelor's degree"), 2);
        assert_eq!(vocab.education_level("B.Sc"), 2);
        assert_eq!(vocab.education_level("HND"), 2);
        assert_eq!(vocab.education_level("OND"), 1);
        assert_eq!(vocab.education_level("Secondary school certificate"), 0);
        assert_eq!(vocab.education_level("Diploma in catering"), 1);
        assert_eq!(vocab.education_level("   "), 0);
    }

    #[test]
    fn test_shared_metro_requires_both_sides() {
        let rules = LocationRules {
            metro_areas: vec!["lagos".to_string()],
        };
        assert_eq!(rules.shared_metro("ikeja, lagos", "lekki lagos"), Some("lagos"));
        assert_eq!(rules.shared_metro("ikeja, lagos", "abuja"), None);
    }
}
