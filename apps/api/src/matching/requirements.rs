//! Job requirements — resolves the polymorphic `requirements` column into one
//! canonical shape at the data-access boundary.
//!
//! Accepted shapes:
//! - structured object: `{"requirements": [...]}` or `{"skills": [...]}`, optional `"education"`
//! - bare array of strings
//! - string holding JSON of either shape above
//! - plain comma-separated string
//!
//! Nothing here fails. Anything unrecognised resolves to an empty list.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::models::job::JobRow;

/// Raw shapes the `requirements` column is known to hold.
#[derive(Debug, Clone)]
pub enum RequirementsField {
    Structured(StructuredRequirements),
    List(Vec<String>),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuredRequirements {
    #[serde(default)]
    pub requirements: Option<SkillList>,
    #[serde(default)]
    pub skills: Option<SkillList>,
    #[serde(default)]
    pub education: Option<String>,
}

/// Skill lists inside a structured object may themselves be arrays or delimited strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillList {
    Items(Vec<String>),
    Delimited(String),
}

impl SkillList {
    fn into_items(self) -> Vec<String> {
        match self {
            SkillList::Items(items) => clean(items),
            SkillList::Delimited(text) => split_delimited(&text),
        }
    }
}

/// Requirements after shape resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRequirements {
    pub skills: Vec<String>,
    pub education: Option<String>,
}

impl RequirementsField {
    /// Classifies a JSON value by kind. `None` for numbers, booleans, null,
    /// and objects or arrays whose contents do not fit the expected types.
    pub fn from_value(value: &Value) -> Option<Self> {
        let field = match value {
            Value::Object(_) => StructuredRequirements::deserialize(value).map(Self::Structured),
            Value::Array(_) => Vec::<String>::deserialize(value).map(Self::List),
            Value::String(text) => return Some(Self::Text(text.clone())),
            _ => return None,
        };
        match field {
            Ok(field) => Some(field),
            Err(e) => {
                debug!("Unrecognised requirements shape ({e}); treating as empty");
                None
            }
        }
    }

    fn resolve(self) -> ResolvedRequirements {
        match self {
            RequirementsField::Structured(s) => ResolvedRequirements {
                skills: s
                    .requirements
                    .or(s.skills)
                    .map(SkillList::into_items)
                    .unwrap_or_default(),
                education: s.education.filter(|e| !e.trim().is_empty()),
            },
            RequirementsField::List(items) => ResolvedRequirements {
                skills: clean(items),
                education: None,
            },
            RequirementsField::Text(text) => resolve_text(&text),
        }
    }
}

/// A string is tried as embedded JSON first (one level deep), then split on commas.
fn resolve_text(text: &str) -> ResolvedRequirements {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => {
                return RequirementsField::from_value(&value)
                    .map(RequirementsField::resolve)
                    .unwrap_or_default()
            }
            Err(e) => debug!("Requirements string is not JSON ({e}); splitting on commas"),
        }
    }
    ResolvedRequirements {
        skills: split_delimited(trimmed),
        education: None,
    }
}

/// Resolves any stored requirements value. Never fails.
pub fn resolve_requirements(value: Option<&Value>) -> ResolvedRequirements {
    value
        .and_then(RequirementsField::from_value)
        .map(RequirementsField::resolve)
        .unwrap_or_default()
}

/// Required skills from any stored requirements value. Never fails.
pub fn parse_requirements(value: Option<&Value>) -> Vec<String> {
    resolve_requirements(value).skills
}

fn split_delimited(text: &str) -> Vec<String> {
    clean(text.split(',').map(String::from).collect())
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Canonical job-side input to the match scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequirements {
    pub required_skills: Vec<String>,
    pub required_education_text: String,
    pub description: String,
    pub location: String,
}

impl JobRequirements {
    /// Resolves a stored job once. The `required_education` column wins over
    /// an `education` field embedded in the requirements object.
    pub fn from_job(job: &JobRow) -> Self {
        let resolved = resolve_requirements(job.requirements.as_ref());
        let required_education_text = job
            .required_education
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(String::from)
            .or(resolved.education)
            .unwrap_or_default();

        Self {
            required_skills: resolved.skills,
            required_education_text,
            description: job.description.clone(),
            location: job.location.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    fn make_job(requirements: Option<Value>, required_education: Option<&str>) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            employer_id: Uuid::new_v4(),
            title: "Frontend Developer".to_string(),
            description: "Build dashboards in React".to_string(),
            requirements,
            required_education: required_education.map(String::from),
            location: Some("Lagos".to_string()),
            is_active: true,
            is_approved: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_object_with_requirements_array() {
        let v = json!({"requirements": ["JavaScript", " Python "]});
        assert_eq!(parse_requirements(Some(&v)), vec!["JavaScript", "Python"]);
    }

    #[test]
    fn test_object_with_skills_array() {
        let v = json!({"skills": ["sql"], "education": "B.Sc"});
        let resolved = resolve_requirements(Some(&v));
        assert_eq!(resolved.skills, vec!["sql"]);
        assert_eq!(resolved.education.as_deref(), Some("B.Sc"));
    }

    #[test]
    fn test_object_with_delimited_requirements() {
        let v = json!({"requirements": "excel, communication"});
        assert_eq!(parse_requirements(Some(&v)), vec!["excel", "communication"]);
    }

    #[test]
    fn test_json_encoded_string() {
        let v = json!(r#"{"requirements": ["react", "node.js"]}"#);
        assert_eq!(parse_requirements(Some(&v)), vec!["react", "node.js"]);
    }

    #[test]
    fn test_json_encoded_array_string() {
        let v = json!(r#"["docker", "kubernetes"]"#);
        assert_eq!(parse_requirements(Some(&v)), vec!["docker", "kubernetes"]);
    }

    #[test]
    fn test_comma_separated_string() {
        let v = json!("javascript, python,, react ");
        assert_eq!(parse_requirements(Some(&v)), vec!["javascript", "python", "react"]);
    }

    #[test]
    fn test_malformed_json_string_falls_back_to_commas() {
        let v = json!("{not json, really");
        assert_eq!(parse_requirements(Some(&v)), vec!["{not json", "really"]);
    }

    #[test]
    fn test_empty_and_null_degrade_to_empty() {
        assert!(parse_requirements(None).is_empty());
        assert!(parse_requirements(Some(&Value::Null)).is_empty());
        assert!(parse_requirements(Some(&json!(""))).is_empty());
        assert!(parse_requirements(Some(&json!({}))).is_empty());
    }

    #[test]
    fn test_unsupported_shapes_degrade_to_empty() {
        assert!(parse_requirements(Some(&json!(42))).is_empty());
        assert!(parse_requirements(Some(&json!({"requirements": [1, 2]}))).is_empty());
        assert!(parse_requirements(Some(&json!([true, "x"]))).is_empty());
    }

    #[test]
    fn test_from_job_prefers_education_column() {
        let job = make_job(
            Some(json!({"skills": ["react"], "education": "OND"})),
            Some("Bachelor's degree"),
        );
        let reqs = JobRequirements::from_job(&job);
        assert_eq!(reqs.required_skills, vec!["react"]);
        assert_eq!(reqs.required_education_text, "Bachelor's degree");
        assert_eq!(reqs.location, "Lagos");
    }

    #[test]
    fn test_from_job_falls_back_to_embedded_education() {
        let job = make_job(Some(json!({"skills": [], "education": "HND"})), Some("  "));
        assert_eq!(JobRequirements::from_job(&job).required_education_text, "HND");
    }

    #[test]
    fn test_from_job_without_education_is_empty() {
        let job = make_job(None, None);
        let reqs = JobRequirements::from_job(&job);
        assert!(reqs.required_skills.is_empty());
        assert!(reqs.required_education_text.is_empty());
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            ".*".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::hash_map("(requirements|skills|education|[a-z]{1,5})", inner, 0..3)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics_and_items_are_trimmed(value in arb_json()) {
            let skills = parse_requirements(Some(&value));
            for s in &skills {
                prop_assert!(!s.is_empty());
                prop_assert_eq!(s.trim(), s.as_str());
            }
        }

        #[test]
        fn prop_arbitrary_strings_never_panic(text in ".*") {
            let _ = parse_requirements(Some(&Value::String(text)));
        }
    }
}
