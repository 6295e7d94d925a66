//! People API payloads
//!
//! `GET /people` returns a flat list of [`PersonSummary`]. `GET /people/{id}`
//! returns a deeply nested document wrapped by [`DetailPayload`]; every field
//! inside it is optional, so all access goes through the accessor paths below
//! rather than a rigid struct.
//!
//! | value              | path                         | default when absent |
//! |--------------------|------------------------------|---------------------|
//! | skill groups       | `data.data.skillset`         | none (no skills)    |
//! | employment records | `data.user_data.user.workEx` | empty history       |
//!
//! A segment that is `null` counts as absent. A leaf that is present but has
//! the wrong shape is logged and treated as absent.
//!
//! Inside `skillset` the damage is contained per entry: a `null` or
//! non-list `skills`/`pos` is empty, a non-numeric score is undefined, and a
//! skill without a usable `name` is skipped on its own.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

const SKILLSET_PATH: &[&str] = &["data", "data", "skillset"];
const WORK_EX_PATH: &[&str] = &["data", "user_data", "user", "workEx"];

/// Person identifier
///
/// The API is not consistent about numeric vs string ids, so both are
/// accepted and normalized to their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        PersonId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        PersonId(id.to_string())
    }
}

impl<'de> Deserialize<'de> for PersonId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => PersonId(s),
            RawId::Integer(n) => PersonId(n.to_string()),
            RawId::Float(f) => PersonId(f.to_string()),
        })
    }
}

/// Entry of `GET /people`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: PersonId,
    #[serde(default)]
    pub name: String,
    /// Fields the dashboard does not use, kept for JSON output
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One employment entry of `workEx`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// One assessment group of `skillset`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<SkillEntry>,
}

/// One assessed skill inside a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub pos: Vec<PositionScore>,
}

/// Positional score entry; only the first one of a skill is used
///
/// Deserializes from any JSON value, so one odd entry never shifts `pos[0]`.
/// A score that is missing or not a number is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PositionScore {
    pub consensus_score: Option<f64>,
}

impl<'de> Deserialize<'de> for PositionScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(PositionScore {
            consensus_score: value.get("consensus_score").and_then(Value::as_f64),
        })
    }
}

/// A list field where `null` is empty and a non-list is logged and empty
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => parse_each(items),
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(found = %other, "expected a list, using an empty one");
            Vec::new()
        }
    })
}

/// Parse every item on its own, skipping (and logging) the ones that fail
fn parse_each<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match T::deserialize(&item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(entry = %item, error = %e, "skipping malformed entry");
                None
            }
        })
        .collect()
}

impl SkillEntry {
    /// Consensus score of `pos[0]`
    ///
    /// `None` when there is no positional entry, no score, or the score is
    /// not a whole number. Out-of-range whole numbers are returned as-is.
    pub fn first_consensus_score(&self) -> Option<i64> {
        let score = self.pos.first()?.consensus_score?;
        if score.is_finite() && score.fract() == 0.0 {
            Some(score as i64)
        } else {
            None
        }
    }
}

/// Raw `GET /people/{id}` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailPayload(Value);

impl DetailPayload {
    pub fn new(value: Value) -> Self {
        DetailPayload(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Assessment groups at `data.data.skillset`, in document order
    ///
    /// Malformed groups and skills are dropped one by one; the rest survive.
    pub fn skill_groups(&self) -> Option<Vec<SkillGroup>> {
        match self.lookup(SKILLSET_PATH)? {
            Value::Array(groups) => Some(parse_each(groups.clone())),
            other => {
                tracing::warn!(path = %SKILLSET_PATH.join("."), found = %other, "ignoring malformed field");
                None
            }
        }
    }

    /// Employment history at `data.user_data.user.workEx`, empty when absent
    pub fn employment_records(&self) -> Vec<EmploymentRecord> {
        self.leaf(WORK_EX_PATH).unwrap_or_default()
    }

    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.0, |value, key| value.get(*key))
            .filter(|value| !value.is_null())
    }

    fn leaf<T: DeserializeOwned>(&self, path: &[&str]) -> Option<T> {
        let value = self.lookup(path)?;
        match T::deserialize(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(path = %path.join("."), error = %e, "ignoring malformed field");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_id_accepts_numbers_and_strings() {
        let people: Vec<PersonSummary> =
            serde_json::from_str(r#"[{"id": 7, "name": "Ada"}, {"id": "x9", "name": "Bo"}]"#)
                .unwrap();
        assert_eq!(people[0].id.as_str(), "7");
        assert_eq!(people[1].id.as_str(), "x9");
    }

    #[test]
    fn test_person_summary_keeps_extra_fields() {
        let person: PersonSummary =
            serde_json::from_str(r#"{"id": 1, "name": "Ada", "title": "Engineer"}"#).unwrap();
        assert_eq!(person.extra.get("title"), Some(&json!("Engineer")));
    }

    #[test]
    fn test_missing_name_defaults_to_empty() {
        let person: PersonSummary = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(person.name, "");
    }

    #[test]
    fn test_skill_groups_present() {
        let payload = DetailPayload::new(json!({
            "data": {"data": {"skillset": [
                {"skills": [{"name": "Rust", "pos": [{"consensus_score": 3}]}]}
            ]}}
        }));
        let groups = payload.skill_groups().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].skills[0].name, "Rust");
        assert_eq!(groups[0].skills[0].first_consensus_score(), Some(3));
    }

    #[test]
    fn test_absent_segments_degrade_to_defaults() {
        for value in [
            json!({}),
            json!({"data": null}),
            json!({"data": {"data": {}}}),
            json!({"data": {"data": {"skillset": null}}}),
            json!("unexpected"),
        ] {
            let payload = DetailPayload::new(value);
            assert!(payload.skill_groups().is_none());
            assert!(payload.employment_records().is_empty());
        }
    }

    #[test]
    fn test_malformed_leaf_treated_as_absent() {
        let payload = DetailPayload::new(json!({
            "data": {
                "data": {"skillset": "not a list"},
                "user_data": {"user": {"workEx": [{"start_date": 5}]}}
            }
        }));
        assert!(payload.skill_groups().is_none());
        assert!(payload.employment_records().is_empty());
    }

    #[test]
    fn test_employment_records_present() {
        let payload = DetailPayload::new(json!({
            "data": {"user_data": {"user": {"workEx": [
                {"start_date": "2020-01-01", "end_date": "2022-01-01", "company": "Acme"}
            ]}}}
        }));
        let records = payload.employment_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].end_date.as_deref(), Some("2022-01-01"));
    }

    #[test]
    fn test_first_consensus_score_edge_cases() {
        let entry = |pos: Value| -> SkillEntry {
            serde_json::from_value(json!({"name": "Go", "pos": pos})).unwrap()
        };
        assert_eq!(entry(json!([])).first_consensus_score(), None);
        assert_eq!(entry(json!([{}])).first_consensus_score(), None);
        assert_eq!(entry(json!([{"consensus_score": 2.5}])).first_consensus_score(), None);
        assert_eq!(entry(json!([{"consensus_score": 9}])).first_consensus_score(), Some(9));
        assert_eq!(
            entry(json!([{"consensus_score": 1}, {"consensus_score": 4}])).first_consensus_score(),
            Some(1)
        );
    }

    fn skills_of(payload: &DetailPayload) -> Vec<(String, Option<i64>)> {
        payload
            .skill_groups()
            .unwrap_or_default()
            .iter()
            .flat_map(|group| group.skills.iter())
            .map(|skill| (skill.name.clone(), skill.first_consensus_score()))
            .collect()
    }

    fn with_skillset(skillset: Value) -> DetailPayload {
        DetailPayload::new(json!({"data": {"data": {"skillset": skillset}}}))
    }

    #[test]
    fn test_null_pos_keeps_sibling_skills() {
        let payload = with_skillset(json!([
            {"skills": [{"name": "Rust", "pos": [{"consensus_score": 4}]}]},
            {"skills": [{"name": "Go", "pos": null}]}
        ]));
        assert_eq!(
            skills_of(&payload),
            vec![("Rust".to_string(), Some(4)), ("Go".to_string(), None)]
        );
    }

    #[test]
    fn test_non_numeric_score_is_undefined() {
        let payload = with_skillset(json!([
            {"skills": [
                {"name": "Rust", "pos": [{"consensus_score": 4}]},
                {"name": "Go", "pos": [{"consensus_score": "3"}]},
                {"name": "SQL", "pos": ["junk", {"consensus_score": 2}]}
            ]}
        ]));
        assert_eq!(
            skills_of(&payload),
            vec![
                ("Rust".to_string(), Some(4)),
                ("Go".to_string(), None),
                ("SQL".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_bad_entries_are_skipped_individually() {
        let payload = with_skillset(json!([
            {"skills": null},
            {"skills": "oops"},
            42,
            {"skills": [
                {"pos": [{"consensus_score": 1}]},
                {"name": null, "pos": []},
                {"name": "Go", "pos": {"consensus_score": 2}},
                {"name": "Rust", "pos": [{"consensus_score": 3}]}
            ]}
        ]));
        let groups = payload.skill_groups().unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(
            skills_of(&payload),
            vec![("Go".to_string(), None), ("Rust".to_string(), Some(3))]
        );
    }
}
