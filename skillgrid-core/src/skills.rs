//! Skill matrix rows
//!
//! Turns one person's detail payload into a [`HeatmapRow`].
//!
//! Global invariants enforced:
//! - Skill groups are folded in document order; a recurring skill name keeps
//!   its first position and takes the later score (last write wins)
//! - The row id is the id that was requested, never one read from the payload
//! - Malformed data degrades to defaults and never fails the row

use crate::experience::compute_experience_years;
use crate::payload::{DetailPayload, PersonId, SkillGroup};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Skill name to score, in first-seen order
///
/// `None` marks a skill that was listed without a usable `pos[0]` score.
pub type SkillScores = IndexMap<String, Option<i64>>;

/// One heatmap column: a person, their experience and their skill scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapRow {
    pub id: PersonId,
    pub experience: u32,
    pub skills: SkillScores,
}

impl HeatmapRow {
    /// Score for `skill`: outer `None` when not listed, inner `None` when undefined
    pub fn score(&self, skill: &str) -> Option<Option<i64>> {
        self.skills.get(skill).copied()
    }
}

/// Build the heatmap row for `id` from its detail payload
pub fn build_row(id: &PersonId, payload: &DetailPayload) -> HeatmapRow {
    let experience = match compute_experience_years(&payload.employment_records()) {
        Ok(years) => years,
        Err(e) => {
            tracing::warn!(person = %id, error = %format!("{:#}", e), "using 0 years of experience");
            0
        }
    };

    let skills = payload
        .skill_groups()
        .map(|groups| flatten_skills(&groups))
        .unwrap_or_default();

    HeatmapRow {
        id: id.clone(),
        experience,
        skills,
    }
}

/// Flatten assessment groups into one score per skill name
pub fn flatten_skills(groups: &[SkillGroup]) -> SkillScores {
    groups
        .iter()
        .flat_map(|group| group.skills.iter())
        .fold(SkillScores::new(), |mut acc, skill| {
            acc.insert(skill.name.clone(), skill.first_consensus_score());
            acc
        })
}
