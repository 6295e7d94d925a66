//! Skillgrid core library - candidate skill comparison heatmaps

// Global invariants enforced in this crate:
// - Heatmap columns follow selection order, never fetch completion order
// - Experience is always a non-negative whole number of years
// - Every cell is either a palette score (0..=4) or visibly "not assessed"
// - Paging never shows an empty page while rows exist
// - Identical input yields byte-for-byte identical output

pub mod config;
pub mod experience;
pub mod heatmap;
pub mod html;
pub mod pagination;
pub mod payload;
pub mod report;
pub mod selection;
pub mod skills;
pub mod source;
pub mod svg;

pub use config::ResolvedConfig;
pub use heatmap::{HeatmapOptions, Scene, SkillAxis};
pub use pagination::PaginationWindow;
pub use payload::{DetailPayload, PersonId, PersonSummary};
pub use report::{render_json, render_text};
pub use selection::Selection;
pub use skills::HeatmapRow;
pub use source::{DirSource, HttpSource, PeopleSource};

/// Row axis for a set of rows: the configured skill list if any, otherwise
/// every skill in first-seen order
pub fn skill_axis(rows: &[HeatmapRow], config: &ResolvedConfig) -> SkillAxis {
    match &config.skills {
        Some(skills) => SkillAxis::fixed(skills.clone()),
        None => SkillAxis::from_rows(rows),
    }
}
