//! Text and JSON output
//!
//! Global invariants enforced:
//! - Deterministic output ordering (selection order, skill axis order)
//! - Byte-for-byte identical output across runs

use crate::heatmap::{CellState, SkillAxis};
use crate::pagination::PaginationWindow;
use crate::payload::PersonSummary;
use crate::skills::HeatmapRow;
use serde::Serialize;

const LABEL_WIDTH: usize = 24;
const CELL_WIDTH: usize = 10;

/// Render the people list, marking the recommended ones
pub fn render_people_text(people: &[PersonSummary], recommended_count: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("{:<3} {:<12} {}\n", "", "ID", "Name"));

    for (index, person) in people.iter().enumerate() {
        let marker = if index < recommended_count { "*" } else { "" };
        output.push_str(&format!(
            "{:<3} {:<12} {}\n",
            marker,
            truncate_or_pad(person.id.as_str(), 12).trim_end(),
            person.name
        ));
    }

    output.push_str(&format!(
        "\n{} people ({} recommended, marked *)\n",
        people.len(),
        recommended_count.min(people.len())
    ));
    output
}

/// Render the visible page of the heatmap as a text grid
///
/// Skill scores are printed as numbers; `-` marks a skill that is not
/// assessed (missing, undefined or out of range).
pub fn render_text(rows: &[HeatmapRow], axis: &SkillAxis, window: &PaginationWindow) -> String {
    let mut output = String::new();
    let page = window.visible_slice(rows);

    output.push_str(&truncate_or_pad("", LABEL_WIDTH));
    for row in page {
        output.push_str(&format!(" {:>w$}", truncate_id(row.id.as_str()), w = CELL_WIDTH));
    }
    output.push('\n');

    output.push_str(&truncate_or_pad("Experience", LABEL_WIDTH));
    for row in page {
        output.push_str(&format!(" {:>w$}", format!("{}y", row.experience), w = CELL_WIDTH));
    }
    output.push('\n');

    for skill in axis.skills() {
        output.push_str(&truncate_or_pad(skill, LABEL_WIDTH));
        for row in page {
            let cell = match CellState::classify(row.score(skill)) {
                CellState::Scored(score) => score.to_string(),
                CellState::NotAssessed => "-".to_string(),
            };
            output.push_str(&format!(" {:>w$}", cell, w = CELL_WIDTH));
        }
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&page_status(rows.len(), window));
    output.push('\n');
    output
}

/// "Showing 11-20 of 25 candidates" line with the navigation state
pub fn page_status(total: usize, window: &PaginationWindow) -> String {
    let shown = match window.visible_range(total) {
        Some((first, last)) => format!("Showing {}-{} of {} candidates", first, last, total),
        None => format!("Showing 0 of {} candidates", total),
    };
    format!(
        "{} [prev: {}, next: {}]",
        shown,
        if window.can_page_backward() { "on" } else { "off" },
        if window.can_page_forward(total) { "on" } else { "off" },
    )
}

#[derive(Serialize)]
struct HeatmapJson<'a> {
    total: usize,
    start_index: usize,
    page_size: usize,
    skills: &'a [String],
    rows: &'a [HeatmapRow],
}

/// Render the visible page of rows as JSON
pub fn render_json(rows: &[HeatmapRow], axis: &SkillAxis, window: &PaginationWindow) -> String {
    let doc = HeatmapJson {
        total: rows.len(),
        start_index: window.start_index(),
        page_size: window.size(),
        skills: axis.skills(),
        rows: window.visible_slice(rows),
    };
    serde_json::to_string_pretty(&doc).unwrap_or_else(|_| "{}".to_string())
}

/// Render the people list as JSON
pub fn render_people_json(people: &[PersonSummary]) -> String {
    serde_json::to_string_pretty(people).unwrap_or_else(|_| "[]".to_string())
}

fn truncate_id(id: &str) -> String {
    truncate_or_pad(id, CELL_WIDTH).trim_end().to_string()
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
