//! Heatmap layout
//!
//! Projects heatmap rows onto a positioned grid of drawable primitives. The
//! layout is backend-agnostic; `svg` and `html` map a [`Scene`] to markup.
//!
//! Global invariants enforced:
//! - Layout is a pure function of (rows, skill axis, options)
//! - One column per row, in the given order
//! - The row axis is `[indicator, Experience, skills...]` and is fixed by the
//!   [`SkillAxis`], not by the visible page, so labels never jump
//! - A missing, undefined or out-of-range score is never drawn with the
//!   score-0 color

use crate::skills::HeatmapRow;
use indexmap::IndexSet;
use serde::Serialize;

/// Score palette, indexed by score 0..=4 (white to darkest green)
pub const SKILL_PALETTE: [&str; 5] = ["#FFFFFF", "#F8F8A7", "#a6d96a", "#1A9641", "#003F0B"];

/// Background of every experience cell, independent of the value
pub const EXPERIENCE_FILL: &str = "#E7F3EC";

/// Fill of cells with no usable score
pub const NOT_ASSESSED_FILL: &str = "#E5E7EB";

/// Indicator glyph fill
pub const INDICATOR_FILL: &str = "#D9D9D9";

const STROKE: &str = "#000000";
const NOT_ASSESSED_STROKE: &str = "#9CA3AF";
const LABEL_FILL: &str = "#111827";

const INDICATOR_ROW: &str = "";
const EXPERIENCE_ROW: &str = "Experience";

const COLUMN_PADDING: f64 = 0.1;
const ROW_PADDING: f64 = 0.3;
const INDICATOR_RADIUS: f64 = 10.0;
const LABEL_FONT_SIZE: f64 = 14.0;
const COLUMN_LABEL_FONT_SIZE: f64 = 12.0;
/// Approximate advance of one bold 14px character
const LABEL_CHAR_WIDTH: f64 = 8.5;
const LABEL_GAP: f64 = 10.0;
const MIN_LEFT_MARGIN: f64 = 130.0;

/// Canvas and margins for one page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapOptions {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        HeatmapOptions {
            width: 900.0,
            height: 500.0,
            margin_top: 30.0,
            margin_right: 30.0,
            margin_bottom: 40.0,
        }
    }
}

/// Ordered skill names shared by every column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillAxis {
    skills: Vec<String>,
}

impl SkillAxis {
    /// First-seen order across all rows: the first row's skills, then any
    /// new names from later rows in encounter order
    pub fn from_rows(rows: &[HeatmapRow]) -> Self {
        let skills: IndexSet<&str> = rows
            .iter()
            .flat_map(|row| row.skills.keys().map(String::as_str))
            .collect();
        SkillAxis {
            skills: skills.into_iter().map(str::to_string).collect(),
        }
    }

    /// A configured fixed list; skills outside it are not drawn
    pub fn fixed(skills: Vec<String>) -> Self {
        SkillAxis { skills }
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    /// Row labels top to bottom, without the indicator row
    pub fn labels(&self) -> Vec<&str> {
        std::iter::once(EXPERIENCE_ROW)
            .chain(self.skills.iter().map(String::as_str))
            .collect()
    }
}

/// What a skill cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Scored(u8),
    NotAssessed,
}

impl CellState {
    /// Classify a row's entry for one skill (`None` = skill not listed)
    pub fn classify(entry: Option<Option<i64>>) -> Self {
        match entry.flatten() {
            Some(score @ 0..=4) => CellState::Scored(score as u8),
            _ => CellState::NotAssessed,
        }
    }

    pub fn fill(&self) -> &'static str {
        match self {
            CellState::Scored(score) => SKILL_PALETTE[*score as usize],
            CellState::NotAssessed => NOT_ASSESSED_FILL,
        }
    }
}

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rect {
    pub class: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub dashed: bool,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    pub class: &'static str,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: &'static str,
    pub stroke: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub class: &'static str,
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub anchor: TextAnchor,
    pub bold: bool,
    pub size: f64,
    pub fill: &'static str,
}

/// One drawable element, in absolute canvas coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Primitive {
    Rect(Rect),
    Circle(Circle),
    Text(Text),
}

/// A laid-out page: canvas size plus primitives in paint order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

/// Band scale over an ordered domain (equal inner and outer padding,
/// centered), as used by the column and row axes
#[derive(Debug, Clone)]
pub struct BandScale {
    start: f64,
    step: f64,
    bandwidth: f64,
    len: usize,
}

impl BandScale {
    pub fn new(len: usize, range: (f64, f64), padding: f64) -> Self {
        let (lo, hi) = range;
        let n = len as f64;
        let step = (hi - lo) / (n - padding + 2.0 * padding).max(1.0);
        let start = lo + (hi - lo - step * (n - padding)) * 0.5;
        BandScale {
            start,
            step,
            bandwidth: step * (1.0 - padding),
            len,
        }
    }

    /// Offset of the band at `index`, `None` outside the domain
    pub fn position(&self, index: usize) -> Option<f64> {
        (index < self.len).then(|| self.start + self.step * index as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

/// Left margin wide enough for the longest row label
pub fn left_margin(axis: &SkillAxis) -> f64 {
    let longest = axis
        .labels()
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    (longest as f64 * LABEL_CHAR_WIDTH + 2.0 * LABEL_GAP)
        .ceil()
        .max(MIN_LEFT_MARGIN)
}

/// Lay out one page of rows
pub fn render(rows: &[HeatmapRow], axis: &SkillAxis, options: &HeatmapOptions) -> Scene {
    let mut primitives = Vec::new();
    if rows.is_empty() {
        return Scene {
            width: options.width,
            height: options.height,
            primitives,
        };
    }

    let left = left_margin(axis);
    let grid_width = (options.width - left - options.margin_right).max(0.0);
    let grid_height = (options.height - options.margin_top - options.margin_bottom).max(0.0);

    let columns = BandScale::new(rows.len(), (left, left + grid_width), COLUMN_PADDING);
    // indicator, experience, then one band per skill
    let row_count = 2 + axis.skills().len();
    let bands = BandScale::new(
        row_count,
        (options.margin_top, options.margin_top + grid_height),
        ROW_PADDING,
    );
    let band_y = |index: usize| bands.position(index).unwrap_or(options.margin_top);

    for (col, row) in rows.iter().enumerate() {
        let x = columns.position(col).unwrap_or(left);
        let width = columns.bandwidth();

        primitives.push(Primitive::Circle(Circle {
            class: "indicator",
            cx: x + width / 2.0,
            cy: band_y(0) + bands.bandwidth() / 2.0,
            r: INDICATOR_RADIUS,
            fill: INDICATOR_FILL,
            stroke: STROKE,
        }));

        primitives.push(Primitive::Rect(Rect {
            class: "cell experience-cell",
            x,
            y: band_y(1),
            width,
            height: bands.bandwidth(),
            fill: EXPERIENCE_FILL,
            stroke: STROKE,
            dashed: false,
            tooltip: Some(format!("Experience: {} years", row.experience)),
        }));

        for (offset, skill) in axis.skills().iter().enumerate() {
            primitives.push(Primitive::Rect(skill_cell(
                row,
                skill,
                x,
                band_y(2 + offset),
                width,
                bands.bandwidth(),
            )));
        }

        primitives.push(Primitive::Text(Text {
            class: "column-label",
            x: x + width / 2.0,
            y: options.margin_top + grid_height + 20.0,
            content: row.id.to_string(),
            anchor: TextAnchor::Middle,
            bold: false,
            size: COLUMN_LABEL_FONT_SIZE,
            fill: LABEL_FILL,
        }));
    }

    for (index, label) in axis.labels().into_iter().enumerate() {
        primitives.push(Primitive::Text(Text {
            class: "row-label",
            x: left - LABEL_GAP,
            y: band_y(1 + index) + bands.bandwidth() / 2.0,
            content: label.to_string(),
            anchor: TextAnchor::End,
            bold: true,
            size: LABEL_FONT_SIZE,
            fill: LABEL_FILL,
        }));
    }

    Scene {
        width: options.width,
        height: options.height,
        primitives,
    }
}

fn skill_cell(row: &HeatmapRow, skill: &str, x: f64, y: f64, width: f64, height: f64) -> Rect {
    let entry = row.score(skill);
    let state = CellState::classify(entry);
    let tooltip = match (state, entry.flatten()) {
        (CellState::Scored(score), _) => format!("{}: {}", skill, score),
        (CellState::NotAssessed, Some(out_of_range)) => format!("{}: {}", skill, out_of_range),
        (CellState::NotAssessed, None) => format!("{}: not assessed", skill),
    };

    let (class, stroke, dashed) = match state {
        CellState::Scored(_) => ("cell skill-cell", STROKE, false),
        CellState::NotAssessed => ("cell skill-cell not-assessed", NOT_ASSESSED_STROKE, true),
    };

    Rect {
        class,
        x,
        y,
        width,
        height,
        fill: state.fill(),
        stroke,
        dashed,
        tooltip: Some(tooltip),
    }
}
