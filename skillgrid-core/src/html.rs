//! HTML dashboard generation
//!
//! Generates a self-contained HTML page with embedded CSS and JavaScript.
//! Every page the pagination controls can reach is rendered up front as SVG;
//! the script only switches which one is visible, so the page works offline.

use crate::heatmap::{self, CellState, HeatmapOptions, SkillAxis, SKILL_PALETTE};
use crate::pagination::{reachable_starts, PaginationWindow};
use crate::report::page_status;
use crate::skills::HeatmapRow;
use crate::svg::{escape, render_svg};
use anyhow::Result;

/// Everything the dashboard shows
pub struct Dashboard<'a> {
    /// Rows that could be built, in selection order
    pub rows: &'a [HeatmapRow],
    /// Row axis shared by every page
    pub axis: &'a SkillAxis,
    pub options: &'a HeatmapOptions,
    pub page_size: usize,
    /// Running count of selected candidates, including ones without a row
    pub selected_count: usize,
}

/// Render the heatmap dashboard as an HTML document
pub fn render_html_dashboard(dashboard: &Dashboard<'_>) -> Result<String> {
    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Candidate Heatmap</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {header}
        {summary}
        {legend}
        {pages}
        {footer}
    </div>
    <script>{js}</script>
</body>
</html>"#,
        css = inline_css(),
        js = inline_javascript(),
        header = render_header(),
        summary = render_summary(dashboard),
        legend = render_legend(),
        pages = render_pages(dashboard)?,
        footer = render_footer(),
    ))
}

/// Inline CSS styles
fn inline_css() -> &'static str {
    r#"
* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #111827;
    background: #ffffff;
}

.container {
    max-width: 1100px;
    margin: 0 auto;
    padding: 2rem;
}

header {
    margin-bottom: 1.5rem;
    padding-bottom: 1rem;
    border-bottom: 2px solid #e5e7eb;
}

header h1 {
    font-size: 1.75rem;
    font-weight: 700;
}

.summary {
    display: flex;
    gap: 1rem;
    margin-bottom: 1.5rem;
}

.summary-card {
    padding: 0.75rem 1.25rem;
    border: 1px solid #e5e7eb;
    border-radius: 6px;
    background: #F6F6EF;
}

.summary-card .value {
    font-size: 1.5rem;
    font-weight: 700;
}

.summary-card .label {
    color: #6b7280;
    font-size: 0.875rem;
}

.legend {
    display: flex;
    flex-wrap: wrap;
    gap: 1rem;
    margin-bottom: 1rem;
    font-size: 0.875rem;
}

.legend-swatch {
    display: inline-block;
    width: 14px;
    height: 14px;
    margin-right: 0.35rem;
    vertical-align: middle;
    border: 1px solid #000;
}

.legend-swatch.not-assessed {
    border: 1px dashed #9CA3AF;
}

.page-nav {
    display: flex;
    align-items: center;
    gap: 1rem;
    margin: 0.75rem 0;
}

.page-nav button {
    padding: 0.35rem 0.9rem;
    border: 1px solid #C3BBFF;
    border-radius: 4px;
    background: #ffffff;
    cursor: pointer;
}

.page-nav button:disabled {
    color: #9ca3af;
    border-color: #e5e7eb;
    cursor: not-allowed;
}

.page-status {
    color: #6b7280;
    font-size: 0.875rem;
}

.empty {
    color: #6b7280;
    padding: 2rem 0;
}

footer {
    margin-top: 2rem;
    color: #9ca3af;
    font-size: 0.75rem;
}
"#
}

/// Inline JavaScript: page switching only
fn inline_javascript() -> &'static str {
    r#"
(function () {
    function showPage(start) {
        document.querySelectorAll('.heatmap-page').forEach(function (page) {
            page.hidden = page.dataset.start !== String(start);
        });
    }
    document.querySelectorAll('.page-nav button').forEach(function (button) {
        button.addEventListener('click', function () {
            if (!button.disabled) {
                showPage(button.dataset.target);
            }
        });
    });
})();
"#
}

fn render_header() -> String {
    r#"<header>
    <h1>Candidate Heatmap</h1>
</header>"#
        .to_string()
}

fn render_summary(dashboard: &Dashboard<'_>) -> String {
    format!(
        r#"<section class="summary">
    <div class="summary-card"><div class="value" id="selected-count">{selected}</div><div class="label">Selected candidates</div></div>
    <div class="summary-card"><div class="value">{shown}</div><div class="label">In heatmap</div></div>
    <div class="summary-card"><div class="value">{skills}</div><div class="label">Skills</div></div>
</section>"#,
        selected = dashboard.selected_count,
        shown = dashboard.rows.len(),
        skills = dashboard.axis.skills().len(),
    )
}

fn render_legend() -> String {
    let mut items: Vec<String> = (0..SKILL_PALETTE.len())
        .map(|score| {
            let state = CellState::Scored(score as u8);
            format!(
                r#"<span><span class="legend-swatch" style="background:{fill}"></span>{score}</span>"#,
                fill = state.fill(),
                score = score,
            )
        })
        .collect();
    items.push(format!(
        r#"<span><span class="legend-swatch not-assessed" style="background:{fill}"></span>not assessed</span>"#,
        fill = CellState::NotAssessed.fill(),
    ));
    format!(r#"<div class="legend">{}</div>"#, items.join(""))
}

/// One section per reachable window start; only start 0 is initially visible
fn render_pages(dashboard: &Dashboard<'_>) -> Result<String> {
    let total = dashboard.rows.len();
    if total == 0 {
        return Ok(r#"<p class="empty">No candidate details to compare yet.</p>"#.to_string());
    }

    let mut sections = Vec::new();
    for start in reachable_starts(dashboard.page_size, total)? {
        let window = PaginationWindow::at(dashboard.page_size, start)?;
        let scene = heatmap::render(
            window.visible_slice(dashboard.rows),
            dashboard.axis,
            dashboard.options,
        );

        let mut previous = window;
        previous.page_backward();
        let mut next = window;
        next.page_forward(total);

        sections.push(format!(
            r#"<section class="heatmap-page" data-start="{start}"{hidden}>
    <nav class="page-nav">
        <button class="prev" data-target="{prev_target}"{prev_disabled}>&larr; Previous</button>
        <span class="page-status">{status}</span>
        <button class="next" data-target="{next_target}"{next_disabled}>Next &rarr;</button>
    </nav>
    {svg}
</section>"#,
            start = start,
            hidden = if start == 0 { "" } else { " hidden" },
            prev_target = previous.start_index(),
            prev_disabled = disabled_attr(window.can_page_backward()),
            next_target = next.start_index(),
            next_disabled = disabled_attr(window.can_page_forward(total)),
            status = escape(&page_status(total, &window)),
            svg = render_svg(&scene),
        ));
    }

    Ok(sections.join("\n"))
}

fn disabled_attr(enabled: bool) -> &'static str {
    if enabled {
        ""
    } else {
        " disabled"
    }
}

/// Render footer
fn render_footer() -> String {
    r#"<footer>
    <p>Generated by skillgrid</p>
</footer>"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PersonId;

    fn rows(n: u32) -> Vec<HeatmapRow> {
        (0..n)
            .map(|i| HeatmapRow {
                id: PersonId::new(format!("p{}", i)),
                experience: i,
                skills: [("Rust".to_string(), Some((i % 5) as i64))]
                    .into_iter()
                    .collect(),
            })
            .collect()
    }

    fn render(rows: &[HeatmapRow], page_size: usize, selected_count: usize) -> String {
        let axis = SkillAxis::from_rows(rows);
        let options = HeatmapOptions::default();
        render_html_dashboard(&Dashboard {
            rows,
            axis: &axis,
            options: &options,
            page_size,
            selected_count,
        })
        .unwrap()
    }

    #[test]
    fn test_one_section_per_reachable_page() {
        let html = render(&rows(25), 10, 25);
        for start in [0, 5, 10, 15] {
            assert!(html.contains(&format!(r#"data-start="{}""#, start)));
        }
        assert_eq!(html.matches(r#"class="heatmap-page""#).count(), 4);
        assert_eq!(html.matches(" hidden>").count(), 3);
    }

    #[test]
    fn test_buttons_disabled_at_boundaries() {
        let html = render(&rows(25), 10, 25);
        assert!(html.contains(r#"<button class="prev" data-target="0" disabled>"#));
        assert!(html.contains(r#"<button class="next" data-target="15" disabled>"#));
        assert!(html.contains(r#"<button class="next" data-target="10">"#));
        assert!(html.contains(r#"<button class="prev" data-target="5">"#));
    }

    #[test]
    fn test_single_page_has_both_buttons_disabled() {
        let html = render(&rows(3), 10, 3);
        assert_eq!(html.matches(r#"class="heatmap-page""#).count(), 1);
        assert_eq!(html.matches(" disabled>").count(), 2);
    }

    #[test]
    fn test_selected_count_includes_rowless_candidates() {
        let html = render(&rows(2), 10, 3);
        assert!(html.contains(r#"<div class="value" id="selected-count">3</div>"#));
    }

    #[test]
    fn test_empty_dashboard() {
        let html = render(&[], 10, 0);
        assert!(html.contains("No candidate details to compare yet."));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_dashboard_is_deterministic() {
        let data = rows(12);
        assert_eq!(render(&data, 5, 12), render(&data, 5, 12));
    }
}
