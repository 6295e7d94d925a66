//! SVG output for heatmap scenes

use crate::heatmap::{Circle, Primitive, Rect, Scene, Text, TextAnchor};
use std::fmt::Write;

/// Render a scene as a standalone `<svg>` element
///
/// Coordinates are written with two decimals, so identical scenes yield
/// byte-for-byte identical markup.
pub fn render_svg(scene: &Scene) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="heatmap" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(scene.width),
        h = num(scene.height),
    );
    for primitive in &scene.primitives {
        match primitive {
            Primitive::Rect(rect) => write_rect(&mut out, rect),
            Primitive::Circle(circle) => write_circle(&mut out, circle),
            Primitive::Text(text) => write_text(&mut out, text),
        }
    }
    out.push_str("</svg>\n");
    out
}

fn write_rect(out: &mut String, rect: &Rect) {
    let dash = if rect.dashed {
        r#" stroke-dasharray="4 2""#
    } else {
        ""
    };
    let _ = write!(
        out,
        r#"  <rect class="{class}" x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}" stroke="{stroke}" stroke-width="1"{dash}>"#,
        class = rect.class,
        x = num(rect.x),
        y = num(rect.y),
        w = num(rect.width),
        h = num(rect.height),
        fill = rect.fill,
        stroke = rect.stroke,
        dash = dash,
    );
    if let Some(ref tooltip) = rect.tooltip {
        let _ = write!(out, "<title>{}</title>", escape(tooltip));
    }
    out.push_str("</rect>\n");
}

fn write_circle(out: &mut String, circle: &Circle) {
    let _ = writeln!(
        out,
        r#"  <circle class="{class}" cx="{cx}" cy="{cy}" r="{r}" fill="{fill}" stroke="{stroke}" stroke-width="1"/>"#,
        class = circle.class,
        cx = num(circle.cx),
        cy = num(circle.cy),
        r = num(circle.r),
        fill = circle.fill,
        stroke = circle.stroke,
    );
}

fn write_text(out: &mut String, text: &Text) {
    let anchor = match text.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let weight = if text.bold { "bold" } else { "normal" };
    let _ = writeln!(
        out,
        r#"  <text class="{class}" x="{x}" y="{y}" text-anchor="{anchor}" dominant-baseline="middle" font-size="{size}" font-weight="{weight}" fill="{fill}">{content}</text>"#,
        class = text.class,
        x = num(text.x),
        y = num(text.y),
        anchor = anchor,
        size = num(text.size),
        weight = weight,
        fill = text.fill,
        content = escape(&text.content),
    );
}

/// Format a coordinate with at most two decimals, without trailing zeros
fn num(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Escape XML/HTML special characters
pub(crate) fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::{render, HeatmapOptions, SkillAxis};
    use crate::payload::PersonId;
    use crate::skills::HeatmapRow;

    fn sample_rows() -> Vec<HeatmapRow> {
        vec![
            HeatmapRow {
                id: PersonId::from("17"),
                experience: 6,
                skills: [("C++".to_string(), Some(3)), ("R&D".to_string(), None)]
                    .into_iter()
                    .collect(),
            },
            HeatmapRow {
                id: PersonId::from("<b>"),
                experience: 1,
                skills: [("C++".to_string(), Some(0))].into_iter().collect(),
            },
        ]
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn test_svg_contains_cells_and_tooltips() {
        let rows = sample_rows();
        let scene = render(&rows, &SkillAxis::from_rows(&rows), &HeatmapOptions::default());
        let svg = render_svg(&scene);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<title>Experience: 6 years</title>"));
        assert!(svg.contains("<title>C++: 3</title>"));
        assert!(svg.contains("<title>R&amp;D: not assessed</title>"));
        assert!(svg.contains("&lt;b&gt;"));
        assert!(svg.contains(r#"stroke-dasharray="4 2""#));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn test_svg_is_byte_identical_across_renders() {
        let rows = sample_rows();
        let axis = SkillAxis::from_rows(&rows);
        let options = HeatmapOptions::default();
        let first = render_svg(&render(&rows, &axis, &options));
        let second = render_svg(&render(&rows, &axis, &options));
        assert_eq!(first, second);
    }
}
