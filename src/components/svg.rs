use crate::components::geometry::{WHEEL_CENTER, WHEEL_SIZE, wheel_slices};
use sheet_feed::ParticipantList;
use std::fmt::Write;

/// Standalone SVG document of the wheel at `rotation` degrees, pointer on top.
pub fn render_svg(participants: &ParticipantList, rotation: f64) -> String {
    let size = WHEEL_SIZE;
    let (cx, cy) = (WHEEL_CENTER.x, WHEEL_CENTER.y);
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}" style="overflow: visible">"#
    );
    let _ = writeln!(out, r#"  <g transform="rotate({rotation} {cx} {cy})">"#);
    for slice in wheel_slices(participants) {
        let p = slice.label_position;
        let _ = writeln!(out, "    <g>");
        let _ = writeln!(
            out,
            r##"      <path d="{}" fill="{}" stroke="#fff" stroke-width="1"/>"##,
            slice.path, slice.fill
        );
        let _ = writeln!(
            out,
            r##"      <text x="{x:.2}" y="{y:.2}" fill="#000" font-size="{font}" font-weight="bold" text-anchor="middle" dominant-baseline="middle" transform="rotate({rot:.2}, {x:.2}, {y:.2})">{label}</text>"##,
            x = p.x,
            y = p.y,
            font = slice.font_size,
            rot = slice.label_rotation,
            label = escape_xml(&slice.label),
        );
        let _ = writeln!(out, "    </g>");
    }
    let _ = writeln!(out, "  </g>");
    let _ = writeln!(
        out,
        r#"  <text x="{cx}" y="0" font-size="28" text-anchor="middle" dominant-baseline="hanging">▼</text>"#
    );
    out.push_str("</svg>\n");
    out
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(labels: &[&str]) -> ParticipantList {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_path_and_label_per_participant() {
        let svg = render_svg(&list(&["A", "B", "C"]), 0.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<path ").count(), 3);
        assert!(svg.contains(">B</text>"));
        assert!(svg.contains(r#"font-size="14""#));
        assert!(svg.contains(r#"fill="hsl(120, 70%, 60%)""#));
    }

    #[test]
    fn rotation_is_applied_around_center() {
        let svg = render_svg(&list(&["A", "B"]), 2250.0);
        assert!(svg.contains(r#"<g transform="rotate(2250 200 200)">"#));
    }

    #[test]
    fn crowded_wheel_masks_and_escapes_labels() {
        let mut labels: Vec<String> = (0..11).map(|i| format!("0917{i:04}")).collect();
        labels.push("<b>&co".to_string());
        let svg = render_svg(&labels.into_iter().collect(), 0.0);
        assert!(svg.contains(">****0003</text>"));
        assert!(svg.contains(">****&gt;&amp;co</text>"));
        assert!(!svg.contains("<b>"));
        assert!(svg.contains(r#"font-size="11""#));
    }
}
