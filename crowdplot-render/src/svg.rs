//! SVG serialization of a [`Document`].
//!
//! Output is a pure function of the document: coordinates are printed with
//! two decimals and elements in draw order, so identical input gives
//! identical bytes.

use std::fmt::Write;

use crate::scene::{Document, Element, PathCommand, PathData, Pt, Text, TextAnchor};

/// Escape text content (`&`, `<`, `>`).
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape an attribute value (text escapes plus `"`).
pub fn escape_attr(input: &str) -> String {
    escape_text(input).replace('"', "&quot;")
}

fn coord(v: f64) -> String {
    format!("{:.2}", v)
}

/// Whole numbers print without decimals (canvas dimensions).
fn dim(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

pub fn path_d(path: &PathData) -> String {
    let parts: Vec<String> = path
        .commands
        .iter()
        .map(|c| match c {
            PathCommand::MoveTo(p) => format!("M {},{}", coord(p.x), coord(p.y)),
            PathCommand::LineTo(p) => format!("L {},{}", coord(p.x), coord(p.y)),
            PathCommand::Close => "Z".to_string(),
        })
        .collect();
    parts.join(" ")
}

fn points_attr(points: &[Pt]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", coord(p.x), coord(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Serialize a complete document, newline terminated.
pub fn to_svg(doc: &Document) -> String {
    let mut out = String::new();
    let width = dim(doc.width);
    let height = dim(doc.height);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{label}">"#,
        w = width,
        h = height,
        label = escape_attr(&doc.aria_label)
    );
    let _ = writeln!(
        out,
        "  <style>text{{font-family:{};fill:{};font-size:{}px;}}</style>",
        doc.font_family, doc.text_fill, doc.font_size
    );
    for element in &doc.elements {
        write_element(&mut out, element, 1);
    }
    out.push_str("</svg>\n");
    out
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let pad = "  ".repeat(depth);
    match element {
        Element::Line { from, to, stroke, width } => {
            let _ = writeln!(
                out,
                r#"{}<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                pad,
                coord(from.x),
                coord(from.y),
                coord(to.x),
                coord(to.y),
                escape_attr(stroke),
                width
            );
        }
        Element::Rect { x, y, width, height, fill, clip } => {
            let clip_attr = clip
                .as_ref()
                .map(|id| format!(r#" clip-path="url(#{})""#, escape_attr(id)))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                r#"{}<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{}/>"#,
                pad,
                coord(*x),
                coord(*y),
                coord(*width),
                coord(*height),
                escape_attr(fill),
                clip_attr
            );
        }
        Element::Text(text) => write_text(out, &pad, text),
        Element::Polyline { points, stroke, width } => {
            let _ = writeln!(
                out,
                r#"{}<polyline fill="none" stroke="{}" stroke-width="{}" points="{}"/>"#,
                pad,
                escape_attr(stroke),
                width,
                points_attr(points)
            );
        }
        Element::ClipPath { id, path } => {
            let _ = writeln!(out, "{}<defs>", pad);
            let _ = writeln!(out, r#"{}  <clipPath id="{}">"#, pad, escape_attr(id));
            let _ = writeln!(out, r#"{}    <path d="{}"/>"#, pad, path_d(path));
            let _ = writeln!(out, "{}  </clipPath>", pad);
            let _ = writeln!(out, "{}</defs>", pad);
        }
        Element::Group(children) => {
            let _ = writeln!(out, "{}<g>", pad);
            for child in children {
                write_element(out, child, depth + 1);
            }
            let _ = writeln!(out, "{}</g>", pad);
        }
    }
}

fn write_text(out: &mut String, pad: &str, text: &Text) {
    let mut attrs = format!(r#"x="{}" y="{}""#, coord(text.x), coord(text.y));
    if let Some(size) = text.font_size {
        let _ = write!(attrs, r#" font-size="{}""#, size);
    }
    if let Some(weight) = text.font_weight {
        let _ = write!(attrs, r#" font-weight="{}""#, weight);
    }
    if let Some(fill) = &text.fill {
        let _ = write!(attrs, r#" fill="{}""#, escape_attr(fill));
    }
    if let Some(opacity) = text.opacity {
        let _ = write!(attrs, r#" opacity="{}""#, opacity);
    }
    if let Some(anchor) = text.anchor {
        let value = match anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let _ = write!(attrs, r#" text-anchor="{}""#, value);
    }
    if let Some(deg) = text.rotate {
        let _ = write!(
            attrs,
            r#" transform="rotate({} {} {})""#,
            deg,
            coord(text.x),
            coord(text.y)
        );
    }
    let _ = writeln!(out, "{}<text {}>{}</text>", pad, attrs, escape_text(&text.content));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(elements: Vec<Element>) -> Document {
        Document {
            width: 780.0,
            height: 96.0,
            aria_label: "20260101 crowd by postal".into(),
            font_family: "sans-serif".into(),
            font_size: 12,
            text_fill: "#111111".into(),
            elements,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_text("A & B <C>"), "A &amp; B &lt;C&gt;");
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_header_declares_size() {
        let svg = to_svg(&doc(Vec::new()));
        assert!(svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="780" height="96" viewBox="0 0 780 96" role="img" aria-label="20260101 crowd by postal">"#
        ));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_path_data() {
        let path = PathData::area_under(&[Pt::new(210.0, 60.0), Pt::new(300.5, 52.0)], 68.0);
        assert_eq!(
            path_d(&path),
            "M 210.00,60.00 L 300.50,52.00 L 300.50,68.00 L 210.00,68.00 Z"
        );
    }

    #[test]
    fn test_text_and_clip_serialization() {
        let svg = to_svg(&doc(vec![
            Element::Text(
                Text::new(24.0, 60.0, "North & <East>")
                    .size(11)
                    .anchor(TextAnchor::Middle)
                    .rotate(-90.0),
            ),
            Element::Rect {
                x: 210.0,
                y: 52.0,
                width: 550.0,
                height: 8.0,
                fill: "#e85f5c".into(),
                clip: Some("clip-20260101-0".into()),
            },
        ]));
        assert!(svg.contains(
            r#"<text x="24.00" y="60.00" font-size="11" text-anchor="middle" transform="rotate(-90 24.00 60.00)">North &amp; &lt;East&gt;</text>"#
        ));
        assert!(svg.contains(r#"clip-path="url(#clip-20260101-0)""#));
    }
}
