//! Serializes a [`ChartSpec`] to SVG text.
//!
//! Coordinates are written with two decimals so output is stable across
//! platforms; attribute order never varies.

use crate::ephemeris::time::normalize_degrees;
use crate::rendering::primitives::{Color, Point, Shape, Stroke};
use crate::rendering::spec::ChartSpec;

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn write_svg(spec: &ChartSpec) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="{}">"#,
        spec.width,
        spec.height,
        spec.width,
        spec.height,
        escape_xml(&spec.font_family)
    ));
    svg.push('\n');
    if let Some(title) = &spec.title {
        svg.push_str(&format!("<title>{}</title>\n", escape_xml(title)));
    }
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{:.0}" height="{:.0}"{} />"#,
        spec.width,
        spec.height,
        fill_attrs(Some(spec.background_color))
    ));
    svg.push('\n');

    for layer in &spec.layers {
        svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(&layer.id)));
        svg.push('\n');
        for shape in &layer.shapes {
            svg.push_str(&shape_element(shape));
            svg.push('\n');
        }
        svg.push_str("</g>\n");
    }
    svg.push_str("</svg>\n");
    svg
}

fn shape_element(shape: &Shape) -> String {
    match shape {
        Shape::Circle {
            center,
            radius,
            fill,
            stroke,
        } => format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}"{}{} />"#,
            center.x,
            center.y,
            radius,
            fill_attrs(*fill),
            stroke_attrs(stroke.as_ref())
        ),
        Shape::Line { from, to, stroke } => format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"{} />"#,
            from.x,
            from.y,
            to.x,
            to.y,
            stroke_attrs(Some(stroke))
        ),
        Shape::Sector {
            center,
            radius_inner,
            radius_outer,
            start_angle,
            end_angle,
            fill,
            stroke,
        } => format!(
            r#"<path d="{}"{}{} />"#,
            sector_path(*center, *radius_inner, *radius_outer, *start_angle, *end_angle),
            fill_attrs(Some(*fill)),
            stroke_attrs(stroke.as_ref())
        ),
        Shape::Text {
            position,
            content,
            size,
            color,
            anchor,
            class,
        } => {
            let class_attr = class
                .as_ref()
                .map(|c| format!(r#" class="{}""#, escape_xml(c)))
                .unwrap_or_default();
            format!(
                r#"<text x="{:.2}" y="{:.2}" font-size="{:.1}" text-anchor="{}" dominant-baseline="central"{}{}>{}</text>"#,
                position.x,
                position.y,
                size,
                anchor.as_svg(),
                fill_attrs(Some(*color)),
                class_attr,
                escape_xml(content)
            )
        }
    }
}

/// Annular wedge, counter-clockwise on screen from `start` to `end`.
fn sector_path(center: Point, inner: f32, outer: f32, start: f64, end: f64) -> String {
    let span = normalize_degrees(end - start);
    let large = if span > 180.0 { 1 } else { 0 };
    let o1 = center.polar(start, outer);
    let o2 = center.polar(end, outer);
    let i2 = center.polar(end, inner);
    let i1 = center.polar(start, inner);
    format!(
        "M {:.2} {:.2} A {:.2} {:.2} 0 {} 0 {:.2} {:.2} L {:.2} {:.2} A {:.2} {:.2} 0 {} 1 {:.2} {:.2} Z",
        o1.x, o1.y, outer, outer, large, o2.x, o2.y, i2.x, i2.y, inner, inner, large, i1.x, i1.y
    )
}

fn fill_attrs(fill: Option<Color>) -> String {
    match fill {
        None => r#" fill="none""#.to_string(),
        Some(color) => match color.opacity() {
            Some(alpha) => format!(r#" fill="{}" fill-opacity="{:.2}""#, color.to_hex(), alpha),
            None => format!(r#" fill="{}""#, color.to_hex()),
        },
    }
}

fn stroke_attrs(stroke: Option<&Stroke>) -> String {
    let Some(stroke) = stroke else {
        return String::new();
    };
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{:.2}""#,
        stroke.color.to_hex(),
        stroke.width
    );
    if let Some(alpha) = stroke.color.opacity() {
        attrs.push_str(&format!(r#" stroke-opacity="{:.2}""#, alpha));
    }
    if let Some(dash) = stroke.style.dash_array() {
        attrs.push_str(&format!(r#" stroke-dasharray="{}""#, dash));
    }
    attrs
}
