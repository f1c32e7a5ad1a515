use chrono::{TimeZone, Utc};
use std::sync::Arc;
use urania::rendering::{content_hash, ChartRenderer, RenderSettings, Theme};
use urania::{calculate_chart, BirthInput, Body, ChartConfig, ChartEngine, FixedEphemeris};

fn input() -> BirthInput {
    let instant = Utc.with_ymd_and_hms(1990, 4, 15, 18, 30, 0).unwrap();
    BirthInput::new(instant, 40.7128, -74.006, Some("Ada <test>".to_string())).unwrap()
}

#[test]
fn test_rendering_is_byte_identical() {
    let config = ChartConfig::default();
    let first = calculate_chart(&input(), &config).unwrap();
    let second = calculate_chart(&input(), &config).unwrap();
    let renderer = ChartRenderer::default();
    let a = renderer.render(&first);
    let b = renderer.render(&second);
    assert_eq!(a.svg, b.svg);
    assert_eq!(a.html, b.html);
    assert_eq!(a.content_hash, b.content_hash);
    assert_eq!(a.content_hash, content_hash(&a.svg));
}

#[test]
fn test_render_ignores_calculation_time() {
    let chart = calculate_chart(&input(), &ChartConfig::default()).unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&chart.to_json().unwrap()).unwrap();
    json["calculated_at"] = serde_json::Value::String("2001-01-01T00:00:00Z".to_string());
    let shifted: urania::ChartResult = serde_json::from_value(json).unwrap();
    let renderer = ChartRenderer::default();
    assert_eq!(renderer.render_svg(&chart), renderer.render_svg(&shifted));
}

#[test]
fn test_svg_contains_every_part_of_the_wheel() {
    let chart = calculate_chart(&input(), &ChartConfig::default()).unwrap();
    let svg = ChartRenderer::default().render_svg(&chart);
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"800\""));
    for id in ["signs", "houses", "angles", "aspects", "bodies"] {
        assert!(svg.contains(&format!("<g id=\"{}\">", id)), "missing layer {}", id);
    }
    for glyph in ["♈", "♓", "☉", "☽", "♇"] {
        assert!(svg.contains(glyph), "missing glyph {}", glyph);
    }
    assert!(svg.contains("<title>Ada &lt;test&gt; | 1990-04-15 18:30 UTC</title>"));
    assert_eq!(svg.matches("class=\"house-number\"").count(), 12);
    assert_eq!(svg.matches("class=\"body\"").count(), chart.bodies().len());
}

#[test]
fn test_retrograde_bodies_are_marked() {
    let eph = FixedEphemeris::new()
        .with_body(Body::Sun, 25.0, 0.98)
        .with_body(Body::Moon, 200.0, 12.5)
        .with_body(Body::Mercury, 10.0, -0.8)
        .with_body(Body::Venus, 60.0, 1.1)
        .with_body(Body::Mars, 300.0, 0.7)
        .with_body(Body::Jupiter, 95.0, 0.2)
        .with_body(Body::Saturn, 292.0, 0.03)
        .with_body(Body::Uranus, 278.0, 0.01)
        .with_body(Body::Neptune, 284.0, -0.01)
        .with_body(Body::Pluto, 227.0, -0.02);
    let config = ChartConfig {
        include_chiron: false,
        include_lilith: false,
        include_nodes: urania::NodeMode::None,
        ..Default::default()
    };
    let chart = ChartEngine::new(Arc::new(eph)).calculate(&input(), &config).unwrap();
    let svg = ChartRenderer::default().render_svg(&chart);
    assert_eq!(svg.matches('℞').count(), 3);
}

#[test]
fn test_settings_change_the_image() {
    let chart = calculate_chart(&input(), &ChartConfig::default()).unwrap();
    let dark = ChartRenderer::default().render(&chart);
    let light = ChartRenderer::new(RenderSettings {
        theme: Theme::Light,
        ..Default::default()
    })
    .render(&chart);
    assert_ne!(dark.content_hash, light.content_hash);

    let bare = ChartRenderer::new(RenderSettings {
        show_aspect_lines: false,
        show_title: false,
        size: 600.0,
        ..Default::default()
    })
    .render_svg(&chart);
    assert!(!bare.contains("<g id=\"aspects\">"));
    assert!(!bare.contains("<title>"));
    assert!(bare.contains("width=\"600\""));
}

#[test]
fn test_html_is_derived_from_svg() {
    let chart = calculate_chart(&input(), &ChartConfig::default()).unwrap();
    let rendered = ChartRenderer::default().render(&chart);
    assert!(rendered.html.starts_with("<!DOCTYPE html>"));
    assert!(rendered.html.contains(&rendered.svg));
}

#[test]
fn test_only_minor_aspects_are_dashed() {
    let eph = FixedEphemeris::new()
        .with_body(Body::Sun, 0.0, 0.98)
        .with_body(Body::Moon, 150.0, 12.5)
        .with_body(Body::Mercury, 10.0, 1.2)
        .with_body(Body::Venus, 60.0, 1.1)
        .with_body(Body::Mars, 300.0, 0.7)
        .with_body(Body::Jupiter, 95.0, 0.2)
        .with_body(Body::Saturn, 292.0, 0.03)
        .with_body(Body::Uranus, 278.0, 0.01)
        .with_body(Body::Neptune, 284.0, 0.01)
        .with_body(Body::Pluto, 227.0, 0.02);
    let engine = ChartEngine::new(Arc::new(eph));
    let mut config = ChartConfig {
        include_chiron: false,
        include_lilith: false,
        include_nodes: urania::NodeMode::None,
        ..Default::default()
    };
    let renderer = ChartRenderer::default();

    let major = engine.calculate(&input(), &config).unwrap();
    assert!(!renderer.render_svg(&major).contains("stroke-dasharray"));

    config.include_minor_aspects = true;
    let minor = engine.calculate(&input(), &config).unwrap();
    let svg = renderer.render_svg(&minor);
    assert!(minor
        .aspects()
        .iter()
        .any(|a| a.aspect_type == urania::AspectType::Quincunx));
    assert!(svg.contains("stroke-dasharray=\"6 4\""));
    assert_eq!(
        svg.matches("stroke-dasharray=").count(),
        svg.matches("stroke-dasharray=\"6 4\"").count()
    );
}
