use serde::{Deserialize, Serialize};

use crate::aspects::types::AspectQuality;
use crate::ephemeris::types::Body;
use crate::rendering::primitives::{Color, LineStyle};
use crate::western::signs::ZodiacSign;

/// Default canvas edge in pixels
pub const DEFAULT_CANVAS_SIZE: f32 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Dark,
    Light,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

/// Renderer options that change the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Canvas width and height
    pub size: f32,
    pub theme: Theme,
    pub show_aspect_lines: bool,
    pub show_cusp_degrees: bool,
    pub show_title: bool,
    /// Minimum angular gap between body glyphs before they are spread apart
    pub min_glyph_separation: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_CANVAS_SIZE,
            theme: Theme::Dark,
            show_aspect_lines: true,
            show_cusp_degrees: true,
            show_title: true,
            min_glyph_separation: 6.0,
        }
    }
}

// Traditional palette, Aries..Pisces
const SIGN_COLORS: [Color; 12] = [
    Color::rgb(0xDC, 0x14, 0x3C), // crimson
    Color::rgb(0x8B, 0x45, 0x13), // saddle brown
    Color::rgb(0xFF, 0xD7, 0x00), // gold
    Color::rgb(0x87, 0xCE, 0xEB), // sky blue
    Color::rgb(0xFF, 0xA5, 0x00), // orange
    Color::rgb(0x90, 0xEE, 0x90), // light green
    Color::rgb(0xFF, 0xB6, 0xC1), // light pink
    Color::rgb(0x8B, 0x00, 0x00), // dark red
    Color::rgb(0xFF, 0xD7, 0x00), // gold
    Color::rgb(0x69, 0x69, 0x69), // dim gray
    Color::rgb(0x00, 0xCE, 0xD1), // dark turquoise
    Color::rgb(0x93, 0x70, 0xDB), // medium purple
];

const BODY_COLORS: &[(Body, Color)] = &[
    (Body::Sun, Color::rgb(0xFF, 0xD7, 0x00)),
    (Body::Moon, Color::rgb(0xC0, 0xC0, 0xC0)),
    (Body::Mercury, Color::rgb(0x8B, 0x73, 0x55)),
    (Body::Venus, Color::rgb(0xFF, 0xC0, 0xCB)),
    (Body::Mars, Color::rgb(0xDC, 0x14, 0x3C)),
    (Body::Jupiter, Color::rgb(0xFF, 0xA5, 0x00)),
    (Body::Saturn, Color::rgb(0x80, 0x80, 0x80)),
    (Body::Uranus, Color::rgb(0x87, 0xCE, 0xEB)),
    (Body::Neptune, Color::rgb(0x41, 0x69, 0xE1)),
    (Body::Pluto, Color::rgb(0x70, 0x80, 0x90)),
    (Body::Chiron, Color::rgb(0x8B, 0x73, 0x55)),
    (Body::Lilith, Color::rgb(0x9B, 0x59, 0xB6)),
    (Body::MeanNode, Color::rgb(0x00, 0xCE, 0xD1)),
    (Body::TrueNode, Color::rgb(0x00, 0xCE, 0xD1)),
    (Body::SouthNode, Color::rgb(0x00, 0xCE, 0xD1)),
];

/// Resolved colors and sizes for one theme.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualConfig {
    pub background_color: Color,
    pub stroke_color: Color,
    pub text_color: Color,
    pub stroke_width: f32,
    pub sign_ring_alpha: u8,
    pub angle_stroke_width: f32,
    pub aspect_stroke_width: f32,
    pub font_family: String,
    pub glyph_size: f32,
    pub sign_glyph_size: f32,
    pub label_size: f32,
}

impl VisualConfig {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background_color: Color::BLACK,
                stroke_color: Color::rgb(0xD4, 0xAF, 0x37),
                text_color: Color::rgb(0xF0, 0xE6, 0xD2),
                stroke_width: 1.0,
                sign_ring_alpha: 0x59,
                angle_stroke_width: 2.5,
                aspect_stroke_width: 1.2,
                font_family: "serif".to_string(),
                glyph_size: 20.0,
                sign_glyph_size: 18.0,
                label_size: 10.0,
            },
            Theme::Light => Self {
                background_color: Color::WHITE,
                stroke_color: Color::rgb(0x33, 0x33, 0x33),
                text_color: Color::rgb(0x22, 0x22, 0x22),
                stroke_width: 1.0,
                sign_ring_alpha: 0x40,
                angle_stroke_width: 2.5,
                aspect_stroke_width: 1.2,
                font_family: "serif".to_string(),
                glyph_size: 20.0,
                sign_glyph_size: 18.0,
                label_size: 10.0,
            },
        }
    }

    pub fn sign_color(&self, sign: ZodiacSign) -> Color {
        SIGN_COLORS[sign.index()].with_alpha(self.sign_ring_alpha)
    }

    pub fn body_color(&self, body: Body) -> Color {
        BODY_COLORS
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, c)| *c)
            .unwrap_or(self.text_color)
    }

    /// Line color and style for an aspect of the given quality.
    pub fn aspect_style(&self, quality: AspectQuality) -> (Color, LineStyle) {
        match quality {
            AspectQuality::Hard => (Color::rgb(0xFF, 0x00, 0x00), LineStyle::Solid),
            AspectQuality::Soft => (Color::rgb(0x22, 0x8B, 0x22), LineStyle::Solid),
            AspectQuality::Neutral => (Color::rgb(0x41, 0x69, 0xE1), LineStyle::Solid),
            AspectQuality::Minor => (Color::rgb(0x80, 0x80, 0x80), LineStyle::Dashed),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self::for_theme(Theme::Dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_body_has_a_color() {
        let config = VisualConfig::default();
        for (body, _) in BODY_COLORS {
            assert_ne!(config.body_color(*body), config.text_color);
        }
        assert_eq!(BODY_COLORS.len(), 15);
    }

    #[test]
    fn test_aspect_colors_differ_by_quality() {
        let config = VisualConfig::default();
        let hard = config.aspect_style(AspectQuality::Hard);
        let soft = config.aspect_style(AspectQuality::Soft);
        assert_ne!(hard.0, soft.0);
        assert_eq!(config.aspect_style(AspectQuality::Minor).1, LineStyle::Dashed);
    }

    #[test]
    fn test_render_settings_defaults() {
        let settings = RenderSettings::default();
        assert_eq!(settings.size, DEFAULT_CANVAS_SIZE);
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.show_aspect_lines);
    }
}
