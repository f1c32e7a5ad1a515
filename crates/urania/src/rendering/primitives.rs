use serde::{Deserialize, Serialize};

/// Point on the canvas, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` along a counter-clockwise screen angle.
    pub fn polar(&self, angle_deg: f64, radius: f32) -> Point {
        let rad = angle_deg.to_radians();
        Point {
            x: self.x + radius * rad.cos() as f32,
            y: self.y - radius * rad.sin() as f32,
        }
    }
}

/// Color in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// `#rrggbb`, alpha is emitted separately as an opacity attribute.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(&self) -> Option<f32> {
        if self.a == 255 {
            None
        } else {
            Some(self.a as f32 / 255.0)
        }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Color { a, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub style: LineStyle,
}

impl Stroke {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: LineStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Solid,
    Dashed,
}

impl LineStyle {
    pub fn dash_array(&self) -> Option<&'static str> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some("6 4"),
        }
    }
}

/// Drawing primitives, in paint order once placed in a [`ChartSpec`].
///
/// Angles are counter-clockwise screen degrees (0 = east, 90 = north).
///
/// [`ChartSpec`]: crate::rendering::spec::ChartSpec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Circle {
        center: Point,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    /// Annular wedge between two radii, from `start_angle` counter-clockwise
    /// to `end_angle`.
    Sector {
        center: Point,
        radius_inner: f32,
        radius_outer: f32,
        start_angle: f64,
        end_angle: f64,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Text {
        position: Point,
        content: String,
        size: f32,
        color: Color,
        anchor: TextAnchor,
        class: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_opacity() {
        let c = Color::rgb(220, 20, 60);
        assert_eq!(c.to_hex(), "#dc143c");
        assert_eq!(c.opacity(), None);
        assert!(c.with_alpha(0).opacity().is_some());
    }

    #[test]
    fn test_polar_screen_orientation() {
        let center = Point::new(100.0, 100.0);
        let west = center.polar(180.0, 10.0);
        assert!((west.x - 90.0).abs() < 1e-4 && (west.y - 100.0).abs() < 1e-4);
        let north = center.polar(90.0, 10.0);
        assert!((north.y - 90.0).abs() < 1e-4);
    }
}
