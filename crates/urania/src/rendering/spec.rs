use serde::{Deserialize, Serialize};

use crate::rendering::primitives::{Color, Point, Shape};

/// Named group of shapes; serialized as an SVG `<g>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub shapes: Vec<Shape>,
}

impl Layer {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            shapes: Vec::new(),
        }
    }
}

/// Declarative description of one chart image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub width: f32,
    pub height: f32,
    pub center: Point,
    pub background_color: Color,
    pub font_family: String,
    pub title: Option<String>,
    pub layers: Vec<Layer>,
}

impl ChartSpec {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: Point::new(width / 2.0, height / 2.0),
            background_color: Color::BLACK,
            font_family: "sans-serif".to_string(),
            title: None,
            layers: Vec::new(),
        }
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn shape_count(&self) -> usize {
        self.layers.iter().map(|l| l.shapes.len()).sum()
    }
}
