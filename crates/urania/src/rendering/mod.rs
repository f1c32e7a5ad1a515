pub mod document;
pub mod generator;
pub mod glyphs;
pub mod layout;
pub mod primitives;
pub mod spec;
pub mod svg;
pub mod visual_config;

pub use document::{content_hash, html_document, ChartRenderer, RenderedChart};
pub use generator::ChartSpecGenerator;
pub use glyphs::Glyph;
pub use spec::ChartSpec;
pub use visual_config::{RenderSettings, Theme, VisualConfig};
