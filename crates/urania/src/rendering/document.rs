use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::chart::types::ChartResult;
use crate::rendering::generator::ChartSpecGenerator;
use crate::rendering::spec::ChartSpec;
use crate::rendering::svg::{escape_xml, write_svg};
use crate::rendering::visual_config::RenderSettings;

/// Artifacts rendered from one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedChart {
    pub svg: String,
    /// Standalone page embedding `svg` verbatim
    pub html: String,
    /// Lowercase hex SHA-256 of `svg`
    pub content_hash: String,
}

/// Hex SHA-256 of a rendered image, for content-addressed caching.
pub fn content_hash(svg: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(svg.as_bytes());
    hex::encode(hasher.finalize())
}

/// Wrap an SVG in a minimal HTML page.
pub fn html_document(svg: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>body{{margin:0;display:flex;justify-content:center;background:#111}}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_xml(title),
        svg
    )
}

/// Pure function from [`ChartResult`] to image and document.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    generator: ChartSpecGenerator,
}

impl ChartRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            generator: ChartSpecGenerator::new(settings),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        self.generator.settings()
    }

    pub fn spec(&self, chart: &ChartResult) -> ChartSpec {
        self.generator.generate(chart)
    }

    pub fn render_svg(&self, chart: &ChartResult) -> String {
        write_svg(&self.spec(chart))
    }

    pub fn render(&self, chart: &ChartResult) -> RenderedChart {
        let spec = self.spec(chart);
        let svg = write_svg(&spec);
        let title = spec.title.as_deref().unwrap_or("Natal chart");
        let html = html_document(&svg, title);
        let content_hash = content_hash(&svg);
        debug!(
            "Rendered {} shapes, {} bytes of SVG",
            spec.shape_count(),
            svg.len()
        );
        RenderedChart {
            svg,
            html,
            content_hash,
        }
    }
}
