//! Async front for the chart pipeline.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::chart::engine::{CalculationStage, ChartEngine, Deadline};
use crate::chart::settings::ChartConfig;
use crate::chart::types::ChartResult;
use crate::ephemeris::provider::EphemerisProvider;
use crate::ephemeris::types::BirthInput;
use crate::error::ChartError;
use crate::rendering::{ChartRenderer, RenderedChart};

/// A completed request: the chart and the artifacts rendered from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartArtifacts {
    pub chart: ChartResult,
    pub rendered: RenderedChart,
}

/// Runs requests to completion, including rendering.
///
/// The pipeline is CPU bound, so the async methods move it onto tokio's
/// blocking pool. Dropping a returned future abandons its result.
#[derive(Clone)]
pub struct ChartService {
    engine: Arc<ChartEngine>,
    renderer: Arc<ChartRenderer>,
}

impl ChartService {
    pub fn new(engine: ChartEngine, renderer: ChartRenderer) -> Self {
        Self {
            engine: Arc::new(engine),
            renderer: Arc::new(renderer),
        }
    }

    pub fn with_provider(provider: Arc<dyn EphemerisProvider>) -> Self {
        Self::new(ChartEngine::new(provider), ChartRenderer::default())
    }

    pub fn engine(&self) -> &ChartEngine {
        &self.engine
    }

    pub fn renderer(&self) -> &ChartRenderer {
        &self.renderer
    }

    /// Calculate, render and complete one request synchronously.
    pub fn process(&self, input: &BirthInput, config: &ChartConfig) -> Result<ChartArtifacts, ChartError> {
        let deadline = Deadline::start(config.time_budget);
        let chart = self.engine.calculate_within(input, config, &deadline)?;

        let rendered = self.renderer.render(&chart);
        if let Err(err) = deadline.check(CalculationStage::Rendered) {
            warn!("Rendering overran the time budget: {}", err);
            return Err(err);
        }
        deadline.check(CalculationStage::Completed)?;
        debug!("Request completed, content hash {}", rendered.content_hash);
        Ok(ChartArtifacts { chart, rendered })
    }

    pub async fn calculate_async(&self, input: BirthInput, config: ChartConfig) -> Result<ChartResult, ChartError> {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || engine.calculate(&input, &config))
            .await
            .map_err(|e| ChartError::Internal(format!("chart worker failed: {}", e)))?
    }

    pub async fn process_async(&self, input: BirthInput, config: ChartConfig) -> Result<ChartArtifacts, ChartError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.process(&input, &config))
            .await
            .map_err(|e| ChartError::Internal(format!("chart worker failed: {}", e)))?
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new(ChartEngine::default(), ChartRenderer::default())
    }
}
