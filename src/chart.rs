//! Line chart lifecycle.
//!
//! The chart itself is drawn in the browser by Chart.js; the server owns the
//! live instance (its config) and guarantees at most one exists at a time.

use serde::Serialize;
use tracing::debug;

pub const DATASET_LABEL: &str = "Confirmed for the last two weeks";
const DATASET_COLOR: &str = "#feb72b";

/// Chart.js configuration for the confirmed-cases line chart.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: serde_json::Value,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub background_color: String,
    pub border_color: String,
    pub fill: bool,
    pub data: Vec<i64>,
}

impl ChartConfig {
    pub fn line(data: Vec<i64>, labels: Vec<String>) -> Self {
        Self {
            kind: "line",
            data: ChartData {
                labels,
                datasets: vec![Dataset {
                    label: DATASET_LABEL.to_string(),
                    background_color: DATASET_COLOR.to_string(),
                    border_color: DATASET_COLOR.to_string(),
                    fill: true,
                    data,
                }],
            },
            options: serde_json::json!({}),
        }
    }
}

/// A live chart instance bound to the page's canvas.
pub trait LineChart: Send + Sync {
    fn config(&self) -> &ChartConfig;

    /// Releases the instance. Called exactly once, before replacement.
    fn destroy(&mut self);
}

/// Creates chart instances.
pub trait ChartFactory: Send + Sync {
    fn create(&self, config: ChartConfig) -> Box<dyn LineChart>;
}

/// Chart.js-backed instance; the dashboard template embeds its config.
#[derive(Debug)]
pub struct ChartJsChart {
    config: ChartConfig,
}

impl LineChart for ChartJsChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Releasing only drops the config with the instance; the browser builds
    /// a fresh Chart.js chart from the current config on every page load.
    fn destroy(&mut self) {
        debug!(
            "Destroying chart with {} points",
            self.config.data.labels.len()
        );
    }
}

#[derive(Debug, Default)]
pub struct ChartJsFactory;

impl ChartFactory for ChartJsFactory {
    fn create(&self, config: ChartConfig) -> Box<dyn LineChart> {
        Box::new(ChartJsChart { config })
    }
}

/// Owner of the single rendered chart.
#[derive(Default)]
pub struct ChartHandle {
    current: Option<Box<dyn LineChart>>,
}

impl ChartHandle {
    /// Destroys any live chart, then builds and keeps a new one.
    pub fn replace(&mut self, factory: &dyn ChartFactory, config: ChartConfig) {
        if let Some(mut old) = self.current.take() {
            old.destroy();
        }
        self.current = Some(factory.create(config));
    }

    pub fn current(&self) -> Option<&ChartConfig> {
        self.current.as_deref().map(|c| c.config())
    }
}
