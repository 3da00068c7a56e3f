//! Renderer-ready chart payloads.
//!
//! The summarization core does not draw anything; it emits plotly-shaped
//! payloads (trace data + layout + the category label/color mapping passed
//! through unchanged) for an external renderer to display or rasterize.

pub mod site_counts;
pub mod totals;

pub use site_counts::{SiteCountsByWellChart, SiteCountsChart};
pub use totals::{TotalCountsByWellChart, TotalCountsChart};

use plotly::Layout;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display name of a quality category paired with its pass-through color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub label: String,
    pub color: String,
}

impl CategoryStyle {
    /// Build styles from the configuration's parallel (label, color) pairs.
    pub fn from_pairs(pairs: &[(String, String)]) -> Vec<CategoryStyle> {
        pairs
            .iter()
            .map(|(label, color)| CategoryStyle {
                label: label.clone(),
                color: color.clone(),
            })
            .collect()
    }
}

const DEFAULT_PLOTLY_CONFIG: &str = r#"{
    "displayModeBar": true,
    "staticPlot": false,
    "dragmode": "zoom",
    "modeBarButtons": [
        [
            "toImage"
        ]
    ]
}"#;

pub fn default_plotly_config() -> Value {
    serde_json::from_str::<Value>(DEFAULT_PLOTLY_CONFIG).unwrap()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TitleWithHelp {
    #[serde(rename = "helpText")]
    pub help: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PlotlyChart {
    pub config: Value,
    pub data: Vec<Value>,
    pub layout: Value,
}

impl PlotlyChart {
    pub fn with_layout_and_data<D: Serialize>(layout: Layout, data: Vec<D>) -> Self {
        PlotlyChart {
            config: default_plotly_config(),
            data: data
                .into_iter()
                .map(|d| serde_json::to_value(&d).unwrap())
                .collect(),
            layout: serde_json::to_value(&layout).unwrap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartWithHelp {
    pub plot: PlotlyChart,
    pub help: TitleWithHelp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_json_roundtrip;

    #[test]
    fn test_config_valid_json() {
        let _ = default_plotly_config();
    }

    #[test]
    fn test_header_with_help() {
        test_json_roundtrip::<TitleWithHelp>(
            r#"{
            "helpText": "This is the help text",
            "title": "This is the title"
        }"#,
        );
    }
}
