//! Dashboard chart factories
//!
//! Each factory builds a fixed presentation as a [`ChartConfig`] (the
//! charting library's configuration schema, serialized with camelCase keys)
//! and hands it to an injected [`ChartSurface`]. A factory returns `None`
//! when the surface has no canvas with the requested id.
//!
//! # Presentations
//!
//! - [`stock_movement_chart`] - stock in/out over time (dual filled lines)
//! - [`category_chart`] - items per category (vertical bars)
//! - [`stock_status_chart`] - in/low/out distribution (doughnut)
//! - [`supplier_chart`] - supplier comparison (horizontal bars)
//! - [`transaction_trend_chart`] - transaction counts (filled area)

use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

/// Default chart colours
pub mod palette {
    pub const PRIMARY: &str = "#4299e1";
    pub const SUCCESS: &str = "#48bb78";
    pub const WARNING: &str = "#ed8936";
    pub const DANGER: &str = "#f56565";
    pub const INFO: &str = "#4299e1";
    pub const SECONDARY: &str = "#718096";
}

const TOOLTIP_BACKGROUND: &str = "rgba(0, 0, 0, 0.8)";
const GRID_COLOR: &str = "rgba(0, 0, 0, 0.05)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Doughnut,
}

/// A single colour or one colour per data point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    One(String),
    PerPoint(Vec<String>),
}

impl From<&str> for Paint {
    fn from(color: &str) -> Self {
        Paint::One(color.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// How tooltip labels are rendered for a data point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TooltipLabel {
    /// Library default (`label: value`)
    #[default]
    Default,
    /// `label: value (pct%)` against the first dataset's total
    Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub data: ChartData,
    pub options: serde_json::Value,
    #[serde(skip)]
    pub tooltip_label: TooltipLabel,
}

impl ChartConfig {
    /// Tooltip text for point `index` of the first dataset
    pub fn tooltip_text(&self, index: usize) -> Option<String> {
        let dataset = self.data.datasets.first()?;
        let value = *dataset.data.get(index)?;
        let label = self.data.labels.get(index).map_or("", String::as_str);
        Some(match self.tooltip_label {
            TooltipLabel::Default => format!("{label}: {value}"),
            TooltipLabel::Percentage => percentage_label(label, value, &dataset.data),
        })
    }
}

/// A chart bound to a canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub id: Uuid,
    pub canvas_id: String,
    pub config: ChartConfig,
}

impl Chart {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}

/// The rendering side of the charting library
pub trait ChartSurface {
    fn has_canvas(&self, canvas_id: &str) -> bool;
    /// Renders `chart`, replacing whatever its canvas showed
    fn draw(&mut self, chart: &Chart);
    fn destroy(&mut self, chart: &Chart);
}

/// Headless surface that keeps the last chart drawn on each canvas
#[derive(Debug, Default)]
pub struct MemorySurface {
    canvases: HashMap<String, Option<Chart>>,
    draw_count: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, canvas_id: &str) -> Self {
        self.add_canvas(canvas_id);
        self
    }

    pub fn add_canvas(&mut self, canvas_id: &str) {
        self.canvases.entry(canvas_id.to_string()).or_default();
    }

    /// Chart currently shown on `canvas_id`
    pub fn chart_on(&self, canvas_id: &str) -> Option<&Chart> {
        self.canvases.get(canvas_id)?.as_ref()
    }

    pub fn draw_count(&self) -> usize {
        self.draw_count
    }
}

impl ChartSurface for MemorySurface {
    fn has_canvas(&self, canvas_id: &str) -> bool {
        self.canvases.contains_key(canvas_id)
    }

    fn draw(&mut self, chart: &Chart) {
        self.draw_count += 1;
        self.canvases
            .insert(chart.canvas_id.clone(), Some(chart.clone()));
    }

    fn destroy(&mut self, chart: &Chart) {
        if let Some(slot) = self.canvases.get_mut(&chart.canvas_id)
            && slot.as_ref().is_some_and(|c| c.id == chart.id)
        {
            *slot = None;
        }
    }
}

/// `"<label>: <value> (<pct>%)"` with `pct` to one decimal.
///
/// A zero total renders `0.0%`.
pub fn percentage_label(label: &str, value: f64, values: &[f64]) -> String {
    let total: f64 = values.iter().sum();
    let percentage = if total == 0.0 {
        0.0
    } else {
        value / total * 100.0
    };
    format!("{label}: {value} ({percentage:.1}%)")
}

fn to_labels(labels: &[impl AsRef<str>]) -> Vec<String> {
    labels.iter().map(|l| l.as_ref().to_string()).collect()
}

fn mount<S: ChartSurface>(surface: &mut S, canvas_id: &str, config: ChartConfig) -> Option<Chart> {
    if !surface.has_canvas(canvas_id) {
        tracing::error!("Canvas element not found: {}", canvas_id);
        return None;
    }
    let chart = Chart {
        id: Uuid::new_v4(),
        canvas_id: canvas_id.to_string(),
        config,
    };
    surface.draw(&chart);
    Some(chart)
}

fn count_axis(ticks_color: bool) -> serde_json::Value {
    if ticks_color {
        json!({
            "beginAtZero": true,
            "ticks": { "precision": 0, "color": palette::SECONDARY },
            "grid": { "color": GRID_COLOR }
        })
    } else {
        json!({ "beginAtZero": true, "ticks": { "precision": 0 } })
    }
}

fn label_axis() -> serde_json::Value {
    json!({
        "ticks": { "color": palette::SECONDARY },
        "grid": { "display": false }
    })
}

/// Stock in/out movements as two filled lines
pub fn stock_movement_chart<S: ChartSurface>(
    surface: &mut S,
    canvas_id: &str,
    labels: &[impl AsRef<str>],
    stock_in: &[f64],
    stock_out: &[f64],
) -> Option<Chart> {
    let config = ChartConfig {
        chart_type: ChartType::Line,
        data: ChartData {
            labels: to_labels(labels),
            datasets: vec![
                Dataset {
                    label: Some("Stock In".to_string()),
                    data: stock_in.to_vec(),
                    border_color: Some(palette::SUCCESS.into()),
                    background_color: Some("rgba(72, 187, 120, 0.1)".into()),
                    tension: Some(0.4),
                    fill: Some(true),
                    border_width: Some(2),
                    border_radius: None,
                },
                Dataset {
                    label: Some("Stock Out".to_string()),
                    data: stock_out.to_vec(),
                    border_color: Some(palette::WARNING.into()),
                    background_color: Some("rgba(237, 137, 54, 0.1)".into()),
                    tension: Some(0.4),
                    fill: Some(true),
                    border_width: Some(2),
                    border_radius: None,
                },
            ],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": {
                    "position": "top",
                    "labels": { "usePointStyle": true, "padding": 15 }
                },
                "tooltip": {
                    "mode": "index",
                    "intersect": false,
                    "backgroundColor": TOOLTIP_BACKGROUND,
                    "padding": 12,
                    "titleColor": "#fff",
                    "bodyColor": "#fff",
                    "borderColor": palette::PRIMARY,
                    "borderWidth": 1
                }
            },
            "scales": { "y": count_axis(true), "x": label_axis() },
            "interaction": { "mode": "nearest", "axis": "x", "intersect": false }
        }),
        tooltip_label: TooltipLabel::Default,
    };
    mount(surface, canvas_id, config)
}

/// Items per category as vertical bars
pub fn category_chart<S: ChartSurface>(
    surface: &mut S,
    canvas_id: &str,
    categories: &[impl AsRef<str>],
    counts: &[f64],
) -> Option<Chart> {
    let config = ChartConfig {
        chart_type: ChartType::Bar,
        data: ChartData {
            labels: to_labels(categories),
            datasets: vec![Dataset {
                label: Some("Items per Category".to_string()),
                data: counts.to_vec(),
                border_color: Some(palette::PRIMARY.into()),
                background_color: Some(palette::PRIMARY.into()),
                border_width: Some(1),
                border_radius: Some(6),
                ..Dataset::default()
            }],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": { "display": false },
                "tooltip": { "backgroundColor": TOOLTIP_BACKGROUND, "padding": 12 }
            },
            "scales": { "y": count_axis(true), "x": label_axis() }
        }),
        tooltip_label: TooltipLabel::Default,
    };
    mount(surface, canvas_id, config)
}

/// In-stock / low-stock / out-of-stock distribution with percentage tooltips
pub fn stock_status_chart<S: ChartSurface>(
    surface: &mut S,
    canvas_id: &str,
    in_stock: u64,
    low_stock: u64,
    out_of_stock: u64,
) -> Option<Chart> {
    use crate::core::stock::StockStatus;

    let config = ChartConfig {
        chart_type: ChartType::Doughnut,
        data: ChartData {
            labels: [
                StockStatus::InStock,
                StockStatus::LowStock,
                StockStatus::OutOfStock,
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            datasets: vec![Dataset {
                data: vec![in_stock as f64, low_stock as f64, out_of_stock as f64],
                background_color: Some(Paint::PerPoint(vec![
                    palette::SUCCESS.to_string(),
                    palette::WARNING.to_string(),
                    palette::DANGER.to_string(),
                ])),
                border_width: Some(2),
                border_color: Some("#fff".into()),
                ..Dataset::default()
            }],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": {
                    "position": "bottom",
                    "labels": { "usePointStyle": true, "padding": 15 }
                },
                "tooltip": { "backgroundColor": TOOLTIP_BACKGROUND, "padding": 12 }
            }
        }),
        tooltip_label: TooltipLabel::Percentage,
    };
    mount(surface, canvas_id, config)
}

/// Supplier comparison as horizontal bars
pub fn supplier_chart<S: ChartSurface>(
    surface: &mut S,
    canvas_id: &str,
    suppliers: &[impl AsRef<str>],
    values: &[f64],
) -> Option<Chart> {
    let config = ChartConfig {
        chart_type: ChartType::Bar,
        data: ChartData {
            labels: to_labels(suppliers),
            datasets: vec![Dataset {
                label: Some("Items Supplied".to_string()),
                data: values.to_vec(),
                background_color: Some(palette::INFO.into()),
                border_radius: Some(6),
                ..Dataset::default()
            }],
        },
        options: json!({
            "indexAxis": "y",
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "display": false } },
            "scales": { "x": count_axis(false) }
        }),
        tooltip_label: TooltipLabel::Default,
    };
    mount(surface, canvas_id, config)
}

/// Transaction counts as a single filled area
pub fn transaction_trend_chart<S: ChartSurface>(
    surface: &mut S,
    canvas_id: &str,
    labels: &[impl AsRef<str>],
    data: &[f64],
) -> Option<Chart> {
    let config = ChartConfig {
        chart_type: ChartType::Line,
        data: ChartData {
            labels: to_labels(labels),
            datasets: vec![Dataset {
                label: Some("Transactions".to_string()),
                data: data.to_vec(),
                border_color: Some(palette::PRIMARY.into()),
                background_color: Some("rgba(66, 153, 225, 0.2)".into()),
                tension: Some(0.4),
                fill: Some(true),
                border_width: Some(2),
                border_radius: None,
            }],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "display": false } },
            "scales": { "y": count_axis(false) }
        }),
        tooltip_label: TooltipLabel::Default,
    };
    mount(surface, canvas_id, config)
}

/// Tears a chart down
pub fn destroy_chart<S: ChartSurface>(surface: &mut S, chart: Chart) {
    surface.destroy(&chart);
}

/// Replaces labels and first-dataset data in place and redraws
pub fn update_chart_data<S: ChartSurface>(
    surface: &mut S,
    chart: &mut Chart,
    labels: &[impl AsRef<str>],
    data: &[f64],
) {
    chart.config.data.labels = to_labels(labels);
    if let Some(dataset) = chart.config.data.datasets.first_mut() {
        dataset.data = data.to_vec();
    }
    surface.draw(chart);
}
