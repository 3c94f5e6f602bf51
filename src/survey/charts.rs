// Chart specifications, written as Vega-Lite documents that embed their data.

use serde_json::json;
use serde_json::Value as JSValue;

use crate::survey::sink::OutputTable;

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ChartKind {
    /// Vertical bars, one per category of `x`.
    Bar,
    /// Horizontal bars, one per category of `x`, split by `color`. Negative
    /// values extend to the left.
    HorizontalBar,
    /// Distribution of `y` per category of `x`.
    Box,
    /// One dot per row: categories on `x`, values on `y`, optional `size`.
    Scatter,
    /// Quantitative `x` and `y`, dot area from `size`, one color per category.
    Bubble,
    /// Grid of `x` by `y` cells, shaded by the quantitative `color` field.
    Heatmap,
    /// Bars of `y` per category of `x`, stacked by `color`.
    StackedBar,
    /// Bars of `y` with a line of `y2` on a second axis.
    BarLine,
    /// Slices of `y`, one per category of `x`.
    Pie,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ChartSpec {
    pub name: String,
    pub title: String,
    pub kind: ChartKind,
    pub x: String,
    pub y: String,
    pub y2: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub table: OutputTable,
}

impl ChartSpec {
    pub fn new(name: &str, title: &str, kind: ChartKind, table: &OutputTable, x: &str, y: &str) -> ChartSpec {
        ChartSpec {
            name: name.to_string(),
            title: title.to_string(),
            kind,
            x: x.to_string(),
            y: y.to_string(),
            y2: None,
            color: None,
            size: None,
            table: table.clone(),
        }
    }

    pub fn with_color(mut self, color: &str) -> ChartSpec {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_size(mut self, size: &str) -> ChartSpec {
        self.size = Some(size.to_string());
        self
    }

    pub fn with_y2(mut self, y2: &str) -> ChartSpec {
        self.y2 = Some(y2.to_string());
        self
    }
}

/// Vega-Lite reads dots and brackets in field names as nested accesses.
fn escape_field(name: &str) -> String {
    let mut res = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '.' | '[' | ']' | '\\') {
            res.push('\\');
        }
        res.push(c);
    }
    res
}

fn channel(field: &str, field_type: &str) -> JSValue {
    json!({"field": escape_field(field), "type": field_type, "title": field})
}

fn encoding(chart: &ChartSpec) -> JSValue {
    let x = chart.x.as_str();
    let y = chart.y.as_str();
    let mut enc = match chart.kind {
        ChartKind::Bar | ChartKind::StackedBar | ChartKind::Box | ChartKind::Scatter => json!({
            "x": channel(x, "nominal"),
            "y": channel(y, "quantitative"),
        }),
        ChartKind::HorizontalBar => json!({
            "y": channel(x, "nominal"),
            "x": channel(y, "quantitative"),
        }),
        ChartKind::Bubble => json!({
            "x": channel(x, "quantitative"),
            "y": channel(y, "quantitative"),
        }),
        ChartKind::Heatmap => json!({
            "x": channel(x, "ordinal"),
            "y": channel(y, "nominal"),
        }),
        ChartKind::Pie => json!({
            "theta": channel(y, "quantitative"),
            "color": channel(x, "nominal"),
        }),
        ChartKind::BarLine => json!({
            "x": channel(x, "nominal"),
        }),
    };
    // Sorted tables keep their row order on the category axis.
    if matches!(
        chart.kind,
        ChartKind::Bar | ChartKind::StackedBar | ChartKind::BarLine
    ) {
        enc["x"]["sort"] = JSValue::Null;
    }
    if let Some(color) = &chart.color {
        let color_type = match chart.kind {
            ChartKind::Heatmap => "quantitative",
            ChartKind::StackedBar => "ordinal",
            _ => "nominal",
        };
        enc["color"] = channel(color, color_type);
    }
    if let Some(size) = &chart.size {
        enc["size"] = channel(size, "quantitative");
    }
    enc
}

pub fn to_vega_lite(chart: &ChartSpec) -> JSValue {
    let mut spec = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": chart.title,
        "data": {"values": chart.table.to_records()},
    });
    let enc = encoding(chart);
    match chart.kind {
        ChartKind::BarLine => {
            let bars = json!({
                "mark": "bar",
                "encoding": {"y": channel(&chart.y, "quantitative")},
            });
            let line_field = chart.y2.clone().unwrap_or_else(|| chart.y.clone());
            let line = json!({
                "mark": {"type": "line", "point": true, "color": "red"},
                "encoding": {"y": channel(&line_field, "quantitative")},
            });
            spec["encoding"] = enc;
            spec["layer"] = json!([bars, line]);
            spec["resolve"] = json!({"scale": {"y": "independent"}});
        }
        kind => {
            let mark = match kind {
                ChartKind::Bar | ChartKind::HorizontalBar | ChartKind::StackedBar => json!("bar"),
                ChartKind::Box => json!("boxplot"),
                ChartKind::Scatter | ChartKind::Bubble => json!({"type": "circle", "opacity": 0.7}),
                ChartKind::Heatmap => json!("rect"),
                ChartKind::Pie => json!("arc"),
                ChartKind::BarLine => json!("bar"),
            };
            spec["mark"] = mark;
            spec["encoding"] = enc;
        }
    }
    spec
}
