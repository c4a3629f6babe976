//! Interactive bar chart rendered as a self-contained HTML page.
//!
//! The page loads plotly.js from its CDN and embeds the data as JSON; bars
//! are coloured by their value and annotated with two decimals.

use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde_json::json;
use tracing::info;

use crate::frame::text_values;
use crate::outputs::{ensure_dir, ReportError};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const CHART_HEIGHT_PX: u32 = 600;

#[derive(Debug, Clone, Copy)]
pub struct BarChart<'a> {
    pub x_field: &'a str,
    pub y_field: &'a str,
    pub title: &'a str,
}

pub fn render_bar_chart(data: &DataFrame, chart: &BarChart<'_>) -> Result<String, ReportError> {
    let x: Vec<Option<String>> = text_values(data, chart.x_field)?;
    let y_column = data.column(chart.y_field)?.cast(&DataType::Float64)?;
    let y: Vec<Option<f64>> = y_column.f64()?.into_iter().collect();

    let traces = json!([{
        "type": "bar",
        "x": x,
        "y": y,
        "marker": {
            "color": y,
            "colorscale": "Plasma",
            "showscale": true,
            "colorbar": { "title": { "text": chart.y_field } },
        },
        "texttemplate": "%{y:.2f}",
        "textposition": "outside",
        "hovertemplate": format!(
            "{}: %{{x}}<br>{}: %{{y:.2f}}<extra></extra>",
            chart.x_field, chart.y_field
        ),
    }]);

    let layout = json!({
        "title": { "text": chart.title, "x": 0.5, "font": { "size": 24 } },
        "xaxis": { "title": { "text": chart.x_field } },
        "yaxis": { "title": { "text": chart.y_field } },
        "font": { "family": "Arial", "size": 14 },
        "paper_bgcolor": "rgb(243, 243, 243)",
        "height": CHART_HEIGHT_PX,
    });

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart"></div>
<script>
Plotly.newPlot("chart", {traces}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#,
        title = escape_html(chart.title),
        cdn = PLOTLY_CDN,
        traces = script_json(&traces)?,
        layout = script_json(&layout)?,
    ))
}

/// Renders the chart to `output_dir/filename.html`.
pub fn write_bar_chart(
    data: &DataFrame,
    chart: &BarChart<'_>,
    output_dir: &Path,
    filename: &str,
) -> Result<PathBuf, ReportError> {
    let html = render_bar_chart(data, chart)?;
    ensure_dir(output_dir)?;
    let path = output_dir.join(format!("{filename}.html"));
    fs::write(&path, html).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), bars = data.height(), "wrote bar chart");
    Ok(path)
}

// JSON is valid JavaScript, but "</" would close the surrounding script tag.
fn script_json(value: &serde_json::Value) -> Result<String, ReportError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
