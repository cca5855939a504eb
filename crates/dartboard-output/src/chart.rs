//! SVG line chart of performance by iteration.

use crate::summary::PerformanceSummary;
use std::fs;
use std::path::Path;
use thiserror::Error;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 48.0;
const SERIES_COLOR: &str = "#1f4fbf";
const MEAN_COLOR: &str = "#d62728";
const MIN_COLOR: &str = "#1f77b4";
const MAX_COLOR: &str = "#2ca02c";
const MEDIAN_COLOR: &str = "#8c8c8c";
const BENCHMARK_COLOR: &str = "#ff9933";
const Y_TICKS: usize = 5;

/// Errors that can occur while rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Nothing to plot.
    #[error("No performances to plot")]
    Empty,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

struct Guide {
    value: f64,
    color: &'static str,
    label: String,
}

/// Render the performances as an SVG document.
///
/// Draws the series with horizontal guides at the mean, min, max and median,
/// and at the benchmark mean when the summary carries a comparison.
///
/// # Errors
///
/// Returns [`ChartError::Empty`] when `values` is empty.
pub fn render_performance_chart(
    values: &[f64],
    summary: &PerformanceSummary,
    title: &str,
) -> Result<String, ChartError> {
    if values.is_empty() {
        return Err(ChartError::Empty);
    }

    let stats = &summary.overall;
    let mut guides = vec![
        Guide {
            value: stats.mean,
            color: MEAN_COLOR,
            label: format!("Average Performance: {:.2}%", stats.mean),
        },
        Guide {
            value: stats.min,
            color: MIN_COLOR,
            label: format!("Min Performance: {:.2}%", stats.min),
        },
        Guide {
            value: stats.max,
            color: MAX_COLOR,
            label: format!("Max Performance: {:.2}%", stats.max),
        },
        Guide {
            value: stats.median,
            color: MEDIAN_COLOR,
            label: format!("Median Performance: {:.2}%", stats.median),
        },
    ];
    if let Some(cmp) = &summary.benchmark {
        guides.push(Guide {
            value: cmp.benchmark_mean,
            color: BENCHMARK_COLOR,
            label: format!("Benchmark Average: {:.2}%", cmp.benchmark_mean),
        });
    }

    let (min_v, max_v) = extent(values, &guides);

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><style>text{{font-family:Arial,sans-serif;font-size:11px;fill:#444}}</style>"#,
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str(&format!(
        r##"<rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff" />"##,
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="14">{title}</text>"#,
        x = WIDTH / 2.0,
        y = PADDING / 2.0,
        title = escape(title)
    ));

    draw_axes(&mut svg, values.len(), min_v, max_v);

    let points = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            format!(
                "{:.2},{:.2}",
                x_position(i, values.len()),
                scale_value(*v, min_v, max_v)
            )
        })
        .collect::<Vec<_>>()
        .join(" ");
    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{color}" stroke-width="1.2" points="{points}" />"#,
        color = SERIES_COLOR
    ));
    if values.len() <= 200 {
        for (i, v) in values.iter().enumerate() {
            svg.push_str(&format!(
                r#"<circle cx="{x:.2}" cy="{y:.2}" r="2" fill="{color}" />"#,
                x = x_position(i, values.len()),
                y = scale_value(*v, min_v, max_v),
                color = SERIES_COLOR
            ));
        }
    }

    for guide in &guides {
        let y = scale_value(guide.value, min_v, max_v);
        svg.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="1" stroke-dasharray="5 4" />"#,
            x1 = PADDING,
            x2 = WIDTH - PADDING,
            color = guide.color
        ));
    }

    draw_legend(&mut svg, &guides);
    svg.push_str("</svg>");
    Ok(svg)
}

/// Render and write the chart to `path`.
///
/// # Errors
///
/// Fails when there is nothing to plot or the file cannot be written.
pub fn write_performance_chart(
    path: &Path,
    values: &[f64],
    summary: &PerformanceSummary,
    title: &str,
) -> Result<(), ChartError> {
    let svg = render_performance_chart(values, summary, title)?;
    fs::write(path, svg)?;
    Ok(())
}

fn extent(values: &[f64], guides: &[Guide]) -> (f64, f64) {
    let all = values.iter().chain(guides.iter().map(|g| &g.value));
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for v in all.filter(|v| v.is_finite()) {
        min_v = min_v.min(*v);
        max_v = max_v.max(*v);
    }
    if !min_v.is_finite() || !max_v.is_finite() {
        return (-1.0, 1.0);
    }
    // widen flat ranges
    if (max_v - min_v).abs() < f64::EPSILON {
        let adjust = if min_v == 0.0 { 1.0 } else { min_v.abs() * 0.1 };
        return (min_v - adjust, max_v + adjust);
    }
    let margin = (max_v - min_v) * 0.05;
    (min_v - margin, max_v + margin)
}

fn scale_value(value: f64, min_v: f64, max_v: f64) -> f64 {
    let inner_height = HEIGHT - 2.0 * PADDING;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner_height
}

fn x_position(index: usize, count: usize) -> f64 {
    let inner_width = WIDTH - 2.0 * PADDING;
    if count <= 1 {
        return PADDING + inner_width / 2.0;
    }
    PADDING + inner_width * index as f64 / (count - 1) as f64
}

fn draw_axes(svg: &mut String, count: usize, min_v: f64, max_v: f64) {
    svg.push_str(&format!(
        r##"<line x1="{p:.2}" y1="{p:.2}" x2="{p:.2}" y2="{b:.2}" stroke="#999" stroke-width="1" />"##,
        p = PADDING,
        b = HEIGHT - PADDING
    ));
    svg.push_str(&format!(
        r##"<line x1="{p:.2}" y1="{b:.2}" x2="{r:.2}" y2="{b:.2}" stroke="#999" stroke-width="1" />"##,
        p = PADDING,
        r = WIDTH - PADDING,
        b = HEIGHT - PADDING
    ));

    for tick in 0..=Y_TICKS {
        let value = min_v + (max_v - min_v) * tick as f64 / Y_TICKS as f64;
        let y = scale_value(value, min_v, max_v);
        svg.push_str(&format!(
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#eeeeee" stroke-width="1" />"##,
            x1 = PADDING,
            x2 = WIDTH - PADDING
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{value:.1}%</text>"#,
            x = PADDING - 6.0,
            y = y + 4.0
        ));
    }

    let last = count.saturating_sub(1);
    let mut ticks = vec![0, last / 4, last / 2, last * 3 / 4, last];
    ticks.dedup();
    for index in ticks {
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{index}</text>"#,
            x = x_position(index, count),
            y = HEIGHT - PADDING + 16.0
        ));
    }

    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">Iteration</text>"#,
        x = WIDTH / 2.0,
        y = HEIGHT - 8.0
    ));
    svg.push_str(&format!(
        r#"<text x="14" y="{y:.2}" text-anchor="middle" transform="rotate(-90 14 {y:.2})">Portfolio Percent Gain</text>"#,
        y = HEIGHT / 2.0
    ));
}

fn draw_legend(svg: &mut String, guides: &[Guide]) {
    let x = PADDING + 10.0;
    let mut y = PADDING + 14.0;
    for guide in guides {
        svg.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{ly:.2}" x2="{x2:.2}" y2="{ly:.2}" stroke="{color}" stroke-width="1.5" stroke-dasharray="5 4" />"#,
            x1 = x,
            x2 = x + 20.0,
            ly = y - 4.0,
            color = guide.color
        ));
        svg.push_str(&format!(
            r#"<text x="{tx:.2}" y="{y:.2}" text-anchor="start">{label}</text>"#,
            tx = x + 26.0,
            label = escape(&guide.label)
        ));
        y += 16.0;
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize;
    use dartboard_core::{BenchmarkReturns, YearlyPerformance};

    fn summary_for(values: &[f64], benchmark: Option<&BenchmarkReturns>) -> PerformanceSummary {
        let perfs: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(iteration, &performance)| YearlyPerformance {
                year: 2023,
                iteration,
                performance,
                sampled: 10,
                with_data: 10,
            })
            .collect();
        summarize(&perfs, benchmark).unwrap()
    }

    #[test]
    fn test_renders_series_and_guides() {
        let values = [5.0, -2.0, 12.0, 9.0];
        let svg = render_performance_chart(&values, &summary_for(&values, None), "2023").unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert!(svg.contains("Average Performance: 6.00%"));
        assert!(svg.contains("Min Performance: -2.00%"));
        assert!(svg.contains("Max Performance: 12.00%"));
        assert!(!svg.contains("Benchmark Average"));
    }

    #[test]
    fn test_benchmark_guide() {
        let values = [1.0, 3.0];
        let benchmark: BenchmarkReturns = [(2023, 4.0)].into_iter().collect();
        let svg = render_performance_chart(
            &values,
            &summary_for(&values, Some(&benchmark)),
            "S&P <500>",
        )
        .unwrap();

        assert!(svg.contains("Benchmark Average: 4.00%"));
        assert!(svg.contains("S&amp;P &lt;500&gt;"));
    }

    #[test]
    fn test_flat_series() {
        let values = [0.0, 0.0, 0.0];
        let svg = render_performance_chart(&values, &summary_for(&values, None), "flat").unwrap();
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_empty_values() {
        let summary = summary_for(&[1.0], None);
        assert!(matches!(
            render_performance_chart(&[], &summary, "x"),
            Err(ChartError::Empty)
        ));
    }

    #[test]
    fn test_write_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let values = [1.0, 2.0];
        write_performance_chart(&path, &values, &summary_for(&values, None), "t").unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("<polyline"));
    }
}
