use std::fmt::Write as _;

use base64::Engine;

use crate::{
    chart::{Chart, Trace, TraceKind},
    config::RenderConfig,
};

const FONT: &str = "font-family='Segoe UI, Helvetica, Arial, sans-serif'";
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];
const Y_TICKS: usize = 5;
const MAX_X_TICKS: usize = 20;
const LEGEND_ROW: f64 = 18.0;

/// Encode an SVG document as a base64 data URL.
pub fn encode_svg_data_url(svg: &str) -> String {
    let base64 = base64::engine::general_purpose::STANDARD.encode(svg.as_bytes());
    format!("data:image/svg+xml;base64,{base64}")
}

pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
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

/// Where x values land horizontally.
enum XAxis {
    /// One slot per distinct x value; bars of different traces share a slot side by side.
    Slots(Vec<f64>),
    Linear { min: f64, max: f64 },
}

impl XAxis {
    fn for_chart(chart: &Chart) -> Self {
        let finite_x = || {
            chart
                .traces
                .iter()
                .flat_map(|t| t.x.iter().copied())
                .filter(|x| x.is_finite())
        };

        if chart.x_labels.is_some() || chart.traces.iter().any(|t| t.kind == TraceKind::Bar) {
            let mut slots: Vec<f64> = finite_x().collect();
            if let Some(labels) = &chart.x_labels {
                slots.extend((0..labels.len()).map(|i| i as f64));
            }
            slots.sort_by(f64::total_cmp);
            slots.dedup();
            Self::Slots(slots)
        } else {
            let (min, max) = bounds(finite_x()).unwrap_or((0.0, 1.0));
            Self::Linear { min, max }
        }
    }

    fn slot_width(&self, plot_width: f64) -> f64 {
        match self {
            Self::Slots(slots) => plot_width / slots.len().max(1) as f64,
            Self::Linear { .. } => 0.0,
        }
    }

    /// Horizontal centre of `x` inside the plot area.
    fn position(&self, x: f64, plot_width: f64) -> Option<f64> {
        match self {
            Self::Slots(slots) => {
                let index = slots.iter().position(|s| *s == x)?;
                Some((index as f64 + 0.5) * self.slot_width(plot_width))
            }
            Self::Linear { min, max } => {
                x.is_finite().then(|| (x - min) / (max - min) * plot_width)
            }
        }
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return None;
    }
    if min == max {
        return Some((min - 1.0, max + 1.0));
    }
    Some((min, max))
}

fn y_range(chart: &Chart) -> (f64, f64) {
    let finite_y = chart
        .traces
        .iter()
        .flat_map(|t| t.y.iter().copied())
        .filter(|y| y.is_finite());
    let has_bars = chart.traces.iter().any(|t| t.kind == TraceKind::Bar);

    match bounds(finite_y) {
        // Bars grow from zero, so zero must be on the axis.
        Some((min, max)) if has_bars => (min.min(0.0), max.max(0.0)),
        Some((min, max)) => {
            let pad = (max - min) * 0.05;
            (min - pad, max + pad)
        }
        None => (0.0, 1.0),
    }
}

fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 {
        "0".to_string()
    } else if !(1e-3..1e6).contains(&magnitude) {
        format!("{value:.2e}")
    } else if magnitude >= 100.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.3}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Draw `chart` as a standalone SVG document.
pub fn draw_svg(chart: &Chart, config: &RenderConfig) -> String {
    let width = config.width;
    let height = config.height;
    let margin = config.margin;
    let plot_width = width - 2.0 * margin;
    let plot_height = height - 2.0 * margin;

    let x_axis = XAxis::for_chart(chart);
    let (y_min, y_max) = y_range(chart);
    let y_to_px = |y: f64| plot_height - (y - y_min) / (y_max - y_min) * plot_height;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width:.0}' height='{height:.0}' viewBox='0 0 {width:.0} {height:.0}'>"
    );
    let _ = writeln!(
        svg,
        "  <rect width='{width:.0}' height='{height:.0}' fill='#ffffff'/>"
    );
    if let Some(title) = &chart.title {
        let _ = writeln!(
            svg,
            "  <text x='{:.2}' y='{:.2}' text-anchor='middle' fill='#2a3f5f' {FONT} font-size='18'>{}</text>",
            width / 2.0,
            margin / 2.0,
            escape_text(title)
        );
    }

    let _ = writeln!(svg, "  <g transform='translate({margin:.2} {margin:.2})'>");

    // y grid and ticks
    for i in 0..=Y_TICKS {
        let value = y_min + (y_max - y_min) * i as f64 / Y_TICKS as f64;
        let y = y_to_px(value);
        let _ = writeln!(
            svg,
            "    <line x1='0' y1='{y:.2}' x2='{plot_width:.2}' y2='{y:.2}' stroke='#e5ecf6' stroke-width='1'/>"
        );
        let _ = writeln!(
            svg,
            "    <text x='-8' y='{:.2}' text-anchor='end' fill='#506784' {FONT} font-size='12'>{}</text>",
            y + 4.0,
            format_tick(value)
        );
    }

    draw_x_ticks(&mut svg, chart, &x_axis, plot_width, plot_height);

    let bar_traces: Vec<&Trace> = chart
        .traces
        .iter()
        .filter(|t| t.kind == TraceKind::Bar)
        .collect();
    let slot_width = x_axis.slot_width(plot_width);
    let bar_width = slot_width * (1.0 - config.bar_gap) / bar_traces.len().max(1) as f64;
    let baseline = y_to_px(0.0_f64.clamp(y_min, y_max));

    for (index, trace) in chart.traces.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        match trace.kind {
            TraceKind::Bar => {
                let group = bar_traces
                    .iter()
                    .position(|t| std::ptr::eq(*t, trace))
                    .unwrap_or(0);
                let offset = -slot_width * (1.0 - config.bar_gap) / 2.0 + group as f64 * bar_width;
                for (x, y) in trace.points().filter(|(_, y)| y.is_finite()) {
                    let Some(centre) = x_axis.position(x, plot_width) else {
                        continue;
                    };
                    let top = y_to_px(y);
                    let _ = writeln!(
                        svg,
                        "    <rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='{color}'/>",
                        centre + offset,
                        top.min(baseline),
                        bar_width,
                        (top - baseline).abs()
                    );
                }
            }
            TraceKind::Scatter => {
                draw_scatter(&mut svg, trace, color, |x, y| {
                    x_axis.position(x, plot_width).map(|px| (px, y_to_px(y)))
                });
            }
        }
    }

    let _ = writeln!(
        svg,
        "    <line x1='0' y1='{plot_height:.2}' x2='{plot_width:.2}' y2='{plot_height:.2}' stroke='#506784' stroke-width='1.2'/>"
    );
    let _ = writeln!(
        svg,
        "    <line x1='0' y1='0' x2='0' y2='{plot_height:.2}' stroke='#506784' stroke-width='1.2'/>"
    );

    draw_legend(&mut svg, chart, plot_width);

    let _ = writeln!(svg, "  </g>");
    let _ = writeln!(svg, "</svg>");
    svg
}

fn draw_x_ticks(svg: &mut String, chart: &Chart, x_axis: &XAxis, plot_width: f64, plot_height: f64) {
    let label_for = |x: f64| -> String {
        chart
            .x_labels
            .as_ref()
            .filter(|_| x >= 0.0 && x.fract() == 0.0)
            .and_then(|labels| labels.get(x as usize))
            .cloned()
            .unwrap_or_else(|| format_tick(x))
    };

    let ticks: Vec<f64> = match x_axis {
        XAxis::Slots(slots) => {
            let step = slots.len().div_ceil(MAX_X_TICKS).max(1);
            slots.iter().copied().step_by(step).collect()
        }
        XAxis::Linear { min, max } => (0..=Y_TICKS)
            .map(|i| min + (max - min) * i as f64 / Y_TICKS as f64)
            .collect(),
    };

    for x in ticks {
        let Some(px) = x_axis.position(x, plot_width) else {
            continue;
        };
        let _ = writeln!(
            svg,
            "    <text x='{px:.2}' y='{:.2}' text-anchor='middle' fill='#506784' {FONT} font-size='12'>{}</text>",
            plot_height + 18.0,
            escape_text(&label_for(x))
        );
    }
}

/// Markers joined by line segments; non-finite points break the line.
fn draw_scatter<F>(svg: &mut String, trace: &Trace, color: &str, project: F)
where
    F: Fn(f64, f64) -> Option<(f64, f64)>,
{
    let mut path = String::new();
    let mut pen_down = false;
    let mut markers = Vec::new();

    for (x, y) in trace.points() {
        let projected = if y.is_finite() { project(x, y) } else { None };
        match projected {
            Some((px, py)) => {
                let command = if pen_down { 'L' } else { 'M' };
                let _ = write!(path, "{command}{px:.2},{py:.2} ");
                pen_down = true;
                markers.push((px, py));
            }
            None => pen_down = false,
        }
    }

    if !path.is_empty() {
        let _ = writeln!(
            svg,
            "    <path d='{}' fill='none' stroke='{color}' stroke-width='2' stroke-linejoin='round'/>",
            path.trim_end()
        );
    }
    for (px, py) in markers {
        let _ = writeln!(
            svg,
            "    <circle cx='{px:.2}' cy='{py:.2}' r='3.5' fill='{color}'/>"
        );
    }
}

fn draw_legend(svg: &mut String, chart: &Chart, plot_width: f64) {
    if chart.traces.is_empty() {
        return;
    }
    let _ = writeln!(
        svg,
        "    <g transform='translate({:.2} 8)'>",
        plot_width - 8.0
    );
    for (index, trace) in chart.traces.iter().enumerate() {
        let y = index as f64 * LEGEND_ROW;
        let _ = writeln!(
            svg,
            "      <rect x='-12' y='{y:.2}' width='12' height='12' fill='{}'/>",
            PALETTE[index % PALETTE.len()]
        );
        let _ = writeln!(
            svg,
            "      <text x='-18' y='{:.2}' text-anchor='end' fill='#2a3f5f' {FONT} font-size='12'>{}</text>",
            y + 10.0,
            escape_text(&trace.name)
        );
    }
    let _ = writeln!(svg, "    </g>");
}
