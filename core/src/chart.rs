use std::{fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    config::RenderConfig,
    error::{PlotError, Result},
    page::{self, PageSection},
    summary::SummarySeries,
    visualization,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Bar,
    Scatter,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub kind: TraceKind,
    #[serde(with = "gaps")]
    pub x: Vec<f64>,
    #[serde(with = "gaps")]
    pub y: Vec<f64>,
}

impl Trace {
    pub fn new(name: impl Into<String>, kind: TraceKind, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            kind,
            x,
            y,
        }
    }

    /// Bars at x = 0, 1, 2, ...
    pub fn indexed_bars(name: impl Into<String>, y: Vec<f64>) -> Self {
        let x = (0..y.len()).map(|i| i as f64).collect();
        Self::new(name, TraceKind::Bar, x, y)
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: Option<String>,
    /// Category names for x = 0, 1, 2, ... when the axis is not numeric.
    pub x_labels: Option<Vec<String>>,
    pub traces: Vec<Trace>,
}

impl Chart {
    pub fn new(title: Option<String>) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    pub fn with_x_labels(mut self, labels: Vec<String>) -> Self {
        self.x_labels = Some(labels);
        self
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn validate(&self) -> Result<()> {
        for trace in &self.traces {
            if trace.x.len() != trace.y.len() {
                return Err(PlotError::invalid_chart(format!(
                    "trace `{}` has {} x values but {} y values",
                    trace.name,
                    trace.x.len(),
                    trace.y.len()
                )));
            }
        }
        Ok(())
    }
}

/// Display label to summary series, in insertion order. Labels may repeat.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamedSeriesSet {
    entries: Vec<(String, SummarySeries)>,
}

impl NamedSeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry; an existing entry with the same label is kept as its own trace.
    pub fn insert(&mut self, label: impl Into<String>, series: SummarySeries) {
        self.entries.push((label.into(), series));
    }

    /// The first series labelled `label`.
    pub fn get(&self, label: &str) -> Option<&SummarySeries> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, series)| series)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SummarySeries)> {
        self.entries
            .iter()
            .map(|(label, series)| (label.as_str(), series))
    }

    /// One trace per entry with x = generation index.
    pub fn to_chart(&self, title: &str, kind: TraceKind) -> Chart {
        let traces = self
            .iter()
            .map(|(label, series)| {
                Trace::new(label, kind, series.generations(), series.values.clone())
            })
            .collect();
        Chart {
            title: Some(title.to_string()),
            x_labels: None,
            traces,
        }
    }
}

/// Render every series in `set` as grouped bars into an HTML page at `path`.
pub fn render(set: &NamedSeriesSet, title: &str, path: &Path) -> Result<()> {
    render_chart(
        &set.to_chart(title, TraceKind::Bar),
        &RenderConfig::default(),
        path,
    )
}

/// Write `chart` to `path` as a self-contained HTML page, replacing any existing file.
pub fn render_chart(chart: &Chart, config: &RenderConfig, path: &Path) -> Result<()> {
    chart.validate()?;

    let svg = visualization::draw_svg(chart, config);
    let download = format!(
        "<a download=\"chart.svg\" href=\"{}\">Download SVG</a>",
        visualization::encode_svg_data_url(&svg)
    );
    let data =
        serde_json::to_string(chart).map_err(|err| PlotError::invalid_chart(err.to_string()))?;
    let title = chart.title.as_deref().unwrap_or("Chart");

    let html = page::compose(
        title,
        &[
            PageSection::new(
                "heading",
                format!("<h1>{}</h1>", visualization::escape_text(title)),
            ),
            PageSection::new("chart", svg),
            PageSection::new("download", download),
            PageSection::new("data", page::embed_json(&data)),
        ],
    )?;

    fs::write(path, html).map_err(|err| PlotError::io(path, err))?;
    tracing::debug!(
        path = %path.display(),
        traces = chart.traces.len(),
        "wrote chart"
    );
    Ok(())
}

/// Recover the chart embedded in a page written by [`render_chart`].
pub fn read_chart(path: &Path) -> Result<Chart> {
    let html = fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => PlotError::NotFound {
            path: path.to_path_buf(),
        },
        _ => PlotError::io(path, err),
    })?;
    let data = page::embedded_json(&html, "data").map_err(|err| PlotError::parse(path, err))?;
    serde_json::from_str(data).map_err(|err| PlotError::parse(path, err))
}

/// JSON has no NaN or infinity; non-finite values travel as `null` and come back as NaN.
mod gaps {
    use super::*;

    pub fn serialize<S>(values: &[f64], serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(values.iter().map(|v| v.is_finite().then_some(*v)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
        Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}
