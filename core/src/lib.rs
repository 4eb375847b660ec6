pub mod chart;
pub mod config;
pub mod error;
pub mod jobs;
pub mod logging;
pub mod page;
pub mod records;
pub mod runlog;
pub mod summary;
pub mod visualization;

pub use chart::{read_chart, render, render_chart, Chart, NamedSeriesSet, Trace, TraceKind};
pub use config::{load_json, load_or_init, RenderConfig};
pub use error::{PlotError, Result};
pub use jobs::{plot_distance_histogram, plot_evolution, plot_param_shift, plot_slider_curves};
pub use runlog::{GenerationRecord, MetricValues, RunLog};
pub use summary::{summarize, summarize_all, Reduction, SummarySeries};
