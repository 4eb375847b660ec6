//! One function per plotting job. Each reads its inputs, renders its artifacts and returns
//! the paths it wrote.

use std::path::{Path, PathBuf};

use crate::{
    chart::{render_chart, Chart, NamedSeriesSet, Trace, TraceKind},
    config::RenderConfig,
    error::Result,
    records::{
        load_distance_histogram, load_param_shift, load_slider_curves, BinLabel, ParamShiftRecord,
    },
    runlog::RunLog,
    summary::summarize_all,
};

pub const OBJECTIVE_METRIC: &str = "objectives";
pub const FITNESS_METRIC: &str = "fitness";

pub const CERES_SUFFIX: &str = "_ceres.html";
pub const FITNESS_SUFFIX: &str = "_fitness.html";

/// Append `suffix` to the final component of `prefix`.
pub fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

/// Objective and fitness summaries of every run, keyed by legend label.
#[derive(Clone, Debug, Default)]
pub struct EvolutionSeries {
    pub objectives: NamedSeriesSet,
    pub fitness: NamedSeriesSet,
}

/// Summarize the runs in `inputs`. With more than one run, labels name their source file.
pub fn evolution_series(inputs: &[PathBuf]) -> Result<EvolutionSeries> {
    let compare = inputs.len() > 1;
    let mut series = EvolutionSeries::default();

    for input in inputs {
        let log = RunLog::load(input)?;
        let label = |text: &str| {
            if compare {
                format!("{text} ({})", input.display())
            } else {
                text.to_string()
            }
        };

        let (best, avg) = summarize_all(&log, OBJECTIVE_METRIC)?;
        tracing::debug!(
            input = %input.display(),
            generations = best.len(),
            best = ?best.values.last(),
            "summarized objectives"
        );
        series
            .objectives
            .insert(label("Best Ceres Score in Population"), best);
        series
            .objectives
            .insert(label("Average Population Score"), avg);

        let (best, avg) = summarize_all(&log, FITNESS_METRIC)?;
        series
            .fitness
            .insert(label("Best Fitness Score in Population"), best);
        series
            .fitness
            .insert(label("Average Population Fitness"), avg);
    }

    Ok(series)
}

/// Plot best and average objective and fitness per generation for one or more runs.
///
/// Writes `<prefix>_ceres.html` and `<prefix>_fitness.html`.
pub fn plot_evolution(
    inputs: &[PathBuf],
    prefix: &Path,
    config: &RenderConfig,
) -> Result<Vec<PathBuf>> {
    let series = evolution_series(inputs)?;
    tracing::info!(prefix = %prefix.display(), runs = inputs.len(), "output to prefix");

    let ceres = with_suffix(prefix, CERES_SUFFIX);
    render_chart(
        &series
            .objectives
            .to_chart("Ceres Objective Scores", TraceKind::Bar),
        config,
        &ceres,
    )?;

    let fitness = with_suffix(prefix, FITNESS_SUFFIX);
    render_chart(
        &series.fitness.to_chart("Fitness Scores", TraceKind::Bar),
        config,
        &fitness,
    )?;

    Ok(vec![ceres, fitness])
}

/// Plot per-trial outcomes of a parameter-shift experiment.
///
/// Writes `<prefix>.html` (win counts), `<prefix>_scores.html` and `<prefix>_deltas.html`.
pub fn plot_param_shift(
    input: &Path,
    prefix: &Path,
    config: &RenderConfig,
) -> Result<Vec<PathBuf>> {
    let records = load_param_shift(input)?;
    let column = |get: fn(&ParamShiftRecord) -> f64| records.iter().map(get).collect::<Vec<_>>();

    let counts = Chart::new(None)
        .with_trace(Trace::indexed_bars(
            "Random Sample < Original Minima",
            column(|r| r.rnd_better),
        ))
        .with_trace(Trace::indexed_bars(
            "Ceres Optimized < Original Minima",
            column(|r| r.ceres_better),
        ))
        .with_trace(Trace::indexed_bars(
            "New Minima Found (tolerance=0.25)",
            column(|r| r.times_new_minima_found),
        ));
    let scores =
        Chart::new(None).with_trace(Trace::indexed_bars("Best Found", column(|r| r.best_score)));
    let deltas = Chart::new(None).with_trace(Trace::indexed_bars(
        "Average Improvement",
        column(|r| r.average_improvement),
    ));

    let outputs = [
        (with_suffix(prefix, ".html"), counts),
        (with_suffix(prefix, "_scores.html"), scores),
        (with_suffix(prefix, "_deltas.html"), deltas),
    ];
    let mut written = Vec::with_capacity(outputs.len());
    for (path, chart) in outputs {
        render_chart(&chart, config, &path)?;
        written.push(path);
    }
    Ok(written)
}

/// Plot the distance histogram of a random-search summary to `<prefix>.html`.
pub fn plot_distance_histogram(
    input: &Path,
    prefix: &Path,
    config: &RenderConfig,
) -> Result<PathBuf> {
    let histogram = load_distance_histogram(input)?;
    let chart = Chart::new(Some(
        "Histogram of Distances from Found Global Minima".to_string(),
    ))
    .with_x_labels(histogram.labels.iter().map(BinLabel::text).collect())
    .with_trace(Trace::indexed_bars("Number of elements", histogram.values));

    let path = with_suffix(prefix, ".html");
    render_chart(&chart, config, &path)?;
    Ok(path)
}

/// Plot every slider's response curve into the single file `output`.
pub fn plot_slider_curves(input: &Path, output: &Path, config: &RenderConfig) -> Result<PathBuf> {
    let curves = load_slider_curves(input)?;
    let mut chart = Chart::new(Some("Slider Graph".to_string()));
    for (id, curve) in curves {
        chart = chart.with_trace(Trace::new(id, TraceKind::Scatter, curve.x, curve.y));
    }

    render_chart(&chart, config, output)?;
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{chart::read_chart, error::PlotError};

    const RUN: &str = r#"[
        {"objectives": [[3], [5]], "fitness": [0.2, 0.4]},
        {"objectives": [[1], [9]], "fitness": [0.5, 0.1]}
    ]"#;

    #[test]
    fn suffix_is_appended_to_file_name() {
        assert_eq!(
            with_suffix(Path::new("out/summary"), "_ceres.html"),
            PathBuf::from("out/summary_ceres.html")
        );
        assert_eq!(
            with_suffix(Path::new("run.v2"), ".html"),
            PathBuf::from("run.v2.html")
        );
    }

    #[test]
    fn single_run_labels_omit_source() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("evo_log.json");
        fs::write(&input, RUN).unwrap();

        let series = evolution_series(&[input]).unwrap();
        let labels: Vec<&str> = series.objectives.iter().map(|(l, _)| l).collect();
        assert_eq!(
            labels,
            vec!["Best Ceres Score in Population", "Average Population Score"]
        );
        assert_eq!(
            series.fitness.get("Best Fitness Score in Population").unwrap().values,
            vec![0.2]
        );
    }

    #[test]
    fn comparison_labels_name_each_source() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("evo_log_0.json");
        let second = dir.path().join("evo_log_1.json");
        fs::write(&first, RUN).unwrap();
        fs::write(&second, RUN).unwrap();

        let series = evolution_series(&[first.clone(), second.clone()]).unwrap();
        assert_eq!(series.objectives.len(), 4);
        assert_eq!(series.fitness.len(), 4);
        let expected = format!("Average Population Fitness ({})", second.display());
        assert!(series.fitness.get(&expected).is_some());
    }

    #[test]
    fn repeated_input_keeps_every_trace() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("evo_log.json");
        fs::write(&input, RUN).unwrap();
        let prefix = dir.path().join("summary");

        let written =
            plot_evolution(&[input.clone(), input], &prefix, &RenderConfig::default()).unwrap();
        for path in &written {
            let chart = read_chart(path).unwrap();
            assert_eq!(chart.traces.len(), 4);
            assert_eq!(chart.traces[0].name, chart.traces[2].name);
            assert_eq!(chart.traces[0].y, chart.traces[2].y);
        }
    }

    #[test]
    fn evolution_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("evo_log.json");
        fs::write(&input, RUN).unwrap();
        let prefix = dir.path().join("summary");

        let written = plot_evolution(&[input], &prefix, &RenderConfig::default()).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("summary_ceres.html"),
                dir.path().join("summary_fitness.html")
            ]
        );

        let ceres = read_chart(&written[0]).unwrap();
        assert_eq!(ceres.title.as_deref(), Some("Ceres Objective Scores"));
        assert_eq!(ceres.traces[0].y, vec![3.0]);
        assert_eq!(ceres.traces[1].y, vec![4.0]);

        let fitness = read_chart(&written[1]).unwrap();
        assert_eq!(fitness.title.as_deref(), Some("Fitness Scores"));
        assert_eq!(fitness.traces[0].y, vec![0.2]);
    }

    #[test]
    fn evolution_stops_at_first_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("evo_log.json");
        fs::write(&input, r#"[{"fitness": [1]}, {"fitness": [2]}]"#).unwrap();
        let prefix = dir.path().join("summary");

        let err = plot_evolution(&[input], &prefix, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, PlotError::MissingMetric { .. }));
        assert!(!dir.path().join("summary_ceres.html").exists());
    }

    #[test]
    fn param_shift_writes_three_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("shift.json");
        fs::write(
            &input,
            r#"[
                {"rndBetter": 1, "ceresBetter": 4, "timesNewMinimaFound": 0, "bestScore": 2.5, "averageImprovement": 0.1},
                {"rndBetter": 3, "ceresBetter": 6, "timesNewMinimaFound": 2, "bestScore": 1.5, "averageImprovement": 0.3}
            ]"#,
        )
        .unwrap();
        let prefix = dir.path().join("shift");

        let written = plot_param_shift(&input, &prefix, &RenderConfig::default()).unwrap();
        assert_eq!(written.len(), 3);

        let counts = read_chart(&written[0]).unwrap();
        assert_eq!(counts.traces.len(), 3);
        assert_eq!(counts.traces[1].y, vec![4.0, 6.0]);

        let scores = read_chart(&dir.path().join("shift_scores.html")).unwrap();
        assert_eq!(scores.traces[0].y, vec![2.5, 1.5]);

        let deltas = read_chart(&dir.path().join("shift_deltas.html")).unwrap();
        assert_eq!(deltas.traces[0].name, "Average Improvement");
    }

    #[test]
    fn histogram_keeps_category_labels() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("random.json");
        fs::write(
            &input,
            r#"{"distanceHistogram": {"labels": ["0-1", "1-2"], "values": [7, 2]}}"#,
        )
        .unwrap();

        let path =
            plot_distance_histogram(&input, &dir.path().join("hist"), &RenderConfig::default())
                .unwrap();
        let chart = read_chart(&path).unwrap();
        assert_eq!(
            chart.x_labels,
            Some(vec!["0-1".to_string(), "1-2".to_string()])
        );
        assert_eq!(chart.traces[0].y, vec![7.0, 2.0]);
    }

    #[test]
    fn slider_curves_become_scatter_traces() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sliders.json");
        fs::write(
            &input,
            r#"{"saturation": {"x": [0, 0.5, 1], "y": [3, 1, 2]}, "exposure": {"x": [0, 1], "y": [0, 1]}}"#,
        )
        .unwrap();
        let output = dir.path().join("sliders.html");

        let written = plot_slider_curves(&input, &output, &RenderConfig::default()).unwrap();
        assert_eq!(written, output);

        let chart = read_chart(&output).unwrap();
        let names: Vec<&str> = chart.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["saturation", "exposure"]);
        assert!(chart.traces.iter().all(|t| t.kind == TraceKind::Scatter));
    }
}
