//! Input schemas of the sampling and slider experiments.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::load_json,
    error::{PlotError, Result},
};

/// Outcome of one parameter-shift trial.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamShiftRecord {
    pub rnd_better: f64,
    pub ceres_better: f64,
    pub times_new_minima_found: f64,
    pub best_score: f64,
    pub average_improvement: f64,
}

pub fn load_param_shift(path: &Path) -> Result<Vec<ParamShiftRecord>> {
    load_json(path)
}

/// Histogram label: either text or a bin edge written as a number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinLabel {
    Text(String),
    Number(f64),
}

impl BinLabel {
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => value.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceHistogram {
    pub labels: Vec<BinLabel>,
    pub values: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RandomSearchSummary {
    distance_histogram: DistanceHistogram,
}

pub fn load_distance_histogram(path: &Path) -> Result<DistanceHistogram> {
    let summary: RandomSearchSummary = load_json(path)?;
    let histogram = summary.distance_histogram;
    if histogram.labels.len() != histogram.values.len() {
        return Err(PlotError::parse(
            path,
            format!(
                "distanceHistogram has {} labels but {} values",
                histogram.labels.len(),
                histogram.values.len()
            ),
        ));
    }
    Ok(histogram)
}

/// Sampled response of the image to one slider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Slider curves keyed by slider id, in document order.
pub fn load_slider_curves(path: &Path) -> Result<Vec<(String, SliderCurve)>> {
    let document: Map<String, Value> = load_json(path)?;
    document
        .into_iter()
        .map(|(id, value)| {
            let curve: SliderCurve = serde_json::from_value(value)
                .map_err(|err| PlotError::parse(path, format!("slider `{id}`: {err}")))?;
            if curve.x.len() != curve.y.len() {
                return Err(PlotError::parse(
                    path,
                    format!(
                        "slider `{id}` has {} x values but {} y values",
                        curve.x.len(),
                        curve.y.len()
                    ),
                ));
            }
            Ok((id, curve))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn param_shift_fields_use_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shift.json");
        fs::write(
            &path,
            r#"[{"rndBetter": 4, "ceresBetter": 9, "timesNewMinimaFound": 2,
                 "bestScore": 0.125, "averageImprovement": -0.5}]"#,
        )
        .unwrap();

        let records = load_param_shift(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ceres_better, 9.0);
        assert_eq!(records[0].average_improvement, -0.5);
    }

    #[test]
    fn param_shift_missing_field_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shift.json");
        fs::write(&path, r#"[{"rndBetter": 4}]"#).unwrap();
        assert!(matches!(
            load_param_shift(&path).unwrap_err(),
            PlotError::Parse { .. }
        ));
    }

    #[test]
    fn histogram_accepts_numeric_and_text_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("random.json");
        fs::write(
            &path,
            r#"{"distanceHistogram": {"labels": [0.5, "1.0+"], "values": [12, 3]}, "samples": 15}"#,
        )
        .unwrap();

        let histogram = load_distance_histogram(&path).unwrap();
        let labels: Vec<String> = histogram.labels.iter().map(BinLabel::text).collect();
        assert_eq!(labels, vec!["0.5".to_string(), "1.0+".to_string()]);
        assert_eq!(histogram.values, vec![12.0, 3.0]);
    }

    #[test]
    fn histogram_length_mismatch_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("random.json");
        fs::write(
            &path,
            r#"{"distanceHistogram": {"labels": ["a", "b"], "values": [1]}}"#,
        )
        .unwrap();
        assert!(matches!(
            load_distance_histogram(&path).unwrap_err(),
            PlotError::Parse { .. }
        ));
    }

    #[test]
    fn slider_curves_keep_document_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sliders.json");
        fs::write(
            &path,
            r#"{"exposure": {"x": [0, 1], "y": [2, 3]}, "contrast": {"x": [0], "y": [1]}}"#,
        )
        .unwrap();

        let curves = load_slider_curves(&path).unwrap();
        let ids: Vec<&str> = curves.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["exposure", "contrast"]);
        assert_eq!(curves[0].1.y, vec![2.0, 3.0]);
    }

    #[test]
    fn slider_curve_lengths_must_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sliders.json");
        fs::write(&path, r#"{"exposure": {"x": [0, 1], "y": [2]}}"#).unwrap();
        assert!(matches!(
            load_slider_curves(&path).unwrap_err(),
            PlotError::Parse { .. }
        ));
    }
}
