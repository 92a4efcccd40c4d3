use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::Series;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Loading failures. `Missing` is checked separately (and first) so the
/// pipeline can refuse to start before any computation happens.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing input: {}", .0.display())]
    Missing(PathBuf),
    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {} as JSON", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Schema classification
// ---------------------------------------------------------------------------

/// The two record schemas the upstream experiment runners emit, plus the
/// catch-all. Classification never fails: anything unrecognized is `Empty`
/// and loads as an empty series.
#[derive(Debug, Clone, Copy)]
pub enum SeriesSource<'a> {
    /// Plateau audit: record dicts under `"report"` or `"series"`, each with
    /// `dt` / `tail_median` / optional `runs`.
    PlateauAudit(&'a [JsonValue]),
    /// Slope summary: `"points"` list of `[x, y]` pairs, with the file's
    /// declared point count when a top-level `"n"` is present.
    SlopeSummary(&'a [JsonValue], Option<u64>),
    /// Unrecognized document.
    Empty,
}

/// Classify a parsed JSON document. Pure; `"report"` wins over `"series"`,
/// and only a key holding `null` counts as absent. The first present value is
/// committed to: if it is not a list of `dt` records, classification moves
/// straight on to `"points"`, never to the lower-priority key.
pub fn classify(root: &JsonValue) -> SeriesSource<'_> {
    let obj = match root.as_object() {
        Some(obj) => obj,
        None => return SeriesSource::Empty,
    };

    let rows = ["report", "series"]
        .iter()
        .find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
        .and_then(|v| v.as_array());
    if let Some(rows) = rows {
        if rows.first().map_or(false, |r| r.get("dt").is_some()) {
            return SeriesSource::PlateauAudit(rows);
        }
    }

    if let Some(points) = obj.get("points").and_then(|v| v.as_array()) {
        let declared = obj.get("n").and_then(JsonValue::as_u64);
        return SeriesSource::SlopeSummary(points, declared);
    }

    SeriesSource::Empty
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one ablation's series from a JSON file.
///
/// Accepted schemas:
///
/// ```json
/// { "report": [ { "dt": 0.01, "tail_median": 2.1e-4, "runs": 3 }, ... ] }
/// { "points": [ [0.01, 2.1e-4], ... ], "n": 12 }
/// ```
///
/// (`"series"` is accepted in place of `"report"`.) Rows with a missing or
/// non-numeric field are dropped without comment; only points with positive
/// `dt` and `tail_median` are retained, sorted ascending by `dt`.
pub fn load_series(path: &Path) -> Result<Series, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_series(&root))
}

/// Parse an already-deserialized document into a series.
pub fn parse_series(root: &JsonValue) -> Series {
    match classify(root) {
        SeriesSource::PlateauAudit(rows) => parse_plateau_audit(rows),
        SeriesSource::SlopeSummary(points, declared) => parse_slope_summary(points, declared),
        SeriesSource::Empty => Series::default(),
    }
}

// ---------------------------------------------------------------------------
// Per-schema parsing
// ---------------------------------------------------------------------------

fn parse_plateau_audit(rows: &[JsonValue]) -> Series {
    let mut x = Vec::with_capacity(rows.len());
    let mut y = Vec::with_capacity(rows.len());
    let mut runs = Vec::with_capacity(rows.len());

    for row in rows {
        let (dt, tail) = match (number_field(row, "dt"), number_field(row, "tail_median")) {
            (Some(dt), Some(tail)) => (dt, tail),
            _ => continue,
        };
        if dt > 0.0 && tail > 0.0 {
            x.push(dt);
            y.push(tail);
            runs.push(row.get("runs").and_then(JsonValue::as_u64).unwrap_or(0));
        }
    }

    let declared = (!x.is_empty()).then_some(x.len());
    Series::from_unsorted(x, y, runs, declared)
}

fn parse_slope_summary(points: &[JsonValue], declared: Option<u64>) -> Series {
    let mut x = Vec::with_capacity(points.len());
    let mut y = Vec::with_capacity(points.len());

    for entry in points {
        let pair = match entry.as_array() {
            Some(pair) if pair.len() >= 2 => pair,
            _ => continue,
        };
        let (px, py) = match (pair[0].as_f64(), pair[1].as_f64()) {
            (Some(px), Some(py)) => (px, py),
            _ => continue,
        };
        if px > 0.0 && py > 0.0 {
            x.push(px);
            y.push(py);
        }
    }

    let declared = if x.is_empty() {
        None
    } else {
        Some(declared.map_or(x.len(), |n| n as usize))
    };
    let runs = vec![0; x.len()];
    Series::from_unsorted(x, y, runs, declared)
}

fn number_field(row: &JsonValue, key: &str) -> Option<f64> {
    row.get(key).and_then(JsonValue::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn plateau_audit_rows_are_filtered_sorted_and_run_aligned() {
        let doc = json!({
            "report": [
                { "dt": 0.04, "tail_median": 1.6e-3, "runs": 5 },
                { "dt": 0.01, "tail_median": 1.0e-4 },
                { "dt": -0.02, "tail_median": 4.0e-4, "runs": 9 },
                { "dt": 0.02, "tail_median": 0.0, "runs": 9 },
                { "dt": 0.02, "tail_median": 4.0e-4, "runs": 3 },
            ]
        });
        let s = parse_series(&doc);
        assert_eq!(s.x, vec![0.01, 0.02, 0.04]);
        assert_eq!(s.y, vec![1.0e-4, 4.0e-4, 1.6e-3]);
        assert_eq!(s.runs, vec![0, 3, 5]);
        assert_eq!(s.declared_n, Some(3));
    }

    #[test]
    fn malformed_rows_are_dropped_not_fatal() {
        let doc = json!({
            "series": [
                { "dt": "0.01", "tail_median": 1.0e-4 },
                { "dt": 0.02 },
                { "tail_median": 4.0e-4 },
                { "dt": 0.03, "tail_median": 9.0e-4, "runs": 2 },
            ]
        });
        let s = parse_series(&doc);
        assert_eq!(s.x, vec![0.03]);
        assert_eq!(s.runs, vec![2]);
        assert_eq!(s.declared_n, Some(1));
    }

    #[test]
    fn report_takes_priority_over_series() {
        let doc = json!({
            "report": [ { "dt": 0.01, "tail_median": 1.0 } ],
            "series": [ { "dt": 0.99, "tail_median": 9.0 } ],
        });
        let s = parse_series(&doc);
        assert_eq!(s.x, vec![0.01]);
    }

    #[test]
    fn null_report_falls_through_to_series() {
        let doc = json!({
            "report": null,
            "series": [ { "dt": 0.02, "tail_median": 2.0 } ],
        });
        let s = parse_series(&doc);
        assert_eq!(s.x, vec![0.02]);
    }

    #[test]
    fn empty_report_list_shadows_series() {
        // "report" is present, so "series" is never consulted; with no rows
        // and no "points" the document loads as empty
        let doc = json!({
            "report": [],
            "series": [ { "dt": 0.02, "tail_median": 2.0 } ],
        });
        let s = parse_series(&doc);
        assert!(s.is_empty());
    }

    #[test]
    fn non_record_report_falls_through_to_points() {
        let doc = json!({
            "report": "not a list of records",
            "points": [ [0.01, 1.0e-4], [0.02, 4.0e-4] ],
        });
        let s = parse_series(&doc);
        assert_eq!(s.x, vec![0.01, 0.02]);
        assert_eq!(s.declared_n, Some(2));
    }

    #[test]
    fn slope_summary_honors_declared_n_and_skips_bad_entries() {
        let doc = json!({
            "points": [
                [0.04, 1.6e-3, "extra entries are fine"],
                [0.01],
                "not a pair",
                [0.02, "NaN-ish"],
                [0.01, 1.0e-4],
                [-0.5, 1.0],
            ],
            "n": 40,
        });
        let s = parse_series(&doc);
        assert_eq!(s.x, vec![0.01, 0.04]);
        assert_eq!(s.y, vec![1.0e-4, 1.6e-3]);
        assert_eq!(s.runs, vec![0, 0]);
        assert_eq!(s.declared_n, Some(40));
    }

    #[test]
    fn slope_summary_without_n_declares_retained_count() {
        let doc = json!({ "points": [ [0.01, 1.0], [0.02, 2.0] ] });
        let s = parse_series(&doc);
        assert_eq!(s.declared_n, Some(2));
    }

    #[test]
    fn fully_filtered_input_declares_nothing() {
        let doc = json!({ "points": [ [-0.01, 1.0], [0.02, -2.0] ], "n": 7 });
        let s = parse_series(&doc);
        assert!(s.is_empty());
        assert_eq!(s.declared_n, None);
    }

    #[test]
    fn unknown_schema_loads_as_empty_series() {
        for doc in [json!({ "totally": "different" }), json!([1, 2, 3]), json!(42)] {
            let s = parse_series(&doc);
            assert!(s.is_empty());
        }
    }

    #[test]
    fn missing_file_is_a_distinct_error() {
        let err = load_series(Path::new("/no/such/plateau_audit.json")).unwrap_err();
        assert!(matches!(err, LoadError::Missing(_)));
        assert!(err.to_string().contains("missing input"));
    }

    #[test]
    fn invalid_json_is_fatal_with_path_context() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = load_series(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[test]
    fn round_trip_through_a_real_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let doc = json!({ "report": [ { "dt": 0.01, "tail_median": 1.0e-4, "runs": 3 } ] });
        file.write_all(doc.to_string().as_bytes()).unwrap();
        let s = load_series(file.path()).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.runs, vec![3]);
    }
}
