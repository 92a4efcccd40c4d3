//! Input diagnostics: byte-identical files, numerically identical series,
//! low-confidence scramble fits. All advisory – nothing here changes what
//! gets drawn.

use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::data::model::Series;

/// Absolute tolerance for treating two series as numerically identical.
pub const IDENTITY_TOLERANCE: f64 = 1e-12;

/// R² below this marks a scramble-ablation fit as low-confidence.
pub const LOW_R2_THRESHOLD: f64 = 0.30;

// ---------------------------------------------------------------------------
// Fingerprint – short content digest
// ---------------------------------------------------------------------------

/// First 10 hex characters of the SHA-256 digest of a file's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Digest raw bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Fingerprint(hex::encode(digest)[..10].to_string())
    }

    /// Digest a file's contents.
    pub fn of_file(path: &Path) -> std::io::Result<Self> {
        Ok(Self::of_bytes(&std::fs::read(path)?))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Duplicate detection
// ---------------------------------------------------------------------------

/// Group labels whose input files are byte-identical. Only groups of two or
/// more are returned, in first-seen order.
pub fn duplicate_groups(entries: &[(String, Fingerprint)]) -> Vec<Vec<String>> {
    let mut groups: Vec<(&Fingerprint, Vec<String>)> = Vec::new();
    for (label, fp) in entries {
        match groups.iter_mut().find(|(g, _)| *g == fp) {
            Some((_, labels)) => labels.push(label.clone()),
            None => groups.push((fp, vec![label.clone()])),
        }
    }
    groups
        .into_iter()
        .filter(|(_, labels)| labels.len() > 1)
        .map(|(_, labels)| labels)
        .collect()
}

/// Whether two value sequences agree within `tol` at every position.
/// Sequences of different lengths are never identical – a strict prefix
/// does not count.
pub fn nearly_identical(a: &[f64], b: &[f64], tol: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tol)
}

/// Label pairs of non-empty series whose x and y vectors are both identical
/// within [`IDENTITY_TOLERANCE`]. Pairs are unordered and reported once.
pub fn identical_series_pairs<'a>(series: &[(&'a str, &Series)]) -> Vec<(&'a str, &'a str)> {
    let mut pairs = Vec::new();
    for i in 0..series.len() {
        for j in i + 1..series.len() {
            let (la, a) = series[i];
            let (lb, b) = series[j];
            if a.is_empty() || b.is_empty() {
                continue;
            }
            if nearly_identical(&a.x, &b.x, IDENTITY_TOLERANCE)
                && nearly_identical(&a.y, &b.y, IDENTITY_TOLERANCE)
            {
                pairs.push((la, lb));
            }
        }
    }
    pairs
}

/// Whether a fit should carry the low-confidence legend note: scramble
/// ablations (matched by label, case-insensitive) with R² under
/// [`LOW_R2_THRESHOLD`].
pub fn low_confidence_scramble(label: &str, r_squared: f64) -> bool {
    label.to_lowercase().contains("scramble") && r_squared < LOW_R2_THRESHOLD
}
