use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Series – one ablation's normalized point set
// ---------------------------------------------------------------------------

/// A normalized point series for a single ablation.
///
/// Invariants: `x`, `y` and `runs` have equal length, every point has
/// `x > 0` and `y > 0`, and `x` is sorted ascending (stable sort, so ties
/// keep their input order). Construct via [`Series::from_unsorted`]; nothing
/// mutates a series afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    /// Step sizes (dt), sorted ascending.
    pub x: Vec<f64>,
    /// Tail medians – same length as `x`.
    pub y: Vec<f64>,
    /// Per-point run counts, zero where the source had none.
    pub runs: Vec<u64>,
    /// Point count declared by the source file, when it declared one.
    pub declared_n: Option<usize>,
}

impl Series {
    /// Build a series from parallel vectors, sorting by `x` (stable) with
    /// `y` and `runs` reordered in lockstep.
    pub fn from_unsorted(
        x: Vec<f64>,
        y: Vec<f64>,
        runs: Vec<u64>,
        declared_n: Option<usize>,
    ) -> Self {
        debug_assert_eq!(x.len(), y.len());
        debug_assert_eq!(x.len(), runs.len());
        let mut order: Vec<usize> = (0..x.len()).collect();
        order.sort_by(|&a, &b| x[a].partial_cmp(&x[b]).unwrap_or(Ordering::Equal));
        Series {
            x: order.iter().map(|&i| x[i]).collect(),
            y: order.iter().map(|&i| y[i]).collect(),
            runs: order.iter().map(|&i| runs[i]).collect(),
            declared_n,
        }
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether no points survived loading.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
