/// Data layer: record parsing and the normalized series type.
///
/// Architecture:
/// ```text
///  plateau_audit.json / slope_summary.json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  classify schema → parse rows → positivity filter
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Series   │  parallel x / y / runs, sorted ascending by x
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
