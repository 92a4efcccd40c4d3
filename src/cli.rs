//! Command-line surface for the overlay figure tool.

use std::path::PathBuf;

use clap::Parser;

use crate::style::StyleMode;

#[derive(Debug, Parser)]
#[command(
    name = "paper-figs",
    version,
    about = "Render the LF ablation overlay figure (log-log, SVG)"
)]
pub struct Cli {
    /// Default-ablation input JSON.
    #[arg(long, value_name = "FILE")]
    pub default: PathBuf,

    /// Thrash-ablation input JSON; "-" or "none" skips the series.
    #[arg(long, value_name = "FILE")]
    pub thrash: Option<String>,

    /// Scramble-ablation input JSON; "-" or "none" skips the series.
    #[arg(long, value_name = "FILE")]
    pub scramble: Option<String>,

    /// Output SVG path.
    #[arg(
        long,
        value_name = "FILE",
        default_value = "paper/figs/fig1_lf_precond_small.svg"
    )]
    pub out: PathBuf,

    /// Draw faint per-series trend lines.
    #[arg(long)]
    pub show_fit: bool,

    /// Units named in the y-axis label.
    #[arg(long, value_name = "TEXT")]
    pub units: Option<String>,

    /// Band description for the legend context row.
    #[arg(long, value_name = "TEXT")]
    pub legend_band: Option<String>,

    /// Seed count for the legend context row.
    #[arg(long = "legend-N", value_name = "N")]
    pub legend_n: Option<u32>,

    /// Skip the in-figure caption block.
    #[arg(long)]
    pub no_figure_caption: bool,

    /// Rendering style.
    #[arg(long, value_enum, default_value_t = StyleMode::Overlay)]
    pub style: StyleMode,

    /// Percent x-offset applied to thrash markers (rendering only).
    #[arg(long, value_name = "PCT", default_value_t = 0.0)]
    pub thrash_jitter: f64,
}

/// Companion inputs are optional on the command line; "-", "" and "none"
/// (any case) all mean "not supplied".
pub fn optional_input(raw: Option<&str>) -> Option<PathBuf> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == "-" || raw.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}
