//! Companion figure: normalized round-trip error of the leapfrog and Euler
//! integrators, as two bars from the reversibility demo summary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use plotters::coord::combinators::{BindKeyPoints, IntoPartialAxis};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Deserialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Parser)]
#[command(
    name = "reversibility",
    version,
    about = "Render the reversibility demo figure from its JSON summary"
)]
struct Cli {
    /// Reversibility demo summary JSON.
    #[arg(
        long,
        value_name = "FILE",
        default_value = "outputs/reversibility_demo.json"
    )]
    input: PathBuf,

    /// Output SVG path.
    #[arg(
        long,
        value_name = "FILE",
        default_value = "paper/figs/fig_reversibility_demo.svg"
    )]
    out: PathBuf,
}

/// The demo summary as written by the reversibility run. `k` and `dt` only
/// appear in the title, so they are carried as raw JSON scalars; a missing
/// error field reads as zero.
#[derive(Debug, Deserialize)]
struct ReversibilityDemo {
    k: Option<JsonValue>,
    dt: Option<JsonValue>,
    #[serde(default)]
    normalized_rt_error_leapfrog: f64,
    #[serde(default)]
    normalized_rt_error_euler: f64,
}

const BAR_LABELS: [&str; 2] = ["Leapfrog (LF-precond)", "Euler (SGD-like)"];

fn read_demo(path: &Path) -> Result<ReversibilityDemo> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn scalar_label(value: &Option<JsonValue>) -> String {
    match value {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Null) | None => "?".to_string(),
        Some(v) => v.to_string(),
    }
}

fn render(demo: &ReversibilityDemo, out: &Path) -> Result<()> {
    let blue = RGBColor(0x25, 0x63, 0xeb);
    let bars = [
        (0.5, demo.normalized_rt_error_leapfrog),
        (1.5, demo.normalized_rt_error_euler),
    ];

    let root = SVGBackend::new(out, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let top = bars.iter().map(|b| b.1).fold(0.0, f64::max);
    let y_hi = if top > 0.0 { top * 1.15 } else { 1.0 };

    let title = format!(
        "Reversibility Test (k={}, dt={})",
        scalar_label(&demo.k),
        scalar_label(&demo.dt)
    );
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 18))
        .margin(14)
        .x_label_area_size(36)
        .y_label_area_size(76)
        .build_cartesian_2d(
            // partial_axis over the full range is an identity adapter; it only
            // restores the DefaultFormatting marker that WithKeyPoints strips,
            // which configure_mesh's ValueFormatter bound requires.
            (0.0..2.0)
                .with_key_points(vec![0.5, 1.5])
                .partial_axis(0.0..2.0),
            0.0..y_hi,
        )?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Normalized Round-Trip Error")
        .x_label_formatter(&|x| {
            let side = if *x < 1.0 { BAR_LABELS[0] } else { BAR_LABELS[1] };
            side.to_string()
        })
        .bold_line_style(BLACK.mix(0.12))
        .light_line_style(BLACK.mix(0.05))
        .label_style(("sans-serif", 13))
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(
        bars.iter()
            .map(|&(c, v)| Rectangle::new([(c - 0.3, 0.0), (c + 0.3, v)], blue.filled())),
    )?;

    // bar values written just above each top edge
    let value_style =
        TextStyle::from(("sans-serif", 12)).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(
        bars.iter()
            .map(|&(c, v)| Text::new(format!("{v:.2e}"), (c, v), value_style.clone())),
    )?;

    root.present().context("writing figure")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if !cli.input.exists() {
        bail!(
            "missing input: {} (run the reversibility demo first)",
            cli.input.display()
        );
    }
    let demo = read_demo(&cli.input)?;
    if let Some(parent) = cli.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    render(&demo, &cli.out)?;
    info!("wrote {}", cli.out.display());
    Ok(())
}
