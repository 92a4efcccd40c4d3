//! Companion figure: fraction of steps that engaged the preconditioner cap,
//! per step size, with 95% confidence intervals from the sweep summary CSV.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use plotters::prelude::*;
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(
    name = "cap_engagement",
    version,
    about = "Render the cap engagement figure from a sweep summary CSV"
)]
struct Cli {
    /// Sweep summary CSV (dt, capped fraction mean and CI bounds).
    #[arg(long, value_name = "FILE", default_value = "outputs/cap_vs_dt.csv")]
    input: PathBuf,

    /// Output SVG path.
    #[arg(
        long,
        value_name = "FILE",
        default_value = "paper/figs/fig_cap_engagement_small.svg"
    )]
    out: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CapRow {
    dt: f64,
    fraction_capped_mean: f64,
    fraction_capped_ci95_low: f64,
    fraction_capped_ci95_high: f64,
}

fn read_rows(path: &Path) -> Result<Vec<CapRow>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: CapRow = record.with_context(|| format!("parsing {}", path.display()))?;
        rows.push(row);
    }
    rows.sort_by(|a, b| a.dt.partial_cmp(&b.dt).unwrap_or(std::cmp::Ordering::Equal));
    Ok(rows)
}

fn render(rows: &[CapRow], out: &Path) -> Result<()> {
    let blue = RGBColor(0x25, 0x63, 0xeb);
    let root = SVGBackend::new(out, (1100, 760)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_hi, y_hi) = if rows.is_empty() {
        (0.02, 1.0)
    } else {
        let x_max = rows.iter().map(|r| r.dt).fold(f64::NEG_INFINITY, f64::max);
        let y_max = rows
            .iter()
            .map(|r| r.fraction_capped_ci95_high)
            .fold(f64::NEG_INFINITY, f64::max);
        (x_max * 1.08, (y_max * 1.15).clamp(0.05, 1.0))
    };

    let mut chart = ChartBuilder::on(&root)
        .caption("Energy Cap Engagement vs Step Size", ("sans-serif", 18))
        .margin(14)
        .x_label_area_size(46)
        .y_label_area_size(64)
        .build_cartesian_2d(0.0..x_hi, 0.0..y_hi)?;
    chart
        .configure_mesh()
        .x_desc("Step size dt")
        .y_desc("Fraction of steps at cap")
        .bold_line_style(BLACK.mix(0.12))
        .light_line_style(BLACK.mix(0.05))
        .label_style(("sans-serif", 13))
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    // connecting line first so whiskers and markers sit on top of it
    chart.draw_series(LineSeries::new(
        rows.iter().map(|r| (r.dt, r.fraction_capped_mean)),
        blue.stroke_width(2),
    ))?;

    // whiskers next, then caps, pixel-width crossbars at both CI bounds
    for r in rows {
        let whisker = blue.mix(0.6).stroke_width(2);
        chart.draw_series(std::iter::once(PathElement::new(
            vec![
                (r.dt, r.fraction_capped_ci95_low),
                (r.dt, r.fraction_capped_ci95_high),
            ],
            whisker,
        )))?;
        for y in [r.fraction_capped_ci95_low, r.fraction_capped_ci95_high] {
            chart.draw_series(std::iter::once(
                EmptyElement::at((r.dt, y)) + PathElement::new(vec![(-4, 0), (4, 0)], whisker),
            ))?;
        }
    }

    chart
        .draw_series(rows.iter().map(|r| {
            EmptyElement::at((r.dt, r.fraction_capped_mean))
                + Circle::new((0, 0), 4, WHITE.filled())
                + Circle::new((0, 0), 4, blue.stroke_width(2))
        }))?
        .label("capped fraction (mean ± 95% CI)")
        .legend(move |(x, y)| {
            EmptyElement::at((x + 10, y))
                + Circle::new((0, 0), 4, WHITE.filled())
                + Circle::new((0, 0), 4, blue.stroke_width(2))
        });

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.4))
        .label_font(("sans-serif", 13))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present().context("writing figure")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if !cli.input.exists() {
        bail!(
            "missing input: {} (run the cap sweep first)",
            cli.input.display()
        );
    }
    let rows = read_rows(&cli.input)?;
    if let Some(parent) = cli.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    render(&rows, &cli.out)?;
    info!("wrote {}", cli.out.display());
    Ok(())
}
