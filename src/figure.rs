//! Overlay figure: composition and rendering.
//!
//! `make_overlay` drives the whole run: fingerprint inputs, load and fit
//! each series, emit advisories, then draw the log-log overlay and write it
//! as SVG. Decisions about what appears in the figure (captions, legend
//! text, jitter, ranges, ticks) are made by plain helpers ahead of any
//! drawing; the chart only receives finished coordinates and strings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::combinators::BindKeyPoints;
use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::analysis::detect::{self, Fingerprint};
use crate::analysis::fit::{self, PowerLawFit};
use crate::analysis::ticks;
use crate::data::loader;
use crate::data::model::Series;
use crate::style::{self, Marker, StyleMode};

// ---------------------------------------------------------------------------
// Specs and options
// ---------------------------------------------------------------------------

/// One input series: label, file, and how to draw it.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub label: String,
    pub path: PathBuf,
    pub color: RGBColor,
    pub marker: Marker,
    pub dashed: bool,
}

/// Figure-wide options, resolved from the command line.
#[derive(Debug, Clone)]
pub struct OverlayOptions {
    /// Draw faint per-series trend lines.
    pub show_fit: bool,
    /// Units named in the y-axis label.
    pub units: Option<String>,
    /// Ablation band named in the legend context row.
    pub legend_band: Option<String>,
    /// Sample count named in the legend context row.
    pub legend_n: Option<u32>,
    /// Draw the in-figure caption block (overlay style only).
    pub figure_caption: bool,
    /// Percent x-offset applied to thrash markers.
    pub thrash_jitter_pct: f64,
    /// Overlay or paper rendering policy.
    pub style: StyleMode,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        OverlayOptions {
            show_fit: false,
            units: None,
            legend_band: None,
            legend_n: None,
            figure_caption: true,
            thrash_jitter_pct: 0.0,
            style: StyleMode::Overlay,
        }
    }
}

/// The standard three-ablation series set; `thrash` and `scramble` are
/// optional companions to the required default input.
pub fn ablation_specs(
    default: PathBuf,
    thrash: Option<PathBuf>,
    scramble: Option<PathBuf>,
) -> Vec<SeriesSpec> {
    let mut specs = vec![SeriesSpec {
        label: "LF-default".to_string(),
        path: default,
        color: style::DEFAULT_BLUE,
        marker: Marker::Circle,
        dashed: false,
    }];
    if let Some(path) = thrash {
        specs.push(SeriesSpec {
            label: "LF-thrash".to_string(),
            path,
            color: style::THRASH_GREEN,
            marker: Marker::Square,
            dashed: false,
        });
    }
    if let Some(path) = scramble {
        specs.push(SeriesSpec {
            label: "LF-scramble".to_string(),
            path,
            color: style::SCRAMBLE_PURPLE,
            marker: Marker::TriangleRight,
            dashed: true,
        });
    }
    specs
}

// ---------------------------------------------------------------------------
// Composition – pure decisions, no drawing
// ---------------------------------------------------------------------------

/// One series resolved for drawing.
struct PreparedSeries {
    spec: SeriesSpec,
    series: Series,
    /// x positions as rendered (jitter applied); fits and advisories always
    /// use `series.x`.
    render_x: Vec<f64>,
    fit: Option<PowerLawFit>,
    legend_text: String,
    caption_text: String,
}

fn caption_line(label: &str, fit: Option<&PowerLawFit>) -> String {
    match fit {
        Some(f) => format!(
            "{label}: m={:+.3} [{:+.3},{:+.3}] R^2={:.2}",
            f.slope, f.ci_low, f.ci_high, f.r_squared
        ),
        None => format!("{label}: fit n/a"),
    }
}

fn legend_label(label: &str, fit: Option<&PowerLawFit>) -> String {
    match fit {
        Some(f) if detect::low_confidence_scramble(label, f.r_squared) => {
            format!("{label} (low R^2)")
        }
        _ => label.to_string(),
    }
}

/// Legend context row: the ablation family plus whatever band / N
/// information was supplied.
fn legend_title(band: Option<&str>, n: Option<u32>) -> String {
    match (n, band) {
        (Some(n), Some(band)) => format!("Ablation (N={n}; {band})"),
        (Some(n), None) => format!("Ablation (N={n})"),
        (None, Some(band)) => format!("Ablation ({band})"),
        (None, None) => "Ablation".to_string(),
    }
}

/// Rendered x positions. Only series whose label ends in "thrash" are
/// nudged, and only when a nonzero percentage was requested.
fn jittered_x(label: &str, x: &[f64], pct: f64) -> Vec<f64> {
    if pct != 0.0 && label.to_lowercase().ends_with("thrash") {
        let factor = 1.0 + pct / 100.0;
        x.iter().map(|&v| v * factor).collect()
    } else {
        x.to_vec()
    }
}

/// Data range padded multiplicatively in log space. A single point widens to
/// a factor-of-two band; no usable data at all yields `fallback` so an empty
/// figure still has axes.
fn padded_log_range(
    values: impl Iterator<Item = f64>,
    pad: f64,
    fallback: (f64, f64),
) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        if v > 0.0 && v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return fallback;
    }
    if lo == hi {
        return (lo / 2.0, hi * 2.0);
    }
    let pad = (hi.log10() - lo.log10()) * pad;
    (10f64.powf(lo.log10() - pad), 10f64.powf(hi.log10() + pad))
}

/// Overlay x ticks: the union of every series' true step sizes,
/// deduplicated at 4 decimals. Steps that round to zero are dropped; the
/// log-scale axis cannot place them.
fn step_size_ticks(prepared: &[PreparedSeries]) -> Vec<f64> {
    let mut ticks: Vec<f64> = prepared
        .iter()
        .flat_map(|p| p.series.x.iter())
        .map(|&v| (v * 1e4).round() / 1e4)
        .filter(|&v| v > 0.0)
        .collect();
    ticks.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    ticks.dedup();
    ticks
}

fn prepare(specs: &[SeriesSpec], opts: &OverlayOptions) -> Result<Vec<PreparedSeries>> {
    let mut prepared = Vec::with_capacity(specs.len());
    for spec in specs {
        let series = loader::load_series(&spec.path)
            .with_context(|| format!("loading series '{}'", spec.label))?;
        let fit = fit::fit_power_law(&series.x, &series.y);
        let render_x = jittered_x(&spec.label, &series.x, opts.thrash_jitter_pct);
        let legend_text = legend_label(&spec.label, fit.as_ref());
        let caption_text = caption_line(&spec.label, fit.as_ref());
        prepared.push(PreparedSeries {
            spec: spec.clone(),
            series,
            render_x,
            fit,
            legend_text,
            caption_text,
        });
    }
    Ok(prepared)
}

// ---------------------------------------------------------------------------
// Pipeline entry
// ---------------------------------------------------------------------------

/// Compose and render the ablation overlay figure.
///
/// A missing input is fatal before any computation; everything else degrades
/// per series. Writes `out` (creating parent directories as needed), logs
/// fingerprints and advisories, and prints a caption suggestion to stdout.
pub fn make_overlay(specs: &[SeriesSpec], out: &Path, opts: &OverlayOptions) -> Result<()> {
    for spec in specs {
        if !spec.path.exists() {
            bail!("missing input: {}", spec.path.display());
        }
    }
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }

    info!("input hashes (sha256[:10]):");
    let mut fingerprints = Vec::with_capacity(specs.len());
    for spec in specs {
        let fp = Fingerprint::of_file(&spec.path)
            .with_context(|| format!("hashing {}", spec.path.display()))?;
        info!("    {:<11} {}  {}", spec.label, fp, spec.path.display());
        fingerprints.push((spec.label.clone(), fp));
    }
    for group in detect::duplicate_groups(&fingerprints) {
        warn!("two or more inputs are byte-identical: {group:?}");
    }

    let prepared = prepare(specs, opts)?;
    for p in &prepared {
        debug!(
            "{}: {} points retained (declared {:?}), fit {}",
            p.spec.label,
            p.series.len(),
            p.series.declared_n,
            if p.fit.is_some() { "available" } else { "n/a" },
        );
    }

    let labelled: Vec<(&str, &Series)> = prepared
        .iter()
        .map(|p| (p.spec.label.as_str(), &p.series))
        .collect();
    for (a, b) in detect::identical_series_pairs(&labelled) {
        warn!("series '{a}' and '{b}' appear numerically identical");
    }

    render_svg(&prepared, out, opts)?;
    info!("wrote {}", out.display());

    let caption: Vec<&str> = prepared.iter().map(|p| p.caption_text.as_str()).collect();
    println!("caption suggestion:");
    println!("{}", caption.join("; "));
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_svg(prepared: &[PreparedSeries], out: &Path, opts: &OverlayOptions) -> Result<()> {
    let root = SVGBackend::new(out, style::FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = padded_log_range(
        prepared.iter().flat_map(|p| p.series.x.iter().copied()),
        0.05,
        (1e-3, 1e-1),
    );
    let (y_lo, y_hi) = padded_log_range(
        prepared.iter().flat_map(|p| p.series.y.iter().copied()),
        0.08,
        (1e-4, 1e0),
    );

    let y_desc = match &opts.units {
        Some(u) => format!("Tail median |ΔH| ({u}, log)"),
        None => "Tail median |ΔH| (log)".to_string(),
    };

    match opts.style {
        StyleMode::Overlay => {
            let x_ticks = step_size_ticks(prepared);
            let y_ticks = ticks::sparse_log_ticks(y_lo, y_hi, 4);
            let mut chart = ChartBuilder::on(&root)
                .margin(14)
                .x_label_area_size(46)
                .y_label_area_size(90)
                .build_cartesian_2d(
                    (x_lo..x_hi).log_scale().with_key_points(x_ticks),
                    (y_lo..y_hi).log_scale().with_key_points(y_ticks),
                )?;
            chart
                .configure_mesh()
                .x_desc("Step size dt (log)")
                .y_desc(y_desc)
                .x_label_formatter(&|x| ticks::format_step_size(*x))
                .y_label_formatter(&|y| ticks::format_mantissa_pow10(*y))
                .bold_line_style(BLACK.mix(0.12))
                .label_style(("sans-serif", 13))
                .axis_desc_style(("sans-serif", 15))
                .draw()?;
            draw_series_set(&mut chart, prepared, opts)?;
        }
        StyleMode::Paper => {
            let mut chart = ChartBuilder::on(&root)
                .margin(14)
                .x_label_area_size(46)
                .y_label_area_size(90)
                .build_cartesian_2d((x_lo..x_hi).log_scale(), (y_lo..y_hi).log_scale())?;
            chart
                .configure_mesh()
                .x_desc("Step size dt (log)")
                .y_desc(y_desc)
                .bold_line_style(BLACK.mix(0.12))
                .light_line_style(BLACK.mix(0.05))
                .label_style(("sans-serif", 13))
                .axis_desc_style(("sans-serif", 15))
                .draw()?;
            draw_series_set(&mut chart, prepared, opts)?;
        }
    }

    if opts.style == StyleMode::Overlay && opts.figure_caption {
        // the style borrows its color, so the mix has to outlive it
        let caption_color = BLACK.mix(0.85);
        let caption_style = TextStyle::from(("sans-serif", 13)).color(&caption_color);
        for (i, p) in prepared.iter().enumerate() {
            root.draw(&Text::new(
                p.caption_text.clone(),
                (112, 24 + 17 * i as i32),
                caption_style.clone(),
            ))?;
        }
    }

    root.present().context("writing figure")?;
    Ok(())
}

/// Draw fit lines, data lines, markers, and the legend into a built chart.
/// Generic over the axis coordinate types so the overlay (pinned ticks) and
/// paper (default ticks) charts share one body.
fn draw_series_set<'a, 'b: 'a, X, Y>(
    chart: &mut ChartContext<'a, SVGBackend<'b>, Cartesian2d<X, Y>>,
    prepared: &[PreparedSeries],
    opts: &OverlayOptions,
) -> Result<()>
where
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    // legend context row first so it tops the legend box; the zero-point
    // path draws nothing but carries the label
    if opts.style == StyleMode::Overlay {
        let title = legend_title(opts.legend_band.as_deref(), opts.legend_n);
        chart
            .draw_series(std::iter::once(PathElement::new(
                Vec::<(f64, f64)>::new(),
                BLACK.stroke_width(0),
            )))?
            .label(title)
            .legend(|_| EmptyElement::at((0, 0)));
    }

    // faint trend lines go underneath every data line
    if opts.show_fit {
        for p in prepared {
            if let (Some(fit), Some(&x0), Some(&x1)) =
                (p.fit.as_ref(), p.series.x.first(), p.series.x.last())
            {
                let y0 = 10f64.powf(fit.slope * x0.log10() + fit.intercept);
                let y1 = 10f64.powf(fit.slope * x1.log10() + fit.intercept);
                chart.draw_series(LineSeries::new(
                    vec![(x0, y0), (x1, y1)],
                    p.spec.color.mix(style::FIT_ALPHA).stroke_width(1),
                ))?;
            }
        }
    }

    for p in prepared {
        if p.series.is_empty() {
            continue;
        }
        let pts: Vec<(f64, f64)> = p
            .render_x
            .iter()
            .zip(&p.series.y)
            .map(|(&x, &y)| (x, y))
            .collect();

        let stroke = p.spec.color.stroke_width(style::LINE_WIDTH);
        let color = p.spec.color;
        let dashed = p.spec.dashed;
        let r = style::MARKER_RADIUS;
        let anno = if dashed {
            chart.draw_series(DashedLineSeries::new(pts.iter().copied(), 8, 6, stroke))?
        } else {
            chart.draw_series(LineSeries::new(pts.iter().copied(), stroke))?
        };
        anno.label(p.legend_text.clone());

        // one arm per marker: every composed element chain is its own
        // concrete type, for both the legend glyph and the data markers
        let (seg_a, seg_b) = style::legend_segments(dashed);
        match p.spec.marker {
            Marker::Circle => {
                anno.legend(move |(x, y)| {
                    EmptyElement::at((x, y))
                        + PathElement::new(seg_a, stroke)
                        + PathElement::new(seg_b, stroke)
                        + Circle::new((10, 0), r, WHITE.filled())
                        + Circle::new((10, 0), r, color.stroke_width(1))
                });
                chart.draw_series(pts.iter().map(|&(x, y)| {
                    EmptyElement::at((x, y))
                        + Circle::new((0, 0), r, WHITE.filled())
                        + Circle::new((0, 0), r, color.stroke_width(1))
                }))?;
            }
            Marker::Square => {
                anno.legend(move |(x, y)| {
                    EmptyElement::at((x, y))
                        + PathElement::new(seg_a, stroke)
                        + PathElement::new(seg_b, stroke)
                        + Rectangle::new([(10 - r, -r), (10 + r, r)], WHITE.filled())
                        + Rectangle::new([(10 - r, -r), (10 + r, r)], color.stroke_width(1))
                });
                chart.draw_series(pts.iter().map(|&(x, y)| {
                    EmptyElement::at((x, y))
                        + Rectangle::new([(-r, -r), (r, r)], WHITE.filled())
                        + Rectangle::new([(-r, -r), (r, r)], color.stroke_width(1))
                }))?;
            }
            Marker::TriangleRight => {
                anno.legend(move |(x, y)| {
                    let face = vec![(10 - r, -r), (10 - r, r), (10 + r + 1, 0)];
                    let edge = [face[0], face[1], face[2], face[0]];
                    EmptyElement::at((x, y))
                        + PathElement::new(seg_a, stroke)
                        + PathElement::new(seg_b, stroke)
                        + Polygon::new(face, WHITE.filled())
                        + PathElement::new(edge, color.stroke_width(1))
                });
                chart.draw_series(pts.iter().map(|&(x, y)| {
                    let face = vec![(-r, -r), (-r, r), (r + 1, 0)];
                    let edge = [face[0], face[1], face[2], face[0]];
                    EmptyElement::at((x, y))
                        + Polygon::new(face, WHITE.filled())
                        + PathElement::new(edge, color.stroke_width(1))
                }))?;
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.4))
        .label_font(("sans-serif", 13))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    Ok(())
}
