//! Fixed styling for the overlay figure: canvas metrics, series colors,
//! marker shapes, and the overlay/paper mode switch.

use clap::ValueEnum;
use plotters::style::RGBColor;

/// Canvas size in pixels (≈ 6.6 × 4.4 in at 200 dpi).
pub const FIGURE_SIZE: (u32, u32) = (1320, 880);

/// Per-ablation colors.
pub const DEFAULT_BLUE: RGBColor = RGBColor(0x25, 0x63, 0xeb);
pub const THRASH_GREEN: RGBColor = RGBColor(0x16, 0xa3, 0x4a);
pub const SCRAMBLE_PURPLE: RGBColor = RGBColor(0xa8, 0x55, 0xf7);

/// Stroke width of the data lines.
pub const LINE_WIDTH: u32 = 2;
/// Marker radius; markers are white-faced with a colored edge.
pub const MARKER_RADIUS: i32 = 4;
/// Opacity of the faint per-series trend lines.
pub const FIT_ALPHA: f64 = 0.18;

// ---------------------------------------------------------------------------
// StyleMode – overlay vs. paper rendering policy
// ---------------------------------------------------------------------------

/// Tick, caption, and legend policy. Passed through explicitly so two
/// figures with different styles can be composed in one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Sparse hand-picked ticks, in-figure caption block, legend context row.
    Overlay,
    /// Library-default dense ticks, no caption block, bare legend.
    Paper,
}

// ---------------------------------------------------------------------------
// Marker – per-series point glyphs
// ---------------------------------------------------------------------------

/// Marker glyph drawn over a data line. The shapes themselves are composed
/// at the draw site; each composition is its own concrete element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    TriangleRight,
}

/// Legend line-stub segments in backend pixels, split when the series is
/// dashed.
pub fn legend_segments(dashed: bool) -> ([(i32, i32); 2], [(i32, i32); 2]) {
    if dashed {
        ([(0, 0), (7, 0)], [(13, 0), (20, 0)])
    } else {
        ([(0, 0), (10, 0)], [(10, 0), (20, 0)])
    }
}
