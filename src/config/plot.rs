//! Plot visualization configuration

use crate::plot::Color;

pub struct PlotStyle {
    // --- LINE PLOTS ---
    pub line_color: Color,
    pub line_width: f32,

    // --- BAR PLOTS ---
    pub bar_bullish_color: Color,
    pub bar_bearish_color: Color,
    pub bar_line_width: f32,
    /// Tick length relative to one column's width (0.0 to 1.0)
    pub bar_tick_width_pct: f64,

    // --- MARGINS (pixels) ---
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,

    /// Minimum columns-per-segment before a plot pass goes parallel.
    /// Below this the segmentation overhead outweighs the win.
    pub parallel_segment_min: usize,
}

pub const PLOT_STYLE: PlotStyle = PlotStyle {
    line_color: Color::rgb(0, 191, 255), // Deep Sky Blue
    line_width: 1.5,

    bar_bullish_color: Color::rgb(38, 166, 154), // TradingView Green
    bar_bearish_color: Color::rgb(239, 83, 80),  // TradingView Red
    bar_line_width: 1.0,
    bar_tick_width_pct: 0.8, // 80% width leaves a small gap between bars

    margin_left: 48.0,
    margin_right: 64.0,
    margin_top: 8.0,
    margin_bottom: 24.0,

    parallel_segment_min: 200,
};
