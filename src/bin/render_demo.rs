//! Synthetic end-to-end pipeline demo: build an OHLCV series, merge it,
//! derive an indicator, evaluate both plot passes, and print a summary of
//! the primitive ops each pass produced.

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;
use tabled::{Table, Tabled};

use chart_forge::config::DisplayScale;
use chart_forge::config::plot::PLOT_STYLE;
use chart_forge::utils::value_min_max;
use chart_forge::{
    AverageKind, BarSeries, CoordinateMapper, DataSource, IndicatorConfig, IndicatorSource, Period,
    PlotKind, PlotPass, PriceField, RecordingSink, ScaleKind, SegmentedEvaluator, SourceMeta,
    TimedPoint, merge,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Chart pipeline demo over synthetic data", long_about = None)]
struct Cli {
    /// Number of synthetic 5-minute bars to generate
    #[arg(long, default_value_t = 5000)]
    bars: usize,

    /// Average recurrence: sma | ema | wma
    #[arg(long, default_value = "ema")]
    average: String,

    #[arg(long, default_value_t = 20)]
    periods: usize,

    /// Second-pass smoothing window (0 disables)
    #[arg(long, default_value_t = 0)]
    smooth: usize,

    /// Enable the horizontal fit pass
    #[arg(long, default_value_t = false)]
    fit: bool,

    /// JSON file overriding the indicator configuration built from flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use a logarithmic value scale
    #[arg(long, default_value_t = false)]
    log_scale: bool,

    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    #[arg(long, default_value_t = 700.0)]
    height: f64,
}

#[derive(Tabled)]
struct PassSummary {
    pass: String,
    columns: usize,
    ops: usize,
    elapsed_ms: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    log::info!("Indicator: {}", config);

    // 1. Synthetic data
    let series = synthetic_series(cli.bars)?;
    let first = series.time_at(0)?;
    let last = series.time_at(series.len() - 1)?;
    log::info!(
        "Generated {} bars from {} to {}",
        series.len(),
        format_time(first),
        format_time(last)
    );

    // 2. Merge + indicator
    let timeline = merge(&[&series])?;
    let indicator_meta = SourceMeta::new(format!("{}", config), Period::minutes(5).unwrap());
    let mut indicator = IndicatorSource::new(indicator_meta, config);
    indicator.set_required(Box::new(series.clone()))?;
    indicator.calculate(&timeline, 0)?;

    // 3. Coordinate mapper sized to the series' high/low envelope
    let highs: Vec<f64> = (0..series.len())
        .map(|i| series.point_at(i).map(|p| p.high()))
        .collect::<Result<_>>()?;
    let lows: Vec<f64> = (0..series.len())
        .map(|i| series.point_at(i).map(|p| p.low()))
        .collect::<Result<_>>()?;
    let (min_value, _) = value_min_max(&lows);
    let (_, max_value) = value_min_max(&highs);

    let mapper = CoordinateMapper {
        start_index: 0,
        end_index: timeline.len() - 1,
        min_value,
        max_value,
        width: cli.width,
        height: cli.height,
        margin_left: PLOT_STYLE.margin_left,
        margin_right: PLOT_STYLE.margin_right,
        margin_top: PLOT_STYLE.margin_top,
        margin_bottom: PLOT_STYLE.margin_bottom,
        scale: if cli.log_scale {
            ScaleKind::Logarithmic
        } else {
            ScaleKind::Linear
        },
        display_scale: DisplayScale::new(2),
    };

    // 4. Evaluate both passes
    let evaluator = SegmentedEvaluator::default();
    log::info!("Worker pool parallelism: {}", evaluator.parallelism);

    let mut summaries = Vec::new();
    let bars_pass = PlotPass {
        source: &series,
        index_map: Some(timeline.index_map(0)),
        mapper: &mapper,
        kind: PlotKind::Bars,
        style: &PLOT_STYLE,
    };
    summaries.push(run_pass("bars", &evaluator, &bars_pass, timeline.len() - 1));

    let line_pass = PlotPass {
        source: &indicator,
        index_map: None,
        mapper: &mapper,
        kind: PlotKind::Line { channel: 0 },
        style: &PLOT_STYLE,
    };
    summaries.push(run_pass(
        "indicator",
        &evaluator,
        &line_pass,
        timeline.len() - 1,
    ));

    println!("{}", Table::new(summaries));
    Ok(())
}

fn run_pass(
    name: &str,
    evaluator: &SegmentedEvaluator,
    pass: &PlotPass<'_>,
    end: usize,
) -> PassSummary {
    let start = Instant::now();
    let mut sink = RecordingSink::default();
    evaluator.plot(pass, 0, end, &mut sink);
    PassSummary {
        pass: name.to_string(),
        columns: end + 1,
        ops: sink.ops.len(),
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}

fn resolve_config(cli: &Cli) -> Result<IndicatorConfig> {
    if let Some(path) = &cli.config {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading indicator config {}", path.display()))?;
        let config: IndicatorConfig =
            serde_json::from_str(&raw).context("parsing indicator config JSON")?;
        config.validate()?;
        return Ok(config);
    }
    let kind = AverageKind::from_str(&cli.average)
        .map_err(|_| anyhow::anyhow!("unknown average kind '{}'", cli.average))?;
    let config = IndicatorConfig::new(kind, cli.periods)
        .with_smoothing(cli.smooth)
        .with_field(PriceField::Close)
        .with_fit(cli.fit);
    config.validate()?;
    Ok(config)
}

fn synthetic_series(bars: usize) -> Result<BarSeries> {
    let meta = SourceMeta::new("synthetic-5m", Period::minutes(5).unwrap())
        .with_instrument("SYN/USD")
        .with_display_scale(DisplayScale::new(2));
    let mut series = BarSeries::new(meta);

    let start_time = 1_700_000_000i64;
    let mut price: f64 = 100.0;
    for i in 0..bars {
        // Deterministic wave plus a slow drift; good enough to exercise
        // both bullish and bearish bars.
        let wave = (i as f64 * 0.07).sin() * 2.0;
        let drift = i as f64 * 0.001;
        let open = price;
        let close = 100.0 + wave + drift;
        let high = open.max(close) + 0.5;
        let low = open.min(close) - 0.5;
        series.push(TimedPoint::ohlcv(
            start_time + i as i64 * 300,
            open,
            high,
            low,
            close,
            1000.0 + wave.abs() * 100.0,
        ))?;
        price = close;
    }
    Ok(series)
}

fn format_time(epoch_secs: i64) -> String {
    DateTime::from_timestamp(epoch_secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("@{}", epoch_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_bars_keep_a_sane_envelope() {
        let series = synthetic_series(50).unwrap();
        assert_eq!(series.len(), 50);
        for i in 0..series.len() {
            let p = series.point_at(i).unwrap();
            assert!(p.high() >= p.open().max(p.close()));
            assert!(p.low() <= p.open().min(p.close()));
        }
        // Bars chain: each open is the previous close
        let prev_close = series.point_at(0).unwrap().close();
        assert_eq!(series.point_at(1).unwrap().open(), prev_close);
    }

    #[test]
    fn flags_resolve_to_a_validated_config() {
        let cli = Cli::parse_from(["render-demo", "--average", "wma", "--periods", "14"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.kind, AverageKind::Wma);
        assert_eq!(config.periods, 14);

        let bad = Cli::parse_from(["render-demo", "--average", "vwap"]);
        assert!(resolve_config(&bad).is_err());
    }
}
