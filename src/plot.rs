//! Throughput comparison chart
//!
//! Left panel: box-and-whisker plot of both traffic conditions with the
//! mean written above each box. Right panel: every individual test result
//! with a dashed line at each condition's mean.

use crate::{
    defaults::{PLOT_HEIGHT, PLOT_WIDTH},
    error::{AppError, Result},
    logging::Logger,
    stats::BoxPlotSummary,
    types::TrafficCondition,
    utils::{max_value, min_value},
};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::path::{Path, PathBuf};

type DrawResult<'a> = std::result::Result<(), Box<dyn Error + 'a>>;
type Panel<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
const MEDIAN_ORANGE: RGBColor = RGBColor(255, 127, 14);
const BOX_HALF_WIDTH: f64 = 0.25;
const FONT: &str = "sans-serif";
const MARKER_SIZE: i32 = 7;

/// What happened to the chart on this run
#[derive(Debug, Clone, PartialEq)]
pub enum PlotOutcome {
    Saved(PathBuf),
    /// One of the conditions had no samples
    InsufficientData,
    /// Plotting was turned off in the configuration
    Disabled,
    /// Rendering failed; the run continues
    Failed(String),
}

fn box_fill(condition: TrafficCondition) -> RGBColor {
    match condition {
        TrafficCondition::BestEffort => LIGHT_BLUE,
        TrafficCondition::MixedPriority => LIGHT_GREEN,
    }
}

fn marker_color(condition: TrafficCondition) -> RGBColor {
    match condition {
        TrafficCondition::BestEffort => BLUE,
        TrafficCondition::MixedPriority => RGBColor(0, 128, 0),
    }
}

/// Render the chart if enabled and both conditions have data.
///
/// Never returns an error: failures become [`PlotOutcome::Failed`] and are logged.
pub fn plot_throughput_comparison(
    enabled: bool,
    no_tc: &[f64],
    with_tc: &[f64],
    path: &Path,
    logger: &Logger,
) -> PlotOutcome {
    if !enabled {
        logger.debug("Plotting disabled").log();
        return PlotOutcome::Disabled;
    }

    if no_tc.is_empty() || with_tc.is_empty() {
        logger.info("Not enough data for visualization")
            .field("no_tc_samples", no_tc.len())
            .field("with_tc_samples", with_tc.len())
            .log();
        return PlotOutcome::InsufficientData;
    }

    match render_comparison(no_tc, with_tc, path) {
        Ok(()) => {
            logger.info(&format!("Visualization saved: {}", path.display()))
                .field("path", path.display().to_string())
                .log();
            PlotOutcome::Saved(path.to_path_buf())
        }
        Err(e) => {
            logger.warn(&format!("Could not render chart: {}", e))
                .field("path", path.display().to_string())
                .error_info(&e)
                .location(file!(), line!(), Some(module_path!()))
                .log();
            PlotOutcome::Failed(e.to_string())
        }
    }
}

/// Draw both panels into a PNG at `path`
pub fn render_comparison(no_tc: &[f64], with_tc: &[f64], path: &Path) -> Result<()> {
    draw(no_tc, with_tc, path)
        .map_err(|e| AppError::plot(format!("{}: {}", path.display(), e)))
}

fn draw<'a>(no_tc: &[f64], with_tc: &[f64], path: &'a Path) -> DrawResult<'a> {
    let (Some(no_tc_box), Some(with_tc_box)) =
        (BoxPlotSummary::from_samples(no_tc), BoxPlotSummary::from_samples(with_tc))
    else {
        return Err("both sample sets must be non-empty".into());
    };

    let root = BitMapBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(PLOT_WIDTH / 2);

    draw_box_panel(
        &left,
        &[
            (TrafficCondition::BestEffort, &no_tc_box, no_tc),
            (TrafficCondition::MixedPriority, &with_tc_box, with_tc),
        ],
    )?;
    draw_scatter_panel(
        &right,
        &[
            (TrafficCondition::BestEffort, no_tc, no_tc_box.mean),
            (TrafficCondition::MixedPriority, with_tc, with_tc_box.mean),
        ],
    )?;

    root.present()?;
    Ok(())
}

fn draw_box_panel<'a>(area: &Panel<'a>, boxes: &[(TrafficCondition, &BoxPlotSummary, &[f64])]) -> DrawResult<'a> {
    let mut extent = Vec::new();
    for (_, summary, samples) in boxes {
        extent.push(summary.lowest());
        extent.push(summary.highest());
        extent.push(mean_label_y(summary.mean, samples));
    }
    let (y_low, y_high) = padded_range(&extent, 0.08);

    let mut chart = ChartBuilder::on(area)
        .caption("Throughput Comparison: With vs Without Traffic Control", (FONT, 22))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.5f64..(boxes.len() as f64 + 0.5), y_low..y_high)?;

    let labels: Vec<&'static str> = boxes.iter().map(|(c, _, _)| c.box_label()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(boxes.len() * 2 + 1)
        .x_label_formatter(&|x| box_axis_label(*x, &labels))
        .y_desc("Throughput (Mbps)")
        .light_line_style(&BLACK.mix(0.05))
        .bold_line_style(&BLACK.mix(0.15))
        .draw()?;

    for (i, (condition, summary, samples)) in boxes.iter().enumerate() {
        let x = (i + 1) as f64;
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
        let cap = BOX_HALF_WIDTH / 2.0;

        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, summary.q1), (right, summary.q3)],
            box_fill(*condition).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, summary.q1), (right, summary.q3)],
            BLACK.stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(left, summary.median), (right, summary.median)],
            MEDIAN_ORANGE.stroke_width(2),
        )))?;

        chart.draw_series(
            [
                vec![(x, summary.q3), (x, summary.upper_whisker)],
                vec![(x, summary.q1), (x, summary.lower_whisker)],
                vec![(x - cap, summary.upper_whisker), (x + cap, summary.upper_whisker)],
                vec![(x - cap, summary.lower_whisker), (x + cap, summary.lower_whisker)],
            ]
            .into_iter()
            .map(|points| PathElement::new(points, BLACK.stroke_width(1))),
        )?;

        chart.draw_series(
            summary.outliers.iter().map(|&o| Circle::new((x, o), 4, BLACK.stroke_width(1))),
        )?;

        let label_style = (FONT, 16)
            .into_font()
            .style(FontStyle::Bold)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.1}", summary.mean),
            (x, mean_label_y(summary.mean, samples)),
            label_style,
        )))?;
    }

    Ok(())
}

fn draw_scatter_panel<'a>(area: &Panel<'a>, series: &[(TrafficCondition, &[f64], f64)]) -> DrawResult<'a> {
    let tests = series.iter().map(|(_, samples, _)| samples.len()).max().unwrap_or(1);
    let all: Vec<f64> = series.iter().flat_map(|(_, samples, _)| samples.iter().copied()).collect();
    let (y_low, y_high) = padded_range(&all, 0.1);
    let x_high = tests as f64 + 0.5;

    let mut chart = ChartBuilder::on(area)
        .caption("Individual Test Results", (FONT, 22))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.5f64..x_high, y_low..y_high)?;

    chart
        .configure_mesh()
        .x_labels(tests.min(20) + 1)
        .x_label_formatter(&|x| test_number_label(*x))
        .x_desc("Test Number")
        .y_desc("Throughput (Mbps)")
        .light_line_style(&BLACK.mix(0.05))
        .bold_line_style(&BLACK.mix(0.15))
        .draw()?;

    for &(condition, samples, mean) in series {
        let color = marker_color(condition);
        let style = color.mix(0.6).filled();
        let points: Vec<(f64, f64)> = samples.iter().enumerate().map(|(i, &v)| ((i + 1) as f64, v)).collect();

        // circle for no traffic control, square for traffic control
        match condition {
            TrafficCondition::BestEffort => {
                chart
                    .draw_series(points.iter().map(|&at| Circle::new(at, MARKER_SIZE, style)))?
                    .label(condition.short_label())
                    .legend(move |(x, y)| Circle::new((x + 10, y), MARKER_SIZE, style));
            }
            TrafficCondition::MixedPriority => {
                chart
                    .draw_series(points.iter().map(|&at| EmptyElement::at(at) + square(style)))?
                    .label(condition.short_label())
                    .legend(move |(x, y)| Rectangle::new([(x + 4, y - 6), (x + 16, y + 6)], style));
            }
        }

        let line_style = color.mix(0.5).stroke_width(2);
        chart
            .draw_series(DashedLineSeries::new(vec![(0.5, mean), (x_high, mean)], 10, 6, line_style))?
            .label(format!("{} Mean: {:.1} Mbps", condition.short_label(), mean))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK.mix(0.4))
        .label_font((FONT, 15))
        .draw()?;

    Ok(())
}

/// Square marker in pixel offsets around its anchor
fn square(style: ShapeStyle) -> Rectangle<(i32, i32)> {
    Rectangle::new([(-6, -6), (6, 6)], style)
}

/// Vertical position of the mean annotation above a box
fn mean_label_y(mean: f64, samples: &[f64]) -> f64 {
    mean + max_value(samples).unwrap_or(0.0) * 0.05
}

/// `(low, high)` spanning `values` with `fraction` of the span added on each side
fn padded_range(values: &[f64], fraction: f64) -> (f64, f64) {
    let low = min_value(values).unwrap_or(0.0);
    let high = max_value(values).unwrap_or(1.0);
    let span = high - low;
    let pad = if span > 0.0 { span * fraction } else { low.abs().max(1.0) * fraction };
    (low - pad, high + pad)
}

/// Category name at integer box positions, blank elsewhere
fn box_axis_label(x: f64, labels: &[&str]) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 1.0 {
        return String::new();
    }
    labels.get(nearest as usize - 1).map(|l| l.to_string()).unwrap_or_default()
}

fn test_number_label(x: f64) -> String {
    if (x - x.round()).abs() < 1e-6 && x >= 1.0 {
        format!("{:.0}", x)
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use tempfile::TempDir;

    fn quiet_logger() -> Logger {
        let mut logger = Logger::new("plot".to_string());
        logger.set_level(LogLevel::Fatal);
        logger
    }

    #[test]
    fn test_disabled_plot_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("throughput_comparison.png");
        let outcome = plot_throughput_comparison(false, &[1.0], &[2.0], &path, &quiet_logger());
        assert_eq!(outcome, PlotOutcome::Disabled);
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_condition_is_insufficient() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("throughput_comparison.png");
        let logger = quiet_logger();

        assert_eq!(plot_throughput_comparison(true, &[], &[2.0], &path, &logger), PlotOutcome::InsufficientData);
        assert_eq!(plot_throughput_comparison(true, &[1.0], &[], &path, &logger), PlotOutcome::InsufficientData);
        assert!(!path.exists());
    }

    #[test]
    fn test_enabled_plot_saves_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("throughput_comparison.png");
        let no_tc = [940.1, 938.7, 941.3, 902.0, 939.9];
        let with_tc = [921.4, 930.2, 925.8];

        let outcome = plot_throughput_comparison(true, &no_tc, &with_tc, &path, &quiet_logger());

        assert_eq!(outcome, PlotOutcome::Saved(path.clone()));
        let size = std::fs::metadata(&path).unwrap().len();
        assert!(size > 0);
        let header = std::fs::read(&path).unwrap();
        assert_eq!(&header[1..4], b"PNG");
    }

    #[test]
    fn test_unwritable_path_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("throughput_comparison.png");

        let outcome = plot_throughput_comparison(true, &[1.0, 2.0], &[3.0], &path, &quiet_logger());

        assert!(matches!(outcome, PlotOutcome::Failed(_)), "{:?}", outcome);
    }

    #[test]
    fn test_render_rejects_empty_input() {
        let dir = TempDir::new().unwrap();
        let err = render_comparison(&[], &[1.0], &dir.path().join("x.png")).unwrap_err();
        assert_eq!(err.category(), "PLOT");
    }

    #[test]
    fn test_mean_label_sits_above_mean() {
        assert!((mean_label_y(20.0, &[10.0, 20.0, 30.0]) - 21.5).abs() < 1e-12);
        assert_eq!(mean_label_y(5.0, &[]), 5.0);
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(&[10.0, 20.0], 0.1), (9.0, 21.0));
        // a flat series still gets a visible band
        let (low, high) = padded_range(&[50.0, 50.0], 0.1);
        assert!(low < 50.0 && high > 50.0);
    }

    #[test]
    fn test_axis_labels() {
        let labels = ["No Traffic Control", "With Traffic Control"];
        assert_eq!(box_axis_label(1.0, &labels), "No Traffic Control");
        assert_eq!(box_axis_label(2.0000000001, &labels), "With Traffic Control");
        assert_eq!(box_axis_label(1.5, &labels), "");
        assert_eq!(box_axis_label(0.5, &labels), "");
        assert_eq!(box_axis_label(3.0, &labels), "");

        assert_eq!(test_number_label(3.0), "3");
        assert_eq!(test_number_label(2.5), "");
        assert_eq!(test_number_label(0.5), "");
    }
}
