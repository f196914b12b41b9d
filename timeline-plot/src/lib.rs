//! PNG renderer for lane timelines built by `timeline-core`.

use std::error::Error;
use std::fs;
use std::io;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use timeline_core::{TimelineError, TimelinePlot};
use tracing::info;

mod layout;

pub use layout::{day_number, format_day, format_lane, DayRange, Layout};

use layout::{AXIS_FONT_PX, MARGIN, MARKER_RADIUS, TITLE_FONT_PX};

const FONT_FAMILY: &str = "sans-serif";

/// Draw `plot` and save it as an image at `path`.
///
/// The parent directory must already exist; the file is overwritten.
pub fn render_png(plot: &TimelinePlot, path: &Path) -> Result<(), TimelineError> {
    ensure_parent_dir(path)?;

    let layout = Layout::for_plot(plot);
    draw(plot, &layout, path)
        .map_err(|err| TimelineError::Render(format!("{}: {err}", path.display())))?;

    info!(
        path = %path.display(),
        lanes = plot.lanes.len(),
        points = plot.point_count(),
        "timeline written"
    );
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), TimelineError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    let metadata = fs::metadata(parent).map_err(|err| TimelineError::io(parent, err))?;
    if !metadata.is_dir() {
        return Err(TimelineError::io(
            parent,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }
    Ok(())
}

fn draw(plot: &TimelinePlot, layout: &Layout, path: &Path) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, layout.canvas).into_drawing_area();
    root.fill(&WHITE)?;

    let (plot_area, legend_area) = root.split_horizontally(layout.plot_width);

    let x_range = DayRange::covering(plot);
    let x_ticks = x_range.ticks(plot.spec.x_ticks);
    let x_label_count = x_ticks.len().max(1);
    // One spare lane above and below keeps markers off the frame.
    let lane_count = plot.lanes.len() as i32;
    let y_ticks: Vec<i32> = (0..lane_count).collect();

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(&plot.spec.title, (FONT_FAMILY, TITLE_FONT_PX))
        .margin(MARGIN)
        .x_label_area_size(layout.x_label_area)
        .y_label_area_size(layout.y_label_area)
        .build_cartesian_2d(
            x_range.as_coords().with_key_points(x_ticks),
            (-1..lane_count.max(1)).with_key_points(y_ticks),
        )?;

    let x_label_font = if plot.spec.rotate_x_labels {
        (FONT_FAMILY, AXIS_FONT_PX)
            .into_font()
            .transform(FontTransform::Rotate90)
    } else {
        (FONT_FAMILY, AXIS_FONT_PX).into_font()
    };
    let x_format = |day: &i32| format_day(*day, plot.spec.x_ticks);
    let y_format = |lane: &i32| format_lane(plot, *lane);

    chart
        .configure_mesh()
        .x_desc(plot.spec.x_desc.as_str())
        .y_desc(plot.spec.y_desc.as_str())
        .x_labels(x_label_count)
        .y_labels(plot.lanes.len().max(1))
        .axis_desc_style((FONT_FAMILY, AXIS_FONT_PX))
        .x_label_style(x_label_font)
        .y_label_style((FONT_FAMILY, AXIS_FONT_PX))
        .x_label_formatter(&x_format)
        .y_label_formatter(&y_format)
        .draw()?;

    for series in &plot.series {
        let style = Palette99::pick(series.lane).filled();
        chart.draw_series(series.points.iter().map(|date| {
            Circle::new(
                (day_number(*date), series.lane as i32),
                MARKER_RADIUS,
                style,
            )
        }))?;
    }

    draw_legend(&legend_area, plot, layout)?;

    root.present()?;
    Ok(())
}

// Legend sits in its own column right of the chart so it never covers points.
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    plot: &TimelinePlot,
    layout: &Layout,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let font = (FONT_FAMILY, layout.legend_font_px)
        .into_font()
        .color(&BLACK);
    let row = layout.legend_row_px as i32;
    let left = MARGIN as i32;

    for (index, series) in plot.series.iter().enumerate() {
        let center_y = MARGIN as i32 + row * index as i32 + row / 2;
        area.draw(&Circle::new(
            (left + MARKER_RADIUS, center_y),
            MARKER_RADIUS,
            Palette99::pick(series.lane).filled(),
        ))?;
        area.draw(&Text::new(
            series.label.clone(),
            (
                left + 3 * MARKER_RADIUS,
                center_y - layout.legend_font_px as i32 / 2,
            ),
            font.clone(),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeline_core::{build_timeline, ChartSpec};

    #[test]
    fn missing_output_dir_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope").join("algorithm_timeline.png");
        let plot = build_timeline(&[], None, ChartSpec::algorithm());

        let err = render_png(&plot, &path).unwrap_err();

        assert!(matches!(err, TimelineError::Io { .. }));
        assert!(err.to_string().contains("nope"));
        assert!(!path.exists());
    }

    #[test]
    fn file_as_parent_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").expect("write blocker");

        let plot = build_timeline(&[], None, ChartSpec::jurisdiction());
        let err = render_png(&plot, &blocker.join("out.png")).unwrap_err();

        assert!(matches!(err, TimelineError::Io { .. }));
    }

    #[test]
    fn bare_file_name_needs_no_parent_check() {
        assert!(ensure_parent_dir(Path::new("algorithm_timeline.png")).is_ok());
    }
}
