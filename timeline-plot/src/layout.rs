use chrono::{Datelike, NaiveDate};
use timeline_core::{DateTicks, TimelinePlot};

pub(crate) const AXIS_FONT_PX: u32 = 14;
pub(crate) const TITLE_FONT_PX: u32 = 22;
pub(crate) const MARKER_RADIUS: i32 = 4;
pub(crate) const MARGIN: u32 = 12;
const AUTO_TICKS: usize = 8;
// 1970-01-01, axis anchor when nothing is plotted.
const EPOCH_DAY: i32 = 719_163;
const MIN_PAD_DAYS: i32 = 15;
const MIN_Y_LABEL_AREA: u32 = 60;
const MAX_Y_LABEL_AREA: u32 = 420;
// Rough advance width of a glyph relative to the font size.
const GLYPH_RATIO: f64 = 0.6;

fn text_width(chars: usize, font_px: u32) -> u32 {
    (chars as f64 * f64::from(font_px) * GLYPH_RATIO).ceil() as u32
}

fn longest_label(plot: &TimelinePlot) -> usize {
    plot.lanes
        .labels()
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
}

/// Pixel geometry of one chart, sized so labels and legend are not clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub canvas: (u32, u32),
    /// Width of the plot area; the legend column fills the rest.
    pub plot_width: u32,
    pub y_label_area: u32,
    pub x_label_area: u32,
    pub legend_font_px: u32,
    pub legend_row_px: u32,
}

impl Layout {
    pub fn for_plot(plot: &TimelinePlot) -> Self {
        let (width, height) = plot.spec.size;
        let longest = longest_label(plot);

        let y_label_area = (text_width(longest, AXIS_FONT_PX) + 2 * MARGIN)
            .clamp(MIN_Y_LABEL_AREA, MAX_Y_LABEL_AREA);

        let tick_chars = match plot.spec.x_ticks {
            DateTicks::Yearly => 4,
            DateTicks::Auto => 10,
        };
        // Tick labels plus the unrotated axis title below them.
        let tick_extent = if plot.spec.rotate_x_labels {
            text_width(tick_chars, AXIS_FONT_PX)
        } else {
            AXIS_FONT_PX
        };
        let x_label_area = tick_extent + AXIS_FONT_PX + 3 * MARGIN;

        let legend_font_px = plot.spec.legend_font.pixels();
        let legend_row_px = legend_font_px + 6;
        let legend_width = if plot.lanes.is_empty() {
            0
        } else {
            text_width(longest, legend_font_px) + 4 * MARGIN
        };
        let legend_height = legend_row_px * plot.lanes.len() as u32 + 2 * MARGIN;

        Self {
            canvas: (width + legend_width, height.max(legend_height)),
            plot_width: width,
            y_label_area,
            x_label_area,
            legend_font_px,
            legend_row_px,
        }
    }
}

/// Day numbers spanned by the x axis, padded around the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: i32,
    pub end: i32,
}

impl DayRange {
    pub fn covering(plot: &TimelinePlot) -> Self {
        let (start, end) = plot
            .date_range()
            .map_or((EPOCH_DAY, EPOCH_DAY), |(first, last)| {
                (day_number(first), day_number(last))
            });
        let pad = ((end - start) / 20).max(MIN_PAD_DAYS);
        Self {
            start: start - pad,
            end: end + pad,
        }
    }

    /// Key points on every 1 January inside the range.
    pub fn year_ticks(&self) -> Vec<i32> {
        let (Some(first), Some(last)) = (date_of(self.start), date_of(self.end)) else {
            return Vec::new();
        };
        (first.year()..=last.year())
            .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .map(day_number)
            .filter(|day| (self.start..=self.end).contains(day))
            .collect()
    }

    /// Evenly spaced key points on whole days.
    pub fn even_ticks(&self) -> Vec<i32> {
        let span = f64::from(self.end - self.start);
        let mut ticks: Vec<i32> = (0..=AUTO_TICKS)
            .map(|i| self.start + (span * i as f64 / AUTO_TICKS as f64).round() as i32)
            .collect();
        ticks.dedup();
        ticks
    }

    pub fn ticks(&self, mode: DateTicks) -> Vec<i32> {
        match mode {
            DateTicks::Auto => self.even_ticks(),
            DateTicks::Yearly => self.year_ticks(),
        }
    }

    pub fn as_coords(&self) -> std::ops::Range<i32> {
        self.start..self.end
    }
}

pub fn day_number(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

fn date_of(day: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(day)
}

/// Label for an x key point.
pub fn format_day(day: i32, mode: DateTicks) -> String {
    let Some(date) = date_of(day) else {
        return String::new();
    };
    match mode {
        DateTicks::Auto => date.format("%Y-%m-%d").to_string(),
        DateTicks::Yearly => date.format("%Y").to_string(),
    }
}

/// Label for a y key point: the category of that lane.
pub fn format_lane(plot: &TimelinePlot, lane: i32) -> String {
    usize::try_from(lane)
        .ok()
        .and_then(|lane| plot.lanes.label(lane))
        .unwrap_or_default()
        .to_string()
}
