use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ChartSpec, Consolidation, EventRecord, LaneMap};

/// Các điểm của một làn, vẽ thành một chuỗi cùng màu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Series {
    pub lane: usize,
    pub label: String,
    pub points: Vec<NaiveDate>,
}

/// Kết quả dựng timeline, giữ trong bộ nhớ cho tới khi được vẽ.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelinePlot {
    pub spec: ChartSpec,
    pub lanes: LaneMap,
    /// Mỗi làn một chuỗi, theo thứ tự làn.
    pub series: Vec<Series>,
    /// Số bản ghi bị loại vì thiếu ngày hoặc nhãn.
    pub skipped: usize,
}

impl TimelinePlot {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|series| series.points.len()).sum()
    }

    /// Các cặp (ngày, làn) sẽ được vẽ.
    pub fn assignments(&self) -> impl Iterator<Item = (NaiveDate, usize)> + '_ {
        self.series
            .iter()
            .flat_map(|series| series.points.iter().map(move |date| (*date, series.lane)))
    }

    /// Ngày sớm nhất và muộn nhất trong các điểm.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.series.iter().flat_map(|series| series.points.iter());
        let first = *dates.next()?;
        Some(dates.fold((first, first), |(min, max), date| {
            (min.min(*date), max.max(*date))
        }))
    }
}

/// Dựng timeline theo làn từ các bản ghi.
///
/// Khi có bảng gộp, nhãn được đổi sang nhãn chuẩn trước khi dựng làn.
/// Bản ghi của người gọi không bị sửa. Làn gồm mọi nhãn khác rỗng, kể cả
/// của bản ghi thiếu ngày; điểm chỉ vẽ cho bản ghi có đủ ngày và nhãn.
pub fn build_timeline(
    records: &[EventRecord],
    consolidation: Option<&Consolidation>,
    spec: ChartSpec,
) -> TimelinePlot {
    let resolved: Vec<(Option<NaiveDate>, Option<&str>)> = records
        .iter()
        .map(|record| {
            let label = record.category_label().map(|label| match consolidation {
                Some(table) => table.canonical(label),
                None => label,
            });
            (record.date, label)
        })
        .collect();

    let lanes = LaneMap::from_labels(resolved.iter().filter_map(|(_, label)| *label));

    let mut series: Vec<Series> = lanes
        .iter()
        .map(|(lane, label)| Series {
            lane,
            label: label.to_string(),
            points: Vec::new(),
        })
        .collect();

    let mut skipped = 0;
    for (date, label) in &resolved {
        let lane = label.and_then(|label| lanes.lane_of(label));
        match (date, lane) {
            (Some(date), Some(lane)) => series[lane].points.push(*date),
            _ => skipped += 1,
        }
    }

    debug!(
        title = %spec.title,
        lanes = lanes.len(),
        records = records.len(),
        skipped,
        "dựng timeline"
    );

    TimelinePlot {
        spec,
        lanes,
        series,
        skipped,
    }
}
