use std::path::Path;

use chrono::NaiveDate;
use timeline_core::{build_timeline, ChartSpec, Consolidation, EventRecord, TimelinePlot};
use timeline_plot::{render_png, Layout};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

fn records() -> Vec<EventRecord> {
    [
        ("2019-04-02", Some("New York")),
        ("2020-09-15", Some("New York (State)")),
        ("2021-01-20", Some("New York (City)")),
        ("2022-06-30", Some("California")),
        ("2023-02-11", None),
    ]
    .into_iter()
    .map(|(date, label)| EventRecord::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(), label))
    .collect()
}

/// Width and height from the IHDR chunk that follows the signature.
fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let word = |at: usize| u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    (word(16), word(20))
}

fn render_and_check(plot: &TimelinePlot, path: &Path) {
    render_png(plot, path).expect("Không vẽ được timeline");

    let bytes = std::fs::read(path).expect("Không đọc lại được ảnh");
    assert!(bytes.starts_with(PNG_MAGIC));
    assert_eq!(&bytes[12..16], b"IHDR");
    assert_eq!(png_dimensions(&bytes), Layout::for_plot(plot).canvas);
}

#[test]
fn writes_both_timelines_as_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let records = records();
    let table = Consolidation::new_york();

    let algorithm = build_timeline(&records, None, ChartSpec::algorithm());
    let jurisdiction = build_timeline(&records, Some(&table), ChartSpec::jurisdiction());

    render_and_check(&algorithm, &dir.path().join("algorithm_timeline.png"));
    render_and_check(&jurisdiction, &dir.path().join("jurisdiction_timeline.png"));
}

#[test]
fn canvas_grows_for_long_legend() {
    let dir = tempfile::tempdir().expect("tempdir");
    let day = NaiveDate::from_ymd_opt(2021, 6, 1);
    let labels: Vec<String> = (0..70).map(|i| format!("District Court No. {i:02}")).collect();
    let records: Vec<EventRecord> = labels
        .iter()
        .map(|label| EventRecord::new(day, Some(label.as_str())))
        .collect();
    let plot = build_timeline(&records, None, ChartSpec::jurisdiction());

    let layout = Layout::for_plot(&plot);
    assert!(layout.canvas.0 > 1200);
    assert!(layout.canvas.1 > 800);

    render_and_check(&plot, &dir.path().join("many_courts.png"));
}

#[test]
fn empty_plot_still_renders() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plot = build_timeline(&[], None, ChartSpec::algorithm());

    render_and_check(&plot, &dir.path().join("empty.png"));
}
