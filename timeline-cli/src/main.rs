use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use timeline_core::{build_timeline, ChartSpec, TimelineConfig, TimelinePlot};
use timeline_csv::Dataset;
use timeline_plot::render_png;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "ailit-timeline",
    about = "Vẽ timeline các vụ kiện AI theo thuật toán và khu vực tài phán."
)]
struct Args {
    /// Đường dẫn tới file CSV các vụ kiện.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// File cấu hình JSON (tùy chọn).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Thư mục ghi ảnh.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    algorithm_output: Option<PathBuf>,

    #[arg(long)]
    jurisdiction_output: Option<PathBuf>,

    /// Không gộp các biến thể tên khu vực tài phán.
    #[arg(long)]
    no_consolidate: bool,

    /// In thống kê dạng JSON thay vì bảng.
    #[arg(long)]
    summary_json: bool,

    /// Bỏ qua phần thống kê mô tả.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    let input = config
        .input_path
        .clone()
        .context("Chưa chỉ định file CSV (--input hoặc input_path trong cấu hình)")?;

    let dataset = Dataset::from_path(&input)
        .with_context(|| format!("Không đọc được bảng {:?}", input))?;

    if !args.quiet {
        let summary = dataset.summary();
        if args.summary_json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("{summary}");
        }
    }

    for (plot, path) in build_plots(&config, &dataset)? {
        render_png(&plot, &path)
            .with_context(|| format!("Không ghi được timeline {:?}", path))?;
    }

    info!(rows = dataset.len(), "hoàn tất");
    Ok(())
}

/// Gộp cấu hình mặc định, file JSON và cờ dòng lệnh (cờ thắng).
fn resolve_config(args: &Args) -> anyhow::Result<TimelineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file {:?}", path))?;
            TimelineConfig::from_json_str(&data)
                .with_context(|| format!("Cấu hình {:?} không hợp lệ", path))?
        }
        None => TimelineConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input_path = Some(input.clone());
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(file) = &args.algorithm_output {
        config.algorithm_output = file.clone();
    }
    if let Some(file) = &args.jurisdiction_output {
        config.jurisdiction_output = file.clone();
    }
    if args.no_consolidate {
        config.consolidate_jurisdictions = false;
    }

    Ok(config)
}

/// Dựng hai timeline (thuật toán, khu vực tài phán) cùng đường dẫn ảnh.
fn build_plots(
    config: &TimelineConfig,
    dataset: &Dataset,
) -> anyhow::Result<Vec<(TimelinePlot, PathBuf)>> {
    let algorithms = dataset.events(&config.date_column, &config.algorithm_column)?;
    let jurisdictions = dataset.events(&config.date_column, &config.jurisdiction_column)?;
    let consolidation = config.jurisdiction_consolidation()?;

    let algorithm_plot = build_timeline(
        &algorithms,
        None,
        ChartSpec::algorithm().with_size(config.width, config.height),
    );
    let jurisdiction_plot = build_timeline(
        &jurisdictions,
        consolidation.as_ref(),
        ChartSpec::jurisdiction().with_size(config.width, config.height),
    );

    Ok(vec![
        (algorithm_plot, config.algorithm_output_path()),
        (jurisdiction_plot, config.jurisdiction_output_path()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &str = "\
Caption,Date_Action_Filed,Name_of_Algorithm_Text,Jurisdiction_Name
A v. B,2021-03-05,GPT-4,New York
C v. D,2022-04-01,BERT,New York (City)
E v. F,2020-01-15,GPT-4,Texas
";

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["ailit-timeline"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn flags_override_defaults() {
        let config = resolve_config(&args(&[
            "--input",
            "table.csv",
            "--output-dir",
            "out",
            "--no-consolidate",
        ]))
        .expect("config");

        assert_eq!(config.input_path, Some(PathBuf::from("table.csv")));
        assert_eq!(
            config.jurisdiction_output_path(),
            PathBuf::from("out").join("jurisdiction_timeline.png")
        );
        assert!(!config.consolidate_jurisdictions);
    }

    #[test]
    fn config_file_is_read_then_overridden() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"output_dir": "charts", "algorithm_output": "algos.png", "width": 900}"#,
        )
        .expect("write config");

        let config = resolve_config(&args(&[
            "--config",
            path.to_str().expect("utf-8 path"),
            "--output-dir",
            "elsewhere",
        ]))
        .expect("config");

        assert_eq!(
            config.algorithm_output_path(),
            PathBuf::from("elsewhere").join("algos.png")
        );
        assert_eq!(config.width, 900);
        assert!(config.consolidate_jurisdictions);
    }

    #[test]
    fn missing_config_file_is_error() {
        assert!(resolve_config(&args(&["--config", "/no/such/config.json"])).is_err());
    }

    #[test]
    fn builds_both_plots_with_consolidation() {
        let dataset = Dataset::from_reader(CASES.as_bytes()).expect("csv");
        let plots = build_plots(&TimelineConfig::default(), &dataset).expect("plots");

        assert_eq!(plots.len(), 2);
        assert_eq!(plots[0].0.lanes.labels(), ["GPT-4", "BERT"]);
        assert_eq!(plots[1].0.lanes.labels(), ["Texas", "New York (All)"]);
        assert_eq!(plots[1].0.series[1].points.len(), 2);
        assert!(plots[1].1.ends_with("jurisdiction_timeline.png"));
    }

    #[test]
    fn toggle_off_keeps_variants() {
        let dataset = Dataset::from_reader(CASES.as_bytes()).expect("csv");
        let config = TimelineConfig {
            consolidate_jurisdictions: false,
            ..TimelineConfig::default()
        };
        let plots = build_plots(&config, &dataset).expect("plots");
        assert_eq!(
            plots[1].0.lanes.labels(),
            ["Texas", "New York (City)", "New York"]
        );
    }
}
