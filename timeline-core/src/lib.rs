//! Logic lõi dựng timeline các vụ kiện AI theo làn phân loại.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

mod chart;
mod consolidation;
mod lanes;
mod timeline;

pub use chart::{ChartSpec, DateTicks, LegendFont};
pub use consolidation::{Consolidation, ConsolidationGroup};
pub use lanes::LaneMap;
pub use timeline::{build_timeline, Series, TimelinePlot};

/// Cấu hình đường dẫn, tên cột và quy tắc gộp nhãn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimelineConfig {
    /// File CSV đầu vào.
    pub input_path: Option<PathBuf>,
    /// Thư mục ghi ảnh đầu ra.
    pub output_dir: PathBuf,
    pub date_column: String,
    pub algorithm_column: String,
    pub jurisdiction_column: String,
    pub algorithm_output: PathBuf,
    pub jurisdiction_output: PathBuf,
    /// Gộp các biến thể tên khu vực tài phán trước khi dựng làn.
    pub consolidate_jurisdictions: bool,
    pub consolidation: Vec<ConsolidationGroup>,
    /// Kích thước vùng biểu đồ (pixel), chưa tính cột chú giải.
    pub width: u32,
    pub height: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            input_path: None,
            output_dir: PathBuf::from("."),
            date_column: "Date_Action_Filed".to_string(),
            algorithm_column: "Name_of_Algorithm_Text".to_string(),
            jurisdiction_column: "Jurisdiction_Name".to_string(),
            algorithm_output: PathBuf::from("algorithm_timeline.png"),
            jurisdiction_output: PathBuf::from("jurisdiction_timeline.png"),
            consolidate_jurisdictions: true,
            consolidation: vec![ConsolidationGroup::new_york()],
            width: 1200,
            height: 800,
        }
    }
}

impl TimelineConfig {
    /// Đọc cấu hình từ JSON; trường thiếu lấy giá trị mặc định.
    pub fn from_json_str(json: &str) -> Result<Self, TimelineError> {
        serde_json::from_str(json).map_err(|err| TimelineError::Config(err.to_string()))
    }

    pub fn algorithm_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.algorithm_output)
    }

    pub fn jurisdiction_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.jurisdiction_output)
    }

    /// Bảng gộp nhãn cho timeline khu vực tài phán, `None` khi tắt.
    pub fn jurisdiction_consolidation(&self) -> Result<Option<Consolidation>, TimelineError> {
        if !self.consolidate_jurisdictions {
            return Ok(None);
        }
        Consolidation::from_groups(&self.consolidation).map(Some)
    }
}

/// Một dòng dữ liệu: ngày nộp đơn và nhãn phân loại, đều có thể thiếu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EventRecord {
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl EventRecord {
    pub fn new(date: Option<NaiveDate>, category: Option<&str>) -> Self {
        Self {
            date,
            category: category.map(str::to_string),
        }
    }

    /// Nhãn dùng được để dựng làn; chuỗi rỗng coi như thiếu.
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|label| !label.trim().is_empty())
    }
}

/// Lỗi chung khi tạo timeline.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không tìm thấy cột {0}")]
    MissingColumn(String),
    #[error("Không truy cập được {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV không hợp lệ: {0}")]
    Csv(String),
    #[error("Ngày không hợp lệ ở dòng {row}: {value:?}")]
    DateParse { row: usize, value: String },
    #[error("Cấu hình không hợp lệ: {0}")]
    Config(String),
    #[error("Không vẽ được biểu đồ: {0}")]
    Render(String),
}

impl TimelineError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
