use serde::{Deserialize, Serialize};

/// Cách đặt vạch chia trên trục ngày.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateTicks {
    /// Vạch cách đều, nhãn dạng `YYYY-MM-DD`.
    Auto,
    /// Một vạch mỗi ngày 1/1, nhãn bốn chữ số năm.
    Yearly,
}

/// Cỡ chữ chú giải.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LegendFont {
    Small,
    ExtraSmall,
}

impl LegendFont {
    pub fn pixels(self) -> u32 {
        match self {
            LegendFont::Small => 12,
            LegendFont::ExtraSmall => 9,
        }
    }
}

/// Tiêu đề, nhãn trục và kiểu trình bày của một biểu đồ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub x_ticks: DateTicks,
    pub rotate_x_labels: bool,
    pub legend_font: LegendFont,
    /// Kích thước vùng biểu đồ (pixel), cột chú giải nằm ngoài.
    pub size: (u32, u32),
}

impl ChartSpec {
    /// Timeline theo tên thuật toán.
    pub fn algorithm() -> Self {
        Self {
            title: "Timeline of Litigation Cases by AI model".to_string(),
            x_desc: "Date Action Filed".to_string(),
            y_desc: "Name of Algorithm".to_string(),
            x_ticks: DateTicks::Auto,
            rotate_x_labels: false,
            legend_font: LegendFont::Small,
            size: (1200, 800),
        }
    }

    /// Timeline theo khu vực tài phán.
    pub fn jurisdiction() -> Self {
        Self {
            title: "Number of Cases Over Time by Jurisdiction".to_string(),
            x_desc: "Date Action Filed".to_string(),
            y_desc: "Jurisdiction Name".to_string(),
            x_ticks: DateTicks::Yearly,
            rotate_x_labels: true,
            legend_font: LegendFont::ExtraSmall,
            size: (1200, 800),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }
}
