use std::collections::BTreeSet;

use serde::Serialize;

/// Ánh xạ nhãn phân loại sang làn trên trục tung.
///
/// Nhãn được sắp giảm dần theo thứ tự từ điển; làn `i` ứng với `labels[i]`,
/// các làn liên tục trong `[0, k)`. Dựng một lần cho mỗi lần vẽ rồi bỏ.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LaneMap {
    labels: Vec<String>,
}

impl LaneMap {
    /// Dựng bảng làn từ các nhãn (có thể trùng), bỏ qua nhãn rỗng.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = labels
            .into_iter()
            .filter(|label| !label.trim().is_empty())
            .collect();

        Self {
            labels: distinct.into_iter().rev().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Nhãn theo thứ tự làn.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, lane: usize) -> Option<&str> {
        self.labels.get(lane).map(String::as_str)
    }

    /// Chỉ số làn của một nhãn.
    pub fn lane_of(&self, label: &str) -> Option<usize> {
        // Danh sách giảm dần nên đảo chiều so sánh.
        self.labels
            .binary_search_by(|candidate| label.cmp(candidate.as_str()))
            .ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(lane, label)| (lane, label.as_str()))
    }
}
