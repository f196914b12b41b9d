use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::TimelineError;

/// Một nhóm biến thể nhãn cùng trỏ về một nhãn chuẩn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsolidationGroup {
    pub canonical: String,
    pub members: Vec<String>,
}

impl ConsolidationGroup {
    pub fn new(canonical: &str, members: &[&str]) -> Self {
        Self {
            canonical: canonical.to_string(),
            members: members.iter().map(|member| member.to_string()).collect(),
        }
    }

    /// Các cách ghi khác nhau của New York.
    pub fn new_york() -> Self {
        Self::new(
            "New York (All)",
            &["New York", "New York (State)", "New York (City)"],
        )
    }
}

/// Bảng gộp nhãn thô sang nhãn chuẩn, áp dụng trước khi dựng làn.
///
/// Luôn lũy đẳng: không nhãn chuẩn nào lại là nhãn thô của nhóm khác.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consolidation {
    table: BTreeMap<String, String>,
}

impl Consolidation {
    pub fn from_groups(groups: &[ConsolidationGroup]) -> Result<Self, TimelineError> {
        let mut table = BTreeMap::new();

        for group in groups {
            if group.canonical.trim().is_empty() {
                return Err(TimelineError::Config(
                    "nhãn chuẩn không được rỗng".to_string(),
                ));
            }
            for member in &group.members {
                match table.insert(member.clone(), group.canonical.clone()) {
                    Some(previous) if previous != group.canonical => {
                        return Err(TimelineError::Config(format!(
                            "{member:?} thuộc cả {previous:?} và {:?}",
                            group.canonical
                        )));
                    }
                    _ => {}
                }
            }
        }

        for canonical in table.values() {
            if let Some(target) = table.get(canonical) {
                if target != canonical {
                    return Err(TimelineError::Config(format!(
                        "nhãn chuẩn {canonical:?} lại bị gộp vào {target:?}"
                    )));
                }
            }
        }

        Ok(Self { table })
    }

    pub fn new_york() -> Self {
        let group = ConsolidationGroup::new_york();
        let table = group
            .members
            .iter()
            .map(|member| (member.clone(), group.canonical.clone()))
            .collect();
        Self { table }
    }

    /// Nhãn chuẩn của `label`, hoặc chính nó nếu không có trong bảng.
    pub fn canonical<'a>(&'a self, label: &'a str) -> &'a str {
        self.table.get(label).map(String::as_str).unwrap_or(label)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
