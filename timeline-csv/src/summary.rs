use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::{parse_date, Dataset};

const HEAD_ROWS: usize = 5;
const CELL_WIDTH: usize = 24;

/// What a column's non-missing cells look like.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Date,
    Text,
    Empty,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
            ColumnKind::Empty => "empty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, NaN for a single value.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericStats {
    fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sq / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            mean,
            std,
            min: values[0],
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values[count - 1],
        })
    }
}

// Linear interpolation between closest ranks; `sorted` is non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null: usize,
    pub distinct: usize,
    pub stats: Option<NumericStats>,
}

/// Console diagnostics for a loaded table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub headers: Vec<String>,
    pub head: Vec<Vec<Option<String>>>,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    pub fn of(dataset: &Dataset) -> Self {
        let columns = dataset
            .headers()
            .iter()
            .enumerate()
            .map(|(index, name)| summarize_column(dataset, index, name))
            .collect();

        Self {
            rows: dataset.len(),
            headers: dataset.headers().to_vec(),
            head: dataset.rows().iter().take(HEAD_ROWS).cloned().collect(),
            columns,
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|column| column.name == name)
    }
}

fn summarize_column(dataset: &Dataset, index: usize, name: &str) -> ColumnSummary {
    let values: Vec<&str> = dataset.column_values(index).flatten().collect();
    let distinct = values.iter().collect::<BTreeSet<_>>().len();

    let numbers: Option<Vec<f64>> = values
        .iter()
        .map(|value| value.trim().parse::<f64>().ok())
        .collect();

    let (kind, stats) = if values.is_empty() {
        (ColumnKind::Empty, None)
    } else if let Some(numbers) = numbers {
        (ColumnKind::Numeric, NumericStats::from_values(numbers))
    } else if values.iter().all(|value| parse_date(value).is_some()) {
        (ColumnKind::Date, None)
    } else {
        (ColumnKind::Text, None)
    };

    ColumnSummary {
        name: name.to_string(),
        kind,
        non_null: values.len(),
        distinct,
        stats,
    }
}

fn clip(cell: &str) -> String {
    if cell.chars().count() <= CELL_WIDTH {
        return cell.to_string();
    }
    let mut clipped: String = cell.chars().take(CELL_WIDTH - 3).collect();
    clipped.push_str("...");
    clipped
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== head ==")?;
        let header: Vec<String> = self.headers.iter().map(|h| clip(h)).collect();
        writeln!(f, "{}", header.join(" | "))?;
        for row in &self.head {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| clip(cell.as_deref().unwrap_or("NaN")))
                .collect();
            writeln!(f, "{}", cells.join(" | "))?;
        }

        writeln!(f)?;
        writeln!(f, "== info ==")?;
        writeln!(f, "{} rows, {} columns", self.rows, self.columns.len())?;
        for column in &self.columns {
            writeln!(
                f,
                "{:<32} {:>6} non-null  {}",
                column.name, column.non_null, column.kind
            )?;
        }

        writeln!(f)?;
        writeln!(f, "== describe ==")?;
        let numeric: Vec<&ColumnSummary> = self
            .columns
            .iter()
            .filter(|column| column.stats.is_some())
            .collect();
        if numeric.is_empty() {
            writeln!(f, "(no numeric columns)")?;
        }
        for column in numeric {
            if let Some(stats) = &column.stats {
                writeln!(
                    f,
                    "{}: count={} mean={:.3} std={:.3} min={} 25%={:.3} 50%={:.3} 75%={:.3} max={}",
                    column.name,
                    stats.count,
                    stats.mean,
                    stats.std,
                    stats.min,
                    stats.q25,
                    stats.median,
                    stats.q75,
                    stats.max
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "== nunique ==")?;
        for column in &self.columns {
            writeln!(f, "{:<32} {}", column.name, column.distinct)?;
        }
        Ok(())
    }
}
