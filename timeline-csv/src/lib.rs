//! CSV case table loader producing `EventRecord`s and console diagnostics.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use timeline_core::{EventRecord, TimelineError};
use tracing::{debug, warn};

mod date;
mod summary;

pub use date::parse_date;
pub use summary::{ColumnKind, ColumnSummary, DatasetSummary, NumericStats};

/// Cell spellings read as missing, same set pandas uses by default.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "NaT",
];

/// Whether a raw cell counts as missing.
pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    NA_VALUES.contains(&trimmed)
}

/// Case table held in memory, one `Option<String>` per cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    /// Load a CSV file with a header row.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TimelineError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| TimelineError::io(path, err))?;
        let dataset = Self::from_reader(file)?;
        debug!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.headers.len(),
            "loaded case table"
        );
        Ok(dataset)
    }

    /// Load CSV data with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TimelineError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|err| TimelineError::Csv(err.to_string()))?
            .iter()
            .map(|header| header.trim().to_string())
            .collect();

        if headers.is_empty() {
            return Err(TimelineError::MissingData);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| TimelineError::Csv(err.to_string()))?;
            let mut row: Vec<Option<String>> = record
                .iter()
                .take(headers.len())
                .map(|cell| (!is_missing(cell)).then(|| cell.to_string()))
                .collect();
            row.resize(headers.len(), None);
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    fn require_column(&self, name: &str) -> Result<usize, TimelineError> {
        self.column(name)
            .ok_or_else(|| TimelineError::MissingColumn(name.to_string()))
    }

    /// Values of one column, `None` where missing.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(Option::as_deref))
    }

    /// Pair each row's date with its category.
    ///
    /// The whole date column is converted first: one unparseable date fails
    /// the load even when that row's category is missing.
    pub fn events(
        &self,
        date_column: &str,
        category_column: &str,
    ) -> Result<Vec<EventRecord>, TimelineError> {
        let date_index = self.require_column(date_column)?;
        let category_index = self.require_column(category_column)?;

        let dates = self.parse_date_column(date_index)?;
        let records: Vec<EventRecord> = dates
            .into_iter()
            .zip(self.column_values(category_index))
            .map(|(date, category)| EventRecord::new(date, category))
            .collect();

        let incomplete = records
            .iter()
            .filter(|record| record.date.is_none() || record.category_label().is_none())
            .count();
        if incomplete > 0 {
            warn!(
                column = category_column,
                incomplete, "rows without date or category are left off the chart"
            );
        }

        Ok(records)
    }

    fn parse_date_column(
        &self,
        index: usize,
    ) -> Result<Vec<Option<chrono::NaiveDate>>, TimelineError> {
        self.column_values(index)
            .enumerate()
            .map(|(row, cell)| match cell {
                None => Ok(None),
                Some(value) => parse_date(value)
                    .map(Some)
                    .ok_or_else(|| TimelineError::DateParse {
                        row: row + 1,
                        value: value.to_string(),
                    }),
            })
            .collect()
    }

    /// Head, schema, describe and distinct counts for console output.
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = "\
Caption,Date_Action_Filed,Name_of_Algorithm_Text,Jurisdiction_Name
Doe v. Acme,2021-03-05,GPT-4,California
Roe v. Beta,03/07/2022,,New York
Poe v. Gamma,,BERT,NA
";

    #[test]
    fn reads_headers_and_na_cells() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes()).expect("valid csv");
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.column("Jurisdiction_Name"), Some(3));
        let jurisdictions: Vec<Option<&str>> = dataset.column_values(3).collect();
        assert_eq!(jurisdictions, vec![Some("California"), Some("New York"), None]);
    }

    #[test]
    fn events_pair_dates_with_categories() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes()).expect("valid csv");
        let events = dataset
            .events("Date_Action_Filed", "Name_of_Algorithm_Text")
            .expect("dates parse");

        assert_eq!(
            events,
            vec![
                EventRecord::new(NaiveDate::from_ymd_opt(2021, 3, 5), Some("GPT-4")),
                EventRecord::new(NaiveDate::from_ymd_opt(2022, 3, 7), None),
                EventRecord::new(None, Some("BERT")),
            ]
        );
    }

    #[test]
    fn short_rows_are_padded() {
        let dataset = Dataset::from_reader("a,b,c\n1\n".as_bytes()).expect("flexible csv");
        assert_eq!(dataset.rows()[0], vec![Some("1".to_string()), None, None]);
    }

    #[test]
    fn unknown_column_is_reported() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes()).expect("valid csv");
        let err = dataset.events("Date_Action_Filed", "Court").unwrap_err();
        assert!(matches!(err, TimelineError::MissingColumn(name) if name == "Court"));
    }

    #[test]
    fn bad_date_fails_even_without_category() {
        let data = "Date_Action_Filed,Name_of_Algorithm_Text\n2020-01-01,BERT\nsoon,\n";
        let dataset = Dataset::from_reader(data.as_bytes()).expect("valid csv");
        let err = dataset
            .events("Date_Action_Filed", "Name_of_Algorithm_Text")
            .unwrap_err();
        assert!(matches!(
            err,
            TimelineError::DateParse { row: 2, ref value } if value == "soon"
        ));
    }

    #[test]
    fn missing_file_names_path() {
        let err = Dataset::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, TimelineError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn na_spellings() {
        for cell in ["", "  ", "NaN", "NA", "null", "N/A", "NaT"] {
            assert!(is_missing(cell), "{cell:?}");
        }
        assert!(!is_missing("Nancy"));
    }
}
