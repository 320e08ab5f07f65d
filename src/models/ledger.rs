use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::models::errors::DetectionError;
use crate::models::Transaction;

/// Column roles every ledger must resolve before the engine runs.
pub const REQUIRED_COLUMNS: [&str; 3] = ["date", "account", "amount"];

/// In-memory tabular ledger.
///
/// Header names are trimmed and lower-cased on construction so that `Date`,
/// ` ACCOUNT ` and `amount` all resolve to their roles. Extra columns are
/// carried along and ignored when rows are read as transactions.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    headers: StringRecord,
    records: Vec<StringRecord>
}

impl Ledger {
    pub fn new(headers: StringRecord, records: Vec<StringRecord>) -> Self {
        let headers = headers.iter()
            .map(|header| header.trim().to_lowercase())
            .collect();

        Self { headers, records }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DetectionError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(headers, records))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DetectionError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Builds a ledger from already typed rows, rendering them the way an
    /// upstream export would.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let records = transactions.into_iter()
            .map(|transaction| {
                StringRecord::from(vec![
                    transaction.date.format("%Y-%m-%d").to_string(),
                    transaction.account.clone(),
                    transaction.amount.to_string()
                ])
            })
            .collect();

        Self::new(StringRecord::from(REQUIRED_COLUMNS.to_vec()), records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn missing_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS.iter()
            .filter(|required| !self.headers.iter().any(|header| header == **required))
            .map(|required| required.to_string())
            .collect()
    }

    /// Required roles claimed by more than one column once names are normalized.
    pub fn ambiguous_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS.iter()
            .filter(|required| self.headers.iter().filter(|header| header == *required).count() > 1)
            .map(|required| required.to_string())
            .collect()
    }

    /// Reads every row as a `Transaction`.
    ///
    /// # Errors
    /// - `MissingColumns` if any required role has no column.
    /// - `AmbiguousColumns` if a required role has several columns.
    /// - `InvalidRecord` for the first row whose date or amount cannot be read
    ///   (rows are numbered from 1, excluding the header).
    pub fn transactions(&self) -> Result<Vec<Transaction>, DetectionError> {
        let missing = self.missing_columns();

        if !missing.is_empty() {
            return Err(DetectionError::MissingColumns { missing });
        }

        let duplicated = self.ambiguous_columns();

        if !duplicated.is_empty() {
            return Err(DetectionError::AmbiguousColumns { duplicated });
        }

        self.records.iter()
            .enumerate()
            .map(|(index, record)| {
                record.deserialize::<Transaction>(Some(&self.headers))
                    .map_err(|error| DetectionError::invalid_record(index + 1, error))
            })
            .collect()
    }
}
