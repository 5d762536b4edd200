use polars::prelude::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::GridError;

/// One parsed data row, keyed by column name. Cells that were null in the
/// source file are absent from the map.
pub type Record = HashMap<String, String>;

/// Holds the full set of parsed records of the currently loaded file.
///
/// Loading a new file replaces the store wholesale; records are never merged
/// or mutated after parsing.
#[derive(Default)]
pub struct RowStore {
    name: String,
    columns: Vec<String>,
    records: Vec<Record>,
}

impl RowStore {
    pub fn load(path: &Path) -> Result<Self, GridError> {
        let path = Self::check_file(path)?;
        let start_time = Instant::now();

        let df = Self::scan_csv(&path)?.collect()?;
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        // Pull every column out of the frame in its own thread. All cell
        // values are held in memory as Strings afterwards.
        let cells: Result<Vec<Vec<Option<String>>>, PolarsError> = columns
            .par_iter()
            .map(|name| Self::extract_column(&df, name))
            .collect();
        let cells = cells?;

        let mut records = Vec::with_capacity(df.height());
        for ridx in 0..df.height() {
            let mut record = Record::with_capacity(columns.len());
            for (cidx, name) in columns.iter().enumerate() {
                if let Some(value) = &cells[cidx][ridx] {
                    record.insert(name.clone(), value.clone());
                }
            }
            records.push(record);
        }

        let loading_duration = start_time.elapsed().as_millis();
        info!(
            "Loaded {} records with {} columns in {loading_duration}ms",
            records.len(),
            columns.len()
        );
        debug!("Columns: {:?}", columns);

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string();

        Ok(RowStore {
            name,
            columns,
            records,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn scan_csv(path: &PathBuf) -> Result<LazyFrame, PolarsError> {
        LazyCsvReader::new(PlPath::Local(path.as_path().into()))
            .with_has_header(true)
            .finish()
    }

    fn extract_column(df: &DataFrame, col_name: &str) -> Result<Vec<Option<String>>, PolarsError> {
        let col = df.column(col_name)?.cast(&DataType::String)?;
        let series = col.str()?;
        let mut data = Vec::with_capacity(series.len());
        for value in series.into_iter() {
            data.push(value.map(|s| s.replace("\r\n", " ↵ ").replace("\n", " ↵ ")));
        }
        Ok(data)
    }

    fn check_file(path: &Path) -> Result<PathBuf, GridError> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => GridError::FileNotFound,
            ErrorKind::PermissionDenied => GridError::PermissionDenied,
            _ => GridError::IoError(e),
        })?;
        if !metadata.is_file() {
            return Err(GridError::LoadingFailed("Not a file!".into()));
        }
        Ok(path.to_path_buf())
    }

    #[cfg(test)]
    pub fn from_records(columns: Vec<String>, records: Vec<Record>) -> Self {
        RowStore {
            name: "test".to_string(),
            columns,
            records,
        }
    }
}
