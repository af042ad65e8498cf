//! Sales dataset loaded from the cleaned CSV export.
//!
//! The file is read once at startup ([`initialize_dataset`]) and kept in a
//! process-wide read-only handle ([`get_dataset`]). Nothing mutates it after
//! loading; filters and aggregates borrow from it.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::OnceCell;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

static DATASET: OnceCell<SalesDataset> = OnceCell::new();

pub const COL_ORDER_ID: &str = "Order ID";
pub const COL_ORDER_DATE: &str = "Order Date";
pub const COL_CATEGORY: &str = "Category";
pub const COL_SEGMENT: &str = "Segment";
pub const COL_CITY: &str = "City";
pub const COL_SALES: &str = "Sales";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    // day-first only when month-first is impossible (day > 12)
    "%d/%m/%Y",
    "%d-%m-%Y",
    // two-digit years: 69..=99 -> 19xx, 00..=68 -> 20xx
    "%m/%d/%y",
    "%m-%d-%y",
    "%d/%m/%y",
    "%d-%m-%y",
];

/// `%Y` also accepts one or two digits ("10/11/12" -> year 10); such parses are rejected
const MIN_YEAR: i32 = 1000;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Ошибки загрузки датасета
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Sales dataset not found at {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Failed to read sales dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' is missing from the CSV header")]
    MissingColumn(String),

    #[error("Sales dataset is already loaded, {} was ignored", path.display())]
    AlreadyLoaded { path: PathBuf },
}

/// One row of the source file
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub order_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    /// Derived from `order_date`, `None` when the date did not parse
    pub year: Option<i32>,
    /// 1..=12, same nullability as `year`
    pub month: Option<u32>,
    pub category: Option<String>,
    pub segment: Option<String>,
    pub city: Option<String>,
    /// Empty cell is `None` and counts as zero in sums
    pub sales: Option<f64>,
}

impl SaleRecord {
    pub fn new(
        order_id: Option<String>,
        order_date: Option<NaiveDate>,
        category: Option<String>,
        segment: Option<String>,
        city: Option<String>,
        sales: Option<f64>,
    ) -> Self {
        Self {
            order_id,
            order_date,
            year: order_date.map(|d| d.year()),
            month: order_date.map(|d| d.month()),
            category,
            segment,
            city,
            sales,
        }
    }

    pub fn sales_or_zero(&self) -> f64 {
        self.sales.unwrap_or(0.0)
    }
}

/// In-memory table of sale records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesDataset {
    records: Vec<SaleRecord>,
    /// Rows dropped because `Sales` was not a number
    skipped_rows: usize,
    /// Rows kept with a null date
    unparsed_dates: usize,
}

struct ColumnIndex {
    order_id: usize,
    order_date: usize,
    category: usize,
    segment: usize,
    city: usize,
    sales: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            order_id: find(COL_ORDER_ID)?,
            order_date: find(COL_ORDER_DATE)?,
            category: find(COL_CATEGORY)?,
            segment: find(COL_SEGMENT)?,
            city: find(COL_CITY)?,
            sales: find(COL_SALES)?,
        })
    }
}

impl SalesDataset {
    /// Build a dataset from already parsed records
    pub fn from_records(records: Vec<SaleRecord>) -> Self {
        Self {
            records,
            skipped_rows: 0,
            unparsed_dates: 0,
        }
    }

    /// Read the CSV file at `path`
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        if !path.exists() {
            return Err(DatasetError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;

        tracing::info!(
            "Loaded {} sales rows from {} ({} skipped, {} without a valid date)",
            dataset.len(),
            path.display(),
            dataset.skipped_rows,
            dataset.unparsed_dates
        );

        Ok(dataset)
    }

    /// Parse comma-separated UTF-8 data with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = ColumnIndex::from_headers(reader.headers()?)?;

        let mut records = Vec::new();
        let mut skipped_rows = 0;
        let mut unparsed_dates = 0;

        for (idx, row) in reader.records().enumerate() {
            let row = row?;
            // header is line 1
            let line = idx + 2;

            let sales = match parse_sales(row.get(columns.sales).unwrap_or("")) {
                Ok(sales) => sales,
                Err(raw) => {
                    tracing::warn!("Line {}: skipping row, Sales value '{}' is not a number", line, raw);
                    skipped_rows += 1;
                    continue;
                }
            };

            let raw_date = row.get(columns.order_date).unwrap_or("");
            let order_date = parse_order_date(raw_date);
            if order_date.is_none() {
                tracing::debug!("Line {}: unparseable order date '{}'", line, raw_date);
                unparsed_dates += 1;
            }

            records.push(SaleRecord::new(
                non_empty(row.get(columns.order_id)),
                order_date,
                non_empty(row.get(columns.category)),
                non_empty(row.get(columns.segment)),
                non_empty(row.get(columns.city)),
                sales,
            ));
        }

        Ok(Self {
            records,
            skipped_rows,
            unparsed_dates,
        })
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn unparsed_dates(&self) -> usize {
        self.unparsed_dates
    }
}

/// Load the dataset once and publish it process-wide.
///
/// A second call fails with [`DatasetError::AlreadyLoaded`] and leaves the
/// published dataset untouched.
pub fn initialize_dataset(path: &Path) -> Result<&'static SalesDataset, DatasetError> {
    let already_loaded = || {
        tracing::warn!("Sales dataset is already loaded, ignoring {}", path.display());
        DatasetError::AlreadyLoaded {
            path: path.to_path_buf(),
        }
    };

    if DATASET.get().is_some() {
        return Err(already_loaded());
    }

    let dataset = SalesDataset::load(path)?;
    DATASET.set(dataset).map_err(|_| already_loaded())?;
    DATASET.get().ok_or_else(already_loaded)
}

/// Read-only handle to the loaded dataset, `None` before [`initialize_dataset`]
pub fn get_dataset() -> Option<&'static SalesDataset> {
    DATASET.get()
}

/// Parse an order date; `None` when no known layout matches
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDate::parse_from_str(raw, fmt)
                .ok()
                .filter(|d| d.year() >= MIN_YEAR)
        })
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|fmt| {
                NaiveDateTime::parse_from_str(raw, fmt)
                    .ok()
                    .map(|dt| dt.date())
                    .filter(|d| d.year() >= MIN_YEAR)
            })
        })
}

/// `Ok(None)` for an empty cell, `Err(raw)` when the value is not a finite number
fn parse_sales(raw: &str) -> Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) if raw.eq_ignore_ascii_case("nan") => Ok(None),
        _ => Err(raw.to_string()),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
