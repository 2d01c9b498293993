//! Order dataset loader.
//!
//! Reads the pre-aggregated order table from a delimited text file,
//! locating the required columns by header name and converting each row
//! into an [`OrderRecord`].

use crate::error::DatasetError;
use crate::models::{Dataset, OrderRecord};
use csv::{ReaderBuilder, StringRecord};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Columns the loader requires, in header lookup order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "order_id",
    "order_year",
    "month_num",
    "product_category_name",
    "customer_id",
    "customer_state",
    "customer_city",
    "review_score",
];

/// Options for loading a dataset.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Whether to show a spinner while reading.
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            show_progress: false,
        }
    }
}

impl From<&crate::config::DatasetConfig> for LoadOptions {
    fn from(config: &crate::config::DatasetConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
            show_progress: true,
        }
    }
}

/// Positions of the required columns in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    order_id: usize,
    order_year: usize,
    month_num: usize,
    product_category_name: usize,
    customer_id: usize,
    customer_state: usize,
    customer_city: usize,
    review_score: usize,
}

impl ColumnIndex {
    /// Resolve every required column, reporting all missing ones at once.
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetError> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(**name).is_none())
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns { columns: missing });
        }

        // All present, checked above.
        let at = |name: &str| position(name).unwrap_or_default();

        Ok(Self {
            order_id: at("order_id"),
            order_year: at("order_year"),
            month_num: at("month_num"),
            product_category_name: at("product_category_name"),
            customer_id: at("customer_id"),
            customer_state: at("customer_state"),
            customer_city: at("customer_city"),
            review_score: at("review_score"),
        })
    }
}

/// Load the dataset at `path`.
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<Dataset, DatasetError> {
    info!("Loading dataset: {}", path.display());

    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_dataset(file, path, options)
}

/// Read a dataset from any reader. `source` is only used for reporting.
pub fn read_dataset<R: Read>(
    reader: R,
    source: &Path,
    options: &LoadOptions,
) -> Result<Dataset, DatasetError> {
    let csv_error = |err: csv::Error| DatasetError::Csv {
        path: source.to_path_buf(),
        source: err,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .flexible(false)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_error)?.clone();
    debug!("Dataset header: {:?}", headers);

    let columns = ColumnIndex::resolve(&headers)?;

    let spinner = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} rows read")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mut records = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let row = result.map_err(csv_error)?;
        records.push(parse_record(&row, &columns, index + 1)?);

        if let Some(ref pb) = spinner {
            if records.len() % 4096 == 0 {
                pb.set_position(records.len() as u64);
            }
        }
    }

    if let Some(pb) = spinner {
        pb.set_position(records.len() as u64);
        pb.finish_and_clear();
    }

    info!("Loaded {} order records", records.len());

    Ok(Dataset::new(source, records))
}

/// Convert one CSV row. `row` is the 1-indexed data row, for error messages.
fn parse_record(
    record: &StringRecord,
    columns: &ColumnIndex,
    row: usize,
) -> Result<OrderRecord, DatasetError> {
    let field = |index: usize| record.get(index).unwrap_or("");

    let order_year = parse_int(field(columns.order_year), row, "order_year")?
        .map(|value| narrow(value, row, "order_year", field(columns.order_year)))
        .transpose()?;
    let month_num = parse_int(field(columns.month_num), row, "month_num")?
        .map(|value| narrow(value, row, "month_num", field(columns.month_num)))
        .transpose()?;
    let review_score = parse_int(field(columns.review_score), row, "review_score")?
        .map(|value| narrow(value, row, "review_score", field(columns.review_score)))
        .transpose()?;

    Ok(OrderRecord {
        order_id: text(field(columns.order_id)),
        order_year,
        month_num,
        product_category_name: text(field(columns.product_category_name)),
        customer_id: text(field(columns.customer_id)),
        customer_state: text(field(columns.customer_state)),
        customer_city: text(field(columns.customer_city)),
        review_score,
    })
}

/// Missing-value markers, as written by common dataframe exports.
/// Matched exactly, case included.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Text cells are kept as written. Missing markers become `None`.
fn text(raw: &str) -> Option<String> {
    if is_missing(raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

fn is_missing(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

/// Parse an integer cell. Integral floats such as `2017.0` are accepted
/// because dataframe exports write integer columns with gaps that way.
fn parse_int(raw: &str, row: usize, column: &'static str) -> Result<Option<i64>, DatasetError> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }

    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(Some(value));
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(Some(value as i64)),
        _ => Err(DatasetError::InvalidValue {
            row,
            column,
            value: raw.to_string(),
        }),
    }
}

fn narrow<T: TryFrom<i64>>(
    value: i64,
    row: usize,
    column: &'static str,
    raw: &str,
) -> Result<T, DatasetError> {
    T::try_from(value).map_err(|_| DatasetError::InvalidValue {
        row,
        column,
        value: raw.to_string(),
    })
}
