use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{FlightDataset, FlightRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal failure while reading the flight table. Nothing can be rendered
/// without a dataset, so callers surface this to the user and stop.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("converting parquet column: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("expected a top-level JSON array of records")]
    NotAnArray,
    #[error("row {row} is not a JSON object")]
    NotAnObject { row: usize },
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("row {row}: month '{value}' is not an integer")]
    InvalidMonth { row: usize, value: String },
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Source columns the dashboard needs, in the order rows are assembled.
pub const REQUIRED_COLUMNS: [&str; 13] = [
    "Airline",
    "Route",
    "Month",
    "Origin",
    "ArrDelay",
    "DepDelay",
    "CarrierDelay",
    "WeatherDelay",
    "NASDelay",
    "SecurityDelay",
    "LateAircraftDelay",
    "Cancelled",
    "CancellationCode",
];

const AIRLINE: usize = 0;
const ROUTE: usize = 1;
const MONTH: usize = 2;
const ORIGIN: usize = 3;
const ARR_DELAY: usize = 4;
const DEP_DELAY: usize = 5;
const CARRIER_DELAY: usize = 6;
const WEATHER_DELAY: usize = 7;
const NAS_DELAY: usize = 8;
const SECURITY_DELAY: usize = 9;
const LATE_AIRCRAFT_DELAY: usize = 10;
const CANCELLED: usize = 11;
const CANCELLATION_CODE: usize = 12;

/// One source row restricted to [`REQUIRED_COLUMNS`]; `None` is a null cell.
type RawRow = Vec<Option<String>>;

/// Position of each required column in the source header.
struct ColumnMap {
    positions: Vec<usize>,
}

impl ColumnMap {
    fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, LoadError> {
        let mut positions = Vec::with_capacity(REQUIRED_COLUMNS.len());
        let mut missing = Vec::new();
        for name in REQUIRED_COLUMNS {
            match headers.iter().position(|h| h.as_ref().trim() == name) {
                Some(pos) => positions.push(pos),
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns { missing });
        }
        Ok(ColumnMap { positions })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a flight table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one flight per line
/// * `.json`    – `[{ "Airline": "AA", "Route": "JFK-LAX", ... }, ...]`
/// * `.parquet` – any column types; required columns are read as text
pub fn load_file(path: &Path) -> Result<FlightDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || {
        std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let dataset = match ext.as_str() {
        "csv" => read_csv(open()?)?,
        "json" => read_json(open()?)?,
        "parquet" | "pq" => read_parquet(open()?)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} flights from {} ({} airlines, {} routes, {} months)",
        dataset.len(),
        path.display(),
        dataset.airlines.len(),
        dataset.routes.len(),
        dataset.months.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Returns `None` for empty, non-numeric and
/// non-finite input.
pub fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    let v = raw?.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// Parse a month cell. Integral floats such as `3.0` are accepted.
pub fn parse_month(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    let f = s.parse::<f64>().ok()?;
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Turns raw rows into records, counting zero substitutions for the log.
#[derive(Default)]
struct RecordBuilder {
    records: Vec<FlightRecord>,
    substituted: usize,
}

impl RecordBuilder {
    fn numeric(&mut self, row: &RawRow, col: usize) -> f64 {
        parse_numeric(row[col].as_deref()).unwrap_or_else(|| {
            self.substituted += 1;
            0.0
        })
    }

    fn push(&mut self, row_no: usize, row: RawRow) -> Result<(), LoadError> {
        let text = |col: usize| row[col].as_deref().unwrap_or("").to_string();

        let month_raw = row[MONTH].as_deref().unwrap_or("");
        let month = parse_month(month_raw).ok_or_else(|| LoadError::InvalidMonth {
            row: row_no,
            value: month_raw.to_string(),
        })?;

        let record = FlightRecord {
            airline: text(AIRLINE),
            route: text(ROUTE),
            origin: text(ORIGIN),
            month,
            cancellation_code: text(CANCELLATION_CODE),
            arr_delay: self.numeric(&row, ARR_DELAY),
            dep_delay: self.numeric(&row, DEP_DELAY),
            carrier_delay: self.numeric(&row, CARRIER_DELAY),
            weather_delay: self.numeric(&row, WEATHER_DELAY),
            nas_delay: self.numeric(&row, NAS_DELAY),
            security_delay: self.numeric(&row, SECURITY_DELAY),
            late_aircraft_delay: self.numeric(&row, LATE_AIRCRAFT_DELAY),
            cancelled: self.numeric(&row, CANCELLED),
        };
        self.records.push(record);
        Ok(())
    }

    fn finish(self) -> FlightDataset {
        if self.substituted > 0 {
            log::debug!(
                "Coerced {} unparseable numeric cells to 0",
                self.substituted
            );
        }
        FlightDataset::from_records(self.records)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one flight per line.
/// Short rows are accepted; their trailing cells count as null.
pub fn read_csv<R: Read>(source: R) -> Result<FlightDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let columns = ColumnMap::resolve(&headers)?;

    let mut builder = RecordBuilder::default();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let row: RawRow = columns
            .positions
            .iter()
            .map(|&pos| record.get(pos).filter(|s| !s.is_empty()).map(str::to_string))
            .collect();
        builder.push(row_no, row)?;
    }

    Ok(builder.finish())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Airline": "AA", "Route": "JFK-LAX", "Month": 1, "ArrDelay": 12.0, ... },
///   ...
/// ]
/// ```
///
/// A required key must appear in at least one record; records lacking it
/// read as null.
pub fn read_json<R: Read>(source: R) -> Result<FlightDataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(source)?;
    let records = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut keys: BTreeSet<&str> = BTreeSet::new();
    for (row_no, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or(LoadError::NotAnObject { row: row_no })?;
        keys.extend(obj.keys().map(String::as_str));
    }
    let keys: Vec<&str> = keys.into_iter().collect();
    ColumnMap::resolve(&keys)?;

    let mut builder = RecordBuilder::default();
    for (row_no, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or(LoadError::NotAnObject { row: row_no })?;
        let row: RawRow = REQUIRED_COLUMNS
            .iter()
            .map(|name| obj.get(*name).and_then(json_to_cell))
            .collect();
        builder.push(row_no, row)?;
    }

    Ok(builder.finish())
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(u8::from(*b).to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// Each required column is cast to text and then coerced exactly like a
/// CSV cell, so numeric columns may be stored as strings, integers or
/// floats. Boolean columns read as 0/1.
pub fn read_parquet(file: std::fs::File) -> Result<FlightDataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let columns = ColumnMap::resolve(&headers)?;
    let reader = builder.build()?;

    let mut records = RecordBuilder::default();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let text_columns = columns
            .positions
            .iter()
            .map(|&pos| column_as_text(batch.column(pos)))
            .collect::<Result<Vec<ArrayRef>, LoadError>>()?;

        for row in 0..batch.num_rows() {
            let raw: RawRow = text_columns
                .iter()
                .map(|col| {
                    if col.is_null(row) {
                        None
                    } else {
                        Some(col.as_string::<i32>().value(row).to_string())
                    }
                })
                .collect();
            records.push(row_offset + row, raw)?;
        }
        row_offset += batch.num_rows();
    }

    Ok(records.finish())
}

/// Cast an Arrow column to `Utf8`, mapping booleans through `Int8` so they
/// render as `0`/`1`.
fn column_as_text(col: &ArrayRef) -> Result<ArrayRef, LoadError> {
    let col = match col.data_type() {
        DataType::Boolean => cast(col, &DataType::Int8)?,
        _ => col.clone(),
    };
    Ok(cast(&col, &DataType::Utf8)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "Airline,Route,Month,Origin,ArrDelay,DepDelay,CarrierDelay,\
WeatherDelay,NASDelay,SecurityDelay,LateAircraftDelay,Cancelled,CancellationCode";

    #[test]
    fn numeric_cells_coerce_to_zero() {
        assert_eq!(parse_numeric(Some(" 12.5 ")), Some(12.5));
        assert_eq!(parse_numeric(Some("bad")), None);
        assert_eq!(parse_numeric(Some("")), None);
        assert_eq!(parse_numeric(Some("NaN")), None);
        assert_eq!(parse_numeric(Some("inf")), None);
        assert_eq!(parse_numeric(None), None);
    }

    #[test]
    fn months_accept_integral_floats() {
        assert_eq!(parse_month("7"), Some(7));
        assert_eq!(parse_month(" 3.0 "), Some(3));
        assert_eq!(parse_month("3.5"), None);
        assert_eq!(parse_month("March"), None);
        assert_eq!(parse_month("1e20"), None);
        assert_eq!(parse_month("-1e20"), None);
    }

    #[test]
    fn csv_rows_are_coerced() {
        let csv = format!(
            "{HEADER}\n\
             AA,JFK-LAX,1,JFK,10,5,,,,,,0,\n\
             AA,JFK-LAX,1,JFK,bad,x,1,2,3,4,5,1,B\n"
        );
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.records[0];
        assert_eq!(first.arr_delay, 10.0);
        assert_eq!(first.carrier_delay, 0.0);
        assert_eq!(first.cancellation_code, "");

        let second = &ds.records[1];
        assert_eq!(second.arr_delay, 0.0);
        assert_eq!(second.dep_delay, 0.0);
        assert_eq!(second.late_aircraft_delay, 5.0);
        assert!(second.is_cancelled());
        assert_eq!(second.cancellation_code, "B");
    }

    #[test]
    fn categorical_cells_keep_their_whitespace() {
        let csv = format!(
            "{HEADER}\n\
             AA,JFK-LAX,1,JFK,10,0,0,0,0,0,0,0,\n\
             \" AA \",JFK-LAX,1,JFK,30,0,0,0,0,0,0,0,\n"
        );
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.airlines.len(), 2);
        assert!(ds.airlines.contains(" AA "));
        assert_eq!(ds.records[0].airline, "AA");
        assert_eq!(ds.records[1].airline, " AA ");
    }

    #[test]
    fn csv_short_rows_read_as_null() {
        let csv = format!("{HEADER}\nDL,ATL-BOS,2,ATL,7\n");
        let ds = read_csv(csv.as_bytes()).unwrap();
        let rec = &ds.records[0];
        assert_eq!(rec.arr_delay, 7.0);
        assert_eq!(rec.cancelled, 0.0);
        assert_eq!(rec.cancellation_code, "");
    }

    #[test]
    fn csv_missing_columns_are_reported_together() {
        let csv = "Airline,Route,Month,Origin,ArrDelay\nAA,JFK-LAX,1,JFK,3\n";
        match read_csv(csv.as_bytes()) {
            Err(LoadError::MissingColumns { missing }) => {
                assert_eq!(missing.len(), 8);
                assert!(missing.contains(&"DepDelay".to_string()));
                assert!(missing.contains(&"CancellationCode".to_string()));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn csv_invalid_month_is_fatal() {
        let csv = format!("{HEADER}\nAA,JFK-LAX,Jan,JFK,1,1,1,1,1,1,1,0,\n");
        match read_csv(csv.as_bytes()) {
            Err(LoadError::InvalidMonth { row, value }) => {
                assert_eq!(row, 0);
                assert_eq!(value, "Jan");
            }
            other => panic!("expected InvalidMonth, got {other:?}"),
        }
    }

    #[test]
    fn header_only_csv_is_an_empty_dataset() {
        let ds = read_csv(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn json_records_are_coerced() {
        let json = r#"[
            {"Airline": "AA", "Route": "JFK-LAX", "Month": 1, "Origin": "JFK",
             "ArrDelay": 10.5, "DepDelay": null, "CarrierDelay": "n/a",
             "WeatherDelay": 0, "NASDelay": 0, "SecurityDelay": 0,
             "LateAircraftDelay": 0, "Cancelled": true, "CancellationCode": "A"},
            {"Airline": "UA", "Route": "SFO-ORD", "Month": 2.0, "Origin": "SFO"}
        ]"#;
        let ds = read_json(json.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].arr_delay, 10.5);
        assert_eq!(ds.records[0].dep_delay, 0.0);
        assert_eq!(ds.records[0].carrier_delay, 0.0);
        assert!(ds.records[0].is_cancelled());
        assert_eq!(ds.records[1].month, 2);
        assert_eq!(ds.records[1].cancellation_code, "");
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(matches!(
            read_json(r#"{"Airline": "AA"}"#.as_bytes()),
            Err(LoadError::NotAnArray)
        ));
        assert!(matches!(
            read_json("[1]".as_bytes()),
            Err(LoadError::NotAnObject { row: 0 })
        ));
        assert!(matches!(
            read_json("[]".as_bytes()),
            Err(LoadError::MissingColumns { .. })
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("flights.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ref ext) if ext == "xlsx"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
