/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, coerce numeric columns → FlightDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ FlightDataset │  Vec<FlightRecord>, distinct airlines/routes/months
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → borrowed subset, dataset order
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  one ordered (key, value) series per chart panel
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
