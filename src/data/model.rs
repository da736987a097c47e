use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// GroupKey – the label of one aggregated bucket
// ---------------------------------------------------------------------------

/// A group-by key. Months sort numerically, everything else lexically.
/// Ordering is what breaks ties between equal aggregate values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Text(String),
    Month(i64),
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use GroupKey::*;
        match (self, other) {
            (Month(a), Month(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Month(_), Text(_)) => std::cmp::Ordering::Less,
            (Text(_), Month(_)) => std::cmp::Ordering::Greater,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Text(s) => write!(f, "{s}"),
            GroupKey::Month(m) => write!(f, "{m}"),
        }
    }
}

impl GroupKey {
    /// Numeric position of the key, used as the x coordinate of line charts.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GroupKey::Month(m) => Some(*m as f64),
            GroupKey::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// FlightRecord – one row of the flight table
// ---------------------------------------------------------------------------

/// A single flight after load-time coercion.
///
/// Every numeric field is finite; the loader substitutes `0.0` for anything
/// it could not parse.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FlightRecord {
    pub airline: String,
    pub route: String,
    pub origin: String,
    pub month: i64,
    pub arr_delay: f64,
    pub dep_delay: f64,
    pub carrier_delay: f64,
    pub weather_delay: f64,
    pub nas_delay: f64,
    pub security_delay: f64,
    pub late_aircraft_delay: f64,
    /// 0/1 flag stored as a number, exactly as it appears in the source.
    pub cancelled: f64,
    /// Reason code, meaningful only when `is_cancelled()`.
    pub cancellation_code: String,
}

impl FlightRecord {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled == 1.0
    }
}

// ---------------------------------------------------------------------------
// FlightDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded flight table with the distinct values of each filter dimension.
///
/// Immutable after construction; filtering borrows records instead of
/// copying or mutating them.
#[derive(Debug, Clone, Default)]
pub struct FlightDataset {
    pub records: Vec<FlightRecord>,
    pub airlines: BTreeSet<String>,
    pub routes: BTreeSet<String>,
    pub months: BTreeSet<i64>,
}

impl FlightDataset {
    /// Build the dimension indices from the loaded records.
    pub fn from_records(records: Vec<FlightRecord>) -> Self {
        let mut airlines = BTreeSet::new();
        let mut routes = BTreeSet::new();
        let mut months = BTreeSet::new();

        for rec in &records {
            airlines.insert(rec.airline.clone());
            routes.insert(rec.route.clone());
            months.insert(rec.month);
        }

        FlightDataset {
            records,
            airlines,
            routes,
            months,
        }
    }

    /// Number of flights.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(airline: &str, route: &str, month: i64) -> FlightRecord {
        FlightRecord {
            airline: airline.into(),
            route: route.into(),
            month,
            ..Default::default()
        }
    }

    #[test]
    fn distinct_values_are_collected_sorted() {
        let ds = FlightDataset::from_records(vec![
            record("UA", "SFO-ORD", 3),
            record("AA", "JFK-LAX", 1),
            record("UA", "JFK-LAX", 3),
        ]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.airlines.iter().collect::<Vec<_>>(), ["AA", "UA"]);
        assert_eq!(ds.routes.len(), 2);
        assert_eq!(ds.months.iter().copied().collect::<Vec<_>>(), [1, 3]);
    }

    #[test]
    fn month_keys_sort_numerically() {
        let mut keys = vec![GroupKey::Month(10), GroupKey::Month(2), GroupKey::Month(1)];
        keys.sort();
        assert_eq!(keys, [GroupKey::Month(1), GroupKey::Month(2), GroupKey::Month(10)]);
    }

    #[test]
    fn cancelled_flag_requires_exactly_one() {
        let mut rec = record("AA", "JFK-LAX", 1);
        assert!(!rec.is_cancelled());
        rec.cancelled = 1.0;
        assert!(rec.is_cancelled());
        rec.cancelled = 2.0;
        assert!(!rec.is_cancelled());
    }
}
