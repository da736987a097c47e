use std::collections::HashMap;

use serde::Serialize;

use super::model::{FlightRecord, GroupKey};

/// Cap applied by the "top" panels.
pub const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One bar / point / slice of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub key: GroupKey,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(key: GroupKey, value: f64) -> Self {
        SeriesPoint { key, value }
    }
}

/// How a panel is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    HorizontalBars,
    VerticalBars,
    Line,
    Pie,
}

// ---------------------------------------------------------------------------
// Aggregation catalog
// ---------------------------------------------------------------------------

/// The fixed set of dashboard aggregations, in panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Aggregation {
    TopRoutesByDelay,
    TopRoutesByVolume,
    AirlineAvgDelay,
    AirlineVolume,
    TopAirportsByDelay,
    TopAirportsByVolume,
    MonthlyCancellations,
    CancellationReasonShare,
}

impl Aggregation {
    pub const ALL: [Aggregation; 8] = [
        Aggregation::TopRoutesByDelay,
        Aggregation::TopRoutesByVolume,
        Aggregation::AirlineAvgDelay,
        Aggregation::AirlineVolume,
        Aggregation::TopAirportsByDelay,
        Aggregation::TopAirportsByVolume,
        Aggregation::MonthlyCancellations,
        Aggregation::CancellationReasonShare,
    ];

    /// Run this aggregation over a filtered view.
    pub fn run(self, records: &[&FlightRecord]) -> Vec<SeriesPoint> {
        match self {
            Aggregation::TopRoutesByDelay => top_routes_by_delay(records),
            Aggregation::TopRoutesByVolume => top_routes_by_volume(records),
            Aggregation::AirlineAvgDelay => airline_avg_delay(records),
            Aggregation::AirlineVolume => airline_volume(records),
            Aggregation::TopAirportsByDelay => top_airports_by_delay(records),
            Aggregation::TopAirportsByVolume => top_airports_by_volume(records),
            Aggregation::MonthlyCancellations => monthly_cancellations(records),
            Aggregation::CancellationReasonShare => cancellation_reason_share(records),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Aggregation::TopRoutesByDelay => "Routes with Highest Average Arrival Delay",
            Aggregation::TopRoutesByVolume => "Busiest Flight Routes",
            Aggregation::AirlineAvgDelay => "Average Arrival Delay by Airline",
            Aggregation::AirlineVolume => "Number of Flights by Airline",
            Aggregation::TopAirportsByDelay => "Airports with Highest Average Arrival Delay",
            Aggregation::TopAirportsByVolume => "Top 10 Busiest Airports",
            Aggregation::MonthlyCancellations => "Monthly Cancellation Trend",
            Aggregation::CancellationReasonShare => "Cancellation Reasons Distribution",
        }
    }

    /// Axis label for the group keys.
    pub fn key_label(self) -> &'static str {
        match self {
            Aggregation::TopRoutesByDelay | Aggregation::TopRoutesByVolume => "Route",
            Aggregation::AirlineAvgDelay | Aggregation::AirlineVolume => "Airline",
            Aggregation::TopAirportsByDelay | Aggregation::TopAirportsByVolume => "Origin Airport",
            Aggregation::MonthlyCancellations => "Month",
            Aggregation::CancellationReasonShare => "Cancellation Code",
        }
    }

    /// Axis label for the aggregated values.
    pub fn value_label(self) -> &'static str {
        match self {
            Aggregation::TopRoutesByDelay
            | Aggregation::AirlineAvgDelay
            | Aggregation::TopAirportsByDelay => "Average Arrival Delay (min)",
            Aggregation::TopRoutesByVolume
            | Aggregation::AirlineVolume
            | Aggregation::TopAirportsByVolume => "Number of Flights",
            Aggregation::MonthlyCancellations => "Number of Cancellations",
            Aggregation::CancellationReasonShare => "Share of Cancellations (%)",
        }
    }

    pub fn cap(self) -> Option<usize> {
        match self {
            Aggregation::TopRoutesByDelay
            | Aggregation::TopRoutesByVolume
            | Aggregation::TopAirportsByDelay
            | Aggregation::TopAirportsByVolume => Some(TOP_N),
            _ => None,
        }
    }

    pub fn chart_kind(self) -> ChartKind {
        match self {
            Aggregation::TopRoutesByDelay
            | Aggregation::TopRoutesByVolume
            | Aggregation::TopAirportsByDelay
            | Aggregation::TopAirportsByVolume => ChartKind::HorizontalBars,
            Aggregation::AirlineAvgDelay | Aggregation::AirlineVolume => ChartKind::VerticalBars,
            Aggregation::MonthlyCancellations => ChartKind::Line,
            Aggregation::CancellationReasonShare => ChartKind::Pie,
        }
    }
}

// ---------------------------------------------------------------------------
// Individual aggregations
// ---------------------------------------------------------------------------

pub fn top_routes_by_delay(records: &[&FlightRecord]) -> Vec<SeriesPoint> {
    ranked(mean_by(records, |r| text_key(&r.route)), Aggregation::TopRoutesByDelay.cap())
}

pub fn top_routes_by_volume(records: &[&FlightRecord]) -> Vec<SeriesPoint> {
    ranked(count_by(records, |r| text_key(&r.route)), Aggregation::TopRoutesByVolume.cap())
}

pub fn airline_avg_delay(records: &[&FlightRecord]) -> Vec<SeriesPoint> {
    ranked(mean_by(records, |r| text_key(&r.airline)), Aggregation::AirlineAvgDelay.cap())
}

pub fn airline_volume(records: &[&FlightRecord]) -> Vec<SeriesPoint> {
    ranked(count_by(records, |r| text_key(&r.airline)), Aggregation::AirlineVolume.cap())
}

pub fn top_airports_by_delay(records: &[&FlightRecord]) -> Vec<SeriesPoint> {
    ranked(mean_by(records, |r| text_key(&r.origin)), Aggregation::TopAirportsByDelay.cap())
}

pub fn top_airports_by_volume(records: &[&FlightRecord]) -> Vec<SeriesPoint> {
    ranked(count_by(records, |r| text_key(&r.origin)), Aggregation::TopAirportsByVolume.cap())
}

/// Sum of the cancellation flag per month, ordered by month.
pub fn monthly_cancellations(records: &[&FlightRecord]) -> Vec<SeriesPoint> {
    let mut sums: HashMap<GroupKey, f64> = HashMap::new();
    for rec in records {
        *sums.entry(GroupKey::Month(rec.month)).or_default() += rec.cancelled;
    }
    let mut points: Vec<SeriesPoint> = sums
        .into_iter()
        .map(|(key, value)| SeriesPoint::new(key, value))
        .collect();
    points.sort_by(|a, b| a.key.cmp(&b.key));
    points
}

/// Percentage of cancelled flights per reason code, in order of first
/// appearance. Cancelled flights without a code are left out of both the
/// slices and the denominator.
pub fn cancellation_reason_share(records: &[&FlightRecord]) -> Vec<SeriesPoint> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for rec in records {
        if !rec.is_cancelled() || rec.cancellation_code.is_empty() {
            continue;
        }
        let code = rec.cancellation_code.as_str();
        let idx = *slot.entry(code).or_insert_with(|| {
            order.push((code, 0));
            order.len() - 1
        });
        order[idx].1 += 1;
    }

    let total: usize = order.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }
    order
        .into_iter()
        .map(|(code, n)| SeriesPoint::new(text_key(code), n as f64 * 100.0 / total as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Group-by helpers
// ---------------------------------------------------------------------------

fn text_key(s: &str) -> GroupKey {
    GroupKey::Text(s.to_string())
}

fn count_by<F>(records: &[&FlightRecord], key: F) -> HashMap<GroupKey, f64>
where
    F: Fn(&FlightRecord) -> GroupKey,
{
    let mut counts: HashMap<GroupKey, f64> = HashMap::new();
    for rec in records {
        *counts.entry(key(rec)).or_default() += 1.0;
    }
    counts
}

/// Mean arrival delay per key. Every group holds at least one record.
fn mean_by<F>(records: &[&FlightRecord], key: F) -> HashMap<GroupKey, f64>
where
    F: Fn(&FlightRecord) -> GroupKey,
{
    let mut acc: HashMap<GroupKey, (f64, usize)> = HashMap::new();
    for rec in records {
        let entry = acc.entry(key(rec)).or_insert((0.0, 0));
        entry.0 += rec.arr_delay;
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Sort descending by value, ties by ascending key, then truncate.
fn ranked(groups: HashMap<GroupKey, f64>, cap: Option<usize>) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = groups
        .into_iter()
        .map(|(key, value)| SeriesPoint::new(key, value))
        .collect();
    points.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.key.cmp(&b.key)));
    if let Some(n) = cap {
        points.truncate(n);
    }
    points
}
