use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{FlightDataset, FlightRecord};

// ---------------------------------------------------------------------------
// Filter selection: which values are selected per dimension
// ---------------------------------------------------------------------------

/// The three multi-select controls of the sidebar.
///
/// An empty set selects nothing: it does not mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterSelection {
    pub airlines: BTreeSet<String>,
    pub routes: BTreeSet<String>,
    pub months: BTreeSet<i64>,
}

/// A filter dimension, used by the UI helpers that edit one set at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Airline,
    Route,
    Month,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Airline, Dimension::Route, Dimension::Month];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Airline => "Airlines",
            Dimension::Route => "Routes",
            Dimension::Month => "Months",
        }
    }
}

impl FilterSelection {
    /// Every distinct value selected, i.e. show everything.
    pub fn all(dataset: &FlightDataset) -> Self {
        FilterSelection {
            airlines: dataset.airlines.clone(),
            routes: dataset.routes.clone(),
            months: dataset.months.clone(),
        }
    }

    /// Whether a record passes all three membership tests.
    pub fn matches(&self, record: &FlightRecord) -> bool {
        self.airlines.contains(&record.airline)
            && self.routes.contains(&record.route)
            && self.months.contains(&record.month)
    }

    /// Number of selected values in a dimension.
    pub fn selected_count(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::Airline => self.airlines.len(),
            Dimension::Route => self.routes.len(),
            Dimension::Month => self.months.len(),
        }
    }

    /// Copy of this selection with one dimension replaced by every value
    /// the dataset has for it.
    pub fn with_all(&self, dataset: &FlightDataset, dim: Dimension) -> Self {
        let mut next = self.clone();
        match dim {
            Dimension::Airline => next.airlines = dataset.airlines.clone(),
            Dimension::Route => next.routes = dataset.routes.clone(),
            Dimension::Month => next.months = dataset.months.clone(),
        }
        next
    }

    /// Copy of this selection with one dimension cleared.
    pub fn with_none(&self, dim: Dimension) -> Self {
        let mut next = self.clone();
        match dim {
            Dimension::Airline => next.airlines.clear(),
            Dimension::Route => next.routes.clear(),
            Dimension::Month => next.months.clear(),
        }
        next
    }
}

/// Return the records that pass the selection, in dataset order.
///
/// An empty selection in any dimension yields no records at all.
pub fn filter_records<'a>(
    dataset: &'a FlightDataset,
    selection: &FilterSelection,
) -> Vec<&'a FlightRecord> {
    if selection.airlines.is_empty() || selection.routes.is_empty() || selection.months.is_empty()
    {
        return Vec::new();
    }

    dataset
        .records
        .iter()
        .filter(|rec| selection.matches(rec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dataset() -> FlightDataset {
        let rec = |airline: &str, route: &str, month: i64, arr_delay: f64| FlightRecord {
            airline: airline.into(),
            route: route.into(),
            month,
            arr_delay,
            ..Default::default()
        };
        FlightDataset::from_records(vec![
            rec("AA", "JFK-LAX", 1, 1.0),
            rec("UA", "SFO-ORD", 2, 2.0),
            rec("AA", "SFO-ORD", 2, 3.0),
            rec("DL", "ATL-BOS", 3, 4.0),
            rec("AA", "JFK-LAX", 3, 5.0),
        ])
    }

    fn delays(records: &[&FlightRecord]) -> Vec<f64> {
        records.iter().map(|r| r.arr_delay).collect()
    }

    #[test]
    fn full_selection_keeps_everything_in_order() {
        let ds = dataset();
        let out = filter_records(&ds, &FilterSelection::all(&ds));
        assert_eq!(delays(&out), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn dimensions_combine_with_and() {
        let ds = dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.airlines = BTreeSet::from(["AA".to_string()]);
        sel.months = BTreeSet::from([2, 3]);
        let out = filter_records(&ds, &sel);
        assert_eq!(delays(&out), vec![3.0, 5.0]);
        assert!(out.iter().all(|r| sel.matches(r)));
    }

    #[test]
    fn empty_set_in_any_dimension_selects_nothing() {
        let ds = dataset();
        for dim in Dimension::ALL {
            let sel = FilterSelection::all(&ds).with_none(dim);
            assert!(filter_records(&ds, &sel).is_empty(), "{dim:?}");
        }
    }

    #[test]
    fn values_absent_from_the_dataset_match_nothing() {
        let ds = dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.routes = BTreeSet::from(["ORD-MIA".to_string()]);
        assert!(filter_records(&ds, &sel).is_empty());
    }

    #[test]
    fn kept_records_are_exactly_the_matching_ones() {
        let ds = dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.routes = BTreeSet::from(["SFO-ORD".to_string()]);
        let out = filter_records(&ds, &sel);
        let expected: Vec<&FlightRecord> = ds.records.iter().filter(|r| sel.matches(r)).collect();
        assert_eq!(out, expected);
        assert_eq!(delays(&out), vec![2.0, 3.0]);
    }

    #[test]
    fn with_all_restores_a_cleared_dimension() {
        let ds = dataset();
        let full = FilterSelection::all(&ds);
        let restored = full.with_none(Dimension::Route).with_all(&ds, Dimension::Route);
        assert_eq!(restored, full);
        assert_eq!(full.selected_count(Dimension::Month), 3);
    }
}
