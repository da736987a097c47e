use std::path::Path;

use crate::config::DashboardConfig;
use crate::data::filter::{filter_records, Dimension, FilterSelection};
use crate::data::loader::{load_file, LoadError};
use crate::data::model::{FlightDataset, FlightRecord};
use crate::view::{view_of, DashboardView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a load succeeds). Never mutated in place.
    pub dataset: Option<FlightDataset>,

    /// Current sidebar selection.
    pub selection: FilterSelection,

    /// Charts for the current selection, rebuilt on every filter change.
    pub view: Option<DashboardView>,

    /// Fatal load failure; while set and no dataset is loaded, no charts render.
    pub load_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// First matching records, shown in the preview grid.
    pub preview: Vec<FlightRecord>,

    /// Maximum length of `preview`.
    pub preview_rows: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default().preview_rows)
    }
}

impl AppState {
    pub fn new(preview_rows: usize) -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            view: None,
            load_error: None,
            status_message: None,
            preview: Vec::new(),
            preview_rows,
        }
    }

    /// Ingest a newly loaded dataset with every filter value selected.
    pub fn set_dataset(&mut self, dataset: FlightDataset) {
        let selection = FilterSelection::all(&dataset);
        self.dataset = Some(dataset);
        self.load_error = None;
        self.status_message = None;
        self.on_filter_change(selection);
    }

    /// Load a file, keeping any previous dataset if it fails.
    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        match load_file(path) {
            Ok(dataset) => {
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                if self.dataset.is_none() {
                    self.load_error = Some(format!("{e}"));
                }
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Replace the whole selection and recompute every panel from scratch.
    pub fn on_filter_change(&mut self, selection: FilterSelection) {
        self.selection = selection;
        let Some(ds) = &self.dataset else {
            self.view = None;
            self.preview.clear();
            return;
        };

        let matching = filter_records(ds, &self.selection);
        self.preview = matching
            .iter()
            .take(self.preview_rows)
            .map(|&rec| rec.clone())
            .collect();
        self.view = Some(view_of(ds.len(), &matching));
        if let Some(view) = &self.view {
            log::debug!(
                "Filters changed: {} of {} flights match",
                view.matching_records,
                view.total_records
            );
        }
    }

    /// Toggle one airline in the selection.
    pub fn toggle_airline(&mut self, airline: &str) {
        let mut next = self.selection.clone();
        if !next.airlines.remove(airline) {
            next.airlines.insert(airline.to_string());
        }
        self.on_filter_change(next);
    }

    /// Toggle one route in the selection.
    pub fn toggle_route(&mut self, route: &str) {
        let mut next = self.selection.clone();
        if !next.routes.remove(route) {
            next.routes.insert(route.to_string());
        }
        self.on_filter_change(next);
    }

    /// Toggle one month in the selection.
    pub fn toggle_month(&mut self, month: i64) {
        let mut next = self.selection.clone();
        if !next.months.remove(&month) {
            next.months.insert(month);
        }
        self.on_filter_change(next);
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(ds) = &self.dataset {
            let next = self.selection.with_all(ds, dim);
            self.on_filter_change(next);
        }
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        let next = self.selection.with_none(dim);
        self.on_filter_change(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::Aggregation;
    use crate::data::model::{FlightRecord, GroupKey};

    fn loaded() -> AppState {
        let rec = |airline: &str, month: i64, arr_delay: f64| FlightRecord {
            airline: airline.into(),
            route: "JFK-LAX".into(),
            origin: "JFK".into(),
            month,
            arr_delay,
            ..Default::default()
        };
        let mut state = AppState::default();
        state.set_dataset(FlightDataset::from_records(vec![
            rec("AA", 1, 10.0),
            rec("UA", 2, 20.0),
        ]));
        state
    }

    fn matching(state: &AppState) -> usize {
        state.view.as_ref().map_or(0, |v| v.matching_records)
    }

    #[test]
    fn new_dataset_selects_everything() {
        let state = loaded();
        assert_eq!(matching(&state), 2);
        assert_eq!(state.selection.airlines.len(), 2);
    }

    #[test]
    fn toggling_recomputes_the_view() {
        let mut state = loaded();
        state.toggle_airline("UA");
        assert_eq!(matching(&state), 1);
        let panel = state
            .view
            .as_ref()
            .and_then(|v| v.panel(Aggregation::AirlineAvgDelay))
            .unwrap();
        assert_eq!(panel.points[0].key, GroupKey::Text("AA".into()));

        state.toggle_airline("UA");
        assert_eq!(matching(&state), 2);
    }

    #[test]
    fn preview_is_capped_and_follows_filters() {
        let mut state = loaded();
        state.preview_rows = 1;
        state.select_all(Dimension::Airline);
        assert_eq!(state.preview.len(), 1);
        assert_eq!(state.preview[0].airline, "AA");
        state.toggle_airline("AA");
        assert_eq!(state.preview[0].airline, "UA");
    }

    #[test]
    fn view_and_preview_come_from_the_same_filter_pass() {
        let mut state = loaded();
        state.toggle_month(1);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.matching_records, state.preview.len());
        assert_eq!(*view, crate::view::build_view(state.dataset.as_ref().unwrap(), &state.selection));
        assert_eq!(state.preview[0].airline, "UA");
    }

    #[test]
    fn select_none_then_all() {
        let mut state = loaded();
        state.select_none(Dimension::Month);
        assert_eq!(matching(&state), 0);
        state.toggle_month(2);
        assert_eq!(matching(&state), 1);
        state.select_all(Dimension::Month);
        assert_eq!(matching(&state), 2);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = loaded();
        assert!(state.load(Path::new("/no/such/flights.csv")).is_err());
        assert!(state.dataset.is_some());
        assert!(state.load_error.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn failed_first_load_is_fatal_for_rendering() {
        let mut state = AppState::default();
        assert!(state.load(Path::new("/no/such/flights.csv")).is_err());
        assert!(state.view.is_none());
        assert!(state.load_error.is_some());
    }
}
