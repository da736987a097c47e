use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::data::aggregate::{Aggregation, SeriesPoint};
use crate::data::filter::{filter_records, FilterSelection};
use crate::data::model::{FlightDataset, FlightRecord};

// ---------------------------------------------------------------------------
// View model: everything the charts need for one interaction
// ---------------------------------------------------------------------------

/// One chart panel: which aggregation feeds it and the resulting series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub aggregation: Aggregation,
    pub title: &'static str,
    pub points: Vec<SeriesPoint>,
}

/// The dashboard contents for a given selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub total_records: usize,
    pub matching_records: usize,
    pub panels: Vec<ChartPanel>,
}

impl DashboardView {
    pub fn panel(&self, aggregation: Aggregation) -> Option<&ChartPanel> {
        self.panels.iter().find(|p| p.aggregation == aggregation)
    }
}

/// Filter the dataset and run every aggregation, in panel order.
///
/// Pure: the dataset is only borrowed and nothing is cached between calls.
pub fn build_view(dataset: &FlightDataset, selection: &FilterSelection) -> DashboardView {
    view_of(dataset.len(), &filter_records(dataset, selection))
}

/// Run every aggregation over an already filtered view.
pub fn view_of(total_records: usize, matching: &[&FlightRecord]) -> DashboardView {
    let panels = Aggregation::ALL
        .into_iter()
        .map(|aggregation| ChartPanel {
            aggregation,
            title: aggregation.title(),
            points: aggregation.run(matching),
        })
        .collect();

    DashboardView {
        total_records,
        matching_records: matching.len(),
        panels,
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("serializing view: {0}")]
    Json(#[from] serde_json::Error),
    #[error("writing {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    selection: &'a FilterSelection,
    view: &'a DashboardView,
}

/// Serialise the selection and its view as pretty JSON.
pub fn to_json(selection: &FilterSelection, view: &DashboardView) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&ExportDocument { selection, view })?)
}

/// Write [`to_json`] output to a file.
pub fn export_json(
    path: &Path,
    selection: &FilterSelection,
    view: &DashboardView,
) -> Result<(), ExportError> {
    let text = to_json(selection, view)?;
    std::fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Exported dashboard view to {}", path.display());
    Ok(())
}
