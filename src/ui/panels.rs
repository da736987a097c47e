use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::Dimension;
use crate::state::AppState;
use crate::view;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel with one multi-select per dimension.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the option lists so we can mutate state inside the loops.
    let airlines: Vec<String> = dataset.airlines.iter().cloned().collect();
    let routes: Vec<String> = dataset.routes.iter().cloned().collect();
    let months: Vec<i64> = dataset.months.iter().copied().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                let n_total = match dim {
                    Dimension::Airline => airlines.len(),
                    Dimension::Route => routes.len(),
                    Dimension::Month => months.len(),
                };
                let n_selected = state.selection.selected_count(dim);
                let header_text = format!("Select {}  ({n_selected}/{n_total})", dim.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(dim == Dimension::Airline)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(dim);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(dim);
                            }
                        });

                        match dim {
                            Dimension::Airline => {
                                for airline in &airlines {
                                    let mut checked = state.selection.airlines.contains(airline);
                                    if ui.checkbox(&mut checked, airline.as_str()).changed() {
                                        state.toggle_airline(airline);
                                    }
                                }
                            }
                            Dimension::Route => {
                                for route in &routes {
                                    let mut checked = state.selection.routes.contains(route);
                                    if ui.checkbox(&mut checked, route.as_str()).changed() {
                                        state.toggle_route(route);
                                    }
                                }
                            }
                            Dimension::Month => {
                                for &month in &months {
                                    let mut checked = state.selection.months.contains(&month);
                                    if ui.checkbox(&mut checked, month.to_string()).changed() {
                                        state.toggle_month(month);
                                    }
                                }
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.view.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export view…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!(
                "{} flights loaded, {} match the filters",
                view.total_records, view.matching_records
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open flight data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Errors are logged and shown in the top bar by `load`.
        let _ = state.load(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(current) = &state.view else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard view")
        .set_file_name("flight-dashboard-view.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match view::export_json(&path, &state.selection, current) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export view: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
