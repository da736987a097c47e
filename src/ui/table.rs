use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::FlightRecord;

const HEADERS: [&str; 8] = [
    "Airline",
    "Route",
    "Origin",
    "Month",
    "ArrDelay",
    "DepDelay",
    "Cancelled",
    "CancellationCode",
];

/// Grid of the first matching flights.
pub fn records_table(ui: &mut Ui, records: &[FlightRecord], matching: usize) {
    ui.label(format!("Showing {} of {matching} matching flights", records.len()));

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(60.0), HEADERS.len())
        .header(20.0, |mut header| {
            for name in HEADERS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let rec = &records[row.index()];
                let cells = [
                    rec.airline.clone(),
                    rec.route.clone(),
                    rec.origin.clone(),
                    rec.month.to_string(),
                    format!("{:.1}", rec.arr_delay),
                    format!("{:.1}", rec.dep_delay),
                    format!("{}", rec.cancelled),
                    rec.cancellation_code.clone(),
                ];
                for text in cells {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}
