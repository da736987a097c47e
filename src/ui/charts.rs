use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use crate::color::panel_colors;
use crate::data::aggregate::{Aggregation, ChartKind};
use crate::state::AppState;
use crate::view::ChartPanel;

const PANEL_HEIGHT: f32 = 280.0;

/// Dashboard sections, each a row of two panels.
const SECTIONS: [(&str, [Aggregation; 2]); 4] = [
    (
        "Top Routes Analysis",
        [Aggregation::TopRoutesByDelay, Aggregation::TopRoutesByVolume],
    ),
    (
        "Airline Analysis",
        [Aggregation::AirlineAvgDelay, Aggregation::AirlineVolume],
    ),
    (
        "Airport Analysis",
        [Aggregation::TopAirportsByDelay, Aggregation::TopAirportsByVolume],
    ),
    (
        "Cancellation Analysis",
        [
            Aggregation::MonthlyCancellations,
            Aggregation::CancellationReasonShare,
        ],
    ),
];

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render the eight chart panels in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| match &state.load_error {
            Some(err) => {
                ui.heading(
                    egui::RichText::new(format!("Could not load flight data: {err}"))
                        .color(Color32::RED),
                );
            }
            None => {
                ui.heading("Open a file to view flights  (File → Open…)");
            }
        });
        return;
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("✈ Flight Analysis Dashboard");
            ui.label("Interactive dashboard for flight delay and cancellation analysis");
            ui.add_space(8.0);

            for (section, aggregations) in SECTIONS {
                ui.strong(section);
                ui.separator();
                ui.columns(2, |cols: &mut [Ui]| {
                    for (col, agg) in cols.iter_mut().zip(aggregations) {
                        if let Some(panel) = view.panel(agg) {
                            chart_panel(col, panel);
                        }
                    }
                });
                ui.add_space(12.0);
            }

            egui::CollapsingHeader::new("Filtered flights")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    super::table::records_table(ui, &state.preview, view.matching_records);
                });
        });
}

/// One titled chart, or a placeholder when the series is empty.
pub fn chart_panel(ui: &mut Ui, panel: &ChartPanel) {
    ui.label(egui::RichText::new(panel.title).strong());

    if panel.points.is_empty() {
        ui.allocate_ui(egui::vec2(ui.available_width(), PANEL_HEIGHT), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.weak("No data for the current filters");
            });
        });
        return;
    }

    match panel.aggregation.chart_kind() {
        ChartKind::HorizontalBars => bar_plot(ui, panel, true),
        ChartKind::VerticalBars => bar_plot(ui, panel, false),
        ChartKind::Line => line_plot(ui, panel),
        ChartKind::Pie => pie_chart(ui, panel),
    }
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// Map a grid mark back to a category label when it sits on a bar.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn bar_plot(ui: &mut Ui, panel: &ChartPanel, horizontal: bool) {
    let agg = panel.aggregation;
    let n = panel.points.len();
    let colors = panel_colors(agg, n);

    // Horizontal charts list the largest entry at the top.
    let position = |i: usize| if horizontal { (n - 1 - i) as f64 } else { i as f64 };

    let mut labels = vec![String::new(); n];
    let bars: Vec<Bar> = panel
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            labels[position(i) as usize] = p.key.to_string();
            Bar::new(position(i), p.value)
                .name(p.key.to_string())
                .fill(colors[i])
                .width(0.7)
        })
        .collect();

    let mut chart = BarChart::new(bars).name(agg.value_label());
    if horizontal {
        chart = chart.horizontal();
    }

    let mut plot = Plot::new(format!("{agg:?}"))
        .height(PANEL_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false);

    let axis_labels = move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
        category_label(&labels, mark.value)
    };
    if horizontal {
        plot = plot
            .x_axis_label(agg.value_label())
            .y_axis_label(agg.key_label())
            .y_axis_formatter(axis_labels);
    } else {
        plot = plot
            .x_axis_label(agg.key_label())
            .y_axis_label(agg.value_label())
            .x_axis_formatter(axis_labels);
    }

    plot.show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

fn line_plot(ui: &mut Ui, panel: &ChartPanel) {
    let agg = panel.aggregation;
    let color = panel_colors(agg, 1)[0];
    let coords: Vec<[f64; 2]> = panel
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| [p.key.as_f64().unwrap_or(i as f64), p.value])
        .collect();

    Plot::new(format!("{agg:?}"))
        .height(PANEL_HEIGHT)
        .x_axis_label(agg.key_label())
        .y_axis_label(agg.value_label())
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name(agg.value_label())
                    .color(color)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .color(color)
                    .radius(4.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

/// Slices start at 140° and run counter-clockwise.
const PIE_START_DEG: f32 = 140.0;

fn pie_chart(ui: &mut Ui, panel: &ChartPanel) {
    let colors = panel_colors(panel.aggregation, panel.points.len());
    let (response, painter) =
        ui.allocate_painter(egui::vec2(ui.available_width(), PANEL_HEIGHT), Sense::hover());
    let rect = response.rect;

    let radius = (rect.height() * 0.45).min(rect.width() * 0.3);
    let center = Pos2::new(rect.left() + radius + 16.0, rect.center().y);
    let at = |angle: f32, r: f32| Pos2::new(center.x + r * angle.cos(), center.y - r * angle.sin());

    let total: f64 = panel.points.iter().map(|p| p.value).sum();
    let mut start = PIE_START_DEG.to_radians();

    for (i, point) in panel.points.iter().enumerate() {
        let sweep = (point.value / total) as f32 * TAU;

        // Fan of thin triangles so that slices over 180° stay convex.
        let steps = ((sweep / 0.05).ceil() as usize).max(1);
        for s in 0..steps {
            let a0 = start + sweep * s as f32 / steps as f32;
            let a1 = start + sweep * (s + 1) as f32 / steps as f32;
            // Clockwise on screen, as the tessellator expects.
            painter.add(Shape::convex_polygon(
                vec![center, at(a1, radius), at(a0, radius)],
                colors[i],
                Stroke::NONE,
            ));
        }

        let mid = start + sweep / 2.0;
        painter.text(
            at(mid, radius * 0.65),
            Align2::CENTER_CENTER,
            format!("{:.1}%", point.value),
            FontId::proportional(12.0),
            Color32::BLACK,
        );
        start += sweep;
    }

    // Legend to the right of the pie.
    let legend_x = center.x + radius + 24.0;
    for (i, point) in panel.points.iter().enumerate() {
        let y = rect.top() + 16.0 + i as f32 * 18.0;
        painter.rect_filled(
            egui::Rect::from_min_size(Pos2::new(legend_x, y - 6.0), egui::vec2(12.0, 12.0)),
            2.0,
            colors[i],
        );
        painter.text(
            Pos2::new(legend_x + 18.0, y),
            Align2::LEFT_CENTER,
            format!("{}  {:.1}%", point.key, point.value),
            FontId::proportional(13.0),
            ui.visuals().text_color(),
        );
    }
}
