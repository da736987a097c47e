use anyhow::Context;
use eframe::egui;

use flight_dashboard::app::FlightDashboardApp;
use flight_dashboard::config::DashboardConfig;
use flight_dashboard::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env().context("loading dashboard config")?;
    log::info!("Using flight data at {}", config.data_path.display());

    // A failed load is kept in the state and shown in place of the charts.
    let mut state = AppState::new(config.preview_rows);
    let _ = state.load(&config.data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Flight Analysis Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(FlightDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
