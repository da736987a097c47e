//! Interactive flight delay and cancellation dashboard.
//!
//! The data layer (`data`, `view`) is pure and UI-independent; `state`,
//! `ui` and `app` wire it into an eframe window.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
pub mod view;
