//! egui front end for the partner portal: the dashboard, the users list,
//! assigned assessments, notes and the assign-assessment modal.

#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod layout;
pub mod pages;
pub mod tasks;
pub mod widgets;

pub use app::PortalApp;
