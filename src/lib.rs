//! Attendance tracking over a single JSON file: employee self-service
//! check-in/check-out and administrative record management.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod models;
pub mod state;
pub mod store;
pub mod utils;
