//! Wine-cellar inventory API: per-user bottle records over SQLite, served
//! with axum and guarded by bearer tokens.

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
