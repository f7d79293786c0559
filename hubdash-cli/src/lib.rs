// Library exports for the hubdash CLI
// This allows testing of internal modules

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod ui;
