//! Configuration and data model shared by the widget and its backends

pub mod config;
pub mod models;
pub mod store;
