pub mod app;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod files;
pub mod notes;
pub mod notifications;
pub mod pagination;
pub mod state;
