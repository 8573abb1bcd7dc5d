pub mod app;
pub mod auth;
pub mod config;
pub mod content;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod films;
pub mod memory;
pub mod session;
pub mod state;
pub mod views;
