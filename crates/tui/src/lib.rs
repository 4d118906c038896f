pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod tui;

pub use taskorp_core as core;
pub use taskorp_core::model;

pub use taskorp_core::AppConfig;
