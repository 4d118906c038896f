pub use taskorp_tui::cli;
pub use taskorp_tui::commands;
pub use taskorp_tui::config;
pub use taskorp_tui::logging;
pub use taskorp_tui::tui;
pub use taskorp_tui::AppConfig;

pub use taskorp_core as core;
pub use taskorp_core::model;
pub use taskorp_core::session;
pub use taskorp_core::storage;
