pub mod tui;

pub use tui::create_spinner;
