//! UI layer for desktop GUI: app shell and layout primitives.

pub mod app;
pub mod layout;

pub use app::DesktopGuiApp;
