//! Fixed metrics for the single-column sign-in screen.

pub const PADDING: f32 = 16.0;
pub const HEADER_HEIGHT: f32 = 80.0;
pub const FIELD_HEIGHT: f32 = 40.0;
pub const FIELD_CORNER_RADIUS: u8 = 8;
pub const FIELD_TEXT_INSET: i8 = 5;
pub const BUTTON_SIZE: [f32; 2] = [150.0, 50.0];
pub const BUTTON_CORNER_RADIUS: u8 = 10;
pub const HEADER_FONT_SIZE: f32 = 24.0;
pub const MAX_CONTENT_WIDTH: f32 = 480.0;

/// Content width inside the side padding, capped for wide windows.
pub fn content_width(available: f32) -> f32 {
    (available - 2.0 * PADDING).clamp(0.0, MAX_CONTENT_WIDTH)
}
