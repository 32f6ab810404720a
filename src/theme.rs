use ratatui::style::Color;

// Fixed MAGI palette. Everything that paints goes through these helpers so
// the palette lives in one place.

pub const ORANGE_RGB: (u8, u8, u8) = (255, 153, 0);
pub const RED_RGB: (u8, u8, u8) = (220, 38, 38);
pub const DARK_RGB: (u8, u8, u8) = (12, 10, 8);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub fn accent() -> Color {
    rgb_to_color(ORANGE_RGB)
}

pub fn alert() -> Color {
    rgb_to_color(RED_RGB)
}

pub fn desktop_bg() -> Color {
    Color::Black
}

pub fn desktop_grid() -> Color {
    Color::Rgb(48, 28, 0)
}

pub fn desktop_grid_alert() -> Color {
    Color::Rgb(70, 10, 10)
}

// Panel / taskbar
pub fn panel_bg() -> Color {
    rgb_to_color(DARK_RGB)
}
pub fn panel_fg() -> Color {
    accent()
}
pub fn panel_active_bg() -> Color {
    accent()
}
pub fn panel_active_fg() -> Color {
    Color::Black
}

pub fn success_fg() -> Color {
    Color::Green
}

// Decorator
pub fn decorator_header_bg() -> Color {
    accent()
}
pub fn decorator_header_fg() -> Color {
    Color::Black
}
pub fn decorator_inactive_header_bg() -> Color {
    Color::Rgb(90, 54, 0)
}
pub fn decorator_border() -> Color {
    accent()
}
pub fn decorator_closing() -> Color {
    alert()
}

pub fn content_bg() -> Color {
    rgb_to_color(DARK_RGB)
}
pub fn content_fg() -> Color {
    accent()
}
pub fn content_dim() -> Color {
    Color::Rgb(140, 84, 0)
}

// Oracle nodes
pub fn scientist() -> Color {
    Color::Green
}
pub fn mother() -> Color {
    accent()
}
pub fn woman() -> Color {
    Color::Blue
}
