use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub identifier: Color,
    pub terminal: Color,
    pub special: Color,
    pub number: Color,
    pub operator: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub rule_name: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    identifier: Color::Rgb(148, 226, 213),     // Cyan/teal for rule references
    terminal: Color::Rgb(166, 227, 161),       // Green for quoted literals
    special: Color::Rgb(245, 194, 231),        // Pink for ? ... ?
    number: Color::Rgb(250, 179, 135),         // Orange for counts
    operator: Color::Rgb(137, 180, 250),       // Blue for | , - * and brackets
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for selected rule
    rule_name: Color::Rgb(249, 226, 175),      // Yellow for rule definitions
};
