//! Color scheme and styles.
//!
//! The roles mirror the original panel's palette: amber selected rows, light
//! blue related rows, tinted cells for nested and binary values, and the
//! accented `version` column.

use ratatui::style::{Color, Modifier, Style};

/// Role palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;

    pub const HEADER_BG: Color = Color::Blue;
    pub const HEADER_FG: Color = Color::White;

    // Row highlights
    pub const SELECTED_BG: Color = Color::Yellow;
    pub const SELECTED_FG: Color = Color::Black;
    pub const RELATED_BG: Color = Color::Cyan;
    pub const RELATED_FG: Color = Color::Black;

    // Cell roles
    pub const EXPANDABLE: Color = Color::Green;
    pub const BINARY: Color = Color::LightYellow;
    pub const THUMBNAIL: Color = Color::LightBlue;
    pub const VERSION_ACCENT: Color = Color::Green;
    pub const WARNING: Color = Color::Red;

    // Tabs
    pub const TAB_ACTIVE: Color = Color::Cyan;
    pub const TAB_INACTIVE: Color = Color::DarkGray;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header style.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Section title style.
    pub fn section_title() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    /// Row selected by the user.
    pub fn selected_row() -> Style {
        Style::default().fg(Theme::SELECTED_FG).bg(Theme::SELECTED_BG)
    }

    /// Row sharing the selected relation value.
    pub fn related_row() -> Style {
        Style::default().fg(Theme::RELATED_FG).bg(Theme::RELATED_BG)
    }

    /// Keyboard focus marker, on top of row highlights.
    pub fn focused() -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    /// Collapsed/expanded array and object cells.
    pub fn expandable() -> Style {
        Style::default().fg(Theme::EXPANDABLE)
    }

    /// Binary caption cells.
    pub fn binary() -> Style {
        Style::default().fg(Theme::BINARY)
    }

    /// Thumbnail caption cells.
    pub fn thumbnail() -> Style {
        Style::default().fg(Theme::THUMBNAIL)
    }

    /// The accented `version` column.
    pub fn version_accent() -> Style {
        Style::default()
            .fg(Theme::VERSION_ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Negative numbers and error notes.
    pub fn warning() -> Style {
        Style::default().fg(Theme::WARNING).add_modifier(Modifier::BOLD)
    }

    /// Active tab style.
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Theme::TAB_ACTIVE)
            .add_modifier(Modifier::BOLD)
    }

    /// Inactive tab style.
    pub fn tab_inactive() -> Style {
        Style::default().fg(Theme::TAB_INACTIVE)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Help line style.
    pub fn help() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Highlighted keys in the help line.
    pub fn help_key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }
}
