//! Centralized theme and styling for the TUI
//!
//! Single source of truth for the colors, styles and visual constants used by
//! the screens.
//!
//! # Usage
//! ```rust
//! use deploywiz::theme::{Colors, Styles};
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::PRIMARY);
//! let title_style = Styles::title();
//! ```

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    /// Primary dark background
    pub const BG_PRIMARY: Color = Color::Rgb(20, 20, 30);

    /// Error alert background
    pub const BG_DANGER: Color = Color::Rgb(30, 20, 20);

    /// Gauge/progress bar background
    pub const BG_GAUGE: Color = Color::Rgb(40, 40, 50);

    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Secondary/muted text color
    pub const FG_SECONDARY: Color = Color::Gray;

    /// Disabled/inactive text color
    pub const FG_MUTED: Color = Color::DarkGray;

    /// Borders, titles, highlights
    pub const PRIMARY: Color = Color::Cyan;

    /// Selected items, emphasis
    pub const SECONDARY: Color = Color::Yellow;

    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    pub const SELECTED_BG: Color = Color::Yellow;
    pub const SELECTED_FG: Color = Color::Black;

    pub const PROGRESS: Color = Color::Green;
    pub const NAV_HINT: Color = Color::DarkGray;
}

// =============================================================================
// STYLES
// =============================================================================

/// Pre-built styles for common UI elements
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    /// Page and screen titles
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::PRIMARY)
    }

    pub fn panel_bg_danger() -> Style {
        Style::default().bg(Colors::BG_DANGER)
    }

    /// Highlighted list row
    pub fn selected() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// The "(default)" marker next to a choice
    pub fn default_marker() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Colors::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Colors::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn progress() -> Style {
        Style::default().fg(Colors::PROGRESS).bg(Colors::BG_GAUGE)
    }

    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }

    pub fn key_hint() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }
}

// =============================================================================
// CONSTANTS
// =============================================================================

pub struct UiConstants;

impl UiConstants {
    /// Header height including borders
    pub const HEADER_HEIGHT: u16 = 3;

    /// Progress gauge height
    pub const PROGRESS_HEIGHT: u16 = 3;

    /// Footer (key hints) height
    pub const NAV_BAR_HEIGHT: u16 = 1;

    /// Frames shown while a page waits for results
    pub const SPINNER_FRAMES: [&'static str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
}

/// Spinner frame for an animation tick
pub fn spinner_frame(tick: usize) -> &'static str {
    UiConstants::SPINNER_FRAMES[tick % UiConstants::SPINNER_FRAMES.len()]
}
