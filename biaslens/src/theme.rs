//! Color theme system for biaslens.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! biaslens renders. Two built-in themes are provided:
//!
//! - `dark`: ANSI 16 colors only, so it works on any terminal including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha`: Catppuccin Mocha palette in RGB; requires truecolor.
//!
//! Severity colors follow one scale everywhere: highlight backgrounds in the
//! answer, ordinal badges, analysis panel badges and the distribution bars.

use biaslens_core::{IssueType, Severity};
use ratatui::style::Color;
use tracing::warn;

/// All color values used across biaslens's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Answer text
    pub text: Color,
    /// Secondary text: timestamps, hints, placeholders.
    pub text_muted: Color,
    pub heading: Color,
    pub code: Color,
    pub link: Color,

    // Highlight backgrounds, one per severity
    pub highlight_low: Color,
    pub highlight_medium: Color,
    pub highlight_high: Color,
    /// Foreground drawn on top of a highlight background.
    pub highlight_fg: Color,

    // Issue-type accents for the breakdown bars and panel badges
    pub issue_assumption: Color,
    pub issue_bias: Color,
    pub issue_missing_perspective: Color,
    pub issue_power_dynamic: Color,
    pub issue_language: Color,
    pub issue_information_asymmetry: Color,

    // Turn states
    pub turn_loading: Color,
    pub turn_complete: Color,
    pub turn_error: Color,
    /// Positive aspects section in the summary panel.
    pub positive: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Mode indicator color when in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color when in INSERT mode.
    pub status_mode_insert: Color,
    /// Mode indicator color while the API-key form is shown.
    pub status_mode_setup: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    ///
    /// Works on all terminals: 16-color, 256-color, and truecolor. Suitable
    /// as the default when no config is present or color capability is unknown.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            text: Color::Reset,
            text_muted: Color::DarkGray,
            heading: Color::Cyan,
            code: Color::Green,
            link: Color::Blue,

            highlight_low: Color::Blue,
            highlight_medium: Color::Yellow,
            highlight_high: Color::Red,
            highlight_fg: Color::Black,

            issue_assumption: Color::Magenta,
            issue_bias: Color::LightRed,
            issue_missing_perspective: Color::Cyan,
            issue_power_dynamic: Color::Blue,
            issue_language: Color::LightMagenta,
            issue_information_asymmetry: Color::LightCyan,

            turn_loading: Color::Yellow,
            turn_complete: Color::Green,
            turn_error: Color::Red,
            positive: Color::Green,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_mode_setup: Color::Yellow,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        // Catppuccin Mocha palette (selected subset)
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let blue = Color::Rgb(137, 180, 250);     // #89b4fa
        let teal = Color::Rgb(148, 226, 213);     // #94e2d5
        let sky = Color::Rgb(137, 220, 235);      // #89dceb
        let mauve = Color::Rgb(203, 166, 247);    // #cba6f7
        let pink = Color::Rgb(245, 194, 231);     // #f5c2e7
        let peach = Color::Rgb(250, 179, 135);    // #fab387
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let base = Color::Rgb(30, 30, 46);        // #1e1e2e
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            text,
            text_muted: overlay1,
            heading: lavender,
            code: green,
            link: blue,

            highlight_low: blue,
            highlight_medium: yellow,
            highlight_high: red,
            highlight_fg: base,

            issue_assumption: mauve,
            issue_bias: peach,
            issue_missing_perspective: teal,
            issue_power_dynamic: lavender,
            issue_language: pink,
            issue_information_asymmetry: sky,

            turn_loading: yellow,
            turn_complete: green,
            turn_error: red,
            positive: green,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            status_mode_setup: peach,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup.
    ///
    /// # Arguments
    ///
    /// * `name`: theme name from config, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    /// Highlight background for a severity.
    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Low => self.highlight_low,
            Severity::Medium => self.highlight_medium,
            Severity::High => self.highlight_high,
        }
    }

    /// Accent color for an issue category.
    pub fn issue(&self, issue: IssueType) -> Color {
        match issue {
            IssueType::Assumption => self.issue_assumption,
            IssueType::Bias => self.issue_bias,
            IssueType::MissingPerspective => self.issue_missing_perspective,
            IssueType::PowerDynamic => self.issue_power_dynamic,
            IssueType::Language => self.issue_language,
            IssueType::InformationAsymmetry => self.issue_information_asymmetry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_dark() {
        assert_eq!(Theme::from_name("solarized").border_active, Theme::dark().border_active);
        assert_eq!(
            Theme::from_name("catppuccin-mocha").border_active,
            Theme::catppuccin_mocha().border_active
        );
    }

    #[test]
    fn severities_use_distinct_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.severity(Severity::Low), Color::Blue);
        assert_eq!(theme.severity(Severity::Medium), Color::Yellow);
        assert_eq!(theme.severity(Severity::High), Color::Red);
    }
}
