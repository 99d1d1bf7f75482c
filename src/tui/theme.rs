//! Theme definitions for the TUI.

use crate::lock::LockState;
use ratatui::style::Color;

/// A color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Theme name
    pub name: &'static str,

    // Base colors
    /// Background color
    pub bg: Color,
    /// Foreground (text) color
    pub fg: Color,

    // Lock colors
    /// Icon color while locked
    pub locked: Color,
    /// Icon color after a correct PIN
    pub unlocked: Color,
    /// Icon color after a wrong PIN
    pub wrong: Color,

    // UI element colors
    /// Border color
    pub border: Color,
    /// Selection/highlight color
    pub selection: Color,
    /// Disabled or secondary elements
    pub inactive: Color,
    /// Accent color for titles and the last pressed key
    pub accent: Color,
}

impl Theme {
    /// Dark theme (default)
    pub const fn dark() -> Self {
        Self {
            name: "dark",
            bg: Color::Rgb(30, 30, 46),
            fg: Color::Rgb(205, 214, 244),
            locked: Color::Rgb(249, 226, 175),
            unlocked: Color::Rgb(166, 227, 161),
            wrong: Color::Rgb(243, 139, 168),
            border: Color::Rgb(88, 91, 112),
            selection: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(108, 112, 134),
            accent: Color::Rgb(203, 166, 247),
        }
    }

    /// Light theme
    pub const fn light() -> Self {
        Self {
            name: "light",
            bg: Color::Rgb(239, 241, 245),
            fg: Color::Rgb(76, 79, 105),
            locked: Color::Rgb(223, 142, 29),
            unlocked: Color::Rgb(64, 160, 43),
            wrong: Color::Rgb(210, 15, 57),
            border: Color::Rgb(172, 176, 190),
            selection: Color::Rgb(204, 208, 218),
            inactive: Color::Rgb(140, 143, 161),
            accent: Color::Rgb(136, 57, 239),
        }
    }

    /// Solarized Dark theme
    pub const fn solarized_dark() -> Self {
        Self {
            name: "solarized",
            bg: Color::Rgb(0, 43, 54),
            fg: Color::Rgb(131, 148, 150),
            locked: Color::Rgb(181, 137, 0),
            unlocked: Color::Rgb(133, 153, 0),
            wrong: Color::Rgb(220, 50, 47),
            border: Color::Rgb(88, 110, 117),
            selection: Color::Rgb(7, 54, 66),
            inactive: Color::Rgb(101, 123, 131),
            accent: Color::Rgb(108, 113, 196),
        }
    }

    /// Dracula theme
    pub const fn dracula() -> Self {
        Self {
            name: "dracula",
            bg: Color::Rgb(40, 42, 54),
            fg: Color::Rgb(248, 248, 242),
            locked: Color::Rgb(241, 250, 140),
            unlocked: Color::Rgb(80, 250, 123),
            wrong: Color::Rgb(255, 85, 85),
            border: Color::Rgb(68, 71, 90),
            selection: Color::Rgb(68, 71, 90),
            inactive: Color::Rgb(98, 114, 164),
            accent: Color::Rgb(189, 147, 249),
        }
    }

    /// Nord theme
    pub const fn nord() -> Self {
        Self {
            name: "nord",
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(216, 222, 233),
            locked: Color::Rgb(235, 203, 139),
            unlocked: Color::Rgb(163, 190, 140),
            wrong: Color::Rgb(191, 97, 106),
            border: Color::Rgb(76, 86, 106),
            selection: Color::Rgb(67, 76, 94),
            inactive: Color::Rgb(107, 112, 137),
            accent: Color::Rgb(180, 142, 173),
        }
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        THEMES.iter().find(|t| t.name == name)
    }

    /// Icon color for a lock state.
    pub fn lock_color(&self, state: LockState) -> Color {
        match state {
            LockState::Locked => self.locked,
            LockState::Unlocked => self.unlocked,
            LockState::Wrong => self.wrong,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Available themes
pub static THEMES: &[Theme] = &[
    Theme::dark(),
    Theme::light(),
    Theme::solarized_dark(),
    Theme::dracula(),
    Theme::nord(),
];
