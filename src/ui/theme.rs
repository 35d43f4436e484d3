//! # Theme System
//!
//! Colors for the terminal rendition of the portfolio page. Rendering code
//! references [`Theme`] fields instead of hardcoding `ratatui` colors; the
//! active theme is picked by name from the config file.
//!
//! ## Built-in Themes
//!
//! - **Catppuccin Mocha** (default)
//! - **Catppuccin Macchiato**
//! - **Dracula**
//! - **Nord**

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Name matched against `Config::theme`.
    pub name: &'static str,

    /// Page background.
    pub bg: Color,
    /// Raised surfaces: terminal panel, sidebar, friend card.
    pub surface: Color,
    /// Background of a hovered terminal line.
    pub hover_bg: Color,

    pub fg: Color,
    /// Secondary text: section bodies, the friend quote, hints.
    pub fg_dim: Color,

    /// Links, headings, the active menu button.
    pub accent: Color,
    /// The `@` between a friend's name and handle.
    pub secondary: Color,

    // -- Window controls --
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
}

impl Theme {
    /// Return the list of all built-in themes.
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Return the default theme (Catppuccin Mocha).
    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }

    /// Theme named `name`, or the default when there is none.
    pub fn by_name_or_default(name: &str) -> &'static Theme {
        Self::by_name(name).unwrap_or_else(Self::default_theme)
    }
}

static BUILT_IN_THEMES: [Theme; 4] = [
    // 0 - Catppuccin Mocha (default)
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),         // base
        surface: Color::Rgb(49, 50, 68),    // surface0
        hover_bg: Color::Rgb(69, 71, 90),   // surface1
        fg: Color::Rgb(205, 214, 244),      // text
        fg_dim: Color::Rgb(108, 112, 134),  // overlay0
        accent: Color::Rgb(137, 180, 250),  // blue
        secondary: Color::Rgb(203, 166, 247), // mauve
        red: Color::Rgb(243, 139, 168),
        yellow: Color::Rgb(249, 226, 175),
        green: Color::Rgb(166, 227, 161),
    },
    // 1 - Catppuccin Macchiato
    Theme {
        name: "Catppuccin Macchiato",
        bg: Color::Rgb(36, 39, 58),
        surface: Color::Rgb(54, 58, 79),
        hover_bg: Color::Rgb(73, 77, 100),
        fg: Color::Rgb(202, 211, 245),
        fg_dim: Color::Rgb(110, 115, 141),
        accent: Color::Rgb(138, 173, 244),
        secondary: Color::Rgb(198, 160, 246),
        red: Color::Rgb(237, 135, 150),
        yellow: Color::Rgb(238, 212, 159),
        green: Color::Rgb(166, 218, 149),
    },
    // 2 - Dracula
    Theme {
        name: "Dracula",
        bg: Color::Rgb(40, 42, 54),
        surface: Color::Rgb(68, 71, 90),
        hover_bg: Color::Rgb(98, 114, 164),
        fg: Color::Rgb(248, 248, 242),
        fg_dim: Color::Rgb(98, 114, 164),
        accent: Color::Rgb(139, 233, 253),
        secondary: Color::Rgb(255, 121, 198),
        red: Color::Rgb(255, 85, 85),
        yellow: Color::Rgb(241, 250, 140),
        green: Color::Rgb(80, 250, 123),
    },
    // 3 - Nord
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        surface: Color::Rgb(59, 66, 82),
        hover_bg: Color::Rgb(67, 76, 94),
        fg: Color::Rgb(216, 222, 233),
        fg_dim: Color::Rgb(76, 86, 106),
        accent: Color::Rgb(136, 192, 208),
        secondary: Color::Rgb(180, 142, 173),
        red: Color::Rgb(191, 97, 106),
        yellow: Color::Rgb(235, 203, 139),
        green: Color::Rgb(163, 190, 140),
    },
];
