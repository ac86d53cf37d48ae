//! Tab strip colour themes
//!
//! A theme colours the parts the container draws itself: tab titles, the
//! separator line, the selection indicator and the strip background. Page
//! content is rendered by the content units and is not themed here.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Complete theme definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Theme {
    /// Theme display name
    pub name: String,
    /// Strip palette
    pub colors: StripColors,
    /// Draw the selected title in bold
    #[serde(default = "default_bold")]
    pub bold_selected: bool,
}

fn default_bold() -> bool {
    true
}

/// Colours for the tab strip and its decorations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StripColors {
    /// Strip and header background
    #[serde(with = "color_serde")]
    pub background: Color,
    /// Title of the selected tab
    #[serde(with = "color_serde")]
    pub selected_title: Color,
    /// Titles of the other tabs
    #[serde(with = "color_serde")]
    pub unselected_title: Color,
    /// Separator line under the strip
    #[serde(with = "color_serde")]
    pub separator: Color,
    /// Selection indicator sliding along the separator
    #[serde(with = "color_serde")]
    pub indicator: Color,
}

/// Colours are stored as strings ratatui understands: names such as
/// `"lightblue"`, hex such as `"#1e1e2e"`, or a palette index such as `"8"`.
mod color_serde {
    use ratatui::style::Color;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(color)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Color::from_str(raw.trim())
            .map_err(|_| serde::de::Error::custom(format!("unknown color: {}", raw)))
    }
}

impl Theme {
    /// Dark theme, used by default
    pub fn dark() -> Self {
        Theme {
            name: "Dark".to_string(),
            colors: StripColors {
                background: Color::Rgb(30, 30, 46),
                selected_title: Color::Rgb(205, 214, 244),
                unselected_title: Color::Rgb(127, 132, 156),
                separator: Color::Rgb(69, 71, 90),
                indicator: Color::Rgb(137, 180, 250),
            },
            bold_selected: true,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Theme {
            name: "Light".to_string(),
            colors: StripColors {
                background: Color::Rgb(239, 241, 245),
                selected_title: Color::Rgb(76, 79, 105),
                unselected_title: Color::Rgb(140, 143, 161),
                separator: Color::Rgb(0, 0, 0),
                indicator: Color::Rgb(30, 102, 245),
            },
            bold_selected: true,
        }
    }

    /// Looks up a built-in theme by case-insensitive name
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::dark()),
            "light" => Some(Theme::light()),
            _ => None,
        }
    }

    /// Style for a tab title
    pub fn title_style(&self, selected: bool) -> Style {
        let base = Style::default().bg(self.colors.background);
        if selected {
            let style = base.fg(self.colors.selected_title);
            if self.bold_selected {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            }
        } else {
            base.fg(self.colors.unselected_title)
        }
    }

    pub fn separator_style(&self) -> Style {
        Style::default().fg(self.colors.separator).bg(self.colors.background)
    }

    pub fn indicator_style(&self) -> Style {
        Style::default().fg(self.colors.indicator).bg(self.colors.background)
    }

    pub fn background_style(&self) -> Style {
        Style::default().bg(self.colors.background)
    }

    /// Parses a theme from TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML string is malformed or contains invalid values.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serializes the theme to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default_is_dark() {
        assert_eq!(Theme::default().name, "Dark");
    }

    #[test]
    fn test_by_name() {
        assert_eq!(Theme::by_name("LIGHT"), Some(Theme::light()));
        assert_eq!(Theme::by_name("dark"), Some(Theme::dark()));
        assert_eq!(Theme::by_name("solarized"), None);
    }

    #[test]
    fn test_theme_toml_roundtrip() {
        for original in [Theme::dark(), Theme::light()] {
            let toml_str = original.to_toml().expect("serialization should work");
            let parsed = Theme::from_toml(&toml_str).expect("parsing should work");
            assert_eq!(original, parsed);
        }
    }

    #[test]
    fn test_named_and_hex_colors() {
        let toml_str = r##"
            name = "Plain"

            [colors]
            background = "black"
            selected_title = "white"
            unselected_title = "darkgray"
            separator = "#444444"
            indicator = "lightblue"
        "##;
        let theme = Theme::from_toml(toml_str).expect("should parse colors");
        assert_eq!(theme.colors.background, Color::Black);
        assert_eq!(theme.colors.unselected_title, Color::DarkGray);
        assert_eq!(theme.colors.separator, Color::Rgb(0x44, 0x44, 0x44));
        assert_eq!(theme.colors.indicator, Color::LightBlue);
        assert!(theme.bold_selected);
    }

    #[test]
    fn test_unknown_color_rejected() {
        let toml_str = r##"
            name = "Broken"

            [colors]
            background = "not-a-colour"
            selected_title = "white"
            unselected_title = "gray"
            separator = "gray"
            indicator = "blue"
        "##;
        assert!(Theme::from_toml(toml_str).is_err());
    }

    #[test]
    fn test_title_styles_differ_by_selection() {
        let theme = Theme::dark();
        let selected = theme.title_style(true);
        let unselected = theme.title_style(false);
        assert_eq!(selected.fg, Some(theme.colors.selected_title));
        assert!(selected.add_modifier.contains(Modifier::BOLD));
        assert_eq!(unselected.fg, Some(theme.colors.unselected_title));
        assert!(!unselected.add_modifier.contains(Modifier::BOLD));
    }
}
