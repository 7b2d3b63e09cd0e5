use crossterm::style::{Color as CrosstermColor, Stylize};
use ratatui::style::{Color as RatatuiColor, Modifier, Style as RatatuiStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Picker chrome
    pub accent: ColorPair,
    pub header: ColorPair,
    pub border: ColorPair,

    // Cell states
    pub selected: ColorPair,
    pub current: ColorPair,
    pub cursor: ColorPair,
    pub disallowed: ColorPair,
    pub weekend: ColorPair,

    // Text
    pub normal_text: ColorPair,
    pub help_text: ColorPair,
}

#[derive(Debug, Clone)]
pub struct ColorPair {
    pub fg: CrosstermColor,
    pub bg: Option<CrosstermColor>,
}

impl ColorPair {
    pub fn new(fg: CrosstermColor) -> Self {
        Self { fg, bg: None }
    }

    pub fn with_bg(fg: CrosstermColor, bg: CrosstermColor) -> Self {
        Self { fg, bg: Some(bg) }
    }

    /// Convert to ratatui style
    pub fn to_ratatui(&self) -> RatatuiStyle {
        let mut style = RatatuiStyle::default().fg(crossterm_to_ratatui(self.fg));
        if let Some(bg) = self.bg {
            style = style.bg(crossterm_to_ratatui(bg));
        }
        style
    }

    pub fn to_ratatui_with_modifier(&self, modifier: Modifier) -> RatatuiStyle {
        self.to_ratatui().add_modifier(modifier)
    }

    /// Apply color to text for terminal output
    pub fn colorize(&self, text: &str) -> String {
        let mut styled = text.with(self.fg);
        if let Some(bg) = self.bg {
            styled = styled.on(bg);
        }
        format!("{}", styled)
    }
}

/// Convert crossterm color to ratatui color
pub fn crossterm_to_ratatui(color: CrosstermColor) -> RatatuiColor {
    match color {
        CrosstermColor::Black => RatatuiColor::Black,
        CrosstermColor::DarkRed => RatatuiColor::Red,
        CrosstermColor::DarkGreen => RatatuiColor::Green,
        CrosstermColor::DarkYellow => RatatuiColor::Yellow,
        CrosstermColor::DarkBlue => RatatuiColor::Blue,
        CrosstermColor::DarkMagenta => RatatuiColor::Magenta,
        CrosstermColor::DarkCyan => RatatuiColor::Cyan,
        CrosstermColor::Grey => RatatuiColor::Gray,
        CrosstermColor::DarkGrey => RatatuiColor::DarkGray,
        CrosstermColor::Red => RatatuiColor::LightRed,
        CrosstermColor::Green => RatatuiColor::LightGreen,
        CrosstermColor::Yellow => RatatuiColor::LightYellow,
        CrosstermColor::Blue => RatatuiColor::LightBlue,
        CrosstermColor::Magenta => RatatuiColor::LightMagenta,
        CrosstermColor::Cyan => RatatuiColor::LightCyan,
        CrosstermColor::White => RatatuiColor::White,
        CrosstermColor::Rgb { r, g, b } => RatatuiColor::Rgb(r, g, b),
        CrosstermColor::AnsiValue(v) => RatatuiColor::Indexed(v),
        _ => RatatuiColor::White,
    }
}

/// Named terminal color such as "blue" or "dark_cyan".
pub fn parse_color(name: &str) -> Option<CrosstermColor> {
    let normalized = name.trim().to_lowercase().replace(['-', ' '], "_");
    CrosstermColor::try_from(normalized.as_str()).ok()
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            colors: ThemeColors {
                accent: ColorPair::new(CrosstermColor::Blue),
                header: ColorPair::new(CrosstermColor::DarkCyan),
                border: ColorPair::new(CrosstermColor::DarkCyan),

                selected: ColorPair::with_bg(CrosstermColor::White, CrosstermColor::Blue),
                current: ColorPair::new(CrosstermColor::Yellow),
                cursor: ColorPair::with_bg(
                    CrosstermColor::White,
                    CrosstermColor::Rgb { r: 40, g: 40, b: 40 },
                ),
                disallowed: ColorPair::new(CrosstermColor::DarkGrey),
                weekend: ColorPair::new(CrosstermColor::Rgb { r: 150, g: 150, b: 150 }),

                normal_text: ColorPair::new(CrosstermColor::White),
                help_text: ColorPair::new(CrosstermColor::DarkCyan),
            },
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            colors: ThemeColors {
                accent: ColorPair::new(CrosstermColor::DarkBlue),
                header: ColorPair::new(CrosstermColor::DarkBlue),
                border: ColorPair::new(CrosstermColor::DarkBlue),

                selected: ColorPair::with_bg(CrosstermColor::White, CrosstermColor::DarkBlue),
                current: ColorPair::with_bg(CrosstermColor::Black, CrosstermColor::Yellow),
                cursor: ColorPair::with_bg(
                    CrosstermColor::Black,
                    CrosstermColor::Rgb { r: 220, g: 220, b: 220 },
                ),
                disallowed: ColorPair::new(CrosstermColor::Grey),
                weekend: ColorPair::new(CrosstermColor::DarkGrey),

                normal_text: ColorPair::new(CrosstermColor::Black),
                help_text: ColorPair::new(CrosstermColor::DarkBlue),
            },
        }
    }

    pub fn minimal() -> Self {
        Self {
            name: "Minimal".to_string(),
            colors: ThemeColors {
                accent: ColorPair::new(CrosstermColor::White),
                header: ColorPair::new(CrosstermColor::White),
                border: ColorPair::new(CrosstermColor::White),

                selected: ColorPair::with_bg(CrosstermColor::Black, CrosstermColor::White),
                current: ColorPair::new(CrosstermColor::White),
                cursor: ColorPair::with_bg(
                    CrosstermColor::White,
                    CrosstermColor::Rgb { r: 28, g: 28, b: 28 },
                ),
                disallowed: ColorPair::new(CrosstermColor::DarkGrey),
                weekend: ColorPair::new(CrosstermColor::Grey),

                normal_text: ColorPair::new(CrosstermColor::White),
                help_text: ColorPair::new(CrosstermColor::Grey),
            },
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "minimal" => Self::minimal(),
            _ => Self::dark(), // default
        }
    }

    pub fn available_themes() -> Vec<String> {
        vec!["dark".to_string(), "light".to_string(), "minimal".to_string()]
    }

    /// Applies the picker's `color` and `header_color` settings. Unknown
    /// names keep the theme's own color.
    pub fn with_overrides(mut self, color: Option<&str>, header_color: Option<&str>) -> Self {
        if let Some(color) = color {
            match parse_color(color) {
                Some(fg) => {
                    self.colors.accent.fg = fg;
                    self.colors.selected.bg = Some(fg);
                }
                None => log::warn!("unknown color '{color}'"),
            }
        }
        if let Some(header_color) = header_color {
            match parse_color(header_color) {
                Some(fg) => self.colors.header.fg = fg,
                None => log::warn!("unknown header color '{header_color}'"),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_falls_back_to_dark() {
        assert_eq!(Theme::by_name("LIGHT").name, "Light");
        assert_eq!(Theme::by_name("solarized").name, "Dark");
        assert_eq!(Theme::available_themes().len(), 3);
    }

    #[test]
    fn test_overrides() {
        let theme = Theme::dark().with_overrides(Some("green"), Some("dark-magenta"));
        assert_eq!(theme.colors.accent.fg, CrosstermColor::Green);
        assert_eq!(theme.colors.selected.bg, Some(CrosstermColor::Green));
        assert_eq!(theme.colors.header.fg, CrosstermColor::DarkMagenta);

        let theme = Theme::dark().with_overrides(Some("chartreuse-ish"), None);
        assert_eq!(theme.colors.accent.fg, CrosstermColor::Blue);
    }

    #[test]
    fn test_to_ratatui_maps_background() {
        let style = ColorPair::with_bg(CrosstermColor::White, CrosstermColor::DarkBlue).to_ratatui();
        assert_eq!(style.fg, Some(RatatuiColor::White));
        assert_eq!(style.bg, Some(RatatuiColor::Blue));
    }
}
