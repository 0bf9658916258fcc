use serde::{Deserialize, Serialize};

/// Named color palette. The header of the screen is tinted with `header`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    /// Header background; the screen's tint
    pub header: Color,
    pub header_text: Color,

    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub muted: Color,

    pub selected: Color,
    pub selected_bg: Color,

    pub favorite: Color,
    pub stars: Color,
    pub forks: Color,
    pub language: Color,

    pub info: Color,
    pub error: Color,
}

/// RGB color, independent of any terminal library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

impl Theme {
    pub fn default_dark() -> Self {
        Self {
            name: "Default Dark".to_string(),
            colors: ThemeColors {
                header: Color::rgb(0x89b4fa),
                header_text: Color::rgb(0x1e1e2e),
                foreground: Color::rgb(0xcdd6f4),
                border: Color::rgb(0x45475a),
                border_focused: Color::rgb(0x89b4fa),
                muted: Color::rgb(0x6c7086),
                selected: Color::rgb(0xf9e2af),
                selected_bg: Color::rgb(0x313244),
                favorite: Color::rgb(0xf38ba8),
                stars: Color::rgb(0xf9e2af),
                forks: Color::rgb(0x94e2d5),
                language: Color::rgb(0xcba6f7),
                info: Color::rgb(0x89dceb),
                error: Color::rgb(0xf38ba8),
            },
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            colors: ThemeColors {
                header: Color::rgb(0x1e66f5),
                header_text: Color::rgb(0xffffff),
                foreground: Color::rgb(0x4c4f69),
                border: Color::rgb(0xbcc0cc),
                border_focused: Color::rgb(0x1e66f5),
                muted: Color::rgb(0x9ca0b0),
                selected: Color::rgb(0x8839ef),
                selected_bg: Color::rgb(0xdce0e8),
                favorite: Color::rgb(0xd20f39),
                stars: Color::rgb(0xdf8e1d),
                forks: Color::rgb(0x04a5e5),
                language: Color::rgb(0x8839ef),
                info: Color::rgb(0x209fb5),
                error: Color::rgb(0xd20f39),
            },
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "Nord".to_string(),
            colors: ThemeColors {
                header: Color::rgb(0x5e81ac),
                header_text: Color::rgb(0xeceff4),
                foreground: Color::rgb(0xeceff4),
                border: Color::rgb(0x4c566a),
                border_focused: Color::rgb(0x88c0d0),
                muted: Color::rgb(0x4c566a),
                selected: Color::rgb(0x88c0d0),
                selected_bg: Color::rgb(0x3b4252),
                favorite: Color::rgb(0xbf616a),
                stars: Color::rgb(0xebcb8b),
                forks: Color::rgb(0x8fbcbb),
                language: Color::rgb(0xb48ead),
                info: Color::rgb(0x81a1c1),
                error: Color::rgb(0xbf616a),
            },
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: "Dracula".to_string(),
            colors: ThemeColors {
                header: Color::rgb(0xbd93f9),
                header_text: Color::rgb(0x282a36),
                foreground: Color::rgb(0xf8f8f2),
                border: Color::rgb(0x44475a),
                border_focused: Color::rgb(0xbd93f9),
                muted: Color::rgb(0x6272a4),
                selected: Color::rgb(0xff79c6),
                selected_bg: Color::rgb(0x44475a),
                favorite: Color::rgb(0xff5555),
                stars: Color::rgb(0xf1fa8c),
                forks: Color::rgb(0x8be9fd),
                language: Color::rgb(0xbd93f9),
                info: Color::rgb(0x8be9fd),
                error: Color::rgb(0xff5555),
            },
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "Gruvbox Dark".to_string(),
            colors: ThemeColors {
                header: Color::rgb(0xd79921),
                header_text: Color::rgb(0x282828),
                foreground: Color::rgb(0xebdbb2),
                border: Color::rgb(0x504945),
                border_focused: Color::rgb(0x83a598),
                muted: Color::rgb(0x665c54),
                selected: Color::rgb(0xfabd2f),
                selected_bg: Color::rgb(0x3c3836),
                favorite: Color::rgb(0xfb4934),
                stars: Color::rgb(0xfabd2f),
                forks: Color::rgb(0x8ec07c),
                language: Color::rgb(0xd3869b),
                info: Color::rgb(0x83a598),
                error: Color::rgb(0xfb4934),
            },
        }
    }

    pub fn all_themes() -> Vec<Theme> {
        vec![
            Self::default_dark(),
            Self::light(),
            Self::nord(),
            Self::dracula(),
            Self::gruvbox(),
        ]
    }

    /// Case-insensitive lookup
    pub fn by_name(name: &str) -> Option<Theme> {
        Self::all_themes()
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}
