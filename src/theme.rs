use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Palette consumed by the graph renderer and the report chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub mode: ThemeMode,
    pub font_family: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub info_color: String,
    pub error_color: String,
    pub background: String,
    pub text_primary: String,
    pub text_secondary: String,
}

impl Theme {
    /// Fixed palette for a mode. Exported artifacts always use this one.
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            font_family: "-apple-system, Segoe UI, system-ui, sans-serif".to_string(),
            primary_color: "#6366f1".to_string(),
            secondary_color: "#ec4899".to_string(),
            info_color: "#3b82f6".to_string(),
            error_color: "#ef4444".to_string(),
            background: "#f2f2f7".to_string(),
            text_primary: "#000000".to_string(),
            text_secondary: "rgba(0,0,0,0.6)".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            background: "#1c1c1e".to_string(),
            text_primary: "#ffffff".to_string(),
            text_secondary: "rgba(255,255,255,0.7)".to_string(),
            ..Self::light()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
