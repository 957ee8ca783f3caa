use crate::error::{ReportError, Result};
use crate::layout::CanvasSize;
use crate::theme::{Theme, ThemeMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Circle radius as a fraction of the shorter canvas side.
    pub radius_factor: f32,
    pub node_radius: f32,
    pub halo_radius: f32,
    pub name_offset_y: f32,
    pub glyph_offset_y: f32,
    /// Perpendicular distance between the three label lanes.
    pub label_offset_step: f32,
    pub label_char_width: f32,
    pub label_min_chars: usize,
    pub label_padding_x: f32,
    pub label_height: f32,
    pub label_font_size: f32,
    pub name_font_size: f32,
    pub glyph_font_size: f32,
    pub edge_stroke_width: f32,
    pub edge_opacity: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius_factor: 0.35,
            node_radius: 35.0,
            halo_radius: 45.0,
            name_offset_y: 55.0,
            glyph_offset_y: 5.0,
            label_offset_step: 18.0,
            label_char_width: 8.0,
            label_min_chars: 4,
            label_padding_x: 4.0,
            label_height: 16.0,
            label_font_size: 10.0,
            name_font_size: 12.0,
            glyph_font_size: 16.0,
            edge_stroke_width: 2.0,
            edge_opacity: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Interactive canvas used when the mount point reports no size.
    pub fallback_width: f32,
    pub fallback_height: f32,
    /// Internal geometry of exported graphs. Never affected by display size.
    pub export_width: f32,
    pub export_height: f32,
    /// Outer frame of exported graphs.
    pub display_width: f32,
    pub display_height: f32,
    /// Scenes listed in the count section before the "+N more" marker.
    pub scene_display_limit: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fallback_width: 600.0,
            fallback_height: 400.0,
            export_width: 1200.0,
            export_height: 800.0,
            display_width: 1200.0,
            display_height: 800.0,
            scene_display_limit: 15,
        }
    }
}

impl RenderConfig {
    pub fn fallback_canvas(&self) -> CanvasSize {
        CanvasSize::new(self.fallback_width, self.fallback_height)
    }

    pub fn export_canvas(&self) -> CanvasSize {
        CanvasSize::new(self.export_width, self.export_height)
    }

    pub fn display_size(&self) -> CanvasSize {
        CanvasSize::new(self.display_width, self.display_height)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Config {
    pub fn mode(&self) -> ThemeMode {
        self.theme.mode
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    primary_color: Option<String>,
    secondary_color: Option<String>,
    info_color: Option<String>,
    error_color: Option<String>,
    background: Option<String>,
    text_color: Option<String>,
    secondary_text_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    fallback_width: Option<NumberOrString>,
    fallback_height: Option<NumberOrString>,
    display_width: Option<NumberOrString>,
    display_height: Option<NumberOrString>,
    scene_display_limit: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_radius: Option<NumberOrString>,
    halo_radius: Option<NumberOrString>,
    label_font_size: Option<NumberOrString>,
    name_font_size: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    render: Option<RenderConfigFile>,
    layout: Option<LayoutConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = serde_json::from_str(&contents).map_err(|err| ReportError::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(apply_config_file(config, parsed))
}

/// Parses config JSON already held in memory (used by the wasm wrapper).
pub fn config_from_str(contents: &str) -> std::result::Result<Config, serde_json::Error> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    Ok(apply_config_file(Config::default(), parsed))
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> Config {
    if let Some(mode) = parsed.theme.as_deref().and_then(ThemeMode::from_token) {
        config.theme = Theme::for_mode(mode);
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.primary_color {
            config.theme.primary_color = v;
        }
        if let Some(v) = vars.secondary_color {
            config.theme.secondary_color = v;
        }
        if let Some(v) = vars.info_color {
            config.theme.info_color = v;
        }
        if let Some(v) = vars.error_color {
            config.theme.error_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_primary = v;
        }
        if let Some(v) = vars.secondary_text_color {
            config.theme.text_secondary = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.fallback_width.as_ref().and_then(NumberOrString::as_f32) {
            config.render.fallback_width = v.max(1.0);
        }
        if let Some(v) = render.fallback_height.as_ref().and_then(NumberOrString::as_f32) {
            config.render.fallback_height = v.max(1.0);
        }
        if let Some(v) = render.display_width.as_ref().and_then(NumberOrString::as_f32) {
            config.render.display_width = v.max(1.0);
        }
        if let Some(v) = render.display_height.as_ref().and_then(NumberOrString::as_f32) {
            config.render.display_height = v.max(1.0);
        }
        if let Some(v) = render.scene_display_limit.as_ref().and_then(NumberOrString::as_f32) {
            config.render.scene_display_limit = v.max(0.0) as usize;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_radius.as_ref().and_then(NumberOrString::as_f32) {
            config.layout.node_radius = v;
        }
        if let Some(v) = layout.halo_radius.as_ref().and_then(NumberOrString::as_f32) {
            config.layout.halo_radius = v;
        }
        if let Some(v) = layout.label_font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.layout.label_font_size = v;
        }
        if let Some(v) = layout.name_font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.layout.name_font_size = v;
        }
    }

    config
}
