use serde::Deserialize;
use story_graph_report::layout::CanvasSize;
use story_graph_report::{AnalysisDocument, Config, RenderMode, Theme, ThemeMode, assemble_report, render_graph};
use time::OffsetDateTime;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    title: Option<String>,
    /// Unix seconds; the wasm target has no system clock.
    generated_at: Option<i64>,
    /// Live container size of the graph mount.
    mount_width: Option<f32>,
    mount_height: Option<f32>,
    /// Render the graph with fixed export geometry framed at width × height.
    export: Option<bool>,
    width: Option<f32>,
    height: Option<f32>,
}

fn parse_options(options_json: Option<String>) -> Result<ReportRenderOptions, JsValue> {
    match options_json {
        Some(raw_options) => serde_json::from_str::<ReportRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(ReportRenderOptions::default()),
    }
}

fn positive(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn build_config(options: &ReportRenderOptions) -> Config {
    let mut config = Config::default();
    if let Some(mode) = options.theme.as_deref().and_then(ThemeMode::from_token) {
        config.theme = Theme::for_mode(mode);
    }
    if let Some(font_family) = options.font_family.clone() {
        config.theme.font_family = font_family;
    }
    if let Some(width) = positive(options.width) {
        config.render.display_width = width;
    }
    if let Some(height) = positive(options.height) {
        config.render.display_height = height;
    }
    config
}

fn graph_mode(options: &ReportRenderOptions, config: &Config) -> RenderMode {
    if options.export.unwrap_or(false) {
        return RenderMode::Export {
            display: config.render.display_size(),
            mode: config.mode(),
        };
    }
    let mount = match (options.mount_width, options.mount_height) {
        (Some(width), Some(height)) => Some(CanvasSize::new(width, height)),
        _ => None,
    };
    RenderMode::Interactive { mount }
}

fn parse_document(json: &str) -> Result<AnalysisDocument, JsValue> {
    AnalysisDocument::from_json(json).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_report_html(json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let doc = parse_document(json)?;
    let config = build_config(&options);
    let generated_at = options
        .generated_at
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .unwrap_or(OffsetDateTime::UNIX_EPOCH);
    let title = options.title.as_deref().unwrap_or("report");
    Ok(assemble_report(&doc, title, generated_at, &config))
}

/// Graph SVG alone. Resolves to an empty string when there is nothing to draw.
#[wasm_bindgen]
pub fn render_graph_svg(json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let doc = parse_document(json)?;
    let config = build_config(&options);
    let scene = render_graph(
        &doc,
        graph_mode(&options, &config),
        &config.theme,
        &config.layout,
        &config.render,
    );
    Ok(scene.map(|scene| scene.to_svg()).unwrap_or_default())
}
