use crate::config::{Config, load_config};
use crate::error::ReportError;
use crate::layout::CanvasSize;
use crate::layout_dump::write_layout_dump;
use crate::model::AnalysisDocument;
use crate::render::{GraphScene, RenderMode, render_graph, write_output_svg};
use crate::report::{assemble_report, report_filename};
use crate::theme::{Theme, ThemeMode};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "sgr", version, about = "Relationship graph and report renderer for novel analysis JSON")]
pub struct Args {
    /// Analysis JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. HTML defaults to <title>_report.html, SVG to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "html")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, render and layout overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Report title. Defaults to the input file name.
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    /// Fixed export palette
    #[arg(long = "theme", value_enum)]
    pub theme: Option<ThemeArg>,

    /// Display width of the exported graph
    #[arg(short = 'w', long = "width", value_parser = positive_dimension)]
    pub width: Option<f32>,

    /// Display height of the exported graph
    #[arg(short = 'H', long = "height", value_parser = positive_dimension)]
    pub height: Option<f32>,

    /// Write the resolved graph geometry as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Log layout details to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemeMode {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => ThemeMode::Light,
            ThemeArg::Dark => ThemeMode::Dark,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let config = resolve_config(&args)?;
    let input = read_input(args.input.as_deref())?;
    let doc = AnalysisDocument::from_json(&input)?;
    let title = resolve_title(args.title.as_deref(), args.input.as_deref());
    debug!(title = %title, characters = doc.characters().len(), "analysis loaded");

    let scene = export_scene(&doc, &config);
    if let Some(path) = args.dump_layout.as_deref() {
        match scene.as_ref() {
            Some(scene) => write_layout_dump(path, scene)?,
            None => info!("no relationship graph, layout dump skipped"),
        }
    }

    match args.output_format {
        OutputFormat::Html => {
            let html = assemble_report(&doc, &title, OffsetDateTime::now_utc(), &config);
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(report_filename(&title, "html")));
            std::fs::write(&output, html).map_err(|source| ReportError::Write {
                path: output.clone(),
                source,
            })?;
            info!(path = %output.display(), "wrote report");
        }
        OutputFormat::Svg => {
            let svg = require_scene(scene.as_ref())?.to_svg();
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = require_scene(scene.as_ref())?.to_svg();
            write_png(&svg, &output, &config)?;
        }
    }

    Ok(())
}

fn init_tracing(args: &Args) {
    let filter_layer = if args.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else if args.verbose {
        tracing_subscriber::EnvFilter::new("info")
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn positive_dimension(raw: &str) -> std::result::Result<f32, String> {
    let value: f32 = raw.trim().parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("`{raw}` must be a positive size in pixels"))
    }
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(theme) = args.theme {
        config.theme = Theme::for_mode(theme.into());
    }
    if let Some(width) = args.width {
        config.render.display_width = width;
    }
    if let Some(height) = args.height {
        config.render.display_height = height;
    }
    Ok(config)
}

fn export_scene(doc: &AnalysisDocument, config: &Config) -> Option<GraphScene> {
    let mode = RenderMode::Export {
        display: CanvasSize::new(config.render.display_width, config.render.display_height),
        mode: config.mode(),
    };
    render_graph(doc, mode, &config.theme, &config.layout, &config.render)
}

fn require_scene(scene: Option<&GraphScene>) -> Result<&GraphScene> {
    scene.ok_or_else(|| anyhow::anyhow!("Nothing to draw: no character takes part in a relationship"))
}

fn resolve_title(title: Option<&str>, input: Option<&Path>) -> String {
    if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    input
        .filter(|path| *path != Path::new("-"))
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| crate::escape::DEFAULT_FILENAME.to_string())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path.filter(|path| *path != Path::new("-")) {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(content);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_falls_back_to_input_stem() {
        assert_eq!(resolve_title(Some(" Saga "), None), "Saga");
        assert_eq!(resolve_title(None, Some(Path::new("novels/Moon Sect.json"))), "Moon Sect");
        assert_eq!(resolve_title(None, Some(Path::new("-"))), "report");
        assert_eq!(resolve_title(Some(""), None), "report");
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "sgr", "-i", "a.json", "-e", "svg", "--theme", "light", "-w", "1600", "-H", "1200", "--dumpLayout",
            "out.json",
        ])
        .unwrap();
        assert_eq!(args.output_format, OutputFormat::Svg);
        assert_eq!(args.theme, Some(ThemeArg::Light));
        assert_eq!(args.dump_layout.as_deref(), Some(Path::new("out.json")));

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.mode(), ThemeMode::Light);
        assert_eq!(config.render.display_width, 1600.0);
        assert_eq!(config.render.display_height, 1200.0);
    }

    #[test]
    fn rejects_non_positive_sizes() {
        assert!(Args::try_parse_from(["sgr", "-i", "a.json", "-w", "0"]).is_err());
        assert!(Args::try_parse_from(["sgr", "-i", "a.json", "-H", "-300"]).is_err());
        assert!(Args::try_parse_from(["sgr", "-i", "a.json", "-w", "wide"]).is_err());
        assert_eq!(positive_dimension("800"), Ok(800.0));
    }

    #[test]
    fn html_is_the_default_format() {
        let args = Args::try_parse_from(["sgr", "-i", "a.json"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Html);
        assert!(ensure_output(&args.output, "png").is_err());
    }
}
