#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod escape;
pub mod layout;
pub mod layout_dump;
pub mod live;
pub mod markup;
pub mod model;
pub mod render;
pub mod report;
pub mod sections;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::{ReportError, Result};
pub use escape::{escape_markup, sanitize_filename};
pub use live::{MountHost, MountRegistry, render_live};
pub use model::AnalysisDocument;
pub use render::{GraphScene, RenderMode, render_graph};
pub use report::{QuickStats, assemble_report, report_filename};
pub use theme::{Theme, ThemeMode};
