//! Standalone HTML report.
//!
//! The exported document carries all styling inline. The single external
//! resource is the Alpine.js script driving tab switching; no data is fetched
//! at view time.

use crate::config::Config;
use crate::escape::sanitize_filename;
use crate::markup::{Element, Markup};
use crate::model::AnalysisDocument;
use crate::render::{RenderMode, UNKNOWN, render_graph};
use crate::sections::{
    Section, build_characters, build_evolution, build_first_intimacy, build_intimacy_count,
    build_lewd_elements, build_sensitive_flags, build_summary,
};
use crate::theme::Theme;
use std::collections::BTreeSet;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::debug;

/// Mount id of the quick stats block at the top of the summary tab.
pub const QUICK_STATS_ID: &str = "quickStats";

/// Un-hides every panel and the tab bar when scripts are disabled.
const NOSCRIPT_CSS: &str = "[x-cloak] { display: block !important; } .tabs { display: none; }";

const ALPINE_CDN: &str = "https://cdn.jsdelivr.net/npm/alpinejs@3.14.1/dist/cdn.min.js";

const REPORT_CSS: &str = r#"
* { box-sizing: border-box; }
body { font-family: var(--font); max-width: 1280px; margin: 0 auto; padding: 24px; background: var(--bg); color: var(--text); }
h1 { color: var(--primary); text-align: center; border-bottom: 2px solid var(--primary); padding-bottom: 15px; }
h3 { color: var(--secondary); border-left: 4px solid var(--secondary); padding-left: 12px; }
.generated { text-align: center; color: var(--text-muted); font-size: 13px; }
.tabs { display: flex; flex-wrap: wrap; gap: 8px; margin: 24px 0; }
.tab { border: 1px solid var(--primary); background: transparent; color: var(--text); padding: 8px 16px; border-radius: 8px; cursor: pointer; }
.tab.tab-active { background: var(--primary); color: #ffffff; }
.panel { background: var(--surface); padding: 20px; border-radius: 12px; }
.quick-stats { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; margin-bottom: 20px; }
.stat-card { background: var(--card); border-radius: 10px; padding: 14px; text-align: center; }
.stat-value { font-size: 28px; font-weight: 700; color: var(--primary); }
.stat-label, .meta-label, .detail-label { color: var(--text-muted); font-size: 13px; }
.summary-title { font-weight: 600; margin: 16px 0 8px; }
.summary-content { line-height: 1.7; white-space: pre-wrap; }
.novel-meta-grid, .char-names-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 10px; }
.novel-meta-item, .char-names-group { background: var(--card); border-radius: 8px; padding: 10px; }
.meta-value { margin-left: 6px; }
.meta-value.completed { color: #22c55e; }
.meta-value.ongoing { color: #eab308; }
.world-tag, .char-name-tag { display: inline-block; margin: 2px; padding: 2px 8px; border-radius: 999px; background: var(--surface); font-size: 12px; }
.char-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 12px; }
.char-card { background: var(--card); border-radius: 10px; padding: 14px; border-left: 4px solid var(--primary); }
.char-card.male { border-left-color: var(--info); }
.char-card.female { border-left-color: var(--error); }
.char-header { display: flex; align-items: center; gap: 10px; margin-bottom: 10px; }
.char-avatar { width: 36px; height: 36px; border-radius: 50%; display: flex; align-items: center; justify-content: center; color: #ffffff; font-weight: 700; background: var(--primary); }
.char-avatar.male { background: var(--info); }
.char-avatar.female { background: var(--error); }
.char-info { flex: 1; }
.char-name { font-weight: 600; }
.char-role { color: var(--text-muted); font-size: 12px; }
.lewdness-badge { border-radius: 8px; padding: 4px 8px; color: #ffffff; display: flex; gap: 6px; font-size: 13px; }
.char-detail { margin: 4px 0; }
.detail-value { margin-left: 6px; }
.first-sex-card, .scene-item, .thunderzone-card, .relationship-item, .element-card { background: var(--card); border-radius: 8px; padding: 12px; margin: 8px 0; }
.first-sex-header, .thunderzone-header, .relationship-pair { display: flex; gap: 10px; align-items: center; }
.participants, .rel-from, .rel-to { font-weight: 600; }
.chapter-tag, .rel-type { color: var(--secondary); font-size: 12px; }
.stat-total { text-align: center; margin-bottom: 16px; }
.stat-total-value { font-size: 48px; color: var(--error); }
.scene-item { display: flex; gap: 16px; align-items: center; }
.scene-number { width: 28px; height: 28px; border-radius: 50%; background: var(--primary); color: #ffffff; display: flex; align-items: center; justify-content: center; font-size: 13px; }
.scene-info { display: flex; flex-wrap: wrap; gap: 12px; }
.scene-location { color: var(--text-muted); }
.scene-more { text-align: center; color: var(--text-muted); }
.timeline { border-left: 2px solid var(--primary); margin-left: 8px; padding-left: 16px; }
.timeline-item { position: relative; margin: 12px 0; }
.timeline-dot { position: absolute; left: -23px; top: 6px; width: 12px; height: 12px; border-radius: 50%; background: var(--primary); }
.timeline-item.first .timeline-dot { background: var(--secondary); }
.timeline-header { display: flex; gap: 10px; font-weight: 600; }
.timeline-origin { color: var(--secondary); font-size: 12px; }
.thunderzone-card { border-left: 4px solid var(--text-muted); }
.thunderzone-high { border-left-color: #ef4444; }
.thunderzone-medium { border-left-color: #f97316; }
.thunderzone-low { border-left-color: #3b82f6; }
.badge { border-radius: 6px; padding: 2px 8px; font-size: 12px; color: #ffffff; background: #6b7280; }
.badge-error { background: #ef4444; }
.badge-warning { background: #f97316; }
.badge-info { background: #3b82f6; }
.element-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 12px; }
.element-header { display: flex; justify-content: space-between; align-items: center; }
.element-type { font-weight: 600; color: var(--error); }
.graph-canvas { width: 100%; overflow: auto; }
.graph-canvas svg { max-width: 100%; height: auto; }
.graph-legend { display: flex; gap: 16px; justify-content: center; margin: 12px 0; }
.legend-dot { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 6px; }
.empty-state { text-align: center; padding: 40px; color: var(--text-muted); }
.empty-icon { font-size: 40px; }
[x-cloak] { display: none !important; }
@media (max-width: 720px) { .quick-stats { grid-template-columns: repeat(2, 1fr); } }
"#;

/// Headline numbers shown above the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickStats {
    pub intimacy_total: usize,
    /// Distinct unordered `{from, to}` pairs.
    pub relationship_pairs: usize,
    pub characters: usize,
    pub word_count: Option<u64>,
}

impl QuickStats {
    pub fn from_document(doc: &AnalysisDocument) -> Self {
        let pairs: BTreeSet<(&str, &str)> = doc
            .relationships()
            .iter()
            .map(|rel| {
                let (a, b) = (rel.from.as_str(), rel.to.as_str());
                if a <= b { (a, b) } else { (b, a) }
            })
            .collect();
        Self {
            intimacy_total: doc.intimacy_total(),
            relationship_pairs: pairs.len(),
            characters: doc.characters().len(),
            word_count: doc.word_count(),
        }
    }

    pub fn to_markup(&self) -> Markup {
        let card = |value: String, label: &'static str| {
            Element::new("div")
                .class("stat-card")
                .child(Element::new("div").class("stat-value").text(value))
                .child(Element::new("div").class("stat-label").raw(label))
        };
        Element::new("div")
            .class("quick-stats")
            .id(QUICK_STATS_ID)
            .child(card(self.intimacy_total.to_string(), "Intimate scenes"))
            .child(card(self.relationship_pairs.to_string(), "Relationship pairs"))
            .child(card(self.characters.to_string(), "Characters"))
            .child(card(format_word_count(self.word_count), "Words"))
            .into()
    }
}

/// `1234` → `1.2K`, `2500000` → `2.5M`.
pub fn format_word_count(count: Option<u64>) -> String {
    match count {
        None | Some(0) => UNKNOWN.to_string(),
        Some(n) if n >= 1_000_000 => format!("{:.1}M", n as f64 / 1_000_000.0),
        Some(n) if n >= 1_000 => format!("{:.1}K", n as f64 / 1_000.0),
        Some(n) => n.to_string(),
    }
}

pub fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    at.to_offset(time::UtcOffset::UTC)
        .format(format)
        .unwrap_or_default()
}

/// Output file name for a report on `title`. A trailing `.txt` from the source
/// file name is dropped first.
pub fn report_filename(title: &str, ext: &str) -> String {
    let title = title.trim();
    let title = title.strip_suffix(".txt").unwrap_or(title);
    format!("{}_report.{ext}", sanitize_filename(Some(title)))
}

/// Markup of one section, as placed in both the export and the live host.
pub(crate) fn section_markup(section: Section, doc: &AnalysisDocument, graph: &Markup, config: &Config) -> Markup {
    match section {
        Section::Summary => build_summary(doc),
        Section::Characters => build_characters(doc),
        Section::Graph => graph.clone(),
        Section::FirstIntimacy => build_first_intimacy(doc),
        Section::IntimacyCount => build_intimacy_count(doc, config.render.scene_display_limit),
        Section::Evolution => build_evolution(doc),
        Section::SensitiveFlags => build_sensitive_flags(doc),
        Section::LewdElements => build_lewd_elements(doc),
    }
}

fn body_vars(theme: &Theme) -> String {
    let (surface, card, muted) = match theme.mode {
        crate::theme::ThemeMode::Light => ("#ffffff", "#e5e5ea", "rgba(0,0,0,0.55)"),
        crate::theme::ThemeMode::Dark => ("#2c2c2e", "#3a3a3c", "rgba(255,255,255,0.6)"),
    };
    format!(
        "--font: {}; --bg: {}; --text: {}; --text-muted: {}; --primary: {}; --secondary: {}; --info: {}; --error: {}; --surface: {}; --card: {}",
        theme.font_family,
        theme.background,
        theme.text_primary,
        muted,
        theme.primary_color,
        theme.secondary_color,
        theme.info_color,
        theme.error_color,
        surface,
        card,
    )
}

fn tab_bar() -> Element {
    Element::new("div").class("tabs").children(Section::ALL.iter().map(|section| {
        let key = section.tab_key();
        Element::new("button")
            .class("tab")
            .attr("type", "button")
            .attr("@click", format!("tab = '{key}'"))
            .attr(":class", format!("{{ 'tab-active': tab === '{key}' }}"))
            .raw(section.tab_label())
    }))
}

/// Builds the complete exported report. The graph is rendered in export mode
/// with the fixed palette of the configured light/dark mode, framed at the
/// configured display size.
pub fn assemble_report(doc: &AnalysisDocument, title: &str, generated_at: OffsetDateTime, config: &Config) -> String {
    let theme = Theme::for_mode(config.mode());
    let mode = RenderMode::Export {
        display: config.render.display_size(),
        mode: config.mode(),
    };
    let scene = render_graph(doc, mode, &theme, &config.layout, &config.render);
    let graph = crate::sections::graph_section(scene.as_ref(), doc);
    debug!(title = %title, graph = scene.is_some(), "assembling report");

    let panels = Section::ALL.iter().map(|&section| {
        let mut panel = Element::new("section")
            .class("panel")
            .id(section.mount_id())
            .attr("x-show", format!("tab === '{}'", section.tab_key()));
        if section != Section::Summary {
            panel = panel.attr("x-cloak", "");
        } else {
            panel = panel.child(QuickStats::from_document(doc).to_markup());
        }
        panel.child(section_markup(section, doc, &graph, config))
    });

    let first_tab = Section::ALL[0].tab_key();
    let html = Element::new("html")
        .attr("lang", "en")
        .child(
            Element::new("head")
                .child(Element::new("meta").attr("charset", "UTF-8"))
                .child(
                    Element::new("meta")
                        .attr("name", "viewport")
                        .attr("content", "width=device-width, initial-scale=1.0"),
                )
                .child(Element::new("title").text(format!("Novel analysis report - {title}")))
                .child(Element::new("style").raw(REPORT_CSS))
                .child(Element::new("noscript").child(Element::new("style").raw(NOSCRIPT_CSS)))
                .child(Element::new("script").attr("defer", "").attr("src", ALPINE_CDN)),
        )
        .child(
            Element::new("body")
                .attr("style", body_vars(&theme))
                .attr("x-data", format!("{{ tab: '{first_tab}' }}"))
                .child(Element::new("h1").text(format!("{title} - Analysis report")))
                .child(
                    Element::new("p")
                        .class("generated")
                        .text(format!("Generated {}", format_timestamp(generated_at))),
                )
                .child(tab_bar())
                .children(panels),
        );

    let mut out = String::from("<!DOCTYPE html>\n");
    Markup::from(html).write_into(&mut out);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn doc() -> AnalysisDocument {
        AnalysisDocument::from_json(
            r#"{
                "novel_info": {"world_setting": "Xianxia", "word_count": 1234567},
                "characters": [{"name": "Lin", "gender": "male"}, {"name": "Mei", "gender": "female", "lewdness_score": 80}],
                "relationships": [
                    {"from": "Lin", "to": "Mei", "type": "lovers"},
                    {"from": "Mei", "to": "Lin", "type": "rivals"},
                    {"from": "Lin", "to": "Ghost", "type": "haunted"}
                ],
                "sex_scenes": {"total_count": 7, "scenes": []}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn quick_stats_count_unordered_pairs() {
        let stats = QuickStats::from_document(&doc());
        assert_eq!(
            stats,
            QuickStats {
                intimacy_total: 7,
                relationship_pairs: 2,
                characters: 2,
                word_count: Some(1_234_567),
            }
        );
    }

    #[test]
    fn word_counts_are_abbreviated() {
        assert_eq!(format_word_count(Some(950)), "950");
        assert_eq!(format_word_count(Some(12_345)), "12.3K");
        assert_eq!(format_word_count(Some(2_500_000)), "2.5M");
        assert_eq!(format_word_count(None), "unknown");
    }

    #[test]
    fn filenames_drop_txt_and_reserved_characters() {
        assert_eq!(report_filename("My Novel.txt", "html"), "My Novel_report.html");
        assert_eq!(report_filename("a:b?c", "html"), "a_b_c_report.html");
        assert_eq!(report_filename("", "svg"), "report_report.svg");
    }

    #[test]
    fn timestamp_format() {
        assert_eq!(format_timestamp(datetime!(2024-03-05 07:08:09 UTC)), "2024-03-05 07:08:09 UTC");
    }

    #[test]
    fn report_is_self_contained() {
        let html = assemble_report(
            &doc(),
            "Test <Novel>",
            datetime!(2024-01-01 00:00:00 UTC),
            &Config::default(),
        );
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Test &lt;Novel&gt; - Analysis report"));
        for section in Section::ALL {
            assert!(html.contains(&format!("id=\"{}\"", section.mount_id())));
        }
        assert!(html.contains("id=\"quickStats\""));
        assert!(html.contains("viewBox=\"0 0 1200 800\""));
        assert_eq!(html.matches("<script").count(), 1);
        assert!(!html.contains("fetch("));
        assert!(html.contains("2024-01-01 00:00:00 UTC"));
    }

    #[test]
    fn panels_are_visible_without_scripts() {
        let html = assemble_report(&doc(), "T", datetime!(2024-01-01 00:00:00 UTC), &Config::default());
        let head = &html[..html.find("</head>").unwrap()];
        assert!(head.contains("<noscript><style>[x-cloak] { display: block !important; }"));
        assert_eq!(html.matches(" x-cloak").count(), Section::ALL.len() - 1);
    }

    #[test]
    fn elements_tab_is_present() {
        let mut doc = doc();
        doc.lewd_elements_summary = Some("Foot play".to_string());
        let html = assemble_report(&doc, "T", datetime!(2024-01-01 00:00:00 UTC), &Config::default());
        assert!(html.contains("tab = 'elements'"));
        let panel = &html[html.find("id=\"lewdElements\"").unwrap()..];
        assert!(panel.contains("Foot play"));
    }
}
