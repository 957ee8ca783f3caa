use std::path::Path;

use story_graph_report::layout::CanvasSize;
use story_graph_report::sections::Section;
use story_graph_report::{
    AnalysisDocument, Config, LayoutConfig, MountRegistry, QuickStats, RenderConfig, RenderMode, Theme, ThemeMode,
    assemble_report, render_graph, render_live, report_filename,
};
use time::macros::datetime;

fn load_fixture(name: &str) -> AnalysisDocument {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    AnalysisDocument::from_json(&input).expect("fixture parse failed")
}

fn report(doc: &AnalysisDocument) -> String {
    assemble_report(doc, "Azure Sect", datetime!(2024-06-01 12:00:00 UTC), &Config::default())
}

/// Markup of one section panel in an assembled report.
fn panel<'a>(html: &'a str, section: Section) -> &'a str {
    let marker = format!("id=\"{}\"", section.mount_id());
    let start = html.find(&marker).unwrap_or_else(|| panic!("missing panel {marker}"));
    let rest = &html[start..];
    let end = rest.find("</section>").expect("unterminated panel");
    &rest[..end]
}

#[test]
fn full_report_has_every_section() {
    let doc = load_fixture("analysis_full.json");
    let html = report(&doc);
    for section in Section::ALL {
        let body = panel(&html, section);
        assert!(!body.contains("empty-state"), "{section:?} rendered empty");
    }
    assert!(html.contains("Azure Sect - Analysis report"));
    assert!(html.contains("2024-06-01 12:00:00 UTC"));
}

#[test]
fn female_roster_is_ranked_by_score() {
    let doc = load_fixture("analysis_full.json");
    let html = report(&doc);
    let characters = panel(&html, Section::Characters);
    let bai = characters.find("Bai Lian").unwrap();
    let su = characters.find("Su Mei").unwrap();
    let xiao = characters.find("Xiao Yu").unwrap();
    assert!(bai < su && su < xiao);
    assert!(characters.contains("Other characters (1)"));
    assert!(characters.contains("initiates most scenes"));
}

#[test]
fn graph_drops_unknown_endpoints_but_lists_them() {
    let doc = load_fixture("analysis_full.json");
    let html = report(&doc);
    let graph = panel(&html, Section::Graph);
    let svg_start = graph.find("<svg").unwrap();
    let svg_end = graph.find("</svg>").unwrap();
    let svg = &graph[svg_start..svg_end];
    assert!(svg.contains("viewBox=\"0 0 1200 800\""));
    assert_eq!(svg.matches("<line ").count(), 5);
    assert_eq!(svg.matches("class=\"graph-node\"").count(), 5);
    assert!(!svg.contains("Wandering Monk"));
    assert!(!svg.contains("Xiao Yu"));
    assert!(graph[svg_end..].contains("Wandering Monk"));
}

#[test]
fn statistics_cap_listed_scenes() {
    let doc = load_fixture("analysis_full.json");
    let html = report(&doc);
    let count = panel(&html, Section::IntimacyCount);
    assert_eq!(count.matches("class=\"scene-item\"").count(), 15);
    assert!(count.contains("+5 more"));
    assert!(count.contains(">20<"));
}

#[test]
fn sensitive_flags_are_sorted_with_summary() {
    let doc = load_fixture("analysis_full.json");
    let html = report(&doc);
    let flags = panel(&html, Section::SensitiveFlags);
    let summary = flags.find("One high-severity infidelity arc").unwrap();
    let high = flags.find("coerced").unwrap();
    let medium = flags.find("sells out").unwrap();
    let low = flags.find("sacrifices").unwrap();
    assert!(summary < high && high < medium && medium < low);
}

#[test]
fn quick_stats_from_fixture() {
    let doc = load_fixture("analysis_full.json");
    let stats = QuickStats::from_document(&doc);
    assert_eq!(stats.intimacy_total, 20);
    assert_eq!(stats.relationship_pairs, 5);
    assert_eq!(stats.characters, 6);
    let html = stats.to_markup().render();
    assert!(html.contains("1.5M"));
}

#[test]
fn empty_document_renders_empty_states() {
    let doc = load_fixture("analysis_empty.json");
    let html = report(&doc);
    assert_eq!(html.matches("class=\"empty-state\"").count(), Section::ALL.len());
    assert!(panel(&html, Section::Graph).contains("No relationship data"));
    assert!(panel(&html, Section::SensitiveFlags).contains("No sensitive content detected"));
    assert!(!html.contains("<svg"));
}

#[test]
fn export_geometry_is_independent_of_display_size() {
    let doc = load_fixture("analysis_full.json");
    let render = |width: f32, height: f32| {
        render_graph(
            &doc,
            RenderMode::Export {
                display: CanvasSize::new(width, height),
                mode: ThemeMode::Dark,
            },
            &Theme::light(),
            &LayoutConfig::default(),
            &RenderConfig::default(),
        )
        .unwrap()
    };
    let small = render(800.0, 600.0);
    let large = render(1600.0, 1200.0);
    assert_eq!(small.nodes, large.nodes);
    assert_eq!(small.edges, large.edges);
    let small_svg = small.to_svg();
    let large_svg = large.to_svg();
    assert!(small_svg.contains("width=\"800\" height=\"600\""));
    assert!(large_svg.contains("width=\"1600\" height=\"1200\""));
    assert_eq!(
        small_svg.replace("width=\"800\" height=\"600\"", ""),
        large_svg.replace("width=\"1600\" height=\"1200\"", "")
    );
}

#[test]
fn live_render_matches_export_sections() {
    let doc = load_fixture("analysis_full.json");
    let mut host = MountRegistry::with_all_sections(Some(CanvasSize::new(640.0, 480.0)));
    render_live(&doc, &mut host, &Config::default());
    let graph = host.content(Section::Graph.mount_id()).unwrap();
    assert!(graph.contains("viewBox=\"0 0 640 480\""));
    let html = report(&doc);
    let exported = panel(&html, Section::Evolution);
    let live = host.content(Section::Evolution.mount_id()).unwrap();
    assert!(exported.ends_with(live));
}

#[test]
fn report_file_name() {
    assert_eq!(report_filename("Azure Sect.txt", "html"), "Azure Sect_report.html");
    assert_eq!(report_filename("a/b", "html"), "a_b_report.html");
}

#[test]
fn lewd_elements_panel_lists_cards_in_order() {
    let doc = load_fixture("analysis_full.json");
    let html = report(&doc);
    let elements = panel(&html, Section::LewdElements);
    assert!(elements.contains("Foot play recurs"));
    assert_eq!(elements.matches("class=\"element-card\"").count(), 2);
    assert!(elements.find("Foot fetish").unwrap() < elements.find("Uniform").unwrap());
    assert!(elements.contains("Bai Lian&#39;s feet"));

    let empty = report(&load_fixture("analysis_empty.json"));
    assert!(panel(&empty, Section::LewdElements).contains("No related elements detected"));
}
