use crate::markup::{Element, Markup};
use crate::model::{AnalysisDocument, Character, Gender};

use super::{empty_state, labeled, or_unknown};

/// A female roster entry with its display rank. Computed per render and never
/// written back to the character.
#[derive(Debug, Clone)]
pub struct RankedCharacter<'a> {
    pub character: &'a Character,
    pub rank: Option<usize>,
}

/// Sorts by score descending (stable, missing scores last) and assigns 1-based
/// consecutive ranks to characters with a positive score only.
pub fn rank_female_roster<'a, I>(females: I) -> Vec<RankedCharacter<'a>>
where
    I: IntoIterator<Item = &'a Character>,
{
    let mut sorted: Vec<&Character> = females.into_iter().collect();
    sorted.sort_by(|a, b| b.sort_score().total_cmp(&a.sort_score()));

    let mut next_rank = 1;
    sorted
        .into_iter()
        .map(|character| {
            let rank = character.score().map(|_| {
                let rank = next_rank;
                next_rank += 1;
                rank
            });
            RankedCharacter { character, rank }
        })
        .collect()
}

/// Badge color tier for a score.
pub fn lewdness_color(score: f64) -> &'static str {
    if score >= 90.0 {
        "#ef4444"
    } else if score >= 70.0 {
        "#f97316"
    } else if score >= 50.0 {
        "#eab308"
    } else if score >= 30.0 {
        "#22c55e"
    } else {
        "#6366f1"
    }
}

const UNSCORED_COLOR: &str = "#4b5563";

fn fmt_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{score:.1}")
    }
}

fn role_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "Male",
        Gender::Female => "Female",
        Gender::Unknown => "Unknown",
    }
}

fn char_card(character: &Character, rank: Option<Option<usize>>) -> Element {
    let class = character.gender.css_class();
    let mut header = Element::new("div")
        .class("char-header")
        .child(
            Element::new("div")
                .class(format!("char-avatar {class}"))
                .text(character.gender.glyph()),
        )
        .child(
            Element::new("div")
                .class("char-info")
                .child(Element::new("div").class("char-name").text(character.name.clone()))
                .child(Element::new("div").class("char-role").raw(role_label(character.gender))),
        );

    let score = character.score();
    if let Some(rank) = rank {
        let (color, rank_text, score_text) = match score {
            Some(score) => (
                lewdness_color(score),
                format!("#{}", rank.map(|r| r.to_string()).unwrap_or_else(|| "?".to_string())),
                fmt_score(score),
            ),
            None => (UNSCORED_COLOR, "-".to_string(), "?".to_string()),
        };
        header = header.child(
            Element::new("div")
                .class("lewdness-badge")
                .attr("style", format!("background: {color}"))
                .child(Element::new("span").class("lewdness-rank").text(rank_text))
                .child(Element::new("span").class("lewdness-score").text(score_text)),
        );
    }

    let mut details = Element::new("div")
        .class("char-details")
        .child(labeled("char-detail", "Identity", or_unknown(character.identity.as_deref())))
        .child(labeled("char-detail", "Personality", or_unknown(character.personality.as_deref())))
        .child(labeled(
            "char-detail sexual",
            "Preferences",
            or_unknown(character.sexual_preferences.as_deref()),
        ));
    if rank.is_some() && score.is_some() {
        if let Some(analysis) = character.lewdness_analysis.as_deref().filter(|a| !a.trim().is_empty()) {
            details = details.child(labeled("char-detail lewdness", "Score analysis", analysis));
        }
    }

    Element::new("div")
        .class(format!("char-card {class}"))
        .child(header)
        .child(details)
}

fn roster_section(title: String, cards: Vec<Element>) -> Element {
    Element::new("div")
        .class("multi-char-section")
        .child(Element::new("h3").text(title))
        .child(Element::new("div").class("char-grid").children(cards))
}

/// Character cards split by gender; the female roster is ranked by score.
pub fn build_characters(doc: &AnalysisDocument) -> Markup {
    let chars = doc.characters();
    if chars.is_empty() {
        return empty_state("👥", "No character data");
    }

    let males: Vec<Element> = chars
        .iter()
        .filter(|c| c.gender == Gender::Male)
        .map(|c| char_card(c, None))
        .collect();
    let females: Vec<Element> = rank_female_roster(chars.iter().filter(|c| c.gender == Gender::Female))
        .into_iter()
        .map(|entry| char_card(entry.character, Some(entry.rank)))
        .collect();
    let others: Vec<Element> = chars
        .iter()
        .filter(|c| c.gender == Gender::Unknown)
        .map(|c| char_card(c, None))
        .collect();

    let mut sections = vec![
        roster_section(format!("Male characters ({})", males.len()), males),
        roster_section(format!("Female characters ({}) - score ranking", females.len()), females),
    ];
    if !others.is_empty() {
        sections.push(roster_section(format!("Other characters ({})", others.len()), others));
    }
    Markup::fragment(sections)
}
