//! Presentation helpers shared by the views.
//!
//! Pure functions: gender styling, relative formatting for the detail
//! panel and local name search over the loaded view.

use std::collections::HashSet;

use serde::Serialize;

use crate::api::{PersonDetails, Relative};
use crate::graph::Gender;

/// Suggestions shown from the loaded view without asking the server.
pub const LOCAL_SEARCH_LIMIT: usize = 5;

/// Placeholder for an empty relative list.
pub const EMPTY_LIST: &str = "—";

/// Node fill colour.
pub fn node_fill(gender: Gender) -> &'static str {
    match gender {
        Gender::Female => "#ffe0e0",
        Gender::Male => "#e0e0ff",
        Gender::Unknown => "#f0f0f0",
    }
}

/// Symbol next to a name in the header of the detail panel.
pub fn gender_symbol(gender: Gender) -> &'static str {
    match gender {
        Gender::Female => "♀",
        Gender::Male => "♂",
        Gender::Unknown => "",
    }
}

/// `"Name (♀)"` for women, `"Name (♂)"` otherwise.
pub fn relative_label(name: &str, gender: Gender) -> String {
    let symbol = if gender == Gender::Female { "♀" } else { "♂" };
    format!("{name} ({symbol})")
}

/// Comma-joined list, or [`EMPTY_LIST`].
pub fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        EMPTY_LIST.to_string()
    } else {
        items.join(", ")
    }
}

fn labels(details: &Option<Vec<Relative>>, names: &[String]) -> Vec<String> {
    match details {
        Some(relatives) => relatives.iter().map(|r| relative_label(&r.name, r.gender)).collect(),
        None => names.to_vec(),
    }
}

/// Detail panel content, ready to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsView {
    pub name: String,
    pub gender: String,
    pub symbol: &'static str,
    pub parents: String,
    pub children: String,
    pub spouses: String,
}

impl DetailsView {
    pub fn new(details: &PersonDetails) -> Self {
        Self {
            name: if details.name.is_empty() {
                "Inconnu(e)".to_string()
            } else {
                details.name.clone()
            },
            gender: details.gender.label().to_string(),
            symbol: gender_symbol(details.gender),
            parents: format_list(&labels(&details.parents_details, &details.parents)),
            children: format_list(&labels(&details.children_details, &details.children)),
            spouses: format_list(&labels(&details.spouses_details, &details.spouses)),
        }
    }
}

/// Case-insensitive substring search, first matches in input order.
///
/// Names repeat in the tree view, so each name is returned once.
pub fn search_names<'a, I>(names: I, query: &str, limit: usize) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .filter(|name| seen.insert(*name))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_symbol() {
        assert_eq!(node_fill(Gender::Female), "#ffe0e0");
        assert_eq!(node_fill(Gender::Male), "#e0e0ff");
        assert_eq!(node_fill(Gender::Unknown), "#f0f0f0");
        assert_eq!(gender_symbol(Gender::Unknown), "");
    }

    #[test]
    fn test_relative_label() {
        assert_eq!(relative_label("Marie", Gender::Female), "Marie (♀)");
        assert_eq!(relative_label("Paul", Gender::Male), "Paul (♂)");
    }

    #[test]
    fn test_details_view_prefers_details() {
        let details = PersonDetails {
            name: "C".into(),
            gender: Gender::Female,
            parents: vec!["A".into()],
            parents_details: Some(vec![Relative {
                name: "A".into(),
                gender: Gender::Male,
            }]),
            children: vec!["K".into(), "L".into()],
            ..PersonDetails::default()
        };
        let view = DetailsView::new(&details);

        assert_eq!(view.symbol, "♀");
        assert_eq!(view.gender, "Femme");
        assert_eq!(view.parents, "A (♂)");
        assert_eq!(view.children, "K, L");
        assert_eq!(view.spouses, "—");
    }

    #[test]
    fn test_details_view_unnamed() {
        let view = DetailsView::new(&PersonDetails::default());
        assert_eq!(view.name, "Inconnu(e)");
    }

    #[test]
    fn test_search_names() {
        let names = ["Marie", "Jean-Marie", "Paul", "marius", "Marie", "Amaury", "Maria", "Rosemary"];
        let hits = search_names(names.iter().copied(), "MAR", LOCAL_SEARCH_LIMIT);
        assert_eq!(hits, vec!["Marie", "Jean-Marie", "marius", "Maria", "Rosemary"]);

        assert!(search_names(names.iter().copied(), "   ", 5).is_empty());
        assert!(search_names(names.iter().copied(), "zz", 5).is_empty());
    }
}
