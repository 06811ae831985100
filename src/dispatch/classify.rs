//! Keyword-cascade intent classification

use super::Intent;

/// Where a matched keyword group sends the turn
#[derive(Debug, Clone, Copy)]
enum Route {
    To(Intent),
    /// Card-database query; narrowed further by `classify_card`
    Card,
}

/// Keyword groups in precedence order, first match wins.
///
/// Order encodes precedence: an utterance mentioning both "search" and
/// "card" is a web search.
const RULES: &[(&[&str], Route)] = &[
    (
        &["search", "find", "web", "look up"],
        Route::To(Intent::WebSearch),
    ),
    (&["dice", "roll", "random"], Route::To(Intent::RollDice)),
    (&["card", "magic", "mtg", "scryfall"], Route::Card),
    (
        &["password", "generate"],
        Route::To(Intent::GeneratePassword),
    ),
];

/// Intent used when no keyword group matches
pub const DEFAULT_INTENT: Intent = Intent::WebSearch;

/// Map an utterance to exactly one intent. Never fails.
pub fn classify(utterance: &str) -> Intent {
    let query = utterance.to_lowercase();

    let Some((_, route)) = RULES
        .iter()
        .find(|(keywords, _)| contains_any(&query, keywords))
    else {
        return DEFAULT_INTENT;
    };

    match route {
        Route::To(intent) => *intent,
        Route::Card => classify_card(&query),
    }
}

/// Narrow a card-database query: "random" beats "set", anything else is a
/// lookup by name.
pub fn classify_card(utterance: &str) -> Intent {
    let query = utterance.to_lowercase();
    if query.contains("random") {
        Intent::GetRandomCard
    } else if query.contains("set") {
        Intent::GetSetInfo
    } else {
        Intent::SearchCardByName
    }
}

fn contains_any(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| query.contains(keyword))
}
