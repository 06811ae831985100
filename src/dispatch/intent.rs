//! The closed set of capabilities a turn can be routed to

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend capability selected for a user turn.
///
/// Adding a capability means extending this enum, the classifier rules
/// and the extractor rules together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    WebSearch,
    RollDice,
    SearchCardByName,
    GetRandomCard,
    GetSetInfo,
    GeneratePassword,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::WebSearch,
        Intent::RollDice,
        Intent::SearchCardByName,
        Intent::GetRandomCard,
        Intent::GetSetInfo,
        Intent::GeneratePassword,
    ];

    /// Registry key of the tool serving this intent
    pub fn tool_name(self) -> &'static str {
        match self {
            Intent::WebSearch => "web_search",
            Intent::RollDice => "roll_dice",
            Intent::SearchCardByName => "search_card_by_name",
            Intent::GetRandomCard => "get_random_card",
            Intent::GetSetInfo => "get_set_info",
            Intent::GeneratePassword => "generate_password",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}
