//! Per-intent argument extraction from the raw utterance
//!
//! Extraction never fails. When a required argument cannot be found the
//! result is an instruction for the user instead of a tool call, so no
//! tool is ever invoked with garbage input.

use super::Intent;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::LazyLock;

pub const DICE_NOTATION_HINT: &str = "Please specify dice notation (e.g., '2d20k1')";
pub const SET_CODE_HINT: &str = "Please specify a set code (e.g., 'set DOM')";
pub const DEFAULT_PASSWORD_LENGTH: u64 = 12;

const DEFAULT_NUM_ROLLS: u32 = 1;

/// Question phrasing stripped from card lookups, applied in this order
const CARD_PREFIXES: &[&str] = &[
    r"what does the card\s+",
    r"what does\s+",
    r"find the card\s+",
    r"find\s+",
    r"search for the card\s+",
    r"search for\s+",
    r"card\s+",
    r"magic card\s+",
    r"mtg card\s+",
    r"show me\s+",
    r"tell me about\s+",
];

/// Trailing phrasing stripped after the prefixes, applied in this order
const CARD_SUFFIXES: &[&str] = &[
    r"\s+do$",
    r"\s+do\?$",
    r"\s+work$",
    r"\s+work\?$",
    r"\s+do\s+.*$",
    r"\s+work\s+.*$",
];

static DICE_NOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+d[0-9]+(?:k[0-9]+)?").expect("dice pattern is valid"));

static SET_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)set\s+(\w+)").expect("set pattern is valid"));

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

static CARD_CLEANUP: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    CARD_PREFIXES
        .iter()
        .chain(CARD_SUFFIXES)
        .map(|pattern| Regex::new(&format!("(?i){pattern}")).expect("card pattern is valid"))
        .collect()
});

/// A tool call derived from one utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInvocationRequest {
    pub intent: Intent,
    pub arguments: Map<String, Value>,
}

impl ToolInvocationRequest {
    pub fn new(intent: Intent, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { intent, arguments }
    }

    pub fn tool_name(&self) -> &'static str {
        self.intent.tool_name()
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Arguments as a JSON object, the shape tools accept
    pub fn input(&self) -> Value {
        Value::Object(self.arguments.clone())
    }
}

/// Outcome of argument extraction
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Arguments found, invoke the tool
    Invoke(ToolInvocationRequest),
    /// A required argument is missing; reply with this instruction instead
    ShortCircuit(String),
}

/// Derive the arguments for `intent` from `utterance`.
pub fn extract(intent: Intent, utterance: &str) -> Extraction {
    let arguments = match intent {
        Intent::WebSearch => json!({ "query": utterance }),
        Intent::RollDice => match DICE_NOTATION.find(utterance) {
            Some(notation) => json!({
                "notation": notation.as_str(),
                "num_rolls": DEFAULT_NUM_ROLLS,
            }),
            None => return Extraction::ShortCircuit(DICE_NOTATION_HINT.to_string()),
        },
        Intent::SearchCardByName => json!({
            "card_name": card_name(utterance),
            "fuzzy": true,
        }),
        Intent::GetRandomCard => json!({}),
        Intent::GetSetInfo => match SET_CODE.captures(utterance).and_then(|c| c.get(1)) {
            Some(code) => json!({ "set_code": code.as_str() }),
            None => return Extraction::ShortCircuit(SET_CODE_HINT.to_string()),
        },
        Intent::GeneratePassword => json!({
            "length": password_length(utterance),
            // Symbols are always included, whatever the utterance says
            "include_symbols": true,
        }),
    };

    Extraction::Invoke(ToolInvocationRequest::new(intent, arguments))
}

/// Strip question phrasing around a card name: "What does the card Opt do?"
/// becomes "opt".
fn card_name(utterance: &str) -> String {
    let name = CARD_CLEANUP
        .iter()
        .fold(utterance.to_lowercase(), |name, pattern| {
            pattern.replace_all(&name, "").into_owned()
        });
    name.trim().to_string()
}

/// First run of digits, or the default when absent or out of range
fn password_length(utterance: &str) -> u64 {
    DIGITS
        .find(utterance)
        .and_then(|digits| digits.as_str().parse().ok())
        .unwrap_or(DEFAULT_PASSWORD_LENGTH)
}
