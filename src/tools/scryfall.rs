//! Magic: The Gathering card database tools backed by the Scryfall API

use super::{parse_input, Tool, ToolError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::sync::Arc;

// ============================================================================
// Client
// ============================================================================

/// Thin async client for the card database endpoints the tools need
pub struct ScryfallClient {
    client: Client,
    base_url: String,
}

impl ScryfallClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up a card by name, fuzzy or exact
    pub async fn card_named(&self, name: &str, fuzzy: bool) -> Result<Card, ToolError> {
        let mode = if fuzzy { "fuzzy" } else { "exact" };
        self.get("/cards/named", &[(mode, name)]).await
    }

    pub async fn random_card(&self) -> Result<Card, ToolError> {
        self.get("/cards/random", &[]).await
    }

    pub async fn set(&self, code: &str) -> Result<CardSet, ToolError> {
        self.get(&format!("/sets/{code}"), &[]).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ToolError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(url = %url, "Card database request");

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| ToolError::from_request(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::failed(format!("Failed to read response: {e}")))?;

        parse_response(status.as_u16(), &body)
    }
}

/// Decode a card database response, mapping its error objects
fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ToolError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ScryfallError>(body)
            .map_or_else(|_| body.to_string(), |e| e.details);
        return Err(ToolError::Upstream { status, message });
    }

    serde_json::from_str(body)
        .map_err(|e| ToolError::failed(format!("Failed to parse card database response: {e}")))
}

#[derive(Debug, Deserialize)]
struct ScryfallError {
    details: String,
}

// ============================================================================
// Card and set models
// ============================================================================

/// One face of a card; double-faced cards carry two
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardFace {
    pub name: String,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    #[serde(flatten)]
    pub face: CardFace,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
    pub scryfall_uri: Option<String>,
    #[serde(default)]
    pub card_faces: Vec<CardFace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardSet {
    pub name: String,
    pub code: String,
    pub set_type: Option<String>,
    pub released_at: Option<String>,
    pub card_count: Option<u32>,
    pub scryfall_uri: Option<String>,
}

fn render_face(out: &mut String, face: &CardFace) {
    let _ = write!(out, "**{}**", face.name);
    if let Some(cost) = face.mana_cost.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(out, " {cost}");
    }
    out.push('\n');
    if let Some(type_line) = &face.type_line {
        let _ = writeln!(out, "{type_line}");
    }
    if let Some(text) = face.oracle_text.as_deref().filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "{text}");
    }
    match (&face.power, &face.toughness, &face.loyalty) {
        (Some(power), Some(toughness), _) => {
            let _ = writeln!(out, "{power}/{toughness}");
        }
        (_, _, Some(loyalty)) => {
            let _ = writeln!(out, "Loyalty: {loyalty}");
        }
        _ => {}
    }
}

impl Card {
    /// Human-readable card summary
    pub fn render(&self) -> String {
        let mut out = String::new();

        if self.face.oracle_text.is_none() && !self.card_faces.is_empty() {
            let _ = writeln!(out, "**{}**", self.face.name);
            for face in &self.card_faces {
                out.push('\n');
                render_face(&mut out, face);
            }
        } else {
            render_face(&mut out, &self.face);
        }

        out.push('\n');
        if let Some(set_name) = &self.set_name {
            let _ = writeln!(out, "Set: {set_name}");
        }
        if let Some(rarity) = &self.rarity {
            let _ = writeln!(out, "Rarity: {rarity}");
        }
        if let Some(uri) = &self.scryfall_uri {
            let _ = writeln!(out, "More info: {uri}");
        }

        out.trim_end().to_string()
    }
}

impl CardSet {
    pub fn render(&self) -> String {
        let mut out = format!("**{}** ({})\n", self.name, self.code.to_uppercase());
        if let Some(set_type) = &self.set_type {
            let _ = writeln!(out, "Type: {}", set_type.replace('_', " "));
        }
        if let Some(released) = &self.released_at {
            let _ = writeln!(out, "Released: {released}");
        }
        if let Some(count) = self.card_count {
            let _ = writeln!(out, "Cards: {count}");
        }
        if let Some(uri) = &self.scryfall_uri {
            let _ = writeln!(out, "More info: {uri}");
        }
        out.trim_end().to_string()
    }
}

// ============================================================================
// Tools
// ============================================================================

fn default_fuzzy() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct CardNameInput {
    card_name: String,
    #[serde(default = "default_fuzzy")]
    fuzzy: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RandomCardInput {}

#[derive(Debug, Deserialize)]
pub(crate) struct SetInfoInput {
    set_code: String,
}

/// Card lookup by name
pub struct SearchCardByNameTool {
    scryfall: Arc<ScryfallClient>,
}

impl SearchCardByNameTool {
    pub fn new(scryfall: Arc<ScryfallClient>) -> Self {
        Self { scryfall }
    }
}

#[async_trait]
impl Tool for SearchCardByNameTool {
    fn name(&self) -> &'static str {
        "search_card_by_name"
    }

    fn description(&self) -> String {
        "Look up a Magic: The Gathering card by name and show its rules text.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["card_name"],
            "properties": {
                "card_name": {
                    "type": "string",
                    "description": "Card name, partial names allowed when fuzzy"
                },
                "fuzzy": {
                    "type": "boolean",
                    "description": "Allow approximate name matches",
                    "default": true
                }
            }
        })
    }

    async fn run(&self, input: Value) -> Result<String, ToolError> {
        let input: CardNameInput = parse_input(input)?;
        if input.card_name.trim().is_empty() {
            return Err(ToolError::invalid_input("card_name is empty"));
        }
        let card = self
            .scryfall
            .card_named(&input.card_name, input.fuzzy)
            .await?;
        Ok(card.render())
    }
}

/// Random card
pub struct GetRandomCardTool {
    scryfall: Arc<ScryfallClient>,
}

impl GetRandomCardTool {
    pub fn new(scryfall: Arc<ScryfallClient>) -> Self {
        Self { scryfall }
    }
}

#[async_trait]
impl Tool for GetRandomCardTool {
    fn name(&self) -> &'static str {
        "get_random_card"
    }

    fn description(&self) -> String {
        "Show a random Magic: The Gathering card.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn run(&self, input: Value) -> Result<String, ToolError> {
        let _: RandomCardInput = parse_input(input)?;
        let card = self.scryfall.random_card().await?;
        Ok(card.render())
    }
}

/// Set lookup by set code
pub struct GetSetInfoTool {
    scryfall: Arc<ScryfallClient>,
}

impl GetSetInfoTool {
    pub fn new(scryfall: Arc<ScryfallClient>) -> Self {
        Self { scryfall }
    }
}

#[async_trait]
impl Tool for GetSetInfoTool {
    fn name(&self) -> &'static str {
        "get_set_info"
    }

    fn description(&self) -> String {
        "Show details about a Magic: The Gathering set given its set code (e.g., DOM).".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["set_code"],
            "properties": {
                "set_code": {
                    "type": "string",
                    "description": "Three to five character set code"
                }
            }
        })
    }

    async fn run(&self, input: Value) -> Result<String, ToolError> {
        let input: SetInfoInput = parse_input(input)?;
        let code = input.set_code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(ToolError::invalid_input(format!(
                "'{}' is not a set code",
                input.set_code
            )));
        }
        let set = self.scryfall.set(code).await?;
        Ok(set.render())
    }
}
