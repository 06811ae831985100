//! Password generator

use super::{parse_input, Tool, ToolError};
use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};

/// Upper bound on the length accepted, so a typo cannot allocate gigabytes
pub const MAX_PASSWORD_LENGTH: u64 = 1 << 20;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

fn default_length() -> u64 {
    12
}

fn default_include_symbols() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeneratePasswordInput {
    #[serde(default = "default_length")]
    length: u64,
    #[serde(default = "default_include_symbols")]
    include_symbols: bool,
}

fn character_pool(include_symbols: bool) -> Vec<char> {
    let mut pool: Vec<char> = LOWERCASE
        .chars()
        .chain(UPPERCASE.chars())
        .chain(DIGITS.chars())
        .collect();
    if include_symbols {
        pool.extend(SYMBOLS.chars());
    }
    pool
}

fn generate<R: Rng + ?Sized>(length: usize, include_symbols: bool, rng: &mut R) -> String {
    let pool = character_pool(include_symbols);
    (0..length).filter_map(|_| pool.choose(rng)).collect()
}

/// Random password tool backed by the operating system RNG
pub struct GeneratePasswordTool;

#[async_trait]
impl Tool for GeneratePasswordTool {
    fn name(&self) -> &'static str {
        "generate_password"
    }

    fn description(&self) -> String {
        "Generate a random password from letters and digits, optionally with symbols.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "length": {
                    "type": "integer",
                    "description": "Number of characters",
                    "default": 12,
                    "minimum": 0,
                    "maximum": MAX_PASSWORD_LENGTH
                },
                "include_symbols": {
                    "type": "boolean",
                    "description": "Include punctuation symbols",
                    "default": true
                }
            }
        })
    }

    async fn run(&self, input: Value) -> Result<String, ToolError> {
        let input: GeneratePasswordInput = parse_input(input)?;
        let length = Some(input.length)
            .filter(|len| *len <= MAX_PASSWORD_LENGTH)
            .and_then(|len| usize::try_from(len).ok())
            .ok_or_else(|| {
                ToolError::invalid_input(format!(
                    "length must be at most {MAX_PASSWORD_LENGTH}"
                ))
            })?;

        let password = generate(length, input.include_symbols, &mut OsRng);
        Ok(format!("Generated password: {password}"))
    }
}
