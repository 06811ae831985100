//! Dice roller - evaluates `NdM` notation with an optional keep-highest suffix

use super::{parse_input, Tool, ToolError};
use async_trait::async_trait;
use rand::Rng;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const MAX_DICE: u32 = 100;
const MAX_SIDES: u32 = 1000;
const MAX_ROLLS: u32 = 20;

static NOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)d([0-9]+)(?:k([0-9]+))?$").expect("notation pattern is valid")
});

fn default_num_rolls() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub(crate) struct RollDiceInput {
    notation: String,
    #[serde(default = "default_num_rolls")]
    num_rolls: u32,
}

/// Parsed dice notation such as `2d20k1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceNotation {
    pub count: u32,
    pub sides: u32,
    /// Keep only the highest `keep` dice
    pub keep: Option<u32>,
}

impl FromStr for DiceNotation {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let captures = NOTATION.captures(&normalized).ok_or_else(|| {
            ToolError::invalid_input(format!("'{s}' is not dice notation (e.g., '2d20k1')"))
        })?;

        let number = |index: usize| -> Result<Option<u32>, ToolError> {
            captures
                .get(index)
                .map(|m| {
                    m.as_str()
                        .parse::<u32>()
                        .map_err(|_| ToolError::invalid_input(format!("'{}' is too large", m.as_str())))
                })
                .transpose()
        };

        let count = number(1)?.unwrap_or_default();
        let sides = number(2)?.unwrap_or_default();
        let keep = number(3)?;

        if !(1..=MAX_DICE).contains(&count) {
            return Err(ToolError::invalid_input(format!(
                "dice count must be between 1 and {MAX_DICE}"
            )));
        }
        if !(2..=MAX_SIDES).contains(&sides) {
            return Err(ToolError::invalid_input(format!(
                "dice must have between 2 and {MAX_SIDES} sides"
            )));
        }
        if let Some(keep) = keep {
            if !(1..=count).contains(&keep) {
                return Err(ToolError::invalid_input(format!(
                    "can only keep between 1 and {count} dice"
                )));
            }
        }

        Ok(Self { count, sides, keep })
    }
}

impl fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if let Some(keep) = self.keep {
            write!(f, "k{keep}")?;
        }
        Ok(())
    }
}

impl DiceNotation {
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| rng.gen_range(1..=self.sides))
            .collect();

        let kept = self.keep.map(|keep| {
            let mut sorted = rolls.clone();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            sorted.truncate(keep as usize);
            sorted
        });

        DiceRoll {
            notation: *self,
            rolls,
            kept,
        }
    }
}

/// Outcome of rolling one set of dice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    pub notation: DiceNotation,
    pub rolls: Vec<u32>,
    /// Highest dice kept, in descending order, when the notation has `k`
    pub kept: Option<Vec<u32>>,
}

impl DiceRoll {
    pub fn total(&self) -> u32 {
        self.kept.as_ref().unwrap_or(&self.rolls).iter().sum()
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.notation, self.rolls)?;
        if let Some(kept) = &self.kept {
            write!(f, " keep {kept:?}")?;
        }
        write!(f, " = {}", self.total())
    }
}

fn roll_many<R: Rng + ?Sized>(notation: DiceNotation, num_rolls: u32, rng: &mut R) -> String {
    (1..=num_rolls)
        .map(|i| format!("Roll {i}: {}", notation.roll(rng)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dice rolling tool
pub struct RollDiceTool;

#[async_trait]
impl Tool for RollDiceTool {
    fn name(&self) -> &'static str {
        "roll_dice"
    }

    fn description(&self) -> String {
        "Roll dice using standard notation: NdM rolls N dice with M sides, an optional kK keeps the highest K (e.g., 2d20k1 for advantage).".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["notation"],
            "properties": {
                "notation": {
                    "type": "string",
                    "description": "Dice notation such as 3d6 or 2d20k1"
                },
                "num_rolls": {
                    "type": "integer",
                    "description": "How many times to roll the notation",
                    "default": 1
                }
            }
        })
    }

    async fn run(&self, input: Value) -> Result<String, ToolError> {
        let input: RollDiceInput = parse_input(input)?;
        if !(1..=MAX_ROLLS).contains(&input.num_rolls) {
            return Err(ToolError::invalid_input(format!(
                "num_rolls must be between 1 and {MAX_ROLLS}"
            )));
        }
        let notation: DiceNotation = input.notation.parse()?;
        Ok(roll_many(notation, input.num_rolls, &mut rand::thread_rng()))
    }
}
