use super::ids::GroupId;
use crate::core::chem::elements::Element;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of compounds described by one elemental system record.
pub const PAIR_SIZE: usize = 2;

/// Two-slot stability labels of a compound pair, one binary value per member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StabilityVector(pub [u8; PAIR_SIZE]);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StabilityParseError {
    #[error("Stability vector '{0}' must be enclosed in square brackets")]
    MissingBrackets(String),
    #[error("Stability vector '{value}' must have exactly {expected} entries, found {found}")]
    WrongLength {
        value: String,
        expected: usize,
        found: usize,
    },
    #[error("Stability vector entry '{0}' is not a binary value (0 or 1)")]
    NotBinary(String),
}

impl StabilityVector {
    pub fn new(first: u8, second: u8) -> Self {
        Self([first, second])
    }

    pub fn slot(&self, slot: usize) -> u8 {
        self.0[slot]
    }
}

fn parse_binary(token: &str) -> Result<u8, StabilityParseError> {
    let value: f64 = token
        .trim()
        .parse()
        .map_err(|_| StabilityParseError::NotBinary(token.trim().to_string()))?;
    if value == 0.0 {
        Ok(0)
    } else if value == 1.0 {
        Ok(1)
    } else {
        Err(StabilityParseError::NotBinary(token.trim().to_string()))
    }
}

impl FromStr for StabilityVector {
    type Err = StabilityParseError;

    /// Accepts `[1, 0]` as well as the float form `[1.0, 0.0]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| StabilityParseError::MissingBrackets(trimmed.to_string()))?;

        let tokens: Vec<&str> = inner
            .split(',')
            .filter(|token| !token.trim().is_empty())
            .collect();
        if tokens.len() != PAIR_SIZE {
            return Err(StabilityParseError::WrongLength {
                value: trimmed.to_string(),
                expected: PAIR_SIZE,
                found: tokens.len(),
            });
        }

        Ok(Self([parse_binary(tokens[0])?, parse_binary(tokens[1])?]))
    }
}

impl fmt::Display for StabilityVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0[0], self.0[1])
    }
}

/// One parsed row of the input table: an elemental system and what is known about it.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemRecord {
    /// Index of the originating row in the record table.
    pub row: usize,
    pub element_a: Element,
    pub element_b: Element,
    pub stability: Option<StabilityVector>,
    pub group: Option<GroupId>,
    /// Values of the pre-supplied feature columns; `None` for empty cells.
    pub features: Vec<Option<f64>>,
}

impl SystemRecord {
    pub fn new(row: usize, element_a: Element, element_b: Element) -> Self {
        Self {
            row,
            element_a,
            element_b,
            stability: None,
            group: None,
            features: Vec::new(),
        }
    }

    pub fn with_stability(mut self, stability: StabilityVector) -> Self {
        self.stability = Some(stability);
        self
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    pub fn has_noble_gas(&self) -> bool {
        self.element_a.is_noble_gas() || self.element_b.is_noble_gas()
    }
}
