use binstab::engine::config::FormulaPair;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Invalid delimiter '{0}'. Expected a single ASCII character or one of 'tab', 'comma', 'semicolon'."
    )]
    InvalidDelimiter(String),

    #[error("Invalid formula pair '{0}'. Expected 'A:B' with positive integers (e.g., '2:1').")]
    InvalidFormulaPair(String),

    #[error("Expected exactly {expected} formula pairs in '{value}', found {found}.")]
    FormulaPairCount {
        value: String,
        expected: usize,
        found: usize,
    },
}

pub fn parse_delimiter(value: &str) -> Result<u8, ParseError> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        "semicolon" => Ok(b';'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() && !byte.is_ascii_alphanumeric() => Ok(*byte),
            _ => Err(ParseError::InvalidDelimiter(value.to_string())),
        },
    }
}

pub fn parse_formula_pair(value: &str) -> Result<FormulaPair, ParseError> {
    let invalid = || ParseError::InvalidFormulaPair(value.to_string());
    let (a, b) = value.trim().split_once(':').ok_or_else(invalid)?;
    let a: u32 = a.trim().parse().map_err(|_| invalid())?;
    let b: u32 = b.trim().parse().map_err(|_| invalid())?;
    if a == 0 || b == 0 {
        return Err(invalid());
    }
    Ok(FormulaPair::new(a, b))
}

/// Parses `"2:1,1:2"` into the two formula pairs of a conversion.
pub fn parse_formula_pairs(value: &str) -> Result<[FormulaPair; 2], ParseError> {
    let pairs = value
        .split(',')
        .map(parse_formula_pair)
        .collect::<Result<Vec<_>, _>>()?;
    <[FormulaPair; 2]>::try_from(pairs).map_err(|pairs| ParseError::FormulaPairCount {
        value: value.to_string(),
        expected: 2,
        found: pairs.len(),
    })
}
