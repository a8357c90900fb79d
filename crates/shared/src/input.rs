use rand::Rng;

use crate::error::EngineError;

pub const RANDOM_VALUE_MIN: i64 = 100;
pub const RANDOM_VALUE_MAX: i64 = 999;

pub const DEFAULT_INPUT: &str = "15,14,13,12,11,10,9,8,7,6,5,4,3,2,1";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedInput {
    pub values: Vec<i64>,
    pub sanitized: String,
}

pub fn parse_sequence(raw: &str) -> ParsedInput {
    let mut text = raw.trim();
    let trailing_comma = text.ends_with(',');
    if trailing_comma {
        text = &text[..text.len() - 1];
    }

    let text = text.trim_matches(',');
    if text.is_empty() {
        return ParsedInput::default();
    }

    let mut values = Vec::new();
    for token in text.split(',').map(str::trim) {
        if token.is_empty() {
            break;
        }
        match token.parse::<i64>() {
            Ok(value) => values.push(value),
            Err(_) => break,
        }
    }

    let mut sanitized = format_sequence(&values);
    if trailing_comma && !values.is_empty() {
        sanitized.push(',');
    }

    ParsedInput { values, sanitized }
}

pub fn parse_sequence_strict(raw: &str) -> Result<Vec<i64>, EngineError> {
    let text = raw.trim().trim_matches(',');
    if text.is_empty() {
        return Ok(Vec::new());
    }

    text.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, token)| {
            token.parse::<i64>().map_err(|_| {
                EngineError::InvalidInput(format!("token {index} ('{token}') is not an integer"))
            })
        })
        .collect()
}

pub fn random_sequence<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<i64> {
    (0..size)
        .map(|_| rng.random_range(RANDOM_VALUE_MIN..=RANDOM_VALUE_MAX))
        .collect()
}

pub fn format_sequence(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
