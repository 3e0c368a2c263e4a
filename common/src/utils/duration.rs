//! Parses Go-style duration strings such as `10s`, `500ms`, `1.5s` or `1m30s`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,
    #[error("missing unit in duration: {0}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration: {input}")]
    UnknownUnit { unit: String, input: String },
    #[error("invalid number in duration: {0}")]
    InvalidNumber(String),
    #[error("duration out of range: {0}")]
    OutOfRange(String),
}

/// Parses a sequence of `<number><unit>` terms.
///
/// Units are `ns`, `us`/`µs`, `ms`, `s`, `m` and `h`; numbers may carry a
/// fraction. A bare `0` is accepted.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let s: &str = input.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total: f64 = 0.0;
    let mut rest: &str = s;

    while !rest.is_empty() {
        let number_len: usize = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            return Err(DurationParseError::InvalidNumber(input.to_string()));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| DurationParseError::InvalidNumber(input.to_string()))?;
        if !value.is_finite() {
            return Err(DurationParseError::OutOfRange(input.to_string()));
        }

        let unit_len: usize = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        if unit.is_empty() {
            return Err(DurationParseError::MissingUnit(input.to_string()));
        }

        total += value * unit_in_seconds(unit).ok_or_else(|| DurationParseError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;
        rest = next;
    }

    Duration::try_from_secs_f64(total).map_err(|_| DurationParseError::OutOfRange(input.to_string()))
}

fn unit_in_seconds(unit: &str) -> Option<f64> {
    match unit {
        "ns" => Some(1e-9),
        "us" | "µs" => Some(1e-6),
        "ms" => Some(1e-3),
        "s" => Some(1.0),
        "m" => Some(60.0),
        "h" => Some(3600.0),
        _ => None,
    }
}
