//! Readers for the match source and the operation log source
//!
//! Both inputs are comma separated with one record per line:
//!
//! ```text
//! matchId,sideAMultiplier,sideBMultiplier,winner
//! playerId,OPERATION,matchId,coinAmount,betSide
//! ```
//!
//! Empty match id and side fields are allowed for non-bet operations, and the
//! trailing side field may be missing altogether. Blank lines are ignored.
//! Coin amounts must fit in 32 bits and multipliers must be finite.

use std::fs;
use std::path::Path;
use uuid::Uuid;
use crate::error::InputError;
use crate::match_registry::{Match, MatchRegistry};
use crate::operation::Operation;
use crate::types::{MatchResult, OperationKind, Side};

const MATCH_FIELDS: usize = 4;
const OPERATION_FIELDS: usize = 4;

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

fn parse_uuid(value: &str, field: &'static str, line: usize) -> Result<Uuid, InputError> {
    Uuid::parse_str(value).map_err(|_| InputError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}

fn parse_multiplier(value: &str, field: &'static str, line: usize) -> Result<f64, InputError> {
    let invalid = || InputError::InvalidField {
        line,
        field,
        value: value.to_string(),
    };
    let multiplier: f64 = value.parse().map_err(|_| invalid())?;
    if !multiplier.is_finite() {
        return Err(invalid());
    }
    Ok(multiplier)
}

/// Parse one match record; `line` is the 1-based line number used in errors
pub fn parse_match_line(text: &str, line: usize) -> Result<Match, InputError> {
    let fields = split_fields(text);
    if fields.len() < MATCH_FIELDS {
        return Err(InputError::FieldCount {
            line,
            expected: MATCH_FIELDS,
            found: fields.len(),
        });
    }

    let id = parse_uuid(fields[0], "match id", line)?;
    let side_a = parse_multiplier(fields[1], "side A multiplier", line)?;
    let side_b = parse_multiplier(fields[2], "side B multiplier", line)?;
    let result: MatchResult = fields[3]
        .parse()
        .map_err(|source| InputError::InvalidValue { line, source })?;

    Ok(Match::new(id, side_a, side_b, result))
}

/// Parse one operation record; `line` is the 1-based line number used in errors
///
/// Negative coin amounts are accepted here and rejected during replay.
pub fn parse_operation_line(text: &str, line: usize) -> Result<Operation, InputError> {
    let fields = split_fields(text);
    if fields.len() < OPERATION_FIELDS {
        return Err(InputError::FieldCount {
            line,
            expected: OPERATION_FIELDS,
            found: fields.len(),
        });
    }

    let player_id = parse_uuid(fields[0], "player id", line)?;
    let kind: OperationKind = fields[1]
        .parse()
        .map_err(|source| InputError::InvalidValue { line, source })?;
    let match_id = match fields[2] {
        "" => None,
        raw => Some(parse_uuid(raw, "match id", line)?),
    };
    let coin_amount: i32 = fields[3].parse().map_err(|_| InputError::InvalidField {
        line,
        field: "coin amount",
        value: fields[3].to_string(),
    })?;
    let side: Option<Side> = match fields.get(4).copied().unwrap_or("") {
        "" => None,
        raw => Some(raw.parse().map_err(|source| InputError::InvalidValue { line, source })?),
    };

    Ok(Operation {
        player_id,
        kind,
        match_id,
        coin_amount: i64::from(coin_amount),
        side,
    })
}

fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty())
}

/// Parse a whole match source, rejecting repeated match ids
pub fn parse_matches(text: &str) -> Result<MatchRegistry, InputError> {
    let mut registry = MatchRegistry::new();
    for (line, record) in numbered_lines(text) {
        let m = parse_match_line(record, line)?;
        let match_id = m.id();
        if registry.insert(m).is_some() {
            return Err(InputError::DuplicateMatch { line, match_id });
        }
    }
    Ok(registry)
}

/// Parse a whole operation log, preserving its order
pub fn parse_operations(text: &str) -> Result<Vec<Operation>, InputError> {
    numbered_lines(text)
        .map(|(line, record)| parse_operation_line(record, line))
        .collect()
}

fn read_file(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_matches(path: &Path) -> Result<MatchRegistry, InputError> {
    parse_matches(&read_file(path)?)
}

pub fn read_operations(path: &Path) -> Result<Vec<Operation>, InputError> {
    parse_operations(&read_file(path)?)
}
