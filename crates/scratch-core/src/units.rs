//! Ether denomination helpers for human-facing input and output.

use thiserror::Error;

use crate::types::{Wei, ETHER};

const DECIMALS: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("invalid amount: {0}")]
    Invalid(String),
    #[error("more than 18 decimal places: {0}")]
    TooPrecise(String),
    #[error("amount too large: {0}")]
    Overflow(String),
}

/// Parse a decimal ether amount (`"1"`, `"0.01"`, `".5"`) into wei.
pub fn parse_ether(input: &str) -> Result<Wei, UnitsError> {
    let s = input.trim();
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(UnitsError::Invalid(input.into()));
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(UnitsError::Invalid(input.into()));
    }
    if frac.len() > DECIMALS {
        return Err(UnitsError::TooPrecise(input.into()));
    }

    let whole: Wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| UnitsError::Overflow(input.into()))?
    };
    let frac: Wei = if frac.is_empty() {
        0
    } else {
        // Right-pad to 18 digits.
        format!("{frac:0<width$}", width = DECIMALS)
            .parse()
            .map_err(|_| UnitsError::Invalid(input.into()))?
    };

    whole
        .checked_mul(ETHER)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| UnitsError::Overflow(input.into()))
}

/// Render wei as decimal ether with trailing zeros trimmed.
pub fn format_ether(amount: Wei) -> String {
    let whole = amount / ETHER;
    let frac = amount % ETHER;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0>width$}", width = DECIMALS);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
