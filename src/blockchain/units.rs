//! Conversions between smallest units (wei, token base units) and display units.
//!
//! Parsing is exact: an amount with more fractional digits than the unit
//! supports is rejected instead of rounded. Formatting is exact too, with
//! trailing zeros trimmed.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Decimals of the native coin.
pub const NATIVE_DECIMALS: u8 = 18;

/// Parse a display amount (e.g. "0.99") into smallest units.
pub fn parse_amount(amount: &str, decimals: u8) -> BlockchainResult<U256> {
    let invalid = |message: &str| BlockchainError::InvalidAmount {
        amount: amount.to_string(),
        message: message.to_string(),
    };

    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty amount"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("amount must not be negative"));
    }
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > decimals as usize {
            return Err(invalid(&format!(
                "more than {} fractional digits",
                decimals
            )));
        }
    }

    if decimals == 0 {
        return trimmed
            .trim_end_matches('.')
            .parse::<U256>()
            .map_err(|e| invalid(&e.to_string()));
    }

    parse_units(trimmed, decimals)
        .map(|units| units.get_absolute())
        .map_err(|e| invalid(&e.to_string()))
}

/// Parse a native-coin display amount into wei.
pub fn parse_native(amount: &str) -> BlockchainResult<U256> {
    parse_amount(amount, NATIVE_DECIMALS)
}

/// Format smallest units as a display amount without trailing zeros.
pub fn format_amount(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    match format_units(value, decimals) {
        Ok(formatted) => trim_fraction(&formatted),
        // Only reachable for decimals above 77, which no chain uses
        Err(_) => value.to_string(),
    }
}

/// Format wei as a native-coin display amount.
pub fn format_native(value: U256) -> String {
    format_amount(value, NATIVE_DECIMALS)
}

fn trim_fraction(formatted: &str) -> String {
    if !formatted.contains('.') {
        return formatted.to_string();
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
