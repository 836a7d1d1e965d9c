// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::AppError;
use alloy::primitives::{Address, U256};
use std::str::FromStr;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

pub fn parse_address_hex(s: &str) -> Option<Address> {
    Address::from_str(strip_0x(s.trim())).ok()
}

/// Convert a human decimal string ("2.5") into base units for `decimals`.
///
/// Fractional digits beyond the token precision are truncated, never rounded.
pub fn parse_decimal_units(amount: &str, decimals: u8) -> Result<U256, AppError> {
    let raw = amount.trim();
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw, ""));
    let well_formed = !(int_part.is_empty() && frac_part.is_empty())
        && int_part.chars().all(|c| c.is_ascii_digit())
        && frac_part.chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(AppError::validation(
            "amount",
            format!("'{raw}' is not a plain decimal number"),
        ));
    }

    let precision = decimals as usize;
    let mut frac: String = frac_part.chars().take(precision).collect();
    while frac.len() < precision {
        frac.push('0');
    }

    let digits = format!("{int_part}{frac}");
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10)
        .map_err(|e| AppError::validation("amount", format!("'{raw}' overflows: {e}")))
}

/// Render base units as a human decimal string without trailing zeros.
pub fn format_decimal_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let precision = decimals as usize;
    if precision == 0 {
        return digits;
    }
    let padded = if digits.len() <= precision {
        format!("{}{}", "0".repeat(precision + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - precision);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    }
}
