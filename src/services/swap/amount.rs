// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::common::constants::AMOUNT_FRACTION_DIGITS;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Inclusive `[min, max]` range that per-wallet swap amounts are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    min: f64,
    max: f64,
}

fn grid_scale() -> f64 {
    10f64.powi(AMOUNT_FRACTION_DIGITS as i32)
}

// Grid bounds in millionths. The epsilon absorbs float noise such as `0.1 * 1e6`.
fn grid_bounds(min: f64, max: f64) -> (f64, f64) {
    let scale = grid_scale();
    ((min * scale - 1e-6).ceil(), (max * scale + 1e-6).floor())
}

impl AmountRange {
    pub fn new(min: f64, max: f64) -> Result<Self, AppError> {
        for (name, v) in [("min", min), ("max", max)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(AppError::validation(
                    "amount",
                    format!("{name} must be a positive number, got {v}"),
                ));
            }
        }
        if min > max {
            return Err(AppError::validation(
                "amount",
                format!("min {min} is greater than max {max}"),
            ));
        }
        let (lo, hi) = grid_bounds(min, max);
        if hi >= u128::MAX as f64 {
            return Err(AppError::validation(
                "amount",
                format!("max {max} is too large to sample"),
            ));
        }
        if lo > hi {
            return Err(AppError::validation(
                "amount",
                format!("range {min}-{max} holds no value with {AMOUNT_FRACTION_DIGITS} decimals"),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Draw uniformly and truncate to six fractional digits. The result is kept inside the
    /// range even when truncation would step below `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let scale = grid_scale();
        let drawn = if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        };
        let (lo, hi) = grid_bounds(self.min, self.max);
        let (lo, hi) = (lo as u128, hi as u128);
        let micros = ((drawn * scale).floor() as u128).clamp(lo, hi);
        let unit = 10u128.pow(AMOUNT_FRACTION_DIGITS as u32);
        format!(
            "{}.{:0width$}",
            micros / unit,
            micros % unit,
            width = AMOUNT_FRACTION_DIGITS
        )
    }
}

impl FromStr for AmountRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s.trim().split_once('-').ok_or_else(|| {
            AppError::validation("amount", format!("expected MIN-MAX, got {s:?}"))
        })?;
        let parse = |part: &str| {
            part.trim().parse::<f64>().map_err(|_| {
                AppError::validation("amount", format!("{part:?} is not a number"))
            })
        };
        Self::new(parse(min)?, parse(max)?)
    }
}

impl fmt::Display for AmountRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}
