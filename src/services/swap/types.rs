// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::data::token_registry::Token;
use crate::domain::constants::{
    BEAN_ROUTER, BPS_DENOMINATOR, DEFAULT_DEADLINE_SECS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_SLIPPAGE_BPS, WMON,
};
use crate::network::chain::TxConfirmation;
use crate::network::gas::GasPolicy;
use alloy::primitives::{Address, B256, U256};

/// Resolved swap pair handed from the configuration phase to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    source: Token,
    target: Token,
}

impl SwapRequest {
    pub fn new(source: Token, target: Token) -> Result<Self, AppError> {
        if source == target {
            return Err(AppError::validation(
                "target",
                format!("cannot swap {} into itself", source.symbol()),
            ));
        }
        Ok(Self { source, target })
    }

    pub fn source(&self) -> &Token {
        &self.source
    }

    pub fn target(&self) -> &Token {
        &self.target
    }
}

/// Engine-wide knobs. Defaults target the BeanSwap router on Monad testnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPolicy {
    pub router: Address,
    pub wrapped_native: Address,
    pub slippage_bps: u64,
    pub deadline_secs: u64,
    /// Also top up allowance on the buy-side token of routed swaps.
    pub approve_target_token: bool,
    pub max_attempts: usize,
    pub gas: GasPolicy,
}

impl Default for SwapPolicy {
    fn default() -> Self {
        Self {
            router: BEAN_ROUTER,
            wrapped_native: WMON,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            deadline_secs: DEFAULT_DEADLINE_SECS,
            approve_target_token: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            gas: GasPolicy::default(),
        }
    }
}

/// Two-hop router path; native sides are already swapped for wrapped-native.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPath([Address; 2]);

impl SwapPath {
    pub fn new(source: &Token, target: &Token, wrapped_native: Address) -> Result<Self, AppError> {
        if source.is_native() && target.is_native() {
            return Err(AppError::validation(
                "path",
                "native to native has no router path",
            ));
        }
        Ok(Self([
            source.path_address(wrapped_native),
            target.path_address(wrapped_native),
        ]))
    }

    pub fn hops(&self) -> &[Address; 2] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<Address> {
        self.0.to_vec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub amount_in: U256,
    /// Advisory only; pool state can move before the swap lands.
    pub amount_out: U256,
}

/// `floor(amount_out * (10000 - slippage_bps) / 10000)`; 500 bps gives the 95% floor.
pub fn minimum_output(amount_out: U256, slippage_bps: u64) -> U256 {
    let keep = U256::from(BPS_DENOMINATOR - slippage_bps.min(BPS_DENOMINATOR));
    let denom = U256::from(BPS_DENOMINATOR);
    // Split as q*denom + r so the multiply cannot overflow for any quote.
    let (q, r) = (amount_out / denom, amount_out % denom);
    q * keep + r * keep / denom
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapRoute {
    /// Native into wrapped-native via `deposit()`.
    Wrap,
    /// Wrapped-native into native via `withdraw()`.
    Unwrap,
    /// Everything else goes through the router.
    Routed,
}

impl SwapRoute {
    pub fn classify(source: &Token, target: &Token, wrapped_native: Address) -> Self {
        if source.is_native() && target.address() == Some(wrapped_native) {
            SwapRoute::Wrap
        } else if source.address() == Some(wrapped_native) && target.is_native() {
            SwapRoute::Unwrap
        } else {
            SwapRoute::Routed
        }
    }
}

/// Router entry point picked by which side (if any) is native.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterEntry {
    ExactEthForTokens,
    ExactTokensForEth,
    ExactTokensForTokens,
}

impl RouterEntry {
    pub fn select(source: &Token, target: &Token) -> Self {
        if source.is_native() {
            RouterEntry::ExactEthForTokens
        } else if target.is_native() {
            RouterEntry::ExactTokensForEth
        } else {
            RouterEntry::ExactTokensForTokens
        }
    }
}

/// What a confirmed swap attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    pub route: SwapRoute,
    pub amount_in: U256,
    pub quote: Option<Quote>,
    pub min_out: Option<U256>,
    pub approvals: Vec<B256>,
    pub confirmation: TxConfirmation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::{USDC, WMON};

    fn mon() -> Token {
        Token::native("MON", 18)
    }
    fn wmon() -> Token {
        Token::erc20("WMON", WMON, 18)
    }
    fn usdc() -> Token {
        Token::erc20("USDC", USDC, 6)
    }

    #[test]
    fn minimum_output_floors_to_ninety_five_percent() {
        assert_eq!(minimum_output(U256::from(1000u64), 500), U256::from(950u64));
        assert_eq!(minimum_output(U256::from(1u64), 500), U256::ZERO);
        assert_eq!(minimum_output(U256::from(19u64), 500), U256::from(18u64));
        assert_eq!(minimum_output(U256::ZERO, 500), U256::ZERO);
        let twenty = U256::from(20u64) * U256::from(10u64).pow(U256::from(18u64));
        let nineteen = U256::from(19u64) * U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(minimum_output(twenty, 500), nineteen);
    }

    #[test]
    fn minimum_output_survives_huge_quotes_and_bad_bps() {
        let huge = minimum_output(U256::MAX, 500);
        assert!(huge < U256::MAX);
        assert!(huge > U256::MAX / U256::from(100u64) * U256::from(94u64));
        assert_eq!(minimum_output(U256::from(1000u64), 20_000), U256::ZERO);
    }

    #[test]
    fn classify_is_pure_in_native_and_wrapped_flags() {
        assert_eq!(SwapRoute::classify(&mon(), &wmon(), WMON), SwapRoute::Wrap);
        assert_eq!(SwapRoute::classify(&wmon(), &mon(), WMON), SwapRoute::Unwrap);
        assert_eq!(SwapRoute::classify(&mon(), &usdc(), WMON), SwapRoute::Routed);
        assert_eq!(SwapRoute::classify(&usdc(), &mon(), WMON), SwapRoute::Routed);
        assert_eq!(SwapRoute::classify(&wmon(), &usdc(), WMON), SwapRoute::Routed);
        assert_eq!(SwapRoute::classify(&usdc(), &wmon(), WMON), SwapRoute::Routed);
    }

    #[test]
    fn path_substitutes_wrapped_native_and_rejects_native_pair() {
        let path = SwapPath::new(&mon(), &usdc(), WMON).unwrap();
        assert_eq!(path.hops(), &[WMON, USDC]);
        let path = SwapPath::new(&usdc(), &mon(), WMON).unwrap();
        assert_eq!(path.to_vec(), vec![USDC, WMON]);
        assert!(SwapPath::new(&mon(), &Token::native("MON", 18), WMON).is_err());
    }

    #[test]
    fn router_entry_follows_native_side() {
        assert_eq!(RouterEntry::select(&mon(), &usdc()), RouterEntry::ExactEthForTokens);
        assert_eq!(RouterEntry::select(&usdc(), &mon()), RouterEntry::ExactTokensForEth);
        assert_eq!(RouterEntry::select(&usdc(), &wmon()), RouterEntry::ExactTokensForTokens);
    }

    #[test]
    fn request_rejects_same_token() {
        assert!(SwapRequest::new(usdc(), Token::erc20("USDC2", USDC, 6)).is_err());
        assert!(SwapRequest::new(mon(), Token::native("MON", 18)).is_err());
        assert!(SwapRequest::new(mon(), usdc()).is_ok());
    }
}
