// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;

use crate::common::parsing::parse_address_hex;
use crate::domain::constants::BUILTIN_TOKENS;
use crate::domain::error::AppError;
use crate::network::chain::ChainClient;

/// A swappable asset. `address == None` marks the chain's native asset.
///
/// Equality (and hashing) only look at the address-or-native marker, so a custom token
/// that points at a built-in contract is the same token.
#[derive(Debug, Clone)]
pub struct Token {
    symbol: String,
    address: Option<Address>,
    decimals: u8,
}

impl Token {
    pub fn native(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            address: None,
            decimals,
        }
    }

    pub fn erc20(symbol: impl Into<String>, address: Address, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            address: Some(address),
            decimals,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_native(&self) -> bool {
        self.address.is_none()
    }

    /// Address used on router paths: native collapses to the wrapped-native contract.
    pub fn path_address(&self, wrapped_native: Address) -> Address {
        self.address.unwrap_or(wrapped_native)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Token {}

impl std::hash::Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(addr) => write!(f, "{} ({:#x})", self.symbol, addr),
            None => write!(f, "{} (native)", self.symbol),
        }
    }
}

/// Either a registry symbol or a caller-supplied token taken on faith.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSpec {
    Symbol(String),
    Custom {
        symbol: String,
        address: String,
        decimals: String,
    },
}

impl FromStr for TokenSpec {
    type Err = AppError;

    /// `USDC` or `SYMBOL:0xADDRESS:DECIMALS`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [symbol] if !symbol.is_empty() => Ok(TokenSpec::Symbol(symbol.to_string())),
            [symbol, address, decimals] if !symbol.is_empty() => Ok(TokenSpec::Custom {
                symbol: symbol.to_string(),
                address: address.to_string(),
                decimals: decimals.to_string(),
            }),
            _ => Err(AppError::InvalidTokenSpec {
                symbol: raw.to_string(),
                reason: "expected SYMBOL or SYMBOL:ADDRESS:DECIMALS".into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: HashMap<String, Token>,
}

impl TokenRegistry {
    /// Built-in tokens, with per-symbol address overrides from config applied on top.
    pub fn with_builtins(overrides: &HashMap<String, Address>) -> Self {
        let mut registry = Self::default();
        for (symbol, address, decimals) in BUILTIN_TOKENS {
            let address = overrides.get(symbol).copied().or(address);
            let token = match address {
                Some(addr) => Token::erc20(symbol, addr, decimals),
                None => Token::native(symbol, decimals),
            };
            registry.register(token);
        }
        registry
    }

    /// Add or replace a token under its (case-insensitive) symbol.
    pub fn register(&mut self, token: Token) -> Option<Token> {
        self.tokens.insert(token.symbol.to_ascii_uppercase(), token)
    }

    pub fn get(&self, symbol: &str) -> Option<&Token> {
        self.tokens.get(&symbol.trim().to_ascii_uppercase())
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut out: Vec<String> = self.tokens.values().map(|t| t.symbol.clone()).collect();
        out.sort();
        out
    }

    pub fn resolve(&self, spec: &TokenSpec) -> Result<Token, AppError> {
        match spec {
            TokenSpec::Symbol(symbol) => {
                self.get(symbol)
                    .cloned()
                    .ok_or_else(|| AppError::InvalidTokenSpec {
                        symbol: symbol.clone(),
                        reason: format!("unknown symbol; known: {}", self.symbols().join(",")),
                    })
            }
            TokenSpec::Custom {
                symbol,
                address,
                decimals,
            } => Self::custom(symbol, address, decimals),
        }
    }

    /// Build a custom token verbatim. Decimals are not checked against the contract here.
    pub fn custom(symbol: &str, address: &str, decimals: &str) -> Result<Token, AppError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AppError::InvalidTokenSpec {
                symbol: String::new(),
                reason: "symbol is empty".into(),
            });
        }
        let decimals: u8 = decimals
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidTokenSpec {
                symbol: symbol.to_string(),
                reason: format!("decimals '{}' is not an integer in 0..=255", decimals.trim()),
            })?;
        let address = parse_address_hex(address).ok_or_else(|| AppError::InvalidTokenSpec {
            symbol: symbol.to_string(),
            reason: format!("address '{}' is not a valid contract address", address.trim()),
        })?;
        Ok(Token::erc20(symbol, address, decimals))
    }

    /// Check a token's declared precision against its contract's `decimals()`.
    pub async fn probe<C: ChainClient + ?Sized>(chain: &C, token: &Token) -> Result<(), AppError> {
        let Some(address) = token.address() else {
            return Ok(());
        };
        let on_chain = chain
            .token_decimals(address)
            .await
            .map_err(|e| AppError::TokenProbeFailed {
                symbol: token.symbol().to_string(),
                reason: format!("decimals() call failed: {e}"),
            })?;
        if on_chain != token.decimals() {
            return Err(AppError::TokenProbeFailed {
                symbol: token.symbol().to_string(),
                reason: format!(
                    "declared {} decimals but contract reports {}",
                    token.decimals(),
                    on_chain
                ),
            });
        }
        tracing::debug!(target: "token_registry", token = %token, "Token probe ok");
        Ok(())
    }
}
