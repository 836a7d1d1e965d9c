// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, address};

// =============================================================================
// NETWORK CONSTANTS
// =============================================================================

pub const CHAIN_MONAD_TESTNET: u64 = 10143;

pub const DEFAULT_HTTP_PROVIDER: &str = "https://testnet-rpc.monad.xyz";
pub const DEFAULT_EXPLORER_TX_URL: &str = "https://testnet.monadexplorer.com/tx/";

// =============================================================================
// CONTRACTS (Monad testnet)
// =============================================================================

pub const BEAN_ROUTER: Address = address!("CA810D095e90Daae6e867c19DF6D9A8C56db2c89");
pub const WMON: Address = address!("760AfE86e5de5fa0Ee542fc7B7B713e1c5425701");
pub const USDC: Address = address!("f817257fed379853cDe0fa4F97AB987181B1E5Ea");
pub const BEAN: Address = address!("268E4E24E0051EC27b3D27A95977E71cE6875a05");
pub const JAI: Address = address!("70F893f65E3C1d7f82aad72f71615eb220b74D10");

pub const NATIVE_SYMBOL: &str = "MON";
pub const WRAPPED_NATIVE_SYMBOL: &str = "WMON";
pub const NATIVE_DECIMALS: u8 = 18;

/// Built-in tokens as (symbol, address, decimals); `None` marks the native asset.
pub const BUILTIN_TOKENS: [(&str, Option<Address>, u8); 5] = [
    (NATIVE_SYMBOL, None, NATIVE_DECIMALS),
    (WRAPPED_NATIVE_SYMBOL, Some(WMON), 18),
    ("USDC", Some(USDC), 6),
    ("BEAN", Some(BEAN), 18),
    ("JAI", Some(JAI), 18),
];

// =============================================================================
// SWAP POLICY
// =============================================================================

pub const DEFAULT_SLIPPAGE_BPS: u64 = 500;
pub const BPS_DENOMINATOR: u64 = 10_000;
pub const DEFAULT_DEADLINE_SECS: u64 = 6 * 3600;
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;
pub const AMOUNT_FRACTION_DIGITS: usize = 6;

// =============================================================================
// GAS & TRANSACTION CONSTANTS
// =============================================================================

pub const DEFAULT_GAS_LIMIT_MIN: u64 = 250_000;
pub const DEFAULT_GAS_LIMIT_MAX: u64 = 350_000;
pub const DEFAULT_GAS_PREMIUM_PERCENT: u64 = 110;
pub const DEFAULT_RECEIPT_POLL_MS: u64 = 1_000;
pub const DEFAULT_RECEIPT_TIMEOUT_MS: u64 = 180_000;
