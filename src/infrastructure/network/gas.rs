// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::common::retry::retry_async;
use crate::domain::constants::{
    DEFAULT_GAS_LIMIT_MAX, DEFAULT_GAS_LIMIT_MIN, DEFAULT_GAS_PREMIUM_PERCENT,
};
use crate::network::provider::HttpProvider;
use alloy::providers::Provider;
use alloy::rpc::types::BlockNumberOrTag;
use rand::Rng;
use std::time::Duration;

/// Raw fee data as reported by the node. Either field may be missing on odd RPCs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeSnapshot {
    pub last_base_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

/// Per-submission gas envelope. Never cached across attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasParameters {
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPolicy {
    pub gas_limit_min: u64,
    pub gas_limit_max: u64,
    /// Applied to both base fee and tip, e.g. 110 = +10%.
    pub premium_percent: u64,
    pub max_fee_cap_wei: Option<u128>,
}

impl Default for GasPolicy {
    fn default() -> Self {
        Self {
            gas_limit_min: DEFAULT_GAS_LIMIT_MIN,
            gas_limit_max: DEFAULT_GAS_LIMIT_MAX,
            premium_percent: DEFAULT_GAS_PREMIUM_PERCENT,
            max_fee_cap_wei: None,
        }
    }
}

impl GasPolicy {
    /// Derive fresh gas parameters from the latest fee snapshot.
    ///
    /// The gas limit is drawn uniformly from `[gas_limit_min, gas_limit_max]` and both fee
    /// fields get `premium_percent` applied with integer floor division.
    pub fn compute<R: Rng + ?Sized>(
        &self,
        snapshot: &FeeSnapshot,
        rng: &mut R,
    ) -> Result<GasParameters, AppError> {
        let base = snapshot.last_base_fee_per_gas.ok_or_else(|| {
            AppError::FeeDataUnavailable("snapshot has no last base fee".into())
        })?;
        let tip = snapshot.max_priority_fee_per_gas.ok_or_else(|| {
            AppError::FeeDataUnavailable("snapshot has no priority fee".into())
        })?;

        let (lo, hi) = if self.gas_limit_min <= self.gas_limit_max {
            (self.gas_limit_min, self.gas_limit_max)
        } else {
            (self.gas_limit_max, self.gas_limit_min)
        };
        let gas_limit = rng.gen_range(lo..=hi);

        let premium = self.premium_percent as u128;
        let mut max_fee_per_gas = base.saturating_mul(premium) / 100;
        let mut max_priority_fee_per_gas = tip.saturating_mul(premium) / 100;

        if let Some(cap) = self.max_fee_cap_wei
            && max_fee_per_gas > cap
        {
            tracing::warn!(
                target: "gas",
                max_fee_per_gas,
                cap,
                "Max fee above configured cap; clamping"
            );
            max_fee_per_gas = cap;
        }
        // EIP-1559 rejects a tip above the fee ceiling.
        max_priority_fee_per_gas = max_priority_fee_per_gas.min(max_fee_per_gas);

        Ok(GasParameters {
            gas_limit,
            max_fee_per_gas,
            max_priority_fee_per_gas,
        })
    }
}

/// Reads the fee snapshot the gas policy works from.
#[derive(Clone)]
pub struct FeeOracle {
    provider: HttpProvider,
}

impl FeeOracle {
    pub fn new(provider: HttpProvider) -> Self {
        Self { provider }
    }

    pub async fn snapshot(&self) -> Result<FeeSnapshot, AppError> {
        let provider = self.provider.clone();
        let block = retry_async(
            move |_| {
                let provider = provider.clone();
                async move { provider.get_block_by_number(BlockNumberOrTag::Latest).await }
            },
            3,
            Duration::from_millis(100),
        )
        .await
        .map_err(|e| AppError::FeeDataUnavailable(format!("Latest block fetch failed: {e}")))?;

        let last_base_fee_per_gas = block
            .as_ref()
            .and_then(|b| b.header.base_fee_per_gas)
            .map(|v| v as u128);

        let max_priority_fee_per_gas = match self.provider.get_max_priority_fee_per_gas().await {
            Ok(tip) => Some(tip),
            Err(e) => {
                tracing::debug!(target: "gas", error = %e, "eth_maxPriorityFeePerGas unavailable");
                None
            }
        };

        Ok(FeeSnapshot {
            last_base_fee_per_gas,
            max_priority_fee_per_gas,
        })
    }
}
