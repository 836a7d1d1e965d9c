// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::AppError;
use crate::common::retry::retry_async;
use crate::network::provider::HttpProvider;
use alloy::primitives::Address;
use alloy::providers::Provider;
use std::time::Duration;

/// Pending-nonce lookup for whichever wallet is about to sign.
///
/// Wallets run one at a time and every submission waits for its receipt, so the
/// pending count is always the next free nonce and nothing is cached.
#[derive(Clone)]
pub struct NonceManager {
    provider: HttpProvider,
}

impl NonceManager {
    pub fn new(provider: HttpProvider) -> Self {
        Self { provider }
    }

    pub async fn next_nonce(&self, address: Address) -> Result<u64, AppError> {
        let provider = self.provider.clone();
        let nonce: u64 = retry_async(
            move |_| {
                let provider = provider.clone();
                async move { provider.get_transaction_count(address).pending().await }
            },
            3,
            Duration::from_millis(100),
        )
        .await
        .map_err(|e| AppError::Connection(format!("Failed to fetch nonce: {}", e)))?;

        tracing::debug!(target: "chain", address = %address, nonce, "Pending nonce");
        Ok(nonce)
    }
}
