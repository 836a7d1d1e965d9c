// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::network::chain::ChainClient;
use crate::services::swap::types::{Quote, SwapPath};
use alloy::primitives::{Address, U256};
use std::sync::Arc;

/// Router `getAmountsOut` wrapper. No retries here: a failed quote fails the attempt.
pub struct QuoteResolver<C: ChainClient + ?Sized> {
    chain: Arc<C>,
    router: Address,
}

impl<C: ChainClient + ?Sized> QuoteResolver<C> {
    pub fn new(chain: Arc<C>, router: Address) -> Self {
        Self { chain, router }
    }

    pub async fn quote(&self, path: &SwapPath, amount_in: U256) -> Result<Quote, AppError> {
        let amounts = self
            .chain
            .amounts_out(self.router, amount_in, path.hops())
            .await
            .map_err(|e| match e {
                AppError::QuoteUnavailable(_) => e,
                other => AppError::QuoteUnavailable(other.to_string()),
            })?;

        let amount_out = *amounts.last().ok_or_else(|| {
            AppError::QuoteUnavailable("router returned no amounts".into())
        })?;

        Ok(Quote {
            amount_in,
            amount_out,
        })
    }
}
