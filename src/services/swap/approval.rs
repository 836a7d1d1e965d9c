// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::data::abi::ERC20;
use crate::data::token_registry::Token;
use crate::data::wallets::WalletContext;
use crate::network::chain::{ChainClient, GasPlan, TxPlan};
use alloy::primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Native assets move by value, no allowance involved.
    NotRequired,
    AlreadySufficient { allowance: U256 },
    Approved { tx_hash: B256 },
}

impl ApprovalOutcome {
    pub fn tx_hash(&self) -> Option<B256> {
        match self {
            ApprovalOutcome::Approved { tx_hash } => Some(*tx_hash),
            _ => None,
        }
    }
}

/// Tops up router allowance with an unlimited approval when the live allowance is short.
pub struct ApprovalManager<C: ChainClient + ?Sized> {
    chain: Arc<C>,
    explorer_tx_url: String,
}

impl<C: ChainClient + ?Sized> ApprovalManager<C> {
    pub fn new(chain: Arc<C>, explorer_tx_url: impl Into<String>) -> Self {
        Self {
            chain,
            explorer_tx_url: explorer_tx_url.into(),
        }
    }

    pub async fn ensure_approval(
        &self,
        wallet: &WalletContext,
        token: &Token,
        required: U256,
        spender: Address,
    ) -> Result<ApprovalOutcome, AppError> {
        let Some(token_address) = token.address() else {
            return Ok(ApprovalOutcome::NotRequired);
        };
        let failed = |reason: String| AppError::ApprovalFailed {
            token: token.symbol().to_string(),
            reason,
        };

        let allowance = self
            .chain
            .allowance(token_address, wallet.address(), spender)
            .await
            .map_err(|e| failed(format!("allowance read: {e}")))?;
        if allowance >= required {
            tracing::debug!(
                target: "approval",
                wallet = wallet.id(),
                token = token.symbol(),
                %allowance,
                %required,
                "Allowance sufficient"
            );
            return Ok(ApprovalOutcome::AlreadySufficient { allowance });
        }

        tracing::info!(
            target: "approval",
            wallet = wallet.id(),
            token = token.symbol(),
            spender = %spender,
            "Approving unlimited allowance"
        );
        let call = ERC20::approveCall {
            spender,
            amount: U256::MAX,
        };
        let plan = TxPlan {
            label: "approve",
            to: token_address,
            value: U256::ZERO,
            input: call.abi_encode().into(),
            gas: GasPlan::Estimate,
        };
        let tx_hash = self
            .chain
            .submit(wallet, plan)
            .await
            .map_err(|e| failed(e.to_string()))?;
        let confirmation = self
            .chain
            .await_confirmation(tx_hash)
            .await
            .map_err(|e| failed(e.to_string()))?;

        tracing::info!(
            target: "approval",
            wallet = wallet.id(),
            token = token.symbol(),
            block = ?confirmation.block_number,
            tx = %format!("{}{:#x}", self.explorer_tx_url, tx_hash),
            "Approval confirmed"
        );
        Ok(ApprovalOutcome::Approved { tx_hash })
    }
}
