// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::common::parsing::{format_decimal_units, parse_decimal_units};
use crate::common::time_utils::deadline_from_now;
use crate::data::abi::{SwapRouter, WrappedNative};
use crate::data::wallets::WalletContext;
use crate::network::chain::{ChainClient, GasPlan, TxConfirmation, TxPlan};
use crate::services::swap::approval::ApprovalManager;
use crate::services::swap::quote::QuoteResolver;
use crate::services::swap::types::{
    RouterEntry, SwapPath, SwapPolicy, SwapReceipt, SwapRequest, SwapRoute, minimum_output,
};
use alloy::primitives::{B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::sync::Arc;

/// One swap attempt from scratch. The batch controller only sees this seam, so tests can
/// swap in a scripted attempt.
#[async_trait]
pub trait SwapAttempt: Send + Sync {
    async fn attempt(
        &self,
        wallet: &WalletContext,
        request: &SwapRequest,
        amount: &str,
    ) -> Result<SwapReceipt, AppError>;
}

pub struct SwapExecutor<C: ChainClient + ?Sized> {
    chain: Arc<C>,
    policy: SwapPolicy,
    quotes: QuoteResolver<C>,
    approvals: ApprovalManager<C>,
    explorer_tx_url: String,
}

impl<C: ChainClient + ?Sized> SwapExecutor<C> {
    pub fn new(chain: Arc<C>, policy: SwapPolicy, explorer_tx_url: impl Into<String>) -> Self {
        let explorer_tx_url = explorer_tx_url.into();
        Self {
            quotes: QuoteResolver::new(chain.clone(), policy.router),
            approvals: ApprovalManager::new(chain.clone(), explorer_tx_url.clone()),
            chain,
            policy,
            explorer_tx_url,
        }
    }

    /// Run one attempt: classify, then wrap / unwrap / route, and wait for the receipt.
    pub async fn execute(
        &self,
        wallet: &WalletContext,
        request: &SwapRequest,
        amount: &str,
    ) -> Result<SwapReceipt, AppError> {
        let source = request.source();
        let amount_in = parse_decimal_units(amount, source.decimals())?;
        if amount_in.is_zero() {
            return Err(AppError::validation(
                "amount",
                format!("{amount} {} is zero in base units", source.symbol()),
            ));
        }

        match SwapRoute::classify(source, request.target(), self.policy.wrapped_native) {
            SwapRoute::Wrap => self.wrap(wallet, amount_in).await,
            SwapRoute::Unwrap => self.unwrap(wallet, amount_in).await,
            SwapRoute::Routed => self.routed(wallet, request, amount_in).await,
        }
    }

    async fn wrap(
        &self,
        wallet: &WalletContext,
        amount_in: U256,
    ) -> Result<SwapReceipt, AppError> {
        tracing::info!(target: "swap", wallet = wallet.id(), amount = %amount_in, "Wrapping native via deposit");
        let plan = TxPlan {
            label: "deposit",
            to: self.policy.wrapped_native,
            value: amount_in,
            input: WrappedNative::depositCall {}.abi_encode().into(),
            gas: GasPlan::Estimate,
        };
        let confirmation = self.send_and_confirm(wallet, plan).await?;
        Ok(SwapReceipt {
            route: SwapRoute::Wrap,
            amount_in,
            quote: None,
            min_out: None,
            approvals: Vec::new(),
            confirmation,
        })
    }

    async fn unwrap(
        &self,
        wallet: &WalletContext,
        amount_in: U256,
    ) -> Result<SwapReceipt, AppError> {
        tracing::info!(target: "swap", wallet = wallet.id(), amount = %amount_in, "Unwrapping via withdraw");
        let plan = TxPlan {
            label: "withdraw",
            to: self.policy.wrapped_native,
            value: U256::ZERO,
            input: WrappedNative::withdrawCall { amount: amount_in }
                .abi_encode()
                .into(),
            gas: GasPlan::Estimate,
        };
        let confirmation = self.send_and_confirm(wallet, plan).await?;
        Ok(SwapReceipt {
            route: SwapRoute::Unwrap,
            amount_in,
            quote: None,
            min_out: None,
            approvals: Vec::new(),
            confirmation,
        })
    }

    async fn routed(
        &self,
        wallet: &WalletContext,
        request: &SwapRequest,
        amount_in: U256,
    ) -> Result<SwapReceipt, AppError> {
        let (source, target) = (request.source(), request.target());
        let path = SwapPath::new(source, target, self.policy.wrapped_native)?;

        let quote = self.quotes.quote(&path, amount_in).await?;
        let min_out = minimum_output(quote.amount_out, self.policy.slippage_bps);
        tracing::info!(
            target: "swap",
            wallet = wallet.id(),
            expected = %format_decimal_units(quote.amount_out, target.decimals()),
            min_out = %format_decimal_units(min_out, target.decimals()),
            symbol = target.symbol(),
            "Quoted expected output"
        );

        let router = self.policy.router;
        let mut approvals: Vec<B256> = Vec::new();
        if !source.is_native() {
            let outcome = self
                .approvals
                .ensure_approval(wallet, source, amount_in, router)
                .await?;
            approvals.extend(outcome.tx_hash());
        }
        if self.policy.approve_target_token && !target.is_native() {
            let outcome = self
                .approvals
                .ensure_approval(wallet, target, quote.amount_out, router)
                .await?;
            approvals.extend(outcome.tx_hash());
        }

        let snapshot = self.chain.fee_snapshot().await?;
        let gas = {
            let mut rng = rand::thread_rng();
            self.policy.gas.compute(&snapshot, &mut rng)?
        };

        let recipient = wallet.address();
        let deadline = U256::from(deadline_from_now(self.policy.deadline_secs));
        let hops = path.to_vec();
        let entry = RouterEntry::select(source, target);
        let (input, value) = match entry {
            RouterEntry::ExactEthForTokens => (
                SwapRouter::swapExactETHForTokensCall {
                    amountOutMin: min_out,
                    path: hops,
                    to: recipient,
                    deadline,
                }
                .abi_encode(),
                amount_in,
            ),
            RouterEntry::ExactTokensForEth => (
                SwapRouter::swapExactTokensForETHCall {
                    amountIn: amount_in,
                    amountOutMin: min_out,
                    path: hops,
                    to: recipient,
                    deadline,
                }
                .abi_encode(),
                U256::ZERO,
            ),
            RouterEntry::ExactTokensForTokens => (
                SwapRouter::swapExactTokensForTokensCall {
                    amountIn: amount_in,
                    amountOutMin: min_out,
                    path: hops,
                    to: recipient,
                    deadline,
                }
                .abi_encode(),
                U256::ZERO,
            ),
        };

        tracing::info!(
            target: "swap",
            wallet = wallet.id(),
            pair = %format!("{}/{}", source.symbol(), target.symbol()),
            entry = ?entry,
            gas_limit = gas.gas_limit,
            "Swapping"
        );
        let plan = TxPlan {
            label: "swap",
            to: router,
            value,
            input: input.into(),
            gas: GasPlan::Policy(gas),
        };
        let confirmation = self.send_and_confirm(wallet, plan).await?;

        Ok(SwapReceipt {
            route: SwapRoute::Routed,
            amount_in,
            quote: Some(quote),
            min_out: Some(min_out),
            approvals,
            confirmation,
        })
    }

    async fn send_and_confirm(
        &self,
        wallet: &WalletContext,
        plan: TxPlan,
    ) -> Result<TxConfirmation, AppError> {
        let label = plan.label;
        let hash = self.chain.submit(wallet, plan).await?;
        tracing::info!(
            target: "swap",
            wallet = wallet.id(),
            label,
            tx = %format!("{}{:#x}", self.explorer_tx_url, hash),
            "Tx sent"
        );
        let confirmation = self.chain.await_confirmation(hash).await?;
        tracing::info!(
            target: "swap",
            wallet = wallet.id(),
            label,
            block = ?confirmation.block_number,
            gas_used = confirmation.gas_used,
            "Tx confirmed"
        );
        Ok(confirmation)
    }
}

#[async_trait]
impl<C: ChainClient + ?Sized> SwapAttempt for SwapExecutor<C> {
    async fn attempt(
        &self,
        wallet: &WalletContext,
        request: &SwapRequest,
        amount: &str,
    ) -> Result<SwapReceipt, AppError> {
        self.execute(wallet, request, amount).await
    }
}
