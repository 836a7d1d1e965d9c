// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::common::parsing::format_decimal_units;
use crate::data::token_registry::Token;
use crate::data::wallets::WalletContext;
use crate::network::chain::ChainClient;
use crate::services::swap::amount::AmountRange;
use crate::services::swap::executor::SwapAttempt;
use crate::services::swap::types::{SwapReceipt, SwapRequest};
use alloy::primitives::{Address, U256};
use rand::Rng;
use std::sync::Arc;

/// Result of one wallet's run, after all retries.
#[derive(Debug)]
pub enum AttemptOutcome {
    Succeeded(SwapReceipt),
    Failed(AppError),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Succeeded(_))
    }
}

/// Source/target balances at one point in time. `None` means the read failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub source: Option<U256>,
    pub target: Option<U256>,
}

#[derive(Debug)]
pub struct WalletReport {
    pub wallet_id: String,
    pub round: usize,
    pub amount: String,
    pub attempts: usize,
    pub outcome: AttemptOutcome,
    pub balances_before: BalanceSnapshot,
    pub balances_after: Option<BalanceSnapshot>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub wallets: Vec<WalletReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.wallets.iter().filter(|w| w.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.wallets.len() - self.succeeded()
    }
}

/// Walks the selected wallets in order, giving each one a bounded number of fresh attempts.
pub struct BatchController<C: ChainClient + ?Sized, A: SwapAttempt + ?Sized> {
    chain: Arc<C>,
    attempt: Arc<A>,
    max_attempts: usize,
}

impl<C: ChainClient + ?Sized, A: SwapAttempt + ?Sized> BatchController<C, A> {
    pub fn new(chain: Arc<C>, attempt: Arc<A>, max_attempts: usize) -> Self {
        Self {
            chain,
            attempt,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub async fn run<R: Rng + Send + ?Sized>(
        &self,
        wallets: &[WalletContext],
        request: &SwapRequest,
        range: &AmountRange,
        rounds: usize,
        rng: &mut R,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let rounds = rounds.max(1);
        for round in 1..=rounds {
            tracing::info!(
                target: "batch",
                round,
                rounds,
                wallets = wallets.len(),
                pair = %format!("{}/{}", request.source().symbol(), request.target().symbol()),
                range = %range,
                "Starting round"
            );
            for wallet in wallets {
                let amount = range.sample(rng);
                let entry = self.run_wallet(wallet, request, &amount, round).await;
                report.wallets.push(entry);
            }
        }
        tracing::info!(
            target: "batch",
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch finished"
        );
        report
    }

    pub async fn run_wallet(
        &self,
        wallet: &WalletContext,
        request: &SwapRequest,
        amount: &str,
        round: usize,
    ) -> WalletReport {
        tracing::info!(
            target: "batch",
            wallet = wallet.id(),
            address = %wallet.address(),
            amount,
            symbol = request.source().symbol(),
            "Processing wallet"
        );
        let balances_before = self.balances(wallet, request).await;

        let mut attempts = 0;
        let outcome = loop {
            attempts += 1;
            match self.attempt.attempt(wallet, request, amount).await {
                Ok(receipt) => break AttemptOutcome::Succeeded(receipt),
                Err(e) if attempts < self.max_attempts => {
                    tracing::warn!(
                        target: "batch",
                        wallet = wallet.id(),
                        attempt = attempts,
                        error = %e,
                        "Swap attempt #{attempts} failed. Retrying"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        target: "batch",
                        wallet = wallet.id(),
                        error = %e,
                        "Swap failed after {attempts} attempts"
                    );
                    break AttemptOutcome::Failed(e);
                }
            }
        };

        let balances_after = if outcome.is_success() {
            Some(self.balances(wallet, request).await)
        } else {
            None
        };

        WalletReport {
            wallet_id: wallet.id().to_string(),
            round,
            amount: amount.to_string(),
            attempts,
            outcome,
            balances_before,
            balances_after,
        }
    }

    async fn balances(&self, wallet: &WalletContext, request: &SwapRequest) -> BalanceSnapshot {
        let owner = wallet.address();
        BalanceSnapshot {
            source: self.balance_of(wallet, request.source(), owner).await,
            target: self.balance_of(wallet, request.target(), owner).await,
        }
    }

    async fn balance_of(
        &self,
        wallet: &WalletContext,
        token: &Token,
        owner: Address,
    ) -> Option<U256> {
        let read = match token.address() {
            None => self.chain.native_balance(owner).await,
            Some(address) => self.chain.token_balance(address, owner).await,
        };
        match read {
            Ok(balance) => {
                tracing::info!(
                    target: "batch",
                    wallet = wallet.id(),
                    balance = %format_decimal_units(balance, token.decimals()),
                    symbol = token.symbol(),
                    "Balance"
                );
                Some(balance)
            }
            Err(e) => {
                tracing::warn!(
                    target: "batch",
                    wallet = wallet.id(),
                    symbol = token.symbol(),
                    error = %e,
                    "Balance read failed"
                );
                None
            }
        }
    }
}
