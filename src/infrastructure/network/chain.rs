// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::data::abi::{ERC20, SwapRouter};
use crate::data::wallets::WalletContext;
use crate::network::gas::{FeeOracle, FeeSnapshot, GasParameters};
use crate::network::nonce::NonceManager;
use crate::network::provider::HttpProvider;
use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::eips::eip2930::AccessList;
use alloy::network::{TransactionBuilder, TxSignerSync};
use alloy::primitives::{Address, B256, Bytes, TxKind, U256};
use alloy::providers::Provider;
use alloy::rpc::types::eth::TransactionRequest;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// How a submission gets its gas envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPlan {
    /// Router swaps: randomized limit + fee premium from the gas policy.
    Policy(GasParameters),
    /// Wraps, unwraps and approvals: node estimate, like a plain wallet send.
    Estimate,
}

/// An unsigned call the wallet is about to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxPlan {
    pub label: &'static str,
    pub to: Address,
    pub value: U256,
    pub input: Bytes,
    pub gas: GasPlan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxConfirmation {
    pub hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Everything the swap engine needs from the chain: a handful of reads plus
/// submit-and-confirm. Implementations are used by one wallet at a time.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn native_balance(&self, owner: Address) -> Result<U256, AppError>;

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, AppError>;

    async fn token_decimals(&self, token: Address) -> Result<u8, AppError>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, AppError>;

    async fn fee_snapshot(&self) -> Result<FeeSnapshot, AppError>;

    /// Router `getAmountsOut`.
    async fn amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: &[Address],
    ) -> Result<Vec<U256>, AppError>;

    /// Sign and broadcast. Returns the transaction hash once the node accepted it.
    async fn submit(&self, wallet: &WalletContext, tx: TxPlan) -> Result<B256, AppError>;

    /// Block until the transaction has one confirmation. Reverts are errors.
    async fn await_confirmation(&self, hash: B256) -> Result<TxConfirmation, AppError>;
}

#[derive(Debug, Clone, Copy)]
pub struct ReceiptPolling {
    pub poll: Duration,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

/// `ChainClient` over a single HTTP JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcChainClient {
    provider: HttpProvider,
    chain_id: u64,
    fees: FeeOracle,
    nonces: NonceManager,
    receipts: ReceiptPolling,
}

impl RpcChainClient {
    pub fn new(provider: HttpProvider, chain_id: u64, receipts: ReceiptPolling) -> Self {
        Self {
            fees: FeeOracle::new(provider.clone()),
            nonces: NonceManager::new(provider.clone()),
            provider,
            chain_id,
            receipts,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn estimated_gas(
        &self,
        from: Address,
        tx: &TxPlan,
    ) -> Result<GasParameters, AppError> {
        let request = TransactionRequest::default()
            .with_from(from)
            .with_to(tx.to)
            .with_value(tx.value)
            .with_input(tx.input.clone());
        let estimate = self
            .provider
            .estimate_gas(request)
            .await
            .map_err(|e| AppError::SubmissionFailed(format!("{} gas estimate: {e}", tx.label)))?;
        let fees = self
            .provider
            .estimate_eip1559_fees()
            .await
            .map_err(|e| AppError::FeeDataUnavailable(format!("eip1559 estimate: {e}")))?;

        Ok(GasParameters {
            // 20% headroom over the node estimate.
            gas_limit: estimate.saturating_mul(12) / 10,
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
        })
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn native_balance(&self, owner: Address) -> Result<U256, AppError> {
        self.provider
            .get_balance(owner)
            .await
            .map_err(|e| AppError::Connection(format!("eth_getBalance {owner:#x}: {e}")))
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, AppError> {
        ERC20::new(token, self.provider.clone())
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("balanceOf {token:#x}: {e}")))
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, AppError> {
        ERC20::new(token, self.provider.clone())
            .decimals()
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("decimals {token:#x}: {e}")))
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, AppError> {
        ERC20::new(token, self.provider.clone())
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("allowance {token:#x}: {e}")))
    }

    async fn fee_snapshot(&self) -> Result<FeeSnapshot, AppError> {
        self.fees.snapshot().await
    }

    async fn amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: &[Address],
    ) -> Result<Vec<U256>, AppError> {
        SwapRouter::new(router, self.provider.clone())
            .getAmountsOut(amount_in, path.to_vec())
            .call()
            .await
            .map_err(|e| AppError::QuoteUnavailable(format!("getAmountsOut: {e}")))
    }

    async fn submit(&self, wallet: &WalletContext, tx: TxPlan) -> Result<B256, AppError> {
        let from = wallet.address();
        let gas = match tx.gas {
            GasPlan::Policy(params) => params,
            GasPlan::Estimate => self.estimated_gas(from, &tx).await?,
        };
        let nonce = self.nonces.next_nonce(from).await?;

        let mut unsigned = TxEip1559 {
            chain_id: self.chain_id,
            nonce,
            max_priority_fee_per_gas: gas.max_priority_fee_per_gas,
            max_fee_per_gas: gas.max_fee_per_gas,
            gas_limit: gas.gas_limit,
            to: TxKind::Call(tx.to),
            value: tx.value,
            access_list: AccessList::default(),
            input: tx.input,
        };

        let sig = TxSignerSync::sign_transaction_sync(wallet.signer(), &mut unsigned)
            .map_err(|e| AppError::SubmissionFailed(format!("Sign {} failed: {e}", tx.label)))?;
        let signed: TxEnvelope = unsigned.into_signed(sig).into();
        let raw = signed.encoded_2718();

        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| AppError::SubmissionFailed(format!("{} rejected: {e}", tx.label)))?;

        let hash = *pending.tx_hash();
        tracing::debug!(
            target: "chain",
            wallet = wallet.id(),
            label = tx.label,
            nonce,
            gas_limit = gas.gas_limit,
            max_fee_per_gas = gas.max_fee_per_gas,
            tx = %format!("{:#x}", hash),
            "Raw transaction accepted"
        );
        Ok(hash)
    }

    async fn await_confirmation(&self, hash: B256) -> Result<TxConfirmation, AppError> {
        let poll = self.receipts.poll.max(Duration::from_millis(100));
        let started = Instant::now();

        loop {
            match self.provider.get_transaction_receipt(hash).await {
                Ok(Some(rcpt)) => {
                    if !rcpt.status() {
                        return Err(AppError::TransactionReverted {
                            hash: format!("{:#x}", hash),
                        });
                    }
                    return Ok(TxConfirmation {
                        hash,
                        block_number: rcpt.block_number,
                        gas_used: rcpt.gas_used,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        target: "chain",
                        error = %e,
                        hash = %format!("{:#x}", hash),
                        "Receipt lookup error; retrying"
                    );
                }
            }

            if let Some(timeout) = self.receipts.timeout
                && started.elapsed() >= timeout
            {
                return Err(AppError::ConfirmationTimeout {
                    hash: format!("{:#x}", hash),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }

            tokio::time::sleep(poll).await;
        }
    }
}
