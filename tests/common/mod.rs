// SPDX-License-Identifier: MIT
// In-memory chain used by the integration tests. Submissions are recorded and
// `approve` calldata is decoded so allowances move like they would on chain.

#![allow(dead_code)]

use alloy::primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use oxidity_swapper::common::error::AppError;
use oxidity_swapper::data::abi::ERC20;
use oxidity_swapper::data::wallets::WalletContext;
use oxidity_swapper::network::chain::{ChainClient, TxConfirmation, TxPlan};
use oxidity_swapper::network::gas::FeeSnapshot;
use std::collections::HashMap;
use std::sync::Mutex;

pub const KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const KEY_1: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub fn wallet(id: &str, key: &str) -> WalletContext {
    WalletContext::from_private_key(id, key).expect("anvil key")
}

pub fn units(whole: u64, decimals: u8) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(decimals))
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub wallet: String,
    pub plan: TxPlan,
    pub hash: B256,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub native: HashMap<Address, U256>,
    pub balances: HashMap<(Address, Address), U256>,
    pub allowances: HashMap<(Address, Address, Address), U256>,
    pub decimals: HashMap<Address, u8>,
    /// `getAmountsOut` result; `None` makes the router call fail.
    pub amounts_out: Option<Vec<U256>>,
    pub fees: FeeSnapshot,
    pub submissions: Vec<Submission>,
    pub fail_balance_reads: bool,
    /// Labels whose receipts come back reverted.
    pub revert_labels: Vec<&'static str>,
    /// Labels whose receipts never arrive within the polling bound.
    pub timeout_labels: Vec<&'static str>,
}

#[derive(Debug, Default)]
pub struct MockChain {
    pub state: Mutex<MockState>,
}

impl MockChain {
    pub fn new() -> Self {
        let chain = Self::default();
        chain.with(|s| {
            s.fees = FeeSnapshot {
                last_base_fee_per_gas: Some(50_000_000_000),
                max_priority_fee_per_gas: Some(2_000_000_000),
            };
        });
        chain
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.with(|s| s.submissions.clone())
    }

    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, value: U256) {
        self.with(|s| {
            s.allowances.insert((token, owner, spender), value);
        });
    }

    pub fn allowance_of(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.with(|s| {
            s.allowances
                .get(&(token, owner, spender))
                .copied()
                .unwrap_or_default()
        })
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn native_balance(&self, owner: Address) -> Result<U256, AppError> {
        self.with(|s| {
            if s.fail_balance_reads {
                return Err(AppError::Connection("balance read refused".into()));
            }
            Ok(s.native.get(&owner).copied().unwrap_or_default())
        })
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, AppError> {
        self.with(|s| {
            if s.fail_balance_reads {
                return Err(AppError::Connection("balance read refused".into()));
            }
            Ok(s.balances.get(&(token, owner)).copied().unwrap_or_default())
        })
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, AppError> {
        self.with(|s| {
            s.decimals
                .get(&token)
                .copied()
                .ok_or_else(|| AppError::Connection(format!("no contract at {token:#x}")))
        })
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, AppError> {
        Ok(self.allowance_of(token, owner, spender))
    }

    async fn fee_snapshot(&self) -> Result<FeeSnapshot, AppError> {
        Ok(self.with(|s| s.fees))
    }

    async fn amounts_out(
        &self,
        _router: Address,
        _amount_in: U256,
        _path: &[Address],
    ) -> Result<Vec<U256>, AppError> {
        self.with(|s| {
            s.amounts_out
                .clone()
                .ok_or_else(|| AppError::QuoteUnavailable("pair has no liquidity".into()))
        })
    }

    async fn submit(&self, wallet: &WalletContext, tx: TxPlan) -> Result<B256, AppError> {
        let owner = wallet.address();
        self.with(|s| {
            if let Ok(call) = ERC20::approveCall::abi_decode(&tx.input) {
                s.allowances.insert((tx.to, owner, call.spender), call.amount);
            }
            let hash = B256::from(U256::from(s.submissions.len() + 1));
            s.submissions.push(Submission {
                wallet: wallet.id().to_string(),
                plan: tx,
                hash,
            });
            Ok(hash)
        })
    }

    async fn await_confirmation(&self, hash: B256) -> Result<TxConfirmation, AppError> {
        self.with(|s| {
            let label = s
                .submissions
                .iter()
                .find(|sub| sub.hash == hash)
                .map(|sub| sub.plan.label);
            if let Some(label) = label
                && s.revert_labels.contains(&label)
            {
                return Err(AppError::TransactionReverted {
                    hash: format!("{hash:#x}"),
                });
            }
            if let Some(label) = label
                && s.timeout_labels.contains(&label)
            {
                return Err(AppError::ConfirmationTimeout {
                    hash: format!("{hash:#x}"),
                    waited_ms: 180_000,
                });
            }
            Ok(TxConfirmation {
                hash,
                block_number: Some(1),
                gas_used: 21_000,
            })
        })
    }
}
