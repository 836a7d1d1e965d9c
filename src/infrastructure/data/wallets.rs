// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use std::fmt;
use std::fs;
use std::str::FromStr;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use serde::Deserialize;

use crate::domain::error::AppError;

/// One signing wallet. Owned by the batch controller for a single swap attempt at a time.
#[derive(Clone)]
pub struct WalletContext {
    id: String,
    signer: PrivateKeySigner,
}

impl WalletContext {
    pub fn new(id: impl Into<String>, signer: PrivateKeySigner) -> Self {
        Self {
            id: id.into(),
            signer,
        }
    }

    pub fn from_private_key(id: impl Into<String>, key: &str) -> Result<Self, AppError> {
        let id = id.into();
        let signer = PrivateKeySigner::from_str(key.trim())
            .map_err(|e| AppError::Config(format!("Invalid private key for wallet {id}: {e}")))?;
        Ok(Self { id, signer })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl fmt::Debug for WalletContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletContext")
            .field("id", &self.id)
            .field("address", &self.address())
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WalletId {
    Number(u64),
    Text(String),
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletId::Number(n) => write!(f, "{n}"),
            WalletId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletEntry {
    id: WalletId,
    private_key: String,
}

/// Which wallets a batch runs over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletSelection {
    One(String),
    All,
}

impl FromStr for WalletSelection {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("wallet", "wallet selection is empty"));
        }
        if trimmed.eq_ignore_ascii_case("all") {
            Ok(WalletSelection::All)
        } else {
            Ok(WalletSelection::One(trimmed.to_string()))
        }
    }
}

/// Ordered wallet list loaded from `[{ "id": 1, "privateKey": "0x…" }, …]`.
#[derive(Debug, Clone, Default)]
pub struct WalletSet {
    wallets: Vec<WalletContext>,
}

impl WalletSet {
    pub fn new(wallets: Vec<WalletContext>) -> Self {
        Self { wallets }
    }

    pub fn load_from_file(path: &str) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read wallets {path}: {e}")))?;
        Self::from_json(&raw).map_err(|e| match e {
            AppError::Config(msg) => AppError::Config(format!("{path}: {msg}")),
            other => other,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let entries: Vec<WalletEntry> = serde_json::from_str(raw)
            .map_err(|e| AppError::Config(format!("Invalid wallets JSON: {e}")))?;

        let mut wallets = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = entry.id.to_string();
            if wallets.iter().any(|w: &WalletContext| w.id == id) {
                return Err(AppError::Config(format!("Duplicate wallet id {id}")));
            }
            wallets.push(WalletContext::from_private_key(id, &entry.private_key)?);
        }
        Ok(Self { wallets })
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WalletContext> {
        self.wallets.iter().find(|w| w.id == id)
    }

    /// Resolve a selection into the ordered wallets a batch will walk.
    pub fn select(&self, selection: &WalletSelection) -> Result<Vec<WalletContext>, AppError> {
        match selection {
            WalletSelection::All => {
                if self.is_empty() {
                    return Err(AppError::Config("Wallet list is empty".into()));
                }
                Ok(self.wallets.clone())
            }
            WalletSelection::One(id) => self
                .get(id)
                .cloned()
                .map(|w| vec![w])
                .ok_or_else(|| AppError::Config(format!("Wallet {id} not found"))),
        }
    }
}
