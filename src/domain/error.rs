// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failed to endpoint: {0}")]
    Connection(String),

    #[error("Validation failed for field {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Address {0} is invalid or not checksummed")]
    InvalidAddress(String),

    #[error("Invalid token spec for {symbol}: {reason}")]
    InvalidTokenSpec { symbol: String, reason: String },

    #[error("Token probe failed for {symbol}: {reason}")]
    TokenProbeFailed { symbol: String, reason: String },

    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("Approval failed for {token}: {reason}")]
    ApprovalFailed { token: String, reason: String },

    #[error("Fee data unavailable: {0}")]
    FeeDataUnavailable(String),

    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Transaction reverted: {hash}")]
    TransactionReverted { hash: String },

    #[error("Confirmation timed out after {waited_ms}ms: {hash}")]
    ConfirmationTimeout { hash: String, waited_ms: u64 },

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
