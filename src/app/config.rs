// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::data::token_registry::TokenSpec;
use crate::domain::constants;
use crate::domain::error::AppError;
use crate::network::chain::ReceiptPolling;
use crate::network::gas::GasPolicy;
use crate::services::swap::types::SwapPolicy;
use alloy::primitives::Address;
use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalSettings {
    // General
    #[serde(default = "default_false")]
    pub debug: bool,
    #[serde(default = "default_false")]
    pub log_json: bool,

    // Network
    #[serde(default = "default_http_provider")]
    pub http_provider: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default = "default_explorer_tx_url")]
    pub explorer_tx_url: String,

    // Identity
    #[serde(default = "default_wallets_path")]
    pub wallets_path: String,

    // Contracts
    pub router_address: Option<Address>,
    pub wrapped_native_address: Option<Address>,
    /// Symbol -> address overrides for built-in tokens.
    pub token_addresses: Option<HashMap<String, String>>,
    /// `SYMBOL:ADDRESS:DECIMALS` entries; a comma-separated string is accepted from env.
    #[serde(default, deserialize_with = "deserialize_token_list")]
    pub custom_tokens: Vec<String>,

    // Swap policy
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u64,
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_true")]
    pub approve_target_token: bool,
    #[serde(default = "default_false")]
    pub probe_custom_tokens: bool,
    #[serde(default = "default_rounds")]
    pub rounds: usize,

    // Gas
    #[serde(default = "default_gas_limit_min")]
    pub gas_limit_min: u64,
    #[serde(default = "default_gas_limit_max")]
    pub gas_limit_max: u64,
    #[serde(default = "default_gas_premium_percent")]
    pub gas_premium_percent: u64,
    pub max_gas_price_gwei: Option<u64>,

    // Receipts
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,
    #[serde(default = "default_receipt_timeout_ms")]
    pub receipt_timeout_ms: u64,
}

// Defaults
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_http_provider() -> String {
    constants::DEFAULT_HTTP_PROVIDER.to_string()
}
fn default_chain_id() -> u64 {
    constants::CHAIN_MONAD_TESTNET
}
fn default_explorer_tx_url() -> String {
    constants::DEFAULT_EXPLORER_TX_URL.to_string()
}
fn default_wallets_path() -> String {
    "wallets.json".to_string()
}
fn default_slippage_bps() -> u64 {
    constants::DEFAULT_SLIPPAGE_BPS
}
fn default_deadline_secs() -> u64 {
    constants::DEFAULT_DEADLINE_SECS
}
fn default_max_attempts() -> usize {
    constants::DEFAULT_MAX_ATTEMPTS
}
fn default_rounds() -> usize {
    1
}
fn default_gas_limit_min() -> u64 {
    constants::DEFAULT_GAS_LIMIT_MIN
}
fn default_gas_limit_max() -> u64 {
    constants::DEFAULT_GAS_LIMIT_MAX
}
fn default_gas_premium_percent() -> u64 {
    constants::DEFAULT_GAS_PREMIUM_PERCENT
}
fn default_receipt_poll_ms() -> u64 {
    constants::DEFAULT_RECEIPT_POLL_MS
}
fn default_receipt_timeout_ms() -> u64 {
    constants::DEFAULT_RECEIPT_TIMEOUT_MS
}

fn deserialize_token_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct TokenListVisitor;

    impl<'de> Visitor<'de> for TokenListVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a list of SYMBOL:ADDRESS:DECIMALS or a comma-separated string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(split_token_list(v))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut out = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                out.extend(split_token_list(&item));
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(TokenListVisitor)
}

fn split_token_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl GlobalSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(selected_path) = path {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Deterministic precedence: CLI (in main) > env/.env > config file.
        builder = builder.add_source(Environment::default());

        let settings: GlobalSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AppError> {
        self.http_provider_url()?;
        self.token_address_overrides()?;
        if self.gas_limit_min == 0 || self.gas_limit_min > self.gas_limit_max {
            return Err(AppError::Config(format!(
                "gas_limit_min ({}) must be non-zero and <= gas_limit_max ({})",
                self.gas_limit_min, self.gas_limit_max
            )));
        }
        if self.slippage_bps >= constants::BPS_DENOMINATOR {
            return Err(AppError::Config(format!(
                "slippage_bps {} must be below {}",
                self.slippage_bps,
                constants::BPS_DENOMINATOR
            )));
        }
        Ok(())
    }

    pub fn http_provider_url(&self) -> Result<String, AppError> {
        let trimmed = self.http_provider.trim();
        let url = Url::parse(trimmed)
            .map_err(|e| AppError::Config(format!("http_provider '{trimmed}': {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(trimmed.to_string()),
            other => Err(AppError::Config(format!(
                "http_provider must be http(s), got {other}"
            ))),
        }
    }

    /// Built-in token overrides. `wrapped_native_address` lands under the wrapped-native symbol
    /// so the registry and the swap policy agree on one contract.
    pub fn token_address_overrides(&self) -> Result<HashMap<String, Address>, AppError> {
        let mut overrides = match &self.token_addresses {
            Some(raw) => parse_address_map(raw, "token_addresses")?,
            None => HashMap::new(),
        };
        if let Some(wrapped) = self.wrapped_native_address {
            let symbol = constants::WRAPPED_NATIVE_SYMBOL.to_string();
            if let Some(listed) = overrides.insert(symbol, wrapped) {
                if listed != wrapped {
                    return Err(AppError::Config(format!(
                        "wrapped_native_address {wrapped:#x} disagrees with token_addresses.{} {listed:#x}",
                        constants::WRAPPED_NATIVE_SYMBOL
                    )));
                }
            }
        }
        Ok(overrides)
    }

    pub fn custom_token_specs(&self) -> Result<Vec<TokenSpec>, AppError> {
        self.custom_tokens
            .iter()
            .map(|raw| TokenSpec::from_str(raw))
            .collect()
    }

    pub fn max_attempts_value(&self) -> usize {
        self.max_attempts.max(1)
    }

    pub fn rounds_value(&self) -> usize {
        self.rounds.max(1)
    }

    pub fn gas_premium_percent_value(&self) -> u64 {
        self.gas_premium_percent.max(100)
    }

    pub fn max_fee_cap_wei(&self) -> Option<u128> {
        self.max_gas_price_gwei
            .filter(|gwei| *gwei > 0)
            .map(|gwei| u128::from(gwei) * 1_000_000_000)
    }

    pub fn receipt_poll_ms_value(&self) -> u64 {
        self.receipt_poll_ms.max(100)
    }

    /// Zero disables the timeout.
    pub fn receipt_timeout_ms_value(&self) -> Option<u64> {
        match self.receipt_timeout_ms {
            0 => None,
            ms => Some(ms.max(self.receipt_poll_ms_value())),
        }
    }

    pub fn receipt_polling(&self) -> ReceiptPolling {
        ReceiptPolling {
            poll: Duration::from_millis(self.receipt_poll_ms_value()),
            timeout: self.receipt_timeout_ms_value().map(Duration::from_millis),
        }
    }

    pub fn gas_policy(&self) -> GasPolicy {
        GasPolicy {
            gas_limit_min: self.gas_limit_min,
            gas_limit_max: self.gas_limit_max,
            premium_percent: self.gas_premium_percent_value(),
            max_fee_cap_wei: self.max_fee_cap_wei(),
        }
    }

    pub fn swap_policy(&self) -> SwapPolicy {
        let defaults = SwapPolicy::default();
        SwapPolicy {
            router: self.router_address.unwrap_or(defaults.router),
            wrapped_native: self
                .token_address_overrides()
                .ok()
                .and_then(|m| m.get(constants::WRAPPED_NATIVE_SYMBOL).copied())
                .unwrap_or(defaults.wrapped_native),
            slippage_bps: self.slippage_bps,
            deadline_secs: self.deadline_secs,
            approve_target_token: self.approve_target_token,
            max_attempts: self.max_attempts_value(),
            gas: self.gas_policy(),
        }
    }
}

fn parse_address_map(
    raw: &HashMap<String, String>,
    field: &str,
) -> Result<HashMap<String, Address>, AppError> {
    raw.iter()
        .map(|(k, v)| {
            Address::from_str(v.trim())
                .map(|addr| (k.to_uppercase(), addr))
                .map_err(|_| AppError::InvalidAddress(format!("{field}:{k} -> {v}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::token_registry::TokenRegistry;
    use crate::services::swap::types::SwapRoute;
    use std::sync::{Mutex, OnceLock};

    fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn base_settings() -> GlobalSettings {
        GlobalSettings {
            debug: default_false(),
            log_json: default_false(),
            http_provider: default_http_provider(),
            chain_id: default_chain_id(),
            explorer_tx_url: default_explorer_tx_url(),
            wallets_path: default_wallets_path(),
            router_address: None,
            wrapped_native_address: None,
            token_addresses: None,
            custom_tokens: Vec::new(),
            slippage_bps: default_slippage_bps(),
            deadline_secs: default_deadline_secs(),
            max_attempts: default_max_attempts(),
            approve_target_token: default_true(),
            probe_custom_tokens: default_false(),
            rounds: default_rounds(),
            gas_limit_min: default_gas_limit_min(),
            gas_limit_max: default_gas_limit_max(),
            gas_premium_percent: default_gas_premium_percent(),
            max_gas_price_gwei: None,
            receipt_poll_ms: default_receipt_poll_ms(),
            receipt_timeout_ms: default_receipt_timeout_ms(),
        }
    }

    fn temp_config(tag: &str, body: &str) -> std::path::PathBuf {
        let tmp = std::env::temp_dir().join(format!(
            "swapper-{tag}-{}-{}.toml",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::write(&tmp, body).expect("write temp config");
        tmp
    }

    #[test]
    fn defaults_match_beanswap_policy() {
        let policy = base_settings().swap_policy();
        assert_eq!(policy, SwapPolicy::default());
        assert_eq!(policy.slippage_bps, 500);
        assert_eq!(policy.deadline_secs, 6 * 60 * 60);
        assert_eq!(policy.max_attempts, 5);
    }

    #[test]
    fn receipt_tuning_values_have_safe_floor() {
        let mut settings = base_settings();
        settings.receipt_poll_ms = 1;
        settings.receipt_timeout_ms = 5;
        assert_eq!(settings.receipt_poll_ms_value(), 100);
        assert_eq!(settings.receipt_timeout_ms_value(), Some(100));

        settings.receipt_timeout_ms = 0;
        assert!(settings.receipt_polling().timeout.is_none());
    }

    #[test]
    fn gas_cap_converts_gwei_and_ignores_zero() {
        let mut settings = base_settings();
        assert_eq!(settings.max_fee_cap_wei(), None);
        settings.max_gas_price_gwei = Some(0);
        assert_eq!(settings.max_fee_cap_wei(), None);
        settings.max_gas_price_gwei = Some(75);
        assert_eq!(settings.gas_policy().max_fee_cap_wei, Some(75_000_000_000));
    }

    #[test]
    fn wrapped_native_follows_token_override() {
        let replacement = "0x00000000000000000000000000000000000000aa";
        let mut settings = base_settings();
        settings.token_addresses = Some(HashMap::from([(
            "wmon".to_string(),
            replacement.to_string(),
        )]));
        assert_eq!(
            settings.swap_policy().wrapped_native,
            Address::from_str(replacement).unwrap()
        );
    }

    #[test]
    fn wrapped_native_address_reaches_registry_and_keeps_wrap_route() {
        let replacement = Address::from([0xaau8; 20]);
        let mut settings = base_settings();
        settings.wrapped_native_address = Some(replacement);

        let policy = settings.swap_policy();
        assert_eq!(policy.wrapped_native, replacement);

        let registry = TokenRegistry::with_builtins(&settings.token_address_overrides().unwrap());
        let mon = registry.get("MON").unwrap();
        let wmon = registry.get("WMON").unwrap();
        assert_eq!(wmon.address(), Some(replacement));
        assert_eq!(
            SwapRoute::classify(mon, wmon, policy.wrapped_native),
            SwapRoute::Wrap
        );
        assert_eq!(
            SwapRoute::classify(wmon, mon, policy.wrapped_native),
            SwapRoute::Unwrap
        );
    }

    #[test]
    fn conflicting_wrapped_native_settings_are_rejected() {
        let mut settings = base_settings();
        settings.wrapped_native_address = Some(Address::from([0xaau8; 20]));
        settings.token_addresses = Some(HashMap::from([(
            "WMON".to_string(),
            "0x00000000000000000000000000000000000000bb".to_string(),
        )]));
        assert!(matches!(settings.validate(), Err(AppError::Config(_))));

        settings.token_addresses = Some(HashMap::from([(
            "wmon".to_string(),
            "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
        )]));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn bad_token_address_is_reported() {
        let mut settings = base_settings();
        settings.token_addresses = Some(HashMap::from([(
            "USDC".to_string(),
            "nope".to_string(),
        )]));
        assert!(matches!(
            settings.token_address_overrides(),
            Err(AppError::InvalidAddress(_))
        ));
    }

    #[test]
    fn rejects_non_http_provider_and_inverted_gas_bounds() {
        let mut settings = base_settings();
        settings.http_provider = "ws://localhost:8546".into();
        assert!(matches!(settings.validate(), Err(AppError::Config(_))));

        let mut settings = base_settings();
        settings.gas_limit_min = 400_000;
        assert!(matches!(settings.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn custom_tokens_accept_file_list() {
        let _env_lock = env_lock_guard();
        let tmp = temp_config(
            "custom-tokens",
            r#"
custom_tokens = ["FOO:0x268E4E24E0051EC27b3D27A95977E71cE6875a05:18", "BAR"]
"#,
        );
        let loaded = GlobalSettings::load_with_path(Some(tmp.to_str().expect("utf8 path")))
            .expect("load settings");
        std::fs::remove_file(&tmp).ok();

        let specs = loaded.custom_token_specs().expect("specs");
        assert_eq!(specs.len(), 2);
        assert!(matches!(&specs[0], TokenSpec::Custom { symbol, .. } if symbol == "FOO"));
        assert_eq!(specs[1], TokenSpec::Symbol("BAR".into()));
    }

    #[test]
    fn env_overrides_config_file_values() {
        let _env_lock = env_lock_guard();
        let tmp = temp_config("env-override", "slippage_bps = 300\nrounds = 2\n");
        let old = std::env::var("SLIPPAGE_BPS").ok();
        unsafe {
            std::env::set_var("SLIPPAGE_BPS", "150");
        }

        let loaded = GlobalSettings::load_with_path(Some(tmp.to_str().expect("utf8 path")))
            .expect("load settings");
        assert_eq!(loaded.slippage_bps, 150);
        assert_eq!(loaded.rounds_value(), 2);

        std::fs::remove_file(&tmp).ok();
        if let Some(v) = old {
            unsafe { std::env::set_var("SLIPPAGE_BPS", v) };
        } else {
            unsafe { std::env::remove_var("SLIPPAGE_BPS") };
        }
    }
}
