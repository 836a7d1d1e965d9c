// SPDX-License-Identifier: MIT

use regex::Regex;
use std::fs;
use std::path::Path;

/// Fail CI if config files carry 64-hex private keys. Keys belong in the wallets file only.
#[test]
fn no_committed_hex_keys_in_configs() {
    let re = Regex::new(r"0x?[a-fA-F0-9]{64}").unwrap();
    let candidates = ["config.toml", "config.example.toml", ".env.example"];
    for file in candidates {
        if !Path::new(file).exists() {
            continue;
        }
        let body = fs::read_to_string(file).expect("read config");
        for (idx, line) in body.lines().enumerate() {
            if re.is_match(line) {
                panic!("Secret-looking hex in {} at line {}", file, idx + 1);
            }
        }
    }
}

/// The example config must name only keys the loader understands.
#[test]
fn example_config_keys_are_known() {
    let known = [
        "debug",
        "log_json",
        "http_provider",
        "chain_id",
        "explorer_tx_url",
        "wallets_path",
        "router_address",
        "wrapped_native_address",
        "custom_tokens",
        "slippage_bps",
        "deadline_secs",
        "max_attempts",
        "approve_target_token",
        "probe_custom_tokens",
        "rounds",
        "gas_limit_min",
        "gas_limit_max",
        "gas_premium_percent",
        "max_gas_price_gwei",
        "receipt_poll_ms",
        "receipt_timeout_ms",
    ];
    let Ok(body) = fs::read_to_string("config.example.toml") else {
        return;
    };
    let key = Regex::new(r"^#?\s*([a-z_]+)\s*=").unwrap();
    let mut in_table = false;
    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_table = true;
            continue;
        }
        if in_table {
            continue;
        }
        if let Some(caps) = key.captures(trimmed) {
            let name = &caps[1];
            assert!(known.contains(&name), "unknown config key {name}");
        }
    }
}
