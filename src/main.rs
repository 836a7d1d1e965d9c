// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::U256;
use alloy::providers::Provider;
use clap::Parser;
use oxidity_swapper::app::config::GlobalSettings;
use oxidity_swapper::app::logging::setup_logging;
use oxidity_swapper::common::parsing::format_decimal_units;
use oxidity_swapper::domain::error::AppError;
use oxidity_swapper::infrastructure::data::token_registry::{Token, TokenRegistry, TokenSpec};
use oxidity_swapper::infrastructure::data::wallets::{WalletSelection, WalletSet};
use oxidity_swapper::infrastructure::network::chain::RpcChainClient;
use oxidity_swapper::infrastructure::network::provider::ConnectionFactory;
use oxidity_swapper::services::swap::amount::AmountRange;
use oxidity_swapper::services::swap::batch::{AttemptOutcome, BatchController, BatchReport};
use oxidity_swapper::services::swap::executor::SwapExecutor;
use oxidity_swapper::services::swap::types::SwapRequest;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "oxidity swapper")]
struct Cli {
    /// Path to config file (default: config.{toml,yaml,...})
    #[arg(long)]
    config: Option<String>,

    /// Wallet id from the wallets file, or "all"
    #[arg(long, default_value = "all")]
    wallet: String,

    /// Token to sell: a symbol or SYMBOL:ADDRESS:DECIMALS
    #[arg(long)]
    from: String,

    /// Token to buy: a symbol or SYMBOL:ADDRESS:DECIMALS
    #[arg(long)]
    to: String,

    /// Per-wallet amount range in source-token units, e.g. 0.1-0.5
    #[arg(long)]
    amount: String,

    /// Repeat the batch this many times (overrides config/env)
    #[arg(long)]
    rounds: Option<usize>,

    /// Extra token to register, SYMBOL:ADDRESS:DECIMALS (repeatable)
    #[arg(long = "custom-token")]
    custom_token: Vec<String>,

    /// Slippage basis points for router swaps (overrides config/env)
    #[arg(long)]
    slippage_bps: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

async fn register_custom(
    registry: &mut TokenRegistry,
    chain: &RpcChainClient,
    spec: &TokenSpec,
    probe: bool,
) -> Result<Token, AppError> {
    let token = registry.resolve(spec)?;
    if probe && matches!(spec, TokenSpec::Custom { .. }) {
        TokenRegistry::probe(chain, &token).await?;
    }
    if let Some(previous) = registry.register(token.clone())
        && previous.address() != token.address()
    {
        tracing::warn!(
            target: "config",
            symbol = token.symbol(),
            previous = %previous,
            "Custom token replaces an existing registry entry"
        );
    }
    Ok(token)
}

fn fmt_balance(value: Option<U256>, decimals: u8) -> String {
    value
        .map(|b| format_decimal_units(b, decimals))
        .unwrap_or_else(|| "-".to_string())
}

fn log_report(report: &BatchReport, source: &Token, target: &Token) {
    for entry in &report.wallets {
        let after = entry.balances_after.unwrap_or_default();
        match &entry.outcome {
            AttemptOutcome::Succeeded(receipt) => tracing::info!(
                target: "batch",
                wallet = %entry.wallet_id,
                round = entry.round,
                amount = %entry.amount,
                attempts = entry.attempts,
                route = ?receipt.route,
                tx = %format!("{:#x}", receipt.confirmation.hash),
                source_after = %fmt_balance(after.source, source.decimals()),
                target_after = %fmt_balance(after.target, target.decimals()),
                "Wallet succeeded"
            ),
            AttemptOutcome::Failed(e) => tracing::error!(
                target: "batch",
                wallet = %entry.wallet_id,
                round = entry.round,
                amount = %entry.amount,
                attempts = entry.attempts,
                error = %e,
                "Wallet failed"
            ),
        }
    }
    tracing::info!(
        target: "batch",
        succeeded = report.succeeded(),
        failed = report.failed(),
        pair = %format!("{}/{}", source.symbol(), target.symbol()),
        "Summary"
    );
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let settings = GlobalSettings::load_with_path(cli.config.as_deref())?;
    setup_logging(
        if settings.debug { "debug" } else { "info" },
        cli.json_logs || settings.log_json,
    );

    let rpc_url = settings.http_provider_url()?;
    let provider = ConnectionFactory::http(&rpc_url)?;
    let detected = provider
        .get_chain_id()
        .await
        .map_err(|e| AppError::Connection(format!("chain_id detect failed: {e}")))?;
    if detected != settings.chain_id {
        return Err(AppError::Config(format!(
            "RPC {rpc_url} serves chain {detected}, expected {}",
            settings.chain_id
        )));
    }
    tracing::info!(target: "config", chain_id = detected, rpc = %rpc_url, "Connected");
    let chain = Arc::new(RpcChainClient::new(
        provider,
        settings.chain_id,
        settings.receipt_polling(),
    ));

    // Registry: built-ins, config overrides, then custom tokens from config and CLI.
    let mut registry = TokenRegistry::with_builtins(&settings.token_address_overrides()?);
    let mut custom_specs = settings.custom_token_specs()?;
    for raw in &cli.custom_token {
        custom_specs.push(TokenSpec::from_str(raw)?);
    }
    for spec in &custom_specs {
        let token =
            register_custom(&mut registry, &chain, spec, settings.probe_custom_tokens).await?;
        tracing::info!(target: "config", token = %token, "Registered custom token");
    }

    let source = register_custom(
        &mut registry,
        &chain,
        &TokenSpec::from_str(&cli.from)?,
        settings.probe_custom_tokens,
    )
    .await?;
    let target = register_custom(
        &mut registry,
        &chain,
        &TokenSpec::from_str(&cli.to)?,
        settings.probe_custom_tokens,
    )
    .await?;
    let request = SwapRequest::new(source.clone(), target.clone())?;
    let range = AmountRange::from_str(&cli.amount)?;

    let wallets = WalletSet::load_from_file(&settings.wallets_path)?;
    let selection = WalletSelection::from_str(&cli.wallet)?;
    let selected = wallets.select(&selection)?;
    tracing::info!(
        target: "config",
        loaded = wallets.len(),
        selected = selected.len(),
        selection = ?selection,
        "Wallets ready"
    );

    let mut policy = settings.swap_policy();
    if let Some(bps) = cli.slippage_bps {
        if bps >= oxidity_swapper::domain::constants::BPS_DENOMINATOR {
            return Err(AppError::validation(
                "slippage_bps",
                format!("{bps} must be below 10000"),
            ));
        }
        policy.slippage_bps = bps;
    }
    let rounds = cli.rounds.unwrap_or_else(|| settings.rounds_value()).max(1);

    let executor = Arc::new(SwapExecutor::new(
        chain.clone(),
        policy,
        settings.explorer_tx_url.clone(),
    ));
    let controller = BatchController::new(chain.clone(), executor, policy.max_attempts);
    let mut rng = StdRng::from_entropy();
    let report = controller
        .run(&selected, &request, &range, rounds, &mut rng)
        .await;

    log_report(&report, &source, &target);
    Ok(())
}
