mod abi;
mod chain;
mod checkpoint;
mod config;
mod error;
mod event_decoder;
mod liveness;
mod scanner;
mod types;
mod webhook;

use std::path::Path;
use std::str::FromStr;

use alloy::providers::ProviderBuilder;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::abi::TargetEvent;
use crate::chain::RpcChain;
use crate::checkpoint::CheckpointStore;
use crate::config::AppCfg;
use crate::event_decoder::EventDecoder;
use crate::scanner::ScanScheduler;
use crate::webhook::WebhookDispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    let cfg_path = std::env::args().nth(1).unwrap_or_else(|| "./config.yaml".to_string());
    let cfg = AppCfg::load(&cfg_path)?;

    // Event definition, fixed for the lifetime of the process.
    let target = TargetEvent::load(Path::new(&cfg.contract.abi_path), &cfg.event)?;
    let decoder = EventDecoder::new(target);

    let rpc_url = reqwest::Url::from_str(&cfg.chain.rpc_url)?;
    let provider = ProviderBuilder::new().connect_http(rpc_url);
    let chain = RpcChain::new(provider);

    let dispatcher = WebhookDispatcher::new(&cfg.webhook.url)?;

    let store = CheckpointStore::new(&cfg.checkpoint_path);
    let start_block = store.load(cfg.starting_block);

    info!(
        "watching contract {} for event {} from block {}",
        cfg.contract.address, cfg.event, start_block
    );

    // Liveness probe, independent of the scan loop.
    let liveness_addr = cfg.liveness_addr.clone();
    tokio::spawn(async move {
        if let Err(e) = liveness::serve(&liveness_addr).await {
            error!("liveness endpoint failed: {:?}", e);
        }
    });

    let scheduler = ScanScheduler::new(&cfg, chain, decoder, dispatcher, store, start_block)?;

    // Ctrl-C interrupts the timer; an in-flight cycle finishes or aborts
    // before the loop exits, so the checkpoint stays consistent.
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    scheduler.run(shutdown_rx).await?;

    Ok(())
}
