use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::chain::ChainClient;
use crate::checkpoint::CheckpointStore;
use crate::config::AppCfg;
use crate::error::ScanError;
use crate::event_decoder::EventDecoder;
use crate::webhook::Deliver;

/// Periodic driver of the scan-decode-deliver loop.
///
/// Each tick runs one cycle over a bounded block range. The checkpoint is
/// advanced and persisted only after every log in the range has been decoded
/// and every matching event delivered; a failure anywhere leaves the
/// checkpoint untouched so the next tick retries the identical range.
/// Cycles never overlap: the loop awaits the in-flight cycle before looking
/// at the next tick.
pub struct ScanScheduler<C, D> {
    chain: C,
    decoder: EventDecoder,
    dispatcher: D,
    store: CheckpointStore,
    address: Address,
    chunk_size: u64,
    poll_interval: Duration,
    checkpoint: u64,
}

impl<C: ChainClient, D: Deliver> ScanScheduler<C, D> {
    pub fn new(
        cfg: &AppCfg,
        chain: C,
        decoder: EventDecoder,
        dispatcher: D,
        store: CheckpointStore,
        checkpoint: u64,
    ) -> anyhow::Result<Self> {
        let address = Address::from_str(&cfg.contract.address)
            .map_err(|e| anyhow::anyhow!("invalid contract address {}: {}", cfg.contract.address, e))?;

        Ok(Self {
            chain,
            decoder,
            dispatcher,
            store,
            address,
            chunk_size: cfg.chunk_size,
            poll_interval: Duration::from_secs(cfg.poll_interval_secs),
            checkpoint,
        })
    }

    /// Next block the scanner will start from.
    pub fn checkpoint(&self) -> u64 {
        self.checkpoint
    }

    /// Tick until a shutdown signal arrives or a fatal error occurs.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> Result<(), ScanError> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.run_cycle().await {
                        Ok(()) => {}
                        Err(err) if err.is_fatal() => return Err(err),
                        Err(err) => warn!("scan cycle aborted, retrying next tick: {}", err),
                    }
                }
                _ = &mut shutdown => {
                    info!("shutdown signal received, stopping scanner");
                    return Ok(());
                }
            }
        }
    }

    /// One scan cycle: query head, compute the range, fetch, decode and
    /// dispatch in log order, then advance the checkpoint.
    pub async fn run_cycle(&mut self) -> Result<(), ScanError> {
        let head = self.chain.head_block_number().await?;

        let from = self.checkpoint;
        if head < from {
            debug!("node head {} behind checkpoint {}, nothing to scan", head, from);
            return Ok(());
        }
        let to = head.min(from + self.chunk_size);

        info!("scanning blocks {} to {} (head {})", from, to, head);
        let logs = self.chain.filter_logs(self.address, from, to).await?;

        let mut matched = 0usize;
        for log in &logs {
            if let Some(event) = self.decoder.decode(log)? {
                self.dispatcher.deliver(&event).await?;
                matched += 1;
            }
        }
        if matched > 0 {
            info!("delivered {} {} events from {} logs", matched, self.decoder.event_name(), logs.len());
        }

        // Durable first, then in-memory: a persisted checkpoint must never
        // be ahead of what was actually processed.
        self.store.save(to)?;
        self.checkpoint = to;

        Ok(())
    }
}
