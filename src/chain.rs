use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::rpc::types::{Filter, Log};
use async_trait::async_trait;

use crate::error::ScanError;

/// The chain-access capabilities the scan loop consumes. Kept as a trait so
/// the scheduler can run against an in-memory chain in tests.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Latest block number known to the node.
    async fn head_block_number(&self) -> Result<u64, ScanError>;

    /// All logs emitted by `address` within the inclusive range `[from, to]`.
    async fn filter_logs(
        &self,
        address: Address,
        from: u64,
        to: u64,
    ) -> Result<Vec<Log>, ScanError>;
}

/// [`ChainClient`] over an alloy JSON-RPC provider.
pub struct RpcChain<P> {
    provider: P,
}

impl<P> RpcChain<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider + Send + Sync> ChainClient for RpcChain<P> {
    async fn head_block_number(&self) -> Result<u64, ScanError> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn filter_logs(
        &self,
        address: Address,
        from: u64,
        to: u64,
    ) -> Result<Vec<Log>, ScanError> {
        let filter = Filter::new().address(address).from_block(from).to_block(to);
        Ok(self.provider.get_logs(&filter).await?)
    }
}
