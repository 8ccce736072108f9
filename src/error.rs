use thiserror::Error;

/// Errors raised inside a scan cycle.
///
/// `Rpc`, `Decode` and `Dispatch` are transient: the cycle is aborted without
/// touching the checkpoint and the same range is retried on the next tick.
/// `CheckpointWrite` is fatal: once a chunk has been delivered, failing to
/// record the new position durably means the process must stop.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("rpc error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("webhook delivery failed: {0}")]
    Dispatch(String),

    #[error("checkpoint write failed: {0}")]
    CheckpointWrite(#[from] std::io::Error),
}

impl ScanError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CheckpointWrite(_))
    }
}
