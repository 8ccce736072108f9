use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ChainCfg {
    pub rpc_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContractCfg {
    pub address: String,
    #[serde(default = "default_abi_path")]
    pub abi_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebhookCfg {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppCfg {
    /// Name of the event to watch, as declared in the ABI.
    pub event: String,
    pub chain: ChainCfg,
    pub contract: ContractCfg,
    pub webhook: WebhookCfg,
    #[serde(default = "default_checkpoint_path")]
    pub checkpoint_path: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
    /// First block to scan from, superseded by a valid checkpoint file.
    #[serde(default)]
    pub starting_block: u64,
    #[serde(default = "default_liveness_addr")]
    pub liveness_addr: String,
}

fn default_abi_path() -> String {
    "./abi.json".to_string()
}

fn default_checkpoint_path() -> String {
    "./block.txt".to_string()
}

fn default_poll_interval() -> u64 {
    10
}

fn default_chunk_size() -> u64 {
    100
}

fn default_liveness_addr() -> String {
    "0.0.0.0:9000".to_string()
}

impl AppCfg {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(&std::fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.event.is_empty() {
            anyhow::bail!("please specify an event to watch");
        }
        if self.chain.rpc_url.is_empty() {
            anyhow::bail!("please specify an rpc endpoint to work with");
        }
        if self.contract.address.is_empty() {
            anyhow::bail!("please specify a contract address");
        }
        if self.webhook.url.is_empty() {
            anyhow::bail!("please specify a webhook endpoint");
        }
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be at least 1");
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be at least 1");
        }
        Ok(())
    }
}
