use anyhow::{Context, Result};
use dnssec_chain::{DigestType, DnssecAlgorithm, DsData};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default = "default_trust_anchors")]
    pub trust_anchors: Vec<TrustAnchorConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Recursive resolver queried for the chain (default: 1.1.1.1:53)
    #[serde(default = "default_upstream")]
    pub upstream: String,

    /// Per-query timeout in seconds (default: 5)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// A DS-style digest of a trusted root key.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TrustAnchorConfig {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            upstream: default_upstream(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            resolver: ResolverConfig::default(),
            trust_anchors: default_trust_anchors(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_upstream() -> String {
    "1.1.1.1:53".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

/// IANA root zone KSKs.
fn default_trust_anchors() -> Vec<TrustAnchorConfig> {
    vec![
        TrustAnchorConfig {
            key_tag: 20326,
            algorithm: 8,
            digest_type: 2,
            digest: "E06D44B80B8F1D39A95C0B0D7C65D08458E880409BBC683457104237C7F8EC8D"
                .to_string(),
        },
        TrustAnchorConfig {
            key_tag: 38696,
            algorithm: 8,
            digest_type: 2,
            digest: "683D2D0ACB8C9B712A1948B27F741219298D0A450D612C483AF444A4C0FB2B16"
                .to_string(),
        },
    ]
}

impl TrustAnchorConfig {
    pub fn to_ds_data(&self) -> Result<DsData> {
        let algorithm = DnssecAlgorithm::try_from(self.algorithm)
            .context(format!("Trust anchor {} has an invalid algorithm", self.key_tag))?;
        let digest_type = DigestType::try_from(self.digest_type)
            .context(format!("Trust anchor {} has an invalid digest type", self.key_tag))?;
        let digest = hex::decode(&self.digest)
            .context(format!("Trust anchor {} digest is not hex", self.key_tag))?;
        if digest.len() != digest_type.digest_len() {
            anyhow::bail!(
                "Trust anchor {} digest should span {} octets (got {})",
                self.key_tag,
                digest_type.digest_len(),
                digest.len()
            );
        }
        Ok(DsData::new(self.key_tag, algorithm, digest_type, digest))
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse YAML configuration")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trust_anchors.is_empty() {
            anyhow::bail!("At least one trust anchor must be configured");
        }

        if self.resolver.timeout_secs == 0 {
            anyhow::bail!("Resolver timeout must be greater than zero");
        }

        self.upstream()?;
        self.ds_data()?;
        Ok(())
    }

    pub fn upstream(&self) -> Result<SocketAddr> {
        self.resolver
            .upstream
            .parse()
            .context(format!("Invalid upstream address: {}", self.resolver.upstream))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.resolver.timeout_secs)
    }

    pub fn ds_data(&self) -> Result<Vec<DsData>> {
        self.trust_anchors
            .iter()
            .map(TrustAnchorConfig::to_ds_data)
            .collect()
    }
}
