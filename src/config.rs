use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::crypto::CertIdHash;
use crate::error::Error;
use crate::types::Result;

/// OCSP responder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Certificate of the CA whose certificates are attested
    pub issuer_cert: PathBuf,
    /// Certificate of the responder, issued by that CA
    pub responder_cert: PathBuf,
    /// Private key matching the responder certificate
    pub responder_key: PathBuf,
    /// Freshness window in seconds
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    /// Hash used in CertID (sha1, sha256)
    #[serde(default)]
    pub cert_id_hash: CertIdHash,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON instead of text
    #[serde(default)]
    pub structured: bool,
}

fn default_interval_seconds() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            structured: false,
        }
    }
}

impl ResponderConfig {
    pub fn new<P: Into<PathBuf>>(issuer_cert: P, responder_cert: P, responder_key: P) -> Self {
        Self {
            issuer_cert: issuer_cert.into(),
            responder_cert: responder_cert.into(),
            responder_key: responder_key.into(),
            interval_seconds: default_interval_seconds(),
            cert_id_hash: CertIdHash::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load from a TOML, YAML or JSON file, chosen by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let paths = [
            ("issuer_cert", &self.issuer_cert),
            ("responder_cert", &self.responder_cert),
            ("responder_key", &self.responder_key),
        ];
        for (name, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(Error::Config(format!("{} cannot be empty", name)));
            }
        }

        if self.interval_seconds == 0 {
            return Err(Error::Config("interval_seconds cannot be zero".to_string()));
        }

        Ok(())
    }
}
