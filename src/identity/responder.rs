use std::path::Path;

use chrono::Duration;
use tracing::{debug, info};

use crate::config::ResponderConfig;
use crate::crypto::{Certificate, SigningKey};
use crate::error::Error;
use crate::types::{Artifact, Result};
use crate::utils::read_artifact;

/// The configured signing identity of an OCSP responder
///
/// Immutable once built; clones share the parsed certificates.
#[derive(Debug, Clone)]
pub struct ResponderIdentity {
    issuer: Certificate,
    responder: Certificate,
    signing_key: SigningKey,
    interval: Duration,
}

impl ResponderIdentity {
    /// Bind the issuing CA certificate, responder certificate and key
    ///
    /// `interval_seconds` is the freshness window added to `thisUpdate`.
    pub fn new(
        issuer: Certificate,
        responder: Certificate,
        signing_key: SigningKey,
        interval_seconds: u64,
    ) -> Result<Self> {
        let interval = i64::try_from(interval_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| Error::Config(format!("interval of {} seconds is out of range", interval_seconds)))?;

        Ok(Self {
            issuer,
            responder,
            signing_key,
            interval,
        })
    }

    /// Load the identity from PEM (or DER) files
    pub fn from_files<P: AsRef<Path>>(
        issuer_path: P,
        responder_path: P,
        key_path: P,
        interval_seconds: u64,
    ) -> Result<Self> {
        let issuer_bytes = read_artifact(issuer_path.as_ref(), Artifact::IssuerCertificate)?;
        let issuer = Certificate::from_pem(&issuer_bytes).map_err(|e| e.with_artifact(Artifact::IssuerCertificate))?;
        debug!("Issuer certificate {} ({})", issuer.subject(), issuer.fingerprint());

        let responder_bytes = read_artifact(responder_path.as_ref(), Artifact::ResponderCertificate)?;
        let responder =
            Certificate::from_pem(&responder_bytes).map_err(|e| e.with_artifact(Artifact::ResponderCertificate))?;
        debug!("Responder certificate {} ({})", responder.subject(), responder.fingerprint());

        let key_bytes = read_artifact(key_path.as_ref(), Artifact::ResponderKey)?;
        let signing_key = SigningKey::from_pem(&key_bytes).map_err(|e| e.with_artifact(Artifact::ResponderKey))?;

        let identity = Self::new(issuer, responder, signing_key, interval_seconds)?;
        info!(
            "Loaded OCSP responder {} for issuer {} ({:?}, interval {}s)",
            identity.responder.subject(),
            identity.issuer.subject(),
            identity.signing_key.algorithm(),
            interval_seconds
        );
        Ok(identity)
    }

    pub fn from_config(config: &ResponderConfig) -> Result<Self> {
        config.validate()?;
        Self::from_files(
            &config.issuer_cert,
            &config.responder_cert,
            &config.responder_key,
            config.interval_seconds,
        )
    }

    /// The CA whose certificates this responder attests to
    pub fn issuer(&self) -> &Certificate {
        &self.issuer
    }

    pub fn responder(&self) -> &Certificate {
        &self.responder
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
