use chrono::{DateTime, Utc};

use crate::ca::CertStatus;
use crate::crypto::Certificate;

/// Desired contents of a specific OCSP response
///
/// `reason` and `revoked_at` only matter when `status` is `revoked`; they are
/// never emitted for any other status.
#[derive(Debug, Clone, Default)]
pub struct SignRequest {
    /// Certificate whose status is attested
    pub certificate: Option<Certificate>,
    /// Status token: `good`, `revoked` or `unknown`
    pub status: String,
    /// CRL reason code, passed through unvalidated
    pub reason: u32,
    /// Revocation time
    pub revoked_at: Option<DateTime<Utc>>,
}

impl SignRequest {
    pub fn new(certificate: Certificate, status: CertStatus) -> Self {
        Self {
            certificate: Some(certificate),
            status: status.as_str().to_string(),
            ..Default::default()
        }
    }

    pub fn good(certificate: Certificate) -> Self {
        Self::new(certificate, CertStatus::Good)
    }

    pub fn unknown(certificate: Certificate) -> Self {
        Self::new(certificate, CertStatus::Unknown)
    }

    pub fn revoked(certificate: Certificate, reason: impl Into<u32>, revoked_at: DateTime<Utc>) -> Self {
        Self {
            reason: reason.into(),
            revoked_at: Some(revoked_at),
            ..Self::new(certificate, CertStatus::Revoked)
        }
    }

    /// Replace the status token, whether or not it is in the vocabulary
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}
