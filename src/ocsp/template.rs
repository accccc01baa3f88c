use chrono::{DateTime, Utc};
use x509_cert::serial_number::SerialNumber;

use crate::ca::CertStatus;
use crate::crypto::Certificate;

/// Revocation details, present only for revoked certificates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revocation {
    pub revoked_at: DateTime<Utc>,
    pub reason: u32,
}

/// Field values of one OCSP response, built per signing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTemplate {
    pub status: CertStatus,
    /// Copied from the attested certificate
    pub serial_number: SerialNumber,
    pub this_update: DateTime<Utc>,
    pub next_update: DateTime<Utc>,
    pub produced_at: DateTime<Utc>,
    /// Embedded so relying parties can verify the response signature
    pub responder_certificate: Certificate,
    pub revocation: Option<Revocation>,
}
