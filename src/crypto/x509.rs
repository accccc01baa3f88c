use std::fmt;
use std::sync::Arc;

use der::Decode;
use thiserror::Error;
use x509_cert::serial_number::SerialNumber;
use x509_parser::parse_x509_certificate;

use crate::crypto::{hash, pem};
use crate::error::Error;
use crate::types::{Artifact, Result};

/// Failure of the issuer signature check
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("malformed certificate: {0}")]
    Malformed(String),

    #[error("signature does not verify: {0}")]
    BadSignature(String),
}

struct CertificateInner {
    der: Vec<u8>,
    raw_subject: Vec<u8>,
    raw_issuer: Vec<u8>,
    cert: x509_cert::Certificate,
}

/// Parsed X.509 certificate that keeps its original DER encoding
///
/// Cloning is cheap; the parsed form is shared.
#[derive(Clone)]
pub struct Certificate {
    inner: Arc<CertificateInner>,
}

impl Certificate {
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let (_, parsed) = parse_x509_certificate(der)
            .map_err(|e| Error::parse(Artifact::Certificate, format!("Invalid X.509 certificate: {}", e)))?;
        let raw_subject = parsed.subject().as_raw().to_vec();
        let raw_issuer = parsed.issuer().as_raw().to_vec();

        let cert = x509_cert::Certificate::from_der(der)
            .map_err(|e| Error::parse(Artifact::Certificate, format!("Invalid X.509 certificate: {}", e)))?;

        Ok(Self {
            inner: Arc::new(CertificateInner {
                der: der.to_vec(),
                raw_subject,
                raw_issuer,
                cert,
            }),
        })
    }

    /// Parse the first certificate of a PEM bundle, or DER bytes
    pub fn from_pem(bytes: &[u8]) -> Result<Self> {
        let der = pem::decode_certificate(bytes)?;
        Self::from_der(&der)
    }

    pub fn der(&self) -> &[u8] {
        &self.inner.der
    }

    /// Subject distinguished name exactly as encoded in the certificate
    pub fn raw_subject(&self) -> &[u8] {
        &self.inner.raw_subject
    }

    /// Issuer distinguished name exactly as encoded in the certificate
    pub fn raw_issuer(&self) -> &[u8] {
        &self.inner.raw_issuer
    }

    pub fn serial_number(&self) -> &SerialNumber {
        &self.inner.cert.tbs_certificate.serial_number
    }

    /// The subjectPublicKey BIT STRING contents, without tag, length or unused-bits octet
    pub fn subject_public_key_bits(&self) -> &[u8] {
        self.inner
            .cert
            .tbs_certificate
            .subject_public_key_info
            .subject_public_key
            .raw_bytes()
    }

    pub fn subject(&self) -> String {
        self.inner.cert.tbs_certificate.subject.to_string()
    }

    pub fn fingerprint(&self) -> String {
        hash::fingerprint(&self.inner.der)
    }

    pub fn as_x509(&self) -> &x509_cert::Certificate {
        &self.inner.cert
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.inner.der == other.inner.der
    }
}

impl Eq for Certificate {}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let serial: String = self
            .serial_number()
            .as_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        f.debug_struct("Certificate")
            .field("subject", &self.subject())
            .field("serial", &serial)
            .finish()
    }
}

/// Proves a certificate was signed by an issuer
#[cfg_attr(test, mockall::automock)]
pub trait ChainVerifier: Send + Sync {
    fn verify_issued_by(&self, cert: &Certificate, issuer: &Certificate) -> std::result::Result<(), VerifyError>;
}

/// Verifies the certificate signature with the issuer's public key, using the
/// algorithm declared in the certificate
#[derive(Debug, Clone, Copy, Default)]
pub struct X509ChainVerifier;

impl ChainVerifier for X509ChainVerifier {
    fn verify_issued_by(&self, cert: &Certificate, issuer: &Certificate) -> std::result::Result<(), VerifyError> {
        let (_, cert) = parse_x509_certificate(cert.der()).map_err(|e| VerifyError::Malformed(e.to_string()))?;
        let (_, issuer) = parse_x509_certificate(issuer.der()).map_err(|e| VerifyError::Malformed(e.to_string()))?;

        cert.verify_signature(Some(issuer.public_key()))
            .map_err(|e| VerifyError::BadSignature(e.to_string()))
    }
}
