use std::fmt;

/// Project-wide Result type
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Input artifact a responder identity is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Certificate of no particular role
    Certificate,
    /// Private key of no particular role
    PrivateKey,
    /// Certificate of the CA the responder speaks for
    IssuerCertificate,
    /// Certificate of the responder itself
    ResponderCertificate,
    /// Private key matching the responder certificate
    ResponderKey,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Certificate => write!(f, "certificate"),
            Artifact::PrivateKey => write!(f, "private key"),
            Artifact::IssuerCertificate => write!(f, "issuer certificate"),
            Artifact::ResponderCertificate => write!(f, "responder certificate"),
            Artifact::ResponderKey => write!(f, "responder key"),
        }
    }
}
