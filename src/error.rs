use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::crypto::x509::VerifyError;
use crate::ocsp::encoder::EncodeError;
use crate::types::Artifact;

/// Generic error type
#[derive(Error, Debug)]
pub enum Error {
    /// An input artifact could not be read from disk
    #[error("Failed to read {artifact} from {path:?}: {source}")]
    ReadFailed {
        artifact: Artifact,
        path: PathBuf,
        source: io::Error,
    },

    /// Certificate or key material could not be decoded
    #[error("Failed to parse {artifact}: {reason}")]
    Parse { artifact: Artifact, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The signing request was rejected
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// The encode/sign step rejected the response template
    #[error("Signing failure: {0}")]
    SigningFailure(#[from] EncodeError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Reasons a signing request is rejected
#[derive(Error, Debug)]
pub enum RequestError {
    /// No certificate was supplied
    #[error("request does not carry a certificate")]
    MissingCertificate,

    /// Issuer name of the certificate differs from the responder's issuer subject
    #[error("certificate issuer does not match the configured issuer subject")]
    IssuerMismatch,

    /// Certificate was not signed by the configured issuer
    #[error("certificate is not signed by the configured issuer: {0}")]
    UntrustedSignature(#[source] VerifyError),

    /// Status token outside the vocabulary
    #[error("unrecognized certificate status {0:?}")]
    UnrecognizedStatus(String),

    /// Revoked status without a revocation time
    #[error("revoked status requires a revocation time")]
    MissingRevocationTime,
}

impl Error {
    /// Build a parse error for the given artifact
    pub fn parse(artifact: Artifact, reason: impl Into<String>) -> Self {
        Error::Parse {
            artifact,
            reason: reason.into(),
        }
    }

    /// Re-attribute a parse error to a more specific artifact
    pub fn with_artifact(self, artifact: Artifact) -> Self {
        match self {
            Error::Parse { reason, .. } => Error::Parse { artifact, reason },
            other => other,
        }
    }

    /// The request rejection reason, if this is one
    pub fn request_error(&self) -> Option<&RequestError> {
        match self {
            Error::InvalidRequest(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn is_invalid_request(&self) -> bool {
        self.request_error().is_some()
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
