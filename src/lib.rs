//! OCSP Signer - RFC 6960 response signing for a delegated OCSP responder
//!
//! Attests the status of certificates issued by one CA, after checking that
//! each certificate really was issued by that CA

// Foundational layer
pub mod error;
pub mod types;
pub mod config;
pub mod utils;
pub mod telemetry;

// Core layer
pub mod crypto;
pub mod ca;
pub mod identity;

// Signing layer
pub mod ocsp;

#[cfg(test)]
pub(crate) mod testing;

// Public key types
pub use crate::ca::{CertStatus, RevocationReason};
pub use crate::config::{LoggingConfig, ResponderConfig};
pub use crate::crypto::{CertIdHash, Certificate, SigningKey};
pub use crate::error::{Error, RequestError};
pub use crate::identity::ResponderIdentity;
pub use crate::ocsp::{sign, ResponseSigner, SignRequest, StandardSigner};
pub use crate::types::{Artifact, Result};
