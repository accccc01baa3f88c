pub mod hash;
pub mod keys;
pub mod pem;
pub mod x509;

// Re-export key types
pub use hash::CertIdHash;
pub use keys::{SignatureAlgorithm, SigningKey};
pub use x509::{Certificate, ChainVerifier, VerifyError, X509ChainVerifier};
