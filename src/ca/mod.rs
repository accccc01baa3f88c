pub mod types;

// Re-export key types
pub use types::{CertStatus, RevocationReason};
