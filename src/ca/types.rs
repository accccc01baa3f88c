use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Certificate status vocabulary of an OCSP response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertStatus {
    /// Certificate is not revoked
    Good,
    /// Certificate has been revoked
    Revoked,
    /// Responder does not know about the certificate
    Unknown,
}

impl CertStatus {
    /// All members of the vocabulary
    pub const ALL: [CertStatus; 3] = [CertStatus::Good, CertStatus::Revoked, CertStatus::Unknown];

    /// Numeric protocol code
    pub fn code(&self) -> u8 {
        match self {
            Self::Good => 0,
            Self::Revoked => 1,
            Self::Unknown => 2,
        }
    }

    /// Status token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Revoked => "revoked",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for CertStatus {
    type Err = RequestError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "good" => Ok(Self::Good),
            "revoked" => Ok(Self::Revoked),
            "unknown" => Ok(Self::Unknown),
            other => Err(RequestError::UnrecognizedStatus(other.to_string())),
        }
    }
}

impl fmt::Display for CertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RFC 5280 CRLReason codes
///
/// Requests may carry any code; this enum only names the registered ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RevocationReason {
    Unspecified = 0,
    KeyCompromise = 1,
    CaCompromise = 2,
    AffiliationChanged = 3,
    Superseded = 4,
    CessationOfOperation = 5,
    CertificateHold = 6,
    // 7 is unassigned
    RemoveFromCrl = 8,
    PrivilegeWithdrawn = 9,
    AaCompromise = 10,
}

impl RevocationReason {
    /// The registered reason for `code`, if any
    pub fn from_code(code: u32) -> Option<Self> {
        use RevocationReason::*;
        [
            Unspecified,
            KeyCompromise,
            CaCompromise,
            AffiliationChanged,
            Superseded,
            CessationOfOperation,
            CertificateHold,
            RemoveFromCrl,
            PrivilegeWithdrawn,
            AaCompromise,
        ]
        .into_iter()
        .find(|reason| reason.code() == code)
    }

    pub fn code(&self) -> u32 {
        *self as u32
    }
}

impl From<RevocationReason> for u32 {
    fn from(reason: RevocationReason) -> Self {
        reason.code()
    }
}
