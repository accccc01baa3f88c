use std::fmt;

use der::asn1::ObjectIdentifier;
use der::{Any, AnyRef};
use p256::ecdsa::signature::Signer as _;
use p256::pkcs8::DecodePrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::signature::SignatureEncoding;
use rustls_pki_types::PrivateKeyDer;
use sha2::Sha256;
use spki::AlgorithmIdentifierOwned;
use tracing::debug;

use crate::crypto::pem;
use crate::error::Error;
use crate::types::{Artifact, Result};

/// ecdsa-with-SHA256
pub const ECDSA_WITH_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.2");
/// ecdsa-with-SHA384
pub const ECDSA_WITH_SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");
/// sha256WithRSAEncryption
pub const SHA256_WITH_RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");

/// Signature algorithm produced by a signing key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// ECDSA over NIST P-256 with SHA-256
    EcdsaP256Sha256,
    /// ECDSA over NIST P-384 with SHA-384
    EcdsaP384Sha384,
    /// RSASSA-PKCS1-v1_5 with SHA-256
    RsaPkcs1Sha256,
}

impl SignatureAlgorithm {
    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            Self::EcdsaP256Sha256 => ECDSA_WITH_SHA256,
            Self::EcdsaP384Sha384 => ECDSA_WITH_SHA384,
            Self::RsaPkcs1Sha256 => SHA256_WITH_RSA_ENCRYPTION,
        }
    }

    /// ECDSA identifiers omit parameters (RFC 5758); RSA ones carry NULL (RFC 4055)
    pub fn algorithm_identifier(&self) -> AlgorithmIdentifierOwned {
        let parameters = match self {
            Self::EcdsaP256Sha256 | Self::EcdsaP384Sha384 => None,
            Self::RsaPkcs1Sha256 => Some(Any::from(AnyRef::NULL)),
        };
        AlgorithmIdentifierOwned {
            oid: self.oid(),
            parameters,
        }
    }
}

#[derive(Clone)]
enum KeyKind {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    Rsa(rsa::pkcs1v15::SigningKey<Sha256>),
}

/// Private key used to sign OCSP responses
#[derive(Clone)]
pub struct SigningKey {
    kind: KeyKind,
}

impl SigningKey {
    /// Parse a PEM (`PRIVATE KEY`, `EC PRIVATE KEY` or `RSA PRIVATE KEY`) or PKCS#8 DER key
    pub fn from_pem(bytes: &[u8]) -> Result<Self> {
        let key = pem::decode_private_key(bytes)?;
        Self::from_key_der(&key)
    }

    pub fn from_key_der(key: &PrivateKeyDer<'_>) -> Result<Self> {
        match key {
            PrivateKeyDer::Pkcs8(der) => {
                debug!("Detected PKCS#8 private key");
                Self::from_pkcs8_der(der.secret_pkcs8_der())
            }
            PrivateKeyDer::Sec1(der) => {
                debug!("Detected SEC1 private key");
                Self::from_sec1_der(der.secret_sec1_der())
            }
            PrivateKeyDer::Pkcs1(der) => {
                debug!("Detected PKCS#1 RSA private key");
                Self::from_pkcs1_der(der.secret_pkcs1_der())
            }
            _ => Err(Error::parse(Artifact::PrivateKey, "Unsupported private key encoding")),
        }
    }

    /// Parse a PKCS#8 `PrivateKeyInfo` holding a P-256, P-384 or RSA key
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        if let Ok(key) = p256::ecdsa::SigningKey::from_pkcs8_der(der) {
            return Ok(key.into());
        }
        if let Ok(key) = p384::ecdsa::SigningKey::from_pkcs8_der(der) {
            return Ok(key.into());
        }

        rsa::RsaPrivateKey::from_pkcs8_der(der)
            .map(Self::from)
            .map_err(|e| Error::parse(Artifact::PrivateKey, format!("Unsupported PKCS#8 key: {}", e)))
    }

    /// Parse a SEC1 `ECPrivateKey` on P-256 or P-384
    pub fn from_sec1_der(der: &[u8]) -> Result<Self> {
        if let Ok(secret) = p256::SecretKey::from_sec1_der(der) {
            return Ok(p256::ecdsa::SigningKey::from(secret).into());
        }

        p384::SecretKey::from_sec1_der(der)
            .map(|secret| p384::ecdsa::SigningKey::from(secret).into())
            .map_err(|e| Error::parse(Artifact::PrivateKey, format!("Unsupported SEC1 key: {}", e)))
    }

    /// Parse a PKCS#1 `RSAPrivateKey`
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        rsa::RsaPrivateKey::from_pkcs1_der(der)
            .map(Self::from)
            .map_err(|e| Error::parse(Artifact::PrivateKey, format!("Invalid PKCS#1 key: {}", e)))
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        match &self.kind {
            KeyKind::P256(_) => SignatureAlgorithm::EcdsaP256Sha256,
            KeyKind::P384(_) => SignatureAlgorithm::EcdsaP384Sha384,
            KeyKind::Rsa(_) => SignatureAlgorithm::RsaPkcs1Sha256,
        }
    }

    /// Sign `message`; ECDSA signatures are DER-encoded, RSA ones are the raw block
    pub fn sign(&self, message: &[u8]) -> std::result::Result<Vec<u8>, rsa::signature::Error> {
        match &self.kind {
            KeyKind::P256(key) => {
                let signature: p256::ecdsa::Signature = key.try_sign(message)?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            KeyKind::P384(key) => {
                let signature: p384::ecdsa::Signature = key.try_sign(message)?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            KeyKind::Rsa(key) => {
                let signature: rsa::pkcs1v15::Signature = key.try_sign(message)?;
                Ok(signature.to_vec())
            }
        }
    }
}

impl From<p256::ecdsa::SigningKey> for SigningKey {
    fn from(key: p256::ecdsa::SigningKey) -> Self {
        Self { kind: KeyKind::P256(key) }
    }
}

impl From<p384::ecdsa::SigningKey> for SigningKey {
    fn from(key: p384::ecdsa::SigningKey) -> Self {
        Self { kind: KeyKind::P384(key) }
    }
}

impl From<rsa::RsaPrivateKey> for SigningKey {
    fn from(key: rsa::RsaPrivateKey) -> Self {
        Self {
            kind: KeyKind::Rsa(rsa::pkcs1v15::SigningKey::new(key)),
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}
