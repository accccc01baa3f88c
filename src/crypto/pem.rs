use rustls_pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use tracing::debug;

use crate::error::Error;
use crate::types::{Artifact, Result};

const PEM_BOUNDARY: &[u8] = b"-----BEGIN";

/// Whether the bytes look like PEM rather than raw DER
pub fn is_pem(bytes: &[u8]) -> bool {
    let trimmed = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|start| &bytes[start..])
        .unwrap_or_default();
    trimmed.starts_with(PEM_BOUNDARY)
}

/// Decode the first certificate of a PEM bundle; DER input is passed through
pub fn decode_certificate(bytes: &[u8]) -> Result<Vec<u8>> {
    if !is_pem(bytes) {
        return Ok(bytes.to_vec());
    }

    let mut reader = bytes;
    let first = rustls_pemfile::certs(&mut reader).next();
    match first {
        Some(Ok(cert)) => Ok(cert.as_ref().to_vec()),
        Some(Err(e)) => Err(Error::parse(Artifact::Certificate, format!("Malformed PEM: {}", e))),
        None => Err(Error::parse(Artifact::Certificate, "No CERTIFICATE block found")),
    }
}

/// Decode the first private key of a PEM file; DER input is assumed to be PKCS#8
pub fn decode_private_key(bytes: &[u8]) -> Result<PrivateKeyDer<'static>> {
    if !is_pem(bytes) {
        debug!("Treating DER private key as PKCS#8");
        return Ok(PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(bytes.to_vec())));
    }

    let mut reader = bytes;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| Error::parse(Artifact::PrivateKey, format!("Malformed PEM: {}", e)))?
        .ok_or_else(|| Error::parse(Artifact::PrivateKey, "No private key block found"))
}
