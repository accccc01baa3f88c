use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use der::asn1::{BitString, GeneralizedTime, Null, OctetString};
use der::Encode;
use thiserror::Error;
use x509_cert::serial_number::SerialNumber;

use super::asn1::{
    self, BasicOcspResponse, CertId, CrlReasonCode, OcspResponse, OcspResponseStatus, ResponderId,
    ResponseBytes, ResponseData, RevokedInfo, SingleResponse, Version, ID_PKIX_OCSP_BASIC,
};
use super::template::ResponseTemplate;
use crate::ca::CertStatus;
use crate::crypto::{CertIdHash, Certificate, SigningKey};

/// Failure while encoding or signing a response
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("DER encoding failed: {0}")]
    Der(#[from] der::Error),

    #[error("timestamp {0} cannot be encoded")]
    TimeOutOfRange(String),

    #[error("revoked status without revocation details")]
    MissingRevocation,

    #[error("signature generation failed: {0}")]
    Signature(String),
}

/// Turns a response template into signed DER bytes
#[cfg_attr(test, mockall::automock)]
pub trait ResponseEncoder: Send + Sync {
    fn encode_and_sign(
        &self,
        issuer: &Certificate,
        responder: &Certificate,
        template: &ResponseTemplate,
        key: &SigningKey,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// RFC 6960 `OCSPResponse` encoder with a single `SingleResponse`, a
/// by-key responder ID and the responder certificate embedded
#[derive(Debug, Clone, Copy, Default)]
pub struct DerResponseEncoder {
    cert_id_hash: CertIdHash,
}

impl DerResponseEncoder {
    pub fn new(cert_id_hash: CertIdHash) -> Self {
        Self { cert_id_hash }
    }

    pub fn cert_id_hash(&self) -> CertIdHash {
        self.cert_id_hash
    }

    fn cert_id(&self, issuer: &Certificate, serial_number: &SerialNumber) -> Result<CertId, EncodeError> {
        Ok(CertId {
            hash_algorithm: self.cert_id_hash.algorithm_identifier(),
            issuer_name_hash: OctetString::new(self.cert_id_hash.digest(issuer.raw_subject()))?,
            issuer_key_hash: OctetString::new(self.cert_id_hash.digest(issuer.subject_public_key_bits()))?,
            serial_number: serial_number.clone(),
        })
    }
}

impl ResponseEncoder for DerResponseEncoder {
    fn encode_and_sign(
        &self,
        issuer: &Certificate,
        responder: &Certificate,
        template: &ResponseTemplate,
        key: &SigningKey,
    ) -> Result<Vec<u8>, EncodeError> {
        let single = SingleResponse {
            cert_id: self.cert_id(issuer, &template.serial_number)?,
            cert_status: cert_status(template)?,
            this_update: generalized_time(template.this_update)?,
            next_update: Some(generalized_time(template.next_update)?),
            single_extensions: None,
        };

        // ResponderID keys are always SHA-1 (RFC 6960 section 4.2.1)
        let responder_key_hash = CertIdHash::Sha1.digest(responder.subject_public_key_bits());
        let tbs_response_data = ResponseData {
            version: Version::V1,
            responder_id: ResponderId::ByKey(OctetString::new(responder_key_hash)?),
            produced_at: generalized_time(template.produced_at)?,
            responses: vec![single],
            response_extensions: None,
        };

        let signature = key
            .sign(&tbs_response_data.to_der()?)
            .map_err(|e| EncodeError::Signature(e.to_string()))?;

        let basic = BasicOcspResponse {
            tbs_response_data,
            signature_algorithm: key.algorithm().algorithm_identifier(),
            signature: BitString::from_bytes(&signature)?,
            certs: Some(vec![template.responder_certificate.as_x509().clone()]),
        };

        let response = OcspResponse {
            response_status: OcspResponseStatus::Successful,
            response_bytes: Some(ResponseBytes {
                response_type: ID_PKIX_OCSP_BASIC,
                response: OctetString::new(basic.to_der()?)?,
            }),
        };

        Ok(response.to_der()?)
    }
}

fn cert_status(template: &ResponseTemplate) -> Result<asn1::CertStatus, EncodeError> {
    let status = match template.status {
        CertStatus::Good => asn1::CertStatus::Good(Null),
        CertStatus::Unknown => asn1::CertStatus::Unknown(Null),
        CertStatus::Revoked => {
            let revocation = template.revocation.ok_or(EncodeError::MissingRevocation)?;
            asn1::CertStatus::Revoked(RevokedInfo {
                revocation_time: generalized_time(revocation.revoked_at)?,
                revocation_reason: Some(CrlReasonCode(revocation.reason)),
            })
        }
    };
    Ok(status)
}

/// GeneralizedTime at second precision; instants before the Unix epoch are rejected
pub fn generalized_time(t: DateTime<Utc>) -> Result<GeneralizedTime, EncodeError> {
    let secs = u64::try_from(t.timestamp()).map_err(|_| EncodeError::TimeOutOfRange(t.to_rfc3339()))?;
    GeneralizedTime::from_unix_duration(StdDuration::from_secs(secs))
        .map_err(|_| EncodeError::TimeOutOfRange(t.to_rfc3339()))
}
