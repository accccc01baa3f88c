use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::encoder::{DerResponseEncoder, EncodeError, ResponseEncoder};
use super::request::SignRequest;
use super::template::{ResponseTemplate, Revocation};
use crate::ca::{CertStatus, RevocationReason};
use crate::config::ResponderConfig;
use crate::crypto::{ChainVerifier, X509ChainVerifier};
use crate::error::RequestError;
use crate::identity::ResponderIdentity;
use crate::types::Result;
use crate::utils::time::{truncate_to_hour, truncate_to_minute, Clock, SystemClock};

/// Produces signed OCSP responses
pub trait ResponseSigner: Send + Sync {
    fn sign(&self, request: &SignRequest) -> Result<Vec<u8>>;
}

/// Sign `request` with `identity` using the system clock, X.509 signature
/// verification and the DER response encoder
pub fn sign(identity: &ResponderIdentity, request: &SignRequest) -> Result<Vec<u8>> {
    sign_with(
        identity,
        request,
        &X509ChainVerifier,
        &DerResponseEncoder::default(),
        SystemClock.now(),
    )
}

/// Validate trust, build the response template and hand it to `encoder`
///
/// The issuer-name comparison runs before `verifier` is consulted, so
/// certificates from a foreign CA never reach the signature check. Both checks
/// must pass.
pub fn sign_with(
    identity: &ResponderIdentity,
    request: &SignRequest,
    verifier: &dyn ChainVerifier,
    encoder: &dyn ResponseEncoder,
    now: DateTime<Utc>,
) -> Result<Vec<u8>> {
    let certificate = request
        .certificate
        .as_ref()
        .ok_or(RequestError::MissingCertificate)?;

    if certificate.raw_issuer() != identity.issuer().raw_subject() {
        return Err(RequestError::IssuerMismatch.into());
    }

    verifier
        .verify_issued_by(certificate, identity.issuer())
        .map_err(RequestError::UntrustedSignature)?;

    let this_update = truncate_to_hour(now).map_err(|e| EncodeError::TimeOutOfRange(e.to_string()))?;
    let next_update = this_update
        .checked_add_signed(identity.interval())
        .ok_or_else(|| EncodeError::TimeOutOfRange(format!("{} + {}", this_update, identity.interval())))?;
    let produced_at = truncate_to_minute(now).map_err(|e| EncodeError::TimeOutOfRange(e.to_string()))?;

    let status: CertStatus = request.status.parse()?;

    let revocation = match status {
        CertStatus::Revoked => {
            if RevocationReason::from_code(request.reason).is_none() {
                debug!("Passing through unregistered revocation reason {}", request.reason);
            }
            Some(Revocation {
                revoked_at: request.revoked_at.ok_or(RequestError::MissingRevocationTime)?,
                reason: request.reason,
            })
        }
        CertStatus::Good | CertStatus::Unknown => None,
    };

    let template = ResponseTemplate {
        status,
        serial_number: certificate.serial_number().clone(),
        this_update,
        next_update,
        produced_at,
        responder_certificate: identity.responder().clone(),
        revocation,
    };
    trace!(
        serial = ?template.serial_number,
        status = %template.status,
        this_update = %template.this_update,
        "Assembled OCSP response template"
    );

    let response = encoder.encode_and_sign(
        identity.issuer(),
        identity.responder(),
        &template,
        identity.signing_key(),
    )?;
    Ok(response)
}

/// Signer bound to one responder identity
///
/// Holds no per-call state; share it behind an `Arc` across threads.
pub struct StandardSigner {
    identity: ResponderIdentity,
    verifier: Arc<dyn ChainVerifier>,
    encoder: Arc<dyn ResponseEncoder>,
    clock: Arc<dyn Clock>,
}

impl StandardSigner {
    pub fn new(identity: ResponderIdentity) -> Self {
        Self {
            identity,
            verifier: Arc::new(X509ChainVerifier),
            encoder: Arc::new(DerResponseEncoder::default()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Load the issuer certificate, responder certificate and responder key
    /// from PEM files; `interval_seconds` is the freshness window
    pub fn from_files<P: AsRef<Path>>(
        issuer_path: P,
        responder_path: P,
        key_path: P,
        interval_seconds: u64,
    ) -> Result<Self> {
        let identity = ResponderIdentity::from_files(issuer_path, responder_path, key_path, interval_seconds)?;
        Ok(Self::new(identity))
    }

    pub fn from_config(config: &ResponderConfig) -> Result<Self> {
        let identity = ResponderIdentity::from_config(config)?;
        Ok(Self::new(identity).with_encoder(DerResponseEncoder::new(config.cert_id_hash)))
    }

    pub fn with_verifier<V: ChainVerifier + 'static>(mut self, verifier: V) -> Self {
        self.verifier = Arc::new(verifier);
        self
    }

    pub fn with_encoder<E: ResponseEncoder + 'static>(mut self, encoder: E) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn identity(&self) -> &ResponderIdentity {
        &self.identity
    }
}

impl ResponseSigner for StandardSigner {
    fn sign(&self, request: &SignRequest) -> Result<Vec<u8>> {
        sign_with(
            &self.identity,
            request,
            self.verifier.as_ref(),
            self.encoder.as_ref(),
            self.clock.now(),
        )
    }
}

impl fmt::Debug for StandardSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardSigner")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::x509::MockChainVerifier;
    use crate::crypto::VerifyError;
    use crate::error::Error;
    use crate::ocsp::asn1::{self, BasicOcspResponse, CrlReasonCode, OcspResponse, SingleResponse};
    use crate::ocsp::encoder::MockResponseEncoder;
    use crate::telemetry::init_test_logging;
    use crate::testing::{responder_fixture, TestAuthority};
    use crate::utils::time::FixedClock;
    use chrono::{Duration, TimeZone};
    use der::Decode;
    use std::sync::Mutex;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, h, m, s).unwrap()
    }

    fn decode_single(der: &[u8]) -> SingleResponse {
        let response = OcspResponse::from_der(der).unwrap();
        let bytes = response.response_bytes.unwrap();
        let basic = BasicOcspResponse::from_der(bytes.response.as_bytes()).unwrap();
        basic.tbs_response_data.responses[0].clone()
    }

    fn secs(t: &der::asn1::GeneralizedTime) -> i64 {
        t.to_unix_duration().as_secs() as i64
    }

    fn no_verification() -> MockChainVerifier {
        let mut verifier = MockChainVerifier::new();
        verifier.expect_verify_issued_by().times(0);
        verifier
    }

    fn no_encoding() -> MockResponseEncoder {
        let mut encoder = MockResponseEncoder::new();
        encoder.expect_encode_and_sign().times(0);
        encoder
    }

    #[test]
    fn test_valid_certificate_is_signed() {
        init_test_logging();
        let fixture = responder_fixture();
        let request = SignRequest::good(fixture.leaf.clone());

        let der = sign(&fixture.identity, &request).unwrap();
        let single = decode_single(&der);
        assert_eq!(&single.cert_id.serial_number, fixture.leaf.serial_number());
        assert_eq!(single.cert_status, asn1::CertStatus::Good(der::asn1::Null));
    }

    #[test]
    fn test_forged_signature_rejected() {
        let fixture = responder_fixture();
        let impostor = TestAuthority::new(crate::testing::ISSUER_CN);
        let forged = impostor.issue_certificate("forged.example.org", 99);
        assert_eq!(forged.raw_issuer(), fixture.identity.issuer().raw_subject());

        let result = sign(&fixture.identity, &SignRequest::good(forged));
        assert!(matches!(
            result,
            Err(Error::InvalidRequest(RequestError::UntrustedSignature(VerifyError::BadSignature(_))))
        ));
    }

    #[test]
    fn test_foreign_issuer_rejected_before_verification() {
        let fixture = responder_fixture();
        let other_ca = TestAuthority::new("Other CA");
        let foreign = other_ca.issue_certificate("foreign.example.org", 5);

        let result = sign_with(
            &fixture.identity,
            &SignRequest::good(foreign),
            &no_verification(),
            &no_encoding(),
            at(12, 0, 0),
        );
        assert!(matches!(result, Err(Error::InvalidRequest(RequestError::IssuerMismatch))));
    }

    #[test]
    fn test_missing_certificate_rejected_without_crypto() {
        let fixture = responder_fixture();
        let request = SignRequest {
            status: "good".into(),
            ..Default::default()
        };

        let result = sign_with(&fixture.identity, &request, &no_verification(), &no_encoding(), at(12, 0, 0));
        assert!(matches!(result, Err(Error::InvalidRequest(RequestError::MissingCertificate))));
    }

    #[test]
    fn test_name_match_alone_is_not_enough() {
        let fixture = responder_fixture();
        let mut verifier = MockChainVerifier::new();
        verifier
            .expect_verify_issued_by()
            .times(1)
            .returning(|_, _| Err(VerifyError::BadSignature("mismatch".into())));

        let result = sign_with(
            &fixture.identity,
            &SignRequest::good(fixture.leaf.clone()),
            &verifier,
            &no_encoding(),
            at(12, 0, 0),
        );
        assert!(matches!(
            result,
            Err(Error::InvalidRequest(RequestError::UntrustedSignature(_)))
        ));
    }

    #[test]
    fn test_every_status_maps_to_its_code() {
        let fixture = responder_fixture();
        let revoked_at = at(1, 2, 3);

        for status in CertStatus::ALL {
            let request = SignRequest::revoked(fixture.leaf.clone(), 1u32, revoked_at).with_status(status.as_str());
            let single = decode_single(&sign(&fixture.identity, &request).unwrap());
            let code = match single.cert_status {
                asn1::CertStatus::Good(_) => 0,
                asn1::CertStatus::Revoked(_) => 1,
                asn1::CertStatus::Unknown(_) => 2,
            };
            assert_eq!(code, status.code());
        }
    }

    #[test]
    fn test_unrecognized_status_rejected() {
        let fixture = responder_fixture();
        let request = SignRequest::good(fixture.leaf.clone()).with_status("expired");

        let result = sign(&fixture.identity, &request);
        match result {
            Err(Error::InvalidRequest(RequestError::UnrecognizedStatus(token))) => assert_eq!(token, "expired"),
            other => panic!("expected unrecognized status, got {:?}", other),
        }
    }

    #[test]
    fn test_revocation_fields_only_for_revoked() {
        let fixture = responder_fixture();
        let captured: Arc<Mutex<Vec<ResponseTemplate>>> = Arc::default();
        let sink = captured.clone();

        let mut encoder = MockResponseEncoder::new();
        encoder.expect_encode_and_sign().times(3).returning(move |_, _, template, _| {
            sink.lock().unwrap().push(template.clone());
            Ok(vec![0x30, 0x00])
        });

        let revoked_at = at(8, 30, 0);
        for status in CertStatus::ALL {
            let request = SignRequest::revoked(fixture.leaf.clone(), RevocationReason::Superseded, revoked_at)
                .with_status(status.as_str());
            sign_with(&fixture.identity, &request, &X509ChainVerifier, &encoder, at(9, 15, 0)).unwrap();
        }

        let templates = captured.lock().unwrap();
        assert_eq!(templates[0].status, CertStatus::Good);
        assert_eq!(templates[0].revocation, None);
        assert_eq!(
            templates[1].revocation,
            Some(Revocation { revoked_at, reason: 4 })
        );
        assert_eq!(templates[2].status, CertStatus::Unknown);
        assert_eq!(templates[2].revocation, None);
    }

    #[test]
    fn test_good_response_has_no_revoked_info() {
        let fixture = responder_fixture();
        let request = SignRequest::revoked(fixture.leaf.clone(), 1u32, at(3, 0, 0)).with_status("good");

        let der = sign(&fixture.identity, &request).unwrap();
        assert!(matches!(decode_single(&der).cert_status, asn1::CertStatus::Good(_)));
    }

    #[test]
    fn test_revoked_response_matches_request() {
        let fixture = responder_fixture();
        let revoked_at = at(4, 5, 6);
        let request = SignRequest::revoked(fixture.leaf.clone(), 6u32, revoked_at);

        let der = sign(&fixture.identity, &request).unwrap();
        match decode_single(&der).cert_status {
            asn1::CertStatus::Revoked(info) => {
                assert_eq!(secs(&info.revocation_time), revoked_at.timestamp());
                assert_eq!(info.revocation_reason, Some(CrlReasonCode(6)));
            }
            other => panic!("expected revoked status, got {:?}", other),
        }
    }

    #[test]
    fn test_revoked_requires_revocation_time() {
        let fixture = responder_fixture();
        let request = SignRequest::new(fixture.leaf.clone(), CertStatus::Revoked);

        let result = sign(&fixture.identity, &request);
        assert!(matches!(
            result,
            Err(Error::InvalidRequest(RequestError::MissingRevocationTime))
        ));
    }

    #[test]
    fn test_same_hour_shares_this_update() {
        let fixture = responder_fixture();
        let request = SignRequest::good(fixture.leaf.clone());

        let early = StandardSigner::new(fixture.identity.clone()).with_clock(FixedClock(at(14, 0, 1)));
        let late = StandardSigner::new(fixture.identity.clone()).with_clock(FixedClock(at(14, 59, 59)));

        let first = decode_single(&early.sign(&request).unwrap());
        let second = decode_single(&late.sign(&request).unwrap());

        assert_eq!(first.this_update, second.this_update);
        assert_eq!(secs(&first.this_update), at(14, 0, 0).timestamp());

        let interval = fixture.identity.interval().num_seconds();
        for single in [first, second] {
            assert_eq!(secs(&single.next_update.unwrap()) - secs(&single.this_update), interval);
        }
    }

    #[test]
    fn test_template_timestamps() {
        let fixture = responder_fixture();
        let captured: Arc<Mutex<Option<ResponseTemplate>>> = Arc::default();
        let sink = captured.clone();

        let mut encoder = MockResponseEncoder::new();
        encoder.expect_encode_and_sign().times(1).returning(move |_, _, template, _| {
            *sink.lock().unwrap() = Some(template.clone());
            Ok(Vec::new())
        });

        sign_with(
            &fixture.identity,
            &SignRequest::unknown(fixture.leaf.clone()),
            &X509ChainVerifier,
            &encoder,
            at(17, 42, 31) + Duration::milliseconds(250),
        )
        .unwrap();

        let template = captured.lock().unwrap().clone().unwrap();
        assert_eq!(template.this_update, at(17, 0, 0));
        assert_eq!(template.next_update, at(17, 0, 0) + fixture.identity.interval());
        assert_eq!(template.produced_at, at(17, 42, 0));
        assert_eq!(&template.serial_number, fixture.leaf.serial_number());
        assert_eq!(template.responder_certificate, *fixture.identity.responder());
    }

    #[test]
    fn test_encoder_failure_is_signing_failure() {
        let fixture = responder_fixture();
        let mut encoder = MockResponseEncoder::new();
        encoder
            .expect_encode_and_sign()
            .returning(|_, _, _, _| Err(EncodeError::Signature("key does not match algorithm".into())));

        let result = sign_with(
            &fixture.identity,
            &SignRequest::good(fixture.leaf.clone()),
            &X509ChainVerifier,
            &encoder,
            at(12, 0, 0),
        );
        match result {
            Err(Error::SigningFailure(EncodeError::Signature(reason))) => {
                assert_eq!(reason, "key does not match algorithm")
            }
            other => panic!("expected signing failure, got {:?}", other),
        }
    }

    #[test]
    fn test_pre_epoch_revocation_is_signing_failure() {
        let fixture = responder_fixture();
        let revoked_at = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        let request = SignRequest::revoked(fixture.leaf.clone(), 1u32, revoked_at);

        let result = sign(&fixture.identity, &request);
        assert!(matches!(result, Err(Error::SigningFailure(EncodeError::TimeOutOfRange(_)))));
    }

    #[test]
    fn test_signer_is_shareable_across_threads() {
        let fixture = responder_fixture();
        let signer: Arc<dyn ResponseSigner> = Arc::new(StandardSigner::new(fixture.identity.clone()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let signer = signer.clone();
                let request = SignRequest::good(fixture.leaf.clone());
                std::thread::spawn(move || signer.sign(&request))
            })
            .collect();

        for handle in handles {
            let der = handle.join().unwrap().unwrap();
            assert_eq!(&decode_single(&der).cert_id.serial_number, fixture.leaf.serial_number());
        }
    }
}
