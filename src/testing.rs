//! Certificate fixtures generated at test time.

use std::sync::OnceLock;

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair, SerialNumber,
};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};

use crate::crypto::{Certificate, SigningKey};
use crate::identity::ResponderIdentity;

pub const ISSUER_CN: &str = "Test Issuing CA";

/// A self-signed CA able to issue leaf certificates
pub struct TestAuthority {
    pub cert: rcgen::Certificate,
    pub key: KeyPair,
}

fn params(cn: &str, serial: u64) -> CertificateParams {
    let mut params = CertificateParams::new(vec![cn.to_string()]).unwrap();
    let mut name = DistinguishedName::new();
    name.push(DnType::CommonName, cn);
    params.distinguished_name = name;

    // minimal big-endian encoding
    let bytes = serial.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    params.serial_number = Some(SerialNumber::from_slice(&bytes[start..]));
    params
}

impl TestAuthority {
    pub fn new(cn: &str) -> Self {
        let key = KeyPair::generate().unwrap();
        let mut params = params(cn, 1);
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        let cert = params.self_signed(&key).unwrap();
        Self { cert, key }
    }

    pub fn issue(&self, cn: &str, serial: u64) -> (rcgen::Certificate, KeyPair) {
        self.issue_for(cn, serial, KeyPair::generate().unwrap())
    }

    pub fn issue_for(&self, cn: &str, serial: u64, key: KeyPair) -> (rcgen::Certificate, KeyPair) {
        let cert = params(cn, serial).signed_by(&key, &self.cert, &self.key).unwrap();
        (cert, key)
    }

    pub fn issue_certificate(&self, cn: &str, serial: u64) -> Certificate {
        let (cert, _) = self.issue(cn, serial);
        Certificate::from_der(cert.der()).unwrap()
    }

    pub fn certificate(&self) -> Certificate {
        Certificate::from_der(self.cert.der()).unwrap()
    }
}

pub struct Fixture {
    pub authority: TestAuthority,
    pub identity: ResponderIdentity,
    /// Certificate issued by the authority, to be attested
    pub leaf: Certificate,
}

/// 2048-bit RSA key, generated once per test binary
pub fn rsa_key() -> &'static rsa::RsaPrivateKey {
    static KEY: OnceLock<rsa::RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap())
}

/// [`rsa_key`] as an rcgen key pair signing with sha256WithRSAEncryption
pub fn rsa_key_pair() -> KeyPair {
    let pem = rsa_key().to_pkcs8_pem(LineEnding::LF).unwrap();
    KeyPair::from_pkcs8_pem_and_sign_algo(&pem, &rcgen::PKCS_RSA_SHA256).unwrap()
}

/// A responder delegated by [`ISSUER_CN`] with a one hour interval
pub fn responder_fixture() -> Fixture {
    responder_fixture_for(KeyPair::generate().unwrap())
}

/// Like [`responder_fixture`], with the responder holding `responder_key`
pub fn responder_fixture_for(responder_key: KeyPair) -> Fixture {
    let authority = TestAuthority::new(ISSUER_CN);
    let (responder, responder_key) = authority.issue_for("ocsp.example.org", 2, responder_key);
    let signing_key = SigningKey::from_pkcs8_der(&responder_key.serialize_der()).unwrap();

    let identity = ResponderIdentity::new(
        authority.certificate(),
        Certificate::from_der(responder.der()).unwrap(),
        signing_key,
        3600,
    )
    .unwrap();
    let leaf = authority.issue_certificate("leaf.example.org", 0x0a11ce);

    Fixture {
        authority,
        identity,
        leaf,
    }
}
