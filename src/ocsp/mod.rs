pub mod asn1;
pub mod encoder;
pub mod request;
pub mod signer;
pub mod template;

pub use encoder::{DerResponseEncoder, EncodeError, ResponseEncoder};
pub use request::SignRequest;
pub use signer::{sign, sign_with, ResponseSigner, StandardSigner};
pub use template::{ResponseTemplate, Revocation};
