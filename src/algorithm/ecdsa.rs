use crate::algorithm::Algorithm;
use crate::error::{Error, Result, SignatureError};
use crate::keys::{EcdsaCurve, Key};

use ring::signature::{self, UnparsedPublicKey};

/// ES256 algorithm (ECDSA with P-256 and SHA-256)
pub struct ES256;

/// ES384 algorithm (ECDSA with P-384 and SHA-384)
pub struct ES384;

impl Algorithm for ES256 {
    fn name(&self) -> &'static str {
        "ES256"
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_ecdsa(
            self.name(),
            signing_input,
            signature,
            key,
            EcdsaCurve::P256,
            &signature::ECDSA_P256_SHA256_FIXED,
        )
    }
}

impl Algorithm for ES384 {
    fn name(&self) -> &'static str {
        "ES384"
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_ecdsa(
            self.name(),
            signing_input,
            signature,
            key,
            EcdsaCurve::P384,
            &signature::ECDSA_P384_SHA384_FIXED,
        )
    }
}

/// Generic ECDSA signature verification
///
/// JWS ECDSA signatures are the fixed-length `R || S` form (RFC 7518 §3.4),
/// not ASN.1 DER.
fn verify_ecdsa(
    name: &str,
    signing_input: &str,
    signature: &[u8],
    key: &Key,
    curve: EcdsaCurve,
    algorithm: &'static dyn signature::VerificationAlgorithm,
) -> Result<()> {
    let ecdsa_key = key.as_ecdsa_public(name)?;

    if ecdsa_key.curve() != curve {
        return Err(Error::UntrustedSignature(SignatureError::KeyTypeMismatch {
            algorithm: name.to_string(),
            expected: format!("ECDSA {curve:?}"),
            actual: format!("ECDSA {:?}", ecdsa_key.curve()),
        }));
    }

    UnparsedPublicKey::new(algorithm, ecdsa_key.as_bytes())
        .verify(signing_input.as_bytes(), signature)
        .map_err(|_| SignatureError::Invalid.into())
}
