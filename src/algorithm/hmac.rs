use crate::algorithm::Algorithm;
use crate::error::{Result, SignatureError};
use crate::keys::Key;

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// HS256 algorithm (HMAC with SHA-256)
pub struct HS256;

/// HS384 algorithm (HMAC with SHA-384)
pub struct HS384;

/// HS512 algorithm (HMAC with SHA-512)
pub struct HS512;

impl Algorithm for HS256 {
    fn name(&self) -> &'static str {
        "HS256"
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        let secret = key.as_symmetric(self.name())?.as_bytes();
        let mut mac = Hmac::<Sha256>::new_from_slice(secret).map_err(|_| SignatureError::Invalid)?;
        mac.update(signing_input.as_bytes());
        compare(signature, &mac.finalize().into_bytes())
    }
}

impl Algorithm for HS384 {
    fn name(&self) -> &'static str {
        "HS384"
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        let secret = key.as_symmetric(self.name())?.as_bytes();
        let mut mac = Hmac::<Sha384>::new_from_slice(secret).map_err(|_| SignatureError::Invalid)?;
        mac.update(signing_input.as_bytes());
        compare(signature, &mac.finalize().into_bytes())
    }
}

impl Algorithm for HS512 {
    fn name(&self) -> &'static str {
        "HS512"
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        let secret = key.as_symmetric(self.name())?.as_bytes();
        let mut mac = Hmac::<Sha512>::new_from_slice(secret).map_err(|_| SignatureError::Invalid)?;
        mac.update(signing_input.as_bytes());
        compare(signature, &mac.finalize().into_bytes())
    }
}

/// Constant-time comparison of provided and expected MAC
fn compare(provided: &[u8], expected: &[u8]) -> Result<()> {
    if provided.len() == expected.len() && constant_time_eq(provided, expected) {
        Ok(())
    } else {
        Err(SignatureError::Invalid.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn hs256(signing_input: &str, secret: &[u8]) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret).unwrap();
        mac.update(signing_input.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    const SIGNING_INPUT: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

    #[test]
    fn test_hs256_valid_signature() {
        let secret = b"your-256-bit-secret";
        let signature = hs256(SIGNING_INPUT, secret);

        let key = Key::symmetric(secret.to_vec());
        assert!(HS256.verify(SIGNING_INPUT, &signature, &key).is_ok());
    }

    #[test]
    fn test_hs256_wrong_secret() {
        let signature = hs256(SIGNING_INPUT, b"your-256-bit-secret");
        let key = Key::symmetric(b"wrong-secret".to_vec());

        let result = HS256.verify(SIGNING_INPUT, &signature, &key);
        assert!(matches!(
            result,
            Err(Error::UntrustedSignature(SignatureError::Invalid))
        ));
    }

    #[test]
    fn test_truncated_signature() {
        let secret = b"your-256-bit-secret";
        let signature = hs256(SIGNING_INPUT, secret);
        let key = Key::symmetric(secret.to_vec());

        assert!(HS256.verify(SIGNING_INPUT, &signature[..16], &key).is_err());
    }

    #[test]
    fn test_hs512_valid_signature() {
        let secret = b"your-512-bit-secret-needs-to-be-even-longer-than-384-bit";
        let mut mac = Hmac::<Sha512>::new_from_slice(secret).unwrap();
        mac.update(SIGNING_INPUT.as_bytes());
        let signature = mac.finalize().into_bytes();

        let key = Key::symmetric(secret.to_vec());
        assert!(HS512.verify(SIGNING_INPUT, &signature, &key).is_ok());
        // Same MAC must not pass under a different hash
        assert!(HS384.verify(SIGNING_INPUT, &signature, &key).is_err());
    }

    #[cfg(feature = "rsa")]
    #[test]
    fn test_wrong_key_type() {
        let rsa_key = Key::rsa_public(vec![1, 2, 3]);
        let result = HS256.verify(SIGNING_INPUT, b"sig", &rsa_key);
        assert!(matches!(
            result,
            Err(Error::UntrustedSignature(SignatureError::KeyTypeMismatch { .. }))
        ));
    }
}
