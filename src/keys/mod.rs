//! Key types for signature verification
//!
//! This module provides a type-safe abstraction over different key types:
//! - Symmetric keys (for HMAC algorithms)
//! - Asymmetric public keys (for RSA/ECDSA algorithms)
//!
//! and the [`KeySet`] that a [`ValidationContext`](crate::ValidationContext)
//! resolves verification keys from.

mod jwk;

pub use jwk::Jwk;

use crate::error::{Error, Result, SignatureError};
use crate::limits::MAX_KEY_SET_SIZE;

/// A key that can be used for signature verification
#[derive(Debug, Clone)]
pub enum Key {
    /// Symmetric key for HMAC algorithms
    Symmetric(SymmetricKey),

    /// Asymmetric public key for RSA/ECDSA algorithms
    Asymmetric(AsymmetricKey),
}

impl Key {
    /// Create a symmetric key from bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Create an RSA public key from a DER-encoded PKCS#1 `RSAPublicKey`
    #[cfg(feature = "rsa")]
    pub fn rsa_public(der: impl Into<Vec<u8>>) -> Self {
        Key::Asymmetric(AsymmetricKey::Rsa(RsaPublicKey::Der(der.into())))
    }

    /// Create an RSA public key from its big-endian modulus and exponent
    #[cfg(feature = "rsa")]
    pub fn rsa_components(n: impl Into<Vec<u8>>, e: impl Into<Vec<u8>>) -> Self {
        let n = strip_leading_zeros(n.into());
        let e = strip_leading_zeros(e.into());
        Key::Asymmetric(AsymmetricKey::Rsa(RsaPublicKey::Components { n, e }))
    }

    /// Create an ECDSA public key from an uncompressed SEC1 point
    #[cfg(feature = "ecdsa")]
    pub fn ecdsa_public(point: impl Into<Vec<u8>>, curve: EcdsaCurve) -> Self {
        Key::Asymmetric(AsymmetricKey::Ecdsa(EcdsaPublicKey::new(point.into(), curve)))
    }

    /// Parse a single JWK JSON object
    pub fn from_jwk(json: &str) -> Result<Self> {
        Jwk::from_json(json)?.to_key()
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "Symmetric",
            #[cfg(feature = "rsa")]
            Key::Asymmetric(AsymmetricKey::Rsa(_)) => "RSA",
            #[cfg(feature = "ecdsa")]
            Key::Asymmetric(AsymmetricKey::Ecdsa(_)) => "ECDSA",
            #[cfg(not(any(feature = "rsa", feature = "ecdsa")))]
            Key::Asymmetric(_) => unreachable!("No asymmetric key types enabled"),
        }
    }

    fn mismatch(&self, algorithm: &str, expected: &str) -> Error {
        Error::UntrustedSignature(SignatureError::KeyTypeMismatch {
            algorithm: algorithm.to_string(),
            expected: expected.to_string(),
            actual: self.key_type().to_string(),
        })
    }

    /// Get as symmetric key or return error
    pub fn as_symmetric(&self, algorithm: &str) -> Result<&SymmetricKey> {
        match self {
            Key::Symmetric(key) => Ok(key),
            _ => Err(self.mismatch(algorithm, "Symmetric")),
        }
    }

    /// Get as RSA public key or return error
    #[cfg(feature = "rsa")]
    pub fn as_rsa_public(&self, algorithm: &str) -> Result<&RsaPublicKey> {
        match self {
            Key::Asymmetric(AsymmetricKey::Rsa(key)) => Ok(key),
            _ => Err(self.mismatch(algorithm, "RSA")),
        }
    }

    /// Get as ECDSA public key or return error
    #[cfg(feature = "ecdsa")]
    pub fn as_ecdsa_public(&self, algorithm: &str) -> Result<&EcdsaPublicKey> {
        match self {
            Key::Asymmetric(AsymmetricKey::Ecdsa(key)) => Ok(key),
            _ => Err(self.mismatch(algorithm, "ECDSA")),
        }
    }
}

#[cfg(feature = "rsa")]
fn strip_leading_zeros(mut bytes: Vec<u8>) -> Vec<u8> {
    let zeros = bytes.iter().take_while(|b| **b == 0).count();
    bytes.drain(..zeros);
    bytes
}

/// Symmetric key for HMAC algorithms
#[derive(Clone)]
pub struct SymmetricKey {
    secret: Vec<u8>,
}

impl SymmetricKey {
    /// Create a new symmetric key
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

// Never print secret material
impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.secret.len())
            .finish()
    }
}

impl From<&[u8]> for SymmetricKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }
}

impl From<&str> for SymmetricKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}

/// Asymmetric public key for RSA/ECDSA algorithms
#[derive(Debug, Clone)]
pub enum AsymmetricKey {
    /// RSA public key
    #[cfg(feature = "rsa")]
    Rsa(RsaPublicKey),

    /// ECDSA public key
    #[cfg(feature = "ecdsa")]
    Ecdsa(EcdsaPublicKey),
}

/// RSA public key
#[cfg(feature = "rsa")]
#[derive(Debug, Clone)]
pub enum RsaPublicKey {
    /// DER-encoded PKCS#1 `RSAPublicKey`
    Der(Vec<u8>),
    /// Big-endian modulus and exponent (as carried by a JWK)
    Components { n: Vec<u8>, e: Vec<u8> },
}

/// ECDSA curve identifier
#[cfg(feature = "ecdsa")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaCurve {
    /// P-256 (secp256r1) curve
    P256,
    /// P-384 (secp384r1) curve
    P384,
}

#[cfg(feature = "ecdsa")]
impl EcdsaCurve {
    /// Length of one coordinate in bytes
    pub fn coordinate_len(&self) -> usize {
        match self {
            EcdsaCurve::P256 => 32,
            EcdsaCurve::P384 => 48,
        }
    }
}

/// ECDSA public key (uncompressed SEC1 point `0x04 || X || Y`)
#[cfg(feature = "ecdsa")]
#[derive(Debug, Clone)]
pub struct EcdsaPublicKey {
    point: Vec<u8>,
    curve: EcdsaCurve,
}

#[cfg(feature = "ecdsa")]
impl EcdsaPublicKey {
    /// Create a new ECDSA public key from an uncompressed point
    pub fn new(point: Vec<u8>, curve: EcdsaCurve) -> Self {
        Self { point, curve }
    }

    /// Get the encoded point
    pub fn as_bytes(&self) -> &[u8] {
        &self.point
    }

    /// Get the curve
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }
}

/// Verification keys, optionally addressed by key ID
///
/// A set holding exactly one key uses it for every token, whatever `kid` the
/// token header names. A set holding several keys requires the header `kid`
/// to match one of them; there is no trial verification against candidates.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    entries: Vec<(Option<String>, Key)>,
}

impl KeySet {
    /// Create an empty key set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a key set holding a single key without key ID
    pub fn single(key: Key) -> Self {
        Self {
            entries: vec![(None, key)],
        }
    }

    /// Add a key under a key ID, replacing any key with the same ID
    pub fn insert(&mut self, kid: impl Into<String>, key: Key) -> &mut Self {
        let kid = kid.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.as_deref() == Some(kid.as_str()))
        {
            Some(entry) => entry.1 = key,
            None => self.entries.push((Some(kid), key)),
        }
        self
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with_key(mut self, kid: impl Into<String>, key: Key) -> Self {
        self.insert(kid, key);
        self
    }

    /// Parse a JWK Set document (`{"keys": [...]}`)
    ///
    /// Keys of unsupported types are rejected rather than skipped. When the
    /// document holds more than one key, every key must carry a `kid`.
    pub fn from_jwks(json: &str) -> Result<Self> {
        #[derive(serde::Deserialize)]
        struct JwkSet {
            keys: Vec<Jwk>,
        }

        let set: JwkSet = serde_json::from_str(json)
            .map_err(|e| Error::InvalidKey(format!("jwks: failed to parse key set: {e}")))?;

        if set.keys.len() > MAX_KEY_SET_SIZE {
            return Err(Error::InvalidKey(format!(
                "jwks: {} keys (maximum: {MAX_KEY_SET_SIZE})",
                set.keys.len()
            )));
        }

        let multiple = set.keys.len() > 1;
        let mut keys = KeySet::new();
        for jwk in set.keys {
            let key = jwk.to_key()?;
            match jwk.kid {
                Some(kid) => {
                    keys.insert(kid, key);
                }
                None if multiple => {
                    return Err(Error::InvalidKey(
                        "jwks: key without kid in a multi-key set".to_string(),
                    ));
                }
                None => keys.entries.push((None, key)),
            }
        }
        Ok(keys)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a key by key ID
    pub fn get(&self, kid: &str) -> Option<&Key> {
        self.entries
            .iter()
            .find(|(id, _)| id.as_deref() == Some(kid))
            .map(|(_, key)| key)
    }

    /// Key set usable for kid selection
    ///
    /// A set with several keys selects by `kid`, so a key without one could
    /// never be chosen.
    pub(crate) fn check_key_ids(&self) -> Result<()> {
        if self.entries.len() > 1 && self.entries.iter().any(|(kid, _)| kid.is_none()) {
            return Err(Error::ConfigurationInvalid(
                "key without kid in a multi-key set".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the verification key for a token header `kid`
    pub fn resolve(&self, kid: Option<&str>) -> std::result::Result<&Key, SignatureError> {
        match self.entries.as_slice() {
            [] => Err(SignatureError::NoKeys),
            [(_, key)] => Ok(key),
            entries => {
                let kid = kid.ok_or(SignatureError::KeyIdRequired {
                    key_count: entries.len(),
                })?;
                self.get(kid)
                    .ok_or_else(|| SignatureError::UnknownKeyId(kid.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_key_conversions() {
        let key1 = SymmetricKey::from("secret");
        assert_eq!(key1.as_bytes(), b"secret");

        let key2 = SymmetricKey::from(&[1u8, 2, 3][..]);
        assert_eq!(key2.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_symmetric_debug_hides_secret() {
        let key = SymmetricKey::from("hunter2");
        assert!(!format!("{key:?}").contains("hunter2"));
    }

    #[test]
    fn test_key_type_checking() {
        let sym_key = Key::symmetric(b"secret".to_vec());
        assert!(sym_key.as_symmetric("HS256").is_ok());

        #[cfg(feature = "rsa")]
        assert!(matches!(
            sym_key.as_rsa_public("RS256"),
            Err(Error::UntrustedSignature(SignatureError::KeyTypeMismatch { .. }))
        ));

        #[cfg(feature = "ecdsa")]
        assert!(sym_key.as_ecdsa_public("ES256").is_err());
    }

    #[test]
    fn test_single_key_ignores_kid() {
        let keys = KeySet::single(Key::symmetric(b"a".to_vec()));
        assert!(keys.resolve(None).is_ok());
        assert!(keys.resolve(Some("anything")).is_ok());
    }

    #[test]
    fn test_multi_key_requires_matching_kid() {
        let keys = KeySet::new()
            .with_key("one", Key::symmetric(b"a".to_vec()))
            .with_key("two", Key::symmetric(b"b".to_vec()));

        assert!(keys.resolve(Some("two")).is_ok());
        assert_eq!(
            keys.resolve(None).unwrap_err(),
            SignatureError::KeyIdRequired { key_count: 2 }
        );
        assert_eq!(
            keys.resolve(Some("three")).unwrap_err(),
            SignatureError::UnknownKeyId("three".into())
        );
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(
            KeySet::new().resolve(Some("x")).unwrap_err(),
            SignatureError::NoKeys
        );
    }

    #[test]
    fn test_insert_replaces_same_kid() {
        let mut keys = KeySet::new();
        keys.insert("k", Key::symmetric(b"a".to_vec()));
        keys.insert("k", Key::symmetric(b"b".to_vec()));
        assert_eq!(keys.len(), 1);
        let key = keys.get("k").unwrap().as_symmetric("HS256").unwrap();
        assert_eq!(key.as_bytes(), b"b");
    }

    #[test]
    fn test_from_jwks_oct_keys() {
        let jwks = r#"{"keys":[
            {"kty":"oct","kid":"a","k":"c2VjcmV0LWE"},
            {"kty":"oct","kid":"b","k":"c2VjcmV0LWI"}
        ]}"#;
        let keys = KeySet::from_jwks(jwks).unwrap();
        assert_eq!(keys.len(), 2);
        let b = keys.get("b").unwrap().as_symmetric("HS256").unwrap();
        assert_eq!(b.as_bytes(), b"secret-b");
    }

    #[test]
    fn test_from_jwks_requires_kid_for_multiple_keys() {
        let jwks = r#"{"keys":[
            {"kty":"oct","k":"c2VjcmV0LWE"},
            {"kty":"oct","kid":"b","k":"c2VjcmV0LWI"}
        ]}"#;
        assert!(matches!(
            KeySet::from_jwks(jwks),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_from_jwks_single_key_without_kid() {
        let keys = KeySet::from_jwks(r#"{"keys":[{"kty":"oct","k":"c2VjcmV0"}]}"#).unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys.resolve(Some("whatever")).is_ok());
    }
}
