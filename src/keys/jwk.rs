//! JWK (JSON Web Key) struct and conversion

use crate::error::{Error, Result};
use crate::keys::Key;
use crate::utils::base64url;
use serde::Deserialize;

/// Upper bound for any decoded JWK field (an 8192-bit modulus is 1KB)
const MAX_JWK_FIELD_SIZE: usize = 1024;

/// JSON Web Key (JWK) structure
///
/// All fields are optional to handle various JWK formats gracefully.
/// Validation happens during conversion to `Key`, not during parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type (e.g., "RSA", "EC", "oct")
    pub kty: Option<String>,
    /// Key ID
    pub kid: Option<String>,
    /// Algorithm
    pub alg: Option<String>,
    // RSA fields
    /// RSA modulus (Base64URL-encoded)
    pub n: Option<String>,
    /// RSA exponent (Base64URL-encoded)
    pub e: Option<String>,
    // ECDSA fields
    /// ECDSA curve name
    pub crv: Option<String>,
    /// ECDSA x coordinate (Base64URL-encoded)
    pub x: Option<String>,
    /// ECDSA y coordinate (Base64URL-encoded)
    pub y: Option<String>,
    // Symmetric fields
    /// Symmetric key value (Base64URL-encoded)
    pub k: Option<String>,
}

impl Jwk {
    /// Parse a single JWK JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidKey(format!("jwk: failed to parse key: {e}")))
    }

    /// Convert JWK to Key enum
    pub fn to_key(&self) -> Result<Key> {
        match self.kty.as_deref() {
            Some("oct") => {
                let k = self.field("k", &self.k)?;
                Ok(Key::symmetric(k))
            }
            #[cfg(feature = "rsa")]
            Some("RSA") => {
                let n = self.field("n", &self.n)?;
                let e = self.field("e", &self.e)?;
                Ok(Key::rsa_components(n, e))
            }
            #[cfg(feature = "ecdsa")]
            Some("EC") => self.to_ecdsa_key(),
            Some(kty) => Err(Error::InvalidKey(format!(
                "jwk: unsupported key type: {kty}"
            ))),
            None => Err(Error::InvalidKey("jwk: missing key type (kty)".to_string())),
        }
    }

    /// Decode a required Base64URL field
    fn field(&self, name: &str, value: &Option<String>) -> Result<Vec<u8>> {
        let encoded = value
            .as_deref()
            .ok_or_else(|| Error::InvalidKey(format!("jwk: missing field '{name}'")))?;
        base64url::decode_bytes(encoded, MAX_JWK_FIELD_SIZE)
            .map_err(|e| Error::InvalidKey(format!("jwk: failed to decode '{name}': {e}")))
    }

    #[cfg(feature = "ecdsa")]
    fn to_ecdsa_key(&self) -> Result<Key> {
        use crate::keys::EcdsaCurve;

        let curve = match self.crv.as_deref().map(str::trim) {
            Some("P-256") => EcdsaCurve::P256,
            Some("P-384") => EcdsaCurve::P384,
            Some(crv) => {
                return Err(Error::InvalidKey(format!(
                    "jwk: unsupported curve: {crv}"
                )));
            }
            None => return Err(Error::InvalidKey("jwk: ecdsa key missing crv".to_string())),
        };

        let x = self.field("x", &self.x)?;
        let y = self.field("y", &self.y)?;
        let len = curve.coordinate_len();
        if x.len() != len || y.len() != len {
            return Err(Error::InvalidKey(format!(
                "jwk: coordinates must be {len} bytes for {curve:?}"
            )));
        }

        let mut point = Vec::with_capacity(1 + 2 * len);
        point.push(0x04);
        point.extend_from_slice(&x);
        point.extend_from_slice(&y);
        Ok(Key::ecdsa_public(point, curve))
    }
}
