use crate::error::Result;
use crate::keys::Key;

/// Core algorithm trait that all signature algorithms implement
///
/// Different algorithm families (HMAC, RSA, ECDSA) implement this trait.
pub trait Algorithm {
    /// The algorithm identifier (e.g., "HS256", "RS256")
    fn name(&self) -> &'static str;

    /// Verify a signature
    ///
    /// # Arguments
    /// * `signing_input` - The data that was signed (header.payload)
    /// * `signature` - The decoded signature bytes
    /// * `key` - The key to use for verification
    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()>;
}

/// Type alias for boxed algorithm trait objects
pub type SignatureVerifier = Box<dyn Algorithm + Send + Sync>;

/// Get a signature verifier for the given algorithm ID
pub fn get_verifier(algorithm: &super::AlgorithmId) -> SignatureVerifier {
    use super::AlgorithmId;

    match algorithm {
        AlgorithmId::HS256 => Box::new(super::hmac::HS256),
        AlgorithmId::HS384 => Box::new(super::hmac::HS384),
        AlgorithmId::HS512 => Box::new(super::hmac::HS512),

        #[cfg(feature = "rsa")]
        AlgorithmId::RS256 => Box::new(super::rsa::RS256),
        #[cfg(feature = "rsa")]
        AlgorithmId::RS384 => Box::new(super::rsa::RS384),
        #[cfg(feature = "rsa")]
        AlgorithmId::RS512 => Box::new(super::rsa::RS512),
        #[cfg(feature = "rsa")]
        AlgorithmId::PS256 => Box::new(super::rsa::PS256),
        #[cfg(feature = "rsa")]
        AlgorithmId::PS384 => Box::new(super::rsa::PS384),
        #[cfg(feature = "rsa")]
        AlgorithmId::PS512 => Box::new(super::rsa::PS512),

        #[cfg(feature = "ecdsa")]
        AlgorithmId::ES256 => Box::new(super::ecdsa::ES256),
        #[cfg(feature = "ecdsa")]
        AlgorithmId::ES384 => Box::new(super::ecdsa::ES384),
    }
}
