mod traits;

pub mod hmac;

#[cfg(feature = "rsa")]
pub mod rsa;

#[cfg(feature = "ecdsa")]
pub mod ecdsa;

pub use traits::{Algorithm, SignatureVerifier, get_verifier};

use crate::error::{Error, Result, SignatureError};

/// Algorithm identifier from a token header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmId {
    /// HMAC with SHA-256
    HS256,

    /// HMAC with SHA-384
    HS384,

    /// HMAC with SHA-512
    HS512,

    /// RSASSA-PKCS1-v1_5 with SHA-256
    #[cfg(feature = "rsa")]
    RS256,

    /// RSASSA-PKCS1-v1_5 with SHA-384
    #[cfg(feature = "rsa")]
    RS384,

    /// RSASSA-PKCS1-v1_5 with SHA-512
    #[cfg(feature = "rsa")]
    RS512,

    /// RSASSA-PSS with SHA-256
    #[cfg(feature = "rsa")]
    PS256,

    /// RSASSA-PSS with SHA-384
    #[cfg(feature = "rsa")]
    PS384,

    /// RSASSA-PSS with SHA-512
    #[cfg(feature = "rsa")]
    PS512,

    /// ECDSA with P-256 and SHA-256
    #[cfg(feature = "ecdsa")]
    ES256,

    /// ECDSA with P-384 and SHA-384
    #[cfg(feature = "ecdsa")]
    ES384,
}

impl AlgorithmId {
    /// Parse a signing algorithm name from a token header
    ///
    /// `none` is not a signing algorithm; unsecured tokens are classified
    /// before this is called.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "HS256" => Ok(AlgorithmId::HS256),
            "HS384" => Ok(AlgorithmId::HS384),
            "HS512" => Ok(AlgorithmId::HS512),

            #[cfg(feature = "rsa")]
            "RS256" => Ok(AlgorithmId::RS256),
            #[cfg(feature = "rsa")]
            "RS384" => Ok(AlgorithmId::RS384),
            #[cfg(feature = "rsa")]
            "RS512" => Ok(AlgorithmId::RS512),
            #[cfg(feature = "rsa")]
            "PS256" => Ok(AlgorithmId::PS256),
            #[cfg(feature = "rsa")]
            "PS384" => Ok(AlgorithmId::PS384),
            #[cfg(feature = "rsa")]
            "PS512" => Ok(AlgorithmId::PS512),

            #[cfg(feature = "ecdsa")]
            "ES256" => Ok(AlgorithmId::ES256),
            #[cfg(feature = "ecdsa")]
            "ES384" => Ok(AlgorithmId::ES384),

            _ => Err(Error::MalformedToken(format!(
                "algorithm '{s}' is not supported or not enabled"
            ))),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::HS256 => "HS256",
            AlgorithmId::HS384 => "HS384",
            AlgorithmId::HS512 => "HS512",

            #[cfg(feature = "rsa")]
            AlgorithmId::RS256 => "RS256",
            #[cfg(feature = "rsa")]
            AlgorithmId::RS384 => "RS384",
            #[cfg(feature = "rsa")]
            AlgorithmId::RS512 => "RS512",
            #[cfg(feature = "rsa")]
            AlgorithmId::PS256 => "PS256",
            #[cfg(feature = "rsa")]
            AlgorithmId::PS384 => "PS384",
            #[cfg(feature = "rsa")]
            AlgorithmId::PS512 => "PS512",

            #[cfg(feature = "ecdsa")]
            AlgorithmId::ES256 => "ES256",
            #[cfg(feature = "ecdsa")]
            AlgorithmId::ES384 => "ES384",
        }
    }

    /// Check if algorithm is HMAC-based (symmetric)
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            AlgorithmId::HS256 | AlgorithmId::HS384 | AlgorithmId::HS512
        )
    }
}

impl std::fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Policy for allowed algorithms
#[derive(Debug, Clone)]
pub struct AlgorithmPolicy {
    allowed: Vec<AlgorithmId>,
}

impl AlgorithmPolicy {
    /// Create a policy that allows only specific algorithms
    pub fn allow_only(algorithms: Vec<AlgorithmId>) -> Self {
        Self {
            allowed: algorithms,
        }
    }

    /// Create a policy that allows all enabled algorithms
    pub fn allow_all() -> Self {
        let mut allowed = vec![AlgorithmId::HS256, AlgorithmId::HS384, AlgorithmId::HS512];

        #[cfg(feature = "rsa")]
        allowed.extend([
            AlgorithmId::RS256,
            AlgorithmId::RS384,
            AlgorithmId::RS512,
            AlgorithmId::PS256,
            AlgorithmId::PS384,
            AlgorithmId::PS512,
        ]);

        #[cfg(feature = "ecdsa")]
        allowed.extend([AlgorithmId::ES256, AlgorithmId::ES384]);

        Self { allowed }
    }

    /// Policy that allows any HMAC algorithm (HS256, HS384, HS512)
    pub fn hmac_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::HS256,
            AlgorithmId::HS384,
            AlgorithmId::HS512,
        ])
    }

    /// Policy that allows only asymmetric algorithms
    ///
    /// Use this whenever the key set holds public keys, so a token can never
    /// steer verification onto an HMAC path.
    #[cfg(any(feature = "rsa", feature = "ecdsa"))]
    pub fn asymmetric_only() -> Self {
        let mut policy = Self::allow_all();
        policy.allowed.retain(|alg| !alg.is_symmetric());
        policy
    }

    /// Check if an algorithm is allowed
    pub fn is_allowed(&self, algorithm: &AlgorithmId) -> bool {
        self.allowed.contains(algorithm)
    }

    /// Validate algorithm against policy
    pub fn validate(&self, algorithm: &AlgorithmId) -> std::result::Result<(), SignatureError> {
        if self.is_allowed(algorithm) {
            Ok(())
        } else {
            Err(SignatureError::AlgorithmNotAllowed {
                found: algorithm.to_string(),
                allowed: self.allowed.iter().map(ToString::to_string).collect(),
            })
        }
    }

    /// Get list of allowed algorithms
    pub fn allowed_algorithms(&self) -> &[AlgorithmId] {
        &self.allowed
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}
