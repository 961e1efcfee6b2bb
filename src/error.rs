//! Error types for token validation and rule evaluation
//!
//! Every failure aborts the whole call: a validation either yields a complete
//! [`ClaimSet`](crate::ClaimSet) or one of these errors, and a rule evaluation
//! either yields a value or one of these errors. Use [`Error::kind`] to branch
//! on the broad category without matching every variant.

use thiserror::Error;

/// Errors that can occur while validating tokens or evaluating rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Structural Errors
    // ============================================================================
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Unsupported token shape: {0}")]
    UnsupportedTokenShape(String),

    #[error("Token nesting exceeds maximum depth of {max}")]
    NestingTooDeep { max: usize },

    #[error("Claim '{claim}' has invalid shape: expected {expected}")]
    ClaimTypeMismatch {
        claim: String,
        expected: &'static str,
    },

    // ============================================================================
    // Trust Errors
    // ============================================================================
    #[error("Untrusted signature: {0}")]
    UntrustedSignature(SignatureError),

    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Claim check '{check}' failed: {reason}")]
    ClaimValidationFailed { check: String, reason: ClaimError },

    // ============================================================================
    // Rule Errors
    // ============================================================================
    #[error("Undefined rule '{0}'")]
    UndefinedRule(String),

    #[error("Rule '{0}' references itself")]
    CyclicRule(String),

    #[error("Rule evaluation failed: {0}")]
    Evaluation(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),
}

/// Reasons a signature is not trusted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignatureError {
    #[error("signature verification failed")]
    Invalid,

    #[error("no verification keys configured")]
    NoKeys,

    #[error("key ID (kid) required: {key_count} keys configured")]
    KeyIdRequired { key_count: usize },

    #[error("no key configured for kid '{0}'")]
    UnknownKeyId(String),

    #[error("algorithm '{algorithm}' requires a {expected} key, got {actual}")]
    KeyTypeMismatch {
        algorithm: String,
        expected: String,
        actual: String,
    },

    #[error("algorithm '{found}' not allowed (allowed: {allowed:?})")]
    AlgorithmNotAllowed { found: String, allowed: Vec<String> },
}

/// Claim-level check failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaimError {
    #[error("token expired at {expired_at} (now: {now}, leeway: {leeway}s)")]
    Expired {
        expired_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("token not valid until {not_before} (now: {now}, leeway: {leeway}s)")]
    NotYetValid {
        not_before: i64,
        now: i64,
        leeway: u64,
    },

    #[error("token issued in future at {issued_at} (now: {now}, leeway: {leeway}s)")]
    IssuedInFuture {
        issued_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("token too old: issued at {issued_at}, max age {max_age}s (now: {now})")]
    TooOld {
        issued_at: i64,
        now: i64,
        max_age: u64,
    },

    #[error("audience mismatch: expected '{expected}', found {found:?}")]
    AudienceMismatch {
        expected: String,
        found: Vec<String>,
    },

    #[error("issuer '{0}' is not trusted")]
    IssuerMismatch(String),

    #[error("required claim '{0}' is missing")]
    MissingClaim(String),

    #[error("{0}")]
    Custom(String),
}

/// Broad category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedToken,
    UntrustedSignature,
    PolicyViolation,
    ClaimValidation,
    UnsupportedTokenShape,
    UndefinedRule,
    CyclicRule,
    Evaluation,
    Configuration,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedToken(_) | Error::NestingTooDeep { .. } => ErrorKind::MalformedToken,
            Error::ClaimTypeMismatch { .. } => ErrorKind::MalformedToken,
            Error::UnsupportedTokenShape(_) => ErrorKind::UnsupportedTokenShape,
            Error::UntrustedSignature(_) => ErrorKind::UntrustedSignature,
            Error::PolicyViolation(_) => ErrorKind::PolicyViolation,
            Error::ClaimValidationFailed { .. } => ErrorKind::ClaimValidation,
            Error::UndefinedRule(_) => ErrorKind::UndefinedRule,
            Error::CyclicRule(_) => ErrorKind::CyclicRule,
            Error::Evaluation(_) => ErrorKind::Evaluation,
            Error::InvalidKey(_) | Error::ConfigurationInvalid(_) => ErrorKind::Configuration,
        }
    }
}

impl From<SignatureError> for Error {
    fn from(err: SignatureError) -> Self {
        Error::UntrustedSignature(err)
    }
}

/// Result type alias for token and rule operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            Error::MalformedToken("x".into()).kind(),
            ErrorKind::MalformedToken
        );
        assert_eq!(
            Error::from(SignatureError::Invalid).kind(),
            ErrorKind::UntrustedSignature
        );
        assert_eq!(
            Error::NestingTooDeep { max: 5 }.kind(),
            ErrorKind::MalformedToken
        );
        assert_eq!(
            Error::ClaimValidationFailed {
                check: "exp".into(),
                reason: ClaimError::MissingClaim("exp".into()),
            }
            .kind(),
            ErrorKind::ClaimValidation
        );
    }

    #[test]
    fn test_display_names_failed_check() {
        let err = Error::ClaimValidationFailed {
            check: "aud".into(),
            reason: ClaimError::MissingClaim("aud".into()),
        };
        assert_eq!(
            err.to_string(),
            "Claim check 'aud' failed: required claim 'aud' is missing"
        );
    }
}
