//! # jwtrust - Identity Token Validation and Claim Rules
//!
//! > Trust core for identity-assertion clients: validate signed (and nested)
//! > compact tokens, read their claims as typed values, and evaluate relying
//! > party rules over them.
//!
//! ## Overview
//!
//! An identity provider hands the client a compact token: a signed JSON Web
//! Token, an unsecured one, or a token wrapped inside another. **jwtrust**
//! parses it into a [`Jwt`], checks every layer against a caller-built
//! [`ValidationContext`], and yields a [`ClaimSet`] only once the whole chain
//! is trusted and every claim check has passed. Any failure aborts the call
//! with a single [`Error`]; nothing is partially returned.
//!
//! The claims can then feed a [`LogicEvaluator`]: JSON-logic expressions
//! with named, `$`-prefixed rules that are computed at most once and guarded
//! against cycles.
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtrust::*;
//!
//! let ctx = ValidationContext::builder()
//!     .keys(KeySet::from_jwks(jwks_json)?)
//!     .algorithms(AlgorithmPolicy::asymmetric_only())
//!     .standard_time_checks()
//!     .validator(IssuerValidator::new(["https://idp.example"]))
//!     .validator(AudienceValidator::new("my-app"))
//!     .build()?;
//!
//! let claims = Jwt::parse(token_str)?.validate(&ctx)?;
//! println!("Subject: {:?}", claims.subject());
//! ```
//!
//! ## Validation Flow
//!
//! ```text
//! Jwt (parsed header; payload still opaque)
//!     │ signature verified, or unsecured token allowed by the context
//!     ▼
//! VerifiedToken (trusted payload; internal type)
//!     │ cty = "JWT"          │ otherwise
//!     ▼                      ▼
//! Jwt (inner layer)      ClaimSet ── claim checks ──▶ returned to caller
//! ```
//!
//! Nesting is bounded by [`ValidationContext::max_nesting_depth`] (5 layers by
//! default). Encrypted tokens (JWE) are rejected as unsupported.
//!
//! ## Key Selection
//!
//! A context holding a single key uses it for every token, whatever `kid` the
//! header names. A context holding several keys requires the header `kid` to
//! match one of them; keys are never tried one after another.
//!
//! ## Algorithm Support
//!
//! All algorithms implement a common `Algorithm` trait:
//!
//! - **HMAC** (always enabled): HS256, HS384, HS512
//! - **RSA** (with `rsa` feature): RS256, RS384, RS512, PS256, PS384, PS512
//! - **ECDSA** (with `ecdsa` feature): ES256, ES384
//!
//! ## Security
//!
//! ### "none" Algorithm
//!
//! Unsecured tokens are rejected unless the context explicitly allows them
//! with [`ValidationContextBuilder::allow_unsecured`].
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq)
//! crate.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515): JSON Web Signature (JWS)
//! - [RFC 7517](https://datatracker.ietf.org/doc/html/rfc7517): JSON Web Key (JWK)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519): JSON Web Token (JWT)
//! - [JsonLogic](https://jsonlogic.com): rule expression format

// Core modules
pub mod error;
mod limits;
pub mod utils;

// Algorithm system
pub mod algorithm;
pub mod keys;

// Claims and validation
pub mod claims;
pub mod context;

// Token types
pub mod token;

// Rule evaluation
pub mod logic;

// ============================================================================
// PUBLIC API
// ============================================================================

// Main validation flow types
pub use context::{ValidationContext, ValidationContextBuilder};
pub use token::{Jwt, TokenHeader, TokenKind};

// Claims
pub use claims::{
    Audience, AudienceValidator, Claim, ClaimSet, ClaimValidator, ExpirationValidator,
    FnValidator, IssuedAtValidator, IssuerValidator, NotBeforeValidator, RequiredClaimsValidator,
};

// Rules
pub use logic::{ExpressionEngine, JsonLogic, LogicEvaluator};

// Supporting types for advanced usage
pub use algorithm::{AlgorithmId, AlgorithmPolicy};
pub use error::{ClaimError, Error, ErrorKind, Result, SignatureError};
pub use keys::{Jwk, Key, KeySet};

// Re-export curve type for ECDSA
#[cfg(feature = "ecdsa")]
pub use keys::EcdsaCurve;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    fn hs256_token(header: &str, payload: &str, secret: &[u8]) -> String {
        let signing_input = format!(
            "{}.{}",
            utils::base64url::encode(header),
            utils::base64url::encode(payload)
        );
        let mut mac = Hmac::<Sha256>::new_from_slice(secret).unwrap();
        mac.update(signing_input.as_bytes());
        let signature = utils::base64url::encode_bytes(&mac.finalize().into_bytes());
        format!("{signing_input}.{signature}")
    }

    #[test]
    fn test_full_flow_hmac() {
        let token = hs256_token(
            r#"{"alg":"HS256","typ":"JWT"}"#,
            r#"{"iss":"https://example.com","sub":"user123","exp":2000,"iat":1000}"#,
            b"my-secret-key",
        );

        let ctx = ValidationContext::builder()
            .key(Key::symmetric(b"my-secret-key".to_vec()))
            .at(1500)
            .standard_time_checks()
            .validator(IssuerValidator::new(["https://example.com"]))
            .build()
            .unwrap();

        let claims = Jwt::parse(&token).unwrap().validate(&ctx).unwrap();
        assert_eq!(claims.issuer(), Some("https://example.com"));
        assert_eq!(claims.subject(), Some("user123"));
    }

    #[test]
    fn test_signature_verification_fails() {
        let token = hs256_token(r#"{"alg":"HS256"}"#, r#"{"sub":"user"}"#, b"other-key");
        let ctx = ValidationContext::new(Key::symmetric(b"my-secret-key".to_vec()));

        let result = Jwt::parse(&token).unwrap().validate(&ctx);
        assert!(matches!(
            result,
            Err(Error::UntrustedSignature(SignatureError::Invalid))
        ));
    }

    #[test]
    fn test_claims_feed_rules() {
        let token = hs256_token(r#"{"alg":"HS256"}"#, r#"{"sub":"abc","age":20}"#, b"k");
        let ctx = ValidationContext::new(Key::symmetric(b"k".to_vec()));
        let claims = Jwt::parse(&token).unwrap().validate(&ctx).unwrap();

        let rules = serde_json::json!({"$isAdult": {">=": [{"var": "age"}, 18]}});
        let evaluator = LogicEvaluator::new(
            rules.as_object().cloned().unwrap_or_default(),
            claims.to_value(),
        );
        assert_eq!(
            evaluator
                .evaluate(&serde_json::json!({"var": "$isAdult"}))
                .unwrap(),
            serde_json::json!(true)
        );
    }
}
