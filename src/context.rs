//! Trust configuration for token validation
//!
//! A [`ValidationContext`] is built once, then shared read-only across any
//! number of validations (it is `Send + Sync`; wrap it in an `Arc` to share
//! between threads).
//!
//! ```
//! use jwtrust::{AlgorithmId, AlgorithmPolicy, AudienceValidator, Key, ValidationContext};
//!
//! let ctx = ValidationContext::builder()
//!     .key(Key::symmetric(b"secret".to_vec()))
//!     .algorithms(AlgorithmPolicy::allow_only(vec![AlgorithmId::HS256]))
//!     .standard_time_checks()
//!     .validator(AudienceValidator::new("my-app"))
//!     .build()
//!     .unwrap();
//! assert!(!ctx.allow_unsecured());
//! ```

use crate::algorithm::AlgorithmPolicy;
use crate::claims::{
    ClaimSet, ClaimValidator, ExpirationValidator, IssuedAtValidator, NotBeforeValidator,
};
use crate::error::{Error, Result};
use crate::keys::{Key, KeySet};
use crate::limits::{DEFAULT_MAX_NESTING_DEPTH, MAX_CLOCK_SKEW_SECONDS, MAX_NESTING_DEPTH};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Keys, policies and claim checks a token is validated against
#[derive(Clone)]
pub struct ValidationContext {
    keys: KeySet,
    allow_unsecured: bool,
    validators: Vec<Arc<dyn ClaimValidator>>,
    algorithms: AlgorithmPolicy,
    max_nesting_depth: usize,
    now: Option<i64>,
}

impl ValidationContext {
    /// Start building a context
    pub fn builder() -> ValidationContextBuilder {
        ValidationContextBuilder::default()
    }

    /// Context trusting a single key, with no claim checks
    pub fn new(key: Key) -> Self {
        Self {
            keys: KeySet::single(key),
            allow_unsecured: false,
            validators: Vec::new(),
            algorithms: AlgorithmPolicy::default(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            now: None,
        }
    }

    /// Verification keys
    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    /// Whether unsecured (`alg: none`) tokens are accepted
    pub fn allow_unsecured(&self) -> bool {
        self.allow_unsecured
    }

    /// Accepted signature algorithms
    pub fn algorithms(&self) -> &AlgorithmPolicy {
        &self.algorithms
    }

    /// Maximum number of token layers, the outer token included
    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    /// Current Unix timestamp, or the fixed clock if one was configured
    pub fn now(&self) -> i64 {
        self.now.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs() as i64)
                .unwrap_or(0)
        })
    }

    /// Run every claim check in registration order
    pub(crate) fn validate_claims(&self, claims: &ClaimSet) -> Result<()> {
        let now = self.now();
        for validator in &self.validators {
            validator
                .validate(claims, now)
                .map_err(|reason| Error::ClaimValidationFailed {
                    check: validator.name().to_string(),
                    reason,
                })?;
            debug!(check = validator.name(), "claim check passed");
        }
        Ok(())
    }
}

impl std::fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationContext")
            .field("keys", &self.keys.len())
            .field("allow_unsecured", &self.allow_unsecured)
            .field(
                "validators",
                &self.validators.iter().map(|v| v.name()).collect::<Vec<_>>(),
            )
            .field("algorithms", &self.algorithms)
            .field("max_nesting_depth", &self.max_nesting_depth)
            .field("now", &self.now)
            .finish()
    }
}

/// Builder for [`ValidationContext`]
#[derive(Default)]
pub struct ValidationContextBuilder {
    keys: KeySet,
    allow_unsecured: bool,
    validators: Vec<Arc<dyn ClaimValidator>>,
    algorithms: Option<AlgorithmPolicy>,
    max_nesting_depth: Option<usize>,
    now: Option<i64>,
}

impl ValidationContextBuilder {
    /// Use this key set, replacing any keys added so far
    pub fn keys(mut self, keys: KeySet) -> Self {
        self.keys = keys;
        self
    }

    /// Trust exactly this key, whatever `kid` a token names
    pub fn key(mut self, key: Key) -> Self {
        self.keys = KeySet::single(key);
        self
    }

    /// Add a key under a key ID
    ///
    /// Mixing this with [`key`](Self::key) leaves a key without `kid` in a
    /// multi-key set, which [`build`](Self::build) rejects.
    pub fn key_with_id(mut self, kid: impl Into<String>, key: Key) -> Self {
        self.keys.insert(kid, key);
        self
    }

    /// Accept unsecured (`alg: none`) tokens
    pub fn allow_unsecured(mut self, allow: bool) -> Self {
        self.allow_unsecured = allow;
        self
    }

    /// Restrict accepted signature algorithms (default: all supported)
    pub fn algorithms(mut self, policy: AlgorithmPolicy) -> Self {
        self.algorithms = Some(policy);
        self
    }

    /// Maximum number of token layers, the outer token included (default: 5)
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = Some(depth);
        self
    }

    /// Validate against a fixed Unix timestamp instead of the system clock
    pub fn at(mut self, timestamp: i64) -> Self {
        self.now = Some(timestamp);
        self
    }

    /// Append a claim check; checks run in the order they are added
    pub fn validator(mut self, validator: impl ClaimValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Append `exp`, `nbf` and `iat` checks with no leeway
    pub fn standard_time_checks(self) -> Self {
        self.validator(ExpirationValidator::new())
            .validator(NotBeforeValidator::new())
            .validator(IssuedAtValidator::new())
    }

    /// Build the context
    ///
    /// Fails with [`Error::ConfigurationInvalid`] if a check uses more clock
    /// leeway than allowed (300s), the nesting depth is out of range, or a
    /// multi-key set holds a key without `kid`.
    pub fn build(self) -> Result<ValidationContext> {
        self.keys.check_key_ids()?;

        if let Some(validator) = self
            .validators
            .iter()
            .find(|v| v.leeway() > MAX_CLOCK_SKEW_SECONDS)
        {
            return Err(Error::ConfigurationInvalid(format!(
                "leeway of check '{}' is {}s, maximum is {MAX_CLOCK_SKEW_SECONDS}s",
                validator.name(),
                validator.leeway()
            )));
        }

        let max_nesting_depth = self.max_nesting_depth.unwrap_or(DEFAULT_MAX_NESTING_DEPTH);
        if !(1..=MAX_NESTING_DEPTH).contains(&max_nesting_depth) {
            return Err(Error::ConfigurationInvalid(format!(
                "nesting depth must be between 1 and {MAX_NESTING_DEPTH}, got {max_nesting_depth}"
            )));
        }

        Ok(ValidationContext {
            keys: self.keys,
            allow_unsecured: self.allow_unsecured,
            validators: self.validators,
            algorithms: self.algorithms.unwrap_or_default(),
            max_nesting_depth,
            now: self.now,
        })
    }
}
