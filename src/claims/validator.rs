//! Claim-level validation checks
//!
//! Checks run after the signature is trusted, in the order they were
//! registered on the [`ValidationContext`](crate::ValidationContext).

use super::ClaimSet;
use crate::error::ClaimError;

/// A single named check over a trusted claim set
pub trait ClaimValidator: Send + Sync {
    /// Name reported when the check fails
    fn name(&self) -> &str;

    /// Run the check at the given Unix timestamp
    fn validate(&self, claims: &ClaimSet, now: i64) -> Result<(), ClaimError>;

    /// Clock leeway in seconds this check applies
    fn leeway(&self) -> u64 {
        0
    }
}

/// Rejects tokens whose `exp` is in the past
#[derive(Debug, Clone, Default)]
pub struct ExpirationValidator {
    leeway: u64,
    required: bool,
}

impl ExpirationValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept tokens expired at most this many seconds ago
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    /// Reject tokens without an `exp` claim
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl ClaimValidator for ExpirationValidator {
    fn name(&self) -> &str {
        "exp"
    }

    fn validate(&self, claims: &ClaimSet, now: i64) -> Result<(), ClaimError> {
        match claims.expiration() {
            Some(exp) if now > exp.saturating_add(seconds(self.leeway)) => Err(ClaimError::Expired {
                expired_at: exp,
                now,
                leeway: self.leeway,
            }),
            None if self.required => Err(ClaimError::MissingClaim("exp".to_string())),
            _ => Ok(()),
        }
    }

    fn leeway(&self) -> u64 {
        self.leeway
    }
}

/// Rejects tokens whose `nbf` is in the future
#[derive(Debug, Clone, Default)]
pub struct NotBeforeValidator {
    leeway: u64,
}

impl NotBeforeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }
}

impl ClaimValidator for NotBeforeValidator {
    fn name(&self) -> &str {
        "nbf"
    }

    fn validate(&self, claims: &ClaimSet, now: i64) -> Result<(), ClaimError> {
        match claims.not_before() {
            Some(nbf) if now < nbf.saturating_sub(seconds(self.leeway)) => {
                Err(ClaimError::NotYetValid {
                    not_before: nbf,
                    now,
                    leeway: self.leeway,
                })
            }
            _ => Ok(()),
        }
    }

    fn leeway(&self) -> u64 {
        self.leeway
    }
}

/// Rejects tokens issued in the future, or longer ago than `max_age`
#[derive(Debug, Clone, Default)]
pub struct IssuedAtValidator {
    leeway: u64,
    max_age: Option<u64>,
}

impl IssuedAtValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    /// Maximum token age in seconds
    pub fn max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }
}

impl ClaimValidator for IssuedAtValidator {
    fn name(&self) -> &str {
        "iat"
    }

    fn validate(&self, claims: &ClaimSet, now: i64) -> Result<(), ClaimError> {
        let Some(iat) = claims.issued_at() else {
            return Ok(());
        };

        if iat > now.saturating_add(seconds(self.leeway)) {
            return Err(ClaimError::IssuedInFuture {
                issued_at: iat,
                now,
                leeway: self.leeway,
            });
        }

        if let Some(max_age) = self.max_age {
            if now > iat.saturating_add(seconds(max_age)) {
                return Err(ClaimError::TooOld {
                    issued_at: iat,
                    now,
                    max_age,
                });
            }
        }

        Ok(())
    }

    fn leeway(&self) -> u64 {
        self.leeway
    }
}

/// Durations past `i64::MAX` saturate rather than wrap negative
fn seconds(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Requires `aud` to name this relying party
#[derive(Debug, Clone)]
pub struct AudienceValidator {
    expected: String,
}

impl AudienceValidator {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl ClaimValidator for AudienceValidator {
    fn name(&self) -> &str {
        "aud"
    }

    fn validate(&self, claims: &ClaimSet, _now: i64) -> Result<(), ClaimError> {
        let audience = claims
            .audience()
            .ok_or_else(|| ClaimError::MissingClaim("aud".to_string()))?;

        if audience.contains(&self.expected) {
            Ok(())
        } else {
            Err(ClaimError::AudienceMismatch {
                expected: self.expected.clone(),
                found: audience.values().into_iter().map(String::from).collect(),
            })
        }
    }
}

/// Requires `iss` to be one of a fixed set of trusted issuers
#[derive(Debug, Clone)]
pub struct IssuerValidator {
    trusted: Vec<String>,
}

impl IssuerValidator {
    pub fn new<I, S>(trusted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            trusted: trusted.into_iter().map(Into::into).collect(),
        }
    }
}

impl ClaimValidator for IssuerValidator {
    fn name(&self) -> &str {
        "iss"
    }

    fn validate(&self, claims: &ClaimSet, _now: i64) -> Result<(), ClaimError> {
        let issuer = claims
            .issuer()
            .ok_or_else(|| ClaimError::MissingClaim("iss".to_string()))?;

        if self.trusted.iter().any(|trusted| trusted == issuer) {
            Ok(())
        } else {
            Err(ClaimError::IssuerMismatch(issuer.to_string()))
        }
    }
}

/// Requires every listed claim to be present
#[derive(Debug, Clone)]
pub struct RequiredClaimsValidator {
    names: Vec<String>,
}

impl RequiredClaimsValidator {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ClaimValidator for RequiredClaimsValidator {
    fn name(&self) -> &str {
        "required"
    }

    fn validate(&self, claims: &ClaimSet, _now: i64) -> Result<(), ClaimError> {
        match self.names.iter().find(|name| !claims.contains(name)) {
            Some(missing) => Err(ClaimError::MissingClaim(missing.clone())),
            None => Ok(()),
        }
    }
}

/// Named check backed by a closure
///
/// ```
/// use jwtrust::{ClaimError, FnValidator};
///
/// let email_verified = FnValidator::new("email_verified", |claims, _now| {
///     match claims.value("email_verified") {
///         Some(serde_json::Value::Bool(true)) => Ok(()),
///         _ => Err(ClaimError::Custom("email not verified".into())),
///     }
/// });
/// # let _ = email_verified;
/// ```
pub struct FnValidator<F> {
    name: String,
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&ClaimSet, i64) -> Result<(), ClaimError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> ClaimValidator for FnValidator<F>
where
    F: Fn(&ClaimSet, i64) -> Result<(), ClaimError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, claims: &ClaimSet, now: i64) -> Result<(), ClaimError> {
        (self.check)(claims, now)
    }
}
