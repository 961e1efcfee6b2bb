//! Typed claims and claim sets
//!
//! A token payload is decoded into a [`ClaimSet`]: an ordered map from claim
//! name to [`Claim`]. Well-known claim names (RFC 7519 §4.1 and the OpenID
//! Connect ID token claims) decode into typed variants that enforce their
//! value shape; every other name becomes [`Claim::Other`] holding the raw JSON.

mod registry;
mod validator;

pub use validator::{
    AudienceValidator, ClaimValidator, ExpirationValidator, FnValidator, IssuedAtValidator,
    IssuerValidator, NotBeforeValidator, RequiredClaimsValidator,
};

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Audience (aud) value
///
/// RFC 7519 allows either a single string or an array of strings; the
/// original shape is kept so the claim serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    /// Whether the audience names the given recipient
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(aud) => aud == audience,
            Audience::Multiple(auds) => auds.iter().any(|aud| aud == audience),
        }
    }

    /// All audience values
    pub fn values(&self) -> Vec<&str> {
        match self {
            Audience::Single(aud) => vec![aud.as_str()],
            Audience::Multiple(auds) => auds.iter().map(String::as_str).collect(),
        }
    }
}

/// A single named claim
#[derive(Debug, Clone, PartialEq)]
pub enum Claim {
    /// Issuer (iss)
    Issuer(String),
    /// Subject (sub)
    Subject(String),
    /// Audience (aud)
    Audience(Audience),
    /// Expiration Time (exp), seconds since Unix epoch
    Expiration(i64),
    /// Not Before (nbf), seconds since Unix epoch
    NotBefore(i64),
    /// Issued At (iat), seconds since Unix epoch
    IssuedAt(i64),
    /// JWT ID (jti)
    JwtId(String),
    /// Time of end-user authentication (auth_time)
    AuthTime(i64),
    /// Nonce bound to the authentication request (nonce)
    Nonce(String),
    /// Authorized party (azp)
    AuthorizedParty(String),
    /// Authentication context class reference (acr)
    AuthContextClass(String),
    /// Authentication methods references (amr)
    AuthMethods(Vec<String>),
    /// Any claim without a registered decoder
    Other { name: String, value: Value },
}

impl Claim {
    /// Decode a claim, enforcing the value shape of well-known names
    pub fn decode(name: &str, value: Value) -> Result<Self> {
        match registry::lookup(name) {
            Some(decoder) => decoder(value),
            None => Ok(Claim::Other {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Claim name as it appears in the payload
    pub fn name(&self) -> &str {
        match self {
            Claim::Issuer(_) => "iss",
            Claim::Subject(_) => "sub",
            Claim::Audience(_) => "aud",
            Claim::Expiration(_) => "exp",
            Claim::NotBefore(_) => "nbf",
            Claim::IssuedAt(_) => "iat",
            Claim::JwtId(_) => "jti",
            Claim::AuthTime(_) => "auth_time",
            Claim::Nonce(_) => "nonce",
            Claim::AuthorizedParty(_) => "azp",
            Claim::AuthContextClass(_) => "acr",
            Claim::AuthMethods(_) => "amr",
            Claim::Other { name, .. } => name.as_str(),
        }
    }

    /// Claim value as JSON
    pub fn value(&self) -> Value {
        match self {
            Claim::Issuer(s)
            | Claim::Subject(s)
            | Claim::JwtId(s)
            | Claim::Nonce(s)
            | Claim::AuthorizedParty(s)
            | Claim::AuthContextClass(s) => Value::String(s.clone()),
            Claim::Expiration(t) | Claim::NotBefore(t) | Claim::IssuedAt(t) | Claim::AuthTime(t) => {
                Value::from(*t)
            }
            Claim::Audience(Audience::Single(aud)) => Value::String(aud.clone()),
            Claim::Audience(Audience::Multiple(auds)) | Claim::AuthMethods(auds) => {
                Value::Array(auds.iter().cloned().map(Value::String).collect())
            }
            Claim::Other { value, .. } => value.clone(),
        }
    }

    /// String value, for string-typed claims and generic string claims
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Claim::Issuer(s)
            | Claim::Subject(s)
            | Claim::JwtId(s)
            | Claim::Nonce(s)
            | Claim::AuthorizedParty(s)
            | Claim::AuthContextClass(s) => Some(s.as_str()),
            Claim::Audience(Audience::Single(s)) => Some(s.as_str()),
            Claim::Other { value, .. } => value.as_str(),
            _ => None,
        }
    }

    /// Timestamp value, for NumericDate claims
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            Claim::Expiration(t) | Claim::NotBefore(t) | Claim::IssuedAt(t) | Claim::AuthTime(t) => {
                Some(*t)
            }
            _ => None,
        }
    }
}

/// Ordered collection of uniquely named claims
///
/// Insertion order is kept for deterministic serialization; lookups are by
/// name. A claim set is immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSet {
    claims: IndexMap<String, Claim>,
}

impl ClaimSet {
    /// Parse a JSON object into a claim set
    ///
    /// When a name repeats in the text the last value wins. Large integers
    /// are kept exactly as written.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::MalformedToken(format!("Failed to parse claims: {e}")))?;
        Self::from_value(value)
    }

    /// Build a claim set from an already decoded JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(Error::MalformedToken(
                "claims must be a JSON object".to_string(),
            ));
        };

        let mut claims = IndexMap::with_capacity(object.len());
        for (name, value) in object {
            let claim = Claim::decode(&name, value)?;
            claims.insert(name, claim);
        }
        Ok(Self { claims })
    }

    /// Serialize to a JSON object string
    pub fn to_json(&self) -> String {
        Value::Object(self.to_map()).to_string()
    }

    /// Serialize to a JSON object value
    ///
    /// This is also the natural data context for rule evaluation.
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    fn to_map(&self) -> Map<String, Value> {
        self.claims
            .iter()
            .map(|(name, claim)| (name.clone(), claim.value()))
            .collect()
    }

    /// Get a claim by name
    pub fn get(&self, name: &str) -> Option<&Claim> {
        self.claims.get(name)
    }

    /// Get a claim value as JSON
    pub fn value(&self, name: &str) -> Option<Value> {
        self.get(name).map(Claim::value)
    }

    /// Whether a claim with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// Number of claims
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the set holds no claims
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Iterate claims in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.claims.values()
    }

    /// Get the issuer (iss claim)
    pub fn issuer(&self) -> Option<&str> {
        match self.get("iss") {
            Some(Claim::Issuer(iss)) => Some(iss.as_str()),
            _ => None,
        }
    }

    /// Get the subject (sub claim)
    pub fn subject(&self) -> Option<&str> {
        match self.get("sub") {
            Some(Claim::Subject(sub)) => Some(sub.as_str()),
            _ => None,
        }
    }

    /// Get the audience (aud claim)
    pub fn audience(&self) -> Option<&Audience> {
        match self.get("aud") {
            Some(Claim::Audience(aud)) => Some(aud),
            _ => None,
        }
    }

    /// Get the expiration time (exp claim)
    pub fn expiration(&self) -> Option<i64> {
        self.get("exp").and_then(Claim::as_timestamp)
    }

    /// Get the not-before time (nbf claim)
    pub fn not_before(&self) -> Option<i64> {
        self.get("nbf").and_then(Claim::as_timestamp)
    }

    /// Get the issued-at time (iat claim)
    pub fn issued_at(&self) -> Option<i64> {
        self.get("iat").and_then(Claim::as_timestamp)
    }

    /// Get the JWT ID (jti claim)
    pub fn jwt_id(&self) -> Option<&str> {
        match self.get("jti") {
            Some(Claim::JwtId(jti)) => Some(jti.as_str()),
            _ => None,
        }
    }
}

impl FromIterator<Claim> for ClaimSet {
    /// Later claims replace earlier ones with the same name
    fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
        let claims = iter
            .into_iter()
            .map(|claim| (claim.name().to_string(), claim))
            .collect();
        Self { claims }
    }
}

impl Serialize for ClaimSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.claims.len()))?;
        for (name, claim) in &self.claims {
            map.serialize_entry(name, &claim.value())?;
        }
        map.end()
    }
}
