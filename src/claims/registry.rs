//! Decoders for well-known claim names

use super::{Audience, Claim};
use crate::error::{Error, Result};
use serde_json::Value;

type Decoder = fn(Value) -> Result<Claim>;

/// Registered claim names and the decoder enforcing their value shape
static REGISTRY: &[(&str, Decoder)] = &[
    ("iss", issuer),
    ("sub", subject),
    ("aud", audience),
    ("exp", expiration),
    ("nbf", not_before),
    ("iat", issued_at),
    ("jti", jwt_id),
    ("auth_time", auth_time),
    ("nonce", nonce),
    ("azp", authorized_party),
    ("acr", auth_context_class),
    ("amr", auth_methods),
];

pub(super) fn lookup(name: &str) -> Option<Decoder> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, decoder)| *decoder)
}

fn mismatch(claim: &str, expected: &'static str) -> Error {
    Error::ClaimTypeMismatch {
        claim: claim.to_string(),
        expected,
    }
}

fn string(claim: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(mismatch(claim, "a string")),
    }
}

/// NumericDate: integral seconds since the Unix epoch
fn numeric_date(claim: &str, value: &Value) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| mismatch(claim, "an integer timestamp"))
}

fn string_list(claim: &str, value: Value) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(mismatch(claim, "an array of strings"));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            _ => Err(mismatch(claim, "an array of strings")),
        })
        .collect()
}

fn issuer(value: Value) -> Result<Claim> {
    string("iss", value).map(Claim::Issuer)
}

fn subject(value: Value) -> Result<Claim> {
    string("sub", value).map(Claim::Subject)
}

fn jwt_id(value: Value) -> Result<Claim> {
    string("jti", value).map(Claim::JwtId)
}

fn nonce(value: Value) -> Result<Claim> {
    string("nonce", value).map(Claim::Nonce)
}

fn authorized_party(value: Value) -> Result<Claim> {
    string("azp", value).map(Claim::AuthorizedParty)
}

fn auth_context_class(value: Value) -> Result<Claim> {
    string("acr", value).map(Claim::AuthContextClass)
}

fn expiration(value: Value) -> Result<Claim> {
    numeric_date("exp", &value).map(Claim::Expiration)
}

fn not_before(value: Value) -> Result<Claim> {
    numeric_date("nbf", &value).map(Claim::NotBefore)
}

fn issued_at(value: Value) -> Result<Claim> {
    numeric_date("iat", &value).map(Claim::IssuedAt)
}

fn auth_time(value: Value) -> Result<Claim> {
    numeric_date("auth_time", &value).map(Claim::AuthTime)
}

fn auth_methods(value: Value) -> Result<Claim> {
    string_list("amr", value).map(Claim::AuthMethods)
}

fn audience(value: Value) -> Result<Claim> {
    let audience = match value {
        Value::String(aud) => Audience::Single(aud),
        Value::Array(_) => Audience::Multiple(
            string_list("aud", value).map_err(|_| mismatch("aud", "a string or array of strings"))?,
        ),
        _ => return Err(mismatch("aud", "a string or array of strings")),
    };
    Ok(Claim::Audience(audience))
}
