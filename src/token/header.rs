use crate::algorithm::AlgorithmId;
use crate::error::Result;
use serde::Deserialize;

/// Protected header of a compact token
#[derive(Debug, Clone, Deserialize)]
pub struct TokenHeader {
    /// Algorithm used for signing (`none` for unsecured tokens)
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Token type (typically "JWT")
    #[serde(rename = "typ", default)]
    pub token_type: Option<String>,

    /// Key ID (for key selection)
    #[serde(rename = "kid", default)]
    pub key_id: Option<String>,

    /// Content type; "JWT" marks a nested token
    #[serde(rename = "cty", default)]
    pub content_type: Option<String>,
}

impl TokenHeader {
    /// Parse algorithm from header
    pub fn parse_algorithm(&self) -> Result<AlgorithmId> {
        AlgorithmId::from_str(&self.algorithm)
    }

    /// Get algorithm as string
    pub fn algorithm_str(&self) -> &str {
        &self.algorithm
    }

    /// Get key ID if present
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// Whether the token is unsecured (`alg: none`)
    pub fn is_unsecured(&self) -> bool {
        self.algorithm == "none"
    }

    /// Whether the payload is itself a compact token
    pub fn is_nested(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|cty| cty.eq_ignore_ascii_case("JWT"))
    }
}
