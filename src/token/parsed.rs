use crate::algorithm::get_verifier;
use crate::claims::ClaimSet;
use crate::context::ValidationContext;
use crate::error::{Error, Result, SignatureError};
use crate::limits::{
    MAX_ALG_LENGTH, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE,
    MAX_DECODED_SIGNATURE_SIZE, MAX_KID_LENGTH, MAX_TOKEN_LENGTH,
};
use crate::token::verified::{Content, VerifiedToken};
use crate::token::TokenHeader;
use crate::utils::base64url;
use tracing::{debug, warn};

/// Structural kind of a compact token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// JWS with a signature to verify
    Signed,
    /// JWS with `alg: none` and an empty signature segment
    Unsecured,
}

/// A compact token that has been parsed but not yet validated
///
/// Parsing only checks structure: three base64url segments and a JSON header.
/// The payload stays opaque until [`validate`](Self::validate) has established
/// trust in it.
///
/// ```
/// use jwtrust::{Jwt, TokenKind};
///
/// let jwt = Jwt::parse("eyJhbGciOiJub25lIn0.eyJzdWIiOiJhYmMifQ.").unwrap();
/// assert_eq!(jwt.kind(), TokenKind::Unsecured);
/// assert!(!jwt.is_nested());
/// ```
#[derive(Debug, Clone)]
pub struct Jwt {
    header: TokenHeader,
    header_b64: String,
    payload_b64: String,
    signature_b64: String,
}

impl Jwt {
    /// Parse a compact token string
    ///
    /// Encrypted tokens (five segments) fail with
    /// [`Error::UnsupportedTokenShape`]; anything else that is not three
    /// segments fails with [`Error::MalformedToken`].
    pub fn parse(token: &str) -> Result<Self> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::MalformedToken(format!(
                "token length {} exceeds limit of {MAX_TOKEN_LENGTH}",
                token.len()
            )));
        }

        let parts: Vec<&str> = token.split('.').collect();
        match parts.len() {
            3 => {}
            5 => {
                return Err(Error::UnsupportedTokenShape(
                    "encrypted tokens (JWE) are not supported".to_string(),
                ));
            }
            n => {
                return Err(Error::MalformedToken(format!(
                    "expected 3 segments, found {n}"
                )));
            }
        }

        let header_json = base64url::decode_string(parts[0], MAX_DECODED_HEADER_SIZE)?;
        let header: TokenHeader = serde_json::from_str(&header_json)
            .map_err(|e| Error::MalformedToken(format!("Failed to parse header: {e}")))?;

        if header.algorithm.len() > MAX_ALG_LENGTH {
            return Err(Error::MalformedToken(format!(
                "alg exceeds {MAX_ALG_LENGTH} characters"
            )));
        }
        if header.key_id().is_some_and(|kid| kid.len() > MAX_KID_LENGTH) {
            return Err(Error::MalformedToken(format!(
                "kid exceeds {MAX_KID_LENGTH} characters"
            )));
        }

        debug!(
            alg = %header.algorithm,
            nested = header.is_nested(),
            "parsed compact token"
        );

        Ok(Self {
            header,
            header_b64: parts[0].to_string(),
            payload_b64: parts[1].to_string(),
            signature_b64: parts[2].to_string(),
        })
    }

    /// Get the token header
    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// Signed or unsecured
    pub fn kind(&self) -> TokenKind {
        if self.header.is_unsecured() {
            TokenKind::Unsecured
        } else {
            TokenKind::Signed
        }
    }

    /// Whether the payload carries another compact token
    pub fn is_nested(&self) -> bool {
        self.header.is_nested()
    }

    /// Validate the token and extract its claims
    ///
    /// Verifies every layer against `ctx`, descending into nested tokens up to
    /// the context's nesting limit, then runs the context's claim checks on
    /// the innermost claims. Either the complete claim set is returned or the
    /// first failure is.
    pub fn validate(self, ctx: &ValidationContext) -> Result<ClaimSet> {
        let max_depth = ctx.max_nesting_depth();
        let mut token = self;
        let mut depth = 1;

        loop {
            let verified = token.verify(ctx)?;
            debug!(depth, kind = ?verified.kind(), "token layer trusted");

            match verified.into_content()? {
                Content::Nested(inner) => {
                    if depth >= max_depth {
                        warn!(max_depth, "token nesting too deep");
                        return Err(Error::NestingTooDeep { max: max_depth });
                    }
                    depth += 1;
                    token = Jwt::parse(&inner)?;
                }
                Content::Claims(claims) => {
                    ctx.validate_claims(&claims)?;
                    debug!(depth, claims = claims.len(), "token validated");
                    return Ok(claims);
                }
            }
        }
    }

    /// Establish trust in this layer
    fn verify(self, ctx: &ValidationContext) -> Result<VerifiedToken> {
        let kind = self.kind();
        match kind {
            TokenKind::Unsecured => self.accept_unsecured(ctx)?,
            TokenKind::Signed => self.verify_signature(ctx)?,
        }

        let payload = base64url::decode_string(&self.payload_b64, MAX_DECODED_PAYLOAD_SIZE)?;
        Ok(VerifiedToken::new(self.header, kind, payload))
    }

    fn accept_unsecured(&self, ctx: &ValidationContext) -> Result<()> {
        if !ctx.allow_unsecured() {
            warn!("rejected unsecured token");
            return Err(Error::PolicyViolation(
                "unsecured tokens are not allowed".to_string(),
            ));
        }
        if !self.signature_b64.is_empty() {
            return Err(Error::MalformedToken(
                "unsecured token must have an empty signature".to_string(),
            ));
        }
        if self.header.key_id().is_some() {
            return Err(Error::MalformedToken(
                "unsecured token must not name a key".to_string(),
            ));
        }
        Ok(())
    }

    fn verify_signature(&self, ctx: &ValidationContext) -> Result<()> {
        let algorithm = self.header.parse_algorithm()?;
        ctx.algorithms().validate(&algorithm)?;

        let key = ctx.keys().resolve(self.header.key_id())?;
        debug!(%algorithm, kid = ?self.header.key_id(), "resolved verification key");

        let signature = base64url::decode_bytes(&self.signature_b64, MAX_DECODED_SIGNATURE_SIZE)
            .map_err(|_| SignatureError::Invalid)?;

        get_verifier(&algorithm)
            .verify(&self.signing_input(), &signature, key)
            .inspect_err(|e| warn!(%algorithm, error = %e, "signature rejected"))
    }

    /// Get the signing input (header.payload)
    fn signing_input(&self) -> String {
        format!("{}.{}", self.header_b64, self.payload_b64)
    }
}

impl std::str::FromStr for Jwt {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
