use crate::claims::ClaimSet;
use crate::error::Result;
use crate::token::{TokenHeader, TokenKind};

/// A token layer whose signature has been verified, or whose unsecured form
/// the context accepts
///
/// Its payload is trusted and can now be interpreted: either as another
/// compact token or as a claim set.
pub(crate) struct VerifiedToken {
    header: TokenHeader,
    kind: TokenKind,
    payload: String,
}

/// Interpreted payload of a verified layer
pub(crate) enum Content {
    Nested(String),
    Claims(ClaimSet),
}

impl VerifiedToken {
    pub(crate) fn new(header: TokenHeader, kind: TokenKind, payload: String) -> Self {
        Self {
            header,
            kind,
            payload,
        }
    }

    pub(crate) fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Interpret the payload according to the header content type
    pub(crate) fn into_content(self) -> Result<Content> {
        if self.header.is_nested() {
            Ok(Content::Nested(self.payload.trim().to_string()))
        } else {
            ClaimSet::from_json(&self.payload).map(Content::Claims)
        }
    }
}
