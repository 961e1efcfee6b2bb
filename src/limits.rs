//! Size limit constants for input validation

/// Maximum length for a compact token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum size for decoded header JSON (8KB)
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded payload (64KB)
/// A nested token travels inside the payload, so this matches the token limit
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum length for the algorithm (alg) header field
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum length for the key ID (kid) header field
pub(crate) const MAX_KID_LENGTH: usize = 256;

/// Default bound on nested tokens (outer token counts as depth 1)
pub(crate) const DEFAULT_MAX_NESTING_DEPTH: usize = 5;

/// Hard ceiling for a configured nesting depth
pub(crate) const MAX_NESTING_DEPTH: usize = 16;

/// Maximum clock leeway (300 seconds = 5 minutes)
/// Prevents leeway from effectively disabling expiration checks
pub(crate) const MAX_CLOCK_SKEW_SECONDS: u64 = 300;

/// Maximum number of keys in a key set
pub(crate) const MAX_KEY_SET_SIZE: usize = 100;
