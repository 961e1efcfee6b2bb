// Internal modules
mod header;
mod parsed;
mod verified;

// Public API exports
pub use header::TokenHeader;
pub use parsed::{Jwt, TokenKind};
