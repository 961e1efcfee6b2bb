pub mod base64url;

pub use base64url::{encode, encode_bytes};
