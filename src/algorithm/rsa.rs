use crate::algorithm::Algorithm;
use crate::error::{Result, SignatureError};
use crate::keys::{Key, RsaPublicKey};

use ring::signature::{self, RsaParameters, RsaPublicKeyComponents, UnparsedPublicKey};

/// RS256 algorithm (RSASSA-PKCS1-v1_5 with SHA-256)
pub struct RS256;

/// RS384 algorithm (RSASSA-PKCS1-v1_5 with SHA-384)
pub struct RS384;

/// RS512 algorithm (RSASSA-PKCS1-v1_5 with SHA-512)
pub struct RS512;

/// PS256 algorithm (RSASSA-PSS with SHA-256)
pub struct PS256;

/// PS384 algorithm (RSASSA-PSS with SHA-384)
pub struct PS384;

/// PS512 algorithm (RSASSA-PSS with SHA-512)
pub struct PS512;

macro_rules! rsa_algorithm {
    ($alg:ident, $params:expr) => {
        impl Algorithm for $alg {
            fn name(&self) -> &'static str {
                stringify!($alg)
            }

            fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
                let rsa_key = key.as_rsa_public(self.name())?;
                verify_rsa(signing_input, signature, rsa_key, $params)
            }
        }
    };
}

rsa_algorithm!(RS256, &signature::RSA_PKCS1_2048_8192_SHA256);
rsa_algorithm!(RS384, &signature::RSA_PKCS1_2048_8192_SHA384);
rsa_algorithm!(RS512, &signature::RSA_PKCS1_2048_8192_SHA512);
rsa_algorithm!(PS256, &signature::RSA_PSS_2048_8192_SHA256);
rsa_algorithm!(PS384, &signature::RSA_PSS_2048_8192_SHA384);
rsa_algorithm!(PS512, &signature::RSA_PSS_2048_8192_SHA512);

/// Generic RSA signature verification
fn verify_rsa(
    signing_input: &str,
    signature: &[u8],
    key: &RsaPublicKey,
    params: &'static RsaParameters,
) -> Result<()> {
    let verified = match key {
        RsaPublicKey::Der(der) => {
            UnparsedPublicKey::new(params, der).verify(signing_input.as_bytes(), signature)
        }
        RsaPublicKey::Components { n, e } => RsaPublicKeyComponents { n, e }.verify(
            params,
            signing_input.as_bytes(),
            signature,
        ),
    };

    verified.map_err(|_| SignatureError::Invalid.into())
}
