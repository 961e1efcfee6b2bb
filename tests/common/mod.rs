//! Token builders shared by the integration tests
#![allow(dead_code)]

use hmac::{Hmac, Mac};
use jwtrust::utils::base64url;
use sha2::Sha256;

/// Build an HS256 token from raw header and payload text
pub fn hs256(header: &str, payload: &str, secret: &[u8]) -> String {
    let signing_input = format!("{}.{}", base64url::encode(header), base64url::encode(payload));

    let mut mac = Hmac::<Sha256>::new_from_slice(secret).unwrap();
    mac.update(signing_input.as_bytes());
    let signature_b64 = base64url::encode_bytes(&mac.finalize().into_bytes());

    format!("{signing_input}.{signature_b64}")
}

/// Build an unsecured token (empty signature segment)
pub fn unsecured(header: &str, payload: &str) -> String {
    format!("{}.{}.", base64url::encode(header), base64url::encode(payload))
}

/// Wrap `inner` in `layers` additional HS256 layers declaring `cty: JWT`
pub fn nest(inner: String, layers: usize, secret: &[u8]) -> String {
    (0..layers).fold(inner, |token, _| {
        hs256(r#"{"alg":"HS256","cty":"JWT"}"#, &token, secret)
    })
}

#[cfg(feature = "rsa")]
pub mod rsa_keys {
    use jwtrust::utils::base64url;
    use ring::rand::SystemRandom;
    use ring::signature::{RSA_PKCS1_SHA256, RsaKeyPair};
    use rsa_keygen::RsaPrivateKey;
    use rsa_keygen::pkcs8::EncodePrivateKey;

    /// Generate a 2048-bit key, returning it in both `rsa` and `ring` form
    pub fn generate() -> (RsaPrivateKey, RsaKeyPair) {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
        let pkcs8_doc = private_key
            .to_pkcs8_der()
            .expect("Failed to serialize to PKCS#8");
        let keypair =
            RsaKeyPair::from_pkcs8(pkcs8_doc.as_bytes()).expect("Failed to create RsaKeyPair");
        (private_key, keypair)
    }

    /// PKCS#1 RSAPublicKey DER of a key pair
    pub fn public_der(keypair: &RsaKeyPair) -> Vec<u8> {
        keypair.public().as_ref().to_vec()
    }

    /// Build an RS256 token from raw header and payload text
    pub fn rs256(header: &str, payload: &str, keypair: &RsaKeyPair) -> String {
        let signing_input = format!("{}.{}", base64url::encode(header), base64url::encode(payload));

        let mut signature = vec![0u8; keypair.public().modulus_len()];
        keypair
            .sign(
                &RSA_PKCS1_SHA256,
                &SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .expect("Signing failed");

        format!("{signing_input}.{}", base64url::encode_bytes(&signature))
    }
}
