//! JWK (JSON Web Key) and JWK Set import
//!
//! Keys published by an identity provider arrive as JWK Set documents
//! (RFC 7517). These tests import such documents and validate tokens
//! against the resulting key sets.

mod common;

use jwtrust::utils::base64url;
use jwtrust::*;

#[test]
fn test_oct_jwk() {
    let jwk = format!(
        r#"{{"kty":"oct","kid":"hmac","k":"{}"}}"#,
        base64url::encode_bytes(b"jwk-secret")
    );
    let key = Key::from_jwk(&jwk).unwrap();

    let token = common::hs256(r#"{"alg":"HS256"}"#, r#"{"sub":"abc"}"#, b"jwk-secret");
    assert!(Jwt::parse(&token)
        .unwrap()
        .validate(&ValidationContext::new(key))
        .is_ok());
}

#[test]
fn test_jwks_requires_kid_for_multiple_keys() {
    let jwks = r#"{"keys":[{"kty":"oct","k":"YQ"},{"kty":"oct","k":"Yg"}]}"#;
    assert!(matches!(
        KeySet::from_jwks(jwks),
        Err(Error::InvalidKey(_))
    ));
}

#[test]
fn test_jwks_rejects_unsupported_key_type() {
    let jwks = r#"{"keys":[{"kty":"OKP","kid":"ed","crv":"Ed25519","x":"AA"}]}"#;
    assert!(matches!(
        KeySet::from_jwks(jwks),
        Err(Error::InvalidKey(_))
    ));
}

#[test]
fn test_invalid_jwks_document() {
    assert!(KeySet::from_jwks("not json").is_err());
    assert!(KeySet::from_jwks(r#"{"no_keys":[]}"#).is_err());
}

#[cfg(feature = "rsa")]
mod rsa_jwk_tests {
    use super::*;
    use crate::common::rsa_keys::{generate, rs256};
    use rsa_keygen::traits::PublicKeyParts;

    #[test]
    fn test_rsa_jwks_selects_by_kid() {
        let (first_private, first) = generate();
        let (second_private, second) = generate();

        let jwk = |kid: &str, key: &rsa_keygen::RsaPrivateKey| {
            format!(
                r#"{{"kty":"RSA","kid":"{kid}","alg":"RS256","use":"sig","n":"{}","e":"{}"}}"#,
                base64url::encode_bytes(&key.n().to_bytes_be()),
                base64url::encode_bytes(&key.e().to_bytes_be())
            )
        };
        let jwks = format!(
            r#"{{"keys":[{},{}]}}"#,
            jwk("first", &first_private),
            jwk("second", &second_private)
        );

        let keys = KeySet::from_jwks(&jwks).unwrap();
        assert_eq!(keys.len(), 2);
        let ctx = ValidationContext::builder().keys(keys).build().unwrap();

        let token = rs256(r#"{"alg":"RS256","kid":"second"}"#, r#"{"sub":"abc"}"#, &second);
        assert!(Jwt::parse(&token).unwrap().validate(&ctx).is_ok());

        // Right key material, wrong kid
        let token = rs256(r#"{"alg":"RS256","kid":"second"}"#, r#"{"sub":"abc"}"#, &first);
        assert!(matches!(
            Jwt::parse(&token).unwrap().validate(&ctx),
            Err(Error::UntrustedSignature(SignatureError::Invalid))
        ));

        let token = rs256(r#"{"alg":"RS256","kid":"third"}"#, r#"{"sub":"abc"}"#, &first);
        assert!(matches!(
            Jwt::parse(&token).unwrap().validate(&ctx),
            Err(Error::UntrustedSignature(SignatureError::UnknownKeyId(_)))
        ));
    }
}

#[cfg(feature = "ecdsa")]
mod ecdsa_jwk_tests {
    use super::*;
    use ring::rand::SystemRandom;
    use ring::signature::{ECDSA_P256_SHA256_FIXED_SIGNING, EcdsaKeyPair, KeyPair};

    fn es256_token(header: &str, payload: &str, keypair: &EcdsaKeyPair) -> String {
        let signing_input = format!(
            "{}.{}",
            base64url::encode(header),
            base64url::encode(payload)
        );
        let signature = keypair
            .sign(&SystemRandom::new(), signing_input.as_bytes())
            .unwrap();
        format!("{signing_input}.{}", base64url::encode_bytes(signature.as_ref()))
    }

    #[test]
    fn test_ec_jwk_end_to_end() {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng).unwrap();
        let keypair =
            EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8.as_ref(), &rng)
                .unwrap();

        // Uncompressed point: 0x04 || x || y
        let point: &[u8] = keypair.public_key().as_ref();
        let jwks = format!(
            r#"{{"keys":[{{"kty":"EC","kid":"ec-1","crv":"P-256","x":"{}","y":"{}"}}]}}"#,
            base64url::encode_bytes(&point[1..33]),
            base64url::encode_bytes(&point[33..65])
        );

        let ctx = ValidationContext::builder()
            .keys(KeySet::from_jwks(&jwks).unwrap())
            .algorithms(AlgorithmPolicy::allow_only(vec![AlgorithmId::ES256]))
            .build()
            .unwrap();

        let token = es256_token(
            r#"{"alg":"ES256","kid":"ec-1"}"#,
            r#"{"sub":"abc","amr":["hwk"]}"#,
            &keypair,
        );
        let claims = Jwt::parse(&token).unwrap().validate(&ctx).unwrap();
        assert_eq!(
            claims.get("amr"),
            Some(&Claim::AuthMethods(vec!["hwk".to_string()]))
        );
    }

    #[test]
    fn test_ec_jwk_wrong_coordinate_length() {
        let jwk = format!(
            r#"{{"kty":"EC","crv":"P-256","x":"{}","y":"{}"}}"#,
            base64url::encode_bytes(&[1u8; 31]),
            base64url::encode_bytes(&[1u8; 32])
        );
        assert!(matches!(Key::from_jwk(&jwk), Err(Error::InvalidKey(_))));
    }
}
