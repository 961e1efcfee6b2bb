//! Validation and rule evaluation benchmarks
//!
//! Measures the full parse → verify → claim-check pipeline for signed and
//! nested tokens, and rule evaluation with and without memoized references.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use jwtrust::*;
use serde_json::json;

/// Helper to generate HMAC tokens with specific claims
mod helpers {
    use hmac::{Hmac, Mac};
    use jwtrust::utils::base64url;
    use sha2::Sha256;

    pub fn hs256(header: &str, claims: &str, secret: &[u8]) -> String {
        let header_b64 = base64url::encode(header);
        let payload_b64 = base64url::encode(claims);
        let signing_input = format!("{}.{}", header_b64, payload_b64);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret).unwrap();
        mac.update(signing_input.as_bytes());
        let signature_bytes = mac.finalize().into_bytes();
        let signature_b64 = base64url::encode_bytes(&signature_bytes);

        format!("{}.{}", signing_input, signature_b64)
    }
}

const SECRET: &[u8] = b"test-secret-key";
const CLAIMS: &str = r#"{"iss":"https://idp.example","sub":"user123","aud":"my-app","exp":1700003600,"iat":1700000000,"age":20,"country":"NL"}"#;

fn context() -> ValidationContext {
    ValidationContext::builder()
        .key(Key::symmetric(SECRET.to_vec()))
        .at(1_700_000_100)
        .standard_time_checks()
        .validator(IssuerValidator::new(["https://idp.example"]))
        .validator(AudienceValidator::new("my-app"))
        .build()
        .unwrap()
}

fn bench_validation(c: &mut Criterion) {
    let ctx = context();
    let mut group = c.benchmark_group("validation");

    let token = helpers::hs256(r#"{"alg":"HS256","typ":"JWT"}"#, CLAIMS, SECRET);
    group.bench_function("hs256", |b| {
        b.iter(|| {
            let jwt = Jwt::parse(black_box(&token)).unwrap();
            black_box(jwt.validate(&ctx).unwrap());
        });
    });

    let nested = helpers::hs256(r#"{"alg":"HS256","cty":"JWT"}"#, &token, SECRET);
    group.bench_function("hs256_nested", |b| {
        b.iter(|| {
            let jwt = Jwt::parse(black_box(&nested)).unwrap();
            black_box(jwt.validate(&ctx).unwrap());
        });
    });

    let forged = format!("{}x", &token[..token.len() - 1]);
    group.bench_function("hs256_rejected", |b| {
        b.iter(|| {
            let jwt = Jwt::parse(black_box(&forged)).unwrap();
            black_box(jwt.validate(&ctx).is_err());
        });
    });

    group.finish();
}

fn bench_claims(c: &mut Criterion) {
    c.bench_function("claim_set_from_json", |b| {
        b.iter(|| black_box(ClaimSet::from_json(black_box(CLAIMS)).unwrap()));
    });
}

fn bench_rules(c: &mut Criterion) {
    let claims = ClaimSet::from_json(CLAIMS).unwrap();
    let rules = json!({
        "$isAdult": {">=": [{"var": "age"}, 18]},
        "$isEu": {"in": [{"var": "country"}, ["NL", "BE", "DE"]]},
        "$eligible": {"and": [{"var": "$isAdult"}, {"var": "$isEu"}]}
    });
    let rules = rules.as_object().cloned().unwrap_or_default();
    let decision = json!({"or": [{"var": "$eligible"}, {"var": "$isAdult"}]});

    let mut group = c.benchmark_group("rules");

    group.bench_function("fresh_evaluator", |b| {
        b.iter(|| {
            let evaluator = LogicEvaluator::new(rules.clone(), claims.to_value());
            black_box(evaluator.evaluate(&decision).unwrap());
        });
    });

    let warm = LogicEvaluator::new(rules.clone(), claims.to_value());
    warm.evaluate(&decision).unwrap();
    group.bench_function("memoized_reference", |b| {
        b.iter(|| black_box(warm.evaluate(&json!({"var": "$eligible"})).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_validation, bench_claims, bench_rules);
criterion_main!(benches);
