use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::service::{AuthService, AuthConfig};
use service::auth::repository::mock::MockAuthRepository;
use service::auth::domain::{RegisterInput, LoginInput};
use service::auth::TokenIssuer;

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let tokens = TokenIssuer::new("bench-secret-0123456789", "poseidon-api", "poseidon-clients", 3600);
    let svc = AuthService::new(repo.clone(), AuthConfig::default(), tokens.clone());

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let _ = rt.block_on(svc.register(RegisterInput { user_name: "bench".into(), full_name: None, email: "bench@example.com".into(), password: "Benchmark1!".into() }));

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput { email: "bench@example.com".into(), password: "Benchmark1!".into() })).unwrap();
        });
    });

    let (token, _) = rt
        .block_on(svc.login(LoginInput { email: "bench@example.com".into(), password: "Benchmark1!".into() }))
        .map(|s| (s.token, s.expires_at))
        .unwrap();
    c.bench_function("token_verify", |b| {
        b.iter(|| tokens.verify(&token).unwrap());
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
