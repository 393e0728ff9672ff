// SPDX-License-Identifier: Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use velada_model::{Email, NationalId, Phone, RegistrationInput};

fn bench_email_parse(c: &mut Criterion) {
    c.bench_function("email_parse", |b| {
        b.iter(|| Email::parse(black_box("ana.maria+tag@mail.example.com")).expect("email"))
    });
}

fn bench_national_id_parse(c: &mut Criterion) {
    c.bench_function("national_id_parse", |b| {
        b.iter(|| NationalId::parse(black_box("1710034065")).expect("national id"))
    });
}

fn bench_phone_parse(c: &mut Criterion) {
    c.bench_function("phone_parse", |b| {
        b.iter(|| Phone::parse(black_box("0991234567")).expect("phone"))
    });
}

fn bench_registration_validate(c: &mut Criterion) {
    let input = RegistrationInput {
        first_name: "Ana María".to_string(),
        last_name: "Mora".to_string(),
        email: "ana@example.com".to_string(),
        password: "abc123".to_string(),
        password_repeat: "abc123".to_string(),
        national_id: "1710034065".to_string(),
        phone: "0991234567".to_string(),
    };
    c.bench_function("registration_validate", |b| {
        b.iter(|| black_box(&input).validate().expect("valid form"))
    });
}

criterion_group!(
    benches,
    bench_email_parse,
    bench_national_id_parse,
    bench_phone_parse,
    bench_registration_validate
);
criterion_main!(benches);
