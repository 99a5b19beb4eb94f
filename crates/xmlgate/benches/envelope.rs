use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use xmlgate::{parse_tree, process, validate};

const READ_BY_NAME: &str = "<request><control>\
    <senderid>acme</senderid><password>pw</password><controlid>c</controlid>\
    <uniqueid>false</uniqueid><dtdversion>3.0</dtdversion>\
    <includewhitespace>false</includewhitespace></control><operation>\
    <authentication><sessionid>s</sessionid></authentication>\
    <content><function controlid=\"f\"><readbyname><object>CUSTOMER</object>\
    <keys>1</keys><fields>CUSTOMERID</fields></readbyname></function></content>\
    </operation></request>";

const MISSING_FIELD: &str = "<request><control><senderid>acme</senderid></control></request>";

fn bench_validate(c: &mut Criterion) {
    let Ok(tree) = parse_tree(READ_BY_NAME) else {
        return;
    };
    c.bench_function("validate_read_by_name", |b| {
        b.iter(|| validate(black_box(&tree)))
    });
}

fn bench_process(c: &mut Criterion) {
    c.bench_function("process_read_by_name", |b| {
        b.iter(|| process(black_box(READ_BY_NAME)))
    });
    c.bench_function("process_missing_field", |b| {
        b.iter(|| process(black_box(MISSING_FIELD)))
    });
}

criterion_group!(benches, bench_validate, bench_process);
criterion_main!(benches);
