use criterion::{criterion_group, criterion_main, Criterion};
use wk::io::api::{wkb_to_wkt, wkt_to_wkb, wkt_to_wkt};

fn create_data() -> Vec<Option<String>> {
    // An L shape
    let poly = "POLYGON ((0 0, 4 0, 4 1, 1 1, 1 4, 0 4, 0 0))";
    let multi = format!(
        "MULTIPOLYGON ({})",
        vec!["((0 0, 4 0, 4 1, 1 1, 1 4, 0 4, 0 0))"; 10].join(", ")
    );
    (0..1000)
        .map(|i| Some(if i % 2 == 0 { poly.to_string() } else { multi.clone() }))
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let wkt = create_data();
    let wkb = wkt_to_wkb(wkt.clone(), Default::default()).unwrap();

    c.bench_function("translate wkt to wkb", |b| {
        b.iter(|| wkt_to_wkb(wkt.clone(), Default::default()).unwrap())
    });
    c.bench_function("translate wkb to wkt", |b| {
        b.iter(|| wkb_to_wkt(wkb.clone(), Default::default()).unwrap())
    });
    c.bench_function("normalize wkt", |b| {
        b.iter(|| wkt_to_wkt(wkt.clone(), Default::default()).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
