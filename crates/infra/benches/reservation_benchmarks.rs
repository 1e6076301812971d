use criterion::{criterion_group, criterion_main, Criterion};

use quayside_infra::InMemoryInventoryRepository;
use quayside_inventory::{InventoryItem, InventoryRepository, ReservationLine};

fn bench_try_reserve(c: &mut Criterion) {
    let repo = InMemoryInventoryRepository::new((0..100).map(|n| InventoryItem {
        sku: format!("sku-{n}"),
        available: u32::MAX,
    }));
    let lines: Vec<ReservationLine> = (0..10)
        .map(|n| ReservationLine {
            sku: format!("sku-{n}"),
            qty: 1,
        })
        .collect();

    c.bench_function("try_reserve 10 lines", |b| {
        b.iter(|| repo.try_reserve(&lines).unwrap());
    });

    let short: Vec<ReservationLine> = vec![ReservationLine {
        sku: "missing".into(),
        qty: 1,
    }];
    c.bench_function("try_reserve shortage path", |b| {
        b.iter(|| repo.try_reserve(&short).unwrap());
    });
}

criterion_group!(benches, bench_try_reserve);
criterion_main!(benches);
