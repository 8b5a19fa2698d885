use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;
use storefront_api::entities::OrderStatus;

const STATUSES: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
];

// Benchmark for the order status transition table
fn status_transition_benchmark(c: &mut Criterion) {
    c.bench_function("status_transition_table", |b| {
        b.iter(|| {
            let mut allowed = 0u32;
            for from in STATUSES {
                for to in STATUSES {
                    if black_box(from).can_transition_to(black_box(to)) {
                        allowed += 1;
                    }
                }
            }
            black_box(allowed)
        });
    });
}

// Benchmark for cart total accumulation across line counts
fn cart_total_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("cart_total");

    for size in [1, 5, 10, 20].iter() {
        let lines: Vec<(Decimal, i32)> = (0..*size)
            .map(|i| (dec!(19.99) + Decimal::from(i), (i % 5) + 1))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| {
                let total: Decimal = lines
                    .iter()
                    .map(|(price, qty)| *price * Decimal::from(*qty))
                    .sum();
                black_box(total)
            });
        });
    }

    group.finish();
}

// Benchmark for serializing a checkout response payload
fn checkout_payload_benchmark(c: &mut Criterion) {
    use serde_json::json;

    let payload = json!({
        "order": {
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "customer_email": "shopper@example.com",
            "status": "Pending",
            "total_amount": "59.97",
            "version": 1
        },
        "items": [
            {
                "product_id": "123e4567-e89b-12d3-a456-426614174000",
                "product_name": "House Blend Beans",
                "quantity": 3,
                "price_at_time": "19.99"
            }
        ]
    });

    c.bench_function("checkout_payload_serialize", |b| {
        b.iter(|| {
            let serialized = serde_json::to_string(&payload).unwrap();
            black_box(serialized)
        });
    });

    c.bench_function("checkout_payload_deserialize", |b| {
        let serialized = serde_json::to_string(&payload).unwrap();
        b.iter(|| {
            let deserialized: serde_json::Value = serde_json::from_str(&serialized).unwrap();
            black_box(deserialized)
        });
    });
}

// Benchmark for decimal price snapshot arithmetic
fn price_snapshot_benchmark(c: &mut Criterion) {
    c.bench_function("price_snapshot_multiply", |b| {
        b.iter(|| {
            let unit = black_box(dec!(19.99));
            let quantity = black_box(3);
            black_box(unit * Decimal::from(quantity))
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets =
        status_transition_benchmark,
        cart_total_benchmark,
        checkout_payload_benchmark,
        price_snapshot_benchmark
}

criterion_main!(benches);
