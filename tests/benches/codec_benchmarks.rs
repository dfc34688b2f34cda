//! # Hub Client Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Envelope codec | typed → wire → bytes and back |
//! | Event bus | fan-out of one event to N filtered subscribers |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use hub_bus::{EventFilters, EventType, HubEvent, InMemoryEventBus, Subscription};
use hub_tests::fixtures::{cast_add, id_registry_event};
use hub_types::{decode_message_bytes, encode_message_bytes};

fn bench_envelope_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope-codec");
    let message = cast_add(2, 1_000, "benchmark cast with a little text in it");
    let bytes = encode_message_bytes(&message).expect("encode");

    group.bench_function("encode_message_bytes", |b| {
        b.iter(|| black_box(encode_message_bytes(black_box(&message))))
    });
    group.bench_function("decode_message_bytes", |b| {
        b.iter(|| black_box(decode_message_bytes(black_box(&bytes))))
    });
    group.finish();
}

/// Bus with `count` subscribers, half of which filter the event out.
fn subscribed_bus(count: usize) -> (InMemoryEventBus, Vec<Subscription>) {
    let bus = InMemoryEventBus::new();
    let subscriptions = (0..count)
        .map(|n| {
            if n % 2 == 0 {
                bus.subscribe(EventFilters::all())
            } else {
                bus.subscribe(EventFilters::of([EventType::MergeMessage]))
            }
        })
        .collect();
    (bus, subscriptions)
}

fn bench_bus_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("event-bus");
    let event = HubEvent::MergeIdRegistryEvent(id_registry_event(2, 1));

    for subscribers in [1usize, 10, 100] {
        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::new("dispatch", subscribers),
            &subscribers,
            |b, &subscribers| {
                b.iter_batched(
                    || subscribed_bus(subscribers),
                    |(bus, subscriptions)| {
                        black_box(bus.dispatch(event.clone()));
                        (bus, subscriptions)
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_envelope_codec, bench_bus_fan_out);
criterion_main!(benches);
