//! Benchmarks for advertisement decoding.
//!
//! Covers the envelope walk and routing together with each decoder family,
//! plus the miss paths that a scanner hits for most foreign advertisements.

use beacon_decoder::{decode_packet, elements, parse_packet};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// Flags element followed by the given raw hex
fn packet(hex: &str) -> Vec<u8> {
    let mut out = vec![0x02, 0x01, 0x06];
    out.extend(hex::decode(hex).unwrap_or_default());
    out
}

fn packets() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        // Eddystone-UID
        (
            "eddystone_uid",
            packet("1716aafe00eb0102030405060708090a0b0c0d0e0f100000"),
        ),
        // Eddystone-URL https://www.example.com/
        ("eddystone_url", packet("0e16aafe10f801076578616d706c6500")),
        // Eddystone-TLM
        ("eddystone_tlm", packet("1116aafe20000c1c19800000100000010000")),
        // iBeacon
        (
            "ibeacon",
            packet("1aff4c000215e2c56db5dffb48d2b060d0f5a71096e000010002c5"),
        ),
        // Estimote telemetry subframe A
        (
            "estimote_telemetry",
            packet("17169afe2211111111111111110000000000000000000000"),
        ),
        // Minew S1
        ("minew_s1", packet("06a15017000032")),
        // Manufacturer data from an unrelated vendor
        ("unknown_company", packet("06ff9904051200")),
    ]
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_packet");
    group.throughput(Throughput::Elements(1));

    for (name, data) in packets() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| black_box(decode_packet(black_box(data))))
        });
    }

    group.finish();
}

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope");

    // Several elements ahead of a local name
    let full = packet("05ff990401020303aafe0e094142434445464748494a4b4c4d");
    group.throughput(Throughput::Bytes(full.len() as u64));
    group.bench_function("walk_elements", |b| {
        b.iter(|| black_box(elements(black_box(&full)).count()))
    });

    let truncated = packet("1aff4c000215e2c5");
    group.bench_function("truncated", |b| {
        b.iter(|| black_box(parse_packet(black_box(&truncated))))
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_envelope);
criterion_main!(benches);
