use criterion::{Criterion, criterion_group, criterion_main};
use field_buffer::field_id::make_id;
use field_buffer::{FieldBuffer, FieldId, FieldType, FieldValue, stream};
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

/// A mixed buffer: 8 distinct ids, interleaved, 4 occurrences each.
///
/// Layout order alternates ids so every resizing update has to shift offsets
/// belonging to other ids.
fn ids() -> [FieldId; 8] {
    [
        make_id(FieldType::Short, 1),
        make_id(FieldType::Long, 2),
        make_id(FieldType::Char, 3),
        make_id(FieldType::Float, 4),
        make_id(FieldType::Double, 5),
        make_id(FieldType::String, 6),
        make_id(FieldType::String, 7),
        make_id(FieldType::Binary, 8),
    ]
}

fn make_buffer() -> FieldBuffer {
    let mut buffer = FieldBuffer::with_capacity(64 * 1024).unwrap();
    let ids = ids();
    for round in 0..4i64 {
        buffer.add_short(ids[0], round as i16).unwrap();
        buffer.add_long(ids[1], round * 1_000_000).unwrap();
        buffer.add_char(ids[2], b'a' + round as u8).unwrap();
        buffer.add_float(ids[3], round as f32 * 0.5).unwrap();
        buffer.add_double(ids[4], round as f64 * 0.25).unwrap();
        buffer.add_string(ids[5], "customer name").unwrap();
        buffer.add_string(ids[6], "a somewhat longer address line").unwrap();
        buffer.add_binary(ids[7], &[round as u8; 32]).unwrap();
    }
    buffer
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Creating FieldBuffer
// ═══════════════════════════════════════════════════════════════════════════

fn bench_creating_field_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("creating_field_buffer");

    group.bench_function("add 32 fields", |b| b.iter(|| black_box(make_buffer())));

    let bytes = make_buffer().into_bytes();
    group.bench_function("FieldBuffer::from_bytes", |b| {
        b.iter(|| FieldBuffer::from_bytes(black_box(&bytes), 64 * 1024).unwrap())
    });

    let source = make_buffer();
    group.bench_function("copy_from", |b| {
        let mut target = FieldBuffer::with_capacity(64 * 1024).unwrap();
        b.iter(|| target.copy_from(black_box(&source)).unwrap())
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Reading Values
// ═══════════════════════════════════════════════════════════════════════════

fn bench_reading_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("reading_values");
    let buffer = make_buffer();
    let ids = ids();

    group.bench_function("get_long", |b| {
        b.iter(|| buffer.get_long(black_box(ids[1]), black_box(3)).unwrap())
    });
    group.bench_function("get_string", |b| {
        b.iter(|| buffer.get_string(black_box(ids[6]), black_box(2)).unwrap())
    });
    group.bench_function("select (value)", |b| {
        b.iter(|| buffer.value(black_box(ids[4]), black_box(1)).unwrap())
    });
    group.bench_function("iterate all", |b| b.iter(|| buffer.iter().count()));
    group.bench_function("stream::to_text", |b| {
        b.iter(|| stream::to_text(black_box(&buffer), None).unwrap())
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 3: Updating Values
// ═══════════════════════════════════════════════════════════════════════════

fn bench_update_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_values");
    let ids = ids();

    group.bench_function("update_long (same size)", |b| {
        let mut buffer = make_buffer();
        b.iter(|| buffer.update_long(ids[1], 0, black_box(7)).unwrap())
    });

    group.bench_function("update_string (diff size)", |b| {
        let mut buffer = make_buffer();
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let value = if flip { "short" } else { "a much longer replacement value" };
            buffer.update_string(ids[5], 0, black_box(value)).unwrap()
        })
    });

    group.bench_function("update (FieldValue)", |b| {
        let mut buffer = make_buffer();
        b.iter(|| {
            buffer
                .update(ids[4], 2, black_box(&FieldValue::Double(1.5)))
                .unwrap()
        })
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 4: Structural mutations
// ═══════════════════════════════════════════════════════════════════════════

fn bench_structural(c: &mut Criterion) {
    let mut group = c.benchmark_group("structural");
    let ids = ids();

    group.bench_function("remove + add (first record)", |b| {
        let mut buffer = make_buffer();
        b.iter(|| {
            buffer.remove(ids[0], 0).unwrap();
            buffer.add_short(ids[0], 9).unwrap();
        })
    });

    group.bench_function("reset + refill", |b| {
        let mut buffer = make_buffer();
        b.iter(|| {
            buffer.reset();
            buffer.add_long(ids[1], black_box(1)).unwrap();
        })
    });

    group.finish();
}

// ─── Criterion Main ─────────────────────────────────────────────────────────

criterion_group!(
    benches,
    bench_creating_field_buffer,
    bench_reading_values,
    bench_update_values,
    bench_structural,
);
criterion_main!(benches);
