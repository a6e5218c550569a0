use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use record_buffer::{FieldType, Record, RecordBuffer, Shape, Terminator};

fn header_shape() -> Shape {
    Shape::new()
        .field(
            "signature",
            FieldType::FixedStr {
                len: 4,
                term: Terminator::None,
            },
        )
        .field("version", FieldType::U8)
        .field("count", FieldType::U16Le)
        .field("flags", FieldType::U32Be)
        .field("delta", FieldType::Midi)
        .field("reserved", FieldType::Padding { len: 4, fill: 0 })
        .field(
            "title",
            FieldType::VarStr {
                max: 64,
                term: Terminator::Required,
            },
        )
}

fn header_values() -> Record {
    let mut values = Record::new();
    values.insert("signature", "FORM");
    values.insert("version", 2u8);
    values.insert("count", 512u16);
    values.insert("flags", 0xDEADBEEFu32);
    values.insert("delta", 0x123456);
    values.insert("title", "Secret Underground Lab");
    values
}

fn bench_write_record(c: &mut Criterion) {
    let shape = header_shape();
    let values = header_values();

    c.bench_function("write_record", |b| {
        b.iter_batched(
            || RecordBuffer::with_capacity(4096),
            |mut rb| {
                for _ in 0..16 {
                    rb.write_record(&shape, &values).unwrap();
                }
                rb
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_read_record(c: &mut Criterion) {
    let shape = header_shape();
    let values = header_values();

    let mut rb = RecordBuffer::with_capacity(4096);
    for _ in 0..16 {
        rb.write_record(&shape, &values).unwrap();
    }
    let encoded = rb.bytes().to_vec();

    c.bench_function("read_record", |b| {
        b.iter_batched(
            || RecordBuffer::from(encoded.clone()),
            |mut rb| {
                for _ in 0..16 {
                    rb.read_record(&shape).unwrap();
                }
                rb
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_put_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_growth");

    for &size in &[1 << 10, 1 << 16, 1 << 21] {
        let data = vec![0xA5u8; size];
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter_batched(
                || RecordBuffer::with_capacity(16),
                |mut rb| {
                    for chunk in data.chunks(251) {
                        rb.put(chunk);
                    }
                    rb
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_write_record,
    bench_read_record,
    bench_put_growth
);
criterion_main!(benches);
