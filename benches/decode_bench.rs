use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cfgmigrate::container::{read_records, HEADER_SIZE};
use cfgmigrate::Record;
use std::io::Cursor;

fn synthetic_container(count: u32) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_SIZE as usize];
    for i in 0..count {
        let rec = Record {
            filename: format!("profile_{i:05}.cfg"),
            value1:   i,
            value2:   (i % 0xFFFF) as u16,
            value3:   0x0001,
            value4:   u64::from(i).rotate_left(17),
        };
        rec.write(&mut buf).unwrap();
    }
    buf
}

fn bench_decode(c: &mut Criterion) {
    let data = synthetic_container(10_000);

    c.bench_function("decode_10k_records", |b| {
        b.iter(|| read_records(Cursor::new(black_box(data.as_slice()))).unwrap())
    });
}

fn bench_hash_code(c: &mut Criterion) {
    let records = read_records(Cursor::new(synthetic_container(1_000))).unwrap();

    c.bench_function("hash_code_1k_records", |b| {
        b.iter(|| {
            for r in black_box(&records) {
                black_box(r.hash_code());
            }
        })
    });
}

criterion_group!(benches, bench_decode, bench_hash_code);
criterion_main!(benches);
