use criterion::{criterion_group, criterion_main, Criterion};
use plane_partition::algorithms::{enumerate_cycles, segment_crossings};
use plane_partition::data::CycleLength;
use plane_partition::families::{generate, Family};
use rand::SeedableRng;

pub fn criterion_benchmark(c: &mut Criterion) {
  let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
  let convex = generate(&Family::Convex { n: 30 }, &mut rng).unwrap();
  let wheel = generate(&Family::BumpyWheel { k: 3, l: 5 }, &mut rng).unwrap();
  let random = generate(&Family::Random { n: 20 }, &mut rng).unwrap();

  c.bench_function("segment_crossings(convex 30)", |b| {
    b.iter(|| segment_crossings(&convex))
  });
  c.bench_function("segment_crossings(bw 3 5)", |b| {
    b.iter(|| segment_crossings(&wheel))
  });
  c.bench_function("segment_crossings(random 20)", |b| {
    b.iter(|| segment_crossings(&random))
  });

  let lengths = [CycleLength::Triangle, CycleLength::Quadrilateral]
    .into_iter()
    .collect();
  c.bench_function("enumerate_cycles(16, {3, 4})", |b| {
    b.iter(|| enumerate_cycles(16, &lengths))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
