use criterion::{criterion_group, criterion_main, Criterion};
use plane_partition::config::ModelConfig;
use plane_partition::data::CycleLength;
use plane_partition::families::{generate, Family};
use plane_partition::model::ConstraintModel;
use rand::SeedableRng;

pub fn criterion_benchmark(c: &mut Criterion) {
  let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
  let wheel = generate(&Family::BumpyWheel { k: 3, l: 5 }, &mut rng).unwrap();

  let plane = ModelConfig::for_points(wheel.len()).with_forbidden_cycles([CycleLength::Triangle]);
  c.bench_function("ConstraintModel(bw 3 5, triangles)", |b| {
    b.iter(|| ConstraintModel::from_point_set(&wheel, &plane))
  });

  let trees = ModelConfig {
    cover_all_vertices: true,
    ..plane.with_forbidden_cycles([CycleLength::Triangle, CycleLength::Quadrilateral])
  };
  c.bench_function("ConstraintModel(bw 3 5, spanning trees)", |b| {
    b.iter(|| ConstraintModel::from_point_set(&wheel, &trees))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
