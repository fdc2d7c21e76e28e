//! Benchmarks for the soft-body simulation.

use criterion::{criterion_group, criterion_main, Criterion};
use squish::{BodyConfig, Controls, DistanceField, HalfSpace, MeshBuilder, NoOpStepObserver, Obstacle, SoftBody, Vec3};

fn bench_mesh_build(c: &mut Criterion) {
    c.bench_function("mesh_build_level_4", |b| {
        b.iter(|| MeshBuilder::<f32>::build(10.0, 4));
    });
}

fn bench_body_step(c: &mut Criterion) {
    c.bench_function("body_level_4_60_steps_on_ground", |b| {
        b.iter(|| {
            let config = BodyConfig::<f32>::new().with_subdivision(4);
            let mut body = SoftBody::new(config, Vec3::new(0.0, 12.0, 0.0)).unwrap();
            let mut obstacles: Vec<Box<dyn Obstacle<f32>>> =
                vec![Box::new(HalfSpace::new(0.0))];
            let controls = Controls::default();
            for _ in 0..60 {
                body.step(&mut obstacles, &controls, &mut NoOpStepObserver);
            }
            body.volume()
        });
    });
}

fn bench_distance_field(c: &mut Criterion) {
    let (_, topo) = MeshBuilder::<f32>::build(10.0, 4);
    c.bench_function("distance_field_level_4", |b| {
        let mut field = DistanceField::new(topo.vertex_count());
        b.iter(|| {
            field.compute(&topo, 0);
            field.distance(100)
        });
    });
}

criterion_group!(benches, bench_mesh_build, bench_body_step, bench_distance_field);
criterion_main!(benches);
