//! Benchmarks for orb-core
//!
//! Run with: `cargo bench -p orb-core`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use orb_core::broadphase::{all_pairs, find_pairs};
use orb_core::types::constants;
use orb_core::{Body, Shape, SphereDesc, Vec3, World, WorldConfig};

/// Spheres on a loose cube lattice above a static planet.
fn lattice_world(count: usize) -> World {
    let mut world = World::new(WorldConfig::default());
    let planet = world.spawn_sphere(SphereDesc::new(Vec3::zeros(), 50.0).with_mass(0.0));
    world.attract_to(planet);

    let side = (count as f64).cbrt().ceil() as usize;
    for i in 0..count {
        let (x, y, z) = (i % side, (i / side) % side, i / (side * side));
        let position = Vec3::new(
            x as f64 * 2.5 - side as f64,
            y as f64 * 2.5 - side as f64,
            55.0 + z as f64 * 2.5,
        );
        world.spawn_sphere(SphereDesc::new(position, 1.0));
    }
    world
}

fn lattice_bodies(count: usize) -> Vec<Body> {
    lattice_world(count).bodies().to_vec()
}

// ============================================================================
// World step
// ============================================================================

fn bench_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");

    for count in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("60_steps", count), &count, |b, &count| {
            b.iter(|| {
                let mut world = lattice_world(count);
                for _ in 0..60 {
                    world.step(black_box(1.0 / 60.0));
                }
                world.len()
            });
        });
    }

    group.finish();
}

// ============================================================================
// Broadphase
// ============================================================================

fn bench_broadphase(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadphase");
    let axis = Vec3::new(1.0, 1.0, 1.0);

    for count in [100, 1000] {
        let bodies = lattice_bodies(count);

        group.bench_with_input(
            BenchmarkId::new("sort_and_sweep", count),
            &bodies,
            |b, bodies| {
                b.iter(|| {
                    find_pairs(
                        black_box(bodies),
                        1.0 / 60.0,
                        &axis,
                        constants::BROADPHASE_MARGIN,
                    )
                })
            },
        );

        group.bench_with_input(BenchmarkId::new("brute_force", count), &bodies, |b, bodies| {
            b.iter(|| all_pairs(black_box(bodies)))
        });
    }

    group.finish();
}

// ============================================================================
// Single body integration
// ============================================================================

fn bench_body_update(c: &mut Criterion) {
    c.bench_function("body_update_spinning", |b| {
        let mut body = Body::new(Shape::sphere(1.0))
            .with_linear_velocity(Vec3::new(1.0, 2.0, 3.0))
            .with_angular_velocity(Vec3::new(0.5, -2.0, 1.0));
        b.iter(|| {
            body.update(black_box(1.0 / 60.0));
            body.orientation
        })
    });
}

criterion_group!(benches, bench_world_step, bench_broadphase, bench_body_update);
criterion_main!(benches);
