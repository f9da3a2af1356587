//! Benchmarks for the CPU-side scene work done every frame or every rebuild.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use galaxy_scene::galaxy::{generate, GalaxyParameters};
use galaxy_scene::render::{push_galaxy, FrameInstances};
use galaxy_scene::starfield::{Starfield, StarfieldConfig};
use galaxy_scene::text_field::{ParticleField, TextFieldConfig};
use galaxy_scene::glyphs::BlockFont;
use galaxy_scene::transition::GalaxyField;
use galaxy_scene::SpawnContext;
use glam::Vec2;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for count in [50_000u32, 100_000, 200_000] {
        group.bench_with_input(BenchmarkId::new("spiral", count), &count, |b, &count| {
            let params = GalaxyParameters::default().with_count(count);
            let mut ctx = SpawnContext::seeded(1);
            b.iter(|| black_box(generate(&params, &mut ctx)))
        });
    }

    group.bench_function("disk_200k", |b| {
        let params = GalaxyParameters::accretion_disk().with_count(200_000);
        let mut ctx = SpawnContext::seeded(2);
        b.iter(|| black_box(generate(&params, &mut ctx)))
    });

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    group.bench_function("starfield_update_1500", |b| {
        let mut ctx = SpawnContext::seeded(3);
        let mut starfield = Starfield::new(StarfieldConfig::default().with_particle_count(1500), &mut ctx).unwrap();
        starfield.set_warp(true);
        b.iter(|| {
            starfield.update(black_box(1.0 / 60.0), &mut ctx);
        })
    });

    group.bench_function("transition_step_200k", |b| {
        let mut ctx = SpawnContext::seeded(4);
        let mut field = GalaxyField::new(GalaxyParameters::default(), &mut ctx).unwrap();
        field
            .transition_to(GalaxyParameters::accretion_disk().with_count(200_000), 1.0e6, &mut ctx)
            .unwrap();
        b.iter(|| field.update(black_box(1.0 / 60.0)))
    });

    group.bench_function("galaxy_instances_200k", |b| {
        let mut ctx = SpawnContext::seeded(5);
        let field = GalaxyField::new(GalaxyParameters::default(), &mut ctx).unwrap();
        let mut frame = FrameInstances::new();
        b.iter(|| {
            frame.world.clear();
            push_galaxy(&field, &mut frame.world);
            black_box(frame.world.len())
        })
    });

    group.bench_function("title_step", |b| {
        let mut ctx = SpawnContext::seeded(6);
        let mut title = ParticleField::new(TextFieldConfig::default()).unwrap();
        title.attach(1280, 720);
        title.set_text("GALAXY", "TOUCH TO EXPLORE", &BlockFont, &mut ctx);
        title.set_pointer(Some(Vec2::new(640.0, 360.0)));
        b.iter(|| title.step())
    });

    group.finish();
}

criterion_group!(benches, bench_generate, bench_frame);
criterion_main!(benches);
