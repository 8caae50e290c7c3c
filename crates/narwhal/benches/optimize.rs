use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use narwhal::{GraphIndex, LayoutOptions, Relation, assign_layers, cross_count, optimize};
use std::hint::black_box;
use std::time::Duration;

/// A focus with `width` children per generation over `depth` generations, each child linked to
/// a shifted node of the next generation to create crossing pressure.
fn build_relations(name: &str, width: usize, depth: usize) -> Vec<Relation> {
    let node = |d: usize, i: usize| format!("{name}_d{d}_n{i}");
    let mut relations = Vec::new();

    for i in 0..width {
        relations.push(Relation::next(format!("{name}_focus"), node(0, i)));
    }
    for d in 0..depth.saturating_sub(1) {
        for i in 0..width {
            relations.push(Relation::next(node(d, i), node(d + 1, i)));
            relations.push(Relation::next(node(d, i), node(d + 1, (i * 3 + 1) % width)));
        }
        // Siblings at the same depth.
        relations.push(Relation::parallel(node(d, 0), node(d, width / 2)));
    }
    relations
}

fn bench_cross_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_count");

    let cases = [("w4_d4", 4usize, 4usize), ("w8_d6", 8, 6), ("w16_d8", 16, 8)];
    for (name, width, depth) in cases {
        let relations = build_relations(name, width, depth);
        let g = GraphIndex::build(&relations);
        let Some(focus) = g.id(&format!("{name}_focus")) else {
            continue;
        };
        let layers = assign_layers(focus, &g);

        group.bench_with_input(BenchmarkId::new("count", name), &layers, |b, layers| {
            b.iter(|| black_box(cross_count::count(black_box(layers), &g)))
        });
    }

    group.finish();
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    group.measurement_time(Duration::from_secs(10));

    let cases = [("w4_d4", 4usize, 4usize), ("w6_d5", 6, 5), ("w8_d6", 8, 6)];
    let strategies = [
        ("search", LayoutOptions::default().with_seed(1)),
        ("exhaustive", LayoutOptions::exhaustive()),
        ("barycenter", LayoutOptions::barycenter()),
    ];

    for (name, width, depth) in cases {
        let relations = build_relations(name, width, depth);
        let g = GraphIndex::build(&relations);
        let Some(focus) = g.id(&format!("{name}_focus")) else {
            continue;
        };
        let initial = assign_layers(focus, &g);

        for (strategy, options) in &strategies {
            group.bench_with_input(
                BenchmarkId::new(*strategy, name),
                &initial,
                |b, initial| {
                    b.iter_batched(
                        || initial.clone(),
                        |layers| {
                            let out = optimize(black_box(layers), &g, options, None);
                            black_box(out.crossings.total());
                        },
                        BatchSize::SmallInput,
                    )
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_cross_count, bench_optimize);
criterion_main!(benches);
