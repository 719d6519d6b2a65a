// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Vec2};
use understory_quadtree::{HalfPlane, QuadTree};

/// Splitmix64 seeded from the workload name, so every bench gets its own
/// stable stream without magic constants scattered around.
struct Rng(u64);

impl Rng {
    fn from_label(label: &str) -> Self {
        // FNV-1a over the label.
        let mut h = 0xcbf2_9ce4_8422_2325_u64;
        for b in label.bytes() {
            h ^= u64::from(b);
            h = h.wrapping_mul(0x0000_0100_0000_01b3);
        }
        Self(h)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn in_range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }
}

/// An n×n board of disjoint tiles centred on the origin. Tiles fill 80% of
/// their cell so neighbours never touch and every tile can sink to a leaf.
fn gen_tile_rects(n: usize, cell: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n * n);
    let origin = -(n as f64) * cell / 2.0;
    for row in 0..n {
        for col in 0..n {
            let center = Point::new(
                origin + (col as f64 + 0.5) * cell,
                origin + (row as f64 + 0.5) * cell,
            );
            out.push(Rect::from_center_size(center, (cell * 0.8, cell * 0.8)));
        }
    }
    out
}

/// Uniformly scattered rects across all four quadrants of a square world
/// centred on the origin.
fn gen_scattered_rects(label: &str, count: usize, extent: f64, side: f64) -> Vec<Rect> {
    let mut rng = Rng::from_label(label);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let center = Point::new(
            rng.in_range(-extent, extent),
            rng.in_range(-extent, extent),
        );
        out.push(Rect::from_center_size(center, (side, side)));
    }
    out
}

/// Tight clusters, each holding several leaf-capacities' worth of rects, so
/// the tree splits a few levels deep under every cluster while most of the
/// world stays empty.
fn gen_clustered_rects(label: &str, n_clusters: usize, per_cluster: usize) -> Vec<Rect> {
    let mut rng = Rng::from_label(label);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let hub = Point::new(rng.in_range(-800.0, 800.0), rng.in_range(-800.0, 800.0));
        for _ in 0..per_cluster {
            let center = hub + Vec2::new(rng.in_range(-48.0, 48.0), rng.in_range(-48.0, 48.0));
            out.push(Rect::from_center_size(center, (5.0, 5.0)));
        }
    }
    out
}

fn world_for(rects: &[Rect]) -> (f64, Point) {
    let union = rects
        .iter()
        .copied()
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::new(0.0, 0.0, 1.0, 1.0));
    (union.width().max(union.height()), union.center())
}

fn bench_build_query_tiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiles");
    for &n in &[32usize, 64, 128] {
        let rects = gen_tile_rects(n, 10.0);
        let (size, center) = world_for(&rects);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("add_query_n{}", n), |b| {
            b.iter_batched(
                || QuadTree::<u32>::new(size, center, 1.0, 1.25),
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        tree.add(i as u32, r);
                    }
                    let mut hits = Vec::new();
                    tree.get_colliding(Rect::new(-100.0, -100.0, 100.0, 100.0), &mut hits);
                    black_box(hits.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_build_query_scattered(c: &mut Criterion) {
    let mut group = c.benchmark_group("scattered");
    let rects = gen_scattered_rects("scattered", 4096, 1000.0, 9.0);
    let (size, center) = world_for(&rects);
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("add_query_4096", |b| {
        b.iter_batched(
            || QuadTree::<u32>::new(size, center, 1.0, 1.25),
            |mut tree| {
                for (i, r) in rects.iter().copied().enumerate() {
                    tree.add(i as u32, r);
                }
                let mut hits = Vec::new();
                tree.get_colliding(Rect::new(-200.0, -200.0, 200.0, 200.0), &mut hits);
                black_box(hits.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_clustered_frustum(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustered");
    // 24 rects per cluster: three leaf-capacities, forcing nested splits.
    let rects = gen_clustered_rects("clustered", 16, 24);
    let (size, center) = world_for(&rects);
    // A wedge opening to the upper right.
    let planes = [
        HalfPlane::new(Vec2::new(1.0, 0.0), 400.0),
        HalfPlane::new(Vec2::new(0.0, 1.0), 400.0),
        HalfPlane::new(Vec2::new(-1.0, -1.0), 1000.0),
    ];
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("frustum_384", |b| {
        b.iter_batched(
            || {
                let mut tree = QuadTree::<u32>::new(size, center, 1.0, 1.25);
                for (i, r) in rects.iter().copied().enumerate() {
                    tree.add(i as u32, r);
                }
                tree
            },
            |tree| {
                let mut visible = Vec::new();
                tree.get_within_frustum(&planes, &mut visible);
                black_box(visible.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let rects = gen_scattered_rects("churn", 1024, 250.0, 6.0);
    let (size, center) = world_for(&rects);
    group.bench_function("remove_at_readd_1024", |b| {
        b.iter_batched(
            || {
                let mut tree = QuadTree::<u32>::new(size, center, 1.0, 1.25);
                for (i, r) in rects.iter().copied().enumerate() {
                    tree.add(i as u32, r);
                }
                tree
            },
            |mut tree| {
                for (i, r) in rects.iter().copied().enumerate() {
                    let moved = r + Vec2::new(3.0, -2.0);
                    assert!(tree.remove_at(i as u32, r));
                    tree.add(i as u32, moved);
                }
                black_box(tree.count());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_grow_from_origin(c: &mut Criterion) {
    let mut group = c.benchmark_group("grow");
    group.bench_function("march_outward_256", |b| {
        b.iter_batched(
            || QuadTree::<u32>::new(16.0, Point::ZERO, 1.0, 1.25),
            |mut tree| {
                // Entries marching away from the origin force repeated
                // world doublings with live content.
                for i in 0..256u32 {
                    let d = 1.0 + f64::from(i) * 5.0;
                    tree.add(i, Rect::new(d, d, d + 2.0, d + 2.0));
                }
                black_box(tree.max_rect());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_build_query_tiles,
    bench_build_query_scattered,
    bench_clustered_frustum,
    bench_churn,
    bench_grow_from_origin,
);
criterion_main!(benches);
