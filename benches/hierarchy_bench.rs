use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mesh_multiscale::prelude::*;

// Jittered planar grid with the outer ring marked as boundary.
fn grid_cloud(side: usize, seed: u64) -> PointCloud {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut positions = Vec::with_capacity(side * side);
    let mut boundary = Vec::with_capacity(side * side);
    for i in 0..side {
        for j in 0..side {
            let edge = i == 0 || j == 0 || i == side - 1 || j == side - 1;
            let jitter = if edge { 0.0 } else { 0.2 };
            positions.push([
                i as f64 + rng.gen_range(-jitter..=jitter),
                j as f64 + rng.gen_range(-jitter..=jitter),
                0.0,
            ]);
            boundary.push(edge);
        }
    }
    PointCloud::try_new(positions, boundary).unwrap()
}

fn bench_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy_setup");
    let params = MultigridParams {
        max_level: 3,
        tolerance: 0.3,
        ..Default::default()
    };
    for &side in &[8usize, 16] {
        let cloud = grid_cloud(side, 42);
        let adjacency = GabrielAdjacency::default();
        let graph = NeighborGraph::from_local_adjacency(&cloud, &adjacency).unwrap();
        let ab = Abundances::uniform(side * side, 1, 1.0).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &side, |b, _| {
            b.iter(|| {
                HierarchyBuilder::new(cloud.clone(), graph.clone(), adjacency)
                    .setup(&ab, &params)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_transfer(c: &mut Criterion) {
    let side = 16;
    let cloud = grid_cloud(side, 7);
    let adjacency = GabrielAdjacency::default();
    let graph = NeighborGraph::from_local_adjacency(&cloud, &adjacency).unwrap();
    let ab = Abundances::uniform(side * side, 1, 1.0).unwrap();
    let params = MultigridParams {
        max_level: 2,
        tolerance: 0.5,
        ..Default::default()
    };
    let mesh = HierarchyBuilder::new(cloud, graph, adjacency)
        .setup(&ab, &params)
        .unwrap();
    let transfer = FieldTransfer::new(&mesh, InterpolationOptions::for_dimension(2)).unwrap();
    let base = LevelPopulations::try_new(vec![PointField::from_values(
        2,
        vec![0.5; 2 * side * side],
    )
    .unwrap()])
    .unwrap();

    c.bench_function("level_populations_2_to_0", |b| {
        b.iter(|| {
            let mut pops = base.clone();
            transfer.level_populations(2, 0, &ab, &mut pops).unwrap()
        })
    });
}

criterion_group!(benches, bench_setup, bench_transfer);
criterion_main!(benches);
