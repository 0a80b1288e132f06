use criterion::{Criterion, black_box, criterion_group, criterion_main};

use loam_blocks::material::MaterialSpec;
use loam_blocks::registry::{BlockRegistry, BlockSpec};
use loam_chunk::{ChunkBuf, ChunkCoord, ChunkNeighbors};
use loam_mesh_cpu::{MesherOpts, MeshingScratch, mesh_chunk};

fn bench_registry() -> BlockRegistry {
    let mut reg = BlockRegistry::new();
    let stone = reg.add_material(
        "stone",
        MaterialSpec {
            color: [0.55, 0.55, 0.55],
            ..MaterialSpec::default()
        },
    );
    let dirt = reg.add_material(
        "dirt",
        MaterialSpec {
            color: [0.5, 0.35, 0.2],
            ..MaterialSpec::default()
        },
    );
    reg.add_block(BlockSpec::uniform("stone", true, true, stone));
    reg.add_block(BlockSpec::uniform("dirt", true, true, dirt));
    reg.finalize();
    reg
}

/// Deterministic rolling heightfield, no noise dependency needed here.
fn hill_chunk(reg: &BlockRegistry, size: usize) -> ChunkBuf {
    let stone = reg.id_by_name("stone").unwrap();
    let dirt = reg.id_by_name("dirt").unwrap();
    let mut buf = ChunkBuf::new(ChunkCoord::new(0, 0, 0), size);
    for x in 0..size {
        for z in 0..size {
            let height = (size / 2) + ((x * 7 + z * 13) % (size / 2));
            for y in 0..height.min(size) {
                let id = if y + 2 >= height { dirt } else { stone };
                buf.set_local(x, y, z, id);
            }
        }
    }
    buf
}

fn bench_mesh_hill(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_chunk_hill");
    let reg = bench_registry();
    for size in [16usize, 32] {
        let buf = hill_chunk(&reg, size);
        let air: Vec<ChunkBuf> = {
            let mut out = Vec::new();
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        if (dx, dy, dz) != (0, 0, 0) {
                            out.push(ChunkBuf::new(ChunkCoord::new(dx, dy, dz), size));
                        }
                    }
                }
            }
            out
        };
        let mut nbs = ChunkNeighbors::none();
        let mut slot = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if (dx, dy, dz) != (0, 0, 0) {
                        nbs.set(dx, dy, dz, &air[slot]);
                        slot += 1;
                    }
                }
            }
        }
        let mut scratch = MeshingScratch::new();
        let opts = MesherOpts::default();
        group.bench_function(format!("ao_{size}x{size}x{size}"), |b| {
            b.iter(|| {
                let mesh = mesh_chunk(&buf, &nbs, &reg, &mut scratch, &opts);
                black_box(mesh);
            })
        });
        let flat = MesherOpts {
            ao: false,
            ..MesherOpts::default()
        };
        group.bench_function(format!("flat_{size}x{size}x{size}"), |b| {
            b.iter(|| {
                let mesh = mesh_chunk(&buf, &nbs, &reg, &mut scratch, &flat);
                black_box(mesh);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mesh_hill);
criterion_main!(benches);
