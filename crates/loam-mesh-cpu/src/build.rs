//! Chunk meshing driver: mask construction, greedy merge, and emission.

use std::time::Instant;

use hashbrown::HashMap;
use loam_blocks::BlockRegistry;
use loam_blocks::terrain::TerrainMatId;
use loam_blocks::types::MaterialId;
use loam_chunk::{ChunkBuf, ChunkNeighbors, VoxelView};
use loam_geom::{Aabb, Vec3};

use crate::chunk_mesh::ChunkMeshCpu;
use crate::emit::emit_batch;
use crate::mask::{SlicePass, build_mask};
use crate::merge::merge_mask;
use crate::mesh_build::MeshBuild;
use crate::scratch::{FaceRecord, MeshingScratch};

/// Render-quality knobs for a meshing pass.
#[derive(Clone, Debug)]
pub struct MesherOpts {
    /// Compute per-vertex ambient occlusion.
    pub ao: bool,
    /// Collapse the 4-level AO model to 3 levels and skip the solidity
    /// reads behind each face. Fewer queries, flatter shading.
    pub skip_reverse_ao: bool,
    /// Brightness per occlusion level 1..=3 (flat, partial, full corner).
    pub ao_brightness: [f32; 3],
    /// Brightness for level 0, the exposed-edge case; brighter than flat.
    pub reverse_ao_brightness: f32,
}

impl Default for MesherOpts {
    fn default() -> Self {
        Self {
            ao: true,
            skip_reverse_ao: false,
            ao_brightness: [0.93, 0.8, 0.5],
            reverse_ao_brightness: 1.0,
        }
    }
}

/// Meshes one chunk against its loaded neighbors.
///
/// Synchronous and bounded: cost is proportional to chunk volume. The
/// scratch must not be shared with a concurrent meshing call; see
/// [`MeshingScratch`].
pub fn mesh_chunk(
    buf: &ChunkBuf,
    neighbors: &ChunkNeighbors<'_>,
    reg: &BlockRegistry,
    scratch: &mut MeshingScratch,
    opts: &MesherOpts,
) -> ChunkMeshCpu {
    let t_start = Instant::now();
    let size = buf.size;
    let base = [
        (buf.coord.cx * size as i32) as f32,
        (buf.coord.cy * size as i32) as f32,
        (buf.coord.cz * size as i32) as f32,
    ];
    let bbox = Aabb::new(
        Vec3::new(base[0], base[1], base[2]),
        Vec3::new(
            base[0] + size as f32,
            base[1] + size as f32,
            base[2] + size as f32,
        ),
    );

    scratch.reset_faces();
    // A chunk owns only its own voxels' faces, so an all-air chunk never
    // contributes geometry.
    if buf.is_all_air() {
        return ChunkMeshCpu {
            coord: buf.coord,
            bbox,
            parts: HashMap::new(),
        };
    }

    scratch.ensure_mask(size * size);
    let view = VoxelView::new(buf, neighbors);
    let mut total_faces = 0usize;

    for axis in 0..3 {
        let mut axis_faces = 0usize;
        // Low edge: the neighbor's last layer below our layer 0. Skipped
        // while that neighbor is unloaded (open boundary, no face).
        if neighbors.face_loaded(axis, false) {
            axis_faces += run_slice(scratch, &view, buf, reg, axis, -1, SlicePass::LowEdge, opts);
        }
        for ib in 0..size as i32 - 1 {
            axis_faces += run_slice(scratch, &view, buf, reg, axis, ib, SlicePass::Interior, opts);
        }
        if neighbors.face_loaded(axis, true) {
            axis_faces += run_slice(
                scratch,
                &view,
                buf,
                reg,
                axis,
                size as i32 - 1,
                SlicePass::HighEdge,
                opts,
            );
        }
        log::trace!("axis={axis} faces={axis_faces}");
        total_faces += axis_faces;
    }

    let mut parts: HashMap<TerrainMatId, MeshBuild> = HashMap::new();
    for (&tid, batch) in scratch.faces.iter() {
        if batch.is_empty() {
            continue;
        }
        let uses_atlas = reg.terrain.uses_atlas(tid);
        let mut mb = if uses_atlas {
            MeshBuild::with_atlas()
        } else {
            MeshBuild::default()
        };
        emit_batch(&mut mb, batch, &reg.materials, uses_atlas, base, opts);
        parts.insert(tid, mb);
    }

    log::debug!(
        target: "perf",
        "ms={} mesh_chunk size={} faces={} parts={} coord=({}, {}, {})",
        t_start.elapsed().as_millis(),
        size,
        total_faces,
        parts.len(),
        buf.coord.cx,
        buf.coord.cy,
        buf.coord.cz
    );
    ChunkMeshCpu {
        coord: buf.coord,
        bbox,
        parts,
    }
}

/// Builds and immediately merges one slice's mask, filing records by
/// terrain material. Returns the slice's face count.
fn run_slice(
    scratch: &mut MeshingScratch,
    view: &VoxelView<'_>,
    buf: &ChunkBuf,
    reg: &BlockRegistry,
    axis: usize,
    ib: i32,
    pass: SlicePass,
    opts: &MesherOpts,
) -> usize {
    let size = buf.size;
    let MeshingScratch {
        mask,
        ao_mask,
        faces,
    } = scratch;
    let count = build_mask(mask, ao_mask, view, buf, reg, axis, ib, pass, opts);
    if count == 0 {
        return 0;
    }
    let plane = (ib + 1) as u16;
    merge_mask(
        mask,
        ao_mask,
        size,
        count,
        opts.ao,
        |mat, negative, j, k, w, h, ao| {
            let mid = MaterialId(mat);
            let tid = reg.terrain.terrain_id_for(mid);
            faces.entry(tid).or_default().push(FaceRecord {
                mat: mid,
                dir: (axis * 2 + negative as usize) as u8,
                i: plane,
                j: j as u16,
                k: k as u16,
                w: w as u16,
                h: h as u16,
                ao,
            });
        },
    );
    count
}
