//! Mask construction: one axis slice at a time, two voxel layers in, a 2D
//! signed-material mask (plus parallel AO mask) out.

use loam_blocks::BlockRegistry;
use loam_chunk::{ChunkBuf, VoxelView};

use crate::ao::pack_ao;
use crate::build::MesherOpts;

/// Which faces of a boundary slice this chunk owns. A chunk's mesh contains
/// exactly the faces whose rendering voxel lies inside it, so the low-edge
/// pass keeps only negative-direction faces (our layer 0 renders) and the
/// high-edge pass only positive ones (our last layer renders).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum SlicePass {
    Interior,
    LowEdge,
    HighEdge,
}

/// Fills `mask`/`ao_mask` for the slice between layers `ib` and `ib+1`
/// along `axis` and returns the number of face cells written.
///
/// Every cell of the `size*size` prefix is written (zero or a signed
/// material id), so a reused scratch buffer is always logically fresh.
pub(crate) fn build_mask(
    mask: &mut [i16],
    ao_mask: &mut [u8],
    view: &VoxelView<'_>,
    buf: &ChunkBuf,
    reg: &BlockRegistry,
    axis: usize,
    ib: i32,
    pass: SlicePass,
    opts: &MesherOpts,
) -> usize {
    let size = buf.size;
    let cells = size * size;
    assert!(
        mask.len() >= cells && ao_mask.len() >= cells,
        "mask scratch smaller than one {size}x{size} slice"
    );

    // Whole-layer skip: two uniform layers of the same voxel can never
    // produce a face. Only interior pairs qualify; edge layers live in the
    // neighbor, which this chunk's tables don't cover. The tables are
    // derived per axis, so this pass only consults flags computed along
    // the axis it is meshing.
    if pass == SlicePass::Interior {
        let below = buf.uniform_layer(axis, ib as usize);
        if below >= 0 && below == buf.uniform_layer(axis, ib as usize + 1) {
            mask[..cells].fill(0);
            return 0;
        }
    }

    let solid = |i: i32, j: i32, k: i32| reg.is_solid(view.get_t_or_air(axis, i, j, k));
    let mut count = 0usize;
    let mut n = 0usize;
    for k in 0..size as i32 {
        for j in 0..size as i32 {
            let id0 = view.get_t_or_air(axis, ib, j, k);
            let id1 = view.get_t_or_air(axis, ib + 1, j, k);

            // Identical voxels never face each other; this is the common
            // case and must stay first.
            if id0 == id1 {
                mask[n] = 0;
                n += 1;
                continue;
            }
            let t0 = reg.block(id0);
            let t1 = reg.block(id1);
            if t0.opaque && t1.opaque {
                mask[n] = 0;
                n += 1;
                continue;
            }
            let m0 = t0.materials[axis * 2].0 as i16;
            let m1 = t1.materials[axis * 2 + 1].0 as i16;
            // Matching face materials blend seamlessly even across distinct
            // voxel ids (also covers both sides having no material).
            if m0 == m1 {
                mask[n] = 0;
                n += 1;
                continue;
            }
            // Side selection: prefer the opaque side, else the side with a
            // material, else the lower side. Behavioral contract; downstream
            // visuals depend on this exact tie-break.
            let val: i16 = if t0.opaque {
                m0
            } else if t1.opaque {
                -m1
            } else if m0 == 0 {
                -m1
            } else {
                m0
            };
            let keep = match pass {
                SlicePass::Interior => val != 0,
                SlicePass::LowEdge => val < 0,
                SlicePass::HighEdge => val > 0,
            };
            if !keep {
                mask[n] = 0;
                n += 1;
                continue;
            }
            mask[n] = val;
            if opts.ao {
                let (ipos, ineg) = if val > 0 { (ib + 1, ib) } else { (ib, ib + 1) };
                ao_mask[n] = pack_ao(solid, ipos, ineg, j, k, opts.skip_reverse_ao);
            }
            count += 1;
            n += 1;
        }
    }
    count
}
