//! Chunk storage, the neighbor set, and the extended voxel view the mesher
//! reads through.
#![forbid(unsafe_code)]

use loam_blocks::types::{AIR, BlockId};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }
}

/// Maps transposed meshing coordinates back to grid space: the normal axis
/// carries `i`, and `j`,`k` fill the remaining axes in `(axis+1)%3,
/// (axis+2)%3` order. Zero-copy alternative to materializing transposes.
#[inline]
pub const fn axis_resolve(axis: usize, i: i32, j: i32, k: i32) -> (i32, i32, i32) {
    match axis {
        0 => (i, j, k),
        1 => (k, i, j),
        _ => (j, k, i),
    }
}

/// Dense cubic voxel buffer for one chunk, plus per-axis uniform-layer
/// tables consumed by the mesher's whole-layer skip.
#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub size: usize,
    pub blocks: Vec<BlockId>,
    /// Per axis: the single voxel id filling a whole layer, or -1 if mixed.
    uniform_layers: [Vec<i32>; 3],
}

impl ChunkBuf {
    pub fn new(coord: ChunkCoord, size: usize) -> Self {
        Self {
            coord,
            size,
            blocks: vec![AIR; size * size * size],
            uniform_layers: [vec![0; size], vec![0; size], vec![0; size]],
        }
    }

    pub fn from_blocks(coord: ChunkCoord, size: usize, blocks: Vec<BlockId>) -> Self {
        let mut b = blocks;
        let expect = size * size * size;
        if b.len() != expect {
            b.resize(expect, AIR);
        }
        let mut buf = Self {
            coord,
            size,
            blocks: b,
            uniform_layers: [Vec::new(), Vec::new(), Vec::new()],
        };
        buf.recompute_uniform_layers();
        buf
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.size + z) * self.size + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[self.idx(x, y, z)]
    }

    pub fn set_local(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        let i = self.idx(x, y, z);
        self.blocks[i] = id;
        for (axis, layer) in [(0, x), (1, y), (2, z)] {
            let fresh = self.scan_layer(axis, layer);
            self.uniform_layers[axis][layer] = fresh;
        }
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        self.blocks.iter().all(|&b| b == AIR)
    }

    /// Voxel id if the whole layer perpendicular to `axis` holds a single id,
    /// else -1. Each axis's table is derived along that same axis, so a pass
    /// along one axis never consults flags computed along another.
    #[inline]
    pub fn uniform_layer(&self, axis: usize, layer: usize) -> i32 {
        self.uniform_layers[axis][layer]
    }

    pub fn recompute_uniform_layers(&mut self) {
        for axis in 0..3 {
            let mut table = Vec::with_capacity(self.size);
            for layer in 0..self.size {
                table.push(self.scan_layer(axis, layer));
            }
            self.uniform_layers[axis] = table;
        }
    }

    fn scan_layer(&self, axis: usize, layer: usize) -> i32 {
        let first = {
            let (x, y, z) = axis_resolve(axis, layer as i32, 0, 0);
            self.get_local(x as usize, y as usize, z as usize)
        };
        for j in 0..self.size {
            for k in 0..self.size {
                let (x, y, z) = axis_resolve(axis, layer as i32, j as i32, k as i32);
                if self.get_local(x as usize, y as usize, z as usize) != first {
                    return -1;
                }
            }
        }
        first as i32
    }
}

/// The up-to-26 loaded chunks around a center chunk, addressed by offset in
/// {-1,0,1}^3. Slots left `None` are unloaded world edges.
#[derive(Default)]
pub struct ChunkNeighbors<'a> {
    slots: [Option<&'a ChunkBuf>; 27],
}

impl<'a> ChunkNeighbors<'a> {
    pub fn none() -> Self {
        Self { slots: [None; 27] }
    }

    #[inline]
    fn slot(dx: i32, dy: i32, dz: i32) -> usize {
        debug_assert!((-1..=1).contains(&dx) && (-1..=1).contains(&dy) && (-1..=1).contains(&dz));
        (((dx + 1) * 3 + (dy + 1)) * 3 + (dz + 1)) as usize
    }

    pub fn set(&mut self, dx: i32, dy: i32, dz: i32, buf: &'a ChunkBuf) {
        debug_assert!(
            !(dx == 0 && dy == 0 && dz == 0),
            "the center chunk is not a neighbor"
        );
        self.slots[Self::slot(dx, dy, dz)] = Some(buf);
    }

    #[inline]
    pub fn get(&self, dx: i32, dy: i32, dz: i32) -> Option<&'a ChunkBuf> {
        self.slots[Self::slot(dx, dy, dz)]
    }

    /// Whether the face-adjacent neighbor on `axis` (positive or negative
    /// side) is loaded.
    #[inline]
    pub fn face_loaded(&self, axis: usize, positive: bool) -> bool {
        let step = if positive { 1 } else { -1 };
        let (dx, dy, dz) = axis_resolve(axis, step, 0, 0);
        self.get(dx, dy, dz).is_some()
    }
}

/// Zero-copy read view over a chunk and its loaded neighbors, addressed in
/// extended chunk-local coordinates `[-size, 2*size)` per axis.
pub struct VoxelView<'a> {
    center: &'a ChunkBuf,
    neighbors: &'a ChunkNeighbors<'a>,
    size: i32,
}

impl<'a> VoxelView<'a> {
    pub fn new(center: &'a ChunkBuf, neighbors: &'a ChunkNeighbors<'a>) -> Self {
        Self {
            center,
            neighbors,
            size: center.size as i32,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.center.size
    }

    /// `None` when the coordinate falls in an unloaded neighbor.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        let (dx, lx) = Self::split(x, self.size);
        let (dy, ly) = Self::split(y, self.size);
        let (dz, lz) = Self::split(z, self.size);
        if dx == 0 && dy == 0 && dz == 0 {
            return Some(self.center.get_local(lx, ly, lz));
        }
        self.neighbors
            .get(dx, dy, dz)
            .map(|nb| nb.get_local(lx, ly, lz))
    }

    /// Unloaded neighbors read as open air (non-solid, non-opaque). Face
    /// decisions against unloaded chunks are suppressed before this is
    /// reached; only AO sampling takes the air fallback.
    #[inline]
    pub fn get_or_air(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.get(x, y, z).unwrap_or(AIR)
    }

    /// Transposed access: `i` runs along `axis`, `j`/`k` along the two
    /// remaining axes.
    #[inline]
    pub fn get_t(&self, axis: usize, i: i32, j: i32, k: i32) -> Option<BlockId> {
        let (x, y, z) = axis_resolve(axis, i, j, k);
        self.get(x, y, z)
    }

    #[inline]
    pub fn get_t_or_air(&self, axis: usize, i: i32, j: i32, k: i32) -> BlockId {
        let (x, y, z) = axis_resolve(axis, i, j, k);
        self.get_or_air(x, y, z)
    }

    #[inline]
    fn split(c: i32, size: i32) -> (i32, usize) {
        debug_assert!(
            c >= -size && c < 2 * size,
            "coordinate {c} outside the one-chunk neighborhood"
        );
        if c < 0 {
            (-1, (c + size) as usize)
        } else if c >= size {
            (1, (c - size) as usize)
        } else {
            (0, c as usize)
        }
    }
}
