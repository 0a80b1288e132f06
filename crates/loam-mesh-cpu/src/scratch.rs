//! Caller-owned scratch state reused across meshing calls.
//!
//! Meshing is single-threaded and non-reentrant per scratch instance: one
//! chunk's pass must complete before the same scratch is handed to another.
//! There is deliberately no internal locking; a multi-threaded host gives
//! each worker its own `MeshingScratch`.

use hashbrown::HashMap;
use loam_blocks::types::MaterialId;
use loam_blocks::terrain::TerrainMatId;

/// One merged-quad record, the unit handed from the merger to the emitter.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FaceRecord {
    pub mat: MaterialId,
    /// Direction index `axis*2 + (1 if negative)`.
    pub dir: u8,
    /// Boundary-plane coordinate along the face's normal axis, `0..=size`.
    pub i: u16,
    /// Origin in the two non-normal axes (transposed space).
    pub j: u16,
    pub k: u16,
    /// Extents along the `(axis+1)%3` and `(axis+2)%3` axes, both >= 1.
    pub w: u16,
    pub h: u16,
    /// Packed corner AO.
    pub ao: u8,
}

/// Structure-of-arrays pool of face records for one terrain material.
/// Records are written by index and reset by length so per-chunk meshing
/// never reallocates once the pool has warmed up.
#[derive(Default, Clone, Debug)]
pub struct FaceBatch {
    mat: Vec<MaterialId>,
    dir: Vec<u8>,
    i: Vec<u16>,
    j: Vec<u16>,
    k: Vec<u16>,
    w: Vec<u16>,
    h: Vec<u16>,
    ao: Vec<u8>,
    len: usize,
}

impl FaceBatch {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, rec: FaceRecord) {
        if self.len == self.mat.len() {
            self.mat.push(rec.mat);
            self.dir.push(rec.dir);
            self.i.push(rec.i);
            self.j.push(rec.j);
            self.k.push(rec.k);
            self.w.push(rec.w);
            self.h.push(rec.h);
            self.ao.push(rec.ao);
        } else {
            let n = self.len;
            self.mat[n] = rec.mat;
            self.dir[n] = rec.dir;
            self.i[n] = rec.i;
            self.j[n] = rec.j;
            self.k[n] = rec.k;
            self.w[n] = rec.w;
            self.h[n] = rec.h;
            self.ao[n] = rec.ao;
        }
        self.len += 1;
    }

    #[inline]
    pub fn record(&self, n: usize) -> FaceRecord {
        assert!(n < self.len, "face record {n} out of range ({})", self.len);
        FaceRecord {
            mat: self.mat[n],
            dir: self.dir[n],
            i: self.i[n],
            j: self.j[n],
            k: self.k[n],
            w: self.w[n],
            h: self.h[n],
            ao: self.ao[n],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = FaceRecord> + '_ {
        (0..self.len).map(|n| self.record(n))
    }
}

/// Mask, AO mask, and face-record pools, reused across chunks. Buffers only
/// ever grow (geometrically), never shrink.
#[derive(Default)]
pub struct MeshingScratch {
    pub(crate) mask: Vec<i16>,
    pub(crate) ao_mask: Vec<u8>,
    pub(crate) faces: HashMap<TerrainMatId, FaceBatch>,
}

impl MeshingScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grows the mask buffers to at least `cells`, doubling to amortize.
    /// Contents are not cleared here; the mask builder rewrites every cell
    /// of the slice it uses, so stale data from earlier passes never leaks
    /// into a new face count.
    pub(crate) fn ensure_mask(&mut self, cells: usize) {
        if self.mask.len() < cells {
            let target = cells.max(self.mask.len() * 2);
            self.mask.resize(target, 0);
            self.ao_mask.resize(target, 0);
        }
    }

    pub(crate) fn reset_faces(&mut self) {
        for batch in self.faces.values_mut() {
            batch.reset();
        }
    }
}
