//! Per-vertex ambient occlusion packing.
//!
//! A face gets four 2-bit corner levels packed into one byte:
//!
//! - 0: reverse occlusion, an exposed concave edge drawn brighter than flat
//! - 1: flat surround
//! - 2: partial (one diagonal or one edge neighbor solid)
//! - 3: full corner occlusion
//!
//! Corner layout in the face's (j,k) plane, with the solidity query taken in
//! transposed coordinates (`i` along the face normal):
//!
//! ```text
//!       k
//!       ^  B ---- C
//!       |  |      |
//!       |  A ---- D
//!       +--------> j
//! ```
//!
//! A sits at (j-1,k-1), B at (j-1,k+1), C at (j+1,k+1), D at (j+1,k-1).
//! Bit layout: `C<<6 | D<<4 | B<<2 | A`.

/// Computes the packed AO byte for the face between layers `ineg` (behind
/// the face) and `ipos` (the cell the face opens into), at mask cell (j,k).
///
/// `skip_reverse` collapses the model to three levels (flat/partial/full)
/// and skips the extra solidity reads behind the face.
pub fn pack_ao(
    solid: impl Fn(i32, i32, i32) -> bool,
    ipos: i32,
    ineg: i32,
    j: i32,
    k: i32,
    skip_reverse: bool,
) -> u8 {
    let mut a = 1u8;
    let mut b = 1u8;
    let mut c = 1u8;
    let mut d = 1u8;

    // Each solid edge-adjacent cell raises the two corners touching it.
    if solid(ipos, j + 1, k) {
        d += 1;
        c += 1;
    }
    if solid(ipos, j - 1, k) {
        a += 1;
        b += 1;
    }
    if solid(ipos, j, k + 1) {
        b += 1;
        c += 1;
    }
    if solid(ipos, j, k - 1) {
        a += 1;
        d += 1;
    }

    if solid(ipos, j, k) {
        // The face opens into a solid but non-opaque voxel (e.g. glass):
        // uniform ambient shade instead of directional AO, sharpened only
        // where the diagonal is solid too.
        a = if a == 3 || solid(ipos, j - 1, k - 1) { 3 } else { 2 };
        b = if b == 3 || solid(ipos, j - 1, k + 1) { 3 } else { 2 };
        c = if c == 3 || solid(ipos, j + 1, k + 1) { 3 } else { 2 };
        d = if d == 3 || solid(ipos, j + 1, k - 1) { 3 } else { 2 };
        return pack_corners(a, b, c, d);
    }

    if skip_reverse {
        if a == 1 && solid(ipos, j - 1, k - 1) {
            a = 2;
        }
        if b == 1 && solid(ipos, j - 1, k + 1) {
            b = 2;
        }
        if c == 1 && solid(ipos, j + 1, k + 1) {
            c = 2;
        }
        if d == 1 && solid(ipos, j + 1, k - 1) {
            d = 2;
        }
        return pack_corners(a, b, c, d);
    }

    // An unoccluded corner goes partial when its diagonal is solid. Failing
    // that, if any of the three cells behind the face at that corner is
    // open, the corner sits on an exposed edge and takes reverse occlusion.
    if a == 1 {
        if solid(ipos, j - 1, k - 1) {
            a = 2;
        } else if !(solid(ineg, j - 1, k) && solid(ineg, j, k - 1) && solid(ineg, j - 1, k - 1)) {
            a = 0;
        }
    }
    if b == 1 {
        if solid(ipos, j - 1, k + 1) {
            b = 2;
        } else if !(solid(ineg, j - 1, k) && solid(ineg, j, k + 1) && solid(ineg, j - 1, k + 1)) {
            b = 0;
        }
    }
    if c == 1 {
        if solid(ipos, j + 1, k + 1) {
            c = 2;
        } else if !(solid(ineg, j + 1, k) && solid(ineg, j, k + 1) && solid(ineg, j + 1, k + 1)) {
            c = 0;
        }
    }
    if d == 1 {
        if solid(ipos, j + 1, k - 1) {
            d = 2;
        } else if !(solid(ineg, j + 1, k) && solid(ineg, j, k - 1) && solid(ineg, j + 1, k - 1)) {
            d = 0;
        }
    }
    pack_corners(a, b, c, d)
}

#[inline]
fn pack_corners(a: u8, b: u8, c: u8, d: u8) -> u8 {
    (c << 6) | (d << 4) | (b << 2) | a
}

/// Exact inverse of the packing bit layout; returns `[A, B, C, D]`.
#[inline]
pub fn unpack_ao(packed: u8) -> [u8; 4] {
    [packed & 3, (packed >> 2) & 3, (packed >> 6) & 3, (packed >> 4) & 3]
}
