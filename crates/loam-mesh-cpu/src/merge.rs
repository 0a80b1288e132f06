//! Greedy merging of mask cells into maximal rectangles.

/// Consumes `mask` (and the parallel AO mask) into merged rectangles,
/// calling `emit(mat, negative, j, k, w, h, ao)` once per rectangle.
///
/// Scan order is row-major with `k` outer and `j` inner, matching the mask
/// fill order exactly; extension tries width first, then whole rows, so the
/// output is deterministic for a given mask. Consumed cells are zeroed and
/// `remaining` (the builder's face count) is drained by `w*h` per emit,
/// allowing an early stop once the slice is exhausted.
pub(crate) fn merge_mask(
    mask: &mut [i16],
    ao_mask: &[u8],
    size: usize,
    mut remaining: usize,
    ao_enabled: bool,
    mut emit: impl FnMut(u16, bool, usize, usize, usize, usize, u8),
) {
    let cells = size * size;
    assert!(
        mask.len() >= cells && ao_mask.len() >= cells,
        "mask scratch smaller than one {size}x{size} slice"
    );
    if remaining == 0 {
        return;
    }
    for k in 0..size {
        for j in 0..size {
            let n = k * size + j;
            let cur = mask[n];
            if cur == 0 {
                continue;
            }
            let cur_ao = ao_mask[n];
            let matches = |m: usize| -> bool {
                mask[m] == cur && (!ao_enabled || ao_mask[m] == cur_ao)
            };

            // Extend width along the row while material (and AO) match.
            let mut w = 1;
            while j + w < size && matches(n + w) {
                w += 1;
            }
            // Extend height: a row joins only if all w cells match.
            let mut h = 1;
            'rows: while k + h < size {
                let row = n + h * size;
                for x in 0..w {
                    if !matches(row + x) {
                        break 'rows;
                    }
                }
                h += 1;
            }

            for kk in 0..h {
                let row = n + kk * size;
                for x in 0..w {
                    mask[row + x] = 0;
                }
            }
            emit(cur.unsigned_abs(), cur < 0, j, k, w, h, cur_ao);

            let consumed = w * h;
            assert!(
                consumed <= remaining,
                "merged {consumed} cells with only {remaining} outstanding"
            );
            remaining -= consumed;
            if remaining == 0 {
                return;
            }
        }
    }
    assert_eq!(
        remaining, 0,
        "mask exhausted with {remaining} faces unaccounted for"
    );
}
