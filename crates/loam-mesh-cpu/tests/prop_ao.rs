use std::collections::HashSet;

use loam_mesh_cpu::ao::{pack_ao, unpack_ao};
use proptest::prelude::*;

/// The eight cells surrounding (j,k) in the `ipos` plane, edge cells first.
const RING: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

fn solidity(
    ring: HashSet<usize>,
    backing_solid: bool,
) -> impl Fn(i32, i32, i32) -> bool {
    move |i, j, k| {
        if i == 0 {
            return backing_solid;
        }
        if i != 1 {
            return false;
        }
        RING.iter()
            .enumerate()
            .any(|(n, &(dj, dk))| ring.contains(&n) && (j, k) == (dj, dk))
    }
}

fn corner_levels(ring: &HashSet<usize>, backing_solid: bool, skip_reverse: bool) -> [u8; 4] {
    unpack_ao(pack_ao(
        solidity(ring.clone(), backing_solid),
        1,
        0,
        0,
        0,
        skip_reverse,
    ))
}

proptest! {
    // unpack must be the exact inverse of the packing bit layout for any
    // byte the packer can produce.
    #[test]
    fn pack_unpack_roundtrip(
        ring in proptest::collection::hash_set(0usize..8, 0..8),
        backing in any::<bool>(),
        skip_reverse in any::<bool>(),
    ) {
        let packed = pack_ao(solidity(ring, backing), 1, 0, 0, 0, skip_reverse);
        let [a, b, c, d] = unpack_ao(packed);
        prop_assert!(a <= 3 && b <= 3 && c <= 3 && d <= 3);
        prop_assert_eq!((c << 6) | (d << 4) | (b << 2) | a, packed);
    }

    // With a solid backing plane (no reverse branch), adding a solid cell
    // never lowers any corner.
    #[test]
    fn corners_are_monotone_in_solidity(
        ring in proptest::collection::hash_set(0usize..8, 0..8),
        extra in 0usize..8,
    ) {
        let base = corner_levels(&ring, true, false);
        let mut bigger = ring.clone();
        bigger.insert(extra);
        let grown = corner_levels(&bigger, true, false);
        for (lo, hi) in base.iter().zip(grown.iter()) {
            prop_assert!(hi >= lo, "corner dropped from {lo} to {hi}");
        }
    }

    // skip_reverse collapses the model to levels 1..=3.
    #[test]
    fn skip_reverse_never_emits_level_zero(
        ring in proptest::collection::hash_set(0usize..8, 0..8),
        backing in any::<bool>(),
    ) {
        let levels = corner_levels(&ring, backing, true);
        for level in levels {
            prop_assert!(level >= 1);
        }
    }
}

#[test]
fn open_backing_turns_flat_corners_reverse() {
    // Nothing around and nothing behind: all four corners are exposed
    // edges, regardless of how much sits elsewhere in the ring.
    let levels = corner_levels(&HashSet::new(), false, false);
    assert_eq!(levels, [0, 0, 0, 0]);
    // A solid edge keeps its two corners out of the reverse branch.
    let mut ring = HashSet::new();
    ring.insert(0); // (j+1, k): raises C and D
    let levels = corner_levels(&ring, false, false);
    assert_eq!(levels[2], 2);
    assert_eq!(levels[3], 2);
    assert_eq!(levels[0], 0);
    assert_eq!(levels[1], 0);
}

#[test]
fn reverse_applies_regardless_of_far_neighbors() {
    // Corner A's backing cells are open while C's side of the ring fills
    // up: A stays reverse at level 0, C climbs normally.
    let mut ring = HashSet::new();
    ring.insert(0); // (1,0) edge
    ring.insert(2); // (0,1) edge
    ring.insert(4); // (1,1) diagonal
    let solid = move |i: i32, j: i32, k: i32| {
        if i == 0 {
            // Backing solid only on C's quadrant.
            return j >= 0 && k >= 0 && (j, k) != (0, 0);
        }
        if i != 1 {
            return false;
        }
        RING.iter()
            .enumerate()
            .any(|(n, &(dj, dk))| ring.contains(&n) && (j, k) == (dj, dk))
    };
    let [a, _b, c, _d] = unpack_ao(pack_ao(solid, 1, 0, 0, 0, false));
    assert_eq!(a, 0);
    assert_eq!(c, 3);
}
