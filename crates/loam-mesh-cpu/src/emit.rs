//! Turns merged face records into vertex/index buffers.

use loam_blocks::material::MaterialCatalog;

use crate::ao::unpack_ao;
use crate::build::MesherOpts;
use crate::face::Face;
use crate::mesh_build::MeshBuild;
use crate::scratch::{FaceBatch, FaceRecord};

/// Maps transposed face-plane coordinates to grid space, mirroring
/// `loam_chunk::axis_resolve` for floats.
#[inline]
fn place(axis: usize, i: f32, u: f32, v: f32, base: [f32; 3]) -> [f32; 3] {
    let p = match axis {
        0 => [i, u, v],
        1 => [v, i, u],
        _ => [u, v, i],
    };
    [p[0] + base[0], p[1] + base[1], p[2] + base[2]]
}

/// Emits every record of `batch` into `mb`. `base` is the chunk's world
/// origin; `uses_atlas` must match how `mb` was constructed.
pub(crate) fn emit_batch(
    mb: &mut MeshBuild,
    batch: &FaceBatch,
    catalog: &MaterialCatalog,
    uses_atlas: bool,
    base: [f32; 3],
    opts: &MesherOpts,
) {
    mb.reserve_quads(batch.len());
    for rec in batch.iter() {
        emit_record(mb, rec, catalog, uses_atlas, base, opts);
    }
}

fn emit_record(
    mb: &mut MeshBuild,
    rec: FaceRecord,
    catalog: &MaterialCatalog,
    uses_atlas: bool,
    base: [f32; 3],
    opts: &MesherOpts,
) {
    let face = Face::from_index(rec.dir as usize);
    let axis = face.axis();
    let negative = !face.is_positive();
    let def = catalog.def(rec.mat);

    let i = rec.i as f32;
    let (j, k) = (rec.j as f32, rec.k as f32);
    let (w, h) = (rec.w as f32, rec.h as f32);
    // Corner order: c0 at (j,k), then counter-clockwise around the positive
    // normal; AO corners A,D,C,B land on c0..c3 in that order.
    let corners = [
        place(axis, i, j, k, base),
        place(axis, i, j + w, k, base),
        place(axis, i, j + w, k + h, base),
        place(axis, i, j, k + h, base),
    ];

    let n = face.normal();
    let normal = [n.x, n.y, n.z];

    // Textures carry their own color; flat materials tint via vertex color.
    let rgb = if def.is_textured() {
        [1.0, 1.0, 1.0]
    } else {
        def.color
    };

    let vbase = mb.vertex_count() as u32;
    for c in &corners {
        mb.pos.extend_from_slice(c);
        mb.norm.extend_from_slice(&normal);
    }

    // The u axis mirrors on negative faces so textures keep a consistent
    // orientation across the three axis pairs.
    let uvs = if negative {
        [(w, 0.0), (0.0, 0.0), (0.0, h), (w, h)]
    } else {
        [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)]
    };
    for (u, v) in uvs {
        mb.uv.push(u);
        mb.uv.push(v);
    }

    let split_ac = if opts.ao {
        let [a, b, c, d] = unpack_ao(rec.ao);
        for level in [a, d, c, b] {
            let shade = if level == 0 {
                opts.reverse_ao_brightness
            } else {
                opts.ao_brightness[(level - 1) as usize]
            };
            mb.col
                .extend_from_slice(&[rgb[0] * shade, rgb[1] * shade, rgb[2] * shade, 1.0]);
        }
        // Split along the A-C diagonal unless the opposite corner pair
        // carries the stronger gradient. Empirical visual rule; the
        // comparison is authoritative.
        a == c || a + c > d + b
    } else {
        // Flat full-brightness path: no table lookups at all.
        for _ in 0..4 {
            mb.col.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 1.0]);
        }
        true
    };

    let order: [u32; 6] = match (negative, split_ac) {
        (false, true) => [0, 1, 2, 0, 2, 3],
        (false, false) => [1, 2, 3, 1, 3, 0],
        (true, true) => [0, 2, 1, 0, 3, 2],
        (true, false) => [1, 3, 2, 1, 0, 3],
    };
    mb.idx.extend(order.iter().map(|o| vbase + o));

    if uses_atlas {
        let layer = def.atlas_layer.unwrap_or(0) as f32;
        if let Some(atlas) = &mut mb.atlas {
            atlas.extend_from_slice(&[layer; 4]);
        }
    }
}

#[cfg(test)]
mod tests {
    use loam_blocks::material::{MaterialCatalog, MaterialSpec};
    use loam_blocks::types::MaterialId;

    use super::*;
    use crate::scratch::FaceBatch;

    fn catalog() -> (MaterialCatalog, MaterialId) {
        let mut catalog = MaterialCatalog::new();
        let mat = catalog.add(
            "moss",
            MaterialSpec {
                color: [0.2, 0.8, 0.4],
                ..MaterialSpec::default()
            },
        );
        (catalog, mat)
    }

    fn one_record(mat: MaterialId, dir: u8, ao: u8) -> FaceBatch {
        let mut batch = FaceBatch::default();
        batch.push(FaceRecord {
            mat,
            dir,
            i: 1,
            j: 0,
            k: 0,
            w: 2,
            h: 1,
            ao,
        });
        batch
    }

    fn pack(a: u8, b: u8, c: u8, d: u8) -> u8 {
        (c << 6) | (d << 4) | (b << 2) | a
    }

    #[test]
    fn symmetric_ao_splits_along_ac() {
        let (catalog, mat) = catalog();
        let mut mb = MeshBuild::default();
        let batch = one_record(mat, 0, pack(2, 1, 2, 1));
        emit_batch(&mut mb, &batch, &catalog, false, [0.0; 3], &MesherOpts::default());
        assert_eq!(&mb.idx, &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn asymmetric_ao_flips_the_diagonal() {
        let (catalog, mat) = catalog();
        let mut mb = MeshBuild::default();
        // A+C = 1 < D+B = 4: the D-B diagonal wins.
        let batch = one_record(mat, 0, pack(0, 2, 1, 2));
        emit_batch(&mut mb, &batch, &catalog, false, [0.0; 3], &MesherOpts::default());
        assert_eq!(&mb.idx, &[1, 2, 3, 1, 3, 0]);
    }

    #[test]
    fn negative_faces_wind_the_other_way() {
        let (catalog, mat) = catalog();
        let mut mb = MeshBuild::default();
        let batch = one_record(mat, 1, pack(1, 1, 1, 1));
        emit_batch(&mut mb, &batch, &catalog, false, [0.0; 3], &MesherOpts::default());
        assert_eq!(&mb.idx, &[0, 2, 1, 0, 3, 2]);
        assert_eq!(&mb.norm[0..3], &[-1.0, 0.0, 0.0]);
        // u mirrored relative to the positive face.
        assert_eq!(&mb.uv[0..4], &[2.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn reverse_ao_is_brighter_than_flat() {
        let (catalog, mat) = catalog();
        let opts = MesherOpts::default();
        let mut flat = MeshBuild::default();
        emit_batch(
            &mut flat,
            &one_record(mat, 0, pack(1, 1, 1, 1)),
            &catalog,
            false,
            [0.0; 3],
            &opts,
        );
        let mut rev = MeshBuild::default();
        emit_batch(
            &mut rev,
            &one_record(mat, 0, pack(0, 0, 0, 0)),
            &catalog,
            false,
            [0.0; 3],
            &opts,
        );
        assert!(rev.col[0] > flat.col[0]);
    }

    #[test]
    fn no_ao_path_writes_plain_material_color() {
        let (catalog, mat) = catalog();
        let opts = MesherOpts {
            ao: false,
            ..MesherOpts::default()
        };
        let mut mb = MeshBuild::default();
        emit_batch(&mut mb, &one_record(mat, 0, 0), &catalog, false, [0.0; 3], &opts);
        assert_eq!(&mb.col[0..4], &[0.2, 0.8, 0.4, 1.0]);
    }

    #[test]
    fn atlas_layer_replicates_per_vertex() {
        let mut catalog = MaterialCatalog::new();
        let mat = catalog.add(
            "tiles_7",
            MaterialSpec {
                texture: Some("tex/atlas.png".to_string()),
                atlas_layer: Some(7),
                ..MaterialSpec::default()
            },
        );
        let mut mb = MeshBuild::with_atlas();
        emit_batch(
            &mut mb,
            &one_record(mat, 0, 0),
            &catalog,
            true,
            [0.0; 3],
            &MesherOpts {
                ao: false,
                ..MesherOpts::default()
            },
        );
        assert_eq!(mb.atlas.as_deref(), Some(&[7.0f32, 7.0, 7.0, 7.0][..]));
        // Textured quads take white vertex color; the texture supplies color.
        assert_eq!(&mb.col[0..4], &[1.0, 1.0, 1.0, 1.0]);
    }
}
