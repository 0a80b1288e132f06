//! Grouping of face materials into renderable terrain materials.
//!
//! Two different voxel types sharing one visual material may merge into a
//! single mesh, so merged geometry is keyed by a coarser terrain-material id
//! rather than the face material itself. Textures, atlases, animated flows,
//! and custom render materials each force their own grouping key.

use std::collections::HashMap;

use super::material::MaterialCatalog;
use super::types::MaterialId;

/// Grouping key under which merged geometry is batched into one render mesh.
/// Stable for the lifetime of the registry.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TerrainMatId(pub u32);

/// The shared bucket for plain opaque, untextured, non-animated materials.
pub const TERRAIN_DEFAULT: TerrainMatId = TerrainMatId(0);

/// How a material renders, resolved once at registration time so the meshing
/// hot path never consults the catalog's option fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderClass {
    /// Opaque flat color: shares the single default terrain material.
    Default,
    /// Flat color with partial alpha, bucketed by rounded percentage.
    FlatAlpha { pct: u8 },
    /// Textured, grouped by interned texture URL (first seen wins).
    Textured { url: u32 },
    /// Animated flow: every animated material gets its own group, since each
    /// needs independent per-instance animation uniforms.
    Animated { instance: u32 },
    /// Host-supplied render material, grouped by handle identity.
    Custom { handle: u32 },
}

/// One renderable group: the handle surface the renderer consumes.
#[derive(Clone, Debug)]
pub struct TerrainMaterial {
    pub id: TerrainMatId,
    pub class: RenderClass,
    /// First face material seen for this group.
    pub exemplar: MaterialId,
    /// Whether per-vertex atlas layer indices accompany this group's geometry.
    pub uses_atlas: bool,
}

#[derive(Default, Clone, Debug)]
pub struct TerrainMaterials {
    /// Render class per material id.
    class_of: Vec<RenderClass>,
    /// Memoized terrain id per material id.
    terrain_of: Vec<TerrainMatId>,
    /// Group descriptors, indexed by terrain id.
    groups: Vec<TerrainMaterial>,
    /// Interned texture URLs referenced by `RenderClass::Textured`.
    texture_urls: Vec<String>,
}

impl TerrainMaterials {
    /// Classifies every catalog material and assigns terrain ids in material
    /// id order, first seen wins.
    pub fn build(catalog: &MaterialCatalog) -> Self {
        let mut out = TerrainMaterials::default();
        out.groups.push(TerrainMaterial {
            id: TERRAIN_DEFAULT,
            class: RenderClass::Default,
            exemplar: MaterialId::NONE,
            uses_atlas: false,
        });

        let mut by_url: HashMap<String, u32> = HashMap::new();
        let mut by_alpha_pct: HashMap<u8, TerrainMatId> = HashMap::new();
        let mut by_custom: HashMap<u32, TerrainMatId> = HashMap::new();
        let mut by_texture: HashMap<u32, TerrainMatId> = HashMap::new();
        let mut animated_instances = 0u32;

        for def in &catalog.materials {
            let class = if let Some(handle) = def.custom {
                RenderClass::Custom { handle }
            } else if def.is_animated() {
                let instance = animated_instances;
                animated_instances += 1;
                RenderClass::Animated { instance }
            } else if let Some(tex) = &def.texture {
                let next = out.texture_urls.len() as u32;
                let url = *by_url.entry(tex.clone()).or_insert(next);
                if url == next {
                    out.texture_urls.push(tex.clone());
                }
                RenderClass::Textured { url }
            } else if def.alpha > 0.0 && def.alpha < 1.0 {
                // Quantize so near-equal alphas don't explode into groups.
                RenderClass::FlatAlpha {
                    pct: (def.alpha * 100.0).round() as u8,
                }
            } else {
                RenderClass::Default
            };

            let tid = match &class {
                RenderClass::Default => TERRAIN_DEFAULT,
                RenderClass::FlatAlpha { pct } => match by_alpha_pct.get(pct) {
                    Some(&tid) => tid,
                    None => {
                        let tid = out.new_group(&class, def.id, false);
                        by_alpha_pct.insert(*pct, tid);
                        tid
                    }
                },
                RenderClass::Textured { url } => match by_texture.get(url) {
                    Some(&tid) => {
                        debug_assert_eq!(
                            out.groups[tid.0 as usize].uses_atlas,
                            def.atlas_layer.is_some(),
                            "materials sharing a texture must agree on atlas use"
                        );
                        tid
                    }
                    None => {
                        let tid = out.new_group(&class, def.id, def.atlas_layer.is_some());
                        by_texture.insert(*url, tid);
                        tid
                    }
                },
                RenderClass::Animated { .. } => out.new_group(&class, def.id, false),
                RenderClass::Custom { handle } => match by_custom.get(handle) {
                    Some(&tid) => tid,
                    None => {
                        let tid = out.new_group(&class, def.id, false);
                        by_custom.insert(*handle, tid);
                        tid
                    }
                },
            };
            out.class_of.push(class);
            out.terrain_of.push(tid);
        }
        out
    }

    fn new_group(&mut self, class: &RenderClass, exemplar: MaterialId, uses_atlas: bool) -> TerrainMatId {
        let tid = TerrainMatId(self.groups.len() as u32);
        self.groups.push(TerrainMaterial {
            id: tid,
            class: class.clone(),
            exemplar,
            uses_atlas,
        });
        tid
    }

    /// Number of materials covered by the compiled tables.
    pub fn material_count(&self) -> usize {
        self.terrain_of.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Terrain grouping key for a face material. An unknown id means the
    /// registry and voxel grid are out of sync and fails loudly.
    #[inline]
    pub fn terrain_id_for(&self, mat: MaterialId) -> TerrainMatId {
        match self.terrain_of.get(mat.0 as usize) {
            Some(&tid) => tid,
            None => panic!(
                "material id {} has no terrain group (registry not finalized?)",
                mat.0
            ),
        }
    }

    #[inline]
    pub fn class_of(&self, mat: MaterialId) -> &RenderClass {
        match self.class_of.get(mat.0 as usize) {
            Some(class) => class,
            None => panic!(
                "material id {} has no render class (registry not finalized?)",
                mat.0
            ),
        }
    }

    #[inline]
    pub fn group(&self, tid: TerrainMatId) -> &TerrainMaterial {
        &self.groups[tid.0 as usize]
    }

    #[inline]
    pub fn uses_atlas(&self, tid: TerrainMatId) -> bool {
        self.groups[tid.0 as usize].uses_atlas
    }

    pub fn texture_url(&self, interned: u32) -> &str {
        &self.texture_urls[interned as usize]
    }
}
