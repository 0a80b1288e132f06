use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{MaterialEntry, MaterialsConfig};
use super::types::MaterialId;

/// One renderable block-face material. Everything the mesher and the
/// terrain resolver need to group and color merged geometry.
#[derive(Clone, Debug)]
pub struct MaterialDef {
    pub id: MaterialId,
    pub key: String,
    /// Base vertex color. Ignored (white) when a texture is present.
    pub color: [f32; 3],
    /// 1.0 = fully opaque. Applied at the mesh material level, not per vertex.
    pub alpha: f32,
    /// Texture path or URL, if any.
    pub texture: Option<String>,
    /// Layer within a multi-layer texture atlas, if the texture is an atlas.
    pub atlas_layer: Option<u32>,
    /// Animation ("flow") speed; nonzero means the material is animated.
    pub flow: f32,
    /// Opaque handle to a host-supplied custom render material.
    pub custom: Option<u32>,
}

impl MaterialDef {
    #[inline]
    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    #[inline]
    pub fn is_animated(&self) -> bool {
        self.flow != 0.0
    }
}

/// Spec for registering a material programmatically (tests, embedding hosts).
#[derive(Clone, Debug)]
pub struct MaterialSpec {
    pub color: [f32; 3],
    pub alpha: f32,
    pub texture: Option<String>,
    pub atlas_layer: Option<u32>,
    pub flow: f32,
    pub custom: Option<u32>,
}

impl Default for MaterialSpec {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            alpha: 1.0,
            texture: None,
            atlas_layer: None,
            flow: 0.0,
            custom: None,
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct MaterialCatalog {
    pub materials: Vec<MaterialDef>,
    pub by_key: HashMap<String, MaterialId>,
}

impl MaterialCatalog {
    /// Index 0 is reserved for the "no material" sentinel.
    pub fn new() -> Self {
        let mut catalog = Self {
            materials: Vec::new(),
            by_key: HashMap::new(),
        };
        catalog.materials.push(MaterialDef {
            id: MaterialId::NONE,
            key: String::new(),
            color: [0.0, 0.0, 0.0],
            alpha: 1.0,
            texture: None,
            atlas_layer: None,
            flow: 0.0,
            custom: None,
        });
        catalog
    }

    pub fn add(&mut self, key: &str, spec: MaterialSpec) -> MaterialId {
        // Mask cells carry material ids with a sign bit, so ids must stay
        // within i16 range.
        assert!(
            self.materials.len() <= i16::MAX as usize,
            "material catalog overflow"
        );
        let id = MaterialId(self.materials.len() as u16);
        self.by_key.insert(key.to_string(), id);
        self.materials.push(MaterialDef {
            id,
            key: key.to_string(),
            color: spec.color,
            alpha: spec.alpha,
            texture: spec.texture,
            atlas_layer: spec.atlas_layer,
            flow: spec.flow,
            custom: spec.custom,
        });
        id
    }

    pub fn get_id(&self, key: &str) -> Option<MaterialId> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialDef> {
        self.materials.get(id.0 as usize)
    }

    /// Like `get`, but an unknown id is a registry/grid desync and fails loudly.
    #[inline]
    pub fn def(&self, id: MaterialId) -> &MaterialDef {
        match self.materials.get(id.0 as usize) {
            Some(def) => def,
            None => panic!("material id {} is not registered", id.0),
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: MaterialsConfig = toml::from_str(toml_str)?;
        let mut catalog = MaterialCatalog::new();
        let mut entries: Vec<(String, MaterialEntry)> = cfg.materials.into_iter().collect();
        // HashMap iteration order is nondeterministic; sort keys so MaterialId assignment is stable.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, entry) in entries {
            let spec = match entry {
                MaterialEntry::Color(rgb) => MaterialSpec {
                    color: rgb,
                    ..MaterialSpec::default()
                },
                MaterialEntry::Detail {
                    color,
                    alpha,
                    texture,
                    atlas_layer,
                    flow,
                    custom,
                } => MaterialSpec {
                    color: color.unwrap_or([1.0, 1.0, 1.0]),
                    alpha: alpha.unwrap_or(1.0),
                    texture,
                    atlas_layer,
                    flow: flow.unwrap_or(0.0),
                    custom,
                },
            };
            catalog.add(&key, spec);
        }
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
