use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlocksConfig, MaterialsDef};
use super::material::{MaterialCatalog, MaterialSpec};
use super::terrain::TerrainMaterials;
use super::types::{AIR, BlockId, DIR_COUNT, DIR_NEG_Y, DIR_POS_Y, DIR_SIDES, MaterialId};

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub opaque: bool,
    /// Face material per direction index (+x,-x,+y,-y,+z,-z).
    pub materials: [MaterialId; DIR_COUNT],
}

impl BlockType {
    #[inline]
    pub fn material_for(&self, dir: usize) -> MaterialId {
        self.materials[dir]
    }
}

/// Spec for registering a block programmatically (tests, embedding hosts).
#[derive(Clone, Debug)]
pub struct BlockSpec {
    pub name: String,
    pub solid: bool,
    pub opaque: bool,
    pub materials: [MaterialId; DIR_COUNT],
}

impl BlockSpec {
    pub fn uniform(name: &str, solid: bool, opaque: bool, mat: MaterialId) -> Self {
        Self {
            name: name.to_string(),
            solid,
            opaque,
            materials: [mat; DIR_COUNT],
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub materials: MaterialCatalog,
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
    pub terrain: TerrainMaterials,
}

impl BlockRegistry {
    /// Empty registry with the implicit air block at id 0.
    pub fn new() -> Self {
        let mut reg = Self {
            materials: MaterialCatalog::new(),
            blocks: Vec::new(),
            by_name: HashMap::new(),
            terrain: TerrainMaterials::default(),
        };
        reg.blocks.push(BlockType {
            id: AIR,
            name: "air".to_string(),
            solid: false,
            opaque: false,
            materials: [MaterialId::NONE; DIR_COUNT],
        });
        reg.by_name.insert("air".to_string(), AIR);
        reg
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    /// Like `get`, but an unknown id means the voxel grid and registry are
    /// out of sync, which fails loudly instead of defaulting.
    #[inline]
    pub fn block(&self, id: BlockId) -> &BlockType {
        match self.blocks.get(id as usize) {
            Some(ty) => ty,
            None => panic!("block id {id} is not registered"),
        }
    }

    #[inline]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.block(id).solid
    }

    #[inline]
    pub fn is_opaque(&self, id: BlockId) -> bool {
        self.block(id).opaque
    }

    #[inline]
    pub fn face_material(&self, id: BlockId, dir: usize) -> MaterialId {
        self.block(id).materials[dir]
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn add_material(&mut self, key: &str, spec: MaterialSpec) -> MaterialId {
        self.materials.add(key, spec)
    }

    pub fn add_block(&mut self, spec: BlockSpec) -> BlockId {
        assert!(self.blocks.len() <= u16::MAX as usize, "block table overflow");
        let id = self.blocks.len() as BlockId;
        self.by_name.insert(spec.name.clone(), id);
        self.blocks.push(BlockType {
            id,
            name: spec.name,
            solid: spec.solid,
            opaque: spec.opaque,
            materials: spec.materials,
        });
        id
    }

    /// Compiles the terrain-material tables. Must be called after the last
    /// material is registered and before meshing; `from_configs` does this
    /// itself.
    pub fn finalize(&mut self) {
        self.terrain = TerrainMaterials::build(&self.materials);
    }

    pub fn load_from_paths(
        materials_path: impl AsRef<Path>,
        blocks_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let materials = MaterialCatalog::from_path(materials_path)?;
        let blocks_toml = fs::read_to_string(blocks_path)?;
        let blocks_cfg: BlocksConfig = toml::from_str(&blocks_toml)?;
        Self::from_configs(materials, blocks_cfg)
    }

    pub fn from_configs(
        materials: MaterialCatalog,
        cfg: BlocksConfig,
    ) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        reg.materials = materials;
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if (id as usize) < reg.blocks.len() {
                // Only the implicit air slot may be redeclared.
                if id != AIR {
                    return Err(format!("duplicate block id {id} ({})", def.name).into());
                }
                continue;
            }
            if id as usize != reg.blocks.len() {
                return Err(format!("non-contiguous block id {id} ({})", def.name).into());
            }
            let solid = def.solid.unwrap_or(true);
            let opaque = def.opaque.unwrap_or(solid);
            let faces = compile_materials(&reg.materials, def.materials.as_ref(), &def.name)?;
            reg.by_name.insert(def.name.clone(), id);
            reg.blocks.push(BlockType {
                id,
                name: def.name,
                solid,
                opaque,
                materials: faces,
            });
        }
        reg.finalize();
        Ok(reg)
    }
}

fn compile_materials(
    catalog: &MaterialCatalog,
    def: Option<&MaterialsDef>,
    block_name: &str,
) -> Result<[MaterialId; DIR_COUNT], Box<dyn Error>> {
    let mut out = [MaterialId::NONE; DIR_COUNT];
    let lookup = |key: &str| -> Result<MaterialId, Box<dyn Error>> {
        catalog
            .get_id(key)
            .ok_or_else(|| format!("block {block_name}: unknown material key {key}").into())
    };
    match def {
        None => {}
        Some(MaterialsDef::Single(key)) => {
            out = [lookup(key)?; DIR_COUNT];
        }
        Some(MaterialsDef::PerFace {
            all,
            top,
            bottom,
            side,
        }) => {
            if let Some(key) = all {
                out = [lookup(key)?; DIR_COUNT];
            }
            if let Some(key) = top {
                out[DIR_POS_Y] = lookup(key)?;
            }
            if let Some(key) = bottom {
                out[DIR_NEG_Y] = lookup(key)?;
            }
            if let Some(key) = side {
                let mat = lookup(key)?;
                for dir in DIR_SIDES {
                    out[dir] = mat;
                }
            }
        }
    }
    Ok(out)
}
