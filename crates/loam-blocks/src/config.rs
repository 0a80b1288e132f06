//! Serde config surface for materials.toml / blocks.toml.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Deserialize)]
pub struct MaterialsConfig {
    pub materials: HashMap<String, MaterialEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum MaterialEntry {
    // Simple: material = [r, g, b]
    Color([f32; 3]),
    // Detailed: material = { color = [..], alpha = 0.5, texture = "...", ... }
    Detail {
        color: Option<[f32; 3]>,
        alpha: Option<f32>,
        texture: Option<String>,
        atlas_layer: Option<u32>,
        flow: Option<f32>,
        custom: Option<u32>,
    },
}

#[derive(Deserialize)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub id: Option<u16>,
    pub solid: Option<bool>,
    pub opaque: Option<bool>,
    pub materials: Option<MaterialsDef>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum MaterialsDef {
    // materials = "stone"
    Single(String),
    // materials = { top = "grass_top", bottom = "dirt", side = "grass_side" }
    PerFace {
        all: Option<String>,
        top: Option<String>,
        bottom: Option<String>,
        side: Option<String>,
    },
}
