//! Flat geometry buffers for one terrain material's merged quads.

/// Write-once output buffers consumed by the renderer: 4 vertices and 6
/// indices per quad. `atlas` is present only for atlas-textured groups
/// (one layer float per vertex).
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    /// RGBA per vertex.
    pub col: Vec<f32>,
    pub idx: Vec<u32>,
    pub atlas: Option<Vec<f32>>,
}

impl MeshBuild {
    pub fn with_atlas() -> Self {
        Self {
            atlas: Some(Vec::new()),
            ..Self::default()
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
        self.idx.reserve(n_quads * 6);
        if let Some(atlas) = &mut self.atlas {
            atlas.reserve(n_quads * 4);
        }
    }

    /// Clears all arrays but retains capacity for reuse.
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.col.clear();
        self.idx.clear();
        if let Some(atlas) = &mut self.atlas {
            atlas.clear();
        }
    }
}
