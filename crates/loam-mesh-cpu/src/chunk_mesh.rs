use hashbrown::HashMap;
use loam_blocks::terrain::TerrainMatId;
use loam_chunk::ChunkCoord;
use loam_geom::Aabb;

use crate::mesh_build::MeshBuild;

/// Finished mesh for one chunk: one buffer set per terrain material. The
/// renderer resolves each part's material through
/// `TerrainMaterials::group`.
pub struct ChunkMeshCpu {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub parts: HashMap<TerrainMatId, MeshBuild>,
}

impl ChunkMeshCpu {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.parts.values().map(|mb| mb.quad_count()).sum()
    }
}
