/// Greedy meshing of voxel volumes into vertex/index buffers
pub mod greedy;
pub mod layer;
pub mod mesh;

pub use greedy::GreedyMesher;
pub use layer::{LayerMask, LayerView};
pub use mesh::{FaceDir, Vertex};
