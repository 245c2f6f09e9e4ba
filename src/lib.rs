pub mod meshing;
pub mod perf;
pub mod util;
/// Greedy voxel-face mesher - converts dense voxel volumes into
/// minimal-quad triangle meshes ready for GPU upload
pub mod voxel;

pub use meshing::{FaceDir, GreedyMesher, LayerMask, LayerView, Vertex};
pub use perf::{CounterSnapshot, FunctionCounters, FUNCTION_COUNTERS};
pub use util::GrowList;
pub use voxel::{Region, Volume, Voxel};
