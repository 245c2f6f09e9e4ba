/// Dense voxel volume with compile-time dimensions and per-axis
/// occupancy counters for O(1) layer emptiness queries
use glam::IVec3;

use super::{Region, Voxel};

/// Dense `W x H x D` voxel store. Cells are laid out with Y as the slow
/// axis, then Z, with X contiguous: `index = y * (W * D) + z * W + x`.
/// The mesher's inner loops walk X fastest within a horizontal slab,
/// matching this row-major substructure.
///
/// Every mutating write keeps three occupancy counters up to date, one
/// per axis-perpendicular slab, so the mesher can skip uniformly empty
/// slices without touching cell data.
pub struct Volume<V: Voxel, const W: usize, const H: usize, const D: usize> {
    data: Box<[V]>,

    origin: IVec3,

    layer_x_count: Box<[u32]>,
    layer_y_count: Box<[u32]>,
    layer_z_count: Box<[u32]>,
}

impl<V: Voxel, const W: usize, const H: usize, const D: usize> Volume<V, W, H, D> {
    pub const WIDTH: usize = W;
    pub const HEIGHT: usize = H;
    pub const DEPTH: usize = D;
    pub const LAYER_SIZE: usize = W * D;
    pub const VOLUME_SIZE: usize = W * D * H;

    /// Create a volume with all cells empty and the given world origin
    /// (in voxel units). Dimensions are fixed for the lifetime of the
    /// instance.
    pub fn new(origin: IVec3) -> Self {
        Self {
            data: vec![V::EMPTY; Self::VOLUME_SIZE].into_boxed_slice(),
            origin,
            layer_x_count: vec![0; W].into_boxed_slice(),
            layer_y_count: vec![0; H].into_boxed_slice(),
            layer_z_count: vec![0; D].into_boxed_slice(),
        }
    }

    /// Convert local coordinates to a linear index
    #[inline]
    pub const fn voxel_index(x: usize, y: usize, z: usize) -> usize {
        y * Self::LAYER_SIZE + z * W + x
    }

    /// Get the cell at local coordinates. Out-of-bounds coordinates are
    /// a programmer error.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> V {
        debug_assert!(x < W && y < H && z < D);
        self.data[Self::voxel_index(x, y, z)]
    }

    /// Get the cell at signed coordinates, treating anything outside the
    /// volume as empty. Used by the mesher's neighbor probes at slab
    /// boundaries.
    #[inline]
    pub fn get_checked(&self, x: i32, y: i32, z: i32) -> V {
        if x < 0 || x >= W as i32 || y < 0 || y >= H as i32 || z < 0 || z >= D as i32 {
            return V::EMPTY;
        }
        self.data[Self::voxel_index(x as usize, y as usize, z as usize)]
    }

    /// Write the cell at local coordinates and incrementally maintain
    /// the per-axis occupancy counters. Writing the empty value over an
    /// empty cell, or a solid value over the same class, is a no-op for
    /// the counters.
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: V) {
        debug_assert!(x < W && y < H && z < D);

        let cell = &mut self.data[Self::voxel_index(x, y, z)];
        if voxel.is_empty() {
            if cell.is_empty() {
                return;
            }
            self.layer_x_count[x] -= 1;
            self.layer_y_count[y] -= 1;
            self.layer_z_count[z] -= 1;
        } else if cell.is_empty() {
            self.layer_x_count[x] += 1;
            self.layer_y_count[y] += 1;
            self.layer_z_count[z] += 1;
        }
        *cell = voxel;
    }

    /// Fill every cell of `region` with `voxel`, iterating in memory
    /// order (y outer, z middle, x inner). The region must lie inside
    /// the volume.
    pub fn fill_region(&mut self, region: &Region, voxel: V) {
        debug_assert!(region.x() >= 0 && region.y() >= 0 && region.z() >= 0);
        debug_assert!(
            region.x_end() <= W as i32 && region.y_end() <= H as i32 && region.z_end() <= D as i32
        );

        let x_end = region.x_end() as usize;
        let y_end = region.y_end() as usize;
        let z_end = region.z_end() as usize;
        for y in region.y() as usize..y_end {
            for z in region.z() as usize..z_end {
                for x in region.x() as usize..x_end {
                    self.set(x, y, z, voxel);
                }
            }
        }
    }

    #[inline]
    pub fn is_layer_x_empty(&self, x: usize) -> bool {
        self.layer_x_count[x] == 0
    }

    #[inline]
    pub fn is_layer_y_empty(&self, y: usize) -> bool {
        self.layer_y_count[y] == 0
    }

    #[inline]
    pub fn is_layer_z_empty(&self, z: usize) -> bool {
        self.layer_z_count[z] == 0
    }

    /// Number of X slabs containing at least one solid voxel.
    pub fn filled_layer_x_count(&self) -> usize {
        self.layer_x_count.iter().filter(|&&n| n > 0).count()
    }

    /// Number of Y slabs containing at least one solid voxel.
    pub fn filled_layer_y_count(&self) -> usize {
        self.layer_y_count.iter().filter(|&&n| n > 0).count()
    }

    /// Number of Z slabs containing at least one solid voxel.
    pub fn filled_layer_z_count(&self) -> usize {
        self.layer_z_count.iter().filter(|&&n| n > 0).count()
    }

    #[inline]
    pub fn data(&self) -> &[V] {
        &self.data
    }

    #[inline]
    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    #[inline]
    pub const fn width(&self) -> usize {
        W
    }

    #[inline]
    pub const fn height(&self) -> usize {
        H
    }

    #[inline]
    pub const fn depth(&self) -> usize {
        D
    }

    #[inline]
    pub const fn layer_size(&self) -> usize {
        Self::LAYER_SIZE
    }

    #[inline]
    pub const fn volume_size(&self) -> usize {
        Self::VOLUME_SIZE
    }
}
