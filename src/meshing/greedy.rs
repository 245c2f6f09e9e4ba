use rayon::prelude::*;

/// Greedy face merging over all six directions of a dense volume.
/// Coplanar adjacent faces of the same voxel class are merged into
/// maximal rectangles via greedy expansion and a two-phase shrink.
use crate::count_call;
use crate::util::GrowList;
use crate::voxel::{Volume, Voxel};

use super::layer::{LayerMask, LayerView};
use super::mesh::{FaceDir, Vertex};

/// Relative deviation between the running average and the expected
/// vertex count that triggers a buffer resize on the next run.
const CAPACITY_UPDATE_THRESHOLD: f32 = 0.2;

/// Indices emitted per quad: two triangles sharing an edge.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Per-volume greedy mesher. Owns the output vertex/index buffers and a
/// small statistical model of recent mesh sizes used to pre-size them
/// between runs: voxel topology across successive runs of the same
/// world tends to produce similar face counts, so the buffers are
/// resized only when the running average drifts past a 20% hysteresis
/// band around the current expectation.
pub struct GreedyMesher {
    vertices: GrowList<Vertex>,
    indices: GrowList<u32>,

    vertices_generated: u64,
    runs: u32,
    average_vertex_count: u32,
    expected_vertex_count: u32,
    resize_pending: bool,

    mask: LayerMask,
}

impl GreedyMesher {
    pub fn new() -> Self {
        Self {
            vertices: GrowList::new(8),
            indices: GrowList::new(8),
            vertices_generated: 0,
            runs: 0,
            average_vertex_count: 0,
            expected_vertex_count: 0,
            resize_pending: false,
            mask: LayerMask::new(),
        }
    }

    /// Mesh all externally visible faces of `volume` into the internal
    /// vertex/index buffers, replacing any previous contents.
    ///
    /// `texture_table` maps voxel id to texture id; it must cover the
    /// full id range used by the volume (id 0 is never looked up).
    /// Vertex positions are `(local + volume.origin()) * cube_size`.
    pub fn generate<V: Voxel, const W: usize, const H: usize, const D: usize>(
        &mut self,
        volume: &Volume<V, W, H, D>,
        texture_table: &[f32],
        cube_size: f32,
    ) {
        count_call!(crate::perf::FUNCTION_COUNTERS.generate_calls);
        self.begin_run();

        for dir in FaceDir::ALL {
            Self::mesh_direction(
                volume,
                dir,
                texture_table,
                cube_size,
                &mut self.mask,
                &mut self.vertices,
                &mut self.indices,
            );
        }

        self.finish_run();
    }

    /// Like [`generate`](Self::generate), meshing the six directions in
    /// parallel. Each direction writes its own buffer pair; the partial
    /// index buffers are rebased against the global vertex cursor before
    /// concatenation, so the output is identical to the sequential path.
    pub fn generate_parallel<V, const W: usize, const H: usize, const D: usize>(
        &mut self,
        volume: &Volume<V, W, H, D>,
        texture_table: &[f32],
        cube_size: f32,
    ) where
        V: Voxel + Sync,
    {
        count_call!(crate::perf::FUNCTION_COUNTERS.generate_calls);
        self.begin_run();

        let partials: Vec<(GrowList<Vertex>, GrowList<u32>)> = FaceDir::ALL
            .into_par_iter()
            .map(|dir| {
                let mut mask = LayerMask::new();
                let mut vertices = GrowList::new(64);
                let mut indices = GrowList::new(96);
                Self::mesh_direction(
                    volume,
                    dir,
                    texture_table,
                    cube_size,
                    &mut mask,
                    &mut vertices,
                    &mut indices,
                );
                (vertices, indices)
            })
            .collect();

        for (vertices, indices) in &partials {
            let base = self.vertices.cursor() as u32;

            self.vertices.reserve(self.vertices.cursor() + vertices.cursor());
            for &vertex in vertices.as_slice() {
                *self.vertices.push() = vertex;
            }

            self.indices.reserve(self.indices.cursor() + indices.cursor());
            for &index in indices.as_slice() {
                *self.indices.push() = base + index;
            }
        }

        self.finish_run();
    }

    /// Vertices written by the last run.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.as_slice()
    }

    /// Indices written by the last run.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        self.indices.as_slice()
    }

    #[inline]
    pub fn runs(&self) -> u32 {
        self.runs
    }

    #[inline]
    pub fn average_vertex_count(&self) -> u32 {
        self.average_vertex_count
    }

    #[inline]
    pub fn expected_vertex_count(&self) -> u32 {
        self.expected_vertex_count
    }

    /// Whether the next run will resize the buffers to the expectation.
    #[inline]
    pub fn resize_pending(&self) -> bool {
        self.resize_pending
    }

    fn begin_run(&mut self) {
        self.vertices.reset_cursor();
        self.indices.reset_cursor();

        // Apply the prediction from previous runs once, up front, so the
        // sweep itself rarely needs to grow the buffers.
        if self.resize_pending {
            self.vertices.resize(self.expected_vertex_count as usize * 4);
            self.indices.resize(self.expected_vertex_count as usize * 6);
            self.resize_pending = false;
        }
    }

    fn finish_run(&mut self) {
        self.runs += 1;
        self.vertices_generated += self.vertices.cursor() as u64;
        self.update_expected_vertex_count();
    }

    /// Two-sided hysteresis around the expectation: the expectation
    /// follows the average only once the relative deviation
    /// `|average - expected| / expected` exceeds the threshold,
    /// preventing resize thrash between similar runs. A zero
    /// expectation updates on any non-empty run.
    fn update_expected_vertex_count(&mut self) {
        self.average_vertex_count = (self.vertices_generated / self.runs as u64) as u32;

        let average = self.average_vertex_count as f32;
        let expected = self.expected_vertex_count as f32;

        let update = average < expected * (1.0 - CAPACITY_UPDATE_THRESHOLD)
            || average > expected * (1.0 + CAPACITY_UPDATE_THRESHOLD);

        if update {
            self.expected_vertex_count = self.average_vertex_count;
            self.resize_pending = true;
        }
    }

    /// Sweep every slice perpendicular to one face direction. The
    /// direction's sign picks the hiding neighbor (`a + 1` for positive
    /// directions, `a - 1` for negative) and whether the emitted face
    /// sits on the high or low boundary of the slice.
    fn mesh_direction<V: Voxel, const W: usize, const H: usize, const D: usize>(
        volume: &Volume<V, W, H, D>,
        dir: FaceDir,
        texture_table: &[f32],
        cube_size: f32,
        mask: &mut LayerMask,
        vertices: &mut GrowList<Vertex>,
        indices: &mut GrowList<u32>,
    ) {
        count_call!(crate::perf::FUNCTION_COUNTERS.direction_sweeps);

        let axis = dir.axis();
        let step = dir.step();
        let view = LayerView::new(axis, W, H, D);
        let lx_extent = view.lx_extent();
        let ly_extent = view.ly_extent();

        let normal = dir.normal();
        let origin = volume.origin().as_vec3();

        for a in 0..view.slice_extent() {
            let layer_empty = match axis {
                0 => volume.is_layer_x_empty(a),
                1 => volume.is_layer_y_empty(a),
                _ => volume.is_layer_z_empty(a),
            };
            if layer_empty {
                count_call!(crate::perf::FUNCTION_COUNTERS.slices_skipped);
                continue;
            }
            count_call!(crate::perf::FUNCTION_COUNTERS.slices_meshed);

            // Mark empty cells and cells whose outward neighbor is
            // solid; only the remaining cells can seed or join a quad.
            mask.reset(view.mask_len());
            for ly in 0..ly_extent {
                for lx in 0..lx_extent {
                    let (x, y, z) = view.to_volume(lx, ly, a);
                    if volume.get(x, y, z).is_empty() {
                        mask.set(view.mask_index(lx, ly));
                        continue;
                    }

                    let (x, y, z) = (x as i32, y as i32, z as i32);
                    let neighbor = match axis {
                        0 => volume.get_checked(x + step, y, z),
                        1 => volume.get_checked(x, y + step, z),
                        _ => volume.get_checked(x, y, z + step),
                    };
                    if !neighbor.is_empty() {
                        mask.set(view.mask_index(lx, ly));
                    }
                }
            }

            // The emitted face plane: high boundary of the slice for
            // positive directions, low boundary for negative ones.
            let fa = (if dir.is_positive() { a + 1 } else { a }) as f32;

            let mut ly = 0;
            while ly < ly_extent {
                let mut lx = 0;
                while lx < lx_extent {
                    if mask.get(view.mask_index(lx, ly)) {
                        lx += 1;
                        continue;
                    }

                    let (x, y, z) = view.to_volume(lx, ly, a);
                    let voxel = volume.get(x, y, z);

                    // Greedy extension along ly.
                    let mut ly_end = ly + 1;
                    while ly_end < ly_extent {
                        let (x, y, z) = view.to_volume(lx, ly_end, a);
                        if mask.get(view.mask_index(lx, ly_end)) || volume.get(x, y, z) != voxel {
                            break;
                        }
                        ly_end += 1;
                    }

                    // Greedy extension along lx.
                    let mut lx_end = lx + 1;
                    while lx_end < lx_extent {
                        let (x, y, z) = view.to_volume(lx_end, ly, a);
                        if mask.get(view.mask_index(lx_end, ly)) || volume.get(x, y, z) != voxel {
                            break;
                        }
                        lx_end += 1;
                    }

                    // Shrink ly_end past interior obstructions.
                    for search_lx in lx + 1..lx_end {
                        for search_ly in ly + 1..ly_end {
                            let (x, y, z) = view.to_volume(search_lx, search_ly, a);
                            if mask.get(view.mask_index(search_lx, search_ly))
                                || volume.get(x, y, z) != voxel
                            {
                                ly_end = search_ly;
                                break;
                            }
                        }
                    }

                    // Then shrink lx_end. Order matters: ly first, lx
                    // second is observable when both axes are obstructed.
                    for search_ly in ly + 1..ly_end {
                        for search_lx in lx + 1..lx_end {
                            let (x, y, z) = view.to_volume(search_lx, search_ly, a);
                            if mask.get(view.mask_index(search_lx, search_ly))
                                || volume.get(x, y, z) != voxel
                            {
                                lx_end = search_lx;
                                break;
                            }
                        }
                    }

                    count_call!(crate::perf::FUNCTION_COUNTERS.quads_emitted);

                    debug_assert!(
                        voxel.index() < texture_table.len(),
                        "texture_table too small for voxel id"
                    );
                    let texture_id = texture_table[voxel.index()];

                    vertices.reserve(vertices.cursor() + 4);
                    let vertex_0 = vertices.cursor() as u32;
                    let corners = dir.quad_corners(
                        lx as f32,
                        ly as f32,
                        lx_end as f32,
                        ly_end as f32,
                        fa,
                    );
                    for corner in corners {
                        *vertices.push() =
                            Vertex::new((corner + origin) * cube_size, normal, texture_id);
                    }

                    let quads = vertices.cursor() / 4;
                    indices.reserve(quads * 6);
                    for offset in QUAD_INDICES {
                        *indices.push() = vertex_0 + offset;
                    }

                    // Mark the rectangle consumed.
                    let width = lx_end - lx;
                    for mark_ly in ly..ly_end {
                        mask.mark_span(view.mask_index(lx, mark_ly), width);
                    }

                    // A full-width rectangle consumes every remaining
                    // cell of its rows; jump straight past them.
                    if lx == 0 && lx_end == lx_extent {
                        ly = ly_end - 1;
                        break;
                    }
                    lx = lx_end;
                }
                ly += 1;
            }
        }
    }
}

impl Default for GreedyMesher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    type TinyVolume = Volume<u16, 2, 2, 2>;

    #[test]
    fn test_empty_volume_produces_nothing() {
        let volume = TinyVolume::new(IVec3::ZERO);
        let mut mesher = GreedyMesher::new();
        mesher.generate(&volume, &[0.0], 1.0);

        assert!(mesher.vertices().is_empty());
        assert!(mesher.indices().is_empty());
    }

    #[test]
    fn test_single_voxel_counts() {
        let mut volume = TinyVolume::new(IVec3::ZERO);
        volume.set(0, 0, 0, 1);

        let mut mesher = GreedyMesher::new();
        mesher.generate(&volume, &[0.0, 7.0], 1.0);

        assert_eq!(mesher.vertices().len(), 24);
        assert_eq!(mesher.indices().len(), 36);
    }

    #[test]
    fn test_first_run_seeds_expectation() {
        let mut volume = TinyVolume::new(IVec3::ZERO);
        volume.set(0, 0, 0, 1);

        let mut mesher = GreedyMesher::new();
        mesher.generate(&volume, &[0.0, 7.0], 1.0);

        assert_eq!(mesher.runs(), 1);
        assert_eq!(mesher.average_vertex_count(), 24);
        assert_eq!(mesher.expected_vertex_count(), 24);
        assert!(mesher.resize_pending());
    }

    #[test]
    fn test_stable_runs_do_not_toggle_resize() {
        let mut volume = TinyVolume::new(IVec3::ZERO);
        volume.set(0, 0, 0, 1);

        let mut mesher = GreedyMesher::new();
        mesher.generate(&volume, &[0.0, 7.0], 1.0);
        mesher.generate(&volume, &[0.0, 7.0], 1.0);

        assert!(!mesher.resize_pending());
        assert_eq!(mesher.expected_vertex_count(), 24);
        // The applied prediction sized the buffers from the expectation.
        assert_eq!(mesher.vertices.capacity(), 24 * 4);
        assert_eq!(mesher.indices.capacity(), 24 * 6);
    }
}
