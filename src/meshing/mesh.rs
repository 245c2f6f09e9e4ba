/// Vertex layout and face-direction tables consumed by the mesher
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// GPU-ready vertex record.
///
/// Layout (32 bytes, little-endian 32-bit floats, `repr(C)`):
/// `position.x, position.y, position.z, normal.x, normal.y, normal.z,
/// texture_id, padding`. The explicit padding float keeps the record at
/// 32 bytes so device buffers stay aligned; no other padding exists.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,

    pub normal_x: f32,
    pub normal_y: f32,
    pub normal_z: f32,

    pub texture_id: f32,
    pub padding: f32,
}

impl Vertex {
    #[inline]
    pub fn new(position: Vec3, normal: Vec3, texture_id: f32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            normal_x: normal.x,
            normal_y: normal.y,
            normal_z: normal.z,
            texture_id,
            padding: 0.0,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        Vec3::new(self.normal_x, self.normal_y, self.normal_z)
    }
}

/// One of the six face directions swept by the mesher.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaceDir {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl FaceDir {
    pub const ALL: [FaceDir; 6] = [
        FaceDir::PosX,
        FaceDir::NegX,
        FaceDir::PosY,
        FaceDir::NegY,
        FaceDir::PosZ,
        FaceDir::NegZ,
    ];

    #[inline]
    pub const fn normal(self) -> Vec3 {
        match self {
            FaceDir::PosX => Vec3::X,
            FaceDir::NegX => Vec3::NEG_X,
            FaceDir::PosY => Vec3::Y,
            FaceDir::NegY => Vec3::NEG_Y,
            FaceDir::PosZ => Vec3::Z,
            FaceDir::NegZ => Vec3::NEG_Z,
        }
    }

    /// Sweep axis perpendicular to the face: 0 = X, 1 = Y, 2 = Z.
    #[inline]
    pub const fn axis(self) -> usize {
        match self {
            FaceDir::PosX | FaceDir::NegX => 0,
            FaceDir::PosY | FaceDir::NegY => 1,
            FaceDir::PosZ | FaceDir::NegZ => 2,
        }
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, FaceDir::PosX | FaceDir::PosY | FaceDir::PosZ)
    }

    /// Neighbor step along the sweep axis: +1 for positive directions,
    /// -1 for negative ones.
    #[inline]
    pub const fn step(self) -> i32 {
        if self.is_positive() {
            1
        } else {
            -1
        }
    }

    /// Local-space corners of a face rectangle spanning
    /// `[fx, fx_end) x [fy, fy_end)` on the face plane `fa`, in the
    /// winding order that keeps the triangle normal aligned with
    /// `self.normal()`.
    #[inline]
    pub fn quad_corners(self, fx: f32, fy: f32, fx_end: f32, fy_end: f32, fa: f32) -> [Vec3; 4] {
        match self {
            FaceDir::PosX => [
                Vec3::new(fa, fy, fx),
                Vec3::new(fa, fy_end, fx),
                Vec3::new(fa, fy_end, fx_end),
                Vec3::new(fa, fy, fx_end),
            ],
            FaceDir::NegX => [
                Vec3::new(fa, fy, fx),
                Vec3::new(fa, fy, fx_end),
                Vec3::new(fa, fy_end, fx_end),
                Vec3::new(fa, fy_end, fx),
            ],
            FaceDir::PosY => [
                Vec3::new(fx, fa, fy),
                Vec3::new(fx, fa, fy_end),
                Vec3::new(fx_end, fa, fy_end),
                Vec3::new(fx_end, fa, fy),
            ],
            FaceDir::NegY => [
                Vec3::new(fx, fa, fy),
                Vec3::new(fx_end, fa, fy),
                Vec3::new(fx_end, fa, fy_end),
                Vec3::new(fx, fa, fy_end),
            ],
            FaceDir::PosZ => [
                Vec3::new(fx, fy, fa),
                Vec3::new(fx_end, fy, fa),
                Vec3::new(fx_end, fy_end, fa),
                Vec3::new(fx, fy_end, fa),
            ],
            FaceDir::NegZ => [
                Vec3::new(fx, fy, fa),
                Vec3::new(fx, fy_end, fa),
                Vec3::new(fx_end, fy_end, fa),
                Vec3::new(fx_end, fy, fa),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(std::mem::align_of::<Vertex>(), 4);
    }

    #[test]
    fn test_vertex_byte_layout() {
        let vertex = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, 7.0);
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        let floats: &[f32] = bytemuck::cast_slice(bytes);

        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 7.0, 0.0]);
    }

    #[test]
    fn test_face_dir_axis_and_sign() {
        assert_eq!(FaceDir::PosX.axis(), 0);
        assert_eq!(FaceDir::NegY.axis(), 1);
        assert_eq!(FaceDir::PosZ.axis(), 2);

        assert!(FaceDir::PosY.is_positive());
        assert!(!FaceDir::NegZ.is_positive());
        assert_eq!(FaceDir::PosX.step(), 1);
        assert_eq!(FaceDir::NegX.step(), -1);
    }

    #[test]
    fn test_quad_winding_matches_normal() {
        // Geometric normal of the first triangle must align with the
        // face normal for every direction.
        for dir in FaceDir::ALL {
            let corners = dir.quad_corners(0.0, 0.0, 2.0, 3.0, 1.0);
            let tri_normal = (corners[1] - corners[0])
                .cross(corners[2] - corners[0])
                .normalize();
            let dot = tri_normal.dot(dir.normal());
            assert!(
                dot > 0.99,
                "winding for {:?} produced normal {:?} (dot={})",
                dir,
                tri_normal,
                dot
            );
        }
    }

    #[test]
    fn test_quad_corners_lie_on_face_plane() {
        for dir in FaceDir::ALL {
            let fa = 5.0;
            let corners = dir.quad_corners(1.0, 2.0, 4.0, 6.0, fa);
            for corner in corners {
                let plane_coord = match dir.axis() {
                    0 => corner.x,
                    1 => corner.y,
                    _ => corner.z,
                };
                assert_eq!(plane_coord, fa, "corner off plane for {:?}", dir);
            }
        }
    }
}
