use foundation::bounds::{Aabb2, Aabb3};
use foundation::math::{Vec2, Vec3};
use scene::components::MeshGeometry;

/// Camera placement hints for one level, in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraFraming {
    /// Ground-plane bounds of every volume.
    pub footprint: Aabb2,
    /// Orbit target: footprint centre on the ground.
    pub target: Vec3,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl CameraFraming {
    pub const MIN_DISTANCE_FACTOR: f64 = 0.5;
    pub const MAX_DISTANCE_FACTOR: f64 = 1.2;

    pub fn from_meshes<'a>(meshes: impl IntoIterator<Item = &'a MeshGeometry>) -> Option<Self> {
        let footprint = meshes
            .into_iter()
            .filter_map(MeshGeometry::bounds)
            .map(|b: Aabb3| b.footprint())
            .reduce(|a, b| a.union(&b))?;
        Some(Self::from_footprint(footprint))
    }

    pub fn from_footprint(footprint: Aabb2) -> Self {
        let extent = footprint.width().max(footprint.height());
        let c: Vec2 = footprint.center();
        Self {
            footprint,
            target: Vec3::new(c.x, c.y, 0.0),
            min_distance: extent * Self::MIN_DISTANCE_FACTOR,
            max_distance: extent * Self::MAX_DISTANCE_FACTOR,
        }
    }

    /// Eye position looking north at the target from `pitch_deg` above the horizon.
    ///
    /// The eye sits half a footprint height south of the southern edge.
    pub fn eye(&self, pitch_deg: f64) -> Vec3 {
        let height = self.footprint.height();
        let y = self.footprint.min[1] - height * 0.5;
        let z = (self.footprint.max[1] - y) * pitch_deg.to_radians().tan();
        Vec3::new(self.target.x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::CameraFraming;
    use foundation::bounds::Aabb2;
    use scene::components::MeshGeometry;

    fn slab(min: [f32; 2], max: [f32; 2]) -> MeshGeometry {
        MeshGeometry {
            positions: vec![[min[0], min[1], 0.0], [max[0], max[1], 1.0]],
            normals: vec![[0.0, 0.0, 1.0]; 2],
            indices: Vec::new(),
            groups: Vec::new(),
        }
    }

    #[test]
    fn framing_spans_all_meshes() {
        let a = slab([-4.0, -1.0], [0.0, 1.0]);
        let b = slab([0.0, -1.0], [4.0, 3.0]);
        let f = CameraFraming::from_meshes([&a, &b]).expect("framing");
        assert_eq!(f.footprint, Aabb2::new([-4.0, -1.0], [4.0, 3.0]));
        assert_eq!((f.target.x, f.target.y, f.target.z), (0.0, 1.0, 0.0));
        assert_eq!(f.min_distance, 4.0);
        assert!((f.max_distance - 9.6).abs() < 1e-12);
    }

    #[test]
    fn eye_sits_south_at_pitch() {
        let f = CameraFraming::from_footprint(Aabb2::new([0.0, 0.0], [2.0, 2.0]));
        let eye = f.eye(45.0);
        assert_eq!(eye.x, 1.0);
        assert_eq!(eye.y, -1.0);
        assert!((eye.z - 3.0).abs() < 1e-12);
    }

    #[test]
    fn no_meshes_no_framing() {
        assert!(CameraFraming::from_meshes(std::iter::empty()).is_none());
    }
}
