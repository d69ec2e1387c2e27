use foundation::bounds::Aabb3;
use foundation::math::Vec3;

/// Index range of one source polygon inside a merged mesh.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawGroup {
    pub start: u32,
    pub count: u32,
}

/// Indexed triangle mesh as uploaded to the GPU.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub groups: Vec<DrawGroup>,
}

impl MeshGeometry {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(self.positions.iter().map(|p| Vec3::from_f32(*p)))
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = self.positions.get(tri[0] as usize)?;
            let b = self.positions.get(tri[1] as usize)?;
            let c = self.positions.get(tri[2] as usize)?;
            Some([Vec3::from_f32(*a), Vec3::from_f32(*b), Vec3::from_f32(*c)])
        })
    }

    /// Area covered by triangles lying entirely in the plane `z = elevation`.
    ///
    /// For an extruded volume this is the area of one cap, i.e. the footprint.
    pub fn area_at_elevation(&self, elevation: f64, eps: f64) -> f64 {
        self.triangles()
            .filter(|t| t.iter().all(|v| (v.z - elevation).abs() <= eps))
            .map(|[a, b, c]| (b - a).cross(c - a).length() * 0.5)
            .sum()
    }

    /// Appends `other`, recording it as a new draw group.
    pub fn merge(&mut self, other: MeshGeometry) {
        if other.is_empty() {
            return;
        }
        let base = self.positions.len() as u32;
        let start = self.indices.len() as u32;
        self.positions.extend(other.positions);
        self.normals.extend(other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
        self.groups.push(DrawGroup {
            start,
            count: other.indices.len() as u32,
        });
    }
}

/// Polyline as uploaded to the GPU. Closed outlines repeat the first point.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LineGeometry {
    pub points: Vec<[f32; 3]>,
}

impl LineGeometry {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawGroup, MeshGeometry};

    fn unit_quad(z: f32) -> MeshGeometry {
        MeshGeometry {
            positions: vec![[0.0, 0.0, z], [1.0, 0.0, z], [1.0, 1.0, z], [0.0, 1.0, z]],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
            groups: Vec::new(),
        }
    }

    #[test]
    fn merge_offsets_indices_and_records_groups() {
        let mut merged = MeshGeometry::default();
        merged.merge(unit_quad(0.0));
        merged.merge(unit_quad(1.0));
        assert_eq!(merged.positions.len(), 8);
        assert_eq!(&merged.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(
            merged.groups,
            vec![DrawGroup { start: 0, count: 6 }, DrawGroup { start: 6, count: 6 }]
        );
    }

    #[test]
    fn area_at_elevation_picks_one_plane() {
        let mut merged = MeshGeometry::default();
        merged.merge(unit_quad(0.0));
        merged.merge(unit_quad(1.0));
        assert!((merged.area_at_elevation(1.0, 1e-6) - 1.0).abs() < 1e-9);
        assert_eq!(merged.area_at_elevation(0.5, 1e-6), 0.0);
    }
}
