use foundation::arena::Arena;
use foundation::bounds::Aabb3;
use foundation::handles::Handle;
use foundation::math::Vec3;

use crate::components::{FeatureTag, LineGeometry, Material, MeshGeometry};
use crate::labels::ElementId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GroupId(Handle);

/// GPU geometry buffer of a volume mesh; also identifies the mesh itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MeshId(Handle);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LineId(Handle);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MaterialId(Handle);

#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub id: MeshId,
    pub material: MaterialId,
    pub bounds: Aabb3,
    pub tag: FeatureTag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineNode {
    pub id: LineId,
    pub material: MaterialId,
    pub tag: FeatureTag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelNode {
    pub element: ElementId,
    pub position: Vec3,
    pub region_id: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupNode {
    pub name: &'static str,
    pub meshes: Vec<MeshNode>,
    pub lines: Vec<LineNode>,
    pub labels: Vec<LabelNode>,
}

/// What releasing a group freed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleasedGroup {
    pub geometries: usize,
    pub materials: usize,
    /// Label elements that were mounted under the group; the caller owns unmounting them.
    pub label_elements: Vec<ElementId>,
}

/// Render-side scene graph plus the GPU resource tables behind it.
///
/// Group nodes hang off an implicit root; only attached groups are drawn or
/// picked. Every geometry buffer and material lives in a generational table,
/// so a released resource can never be written through a stale id.
#[derive(Debug, Default)]
pub struct SceneGraph {
    groups: Arena<GroupNode>,
    attached: Vec<GroupId>,
    mesh_buffers: Arena<MeshGeometry>,
    line_buffers: Arena<LineGeometry>,
    materials: Arena<Material>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_group(&mut self, name: &'static str) -> GroupId {
        GroupId(self.groups.insert(GroupNode {
            name,
            ..GroupNode::default()
        }))
    }

    /// Adds `group` under the scene root. Returns `false` if it is unknown or already attached.
    pub fn attach(&mut self, group: GroupId) -> bool {
        if !self.groups.contains(group.0) || self.attached.contains(&group) {
            return false;
        }
        self.attached.push(group);
        true
    }

    pub fn detach(&mut self, group: GroupId) -> bool {
        let before = self.attached.len();
        self.attached.retain(|g| *g != group);
        self.attached.len() != before
    }

    pub fn is_attached(&self, group: GroupId) -> bool {
        self.attached.contains(&group)
    }

    pub fn attached_groups(&self) -> &[GroupId] {
        &self.attached
    }

    pub fn group(&self, group: GroupId) -> Option<&GroupNode> {
        self.groups.get(group.0)
    }

    /// Uploads a volume mesh into `group`.
    ///
    /// Returns `None` for an unknown group or an empty geometry.
    pub fn add_mesh(
        &mut self,
        group: GroupId,
        geometry: MeshGeometry,
        material: Material,
        tag: FeatureTag,
    ) -> Option<MeshId> {
        if !self.groups.contains(group.0) || geometry.is_empty() {
            return None;
        }
        let bounds = geometry.bounds()?;
        let id = MeshId(self.mesh_buffers.insert(geometry));
        let material = MaterialId(self.materials.insert(material));
        self.groups.get_mut(group.0)?.meshes.push(MeshNode {
            id,
            material,
            bounds,
            tag,
        });
        Some(id)
    }

    pub fn add_line(
        &mut self,
        group: GroupId,
        geometry: LineGeometry,
        material: Material,
        tag: FeatureTag,
    ) -> Option<LineId> {
        if !self.groups.contains(group.0) || geometry.len() < 2 {
            return None;
        }
        let id = LineId(self.line_buffers.insert(geometry));
        let material = MaterialId(self.materials.insert(material));
        self.groups.get_mut(group.0)?.lines.push(LineNode { id, material, tag });
        Some(id)
    }

    pub fn add_label(
        &mut self,
        group: GroupId,
        element: ElementId,
        position: Vec3,
        region_id: impl Into<String>,
    ) -> bool {
        let Some(node) = self.groups.get_mut(group.0) else {
            return false;
        };
        node.labels.push(LabelNode {
            element,
            position,
            region_id: region_id.into(),
        });
        true
    }

    /// The mesh node `mesh`, only if it currently belongs to `group`.
    pub fn mesh(&self, group: GroupId, mesh: MeshId) -> Option<&MeshNode> {
        self.group(group)?.meshes.iter().find(|m| m.id == mesh)
    }

    pub fn mesh_geometry(&self, mesh: MeshId) -> Option<&MeshGeometry> {
        self.mesh_buffers.get(mesh.0)
    }

    pub fn line_geometry(&self, line: LineId) -> Option<&LineGeometry> {
        self.line_buffers.get(line.0)
    }

    pub fn material(&self, material: MaterialId) -> Option<&Material> {
        self.materials.get(material.0)
    }

    pub fn material_mut(&mut self, material: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(material.0)
    }

    /// Detaches `group`, frees every buffer and material it owns and drops the node.
    ///
    /// Returns `None` if the group was already released.
    pub fn release_group(&mut self, group: GroupId) -> Option<ReleasedGroup> {
        self.detach(group);
        let node = self.groups.remove(group.0)?;

        let mut out = ReleasedGroup::default();
        for mesh in node.meshes {
            out.geometries += usize::from(self.mesh_buffers.remove(mesh.id.0).is_some());
            out.materials += usize::from(self.materials.remove(mesh.material.0).is_some());
        }
        for line in node.lines {
            out.geometries += usize::from(self.line_buffers.remove(line.id.0).is_some());
            out.materials += usize::from(self.materials.remove(line.material.0).is_some());
        }
        out.label_elements = node.labels.into_iter().map(|l| l.element).collect();
        Some(out)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Live mesh and line buffers.
    pub fn live_geometries(&self) -> usize {
        self.mesh_buffers.len() + self.line_buffers.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }
}

#[cfg(test)]
mod tests {
    use super::SceneGraph;
    use crate::components::{Color, FeatureTag, LineGeometry, Material, MeshGeometry};
    use crate::labels::ElementId;
    use foundation::math::Vec3;

    fn tag(id: &str) -> FeatureTag {
        FeatureTag {
            id: id.into(),
            name: id.into(),
            child_count: 0,
            child_dataset: None,
        }
    }

    fn triangle() -> MeshGeometry {
        MeshGeometry {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
            groups: Vec::new(),
        }
    }

    #[test]
    fn attach_detach_membership() {
        let mut g = SceneGraph::new();
        let a = g.create_group("volumes");
        assert!(g.attach(a));
        assert!(!g.attach(a));
        assert_eq!(g.attached_groups(), &[a]);
        assert!(g.detach(a));
        assert!(!g.detach(a));
        assert!(!g.is_attached(a));
    }

    #[test]
    fn release_frees_everything_once() {
        let mut g = SceneGraph::new();
        let group = g.create_group("volumes");
        g.attach(group);
        let mesh = g
            .add_mesh(group, triangle(), Material::new(Color(0x2a3556)), tag("a"))
            .expect("mesh");
        g.add_line(
            group,
            LineGeometry {
                points: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            },
            Material::new(Color(0x438cef)),
            tag("a"),
        )
        .expect("line");
        assert!(g.add_label(group, ElementId(9), Vec3::ZERO, "a"));
        assert_eq!(g.live_geometries(), 2);
        assert_eq!(g.live_materials(), 2);
        assert!(g.mesh(group, mesh).is_some());

        let released = g.release_group(group).expect("released");
        assert_eq!(released.geometries, 2);
        assert_eq!(released.materials, 2);
        assert_eq!(released.label_elements, vec![ElementId(9)]);
        assert_eq!(g.live_geometries(), 0);
        assert_eq!(g.live_materials(), 0);
        assert!(!g.is_attached(group));
        assert!(g.mesh(group, mesh).is_none());
        assert!(g.mesh_geometry(mesh).is_none());

        assert!(g.release_group(group).is_none());
    }

    #[test]
    fn empty_geometry_is_not_uploaded() {
        let mut g = SceneGraph::new();
        let group = g.create_group("volumes");
        let none = g.add_mesh(group, MeshGeometry::default(), Material::new(Color::BLACK), tag("x"));
        assert!(none.is_none());
        assert_eq!(g.live_geometries(), 0);
        assert_eq!(g.live_materials(), 0);
    }
}
