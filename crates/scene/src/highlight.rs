use foundation::math::Vec2;
use tracing::trace;

use crate::camera::ScreenRay;
use crate::components::Color;
use crate::graph::{GroupId, MaterialId, MeshId, SceneGraph};
use crate::picking::{PickHit, pick_group};

/// Pointer position used while no real pointer sample exists; far outside `[-1, 1]`.
pub const PARKED_POINTER: Vec2 = Vec2 { x: -10.0, y: -10.0 };

/// The hovered mesh plus what it looked like before it was highlighted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HighlightEntry {
    pub mesh: MeshId,
    pub material: MaterialId,
    pub saved_emissive: Color,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HighlightChange {
    Unchanged,
    Entered(MeshId),
    Moved { from: MeshId, to: MeshId },
    Cleared(MeshId),
}

/// At most one highlighted mesh.
#[derive(Debug, Clone, Default)]
pub struct HighlightState {
    current: Option<HighlightEntry>,
}

impl HighlightState {
    pub fn current(&self) -> Option<HighlightEntry> {
        self.current
    }

    /// Forgets the entry without touching any material.
    ///
    /// Used when the scene it points into is being replaced.
    pub fn clear(&mut self) -> Option<HighlightEntry> {
        self.current.take()
    }

    /// Moves the highlight to `hit` (or nowhere).
    ///
    /// A tracked mesh that no longer belongs to `group` is treated as already
    /// cleared: its material is not restored and the transition starts from
    /// "nothing highlighted". A `hit` outside `group` counts as no hit.
    pub fn apply(
        &mut self,
        graph: &mut SceneGraph,
        group: GroupId,
        hit: Option<MeshId>,
        color: Color,
    ) -> HighlightChange {
        if let Some(current) = self.current {
            if graph.mesh(group, current.mesh).is_none() {
                trace!(target: "scene.highlight", "dropping highlight on a mesh outside the active group");
                self.current = None;
            }
        }
        let hit = hit.filter(|mesh| graph.mesh(group, *mesh).is_some());

        match (self.current, hit) {
            (None, None) => HighlightChange::Unchanged,
            (Some(current), Some(mesh)) if current.mesh == mesh => HighlightChange::Unchanged,
            (Some(current), None) => {
                restore(graph, current);
                self.current = None;
                HighlightChange::Cleared(current.mesh)
            }
            (None, Some(mesh)) => {
                self.current = enter(graph, group, mesh, color);
                match self.current {
                    Some(_) => HighlightChange::Entered(mesh),
                    None => HighlightChange::Unchanged,
                }
            }
            (Some(current), Some(mesh)) => {
                restore(graph, current);
                self.current = enter(graph, group, mesh, color);
                match self.current {
                    Some(_) => HighlightChange::Moved {
                        from: current.mesh,
                        to: mesh,
                    },
                    None => HighlightChange::Cleared(current.mesh),
                }
            }
        }
    }
}

fn enter(graph: &mut SceneGraph, group: GroupId, mesh: MeshId, color: Color) -> Option<HighlightEntry> {
    let material = graph.mesh(group, mesh)?.material;
    let m = graph.material_mut(material)?;
    let saved_emissive = m.emissive;
    m.emissive = color;
    Some(HighlightEntry {
        mesh,
        material,
        saved_emissive,
    })
}

fn restore(graph: &mut SceneGraph, entry: HighlightEntry) {
    if let Some(m) = graph.material_mut(entry.material) {
        m.emissive = entry.saved_emissive;
    }
}

/// Per-frame hover driver: latest pointer sample in, highlight transition out.
#[derive(Debug, Clone)]
pub struct HighlightEngine {
    highlight_color: Color,
    pointer: Vec2,
    state: HighlightState,
}

impl HighlightEngine {
    pub fn new(highlight_color: Color) -> Self {
        Self {
            highlight_color,
            pointer: PARKED_POINTER,
            state: HighlightState::default(),
        }
    }

    pub fn highlight_color(&self) -> Color {
        self.highlight_color
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer = ndc;
    }

    pub fn park_pointer(&mut self) {
        self.pointer = PARKED_POINTER;
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    pub fn hovered(&self) -> Option<MeshId> {
        self.state.current().map(|e| e.mesh)
    }

    /// Ray-casts the current pointer into `group`.
    pub fn pick(&self, graph: &SceneGraph, group: GroupId, camera: &impl ScreenRay) -> Option<PickHit> {
        let ray = camera.ray_from_ndc(self.pointer)?;
        pick_group(graph, group, ray)
    }

    /// One render-frame step.
    ///
    /// With no active group (mid-teardown or before the first level) the
    /// tracked entry is dropped and nothing else happens.
    pub fn tick(
        &mut self,
        graph: &mut SceneGraph,
        group: Option<GroupId>,
        camera: &impl ScreenRay,
    ) -> HighlightChange {
        let Some(group) = group else {
            self.state.clear();
            return HighlightChange::Unchanged;
        };
        let hit = self.pick(graph, group, camera).map(|h| h.mesh);
        self.state.apply(graph, group, hit, self.highlight_color)
    }

    /// Drops the tracked entry and parks the pointer.
    pub fn reset(&mut self) {
        self.state.clear();
        self.park_pointer();
    }
}
