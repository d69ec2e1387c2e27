use formats::BoundaryDocument;
use foundation::math::{ProjectionContext, ProjectionError};
use layers::{BuildReport, CameraFraming, LabelAnchor, build_level, label_anchors};
use runtime::{FrameHook, FrameHooks, HookHandle, InputKind, InputListeners, ListenerHandle};
use scene::components::Material;
use scene::labels::LabelWidget;
use scene::{GroupId, MeshId, SceneGraph};
use tracing::debug;

use crate::config::MapConfig;
use crate::source::DatasetRef;

/// Per-frame work the map core asks the render harness to run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LevelHook {
    Highlight,
}

/// Everything outside the core that a level registers into.
#[derive(Debug)]
pub struct Surfaces<W> {
    pub graph: SceneGraph,
    pub hooks: FrameHooks<LevelHook>,
    pub listeners: InputListeners,
    pub labels: W,
}

impl<W> Surfaces<W> {
    pub fn new(labels: W) -> Self {
        Self {
            graph: SceneGraph::new(),
            hooks: FrameHooks::new(),
            listeners: InputListeners::new(),
            labels,
        }
    }
}

/// What one teardown released. All zeros for an already torn-down scene.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    pub groups: usize,
    pub geometries: usize,
    pub materials: usize,
    pub labels: usize,
    pub hooks: usize,
    pub listeners: usize,
}

/// Renderable resources of one navigation level; the unit of teardown.
#[derive(Debug)]
pub struct LevelScene {
    dataset: DatasetRef,
    projection: ProjectionContext,
    volume_group: GroupId,
    line_group: GroupId,
    label_group: GroupId,
    volumes: Vec<MeshId>,
    anchors: Vec<LabelAnchor>,
    framing: Option<CameraFraming>,
    report: BuildReport,
    hook: Option<HookHandle>,
    listeners: Vec<ListenerHandle>,
    torn_down: bool,
}

impl LevelScene {
    /// Projects `doc`, builds its meshes, outlines and labels, and attaches them.
    ///
    /// Fails before touching `surfaces` if the document has no usable area.
    pub fn build<W: LabelWidget>(
        dataset: DatasetRef,
        doc: &BoundaryDocument,
        config: &MapConfig,
        surfaces: &mut Surfaces<W>,
    ) -> Result<Self, ProjectionError> {
        let projection = ProjectionContext::fit(doc.polygons(), config.projection.params())?;
        let (built, report) = build_level(&doc.features, &projection, &config.extrude);
        let style = &config.style;

        let graph = &mut surfaces.graph;
        let volume_group = graph.create_group("volumes");
        let line_group = graph.create_group("lines");
        let label_group = graph.create_group("labels");

        let mut volumes = Vec::with_capacity(built.len());
        for feature in built {
            if let Some(volume) = feature.volume {
                let mut material = Material::new(style.volume_color);
                material.emissive = style.volume_emissive;
                if let Some(id) = graph.add_mesh(volume_group, volume, material, feature.tag.clone()) {
                    volumes.push(id);
                }
            }
            for line in feature.top_outlines {
                graph.add_line(line_group, line, Material::new(style.top_border_color), feature.tag.clone());
            }
            for line in feature.base_outlines {
                graph.add_line(line_group, line, Material::new(style.base_border_color), feature.tag.clone());
            }
        }

        let framing = CameraFraming::from_meshes(volumes.iter().filter_map(|id| graph.mesh_geometry(*id)));

        let anchors = label_anchors(&doc.features, &projection, config.label_elevation());
        for anchor in &anchors {
            let element = surfaces.labels.mount(&anchor.id, &anchor.name);
            graph.add_label(label_group, element, anchor.position, anchor.id.clone());
        }

        for group in [volume_group, line_group, label_group] {
            graph.attach(group);
        }

        debug!(
            target: "navigation.level",
            dataset = %dataset,
            volumes = volumes.len(),
            labels = anchors.len(),
            dropped_rings = report.dropped_rings,
            "level scene built"
        );

        Ok(Self {
            dataset,
            projection,
            volume_group,
            line_group,
            label_group,
            volumes,
            anchors,
            framing,
            report,
            hook: None,
            listeners: Vec::new(),
            torn_down: false,
        })
    }

    /// Registers the highlight hook and the pointer/click listeners for this level.
    pub fn bind<W>(&mut self, surfaces: &mut Surfaces<W>) {
        if self.torn_down || self.hook.is_some() {
            return;
        }
        self.hook = Some(surfaces.hooks.register(FrameHook::new("highlight", LevelHook::Highlight)));
        self.listeners = vec![
            surfaces.listeners.listen(InputKind::PointerMove),
            surfaces.listeners.listen(InputKind::Click),
        ];
    }

    /// Unregisters, detaches and releases everything this level owns.
    ///
    /// Registrations go first so no callback can observe a half-released
    /// scene. Calling this again is a no-op.
    pub fn teardown<W: LabelWidget>(&mut self, surfaces: &mut Surfaces<W>) -> TeardownReport {
        let mut out = TeardownReport::default();
        if self.torn_down {
            return out;
        }
        self.torn_down = true;

        if let Some(hook) = self.hook.take() {
            out.hooks += usize::from(surfaces.hooks.unregister(hook));
        }
        for listener in self.listeners.drain(..) {
            out.listeners += usize::from(surfaces.listeners.remove(listener));
        }

        for group in [self.volume_group, self.line_group, self.label_group] {
            let Some(released) = surfaces.graph.release_group(group) else {
                continue;
            };
            out.groups += 1;
            out.geometries += released.geometries;
            out.materials += released.materials;
            for element in released.label_elements {
                surfaces.labels.unmount(element);
                out.labels += 1;
            }
        }
        self.volumes.clear();

        debug!(
            target: "navigation.level",
            dataset = %self.dataset,
            geometries = out.geometries,
            materials = out.materials,
            labels = out.labels,
            "level scene torn down"
        );
        out
    }

    pub fn dataset(&self) -> &DatasetRef {
        &self.dataset
    }

    pub fn projection(&self) -> &ProjectionContext {
        &self.projection
    }

    pub fn volume_group(&self) -> GroupId {
        self.volume_group
    }

    pub fn line_group(&self) -> GroupId {
        self.line_group
    }

    pub fn label_group(&self) -> GroupId {
        self.label_group
    }

    /// Volume meshes, one per feature that produced any geometry.
    pub fn volumes(&self) -> &[MeshId] {
        &self.volumes
    }

    pub fn anchors(&self) -> &[LabelAnchor] {
        &self.anchors
    }

    pub fn anchor(&self, id: &str) -> Option<&LabelAnchor> {
        self.anchors.iter().find(|a| a.id == id)
    }

    pub fn framing(&self) -> Option<&CameraFraming> {
        self.framing.as_ref()
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn is_bound(&self) -> bool {
        self.hook.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
