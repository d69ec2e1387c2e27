use formats::BoundaryDocument;
use foundation::math::ProjectionError;
use scene::labels::LabelWidget;
use tracing::debug;

use crate::config::MapConfig;
use crate::level::{LevelScene, Surfaces, TeardownReport};
use crate::source::DatasetRef;

/// Owns the active `LevelScene` and is the only writer of scene-graph
/// membership for level resources.
///
/// At most one level exists at a time: `install` always tears down the
/// current one before building.
#[derive(Debug)]
pub struct LifecycleManager<W> {
    surfaces: Surfaces<W>,
    active: Option<LevelScene>,
}

impl<W: LabelWidget> LifecycleManager<W> {
    pub fn new(labels: W) -> Self {
        Self {
            surfaces: Surfaces::new(labels),
            active: None,
        }
    }

    pub fn active(&self) -> Option<&LevelScene> {
        self.active.as_ref()
    }

    pub fn surfaces(&self) -> &Surfaces<W> {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut Surfaces<W> {
        &mut self.surfaces
    }

    /// Tears down the active level, if any. Safe to call repeatedly.
    pub fn teardown(&mut self) -> TeardownReport {
        match self.active.take() {
            Some(mut scene) => scene.teardown(&mut self.surfaces),
            None => TeardownReport::default(),
        }
    }

    /// Builds and binds the level for `doc`, replacing whatever was active.
    ///
    /// On failure nothing is left active.
    pub fn install(
        &mut self,
        dataset: DatasetRef,
        doc: &BoundaryDocument,
        config: &MapConfig,
    ) -> Result<&LevelScene, ProjectionError> {
        let released = self.teardown();
        if released != TeardownReport::default() {
            debug!(target: "navigation.lifecycle", ?released, "replaced previous level");
        }
        let mut scene = LevelScene::build(dataset, doc, config, &mut self.surfaces)?;
        scene.bind(&mut self.surfaces);
        Ok(self.active.insert(scene))
    }
}

#[cfg(test)]
mod tests {
    use super::LifecycleManager;
    use crate::config::MapConfig;
    use crate::level::TeardownReport;
    use crate::source::DatasetRef;
    use crate::test_support::{RecordingLabels, doc, region};

    #[test]
    fn install_replaces_previous_level() {
        let mut lm = LifecycleManager::new(RecordingLabels::default());
        let cfg = MapConfig::default();
        let first = doc(vec![region("a", 0.0, 0, None), region("b", 2.0, 0, None)]);
        let second = doc(vec![region("c", 10.0, 0, None)]);

        let first_group = lm.install(DatasetRef::from("one"), &first, &cfg).expect("one").volume_group();
        lm.install(DatasetRef::from("two"), &second, &cfg).expect("two");

        let graph = &lm.surfaces().graph;
        assert!(graph.group(first_group).is_none());
        assert_eq!(graph.group_count(), 3);
        assert_eq!(graph.live_geometries(), 3);
        assert_eq!(lm.surfaces().hooks.len(), 1);
        assert_eq!(lm.surfaces().listeners.len(), 2);
        assert_eq!(lm.surfaces().labels.mounted_ids(), vec!["c"]);
        assert_eq!(lm.active().map(|s| s.dataset().as_str()), Some("two"));
    }

    #[test]
    fn teardown_without_active_level_is_noop() {
        let mut lm = LifecycleManager::new(RecordingLabels::default());
        assert_eq!(lm.teardown(), TeardownReport::default());
        lm.install(DatasetRef::from("one"), &doc(vec![region("a", 0.0, 0, None)]), &MapConfig::default())
            .expect("one");
        assert_ne!(lm.teardown(), TeardownReport::default());
        assert_eq!(lm.teardown(), TeardownReport::default());
        assert!(lm.active().is_none());
    }
}
