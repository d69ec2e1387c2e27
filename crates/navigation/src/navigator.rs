use formats::BoundaryDocument;
use foundation::math::Vec2;
use runtime::{Frame, InputKind};
use scene::{
    MeshId,
    camera::ScreenRay,
    components::FeatureTag,
    highlight::{HighlightChange, HighlightEngine},
    labels::LabelWidget,
};
use tracing::{debug, info, trace, warn};

use crate::config::MapConfig;
use crate::error::LoadError;
use crate::history::NavigationHistory;
use crate::level::{LevelHook, LevelScene, Surfaces};
use crate::lifecycle::LifecycleManager;
use crate::source::{BoundarySource, DatasetRef, FetchError};

/// Identifies one `load_level` request. Later requests compare greater.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// How history changes when a load commits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NavIntent {
    /// Initial load or explicit jump: history restarts at this dataset.
    Root,
    /// Push the dataset on top of history.
    DrillDown,
    /// Pop back to the dataset below the current top.
    DrillUp,
}

#[derive(Debug)]
pub enum NavState {
    Idle,
    Loading {
        token: RequestToken,
        dataset: DatasetRef,
        intent: NavIntent,
    },
    Ready,
    Error(LoadError),
}

impl NavState {
    pub fn is_ready(&self) -> bool {
        matches!(self, NavState::Ready)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, NavState::Loading { .. })
    }
}

/// A started load: fetch `dataset`, then hand the result back with `token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub token: RequestToken,
    pub dataset: DatasetRef,
    pub intent: NavIntent,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The level is built, bound and active.
    Ready,
    /// Fetch or projection failed; the state is now `Error`.
    Failed,
    /// A newer request superseded this one; nothing changed.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No level is bound, so no click listener exists.
    Unbound,
    /// Leaf region, or empty space at the root level.
    NoTransition,
    DrillDown(LoadTicket),
    DrillUp(LoadTicket),
}

/// Drill-down/drill-up state machine.
///
/// Single writer of the active level and of the navigation history. Loads
/// are split in two: `load_level` tears down and hands out a ticket, the
/// caller fetches, and `complete_load` commits the result if the ticket is
/// still the latest one.
#[derive(Debug)]
pub struct Navigator<W> {
    config: MapConfig,
    lifecycle: LifecycleManager<W>,
    highlight: HighlightEngine,
    history: NavigationHistory,
    state: NavState,
    last_token: u64,
}

impl<W: LabelWidget> Navigator<W> {
    pub fn new(config: MapConfig, labels: W) -> Self {
        let highlight = HighlightEngine::new(config.style.highlight_color);
        Self {
            config,
            lifecycle: LifecycleManager::new(labels),
            highlight,
            history: NavigationHistory::new(),
            state: NavState::Idle,
            last_token: 0,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn active_scene(&self) -> Option<&LevelScene> {
        self.lifecycle.active()
    }

    pub fn surfaces(&self) -> &Surfaces<W> {
        self.lifecycle.surfaces()
    }

    pub fn highlight(&self) -> &HighlightEngine {
        &self.highlight
    }

    /// Starts loading `dataset` as a new root level.
    pub fn load_level(&mut self, dataset: impl Into<DatasetRef>) -> LoadTicket {
        self.begin(dataset.into(), NavIntent::Root)
    }

    fn begin(&mut self, dataset: DatasetRef, intent: NavIntent) -> LoadTicket {
        self.last_token += 1;
        let token = RequestToken(self.last_token);

        if let NavState::Loading { token: previous, dataset: superseded, .. } = &self.state {
            debug!(
                target: "navigation",
                previous = previous.value(),
                superseded = %superseded,
                "superseding in-flight load"
            );
        }

        self.highlight.reset();
        let released = self.lifecycle.teardown();
        debug!(
            target: "navigation",
            token = token.value(),
            dataset = %dataset,
            ?intent,
            geometries = released.geometries,
            "loading level"
        );

        self.state = NavState::Loading {
            token,
            dataset: dataset.clone(),
            intent,
        };
        LoadTicket {
            token,
            dataset,
            intent,
        }
    }

    /// Commits a fetch result for `token`.
    ///
    /// Results for anything but the latest request are discarded without
    /// touching the scene, history or state.
    pub fn complete_load(
        &mut self,
        token: RequestToken,
        result: Result<BoundaryDocument, FetchError>,
    ) -> LoadOutcome {
        let (dataset, intent) = match &self.state {
            NavState::Loading {
                token: current,
                dataset,
                intent,
            } if *current == token => (dataset.clone(), *intent),
            _ => {
                warn!(target: "navigation", token = token.value(), "discarding stale load result");
                return LoadOutcome::Stale;
            }
        };

        let doc = match result {
            Ok(doc) => doc,
            Err(err) => return self.fail(&dataset, LoadError::Fetch(err)),
        };

        if let Err(err) = self.lifecycle.install(dataset.clone(), &doc, &self.config) {
            return self.fail(&dataset, LoadError::Degenerate(err));
        }

        match intent {
            NavIntent::Root => self.history.reset(dataset.clone()),
            NavIntent::DrillDown => {
                self.history.push(dataset.clone());
            }
            NavIntent::DrillUp => {
                self.history.pop();
            }
        }
        self.highlight.park_pointer();
        self.state = NavState::Ready;

        info!(
            target: "navigation",
            dataset = %dataset,
            depth = self.history.depth(),
            features = doc.features.len(),
            "level ready"
        );
        LoadOutcome::Ready
    }

    fn fail(&mut self, dataset: &DatasetRef, err: LoadError) -> LoadOutcome {
        warn!(target: "navigation", dataset = %dataset, error = %err, "level load failed");
        self.state = NavState::Error(err);
        LoadOutcome::Failed
    }

    /// Fetches the ticket's dataset from `source` and commits the result.
    pub async fn resolve<S: BoundarySource>(&mut self, source: &S, ticket: &LoadTicket) -> LoadOutcome {
        let result = source.fetch(&ticket.dataset).await;
        self.complete_load(ticket.token, result)
    }

    fn listening(&self, kind: InputKind) -> bool {
        self.state.is_ready() && self.lifecycle.surfaces().listeners.is_listening(kind)
    }

    /// Pointer-move event in normalized render-surface coordinates.
    ///
    /// Returns `false` if no level listens for pointer moves.
    pub fn pointer_moved(&mut self, ndc: Vec2) -> bool {
        if !self.listening(InputKind::PointerMove) {
            return false;
        }
        self.highlight.set_pointer(ndc);
        true
    }

    /// Feature under the current pointer, if any.
    pub fn feature_under_pointer(&self, camera: &impl ScreenRay) -> Option<&FeatureTag> {
        let scene = self.lifecycle.active()?;
        let graph = &self.lifecycle.surfaces().graph;
        let hit = self.highlight.pick(graph, scene.volume_group(), camera)?;
        graph.mesh(scene.volume_group(), hit.mesh).map(|m| &m.tag)
    }

    /// Click at the current pointer position.
    pub fn click(&mut self, camera: &impl ScreenRay) -> ClickOutcome {
        if !self.listening(InputKind::Click) {
            return ClickOutcome::Unbound;
        }

        let target = match self.feature_under_pointer(camera) {
            Some(tag) => match tag.drill_target() {
                Some(child) => Some((DatasetRef::new(child), NavIntent::DrillDown)),
                None => {
                    trace!(target: "navigation", region = %tag.id, "clicked leaf region");
                    None
                }
            },
            None => self.history.parent().map(|parent| (parent.clone(), NavIntent::DrillUp)),
        };

        match target {
            Some((dataset, NavIntent::DrillUp)) => ClickOutcome::DrillUp(self.begin(dataset, NavIntent::DrillUp)),
            Some((dataset, intent)) => ClickOutcome::DrillDown(self.begin(dataset, intent)),
            None => ClickOutcome::NoTransition,
        }
    }

    /// Runs the per-frame hooks registered by the active level.
    ///
    /// Returns the highlight transition if the highlight hook ran.
    pub fn run_frame(&mut self, frame: Frame, camera: &impl ScreenRay) -> Option<HighlightChange> {
        let mut change = None;
        let group = self.lifecycle.active().map(LevelScene::volume_group);
        for hook in self.lifecycle.surfaces().hooks.due() {
            match hook {
                LevelHook::Highlight => {
                    let graph = &mut self.lifecycle.surfaces_mut().graph;
                    let c = self.highlight.tick(graph, group, camera);
                    if c != HighlightChange::Unchanged {
                        trace!(target: "navigation", frame = frame.index, change = ?c, "highlight changed");
                    }
                    change = Some(c);
                }
            }
        }
        change
    }

    /// Meshes for the harness's outline-highlight pass.
    pub fn outline_targets(&self) -> Vec<MeshId> {
        self.lifecycle
            .active()
            .map(|s| s.volumes().to_vec())
            .unwrap_or_default()
    }
}
