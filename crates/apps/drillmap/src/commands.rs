use std::error::Error;

use foundation::math::{Vec2, Vec3};
use navigation::{
    BoundarySource, ClickOutcome, LevelScene, LoadOutcome, LoadTicket, MapConfig, NavState,
    Navigator,
};
use runtime::Frame;
use scene::camera::PerspectiveCamera;
use serde::Serialize;
use tracing::info;

use crate::labels::ConsoleLabels;

/// Orbit pitch the driver camera uses, as the interactive map does.
const CAMERA_PITCH_DEG: f64 = 45.0;
const CAMERA_ASPECT: f64 = 16.0 / 9.0;

pub type CommandResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStats {
    pub id: String,
    pub name: String,
    pub triangles: usize,
    pub polygons: usize,
    pub outlines: usize,
    pub drill_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSummary {
    pub dataset: String,
    pub regions: Vec<RegionStats>,
    pub labels: Vec<String>,
    pub dropped_rings: usize,
    pub empty_features: usize,
    pub scale_factor: f64,
    pub center: [f64; 2],
    /// `[min_x, min_y, max_x, max_y]` in world units.
    pub footprint: Option<[f64; 4]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WalkStep {
    Loaded { dataset: String, regions: usize },
    DrilledDown { region: String, dataset: String, regions: usize },
    DrilledUp { dataset: String, regions: usize },
}

/// Builds one level and reports what went into it.
pub async fn inspect<S: BoundarySource>(
    source: &S,
    config: &MapConfig,
    dataset: &str,
) -> CommandResult<LevelSummary> {
    let mut nav = Navigator::new(config.clone(), ConsoleLabels::default());
    let ticket = nav.load_level(dataset);
    settle(&mut nav, source, &ticket).await?;
    summarize(&nav).ok_or_else(|| "no active level after load".into())
}

/// Drills down through `path` by clicking each region's label anchor, then
/// clicks empty space until back at `root`.
pub async fn walk<S: BoundarySource>(
    source: &S,
    config: &MapConfig,
    root: &str,
    path: &[String],
) -> CommandResult<Vec<WalkStep>> {
    let mut nav = Navigator::new(config.clone(), ConsoleLabels::default());
    let ticket = nav.load_level(root);
    settle(&mut nav, source, &ticket).await?;
    let mut steps = vec![WalkStep::Loaded {
        dataset: root.to_string(),
        regions: region_count(&nav),
    }];
    let mut frame = Frame::new(0, 1.0 / 60.0);

    for region in path {
        let scene = active(&nav)?;
        let camera = camera_for(scene)?;
        let anchor = scene
            .anchor(region)
            .ok_or_else(|| format!("region {region} has no label anchor in {}", scene.dataset()))?;
        let ndc = camera
            .project_to_ndc(anchor.position)
            .ok_or_else(|| format!("region {region} is behind the camera"))?;

        nav.pointer_moved(ndc);
        nav.run_frame(frame, &camera);
        frame = frame.next();
        let hovered = nav.feature_under_pointer(&camera).map(|t| t.id.clone());
        if hovered.as_deref() != Some(region.as_str()) {
            return Err(format!("pointing at {region} hit {hovered:?}").into());
        }

        let ticket = match nav.click(&camera) {
            ClickOutcome::DrillDown(ticket) => ticket,
            ClickOutcome::NoTransition => return Err(format!("region {region} has no children").into()),
            other => return Err(format!("unexpected click outcome {other:?}").into()),
        };
        settle(&mut nav, source, &ticket).await?;
        info!(region = %region, dataset = %ticket.dataset, "drilled down");
        steps.push(WalkStep::DrilledDown {
            region: region.clone(),
            dataset: ticket.dataset.to_string(),
            regions: region_count(&nav),
        });
    }

    while nav.history().depth() > 1 {
        let scene = active(&nav)?;
        let camera = camera_for(scene)?;
        let ndc = empty_space_ndc(scene, &camera).ok_or("no empty space in view")?;
        nav.pointer_moved(ndc);
        nav.run_frame(frame, &camera);
        frame = frame.next();

        let ticket = match nav.click(&camera) {
            ClickOutcome::DrillUp(ticket) => ticket,
            other => return Err(format!("expected drill-up, got {other:?}").into()),
        };
        settle(&mut nav, source, &ticket).await?;
        info!(dataset = %ticket.dataset, "drilled up");
        steps.push(WalkStep::DrilledUp {
            dataset: ticket.dataset.to_string(),
            regions: region_count(&nav),
        });
    }

    Ok(steps)
}

async fn settle<S: BoundarySource>(
    nav: &mut Navigator<ConsoleLabels>,
    source: &S,
    ticket: &LoadTicket,
) -> CommandResult<()> {
    match nav.resolve(source, ticket).await {
        LoadOutcome::Ready => Ok(()),
        LoadOutcome::Stale => Err(format!("load of {} was superseded", ticket.dataset).into()),
        LoadOutcome::Failed => match nav.state() {
            NavState::Error(err) => Err(format!("loading {}: {err}", ticket.dataset).into()),
            _ => Err(format!("loading {} failed", ticket.dataset).into()),
        },
    }
}

fn active(nav: &Navigator<ConsoleLabels>) -> CommandResult<&LevelScene> {
    nav.active_scene().ok_or_else(|| "no active level".into())
}

fn region_count(nav: &Navigator<ConsoleLabels>) -> usize {
    nav.active_scene().map_or(0, |s| s.volumes().len())
}

fn camera_for(scene: &LevelScene) -> CommandResult<PerspectiveCamera> {
    let framing = scene
        .framing()
        .ok_or_else(|| format!("level {} has no volumes to frame", scene.dataset()))?;
    Ok(PerspectiveCamera::looking_at(
        framing.eye(CAMERA_PITCH_DEG),
        framing.target,
        CAMERA_ASPECT,
    ))
}

/// A ground point well north-east of the footprint.
fn empty_space_ndc(scene: &LevelScene, camera: &PerspectiveCamera) -> Option<Vec2> {
    let footprint = scene.framing()?.footprint;
    let extent = footprint.width().max(footprint.height());
    camera.project_to_ndc(Vec3::new(
        footprint.max[0] + extent,
        footprint.max[1] + extent,
        0.0,
    ))
}

pub fn summarize(nav: &Navigator<ConsoleLabels>) -> Option<LevelSummary> {
    let scene = nav.active_scene()?;
    let graph = &nav.surfaces().graph;
    let lines = &graph.group(scene.line_group())?.lines;

    let regions = graph
        .group(scene.volume_group())?
        .meshes
        .iter()
        .map(|mesh| {
            let geometry = graph.mesh_geometry(mesh.id);
            RegionStats {
                id: mesh.tag.id.clone(),
                name: mesh.tag.name.clone(),
                triangles: geometry.map_or(0, |g| g.triangle_count()),
                polygons: geometry.map_or(0, |g| g.groups.len()),
                outlines: lines.iter().filter(|l| l.tag.id == mesh.tag.id).count(),
                drill_target: mesh.tag.drill_target().map(str::to_string),
            }
        })
        .collect();

    let projection = scene.projection();
    let report = scene.report();
    Some(LevelSummary {
        dataset: scene.dataset().to_string(),
        regions,
        labels: nav.surfaces().labels.names().into_iter().map(str::to_string).collect(),
        dropped_rings: report.dropped_rings,
        empty_features: report.empty_features,
        scale_factor: projection.scale_factor(),
        center: [projection.center().lon_deg, projection.center().lat_deg],
        footprint: scene.framing().map(|f| {
            let b = f.footprint;
            [b.min[0], b.min[1], b.max[0], b.max[1]]
        }),
    })
}

pub fn print_summary(summary: &LevelSummary) {
    println!(
        "{}: {} regions, scale factor {:.4}, centre ({:.4}, {:.4})",
        summary.dataset,
        summary.regions.len(),
        summary.scale_factor,
        summary.center[0],
        summary.center[1]
    );
    for r in &summary.regions {
        let target = r.drill_target.as_deref().unwrap_or("-");
        println!(
            "  {:<12} {:<24} tris={:<6} polys={:<3} outlines={:<3} -> {}",
            r.id, r.name, r.triangles, r.polygons, r.outlines, target
        );
    }
    if summary.dropped_rings > 0 || summary.empty_features > 0 {
        println!(
            "  dropped rings: {}, regions without volume: {}",
            summary.dropped_rings, summary.empty_features
        );
    }
}

pub fn print_walk(steps: &[WalkStep]) {
    for step in steps {
        match step {
            WalkStep::Loaded { dataset, regions } => println!("load {dataset} ({regions} regions)"),
            WalkStep::DrilledDown {
                region,
                dataset,
                regions,
            } => println!("down {region} -> {dataset} ({regions} regions)"),
            WalkStep::DrilledUp { dataset, regions } => println!("up -> {dataset} ({regions} regions)"),
        }
    }
}
