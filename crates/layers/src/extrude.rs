use earcutr::earcut;
use formats::{BoundaryFeature, Ring};
use foundation::math::{GeoPoint, ProjectionContext, Vec2, Vec3, open_ring};
use scene::components::{FeatureTag, LineGeometry, MeshGeometry};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtrudeConfig {
    /// Height of the volume above `base_elevation`.
    pub depth: f64,
    pub base_elevation: f64,
}

impl Default for ExtrudeConfig {
    fn default() -> Self {
        Self {
            depth: 1.0,
            base_elevation: 0.0,
        }
    }
}

impl ExtrudeConfig {
    pub fn top_elevation(&self) -> f64 {
        self.base_elevation + self.depth
    }
}

/// Everything built for one feature, ready to upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMeshes {
    pub tag: FeatureTag,
    /// All polygons of the feature merged into one mesh, one draw group each.
    pub volume: Option<MeshGeometry>,
    pub top_outlines: Vec<LineGeometry>,
    pub base_outlines: Vec<LineGeometry>,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub features: usize,
    pub volumes: usize,
    pub outlines: usize,
    /// Rings skipped because fewer than 3 usable points were left after projection.
    pub dropped_rings: usize,
    /// Features that ended up with no volume at all.
    pub empty_features: usize,
}

/// Planar projection output to world space: x east, y north, z up.
pub fn planar_to_world(p: Vec2, z: f64) -> Vec3 {
    Vec3::new(p.x, -p.y, z)
}

pub fn feature_tag(feature: &BoundaryFeature) -> FeatureTag {
    FeatureTag {
        id: feature.id.clone(),
        name: feature.name.clone(),
        child_count: feature.child_count,
        child_dataset: feature.child_dataset.clone(),
    }
}

/// Builds volumes and outlines for every feature of one level.
pub fn build_level(
    features: &[BoundaryFeature],
    proj: &ProjectionContext,
    cfg: &ExtrudeConfig,
) -> (Vec<FeatureMeshes>, BuildReport) {
    let mut report = BuildReport::default();
    let built = features
        .iter()
        .map(|f| build_feature(f, proj, cfg, &mut report))
        .collect();
    debug!(
        target: "layers.extrude",
        features = report.features,
        volumes = report.volumes,
        dropped_rings = report.dropped_rings,
        "built level geometry"
    );
    (built, report)
}

pub fn build_feature(
    feature: &BoundaryFeature,
    proj: &ProjectionContext,
    cfg: &ExtrudeConfig,
    report: &mut BuildReport,
) -> FeatureMeshes {
    report.features += 1;
    let mut volume = MeshGeometry::default();
    let mut top_outlines = Vec::new();
    let mut base_outlines = Vec::new();

    for (polygon_index, ring_set) in feature.ring_sets.iter().enumerate() {
        let Some(rings) = project_polygon(feature, polygon_index, ring_set, proj, report) else {
            continue;
        };

        for ring in &rings {
            top_outlines.push(outline(ring, cfg.top_elevation()));
            base_outlines.push(outline(ring, cfg.base_elevation));
        }

        match extrude_polygon(&rings, cfg) {
            Some(mesh) => volume.merge(mesh),
            None => warn!(
                target: "layers.extrude",
                feature = %feature.id,
                polygon = polygon_index,
                "triangulation produced no faces; polygon has outlines only"
            ),
        }
    }

    report.outlines += top_outlines.len() + base_outlines.len();
    let volume = if volume.is_empty() {
        report.empty_features += 1;
        None
    } else {
        report.volumes += 1;
        Some(volume)
    };

    FeatureMeshes {
        tag: feature_tag(feature),
        volume,
        top_outlines,
        base_outlines,
    }
}

/// Projects one polygon into world-plane rings (outer CCW, holes CW).
///
/// Short rings are dropped with a warning. Dropping the outer ring drops the
/// whole polygon, since its holes would have nothing to subtract from.
fn project_polygon(
    feature: &BoundaryFeature,
    polygon_index: usize,
    ring_set: &[Ring],
    proj: &ProjectionContext,
    report: &mut BuildReport,
) -> Option<Vec<Vec<Vec2>>> {
    let mut out: Vec<Vec<Vec2>> = Vec::with_capacity(ring_set.len());
    for (ring_index, ring) in ring_set.iter().enumerate() {
        let mut pts = project_ring(ring, proj);
        if pts.len() < 3 {
            warn!(
                target: "layers.extrude",
                feature = %feature.id,
                polygon = polygon_index,
                ring = ring_index,
                points = pts.len(),
                "dropping malformed ring"
            );
            if ring_index == 0 {
                report.dropped_rings += ring_set.len();
                return None;
            }
            report.dropped_rings += 1;
            continue;
        }

        let ccw = signed_area(&pts) > 0.0;
        let want_ccw = ring_index == 0;
        if ccw != want_ccw {
            pts.reverse();
        }
        out.push(pts);
    }
    Some(out)
}

fn project_ring(ring: &[GeoPoint], proj: &ProjectionContext) -> Vec<Vec2> {
    let mut pts: Vec<Vec2> = Vec::with_capacity(ring.len());
    for p in open_ring(ring).iter().filter(|p| p.is_finite()) {
        let planar = proj.project(*p);
        let world = Vec2::new(planar.x, -planar.y);
        if pts.last().is_some_and(|last| same_point(*last, world)) {
            continue;
        }
        pts.push(world);
    }
    if pts.len() >= 2 && same_point(pts[0], pts[pts.len() - 1]) {
        pts.pop();
    }
    pts
}

fn same_point(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

/// Shoelace area; positive for counter-clockwise rings.
fn signed_area(pts: &[Vec2]) -> f64 {
    let n = pts.len();
    (0..n)
        .map(|i| {
            let a = pts[i];
            let b = pts[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        * 0.5
}

fn outline(ring: &[Vec2], z: f64) -> LineGeometry {
    let mut points: Vec<[f32; 3]> = ring
        .iter()
        .map(|p| Vec3::new(p.x, p.y, z).to_f32())
        .collect();
    if let Some(first) = points.first().copied() {
        points.push(first);
    }
    LineGeometry { points }
}

/// Caps from earcut plus one flat-shaded quad per ring edge.
fn extrude_polygon(rings: &[Vec<Vec2>], cfg: &ExtrudeConfig) -> Option<MeshGeometry> {
    let mut flat: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();
    let mut cap: Vec<Vec2> = Vec::new();
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            hole_indices.push(cap.len());
        }
        for p in ring {
            flat.push(p.x);
            flat.push(p.y);
            cap.push(*p);
        }
    }

    let triangles = earcut(&flat, &hole_indices, 2).ok()?;
    if triangles.len() < 3 {
        return None;
    }

    let top_z = cfg.top_elevation() as f32;
    let base_z = cfg.base_elevation as f32;
    let mut mesh = MeshGeometry::default();

    // Top cap, facing +z.
    let top_base = mesh.positions.len() as u32;
    for p in &cap {
        mesh.positions.push([p.x as f32, p.y as f32, top_z]);
        mesh.normals.push([0.0, 0.0, 1.0]);
    }
    let mut cap_tris: Vec<[u32; 3]> = Vec::with_capacity(triangles.len() / 3);
    for tri in triangles.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]];
        let (pa, pb, pc) = (cap[a], cap[b], cap[c]);
        let cross = (pb.x - pa.x) * (pc.y - pa.y) - (pb.y - pa.y) * (pc.x - pa.x);
        if cross >= 0.0 {
            cap_tris.push([a as u32, b as u32, c as u32]);
        } else {
            cap_tris.push([a as u32, c as u32, b as u32]);
        }
    }
    for [a, b, c] in &cap_tris {
        mesh.indices.extend([top_base + a, top_base + b, top_base + c]);
    }

    // Bottom cap, facing -z.
    let bottom_base = mesh.positions.len() as u32;
    for p in &cap {
        mesh.positions.push([p.x as f32, p.y as f32, base_z]);
        mesh.normals.push([0.0, 0.0, -1.0]);
    }
    for [a, b, c] in &cap_tris {
        mesh.indices
            .extend([bottom_base + a, bottom_base + c, bottom_base + b]);
    }

    // Walls. Outer rings are CCW and holes CW, so (dy, -dx) always points out of the solid.
    for ring in rings {
        let n = ring.len();
        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            let Some(normal) = Vec3::new(b.y - a.y, -(b.x - a.x), 0.0).normalize() else {
                continue;
            };
            let normal = normal.to_f32();
            let base = mesh.positions.len() as u32;
            mesh.positions.extend([
                [a.x as f32, a.y as f32, base_z],
                [b.x as f32, b.y as f32, base_z],
                [b.x as f32, b.y as f32, top_z],
                [a.x as f32, a.y as f32, top_z],
            ]);
            mesh.normals.extend([normal; 4]);
            mesh.indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    Some(mesh)
}
