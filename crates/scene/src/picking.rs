use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::graph::{GroupId, MeshId, SceneGraph};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub mesh: MeshId,
    pub distance: f64,
    pub point: Vec3,
}

const MAX_PICK_DISTANCE: f64 = 1.0e30;

/// Nearest volume mesh of `group` hit by `ray`.
///
/// Ordering contract:
/// - The closest triangle hit along the (normalized) ray wins.
/// - On an exact distance tie, the mesh added to the group first wins.
///
/// Only attached groups are pickable; a group that is detached or released
/// yields no hits.
pub fn pick_group(graph: &SceneGraph, group: GroupId, ray: Ray) -> Option<PickHit> {
    if !graph.is_attached(group) {
        return None;
    }
    let dir = ray.dir.normalize()?;
    let node = graph.group(group)?;

    let mut best: Option<(f64, usize, MeshId)> = None;
    for (order, mesh) in node.meshes.iter().enumerate() {
        let Some(entry) = mesh.bounds.ray_hit_t(ray.origin, dir, 0.0, MAX_PICK_DISTANCE) else {
            continue;
        };
        if best.is_some_and(|(bt, _, _)| entry > bt) {
            continue;
        }
        let Some(geometry) = graph.mesh_geometry(mesh.id) else {
            continue;
        };

        let t = geometry
            .triangles()
            .filter_map(|tri| ray_triangle_t(ray.origin, dir, tri))
            .min_by(|a, b| stable_total_cmp_f64(*a, *b));
        let Some(t) = t else {
            continue;
        };

        best = match best {
            None => Some((t, order, mesh.id)),
            Some((bt, bo, bm)) => {
                let ord = stable_total_cmp_f64(t, bt).then_with(|| order.cmp(&bo));
                if ord.is_lt() {
                    Some((t, order, mesh.id))
                } else {
                    Some((bt, bo, bm))
                }
            }
        };
    }

    let (t, _, mesh) = best?;
    Some(PickHit {
        mesh,
        distance: t,
        point: Ray::new(ray.origin, dir).at(t),
    })
}

/// Two-sided Möller-Trumbore; returns the hit distance for a unit `dir`.
fn ray_triangle_t(origin: Vec3, dir: Vec3, [a, b, c]: [Vec3; 3]) -> Option<f64> {
    const EPS: f64 = 1e-12;
    let e1 = b - a;
    let e2 = c - a;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None;
    }
    let inv = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = dir.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv;
    (t >= 0.0 && t.is_finite()).then_some(t)
}
