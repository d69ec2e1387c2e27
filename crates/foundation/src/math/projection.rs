//! Per-level planar projection.
//!
//! A `ProjectionContext` is fitted once to a whole boundary document and then
//! maps geographic points to planar render coordinates with a Mercator
//! projection centred on the dataset. The scale is chosen from the total
//! dataset area so that a country and a single district end up with a
//! comparable on-screen footprint.

use super::geodesy::{GeoPoint, MERCATOR_MAX_LAT_DEG, polygon_area_m2, ring_planar_moments};
use super::vec::Vec2;

/// Footprint (square meters) that renders at `base_scale`.
pub const TARGET_PLOTTING_AREA_M2: f64 = 9_542_502_774_372.604;

/// Planar units per radian of longitude at scale factor 1.
pub const BASE_PROJECTION_SCALE: f64 = 30.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionParams {
    pub target_plotting_area: f64,
    pub base_scale: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            target_plotting_area: TARGET_PLOTTING_AREA_M2,
            base_scale: BASE_PROJECTION_SCALE,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ProjectionError {
    /// The summed feature area was zero, negative or not finite.
    DegenerateGeometry { total_area: f64 },
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionError::DegenerateGeometry { total_area } => {
                write!(f, "degenerate geometry: total feature area is {total_area}")
            }
        }
    }
}

impl std::error::Error for ProjectionError {}

/// Immutable geographic -> planar mapping for one navigation level.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionContext {
    center: GeoPoint,
    scale_factor: f64,
    k: f64,
    center_psi: f64,
}

impl ProjectionContext {
    /// Fits a projection to every polygon of a dataset.
    ///
    /// Each item is one polygon: outer ring first, holes after. The centre is
    /// the area-weighted centroid of all polygons together, not the mean of
    /// per-feature centroids.
    pub fn fit<'a, I>(polygons: I, params: ProjectionParams) -> Result<Self, ProjectionError>
    where
        I: IntoIterator<Item = &'a [Vec<GeoPoint>]>,
    {
        let mut total_area = 0.0;
        let mut moment_area = 0.0;
        let mut moment_x = 0.0;
        let mut moment_y = 0.0;
        let mut vertex_sum = (0.0, 0.0, 0usize);

        for rings in polygons {
            total_area += polygon_area_m2(rings);
            for (i, ring) in rings.iter().enumerate() {
                let (area, cx, cy) = ring_planar_moments(ring);
                let weight = if i == 0 { area.abs() } else { -area.abs() };
                moment_area += weight;
                moment_x += weight * cx;
                moment_y += weight * cy;
                for p in ring.iter().filter(|p| p.is_finite()) {
                    vertex_sum.0 += p.lon_deg;
                    vertex_sum.1 += p.lat_deg;
                    vertex_sum.2 += 1;
                }
            }
        }

        if !total_area.is_finite() || total_area <= 0.0 {
            return Err(ProjectionError::DegenerateGeometry { total_area });
        }

        let center = if moment_area.abs() > f64::EPSILON {
            GeoPoint::new(moment_x / moment_area, moment_y / moment_area)
        } else {
            // Shell and holes cancel out in degree space; fall back to the vertex mean.
            let n = vertex_sum.2.max(1) as f64;
            GeoPoint::new(vertex_sum.0 / n, vertex_sum.1 / n)
        };

        let scale_factor = (params.target_plotting_area / total_area).sqrt();
        if !scale_factor.is_finite() || !center.is_finite() {
            return Err(ProjectionError::DegenerateGeometry { total_area });
        }

        Ok(Self::with_center(center, scale_factor, params.base_scale))
    }

    /// Builds a context from an explicit centre and scale factor.
    pub fn with_center(center: GeoPoint, scale_factor: f64, base_scale: f64) -> Self {
        Self {
            center,
            scale_factor,
            k: base_scale * scale_factor,
            center_psi: mercator_psi(center.lat_deg),
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// `sqrt(target_plotting_area / total_area)`.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Planar units per radian of longitude.
    pub fn projection_scale(&self) -> f64 {
        self.k
    }

    /// Maps a geographic point to planar coordinates.
    ///
    /// The output is screen-space: `y` grows southward, so north of the
    /// centre has negative `y`. The centre maps to the origin.
    pub fn project(&self, p: GeoPoint) -> Vec2 {
        let x = self.k * (p.lon_deg - self.center.lon_deg).to_radians();
        let y = -self.k * (mercator_psi(p.lat_deg) - self.center_psi);
        Vec2::new(x, y)
    }
}

fn mercator_psi(lat_deg: f64) -> f64 {
    let lat = lat_deg
        .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
        .to_radians();
    (std::f64::consts::FRAC_PI_4 + lat * 0.5).tan().ln()
}
