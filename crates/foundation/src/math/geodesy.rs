/// WGS84 semi-major axis (meters). Also the sphere radius used for areas.
pub const WGS84_A: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator square (degrees).
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

/// Geographic coordinate in degrees, GeoJSON order (lon, lat).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn is_finite(self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }
}

/// Ring without its closing duplicate, if the input repeats the first point.
pub fn open_ring(ring: &[GeoPoint]) -> &[GeoPoint] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() >= 2 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Unsigned area of a ring on the sphere of radius `WGS84_A` (square meters).
///
/// Uses the spherical-excess approximation
/// `R²/2 · Σ (λ[i+1] − λ[i−1]) · sin φ[i]`; accurate enough to compare
/// administrative regions against each other, which is all the scale fit needs.
pub fn ring_area_m2(ring: &[GeoPoint]) -> f64 {
    let pts = open_ring(ring);
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        total += (next.lon_deg.to_radians() - prev.lon_deg.to_radians())
            * cur.lat_deg.to_radians().sin();
    }
    (total * WGS84_A * WGS84_A * 0.5).abs()
}

/// Area of a polygon (outer ring first, holes after) in square meters.
///
/// Holes subtract from the outer ring. The result is negative when the holes
/// outweigh the shell, which callers treat as degenerate input.
pub fn polygon_area_m2(rings: &[Vec<GeoPoint>]) -> f64 {
    let mut area = 0.0;
    for (i, ring) in rings.iter().enumerate() {
        let a = ring_area_m2(ring);
        if i == 0 { area += a } else { area -= a }
    }
    area
}

/// Planar shoelace area and area-weighted centroid of a ring in degree space.
///
/// Returns `(signed_area, centroid_lon, centroid_lat)`.
pub fn ring_planar_moments(ring: &[GeoPoint]) -> (f64, f64, f64) {
    let pts = open_ring(ring);
    let n = pts.len();
    if n < 3 {
        return (0.0, 0.0, 0.0);
    }

    let mut a2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p = pts[i];
        let q = pts[(i + 1) % n];
        let cross = p.lon_deg * q.lat_deg - q.lon_deg * p.lat_deg;
        a2 += cross;
        cx += (p.lon_deg + q.lon_deg) * cross;
        cy += (p.lat_deg + q.lat_deg) * cross;
    }
    if a2 == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let area = a2 * 0.5;
    (area, cx / (3.0 * a2), cy / (3.0 * a2))
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, WGS84_A, open_ring, polygon_area_m2, ring_area_m2, ring_planar_moments};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn square(x0: f64, y0: f64, size: f64) -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(x0, y0),
            GeoPoint::new(x0 + size, y0),
            GeoPoint::new(x0 + size, y0 + size),
            GeoPoint::new(x0, y0 + size),
        ]
    }

    #[test]
    fn closing_duplicate_is_ignored() {
        let mut closed = square(0.0, 0.0, 1.0);
        closed.push(closed[0]);
        assert_eq!(open_ring(&closed).len(), 4);
        assert_close(ring_area_m2(&closed), ring_area_m2(&square(0.0, 0.0, 1.0)), 1e-3);
    }

    #[test]
    fn one_degree_square_at_equator() {
        let d = 1.0_f64.to_radians();
        let expected = d * d.sin() * WGS84_A * WGS84_A;
        assert_close(ring_area_m2(&square(0.0, 0.0, 1.0)), expected, 1.0);
    }

    #[test]
    fn area_is_orientation_independent() {
        let ccw = square(10.0, 20.0, 2.0);
        let cw: Vec<GeoPoint> = ccw.iter().rev().copied().collect();
        assert_close(ring_area_m2(&ccw), ring_area_m2(&cw), 1e-6);
    }

    #[test]
    fn holes_subtract() {
        let outer = square(0.0, 0.0, 4.0);
        let hole = square(1.0, 1.0, 1.0);
        let with_hole = polygon_area_m2(&[outer.clone(), hole.clone()]);
        assert_close(with_hole, ring_area_m2(&outer) - ring_area_m2(&hole), 1e-3);
        assert!(with_hole < ring_area_m2(&outer));
    }

    #[test]
    fn planar_centroid_of_square() {
        let (area, cx, cy) = ring_planar_moments(&square(2.0, 4.0, 2.0));
        assert_close(area, 4.0, 1e-12);
        assert_close(cx, 3.0, 1e-12);
        assert_close(cy, 5.0, 1e-12);
    }

    #[test]
    fn degenerate_rings_have_no_area() {
        let line = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(2.0, 0.0),
        ];
        assert_close(ring_area_m2(&line), 0.0, 1e-6);
        assert_eq!(ring_planar_moments(&line[..2]), (0.0, 0.0, 0.0));
    }
}
