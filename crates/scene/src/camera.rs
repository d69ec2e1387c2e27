use foundation::math::{Vec2, Vec3};

use crate::picking::Ray;

/// Anything that can turn a normalized pointer position into a world-space ray.
///
/// `ndc` is in render-surface space, `[-1, 1]` on both axes with `+y` up.
pub trait ScreenRay {
    fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray>;
}

/// Minimal perspective camera; z is the world up axis for map scenes, but the
/// camera itself only knows about `up`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_deg: f64,
    pub aspect: f64,
}

pub const DEFAULT_FOV_Y_DEG: f64 = 20.0;

impl PerspectiveCamera {
    pub fn looking_at(position: Vec3, target: Vec3, aspect: f64) -> Self {
        Self {
            position,
            target,
            up: Vec3::new(0.0, 0.0, 1.0),
            fov_y_deg: DEFAULT_FOV_Y_DEG,
            aspect,
        }
    }

    /// Forward, right and true-up unit vectors.
    fn basis(&self) -> Option<(Vec3, Vec3, Vec3)> {
        let forward = (self.target - self.position).normalize()?;
        let right = forward.cross(self.up).normalize()?;
        let up = right.cross(forward);
        Some((forward, right, up))
    }

    fn half_extents(&self) -> (f64, f64) {
        let half_h = (self.fov_y_deg.to_radians() * 0.5).tan();
        (half_h * self.aspect, half_h)
    }

    /// Normalized device coordinates of `p`, or `None` if it is behind the camera.
    pub fn project_to_ndc(&self, p: Vec3) -> Option<Vec2> {
        let (forward, right, up) = self.basis()?;
        let (half_w, half_h) = self.half_extents();
        let v = p - self.position;
        let depth = v.dot(forward);
        if depth <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            v.dot(right) / (depth * half_w),
            v.dot(up) / (depth * half_h),
        ))
    }
}

impl ScreenRay for PerspectiveCamera {
    fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        if !ndc.is_finite() {
            return None;
        }
        let (forward, right, up) = self.basis()?;
        let (half_w, half_h) = self.half_extents();
        let dir = forward + right * (ndc.x * half_w) + up * (ndc.y * half_h);
        Some(Ray::new(self.position, dir.normalize()?))
    }
}

#[cfg(test)]
mod tests {
    use super::{PerspectiveCamera, ScreenRay};
    use foundation::math::{Vec2, Vec3};

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::looking_at(Vec3::new(0.0, -10.0, 10.0), Vec3::ZERO, 1.5)
    }

    #[test]
    fn centre_ray_points_at_target() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vec2::new(0.0, 0.0)).expect("ray");
        let to_target = (cam.target - cam.position).normalize().expect("dir");
        assert!((ray.dir.dot(to_target) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn projection_inverts_ray() {
        let cam = camera();
        let ndc = Vec2::new(0.3, -0.4);
        let ray = cam.ray_from_ndc(ndc).expect("ray");
        let back = cam.project_to_ndc(ray.at(7.0)).expect("in front");
        assert!((back.x - ndc.x).abs() < 1e-9);
        assert!((back.y - ndc.y).abs() < 1e-9);
    }

    #[test]
    fn behind_camera_is_not_projected() {
        let cam = camera();
        assert!(cam.project_to_ndc(Vec3::new(0.0, -20.0, 20.0)).is_none());
        assert!(cam.ray_from_ndc(Vec2::new(f64::NAN, 0.0)).is_none());
    }
}
