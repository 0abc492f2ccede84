use glam::{Mat4, Vec3};

use crate::transform::Transform;

#[derive(Clone, Debug)]
pub struct Camera {
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 60.0f32.to_radians(),
            aspect_ratio: 16.0 / 9.0, // Standard monitor
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Computes the "Projection Matrix" (World -> Screen)
    pub fn compute_projection_matrix(&self) -> Mat4 {
        // Perspective projection (things get smaller as they move away)
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Computes the View Matrix from the camera's transform.
    /// Moves the world opposite to the camera.
    pub fn compute_view_matrix(transform: &Transform) -> Mat4 {
        let eye = transform.translation;
        Mat4::look_at_rh(eye, eye + transform.forward(), transform.up())
    }

    /// View-projection for one rendered view.
    pub fn compute_view_projection(&self, transform: &Transform) -> Mat4 {
        self.compute_projection_matrix() * Self::compute_view_matrix(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_flips_handedness() {
        let cam = Camera::default();
        let proj = cam.compute_projection_matrix();
        // Right-handed perspective: w' carries -z
        assert_eq!(proj.col(2).w, -1.0);
    }

    #[test]
    fn view_projection_centers_the_look_target() {
        let cam = Camera {
            aspect_ratio: 1.0,
            ..Default::default()
        };
        let transform = Transform::from_xyz(0.0, 0.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y);
        let clip = cam.compute_view_projection(&transform) * Vec3::ZERO.extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
