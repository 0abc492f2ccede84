use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Rotates the object around the Y axis (Global Up)
    pub fn rotate_y(&mut self, angle_radians: f32) {
        let rotation = Quat::from_rotation_y(angle_radians);
        self.rotation = self.rotation * rotation;
    }

    /// Rotates around an arbitrary axis in world space
    pub fn rotate_axis(&mut self, axis: Vec3, angle_radians: f32) {
        let rotation = Quat::from_axis_angle(axis.normalize(), angle_radians);
        self.rotation = rotation * self.rotation;
    }

    /// Makes the transform look at a target position
    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> Self {
        // Mat4::look_at_rh builds a View Matrix (it moves the world).
        // For an object Transform we want the inverse rotation: -Z toward the target.
        let mat = Mat4::look_at_rh(self.translation, target, up);
        self.rotation = Quat::from_mat4(&mat.inverse());
        self
    }

    // --- Matrices ---

    /// Creates the Model Matrix (Local -> World)
    /// This is what we send to the GPU Uniform Buffer
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    // --- Directions (Useful for Movement) ---

    /// Returns the "Forward" direction (-Z) relative to current rotation
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Returns the "Right" direction (+X) relative to current rotation
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Returns the "Up" direction (+Y) relative to current rotation
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn identity_matrix_for_default_transform() {
        let t = Transform::default();
        assert_eq!(t.compute_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_roundtrip_preserves_components() {
        let mut t = Transform::from_xyz(1.0, -2.0, 3.5);
        t.scale = Vec3::new(2.0, 2.0, 2.0);
        t.rotate_y(0.7);

        let back = Transform::from_matrix(t.compute_matrix());
        assert!(approx(back.translation, t.translation));
        assert!(approx(back.scale, t.scale));
        assert!(back.rotation.dot(t.rotation).abs() > 0.9999);
    }

    #[test]
    fn looking_at_points_forward_to_target() {
        let t = Transform::from_xyz(0.0, 0.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y);
        assert!(approx(t.forward(), Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn rotate_y_quarter_turn_moves_forward_axis() {
        let mut t = Transform::default();
        t.rotate_y(std::f32::consts::FRAC_PI_2);
        // -Z rotated 90 degrees around Y lands on -X
        assert!(approx(t.forward(), Vec3::new(-1.0, 0.0, 0.0)));
    }
}
