use glam::{Mat4, Quat, Vec3};

/// Right-handed perspective camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera at `eye` looking at the origin with a vertical fov in degrees.
    pub fn looking_at_origin(eye: Vec3, fovy_degrees: f32) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy_radians: fovy_degrees.to_radians(),
            znear: 0.1,
            zfar: 100.0,
        }
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, aspect.max(1e-3), self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Used by the ray-marching scene pass to turn clip coordinates back into
    /// world-space rays.
    pub fn inverse_view_projection(&self, aspect: f32) -> Mat4 {
        self.view_projection(aspect).inverse()
    }
}

/// Rotate `base_eye` about the vertical axis through `target` by `angle`.
#[inline]
pub fn orbit_y(base_eye: Vec3, target: Vec3, angle: f32) -> Vec3 {
    target + Quat::from_rotation_y(angle) * (base_eye - target)
}
