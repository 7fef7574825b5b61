/// Camera: perspective camera driven by the caller.
///
/// Stores a view matrix and the perspective parameters instead of a
/// baked projection matrix, so the culler can rebuild the projection
/// with its own far plane every frame. The caller owns the camera and
/// passes it to `FrustumCuller::cull()`.

use glam::{Mat4, Vec3};

/// Perspective camera (right-handed, looking down -Z in view space).
#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    position: Vec3,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    /// Create a perspective camera at the origin looking down -Z.
    ///
    /// # Arguments
    ///
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect` - Width / height
    /// * `near`, `far` - Clip distances (both > 0, near < far)
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            view_matrix: Mat4::IDENTITY,
            position: Vec3::ZERO,
            fov_y,
            aspect,
            near,
            far,
        }
    }

    /// Place the camera at `eye`, looking at `target`.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.view_matrix = Mat4::look_at_rh(eye, target, up);
        self.position = eye;
    }

    // ===== GETTERS =====

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// World-space eye position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    /// The camera's own far plane (the culler substitutes its override).
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Projection matrix using the camera's own far plane.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_with_far(self.far)
    }

    /// Projection matrix with `far` substituted for the camera's far plane.
    pub fn projection_with_far(&self, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, far)
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix
    }

    // ===== SETTERS =====

    /// Set the view matrix directly. The eye position is recovered
    /// from the inverse view.
    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
        self.position = matrix.inverse().transform_point3(Vec3::ZERO);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn set_fov_y(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
