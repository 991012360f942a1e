use glam::{Affine3A, EulerRot, Mat4, Quat, Vec3};

/// Transform component.
///
/// Wraps a node's position, rotation, scale (TRS) together with matrix
/// caching and shadow-state dirty checking. Rotation is stored as Euler
/// angles in radians and composed `Rz * Ry * Rx`.
///
/// Skeleton joints bypass TRS entirely: their locals are channel-composed
/// and written through [`Transform::set_local_matrix`], which overrides
/// the TRS fields until [`Transform::clear_local_override`] is called.
///
/// The cached world matrix is only valid after the current tick's
/// propagation pass; reading it earlier is a programming error, not a
/// runtime fault.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied as `Rz * Ry * Rx`.
    pub rotation: Vec3,
    pub scale: Vec3,

    /// Integrated into `position` once per fixed tick (decorative drop
    /// physics only; not a general dynamics solver).
    pub velocity: Vec3,
    pub acceleration: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    // Shadow state for dirty checking
    last_position: Vec3,
    last_rotation: Vec3,
    last_scale: Vec3,
    force_update: bool,
    matrix_override: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,

            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Vec3::ZERO,
            last_scale: Vec3::ONE,
            force_update: true,
            matrix_override: false,
        }
    }

    /// Checks and updates the local matrix. Returns whether it changed.
    ///
    /// While a local-matrix override is active, TRS fields are ignored and
    /// the pending-change flag set by [`Transform::set_local_matrix`] is
    /// consumed instead.
    pub fn update_local_matrix(&mut self) -> bool {
        if self.matrix_override {
            let changed = self.force_update;
            self.force_update = false;
            return changed;
        }

        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix = Affine3A::from_scale_rotation_translation(
                self.scale,
                Quat::from_euler(
                    EulerRot::ZYX,
                    self.rotation.z,
                    self.rotation.y,
                    self.rotation.x,
                ),
                self.position,
            );

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// Overrides the local matrix directly (skeleton frame application).
    /// TRS fields stop contributing until the override is cleared.
    pub fn set_local_matrix(&mut self, mat: Affine3A) {
        if !self.matrix_override || self.local_matrix != mat {
            self.force_update = true;
        }
        self.local_matrix = mat;
        self.matrix_override = true;
    }

    /// Drops an active local-matrix override; the TRS fields take effect
    /// again on the next update.
    pub fn clear_local_override(&mut self) {
        self.matrix_override = false;
        self.force_update = true;
    }

    /// Semi-implicit Euler step: velocity first, then position.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }

    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Vec3::new(x, y, z);
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    /// World matrix for CPU-side logic.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    /// World matrix as `Mat4`, for the renderer boundary.
    #[inline]
    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    /// Written by the propagation pass.
    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    /// Forces a recompose/repropagation on the next update, keeping any
    /// active matrix override.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
