use std::sync::Arc;

use glam::{Affine3A, Mat4, Vec3};

/// Render-mode selector for skeleton drawables: line skeleton or
/// oriented bone boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Lines,
    Boxes,
}

/// Per-axis half-extents of a bone's fitted box, split into independent
/// negative and positive magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxFit {
    pub neg: Vec3,
    pub pos: Vec3,
}

impl BoxFit {
    /// Minimum half-extent per axis and sign.
    pub const MIN_THICKNESS: f32 = 0.05;

    #[must_use]
    pub fn minimal() -> Self {
        Self {
            neg: Vec3::splat(Self::MIN_THICKNESS),
            pos: Vec3::splat(Self::MIN_THICKNESS),
        }
    }

    /// Correction applied to a unit cube so the box spans `[-neg, pos]`
    /// per axis: recenter, then stretch.
    #[must_use]
    pub fn fit_matrix(&self) -> Affine3A {
        let size = self.neg + self.pos;
        let center = (self.pos - self.neg) * 0.5;
        Affine3A::from_translation(center) * Affine3A::from_scale(size)
    }
}

impl Default for BoxFit {
    fn default() -> Self {
        Self::minimal()
    }
}

/// What a node is, structurally. The draw pass flattens this into a
/// [`Drawable`] according to the active [`RenderMode`] — a tagged variant
/// the renderer switches on, not virtual dispatch.
#[derive(Debug, Clone, Default)]
pub enum Visual {
    #[default]
    None,
    /// Static line set (ground grid, axis gizmo).
    LineSet(Arc<Vec<[Vec3; 2]>>),
    /// One skeleton joint: segments to each terminal reference point,
    /// plus the fitted box for oriented-box rendering.
    Bone {
        segments: Arc<Vec<[Vec3; 2]>>,
        fit: BoxFit,
    },
}

/// Drawable descriptor the renderer collaborator consumes. Each variant
/// carries only the data it needs; the model matrix lives on the
/// [`DrawCall`].
#[derive(Debug, Clone)]
pub enum Drawable {
    /// Line segments in the node's local space.
    Lines(Arc<Vec<[Vec3; 2]>>),
    /// A unit cube; the model matrix already carries the box fit.
    Box,
}

#[derive(Debug, Clone)]
pub struct DrawCall {
    pub model: Mat4,
    pub drawable: Drawable,
}

/// Renderer collaborator. The core emits draw calls; it never performs
/// GPU work itself.
pub trait RenderBackend {
    fn draw(&mut self, call: DrawCall);
}
