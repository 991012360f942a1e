use std::sync::Arc;

use glam::{Affine3A, Vec3};

use crate::bvh::MotionClip;
use crate::scene::node::Node;
use crate::scene::visual::{BoxFit, Visual};
use crate::scene::{NodeKey, Scene};

/// A loaded motion clip prepared for the scene graph.
///
/// Computed once per load from the bind pose (all channel values zero):
/// the root normalization scale, and per joint the fitted bone box and
/// the line segments to its terminal reference points. After
/// [`Skeleton::instantiate`], joint `i` maps to `bones[i]` in the scene.
#[derive(Debug, Clone)]
pub struct Skeleton {
    clip: MotionClip,
    root_scale: f32,
    fits: Vec<BoxFit>,
    segments: Vec<Arc<Vec<[Vec3; 2]>>>,
    bones: Vec<NodeKey>,
}

impl Skeleton {
    /// Measures the parsed clip and derives its render geometry.
    #[must_use]
    pub fn from_clip(clip: MotionClip) -> Self {
        let root_scale = normalization_scale(&clip);

        let fits = clip
            .joints
            .iter()
            .map(|j| fit_box(&j.end_points))
            .collect();
        let segments = clip
            .joints
            .iter()
            .map(|j| {
                Arc::new(
                    j.end_points
                        .iter()
                        .map(|&p| [Vec3::ZERO, p])
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        Self {
            clip,
            root_scale,
            fits,
            segments,
            bones: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn clip(&self) -> &MotionClip {
        &self.clip
    }

    /// Uniform scale applied at the root so skeletons of arbitrary source
    /// units render at height 2.
    #[inline]
    #[must_use]
    pub fn root_scale(&self) -> f32 {
        self.root_scale
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.clip.joint_count()
    }

    /// Fitted bone box for one joint, or `None` out of range.
    #[must_use]
    pub fn box_fit(&self, joint: usize) -> Option<BoxFit> {
        self.fits.get(joint).copied()
    }

    /// Node keys per joint, in declaration order. Empty before
    /// [`Skeleton::instantiate`].
    #[must_use]
    pub fn bones(&self) -> &[NodeKey] {
        &self.bones
    }

    /// Creates one scene node per joint, wires the hierarchy, and applies
    /// the bind pose. Returns the root node key, or `None` for a clip
    /// with no joints (a parsed clip always carries at least the root,
    /// but a hand-built one may not).
    pub fn instantiate(&mut self, scene: &mut Scene) -> Option<NodeKey> {
        self.bones.clear();
        for i in 0..self.clip.joints.len() {
            let local = self.joint_local(i, None);
            let joint = &self.clip.joints[i];

            let mut node = Node::with_visual(
                &joint.name,
                Visual::Bone {
                    segments: Arc::clone(&self.segments[i]),
                    fit: self.fits[i],
                },
            );
            node.transform.set_local_matrix(local);

            let key = match joint.parent {
                Some(p) => scene.add_to_parent(node, self.bones[p]),
                None => scene.add_node(node),
            };
            self.bones.push(key);
        }
        self.bones.first().copied()
    }

    /// Writes every joint's local transform for the given frame index
    /// (1-based while playing). Frame 0 or out-of-range applies the bind
    /// pose.
    pub fn apply_frame(&self, scene: &mut Scene, frame_index: usize) {
        let frame = frame_index
            .checked_sub(1)
            .filter(|&f| f < self.clip.frame_count);
        for (i, &bone) in self.bones.iter().enumerate() {
            let local = self.joint_local(i, frame);
            if let Some(node) = scene.get_node_mut(bone) {
                node.transform.set_local_matrix(local);
            }
        }
    }

    /// Channel-composed local for one joint; the root carries the
    /// normalization scale.
    fn joint_local(&self, index: usize, frame: Option<usize>) -> Affine3A {
        let joint = &self.clip.joints[index];
        let tuple = frame.and_then(|f| joint.frames.get(f)).map(Vec::as_slice);
        let local = joint.local_matrix(tuple);
        if joint.parent.is_none() {
            Affine3A::from_scale(Vec3::splat(self.root_scale)) * local
        } else {
            local
        }
    }
}

/// Skeleton height from the bind pose: min/max world Y over end-site
/// joints, sampling both the joint origin and each terminal reference
/// point. Height maps to root scale `2 / height`.
fn normalization_scale(clip: &MotionClip) -> f32 {
    let bind = clip.bind_pose();

    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for joint in &clip.joints {
        if !joint.is_end_site {
            continue;
        }
        let global = bind[joint.index];
        let origin_y = global.translation.y;
        min_y = min_y.min(origin_y);
        max_y = max_y.max(origin_y);
        for &p in &joint.end_points {
            let y = global.transform_point3(p).y;
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    let height = max_y - min_y;
    if height.is_finite() && height > f32::EPSILON {
        2.0 / height
    } else {
        log::warn!("degenerate skeleton height ({height}); skipping normalization");
        1.0
    }
}

/// Fits a bone box to a joint's terminal reference points: independent
/// per-axis magnitudes clamped to the minimum thickness; the axis with
/// the largest combined extent keeps its measured size while the other
/// two are forced to a uniform thickness proportional to it.
fn fit_box(end_points: &[Vec3]) -> BoxFit {
    let mut neg = Vec3::splat(BoxFit::MIN_THICKNESS);
    let mut pos = Vec3::splat(BoxFit::MIN_THICKNESS);
    for p in end_points {
        neg = neg.max(-*p);
        pos = pos.max(*p);
    }

    let extent = neg + pos;
    let max_extent = extent.max_element();
    let thickness = BoxFit::MIN_THICKNESS * max_extent / 0.5;

    if max_extent == extent.x {
        neg = Vec3::new(neg.x, thickness, thickness);
        pos = Vec3::new(pos.x, thickness, thickness);
    } else if max_extent == extent.y {
        neg = Vec3::new(thickness, neg.y, thickness);
        pos = Vec3::new(thickness, pos.y, thickness);
    } else {
        neg = Vec3::new(thickness, thickness, neg.z);
        pos = Vec3::new(thickness, thickness, pos.z);
    }

    BoxFit { neg, pos }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_box_keeps_dominant_axis() {
        let fit = fit_box(&[Vec3::new(0.0, 2.0, 0.0)]);
        // y extent 2.05 dominates; thickness = 0.05 * 2.05 / 0.5
        let thickness = 0.05 * 2.05 / 0.5;
        assert!((fit.pos.y - 2.0).abs() < 1e-6);
        assert!((fit.neg.y - 0.05).abs() < 1e-6);
        assert!((fit.pos.x - thickness).abs() < 1e-6);
        assert!((fit.neg.z - thickness).abs() < 1e-6);
    }

    #[test]
    fn fit_box_clamps_to_minimum() {
        // No end points: every extent is the 0.1 minimum, x wins the tie
        // and keeps its clamped thickness; the others shrink to 0.01.
        let fit = fit_box(&[]);
        assert!((fit.neg.x - 0.05).abs() < 1e-6);
        assert!((fit.pos.x - 0.05).abs() < 1e-6);
        assert!((fit.neg.y - 0.01).abs() < 1e-6);
        assert!((fit.pos.z - 0.01).abs() < 1e-6);
    }
}
