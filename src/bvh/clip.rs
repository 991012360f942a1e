use glam::Affine3A;

use crate::bvh::JointData;

/// A fully parsed motion clip: root-reachable joints in declaration order
/// plus the per-frame channel samples each joint carries.
///
/// Invariants upheld by the parser: `frame_count` equals the number of
/// motion lines actually parsed, and every joint holds exactly
/// `frame_count` channel tuples of its own channel count.
#[derive(Debug, Clone)]
pub struct MotionClip {
    pub joints: Vec<JointData>,
    pub frame_count: usize,
    /// Seconds per frame.
    pub frame_time: f32,
}

impl MotionClip {
    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    #[must_use]
    pub fn fps(&self) -> f32 {
        1.0 / self.frame_time
    }

    /// Sum of channel counts over all joints; equals the token count of
    /// every motion line.
    #[must_use]
    pub fn total_channels(&self) -> usize {
        self.joints.iter().map(JointData::channel_count).sum()
    }

    /// Global transforms with all channel values at zero, used for
    /// measurement and normalization.
    #[must_use]
    pub fn bind_pose(&self) -> Vec<Affine3A> {
        self.pose(None)
    }

    /// Global transforms for one stored frame (0-based), in declaration
    /// order. Out-of-range frames fall back to the bind pose.
    #[must_use]
    pub fn global_pose(&self, frame_index: usize) -> Vec<Affine3A> {
        self.pose(Some(frame_index))
    }

    // One forward pass suffices: parent < index in declaration order.
    fn pose(&self, frame: Option<usize>) -> Vec<Affine3A> {
        let mut globals: Vec<Affine3A> = Vec::with_capacity(self.joints.len());
        for joint in &self.joints {
            let tuple = frame
                .and_then(|f| joint.frames.get(f))
                .map(Vec::as_slice);
            let local = joint.local_matrix(tuple);
            let global = match joint.parent {
                Some(p) => globals[p] * local,
                None => local,
            };
            globals.push(global);
        }
        globals
    }

    /// Indented joint tree, one joint per line, each followed by its
    /// frame-0 channel tuple converted to radians.
    #[must_use]
    pub fn hierarchy_report(&self) -> String {
        use std::fmt::Write;

        let mut depths = vec![0_usize; self.joints.len()];
        let mut out = String::new();
        for joint in &self.joints {
            if let Some(p) = joint.parent {
                depths[joint.index] = depths[p] + 1;
            }
            for _ in 0..depths[joint.index] {
                out.push_str("  ");
            }
            out.push_str("---");
            out.push_str(&joint.name);
            if let Some(tuple) = joint.frames.first() {
                out.push_str(" [");
                for (i, &value) in tuple.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{:.3}", value.to_radians());
                }
                out.push(']');
            }
            out.push('\n');
        }
        out
    }

    pub(crate) fn log_info(&self, source: &str) {
        log::info!("loaded motion clip from {source}");
        log::info!(
            "  frames: {}, fps: {:.2}, joints: {}",
            self.frame_count,
            self.fps(),
            self.joint_count()
        );
        for joint in &self.joints {
            log::debug!("  joint: {}", joint.name);
        }
    }
}
