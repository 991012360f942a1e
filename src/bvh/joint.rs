use glam::{Affine3A, Vec3};
use smallvec::SmallVec;

use crate::bvh::Channel;

/// One node of the motion hierarchy, stored flat in declaration order.
///
/// Parent and child links are indices into the owning clip's joint array
/// rather than owned back-references, which keeps the hierarchy acyclic
/// and makes teardown trivial when a clip is replaced. Declaration order
/// guarantees `parent < index` for every non-root joint, so a single
/// forward pass over the array visits parents before children.
#[derive(Debug, Clone)]
pub struct JointData {
    pub name: String,
    /// Depth-first declaration index; doubles as the arena slot.
    pub index: usize,
    /// Static bone vector relative to the parent joint.
    pub offset: Vec3,
    /// Channel kinds in declared order (at most six).
    pub channels: SmallVec<[Channel; 6]>,
    /// Terminal reference points: each child's offset plus any end-site
    /// offsets, in declaration order.
    pub end_points: Vec<Vec3>,
    /// The joint carries an `End Site` block.
    pub is_end_site: bool,
    /// One channel-value tuple per animation frame; tuple length equals
    /// the channel count.
    pub frames: Vec<Vec<f32>>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl JointData {
    pub(crate) fn new(
        name: String,
        index: usize,
        offset: Vec3,
        channels: SmallVec<[Channel; 6]>,
        parent: Option<usize>,
    ) -> Self {
        Self {
            name,
            index,
            offset,
            channels,
            end_points: Vec::new(),
            is_end_site: false,
            frames: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Local transform for one frame sample: `Translate(offset)` followed
    /// by the channel transforms composed strictly in declared order.
    /// The order is per-joint and varies across files; a fixed XYZ
    /// convention would be incorrect.
    ///
    /// `None` yields the bind-pose local (all channels zero).
    #[must_use]
    pub fn local_matrix(&self, frame: Option<&[f32]>) -> Affine3A {
        let mut m = Affine3A::from_translation(self.offset);
        if let Some(values) = frame {
            for (channel, &value) in self.channels.iter().zip(values) {
                m = m * channel.matrix(value);
            }
        }
        m
    }
}
