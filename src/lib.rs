//! Marrow — a skeletal motion-capture playback engine.
//!
//! Parses hierarchical motion-capture text (BVH), reconstructs the joint
//! hierarchy as a scene graph, and plays the per-frame channel data back
//! through a fixed-rate tick loop with a cooperative task scheduler.
//! Rendering, windowing and input stay outside: the core consumes clock
//! values and commands, and produces transform matrices and drawable
//! descriptors.

pub mod bvh;
pub mod engine;
pub mod errors;
pub mod playback;
pub mod scene;
pub mod sched;

pub use bvh::{Channel, JointData, MotionClip};
pub use engine::Engine;
pub use errors::{MarrowError, Result};
pub use playback::Playback;
pub use scene::{
    BoxFit, DrawCall, Drawable, Node, NodeKey, RenderBackend, RenderMode, Scene, Skeleton,
    Transform, Visual,
};
pub use sched::{DropIn, Scheduler, Step, Task, Wait};
