//! Motion-hierarchy (BVH) parsing and clip data model.
//!
//! - [`Channel`]: one animatable degree of freedom
//! - [`JointData`]: one joint of the parsed hierarchy, stored flat in
//!   declaration order
//! - [`MotionClip`]: the full parse result (joints + frame samples)
//! - [`parse_file`] / [`parse_str`]: the state-machine parser

pub mod channel;
pub mod clip;
pub mod joint;
pub mod parser;

pub use channel::Channel;
pub use clip::MotionClip;
pub use joint::JointData;
pub use parser::{parse_file, parse_str};
