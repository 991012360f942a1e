//! Scene graph: node arena, transform component, world-matrix
//! propagation, skeleton instantiation, and drawable descriptors.
//!
//! - [`Node`]: scene node (hierarchy links + transform + visual)
//! - [`Transform`]: TRS component with cached matrices and dirty checking
//! - [`Scene`]: node arena and root list
//! - [`Skeleton`]: a loaded clip prepared for the scene graph
//! - [`transform_system`]: decoupled top-down propagation pass

pub mod node;
pub mod primitives;
pub mod scene;
pub mod skeleton;
pub mod transform;
pub mod transform_system;
pub mod visual;

pub use node::Node;
pub use scene::Scene;
pub use skeleton::Skeleton;
pub use transform::Transform;
pub use visual::{BoxFit, DrawCall, Drawable, RenderBackend, RenderMode, Visual};

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
}
