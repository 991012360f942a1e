//! Transform system.
//!
//! Top-down world-matrix propagation for the scene graph, decoupled from
//! [`Scene`](crate::scene::Scene) so it only borrows the node arena and
//! the root list. Traversal uses an explicit work stack rather than
//! recursion, so hierarchy depth never couples to call depth.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::node::Node;
use crate::scene::NodeKey;

/// Updates world matrices for every node reachable from `roots`,
/// depth-first, parents strictly before children.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeKey, Node>, roots: &[NodeKey]) {
    // Work stack: (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeKey, Affine3A, bool)> = Vec::with_capacity(64);
    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }
    propagate(nodes, &mut stack);
}

/// Updates world matrices for one subtree, reading the parent's current
/// world matrix as the starting point.
pub fn update_subtree(nodes: &mut SlotMap<NodeKey, Node>, root: NodeKey) {
    let Some(node) = nodes.get(root) else {
        return;
    };
    let parent_world = node
        .parent
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    let mut stack = vec![(root, parent_world, true)];
    propagate(nodes, &mut stack);
}

fn propagate(nodes: &mut SlotMap<NodeKey, Node>, stack: &mut Vec<(NodeKey, Affine3A, bool)>) {
    while let Some((key, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(key) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let needs_update = local_changed || parent_changed;

        if needs_update {
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);
        }

        let current_world = node.transform.world_matrix;
        let child_count = node.children.len();

        // Push children in reverse to keep declaration-order traversal.
        for i in (0..child_count).rev() {
            if let Some(node) = nodes.get(key)
                && let Some(&child) = node.children.get(i)
            {
                stack.push((child, current_world, needs_update));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn child_world_combines_parent_translation() {
        let mut nodes: SlotMap<NodeKey, Node> = SlotMap::with_key();

        let mut parent = Node::new("parent");
        parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let parent_key = nodes.insert(parent);

        let mut child = Node::new("child");
        child.transform.position = Vec3::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_key);
        let child_key = nodes.insert(child);
        nodes
            .get_mut(parent_key)
            .unwrap()
            .children
            .push(child_key);

        update_hierarchy(&mut nodes, &[parent_key]);

        let world = nodes.get(child_key).unwrap().transform.world_matrix;
        let pos: Vec3 = world.translation.into();
        assert!((pos - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }
}
