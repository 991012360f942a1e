use slotmap::SlotMap;

use crate::scene::node::Node;
use crate::scene::transform_system;
use crate::scene::NodeKey;

/// Scene graph container.
///
/// Pure data layer: a node arena plus the root list. The per-tick
/// propagation pass lives in [`transform_system`] so callers can borrow
/// only what they need.
pub struct Scene {
    pub nodes: SlotMap<NodeKey, Node>,
    pub roots: Vec<NodeKey>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    /// Adds a node at the root level.
    pub fn add_node(&mut self, node: Node) -> NodeKey {
        let key = self.nodes.insert(node);
        self.roots.push(key);
        key
    }

    /// Adds a node as a child of `parent`.
    pub fn add_to_parent(&mut self, child: Node, parent: NodeKey) -> NodeKey {
        let key = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(key);
        }
        if let Some(c) = self.nodes.get_mut(key) {
            c.parent = Some(parent);
        }
        key
    }

    /// Re-parents `child` under `parent`, detaching it from its previous
    /// parent or the root list.
    pub fn attach(&mut self, child: NodeKey, parent: NodeKey) {
        if child == parent {
            log::warn!("cannot attach node to itself");
            return;
        }

        // Detach from old
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.roots.iter().position(|&x| x == child) {
            self.roots.remove(i);
        }

        // Attach to new
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        } else {
            log::error!("parent node not found during attach");
            self.roots.push(child);
            return;
        }

        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, key: NodeKey) {
        let children = if let Some(node) = self.nodes.get(key) {
            node.children.clone()
        } else {
            return;
        };

        for child in children {
            self.remove_node(child);
        }

        let parent = self.nodes.get(key).and_then(|n| n.parent);
        if let Some(p) = parent {
            if let Some(node) = self.nodes.get_mut(p)
                && let Some(i) = node.children.iter().position(|&x| x == key)
            {
                node.children.remove(i);
            }
        } else if let Some(i) = self.roots.iter().position(|&x| x == key) {
            self.roots.remove(i);
        }

        self.nodes.remove(key);
    }

    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Updates world matrices for the whole scene, top-down. Must run
    /// once per tick before any draw reads a world matrix.
    pub fn update_world_matrices(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.roots);
    }

    /// Updates world matrices for one subtree only.
    pub fn update_subtree(&mut self, root: NodeKey) {
        transform_system::update_subtree(&mut self.nodes, root);
    }

    /// One fixed-tick physics step over every node (velocity, then
    /// position).
    pub fn integrate_physics(&mut self, dt: f32) {
        for (_key, node) in &mut self.nodes {
            node.transform.integrate(dt);
        }
    }
}
