//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. A tree lives for one decision and is
//! dropped as a whole afterwards.

use engine_core::{ActionId, Game};

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<G> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<G>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<G: Game> MctsTree<G> {
    /// Create a new tree rooted at a copy of `root_state`.
    pub fn new(root_state: G) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Expand one unexplored action of `node_id`.
    ///
    /// Takes the last (highest) unexplored action, applies it to a copy of
    /// the node's state and links the resulting child. Returns `None` when
    /// nothing is left to expand or the node is terminal.
    pub fn expand(&mut self, node_id: NodeId) -> Option<NodeId> {
        let node = self.get_mut(node_id);
        if node.is_terminal {
            return None;
        }
        let action = node.unexplored.pop()?;
        let depth = node.depth;

        let mut state = node.state.clone();
        state.apply_action(action);

        Some(self.add_child(node_id, depth, action, state))
    }

    fn add_child(&mut self, parent_id: NodeId, parent_depth: u32, action: ActionId, state: G) -> NodeId {
        let child = MctsNode::new_child(parent_id, parent_depth, action, state);
        let child_id = self.allocate(child);

        // Add to parent's children
        self.get_mut(parent_id).children.push((action, child_id));

        child_id
    }
}

impl<G> MctsTree<G> {
    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<G> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<G> {
        &mut self.nodes[id.0 as usize]
    }

    fn allocate(&mut self, node: MctsNode<G>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<G>] {
        &self.nodes
    }

    /// Action of the child with the highest UCB score under exploration `c`.
    ///
    /// Ties go to the smallest action id, so the choice does not depend on
    /// expansion order. Every child must have been visited.
    ///
    /// # Panics
    ///
    /// Panics if the node has no children.
    pub fn best_action(&self, node_id: NodeId, c: f64) -> ActionId {
        let node = self.get(node_id);
        assert!(
            !node.children.is_empty(),
            "best_action on node {} without children",
            node_id.0
        );

        let mut best: Option<(ActionId, f64)> = None;
        for &(action, child_id) in &node.children {
            let score = self.get(child_id).ucb_score(Some(node.visit_count), c);
            best = match best {
                Some((best_action, best_score))
                    if best_score > score || (best_score == score && best_action < action) =>
                {
                    Some((best_action, best_score))
                }
                _ => Some((action, score)),
            };
        }

        best.map(|(action, _)| action).unwrap_or_default()
    }

    /// Select the best child of a node using UCB.
    /// Returns `None` if the node has no children.
    pub fn select_child(&self, node_id: NodeId, c: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return None;
        }
        node.child(self.best_action(node_id, c))
    }

    /// Backpropagate a rollout outcome from a node to the root.
    ///
    /// Outcomes are always from the placer's point of view, so the same value
    /// is added at every level.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f64) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.value_sum += value;
            current_id = node.parent;
        }
    }

    /// Per-child statistics of a node, sorted by action.
    pub fn child_stats(&self, node_id: NodeId) -> Vec<ChildStats> {
        let mut stats: Vec<ChildStats> = self
            .get(node_id)
            .children
            .iter()
            .map(|&(action, id)| {
                let child = self.get(id);
                ChildStats {
                    action,
                    visits: child.visit_count,
                    mean_value: child.mean_value(),
                }
            })
            .collect();
        stats.sort_by_key(|s| s.action);
        stats
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
        }
    }
}

/// Visit statistics of one child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildStats {
    pub action: ActionId,
    pub visits: u32,
    pub mean_value: f64,
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
