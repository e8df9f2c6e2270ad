//! MCTS tree node representation.
//!
//! Each node owns the game state reached by taking an action from its parent,
//! along with the visit statistics used for UCB selection. Every legal action
//! of that state is either still unexplored or already has a child node.

use engine_core::{ActionId, Game};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode<G> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Action that led to this node from parent. Meaningless for the root.
    pub action: ActionId,

    /// Game state at this node
    pub state: G,

    /// Number of actions between the search root and this node
    pub depth: u32,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Sum of rollout outcomes backpropagated through this node.
    /// Q = value_sum / visit_count
    pub value_sum: f64,

    /// Whether the state is terminal (board complete)
    pub is_terminal: bool,

    /// Legal actions without a child yet, ascending.
    /// Expansion pops from the back. Terminal nodes keep theirs but are
    /// never expanded.
    pub unexplored: Vec<ActionId>,

    /// Children: Vec of (action, NodeId) pairs, in expansion order.
    pub children: Vec<(ActionId, NodeId)>,
}

impl<G: Game> MctsNode<G> {
    /// Create a new root node.
    pub fn new_root(state: G) -> Self {
        Self::from_state(NodeId::NONE, 0, 0, state)
    }

    /// Create a new child node one action below a parent at `parent_depth`.
    pub fn new_child(parent: NodeId, parent_depth: u32, action: ActionId, state: G) -> Self {
        Self::from_state(parent, action, parent_depth + 1, state)
    }

    fn from_state(parent: NodeId, action: ActionId, depth: u32, state: G) -> Self {
        let is_terminal = state.is_terminal();
        let unexplored = state.legal_actions();

        Self {
            parent,
            action,
            state,
            depth,
            visit_count: 0,
            value_sum: 0.0,
            is_terminal,
            unexplored,
            children: Vec::new(),
        }
    }
}

impl<G> MctsNode<G> {
    /// Calculate mean value Q = value_sum / visit_count.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / f64::from(self.visit_count)
        }
    }

    /// UCB1 score of this node as seen from its parent.
    ///
    /// `Q + c * sqrt(2 ln(N_parent) / N)`. Without a parent the score is
    /// pure exploitation. The node must have been visited at least once.
    #[inline]
    pub fn ucb_score(&self, parent_visits: Option<u32>, c: f64) -> f64 {
        debug_assert!(self.visit_count > 0, "UCB of an unvisited node");

        let q = self.mean_value();
        match parent_visits {
            Some(n) => {
                let visits = f64::from(self.visit_count);
                q + c * (2.0 * f64::from(n).ln() / visits).sqrt()
            }
            None => q,
        }
    }

    /// Whether every legal action already has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.unexplored.is_empty()
    }

    /// Check if selection stops here (terminal or still expandable).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_terminal || !self.is_fully_expanded()
    }

    /// Child reached by `action`, if it has been expanded.
    pub fn child(&self, action: ActionId) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, id)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_jigsaw::{State, FULL_BOARD, SKIP_ACTION};

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = MctsNode::new_root(State::new());

        assert!(node.parent.is_none());
        assert_eq!(node.depth, 0);
        assert_eq!(node.visit_count, 0);
        assert!(!node.is_terminal);
        assert!(node.children.is_empty());
        assert_eq!(node.unexplored, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_terminal_node_keeps_legal_actions() {
        let state = State::with_occupancy(FULL_BOARD).unwrap();
        let node = MctsNode::new_root(state);

        assert!(node.is_terminal);
        assert_eq!(node.unexplored, state.legal_actions());
        assert_eq!(node.unexplored, vec![0, 1, 2, 3, 4, 5]);
        assert!(!node.is_fully_expanded());
        assert!(node.is_leaf());
    }

    #[test]
    fn test_new_child() {
        let state = State::with_piece(0, 4).unwrap();
        let node = MctsNode::new_child(NodeId(3), 2, 7, state);

        assert_eq!(node.parent, NodeId(3));
        assert_eq!(node.action, 7);
        assert_eq!(node.depth, 3);
        assert_eq!(node.unexplored.last(), Some(&SKIP_ACTION));
    }

    #[test]
    fn test_mean_value() {
        let mut node = MctsNode::new_root(State::new());

        // Unvisited
        assert!(node.mean_value().abs() < 1e-12);

        // After visits
        node.visit_count = 4;
        node.value_sum = 2.0;
        assert!((node.mean_value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ucb_score() {
        let mut node = MctsNode::new_root(State::new());
        node.visit_count = 4;
        node.value_sum = 2.0;

        // Q + c * sqrt(2 ln(10) / 4)
        let expected = 0.5 + (2.0 * 10f64.ln() / 4.0).sqrt();
        assert!((node.ucb_score(Some(10), 1.0) - expected).abs() < 1e-12);

        // c = 0 and no parent are both pure exploitation
        assert!((node.ucb_score(Some(10), 0.0) - 0.5).abs() < 1e-12);
        assert!((node.ucb_score(None, 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ucb_with_single_parent_visit_is_exploitation() {
        let mut node = MctsNode::new_root(State::new());
        node.visit_count = 1;
        node.value_sum = 1.0;
        // ln(1) = 0
        assert!((node.ucb_score(Some(1), 5.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_leaf() {
        let mut node = MctsNode::new_root(State::new());

        // Unexplored actions remain
        assert!(node.is_leaf());

        node.unexplored.clear();
        node.children.push((0, NodeId(1)));
        assert!(!node.is_leaf());
        assert_eq!(node.child(0), Some(NodeId(1)));
        assert_eq!(node.child(1), None);
    }
}
