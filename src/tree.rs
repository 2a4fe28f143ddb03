//! Bounded game-tree exploration.
//!
//! [`BoardTree::build`] expands the root depth-first, at most `depth` plies
//! deep and at most `breadth` children per node (the first legal actions in
//! enumeration order). A successor whose board was already explored, or is
//! still waiting on the frontier, is not added again, so transpositions and
//! forfeit cycles are expanded once per search. Nodes at the depth limit,
//! terminal nodes and nodes whose successors were all duplicates become
//! leaves.
//!
//! Nodes live in an arena and refer to their parent by index. Every node owns
//! its own board, so nothing is shared between branches.

use std::collections::HashSet;

use crate::action::Action;
use crate::board::{Board, Side};
use crate::evaluation::{EvalWeights, evaluate};
use crate::game::GameState;
use crate::search::{SearchLimits, SearchResult, SearchStats};

/// Index of a node in a [`BoardTree`].
pub type NodeId = usize;

/// A state in the tree and how it was reached.
#[derive(Clone, Debug)]
pub struct Node {
    pub state: GameState,
    pub parent: Option<NodeId>,
    /// Action played in the parent to reach this node; `None` for the root.
    pub action: Option<Action>,
    pub depth: usize,
}

/// The explored tree of one search call.
#[derive(Clone, Debug)]
pub struct BoardTree {
    nodes: Vec<Node>,
    leaves: Vec<NodeId>,
    truncated: bool,
}

impl BoardTree {
    /// The root's id.
    pub const ROOT: NodeId = 0;

    /// Explore from `root` within the given bounds.
    pub fn build(root: GameState, depth: usize, breadth: usize, limits: &SearchLimits) -> BoardTree {
        let mut explored: HashSet<Board> = HashSet::new();
        let mut frontier: HashSet<Board> = HashSet::new();
        frontier.insert(root.board().clone());

        let mut nodes = vec![Node {
            state: root,
            parent: None,
            action: None,
            depth: 0,
        }];
        let mut leaves = Vec::new();
        let mut truncated = false;
        let mut stack = vec![Self::ROOT];

        while let Some(id) = stack.pop() {
            let node = &nodes[id];
            let board = node.state.board();
            frontier.remove(board);
            explored.insert(board.clone());

            if node.depth >= depth || node.state.is_terminal() {
                leaves.push(id);
                continue;
            }
            if limits.exhausted(nodes.len()) {
                truncated = true;
                leaves.push(id);
                continue;
            }

            let mut children = Vec::new();
            for action in node.state.legal_actions().iter().take(breadth) {
                let child = node.state.successor(action);
                if explored.contains(child.board()) || frontier.contains(child.board()) {
                    continue;
                }
                frontier.insert(child.board().clone());
                children.push(Node {
                    state: child,
                    parent: Some(id),
                    action: Some(*action),
                    depth: node.depth + 1,
                });
            }

            // Nothing new below, e.g. the side to move can only forfeit
            if children.is_empty() {
                leaves.push(id);
                continue;
            }

            // Reversed so the first action is popped first
            let start = nodes.len();
            nodes.extend(children);
            stack.extend((start..nodes.len()).rev());
        }

        BoardTree {
            nodes,
            leaves,
            truncated,
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaves in the order they were reached.
    #[inline]
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// True if the budget stopped expansion early.
    #[inline]
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Side to move at the root.
    pub fn root_side(&self) -> Side {
        self.nodes[Self::ROOT].state.to_move()
    }

    /// Node ids from the root down to `id`, both included.
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// The root action leading towards `id`; `None` for the root itself.
    pub fn first_action(&self, id: NodeId) -> Option<Action> {
        self.path(id).get(1).and_then(|&child| self.nodes[child].action)
    }

    /// The leaf with the highest evaluation for the root side, with its
    /// value. The first leaf wins ties.
    pub fn best_leaf(&self, weights: &EvalWeights) -> Option<(NodeId, f64)> {
        let side = self.root_side();
        let mut best: Option<(NodeId, f64)> = None;
        for &id in &self.leaves {
            let value = evaluate(self.nodes[id].state.board(), side, weights);
            if best.is_none_or(|(_, v)| value > v) {
                best = Some((id, value));
            }
        }
        best
    }

    /// The root action on the path to the best leaf.
    pub fn best_action(&self, weights: &EvalWeights) -> Option<Action> {
        self.best_leaf(weights).and_then(|(id, _)| self.first_action(id))
    }
}

/// Build a bounded tree from `state` and pick the root action leading to
/// its best leaf.
///
/// The action is `None` when the root itself is the best leaf, e.g. for a
/// terminal root or when every successor was a duplicate.
pub fn tree_search(
    state: &GameState,
    depth: usize,
    breadth: usize,
    weights: &EvalWeights,
    limits: &SearchLimits,
) -> SearchResult {
    let tree = BoardTree::build(state.clone(), depth, breadth, limits);
    let best = tree.best_leaf(weights);
    let action = best.and_then(|(id, _)| tree.first_action(id));
    let value = match (action, best) {
        (Some(_), Some((_, v))) => v,
        _ => f64::NEG_INFINITY,
    };

    let stats = SearchStats {
        nodes: tree.len(),
        leaves: tree.leaves().len(),
        cutoffs: 0,
        truncated: tree.truncated(),
    };
    log::debug!(
        "tree depth {depth} breadth {breadth}: {} nodes, {} leaves{}, chose {}",
        stats.nodes,
        stats.leaves,
        if stats.truncated { ", truncated" } else { "" },
        action.unwrap_or(Action::Forfeit),
    );

    SearchResult {
        action,
        value,
        stats,
    }
}
