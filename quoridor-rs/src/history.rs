use std::fmt;

use petgraph::{stable_graph::StableDiGraph, visit::EdgeRef, Direction};
use quoridor_game_types::GameState;
use text_trees::StringTreeNode;
use tracing::debug;

use crate::error::HistoryError;

type HistoryIndexType = u32;
type NodeIndex = petgraph::graph::NodeIndex<HistoryIndexType>;

/// Stable handle to a node in a [HistoryTree]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NodeIndex);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0.index()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0.index())
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        NodeId(NodeIndex::new(index))
    }
}

/// Every state a match has been in, as a tree rooted at the state the match started from.
///
/// Nodes are never removed. Going back to an earlier node and playing on grows a new branch
/// next to the old one. The edge weight is the child's position among its siblings.
#[derive(Debug, Clone)]
pub struct HistoryTree {
    graph: StableDiGraph<GameState, usize, HistoryIndexType>,
    root: NodeIndex,
    current: NodeIndex,
}

impl HistoryTree {
    pub fn new(root_state: GameState) -> Self {
        let mut graph = StableDiGraph::default();
        let root = graph.add_node(root_state);

        Self {
            graph,
            root,
            current: root,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(self.root)
    }

    pub fn current(&self) -> NodeId {
        NodeId(self.current)
    }

    pub fn current_state(&self) -> &GameState {
        &self.graph[self.current]
    }

    pub fn state(&self, id: NodeId) -> Option<&GameState> {
        self.graph.node_weight(id.0)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Always false, the root can't be removed
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Record `state` as a child of the current node and move there.
    ///
    /// If the current node already has a child equal to `state` that child is reused, taking
    /// on the new state's turn record, instead of growing a duplicate sibling.
    pub fn append(&mut self, state: GameState) -> NodeId {
        let existing = self
            .child_indexes(self.current)
            .into_iter()
            .find(|child| self.graph[*child] == state);

        let node = match existing {
            Some(child) => {
                debug!(node = child.index(), "Reusing existing history node");
                self.graph[child] = state;
                child
            }
            None => {
                let position = self.graph.edges(self.current).count();
                let child = self.graph.add_node(state);
                self.graph.add_edge(self.current, child, position);
                child
            }
        };

        self.current = node;
        NodeId(node)
    }

    /// Move the current pointer to `id`, which can be anywhere in the tree
    pub fn navigate(&mut self, id: NodeId) -> Result<&GameState, HistoryError> {
        if !self.graph.contains_node(id.0) {
            return Err(HistoryError::UnknownNode(id));
        }

        self.current = id.0;
        Ok(&self.graph[id.0])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.graph
            .neighbors_directed(id.0, Direction::Incoming)
            .next()
            .map(NodeId)
    }

    /// Children of `id` in the order they were first added
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.child_indexes(id.0).into_iter().map(NodeId).collect()
    }

    fn child_indexes(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges(node)
            .map(|edge| (*edge.weight(), edge.target()))
            .collect();
        edges.sort_unstable_by_key(|(position, _)| *position);

        edges.into_iter().map(|(_, target)| target).collect()
    }

    /// The nodes from the root down to `id`, both included
    pub fn route_to(&self, id: NodeId) -> Result<Vec<NodeId>, HistoryError> {
        if !self.graph.contains_node(id.0) {
            return Err(HistoryError::UnknownNode(id));
        }

        let mut route = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            route.push(parent);
            current = parent;
        }
        route.reverse();

        Ok(route)
    }

    /// Every node with the description of the turn that led to it, the current node marked
    /// with a `*`
    pub fn to_text_tree(&self) -> String {
        format!("{}", self.text_tree_node(self.root))
    }

    fn text_tree_node(&self, node: NodeIndex) -> StringTreeNode {
        let marker = if node == self.current { " *" } else { "" };
        let mut tree_node = StringTreeNode::new(format!(
            "{} {}{}",
            NodeId(node),
            self.graph[node].description(),
            marker
        ));

        for child in self.child_indexes(node) {
            tree_node.push_node(self.text_tree_node(child));
        }

        tree_node
    }
}
