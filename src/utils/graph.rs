use std::collections::{HashMap, VecDeque};

use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
    Direction,
};

use crate::{utils::FeatureTree, BinaryConstraint, ConstraintId, FeatureId, FeatureModel};

/// An edge of a [`FeatureGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FeatureEdge {
    /// The target is a mandatory child of the source.
    Mandatory,
    /// The target is an optional child of the source.
    Optional,
    /// A binary constraint: selecting the source requires the target.
    Requires(ConstraintId),
    /// A binary constraint: source and target exclude each other.
    Excludes(ConstraintId),
}

impl FeatureEdge {
    /// Returns true for parent-child edges.
    pub fn is_structural(&self) -> bool {
        matches!(self, FeatureEdge::Mandatory | FeatureEdge::Optional)
    }
}

/// A graph view of a [`FeatureTree`]: one node per feature, parent-child
/// edges for the structure and extra edges for every constraint that has the
/// shape of a binary requires or excludes relation.
pub struct FeatureGraph {
    graph: DiGraph<FeatureId, FeatureEdge>,
    root_node: NodeIndex,
    nodes: HashMap<FeatureId, NodeIndex, ahash::RandomState>,
}

impl FeatureGraph {
    /// Builds the graph of `tree`. Features that are not attached to the tree
    /// become isolated nodes; constraints that are not binary or refer to
    /// unknown features are left out.
    pub fn from_tree(tree: &FeatureTree) -> Self {
        let mut graph = DiGraph::<FeatureId, FeatureEdge>::default();
        let nodes: HashMap<_, _, ahash::RandomState> = tree
            .features()
            .map(|(id, _)| (id, graph.add_node(id)))
            .collect();

        for (id, feature) in tree.features() {
            for &child in feature.children() {
                let edge = if tree.feature(child).is_mandatory() {
                    FeatureEdge::Mandatory
                } else {
                    FeatureEdge::Optional
                };
                graph.add_edge(nodes[&id], nodes[&child], edge);
            }
        }

        for (constraint_id, constraint) in tree.constraints() {
            let (from, to, edge) = match constraint.as_binary() {
                Some(BinaryConstraint::Requires(from, to)) => {
                    (from, to, FeatureEdge::Requires(constraint_id))
                }
                Some(BinaryConstraint::Excludes(from, to)) => {
                    (from, to, FeatureEdge::Excludes(constraint_id))
                }
                None => continue,
            };
            if let (Some(from), Some(to)) = (tree.lookup(from), tree.lookup(to)) {
                graph.add_edge(nodes[&from], nodes[&to], edge);
            }
        }

        Self {
            root_node: nodes[&tree.root()],
            graph,
            nodes,
        }
    }

    /// Returns the number of parent-child edges.
    pub fn structural_edge_count(&self) -> usize {
        self.graph
            .edge_weights()
            .filter(|edge| edge.is_structural())
            .count()
    }

    /// Returns the node of `feature`.
    pub fn node(&self, feature: FeatureId) -> Option<NodeIndex> {
        self.nodes.get(&feature).copied()
    }

    /// Returns the underlying petgraph graph.
    pub fn graph(&self) -> &DiGraph<FeatureId, FeatureEdge> {
        &self.graph
    }

    /// Returns true if the parent-child edges form a tree rooted at the root
    /// feature: the root has no parent, every other feature has exactly one,
    /// and every feature is reachable from the root.
    pub fn is_tree(&self) -> bool {
        let parents = |node: NodeIndex| {
            self.graph
                .edges_directed(node, Direction::Incoming)
                .filter(|edge| edge.weight().is_structural())
                .count()
        };

        for node in self.graph.node_indices() {
            let expected = if node == self.root_node { 0 } else { 1 };
            if parents(node) != expected {
                return false;
            }
        }

        let mut visited = vec![false; self.graph.node_count()];
        let mut queue = VecDeque::from([self.root_node]);
        visited[self.root_node.index()] = true;
        while let Some(node) = queue.pop_front() {
            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                if !edge.weight().is_structural() || visited[edge.target().index()] {
                    continue;
                }
                visited[edge.target().index()] = true;
                queue.push_back(edge.target());
            }
        }

        visited.into_iter().all(|v| v)
    }

    /// Writes a graphviz graph that represents this instance to the specified
    /// output.
    pub fn graphviz(
        &self,
        f: &mut impl std::io::Write,
        tree: &FeatureTree,
    ) -> Result<(), std::io::Error> {
        let graph = &self.graph;

        write!(f, "digraph {{")?;
        for nx in graph.node_indices() {
            let feature = tree.feature(graph[nx]);
            let style = if feature.is_abstract() { "dashed" } else { "solid" };
            write!(
                f,
                "\"{}\"[shape=box, style={style}, label=\"{} ({})\"];",
                feature.name(),
                feature.name(),
                feature.group()
            )?;

            let mut edges: Vec<_> = graph.edges_directed(nx, Direction::Outgoing).collect();
            edges.sort_by_key(|edge| edge.id());
            for edge in edges {
                let target = tree.feature(graph[edge.target()]).name();
                let (color, label) = match edge.weight() {
                    FeatureEdge::Mandatory => ("black", "mandatory"),
                    FeatureEdge::Optional => ("gray", "optional"),
                    FeatureEdge::Requires(_) => ("blue", "requires"),
                    FeatureEdge::Excludes(_) => ("red", "excludes"),
                };
                write!(
                    f,
                    "\"{}\" -> \"{}\"[color={color}, label=\"{label}\"];",
                    feature.name(),
                    target
                )?;
            }
        }
        write!(f, "}}")
    }
}
