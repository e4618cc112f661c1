use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::classifier::Reachability;
use crate::resource::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub category: Category,
    pub label: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reachability: Option<Reachability>,
}

impl Node {
    pub fn is_public_subnet(&self) -> bool {
        self.reachability == Some(Reachability::Public)
    }
}

/// Undirected link between two node ids.
///
/// `from`/`to` keep the orientation of the traversal that first produced
/// the edge; equality and hashing ignore it.
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    fn key(&self) -> (&str, &str) {
        if self.from <= self.to {
            (self.from.as_str(), self.to.as_str())
        } else {
            (self.to.as_str(), self.from.as_str())
        }
    }

    /// The far end seen from `id`, if `id` is an end.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.from == id {
            Some(self.to.as_str())
        } else if self.to == id {
            Some(self.from.as_str())
        } else {
            None
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub dangling_edges: usize,
    pub per_category: Vec<(Category, usize)>,
    pub public_subnets: usize,
    pub private_subnets: usize,
}

/// Node and edge sets of one topology snapshot.
///
/// Built once by [`crate::builder::GraphBuilder`] and read-only afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopologyGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    #[serde(skip)]
    edge_set: HashSet<Edge>,
}

impl TopologyGraph {
    /// Returns false when a node with this id already exists; the first one stays.
    pub(crate) fn add_node(&mut self, node: Node) -> bool {
        if self.node_index.contains_key(&node.id) {
            return false;
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Returns false when the unordered pair is already present.
    pub(crate) fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let edge = Edge::new(from, to);
        if self.edge_set.contains(&edge) {
            return false;
        }
        self.edge_set.insert(edge.clone());
        self.edges.push(edge);
        true
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edge_set.contains(&Edge::new(a, b))
    }

    pub fn category(&self, id: &str) -> Option<Category> {
        self.node(id).map(|n| n.category)
    }

    pub fn reachability(&self, id: &str) -> Option<Reachability> {
        self.node(id).and_then(|n| n.reachability)
    }

    pub fn nodes_in(&self, category: Category) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |n| n.category == category)
    }

    /// Edges with at least one end outside the node set.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(|e| self.is_dangling(e))
    }

    pub fn is_dangling(&self, edge: &Edge) -> bool {
        !self.contains_node(&edge.from) || !self.contains_node(&edge.to)
    }

    pub fn neighbors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges.iter().filter_map(move |e| e.other(id))
    }

    pub fn stats(&self) -> GraphStats {
        let per_category = Category::ALL
            .iter()
            .map(|&c| (c, self.nodes_in(c).count()))
            .collect();
        let count = |r: Reachability| self.nodes.iter().filter(|n| n.reachability == Some(r)).count();
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            dangling_edges: self.dangling_edges().count(),
            per_category,
            public_subnets: count(Reachability::Public),
            private_subnets: count(Reachability::Private),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
