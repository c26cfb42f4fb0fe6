//! Undirected graph over `usize` vertex ids with greedy vertex coloring.

use log::debug;
use serde_derive::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors returned by `Graph` operations.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    #[error("node {0} does not exist")]
    NodeNotFound(usize),
    #[error("edge {0}-{1} does not exist")]
    EdgeNotFound(usize, usize),
}

/// An undirected edge. Two edges are equal if they join the same pair of vertices.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        Edge { a, b }
    }

    fn touches(&self, id: usize) -> bool {
        self.a == id || self.b == id
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Edge) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

impl Eq for Edge {}

/// A vertex of a `Graph`. A `color` of 0 means the vertex has not been colored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphNode {
    pub id: usize,
    pub color: usize,
}

/// An undirected graph without self-loops or parallel edges.
///
/// # Examples
///
/// ```
/// use redblack_collections::graph::{Edge, Graph};
///
/// let mut graph = Graph::new();
/// graph.add_multiple_edges(&[Edge::new(1, 2), Edge::new(2, 3), Edge::new(3, 1)]);
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.graph_degree(), 2);
///
/// graph.coloring();
/// let colors: Vec<usize> = graph.nodes().iter().map(|node| node.color).collect();
/// assert_eq!(colors, vec![1, 2, 3]);
/// ```
#[derive(Default)]
pub struct Graph {
    nodes: BTreeMap<usize, GraphNode>,
    adjacency: BTreeMap<usize, Vec<usize>>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Constructs a new, empty `Graph`.
    pub fn new() -> Self {
        Graph {
            nodes: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            edges: Vec::new(),
        }
    }

    /// Returns every vertex in ascending id order.
    pub fn nodes(&self) -> Vec<&GraphNode> {
        self.nodes.values().collect()
    }

    /// Returns every edge in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Adds an uncolored vertex. Returns `None` if the vertex already exists.
    pub fn add_node(&mut self, id: usize) -> Option<&GraphNode> {
        if self.nodes.contains_key(&id) {
            return None;
        }
        self.adjacency.insert(id, Vec::new());
        Some(self.nodes.entry(id).or_insert(GraphNode { id, color: 0 }))
    }

    /// Adds an edge, creating missing endpoints. Returns `false` for self-loops and edges that
    /// already exist in either orientation.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if edge.a == edge.b || self.contains_edge(edge) {
            return false;
        }
        self.add_node(edge.a);
        self.add_node(edge.b);

        self.edges.push(edge);
        self.adjacency.entry(edge.a).or_default().push(edge.b);
        self.adjacency.entry(edge.b).or_default().push(edge.a);
        true
    }

    pub fn add_multiple_edges(&mut self, edges: &[Edge]) {
        for edge in edges {
            self.add_edge(*edge);
        }
    }

    pub fn get_node(&self, id: usize) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    /// Returns the neighbors of a vertex in the order their edges were added.
    pub fn neighbors(&self, id: usize) -> Option<&[usize]> {
        self.adjacency.get(&id).map(|neighbors| neighbors.as_slice())
    }

    pub fn contains_edge(&self, edge: Edge) -> bool {
        self.nodes.contains_key(&edge.a)
            && self.nodes.contains_key(&edge.b)
            && self.edges.contains(&edge)
    }

    fn unlink(&mut self, from: usize, to: usize) {
        if let Some(neighbors) = self.adjacency.get_mut(&from) {
            neighbors.retain(|neighbor| *neighbor != to);
        }
    }

    /// Removes a vertex together with every edge touching it.
    pub fn remove_node(&mut self, id: usize) -> Result<(), GraphError> {
        if self.nodes.remove(&id).is_none() {
            return Err(GraphError::NodeNotFound(id));
        }
        for neighbor in self.adjacency.remove(&id).unwrap_or_default() {
            self.unlink(neighbor, id);
        }
        self.edges.retain(|edge| !edge.touches(id));
        Ok(())
    }

    /// Removes an edge given in either orientation.
    pub fn remove_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        let position = self
            .edges
            .iter()
            .position(|other| *other == edge)
            .ok_or(GraphError::EdgeNotFound(edge.a, edge.b))?;
        self.edges.remove(position);
        self.unlink(edge.a, edge.b);
        self.unlink(edge.b, edge.a);
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_degree(&self, id: usize) -> Result<usize, GraphError> {
        self.adjacency
            .get(&id)
            .map(|neighbors| neighbors.len())
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Returns the largest vertex degree, or 0 for an empty graph.
    pub fn graph_degree(&self) -> usize {
        self.adjacency
            .values()
            .map(|neighbors| neighbors.len())
            .max()
            .unwrap_or(0)
    }

    /// Colors the graph greedily.
    ///
    /// Vertices are visited by descending degree, ties broken by ascending id, and each receives
    /// the smallest positive color not already used by one of its neighbors. Previous colors are
    /// discarded first.
    pub fn coloring(&mut self) {
        for node in self.nodes.values_mut() {
            node.color = 0;
        }

        let mut order: Vec<usize> = self.nodes.keys().cloned().collect();
        order.sort_by(|a, b| self.adjacency[b].len().cmp(&self.adjacency[a].len()));

        let mut max_color = 0;
        for id in order {
            let used: BTreeSet<usize> = self.adjacency[&id]
                .iter()
                .map(|neighbor| self.nodes[neighbor].color)
                .filter(|color| *color != 0)
                .collect();

            let mut color = 1;
            while used.contains(&color) {
                color += 1;
            }
            max_color = max_color.max(color);

            if let Some(node) = self.nodes.get_mut(&id) {
                node.color = color;
            }
        }
        debug!(
            "colored {} nodes with {} colors",
            self.nodes.len(),
            max_color,
        );
    }

    /// Removes every vertex and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.adjacency.clear();
        self.edges.clear();
    }
}
