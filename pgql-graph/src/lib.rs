//! A small in-memory [`pgql_api::HostGraph`] implementation.
//!
//! This crate exists for tests and as a runnable reference; the query
//! engine treats the host graph container as an external collaborator, so
//! nothing here grows query logic of its own.

use std::collections::HashMap;

use pgql_api::{AttributeValue, EdgeId, EdgeRef, HostGraph, NodeId};

#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    node_ids: Vec<NodeId>,
    node_attrs: HashMap<NodeId, HashMap<String, AttributeValue>>,
    out_adjacency: HashMap<NodeId, Vec<EdgeRef>>,
    edge_attrs: HashMap<(NodeId, NodeId, EdgeId), HashMap<String, AttributeValue>>,
    next_edge_id: EdgeId,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node` if it hasn't been seen yet. Safe to call more than
    /// once with the same id.
    pub fn add_node(&mut self, node: NodeId) {
        if !self.node_attrs.contains_key(&node) {
            self.node_ids.push(node);
            self.node_attrs.insert(node, HashMap::new());
            self.out_adjacency.entry(node).or_default();
        }
    }

    pub fn set_node_attribute(
        &mut self,
        node: NodeId,
        key: impl Into<String>,
        value: AttributeValue,
    ) {
        self.add_node(node);
        self.node_attrs.get_mut(&node).unwrap().insert(key.into(), value);
    }

    /// Adds a directed edge `src -> dst`, returning the `EdgeRef` so the
    /// caller can attach attributes. Both endpoints are registered as
    /// nodes if not already present. Parallel edges between the same
    /// ordered pair are allowed and each gets a distinct `EdgeId`.
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId) -> EdgeRef {
        self.add_node(src);
        self.add_node(dst);
        let key = self.next_edge_id;
        self.next_edge_id += 1;
        let edge = EdgeRef { src, dst, key };
        self.out_adjacency.entry(src).or_default().push(edge);
        edge
    }

    pub fn set_edge_attribute(
        &mut self,
        edge: EdgeRef,
        key: impl Into<String>,
        value: AttributeValue,
    ) {
        self.edge_attrs
            .entry((edge.src, edge.dst, edge.key))
            .or_default()
            .insert(key.into(), value);
    }
}

impl HostGraph for InMemoryGraph {
    type NodeIter<'a> = std::vec::IntoIter<NodeId>;
    type OutEdgeIter<'a> = std::vec::IntoIter<EdgeRef>;

    fn nodes(&self) -> Self::NodeIter<'_> {
        self.node_ids.clone().into_iter()
    }

    fn out_edges(&self, node: NodeId) -> Self::OutEdgeIter<'_> {
        self.out_adjacency
            .get(&node)
            .cloned()
            .unwrap_or_default()
            .into_iter()
    }

    fn has_edge(&self, src: NodeId, dst: NodeId) -> bool {
        self.out_adjacency
            .get(&src)
            .is_some_and(|edges| edges.iter().any(|e| e.dst == dst))
    }

    fn node_attribute(&self, node: NodeId, key: &str) -> AttributeValue {
        self.node_attrs
            .get(&node)
            .and_then(|attrs| attrs.get(key))
            .cloned()
            .unwrap_or(AttributeValue::Null)
    }

    fn edge_attribute(&self, edge: EdgeRef, key: &str) -> AttributeValue {
        self.edge_attrs
            .get(&(edge.src, edge.dst, edge.key))
            .and_then(|attrs| attrs.get(key))
            .cloned()
            .unwrap_or(AttributeValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_edge_reflects_added_edges_only() {
        let mut g = InMemoryGraph::new();
        g.add_edge(1, 2);
        assert!(g.has_edge(1, 2));
        assert!(!g.has_edge(2, 1));
        assert!(!g.has_edge(1, 3));
    }

    #[test]
    fn parallel_edges_get_distinct_keys() {
        let mut g = InMemoryGraph::new();
        let a = g.add_edge(1, 2);
        let b = g.add_edge(1, 2);
        assert_ne!(a.key, b.key);
        assert_eq!(g.out_edges(1).count(), 2);
    }

    #[test]
    fn missing_attribute_is_null() {
        let mut g = InMemoryGraph::new();
        g.add_node(1);
        assert_eq!(g.node_attribute(1, "missing"), AttributeValue::Null);
    }
}
