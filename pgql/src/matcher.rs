//! The Matcher: builds one combined pattern graph out of every Match
//! Clause, then enumerates satisfying Assignments via backtracking search
//! in declaration order, exposed as a lazy `Iterator` over an explicit,
//! resumable stack of search frames (the same shape as
//! `NodeScanIter`/`CartesianProductIter`: a custom `Iterator` impl holding
//! its own cursor rather than collecting eagerly).

use std::collections::{HashMap, HashSet};

use pgql_api::{EdgeRef, HostGraph, NodeId};

use crate::error::Result;
use crate::eval::eval_where;
use crate::query::Query;

/// A mapping from every node variable to a host node and every named edge
/// variable to a host edge. Anonymous edges bind nothing.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    pub nodes: HashMap<String, NodeId>,
    pub edges: HashMap<String, EdgeRef>,
}

/// One step of the compiled search order. `ScanNode` binds the first node
/// of a clause (or simply re-enters an already-bound one); `ExpandEdge`
/// follows one pattern edge from an already-bound node to bind the next
/// node (and, if named, the edge itself).
#[derive(Debug, Clone)]
enum Step {
    ScanNode {
        var: String,
    },
    ExpandEdge {
        from_var: String,
        edge_var: Option<String>,
        to_var: String,
    },
}

fn compile(query: &Query) -> Vec<Step> {
    let mut steps = Vec::new();
    for clause in &query.matches {
        steps.push(Step::ScanNode {
            var: clause.nodes[0].variable.clone(),
        });
        for i in 0..clause.edges.len() {
            steps.push(Step::ExpandEdge {
                from_var: clause.nodes[i].variable.clone(),
                edge_var: clause.edges[i].variable.clone(),
                to_var: clause.nodes[i + 1].variable.clone(),
            });
        }
    }
    steps
}

enum Candidate {
    Node(NodeId),
    Edge(EdgeRef),
    /// A step that needs no new binding: the variable involved was
    /// already bound by an earlier step, so this candidate only verifies
    /// consistency (or, for an anonymous edge, only existence).
    Verified,
    /// An anonymous edge whose endpoints are both already bound, but no
    /// matching host edge exists.
    Absent,
}

#[derive(Debug, Clone)]
enum Undo {
    Nothing,
    Node(String),
    Edge(String),
    NodeAndEdge(String, String),
}

struct Frame<'h> {
    step_idx: usize,
    candidates: Box<dyn Iterator<Item = Candidate> + 'h>,
    undo: Undo,
}

/// Lazy, resumable enumeration of Assignments satisfying both the
/// combined pattern and the Where conjunction. Borrows the host graph and
/// the compiled query for its whole lifetime; never materializes the
/// match set eagerly.
pub struct MatchIter<'q, 'h, H: HostGraph> {
    query: &'q Query,
    host: &'h H,
    steps: Vec<Step>,
    stack: Vec<Frame<'h>>,
    assignment: Assignment,
    started: bool,
}

impl<'q, 'h, H: HostGraph> MatchIter<'q, 'h, H> {
    pub fn new(query: &'q Query, host: &'h H) -> Self {
        let steps = compile(query);
        Self {
            query,
            host,
            steps,
            stack: Vec::new(),
            assignment: Assignment::default(),
            started: false,
        }
    }

    fn make_frame(&self, step_idx: usize) -> Frame<'h> {
        let candidates: Box<dyn Iterator<Item = Candidate> + 'h> = match &self.steps[step_idx] {
            Step::ScanNode { var } => {
                if self.assignment.nodes.contains_key(var) {
                    Box::new(std::iter::once(Candidate::Verified))
                } else {
                    Box::new(self.host.nodes().map(Candidate::Node))
                }
            }
            Step::ExpandEdge {
                from_var,
                edge_var,
                to_var,
            } => {
                let from = *self
                    .assignment
                    .nodes
                    .get(from_var)
                    .expect("from-node bound before its outgoing edge is expanded");
                match (self.assignment.nodes.get(to_var).copied(), edge_var) {
                    (Some(to), None) => {
                        if self.host.has_edge(from, to) {
                            Box::new(std::iter::once(Candidate::Verified))
                        } else {
                            Box::new(std::iter::once(Candidate::Absent))
                        }
                    }
                    (Some(to), Some(_)) => Box::new(
                        self.host
                            .out_edges(from)
                            .filter(move |e| e.dst == to)
                            .map(Candidate::Edge),
                    ),
                    // A named edge variable must bind to a specific host
                    // edge, so every parallel edge is its own candidate.
                    (None, Some(_)) => Box::new(self.host.out_edges(from).map(Candidate::Edge)),
                    // An anonymous edge binds no edge variable, so parallel
                    // edges to the same destination are indistinguishable
                    // here — yield one candidate per distinct destination,
                    // not one per physical edge, so completeness holds
                    // (see DESIGN.md).
                    (None, None) => {
                        let mut seen_dst = HashSet::new();
                        Box::new(
                            self.host
                                .out_edges(from)
                                .filter(move |e| seen_dst.insert(e.dst))
                                .map(Candidate::Edge),
                        )
                    }
                }
            }
        };
        Frame {
            step_idx,
            candidates,
            undo: Undo::Nothing,
        }
    }

    fn undo_frame(&mut self, frame: &mut Frame<'h>) {
        match std::mem::replace(&mut frame.undo, Undo::Nothing) {
            Undo::Nothing => {}
            Undo::Node(v) => {
                self.assignment.nodes.remove(&v);
            }
            Undo::Edge(v) => {
                self.assignment.edges.remove(&v);
            }
            Undo::NodeAndEdge(n, e) => {
                self.assignment.nodes.remove(&n);
                self.assignment.edges.remove(&e);
            }
        }
    }

    /// Attempts to apply `candidate` for the step at `step_idx`. Returns
    /// `None` on a conflicting binding (the caller should try the next
    /// candidate); otherwise returns the undo record for the binding just
    /// applied.
    fn try_bind(&mut self, step_idx: usize, candidate: Candidate) -> Option<Undo> {
        match candidate {
            Candidate::Absent => None,
            Candidate::Verified => Some(Undo::Nothing),
            Candidate::Node(n) => {
                // Full injectivity: distinct pattern node variables must
                // bind to distinct host nodes (subgraph *mono*morphism is
                // an injective map on vertices) — see DESIGN.md for why
                // this overrides the softer "no implicit distinctness"
                // wording in the component design.
                if self.assignment.nodes.values().any(|&bound| bound == n) {
                    return None;
                }
                let Step::ScanNode { var } = &self.steps[step_idx] else {
                    unreachable!("Candidate::Node only comes from a ScanNode step")
                };
                self.assignment.nodes.insert(var.clone(), n);
                Some(Undo::Node(var.clone()))
            }
            Candidate::Edge(e) => {
                let Step::ExpandEdge {
                    edge_var, to_var, ..
                } = &self.steps[step_idx]
                else {
                    unreachable!("Candidate::Edge only comes from an ExpandEdge step")
                };
                let to_var = to_var.clone();
                let edge_var = edge_var.clone();

                // `to_var` may already be bound (a reused variable, or an
                // edge-step candidate pre-filtered to a fixed endpoint by
                // `make_frame`) — in that case this candidate only needs
                // to verify consistency, not rebind.
                let mut undo_node = None;
                if let Some(&existing) = self.assignment.nodes.get(&to_var) {
                    if existing != e.dst {
                        return None;
                    }
                } else {
                    if self.assignment.nodes.values().any(|&bound| bound == e.dst) {
                        return None;
                    }
                    self.assignment.nodes.insert(to_var.clone(), e.dst);
                    undo_node = Some(to_var.clone());
                }

                let mut undo_edge = None;
                if let Some(ev) = &edge_var {
                    if let Some(&existing) = self.assignment.edges.get(ev) {
                        if existing != e {
                            if let Some(n) = undo_node {
                                self.assignment.nodes.remove(&n);
                            }
                            return None;
                        }
                    } else {
                        self.assignment.edges.insert(ev.clone(), e);
                        undo_edge = Some(ev.clone());
                    }
                }

                Some(match (undo_node, undo_edge) {
                    (Some(n), Some(ed)) => Undo::NodeAndEdge(n, ed),
                    (Some(n), None) => Undo::Node(n),
                    (None, Some(ed)) => Undo::Edge(ed),
                    (None, None) => Undo::Nothing,
                })
            }
        }
    }
}

impl<'q, 'h, H: HostGraph> Iterator for MatchIter<'q, 'h, H> {
    type Item = Result<Assignment>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            if self.steps.is_empty() {
                return None;
            }
            let frame = self.make_frame(0);
            self.stack.push(frame);
        }

        loop {
            let Some(mut top) = self.stack.pop() else {
                return None;
            };
            self.undo_frame(&mut top);
            match top.candidates.next() {
                None => {
                    // This frame is exhausted; drop it and retry the
                    // parent frame's next candidate.
                    continue;
                }
                Some(candidate) => {
                    let step_idx = top.step_idx;
                    match self.try_bind(step_idx, candidate) {
                        None => {
                            self.stack.push(top);
                            continue;
                        }
                        Some(undo) => {
                            top.undo = undo;
                            let next_step = step_idx + 1;
                            self.stack.push(top);
                            if next_step == self.steps.len() {
                                if eval_where(&self.query.where_conditions, &self.assignment, self.host)
                                {
                                    return Some(Ok(self.assignment.clone()));
                                }
                                continue;
                            } else {
                                let frame = self.make_frame(next_step);
                                self.stack.push(frame);
                                continue;
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser, transform};
    use pgql_graph::InMemoryGraph;

    #[test]
    fn enumerates_single_hop_matches() {
        let mut g = InMemoryGraph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        let tree = parser::parse("MATCH (A)-[B]->(C) RETURN A").unwrap();
        let query = transform::transform(tree).unwrap();
        let results: Vec<_> = MatchIter::new(&query, &g).collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn enforces_injective_node_binding_on_triangle() {
        let mut g = InMemoryGraph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(3, 1);
        let tree =
            parser::parse("MATCH (A)-[]->(B) MATCH (B)-[]->(C) MATCH (C)-[]->(A) RETURN A")
                .unwrap();
        let query = transform::transform(tree).unwrap();
        let results: Vec<_> = MatchIter::new(&query, &g).collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn anonymous_edge_yields_one_assignment_per_destination_despite_parallel_edges() {
        let mut g = InMemoryGraph::new();
        g.add_edge(1, 2);
        g.add_edge(1, 2);
        let tree = parser::parse("MATCH (A)-[]->(B) RETURN A, B").unwrap();
        let query = transform::transform(tree).unwrap();
        let results: Vec<_> = MatchIter::new(&query, &g).collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn named_edge_still_yields_one_assignment_per_parallel_edge() {
        let mut g = InMemoryGraph::new();
        g.add_edge(1, 2);
        g.add_edge(1, 2);
        let tree = parser::parse("MATCH (A)-[E]->(B) RETURN A, B").unwrap();
        let query = transform::transform(tree).unwrap();
        let results: Vec<_> = MatchIter::new(&query, &g).collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(results.len(), 2);
    }
}
