//! DAG of per-wire operation chains.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, CircuitResult};
use crate::operation::Operation;
use crate::register::Wire;

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a wire.
    In(Wire),
    /// Output node for a wire.
    Out(Wire),
    /// Operation node.
    Op(Operation),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the operation if this is an operation node.
    #[inline]
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            DagNode::Op(op) => Some(op),
            _ => None,
        }
    }
}

/// An edge in the circuit DAG representing a wire segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge belongs to.
    pub wire: Wire,
}

/// DAG-based circuit body.
///
/// Each wire owns a chain from its input node through every operation
/// touching it to its output node; an operation node sits on the chain of
/// every wire it touches, so its position may differ per wire. The
/// `wire_front` index maps each wire to the last node before its output
/// node, giving O(1) appends.
///
/// Operations are only ever appended, never reordered or removed, so the
/// arrival-order list of operation nodes stays valid for the lifetime of
/// the graph.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: DiGraph<DagNode, DagEdge, u32>,
    /// Map from wire to its input node.
    inputs: FxHashMap<Wire, NodeIndex>,
    /// Map from wire to its output node.
    outputs: FxHashMap<Wire, NodeIndex>,
    /// Last node before the output node, per wire.
    wire_front: FxHashMap<Wire, NodeIndex>,
    /// Operation nodes in arrival order.
    order: Vec<NodeIndex>,
}

impl CircuitDag {
    /// Create a new empty DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a wire to the DAG. Adding an existing wire is a no-op.
    pub fn add_wire(&mut self, wire: Wire) {
        if self.inputs.contains_key(&wire) {
            return;
        }
        let in_node = self.graph.add_node(DagNode::In(wire.clone()));
        let out_node = self.graph.add_node(DagNode::Out(wire.clone()));
        self.graph
            .add_edge(in_node, out_node, DagEdge { wire: wire.clone() });
        self.inputs.insert(wire.clone(), in_node);
        self.outputs.insert(wire.clone(), out_node);
        // Initially the input node is the predecessor of the output.
        self.wire_front.insert(wire, in_node);
    }

    /// Check whether a wire exists in the DAG.
    #[inline]
    pub fn has_wire(&self, wire: &Wire) -> bool {
        self.inputs.contains_key(wire)
    }

    /// Append an operation at the end of every wire it touches.
    pub fn apply_back(&mut self, op: Operation) -> CircuitResult<NodeIndex> {
        // Re-validate independently of the caller: wires must exist and
        // must not repeat within one operation.
        let mut seen = FxHashSet::default();
        for wire in op.wires() {
            if !self.inputs.contains_key(&wire) {
                return Err(CircuitError::BitNotFound {
                    bit: wire.bit().clone(),
                });
            }
            if !seen.insert(wire.clone()) {
                return Err(CircuitError::DuplicateWire {
                    name: op.name.clone(),
                    wire: wire.bit().clone(),
                });
            }
        }

        let wires: Vec<Wire> = op.wires().collect();
        let op_node = self.graph.add_node(DagNode::Op(op));

        for wire in wires {
            let out_node = self.outputs[&wire];
            let prev_node = self.wire_front[&wire];

            // Splice the op between the current front and the output node.
            let edge_id = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == out_node)
                .map(|e| e.id());
            let eid = edge_id.ok_or_else(|| {
                CircuitError::InvalidDag(format!(
                    "missing edge from predecessor to output for wire {wire}"
                ))
            })?;
            self.graph.remove_edge(eid);
            self.graph
                .add_edge(prev_node, op_node, DagEdge { wire: wire.clone() });
            self.graph
                .add_edge(op_node, out_node, DagEdge { wire: wire.clone() });
            self.wire_front.insert(wire, op_node);
        }

        self.order.push(op_node);
        Ok(op_node)
    }

    /// Iterate over operations in arrival order.
    pub fn ops(&self) -> impl Iterator<Item = &Operation> {
        self.order.iter().filter_map(|&idx| {
            self.graph.node_weight(idx).and_then(DagNode::operation)
        })
    }

    /// Get an operation by node index.
    #[inline]
    pub fn get_op(&self, node: NodeIndex) -> Option<&Operation> {
        self.graph.node_weight(node).and_then(DagNode::operation)
    }

    /// Number of wires.
    #[inline]
    pub fn num_wires(&self) -> usize {
        self.inputs.len()
    }

    /// Number of operation nodes.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.order.len()
    }

    /// Number of operations on one wire's chain.
    ///
    /// Walks the chain from input to output, so the cost is proportional
    /// to the chain length.
    pub fn chain_len(&self, wire: &Wire) -> usize {
        let Some(&in_node) = self.inputs.get(wire) else {
            return 0;
        };
        let out_node = self.outputs[wire];

        let mut count = 0;
        let mut current = in_node;
        while current != out_node {
            let next = self
                .graph
                .edges_directed(current, Direction::Outgoing)
                .find(|e| &e.weight().wire == wire)
                .map(|e| e.target());
            match next {
                Some(n) => {
                    if self.graph[n].is_op() {
                        count += 1;
                    }
                    current = n;
                }
                None => break,
            }
        }
        count
    }

    /// Calculate the circuit depth.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0usize;

        for node in petgraph::algo::toposort(&self.graph, None)
            .expect("circuit graph is acyclic")
        {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);

            let node_depth = if self.graph[node].is_op() {
                max_pred_depth + 1
            } else {
                max_pred_depth
            };

            if node_depth > max_depth {
                max_depth = node_depth;
            }
            depths.insert(node, node_depth);
        }

        max_depth
    }

    /// Iterate over the wires of the DAG.
    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.inputs.keys()
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that the graph is acyclic, that every wire has paired In/Out
    /// nodes, and that each wire's chain is continuous from input to
    /// output.
    pub fn verify_integrity(&self) -> CircuitResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(CircuitError::InvalidDag("graph contains a cycle".into()));
        }

        for wire in self.inputs.keys() {
            if !self.outputs.contains_key(wire) {
                return Err(CircuitError::InvalidDag(format!(
                    "wire {wire} has an In node but no Out node"
                )));
            }
        }
        for wire in self.outputs.keys() {
            if !self.inputs.contains_key(wire) {
                return Err(CircuitError::InvalidDag(format!(
                    "wire {wire} has an Out node but no In node"
                )));
            }
        }

        // Wire continuity: walk each chain from In to Out.
        for (wire, &in_node) in &self.inputs {
            let out_node = self.outputs[wire];
            let mut current = in_node;
            let mut steps = 0;
            let max_steps = self.graph.node_count();

            while current != out_node {
                let next = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| &e.weight().wire == wire)
                    .map(|e| e.target());
                match next {
                    Some(n) => current = n,
                    None => {
                        return Err(CircuitError::InvalidDag(format!(
                            "chain for wire {wire} is broken: no outgoing edge from {current:?}"
                        )));
                    }
                }
                steps += 1;
                if steps > max_steps {
                    return Err(CircuitError::InvalidDag(format!(
                        "chain for wire {wire} has too many steps"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::RegBit;

    fn qwire(reg: &str, idx: u32) -> Wire {
        Wire::Qubit(RegBit::new(reg, idx))
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_wires(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
    }

    #[test]
    fn test_add_wires() {
        let mut dag = CircuitDag::new();
        dag.add_wire(qwire("q", 0));
        dag.add_wire(qwire("q", 1));
        dag.add_wire(qwire("q", 0)); // no-op
        assert_eq!(dag.num_wires(), 2);
    }

    #[test]
    fn test_apply_back_chains() {
        let mut dag = CircuitDag::new();
        dag.add_wire(qwire("q", 0));
        dag.add_wire(qwire("q", 1));

        dag.apply_back(Operation::gate("U", vec![RegBit::new("q", 0)]))
            .unwrap();
        dag.apply_back(Operation::gate(
            "CX",
            vec![RegBit::new("q", 0), RegBit::new("q", 1)],
        ))
        .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.chain_len(&qwire("q", 0)), 2);
        assert_eq!(dag.chain_len(&qwire("q", 1)), 1);
        assert_eq!(dag.depth(), 2);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_parallel_ops_depth() {
        let mut dag = CircuitDag::new();
        dag.add_wire(qwire("q", 0));
        dag.add_wire(qwire("q", 1));

        dag.apply_back(Operation::gate("U", vec![RegBit::new("q", 0)]))
            .unwrap();
        dag.apply_back(Operation::gate("U", vec![RegBit::new("q", 1)]))
            .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 1);
    }

    #[test]
    fn test_missing_wire_rejected() {
        let mut dag = CircuitDag::new();
        dag.add_wire(qwire("q", 0));

        let err = dag
            .apply_back(Operation::gate("U", vec![RegBit::new("q", 7)]))
            .unwrap_err();
        assert!(matches!(err, CircuitError::BitNotFound { bit } if bit == RegBit::new("q", 7)));
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_duplicate_wire_rejected() {
        let mut dag = CircuitDag::new();
        dag.add_wire(qwire("q", 0));
        dag.add_wire(qwire("q", 1));

        let err = dag
            .apply_back(Operation::gate(
                "CX",
                vec![RegBit::new("q", 0), RegBit::new("q", 0)],
            ))
            .unwrap_err();
        assert!(matches!(err, CircuitError::DuplicateWire { .. }));
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_ops_arrival_order() {
        let mut dag = CircuitDag::new();
        dag.add_wire(qwire("q", 0));
        dag.add_wire(qwire("q", 1));

        dag.apply_back(Operation::gate("U", vec![RegBit::new("q", 1)]))
            .unwrap();
        dag.apply_back(Operation::gate("U", vec![RegBit::new("q", 0)]))
            .unwrap();
        dag.apply_back(Operation::gate(
            "CX",
            vec![RegBit::new("q", 0), RegBit::new("q", 1)],
        ))
        .unwrap();

        let names: Vec<_> = dag.ops().map(|op| op.name.as_str()).collect();
        assert_eq!(names, ["U", "U", "CX"]);
    }
}
