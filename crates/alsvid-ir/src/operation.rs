//! Operation nodes: applied instructions in the circuit graph.

use serde::{Deserialize, Serialize};

use crate::register::{Condition, RegBit, Wire};

/// One applied instruction in the circuit graph.
///
/// Parameters are carried as the textual renderings produced upstream;
/// the IR never evaluates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Basis name of the operation.
    pub name: String,
    /// Ordered quantum wire arguments.
    pub qargs: Vec<RegBit>,
    /// Ordered classical wire arguments.
    pub cargs: Vec<RegBit>,
    /// Ordered string-encoded parameters.
    pub params: Vec<String>,
    /// Optional classical condition gating the operation.
    pub condition: Option<Condition>,
}

impl Operation {
    /// Create a new operation node.
    pub fn new(
        name: impl Into<String>,
        qargs: Vec<RegBit>,
        cargs: Vec<RegBit>,
        params: Vec<String>,
        condition: Option<Condition>,
    ) -> Self {
        Self {
            name: name.into(),
            qargs,
            cargs,
            params,
            condition,
        }
    }

    /// Create a bare gate operation touching only quantum wires.
    pub fn gate(name: impl Into<String>, qargs: Vec<RegBit>) -> Self {
        Self::new(name, qargs, vec![], vec![], None)
    }

    /// Total number of wires this operation touches.
    #[inline]
    pub fn num_wires(&self) -> usize {
        self.qargs.len() + self.cargs.len()
    }

    /// Iterate over the touched wires, quantum first, in argument order.
    pub fn wires(&self) -> impl Iterator<Item = Wire> + '_ {
        self.qargs
            .iter()
            .cloned()
            .map(Wire::Qubit)
            .chain(self.cargs.iter().cloned().map(Wire::Clbit))
    }

    /// Check whether the operation is classically conditioned.
    #[inline]
    pub fn is_conditioned(&self) -> bool {
        self.condition.is_some()
    }
}
