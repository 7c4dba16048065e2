//! QASM AST node surface consumed by the unroller.
//!
//! The unroller only needs typed data out of parsed nodes: the kind tag,
//! the children, and the node's source-level rendering. Nodes form a
//! closed tagged union with one variant per construct; rendering is
//! implemented per variant.

use serde::{Deserialize, Serialize};

use crate::error::{UnrollError, UnrollResult};
use alsvid_ir::GateData;

/// The discriminant of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Id,
    IndexedId,
    IdList,
    Int,
    Real,
    Qreg,
    Creg,
    Measure,
    Barrier,
    Reset,
    UniversalUnitary,
    Cnot,
    CustomUnitary,
    If,
    Gate,
    Opaque,
    GopList,
}

/// A parsed QASM construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A bare identifier.
    Id {
        /// The identifier text.
        name: String,
    },

    /// An indexed identifier: `name[index]`.
    IndexedId {
        /// Register name.
        name: String,
        /// Index into the register.
        index: u32,
    },

    /// A comma-separated identifier list.
    IdList(Vec<Node>),

    /// An integer literal.
    Int(i64),

    /// A real literal.
    Real(f64),

    /// Quantum register declaration: `qreg name[size];`.
    Qreg {
        /// Register name.
        name: String,
        /// Register size.
        size: u32,
    },

    /// Classical register declaration: `creg name[size];`.
    Creg {
        /// Register name.
        name: String,
        /// Register size.
        size: u32,
    },

    /// Measurement: `measure arg1 -> arg2;`.
    Measure {
        /// Measured qubit (id or indexed id).
        arg1: Box<Node>,
        /// Output bit (id or indexed id).
        arg2: Box<Node>,
    },

    /// Barrier over an identifier list.
    Barrier {
        /// The id list of barred wires.
        args: Box<Node>,
    },

    /// Reset of one qubit argument.
    Reset {
        /// The reset target.
        arg: Box<Node>,
    },

    /// The fundamental single-qubit gate: `U(a,b,c) target;`.
    UniversalUnitary {
        /// The three angle expressions.
        params: Vec<Node>,
        /// The target qubit.
        target: Box<Node>,
    },

    /// The fundamental two-qubit gate: `CX arg1,arg2;`.
    Cnot {
        /// Control qubit.
        arg1: Box<Node>,
        /// Target qubit.
        arg2: Box<Node>,
    },

    /// Application of a user-defined gate: `name(params) args;`.
    CustomUnitary {
        /// Gate name.
        name: String,
        /// Parameter expressions.
        params: Vec<Node>,
        /// Argument id list.
        args: Box<Node>,
    },

    /// Conditional statement: `if(creg==value) op`.
    If {
        /// Conditioning classical register name.
        creg: String,
        /// Tested integer value.
        value: i64,
        /// The conditioned operation.
        op: Box<Node>,
    },

    /// A composite gate definition with a body.
    Gate {
        /// Gate name.
        name: String,
        /// Parameter names.
        params: Vec<String>,
        /// Qubit argument names.
        qubits: Vec<String>,
        /// The gate body (a [`Node::GopList`]).
        body: Box<Node>,
    },

    /// An opaque gate declaration (no body).
    Opaque {
        /// Gate name.
        name: String,
        /// Parameter names.
        params: Vec<String>,
        /// Qubit argument names.
        qubits: Vec<String>,
    },

    /// Internal aggregation of gate-body operations. Has no direct
    /// textual form of its own.
    GopList(Vec<Node>),
}

impl Node {
    /// The kind tag of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Id { .. } => NodeKind::Id,
            Node::IndexedId { .. } => NodeKind::IndexedId,
            Node::IdList(_) => NodeKind::IdList,
            Node::Int(_) => NodeKind::Int,
            Node::Real(_) => NodeKind::Real,
            Node::Qreg { .. } => NodeKind::Qreg,
            Node::Creg { .. } => NodeKind::Creg,
            Node::Measure { .. } => NodeKind::Measure,
            Node::Barrier { .. } => NodeKind::Barrier,
            Node::Reset { .. } => NodeKind::Reset,
            Node::UniversalUnitary { .. } => NodeKind::UniversalUnitary,
            Node::Cnot { .. } => NodeKind::Cnot,
            Node::CustomUnitary { .. } => NodeKind::CustomUnitary,
            Node::If { .. } => NodeKind::If,
            Node::Gate { .. } => NodeKind::Gate,
            Node::Opaque { .. } => NodeKind::Opaque,
            Node::GopList(_) => NodeKind::GopList,
        }
    }

    /// Child nodes, in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::IdList(list) | Node::GopList(list) => list.iter().collect(),
            Node::Measure { arg1, arg2 } | Node::Cnot { arg1, arg2 } => vec![arg1, arg2],
            Node::Barrier { args } => vec![args],
            Node::Reset { arg } => vec![arg],
            Node::UniversalUnitary { params, target } => {
                params.iter().chain(std::iter::once(&**target)).collect()
            }
            Node::CustomUnitary { params, args, .. } => {
                params.iter().chain(std::iter::once(&**args)).collect()
            }
            Node::If { op, .. } => vec![op],
            Node::Gate { body, .. } => vec![body],
            _ => vec![],
        }
    }

    /// Render this node's exact textual form in the circuit description
    /// language. Real literals are formatted to `precision` decimal
    /// digits.
    ///
    /// # Panics
    ///
    /// Panics for [`Node::GopList`], which has no direct textual form;
    /// attempting to render it is a programming error.
    pub fn qasm(&self, precision: usize) -> String {
        match self {
            Node::Id { name } => name.clone(),
            Node::IndexedId { name, index } => format!("{name}[{index}]"),
            Node::IdList(list) => list
                .iter()
                .map(|n| n.qasm(precision))
                .collect::<Vec<_>>()
                .join(","),
            Node::Int(v) => v.to_string(),
            Node::Real(v) => format_real(*v, precision),
            Node::Qreg { name, size } => format!("qreg {name}[{size}];"),
            Node::Creg { name, size } => format!("creg {name}[{size}];"),
            Node::Measure { arg1, arg2 } => {
                format!("measure {} -> {};", arg1.qasm(precision), arg2.qasm(precision))
            }
            Node::Barrier { args } => format!("barrier {};", args.qasm(precision)),
            Node::Reset { arg } => format!("reset {};", arg.qasm(precision)),
            Node::UniversalUnitary { params, target } => {
                let params = params
                    .iter()
                    .map(|n| n.qasm(precision))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("U({params}) {};", target.qasm(precision))
            }
            Node::Cnot { arg1, arg2 } => {
                format!("CX {},{};", arg1.qasm(precision), arg2.qasm(precision))
            }
            Node::CustomUnitary { name, params, args } => {
                if params.is_empty() {
                    format!("{name} {};", args.qasm(precision))
                } else {
                    let params = params
                        .iter()
                        .map(|n| n.qasm(precision))
                        .collect::<Vec<_>>()
                        .join(",");
                    format!("{name}({params}) {};", args.qasm(precision))
                }
            }
            Node::If { creg, value, op } => {
                format!("if({creg}=={value}) {}", op.qasm(precision))
            }
            Node::Gate {
                name,
                params,
                qubits,
                body,
            } => {
                let mut out = format!("gate {name}");
                if !params.is_empty() {
                    out.push_str(&format!("({})", params.join(",")));
                }
                out.push_str(&format!(" {}\n{{\n", qubits.join(",")));
                for stmt in body.children() {
                    out.push_str(&format!("  {}\n", stmt.qasm(precision)));
                }
                out.push('}');
                out
            }
            Node::Opaque {
                name,
                params,
                qubits,
            } => {
                if params.is_empty() {
                    format!("opaque {name} {};", qubits.join(","))
                } else {
                    format!("opaque {name}({}) {};", params.join(","), qubits.join(","))
                }
            }
            Node::GopList(_) => {
                panic!("qasm rendering not implemented for gate-body aggregation node")
            }
        }
    }

    /// Derive the declaring [`GateData`] from a gate-definition node.
    ///
    /// Fails for nodes that are not gate definitions.
    pub fn gate_data(&self, precision: usize) -> UnrollResult<GateData> {
        match self {
            Node::Gate {
                params,
                qubits,
                body,
                ..
            } => {
                let body_text = body
                    .children()
                    .iter()
                    .map(|n| n.qasm(precision))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(GateData::with_body(
                    qubits.len() as u32,
                    params.len() as u32,
                    body_text,
                ))
            }
            Node::Opaque { params, qubits, .. } => {
                Ok(GateData::opaque(qubits.len() as u32, params.len() as u32))
            }
            other => Err(UnrollError::MalformedAst(format!(
                "expected a gate definition node, found {:?}",
                other.kind()
            ))),
        }
    }
}

/// Format a real literal to `precision` decimal digits, with trailing
/// zeros trimmed (keeping at least one digit after the point).
pub fn format_real(value: f64, precision: usize) -> String {
    let mut out = format!("{value:.precision$}");
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.push('0');
        }
    }
    out
}
