//! Alsvid Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! circuits in Alsvid: named registers of quantum and classical wires, an
//! accepted gate-basis catalog, composite-gate definitions, and the
//! operation DAG that downstream compilation passes and execution backends
//! consume.
//!
//! # Overview
//!
//! The IR is built monotonically from structural events: registers, basis
//! elements and gate definitions are declared as they are observed, and
//! operations are appended strictly in arrival order. Every mutation is
//! validated against the declared registers and signatures; a failing
//! mutation leaves the graph unmodified.
//!
//! # Core Components
//!
//! - **Registers and wires**: [`Register`], [`RegBit`], [`Wire`] for
//!   addressing quantum and classical bits
//! - **Basis catalog**: [`BasisElement`], [`BasisTable`] for accepted
//!   primitive signatures; [`GateData`] for composite-gate definitions
//! - **Operations**: [`Operation`] nodes with wire arguments, textual
//!   parameters and an optional classical [`Condition`]
//! - **DAG**: [`CircuitDag`] for the per-wire chain representation
//! - **Circuit**: [`Circuit`] owning all of the above, with
//!   construction, validation and composition
//!
//! # Example
//!
//! ```rust
//! use alsvid_ir::{Circuit, GateArity, RegBit};
//!
//! let mut circuit = Circuit::new();
//! circuit.add_qreg("q", 2).unwrap();
//! circuit.add_creg("c", 2).unwrap();
//!
//! circuit.add_basis_element("CX", GateArity::Fixed(2), 0, 0).unwrap();
//! circuit
//!     .apply_operation_back(
//!         "CX",
//!         vec![RegBit::new("q", 0), RegBit::new("q", 1)],
//!         vec![],
//!         vec![],
//!         None,
//!     )
//!     .unwrap();
//!
//! assert_eq!(circuit.num_ops(), 1);
//! assert_eq!(circuit.num_wires(), 4);
//! ```

pub mod basis;
pub mod circuit;
pub mod dag;
pub mod error;
pub mod operation;
pub mod register;

pub use basis::{BasisElement, BasisTable, GateArity, GateData};
pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex};
pub use error::{CircuitError, CircuitResult};
pub use operation::Operation;
pub use register::{Condition, RegBit, Register, RegisterKind, Wire};
