//! OpenQASM syntax tree and circuit-building backend.
//!
//! The [`ast`] module holds a tagged node type for parsed OpenQASM
//! programs along with source rendering. The [`backend`] module defines
//! the event interface a translation driver calls into, and
//! [`circuit_backend`] implements it on top of [`alsvid_ir::Circuit`]:
//!
//! ```
//! use alsvid_ir::RegBit;
//! use alsvid_qasm::{CircuitBackend, UnrollerBackend};
//!
//! let mut backend = CircuitBackend::new([]);
//! backend.new_qreg("q", 2)?;
//! backend.cx(RegBit::new("q", 0), RegBit::new("q", 1))?;
//! assert_eq!(backend.circuit().num_ops(), 1);
//! # Ok::<(), alsvid_qasm::UnrollError>(())
//! ```

pub mod ast;
pub mod backend;
pub mod circuit_backend;
pub mod error;

pub use ast::{Node, NodeKind};
pub use backend::UnrollerBackend;
pub use circuit_backend::{CircuitBackend, EmitScope};
pub use error::{UnrollError, UnrollResult};
