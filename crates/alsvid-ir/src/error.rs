//! Error types for the IR crate.

use crate::register::{RegBit, RegisterKind};
use thiserror::Error;

/// Errors that can occur while building or composing circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CircuitError {
    /// A register of the same kind already uses this name.
    #[error("duplicate register name '{name}'")]
    DuplicateRegister {
        /// The conflicting name.
        name: String,
    },

    /// No register with this name was declared.
    #[error("no register name '{name}'")]
    NoRegister {
        /// The missing name.
        name: String,
    },

    /// The same wire appears more than once in one operation.
    #[error("duplicate wire '{wire}' in operation '{name}'")]
    DuplicateWire {
        /// Name of the operation.
        name: String,
        /// The duplicated wire.
        wire: RegBit,
    },

    /// Operation name was never registered in the basis catalog.
    #[error("'{name}' is not in the list of basis operations")]
    NoBasisOp {
        /// The unknown operation name.
        name: String,
    },

    /// A later basis registration disagrees with an earlier signature.
    #[error("gate signatures do not match for '{name}'")]
    BasisMismatch {
        /// Name of the basis element.
        name: String,
    },

    /// Gate definition disagrees with the basis element signature.
    #[error("gate data does not match basis element specification for '{name}'")]
    GateMatch {
        /// Name of the gate.
        name: String,
    },

    /// Two gate definitions for the same name disagree.
    #[error("inequivalent gate definitions for '{name}'")]
    InequivalentGate {
        /// Name of the gate.
        name: String,
    },

    /// Wrong number of quantum arguments for an operation.
    #[error("incorrect number of qubits for '{name}': expected {expected}, got {got}")]
    QubitsNumber {
        /// Name of the operation.
        name: String,
        /// Declared qubit count.
        expected: u32,
        /// Provided qubit count.
        got: usize,
    },

    /// Wrong number of classical arguments for an operation.
    #[error("incorrect number of bits for '{name}': expected {expected}, got {got}")]
    BitsNumber {
        /// Name of the operation.
        name: String,
        /// Declared classical bit count.
        expected: u32,
        /// Provided classical bit count.
        got: usize,
    },

    /// Wrong number of parameters for an operation.
    #[error("incorrect number of parameters for '{name}': expected {expected}, got {got}")]
    ParamsNumber {
        /// Name of the operation.
        name: String,
        /// Declared parameter count.
        expected: u32,
        /// Provided parameter count.
        got: usize,
    },

    /// The condition references something that is not a classical register.
    #[error("invalid creg in condition for '{name}'")]
    CregCondition {
        /// Name of the conditioned operation.
        name: String,
    },

    /// A wire reference did not resolve to a declared register index.
    #[error("(qu)bit {bit} not found")]
    BitNotFound {
        /// The unresolved wire.
        bit: RegBit,
    },

    /// A wire resolved to a register of the wrong kind.
    #[error("expected {expected} wire for {bit}")]
    WireType {
        /// The kind required by the argument position.
        expected: RegisterKind,
        /// The offending wire.
        bit: RegBit,
    },

    /// A wire map covers only part of a register.
    #[error("wire_map fragments register '{name}'")]
    WireFrag {
        /// Name of the fragmented register.
        name: String,
    },

    /// A wire map key is not a wire of the source circuit.
    #[error("invalid wire mapping key {wire}")]
    InvalidWireMapKey {
        /// The offending key.
        wire: RegBit,
    },

    /// A wire map value is not a wire of the target circuit.
    #[error("invalid wire mapping value {wire}")]
    InvalidWireMapValue {
        /// The offending value.
        wire: RegBit,
    },

    /// A wire map pairs wires of different kinds.
    #[error("inconsistent wire_map at ({key}, {value}): expected {expected} wire")]
    InconsistentWireMap {
        /// The kind of the source wire.
        expected: RegisterKind,
        /// The source wire.
        key: RegBit,
        /// The target wire of the wrong kind.
        value: RegBit,
    },

    /// The same wire appears twice among the map's keys or values.
    #[error("duplicates in wire_map")]
    DuplicatesInWireMap,

    /// The resolved mapping does not cover the source circuit exactly.
    #[error("expected {expected} wires, got {got}")]
    TotalWires {
        /// Total wire count of the source circuit.
        expected: usize,
        /// Number of wires the mapping resolved.
        got: usize,
    },

    /// A specific source wire was left unresolved by the mapping.
    #[error("wire {wire} not in input circuit")]
    MissingWire {
        /// The unresolved wire.
        wire: RegBit,
    },

    /// Internal graph inconsistency.
    #[error("invalid DAG structure: {0}")]
    InvalidDag(String),
}

/// Result type for circuit operations.
pub type CircuitResult<T> = Result<T, CircuitError>;
