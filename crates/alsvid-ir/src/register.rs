//! Registers, wire references and classical conditions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a register: quantum or classical.
///
/// The two namespaces are independent; the same name may legally exist
/// as both a quantum and a classical register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterKind {
    /// A register of qubits.
    Quantum,
    /// A register of classical bits.
    Classical,
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterKind::Quantum => write!(f, "quantum"),
            RegisterKind::Classical => write!(f, "classical"),
        }
    }
}

/// A named, sized group of same-kind wires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// Register name, unique within its kind.
    pub name: String,
    /// Number of wires in the register.
    pub size: u32,
    /// Whether the wires are quantum or classical.
    pub kind: RegisterKind,
}

impl Register {
    /// Create a new register descriptor.
    pub fn new(name: impl Into<String>, size: u32, kind: RegisterKind) -> Self {
        Self {
            name: name.into(),
            size,
            kind,
        }
    }
}

/// A reference to a single wire: `(register_name, index)`.
///
/// Two references are equal iff both components match. The kind of the
/// wire is not part of the reference; it is resolved against the owning
/// circuit's register tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegBit {
    /// Name of the register.
    pub register: String,
    /// Index within the register.
    pub index: u32,
}

impl RegBit {
    /// Create a new wire reference.
    pub fn new(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for RegBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A kind-tagged wire in the circuit graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wire {
    /// A quantum wire.
    Qubit(RegBit),
    /// A classical wire.
    Clbit(RegBit),
}

impl Wire {
    /// Build a wire of the given kind.
    pub fn of(kind: RegisterKind, bit: RegBit) -> Self {
        match kind {
            RegisterKind::Quantum => Wire::Qubit(bit),
            RegisterKind::Classical => Wire::Clbit(bit),
        }
    }

    /// The underlying wire reference.
    #[inline]
    pub fn bit(&self) -> &RegBit {
        match self {
            Wire::Qubit(b) | Wire::Clbit(b) => b,
        }
    }

    /// The kind of this wire.
    #[inline]
    pub fn kind(&self) -> RegisterKind {
        match self {
            Wire::Qubit(_) => RegisterKind::Quantum,
            Wire::Clbit(_) => RegisterKind::Classical,
        }
    }

    /// Check if this is a quantum wire.
    #[inline]
    pub fn is_qubit(&self) -> bool {
        matches!(self, Wire::Qubit(_))
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bit())
    }
}

/// A classical condition gating an operation.
///
/// The operation only executes when the named classical register holds
/// the given integer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Wire reference into the conditioning classical register.
    pub bit: RegBit,
    /// The integer value tested for.
    pub value: i64,
}

impl Condition {
    /// Create a new condition.
    pub fn new(bit: RegBit, value: i64) -> Self {
        Self { bit, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regbit_display() {
        let bit = RegBit::new("q", 3);
        assert_eq!(format!("{bit}"), "q[3]");
    }

    #[test]
    fn test_regbit_equality() {
        assert_eq!(RegBit::new("q", 0), RegBit::new("q", 0));
        assert_ne!(RegBit::new("q", 0), RegBit::new("q", 1));
        assert_ne!(RegBit::new("q", 0), RegBit::new("r", 0));
    }

    #[test]
    fn test_wire_kind() {
        let q = Wire::Qubit(RegBit::new("q", 0));
        let c = Wire::Clbit(RegBit::new("q", 0));
        assert!(q.is_qubit());
        assert!(!c.is_qubit());
        assert_eq!(q.kind(), RegisterKind::Quantum);
        // Same bit reference, different kinds: still distinct wires.
        assert_ne!(q, c);
    }

    #[test]
    fn test_wire_of() {
        let bit = RegBit::new("c", 1);
        assert_eq!(
            Wire::of(RegisterKind::Classical, bit.clone()),
            Wire::Clbit(bit)
        );
    }
}
