//! Accepted gate-basis catalog and composite gate definitions.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, CircuitResult};

/// Qubit arity of a basis element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateArity {
    /// Exactly this many qubits.
    Fixed(u32),
    /// Any number of qubits (e.g. barrier).
    Variadic,
}

impl GateArity {
    /// Check whether a provided qubit count satisfies this arity.
    #[inline]
    pub fn matches(&self, count: usize) -> bool {
        match self {
            GateArity::Fixed(n) => *n as usize == count,
            GateArity::Variadic => true,
        }
    }
}

/// A declared primitive operation signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisElement {
    /// Operation name.
    pub name: String,
    /// Number of quantum arguments.
    pub qubits: GateArity,
    /// Number of classical arguments.
    pub clbits: u32,
    /// Number of parameters.
    pub params: u32,
}

impl BasisElement {
    /// Create a new signature.
    pub fn new(name: impl Into<String>, qubits: GateArity, clbits: u32, params: u32) -> Self {
        Self {
            name: name.into(),
            qubits,
            clbits,
            params,
        }
    }
}

/// Declaring data for a composite gate.
///
/// The IR never interprets the body; it only records its presence so the
/// unroller can decide whether the gate may be expanded inline. Opaque
/// gates have no body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateData {
    /// Whether the gate was declared opaque.
    pub opaque: bool,
    /// Number of qubit arguments in the declaration.
    pub num_qubits: u32,
    /// Number of parameters in the declaration.
    pub num_params: u32,
    /// Rendered textual body; `None` for opaque gates.
    pub body: Option<String>,
}

impl GateData {
    /// Declaring data for a gate with a body.
    pub fn with_body(num_qubits: u32, num_params: u32, body: impl Into<String>) -> Self {
        Self {
            opaque: false,
            num_qubits,
            num_params,
            body: Some(body.into()),
        }
    }

    /// Declaring data for an opaque gate.
    pub fn opaque(num_qubits: u32, num_params: u32) -> Self {
        Self {
            opaque: true,
            num_qubits,
            num_params,
            body: None,
        }
    }

    /// Check this definition against a basis signature for the same name.
    pub(crate) fn check_against(&self, element: &BasisElement) -> CircuitResult<()> {
        let qubits_ok = element.qubits.matches(self.num_qubits as usize);
        if !qubits_ok || element.params != self.num_params {
            return Err(CircuitError::GateMatch {
                name: element.name.clone(),
            });
        }
        Ok(())
    }
}

/// Append-only catalog of accepted basis signatures.
///
/// The catalog never overwrites: re-registering an identical signature is
/// a no-op, and a differing signature for a known name is rejected.
#[derive(Debug, Clone, Default)]
pub struct BasisTable {
    elements: FxHashMap<String, BasisElement>,
}

impl BasisTable {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that a signature is compatible with the catalog without
    /// inserting it.
    pub fn check(&self, element: &BasisElement) -> CircuitResult<()> {
        match self.elements.get(&element.name) {
            Some(existing) if existing == element => Ok(()),
            Some(_) => Err(CircuitError::BasisMismatch {
                name: element.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Insert a signature, reconciling against any existing entry.
    pub fn insert(&mut self, element: BasisElement) -> CircuitResult<()> {
        self.check(&element)?;
        self.elements.entry(element.name.clone()).or_insert(element);
        Ok(())
    }

    /// Look up a signature by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&BasisElement> {
        self.elements.get(name)
    }

    /// Check whether a name is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    /// Number of registered signatures.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check whether the catalog is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over registered signatures.
    pub fn iter(&self) -> impl Iterator<Item = &BasisElement> {
        self.elements.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_1q() -> BasisElement {
        BasisElement::new("X", GateArity::Fixed(1), 0, 0)
    }

    #[test]
    fn test_insert_idempotent() {
        let mut table = BasisTable::new();
        table.insert(x_1q()).unwrap();
        table.insert(x_1q()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insert_mismatch_keeps_original() {
        let mut table = BasisTable::new();
        table.insert(x_1q()).unwrap();
        table.insert(x_1q()).unwrap();

        let different = BasisElement::new("X", GateArity::Fixed(1), 0, 1);
        let err = table.insert(different).unwrap_err();
        assert!(matches!(err, CircuitError::BasisMismatch { name } if name == "X"));

        // The original entry survives untouched.
        assert_eq!(table.get("X"), Some(&x_1q()));
    }

    #[test]
    fn test_variadic_matches_any_count() {
        assert!(GateArity::Variadic.matches(0));
        assert!(GateArity::Variadic.matches(17));
        assert!(GateArity::Fixed(2).matches(2));
        assert!(!GateArity::Fixed(2).matches(1));
    }

    #[test]
    fn test_gate_data_check_against() {
        let elem = BasisElement::new("foo", GateArity::Fixed(2), 0, 1);
        GateData::with_body(2, 1, "cx a,b;").check_against(&elem).unwrap();

        let err = GateData::with_body(3, 1, "ccx a,b,c;")
            .check_against(&elem)
            .unwrap_err();
        assert!(matches!(err, CircuitError::GateMatch { name } if name == "foo"));
    }
}
