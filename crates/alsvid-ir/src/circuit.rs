//! The circuit graph: registers, basis catalog, gate table and DAG.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::basis::{BasisElement, BasisTable, GateArity, GateData};
use crate::dag::{CircuitDag, NodeIndex};
use crate::error::{CircuitError, CircuitResult};
use crate::operation::Operation;
use crate::register::{Condition, RegBit, Register, RegisterKind, Wire};

/// A quantum circuit under construction.
///
/// Owns the register tables, the accepted gate-basis catalog, the
/// composite-gate definition table and the operation DAG. Registers,
/// basis elements and gate definitions are added monotonically;
/// operations are appended strictly in arrival order and never removed.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    /// Quantum registers by name.
    qregs: FxHashMap<String, Register>,
    /// Classical registers by name.
    cregs: FxHashMap<String, Register>,
    /// Accepted basis signatures.
    basis: BasisTable,
    /// Composite gate definitions by name.
    gates: FxHashMap<String, GateData>,
    /// The operation DAG.
    dag: CircuitDag,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Add a quantum register.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> CircuitResult<()> {
        self.add_register(RegisterKind::Quantum, name.into(), size)
    }

    /// Add a classical register.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> CircuitResult<()> {
        self.add_register(RegisterKind::Classical, name.into(), size)
    }

    /// Add a register of the given kind.
    pub fn add_register(
        &mut self,
        kind: RegisterKind,
        name: String,
        size: u32,
    ) -> CircuitResult<()> {
        let table = match kind {
            RegisterKind::Quantum => &mut self.qregs,
            RegisterKind::Classical => &mut self.cregs,
        };
        if table.contains_key(&name) {
            return Err(CircuitError::DuplicateRegister { name });
        }
        table.insert(name.clone(), Register::new(name.clone(), size, kind));
        for i in 0..size {
            self.dag.add_wire(Wire::of(kind, RegBit::new(name.clone(), i)));
        }
        Ok(())
    }

    /// Register a basis element, reconciling against existing signatures
    /// and gate definitions for the same name.
    pub fn add_basis_element(
        &mut self,
        name: &str,
        qubits: GateArity,
        clbits: u32,
        params: u32,
    ) -> CircuitResult<()> {
        let element = BasisElement::new(name, qubits, clbits, params);
        if let Some(data) = self.gates.get(name) {
            data.check_against(&element)?;
        }
        self.basis.insert(element)
    }

    /// Record a composite gate definition.
    ///
    /// Re-recording an identical definition is a no-op; a differing
    /// definition for a known name is rejected. The definition is also
    /// cross-checked against any existing basis signature.
    pub fn add_gate_data(&mut self, name: &str, data: GateData) -> CircuitResult<()> {
        if let Some(existing) = self.gates.get(name) {
            if existing != &data {
                return Err(CircuitError::InequivalentGate {
                    name: name.to_string(),
                });
            }
            return Ok(());
        }
        if let Some(element) = self.basis.get(name) {
            data.check_against(element)?;
        }
        self.gates.insert(name.to_string(), data);
        Ok(())
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Append an operation at the end of the circuit.
    ///
    /// The name must resolve in the basis catalog with matching argument
    /// and parameter counts, and every wire reference (including the
    /// condition) must resolve to a declared register index. On failure
    /// the graph is left unmodified.
    pub fn apply_operation_back(
        &mut self,
        name: &str,
        qargs: Vec<RegBit>,
        cargs: Vec<RegBit>,
        params: Vec<String>,
        condition: Option<Condition>,
    ) -> CircuitResult<NodeIndex> {
        let element = self
            .basis
            .get(name)
            .ok_or_else(|| CircuitError::NoBasisOp {
                name: name.to_string(),
            })?
            .clone();

        if let GateArity::Fixed(expected) = element.qubits {
            if expected as usize != qargs.len() {
                return Err(CircuitError::QubitsNumber {
                    name: name.to_string(),
                    expected,
                    got: qargs.len(),
                });
            }
        }
        if element.clbits as usize != cargs.len() {
            return Err(CircuitError::BitsNumber {
                name: name.to_string(),
                expected: element.clbits,
                got: cargs.len(),
            });
        }
        if element.params as usize != params.len() {
            return Err(CircuitError::ParamsNumber {
                name: name.to_string(),
                expected: element.params,
                got: params.len(),
            });
        }

        for q in &qargs {
            self.resolve_bit(RegisterKind::Quantum, q)?;
        }
        for c in &cargs {
            self.resolve_bit(RegisterKind::Classical, c)?;
        }
        if let Some(cond) = &condition {
            self.resolve_condition(name, cond)?;
        }

        self.dag
            .apply_back(Operation::new(name, qargs, cargs, params, condition))
    }

    /// Resolve a wire reference against the registers of one kind.
    fn resolve_bit(&self, kind: RegisterKind, bit: &RegBit) -> CircuitResult<()> {
        let (own, other) = match kind {
            RegisterKind::Quantum => (&self.qregs, &self.cregs),
            RegisterKind::Classical => (&self.cregs, &self.qregs),
        };
        match own.get(&bit.register) {
            Some(reg) if bit.index < reg.size => Ok(()),
            Some(_) => Err(CircuitError::BitNotFound { bit: bit.clone() }),
            None if other.contains_key(&bit.register) => Err(CircuitError::WireType {
                expected: kind,
                bit: bit.clone(),
            }),
            None => Err(CircuitError::NoRegister {
                name: bit.register.clone(),
            }),
        }
    }

    /// Resolve the classical register referenced by a condition.
    fn resolve_condition(&self, op_name: &str, cond: &Condition) -> CircuitResult<()> {
        match self.cregs.get(&cond.bit.register) {
            Some(reg) if cond.bit.index < reg.size => Ok(()),
            Some(_) => Err(CircuitError::BitNotFound {
                bit: cond.bit.clone(),
            }),
            None => Err(CircuitError::CregCondition {
                name: op_name.to_string(),
            }),
        }
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Merge `other`'s operations into this circuit under an explicit
    /// bit-to-bit correspondence.
    ///
    /// The map must be one-to-one from `other`'s wires to this circuit's
    /// wires; registers of `other` not mentioned in the map are
    /// identity-mapped when this circuit has a register of the same name,
    /// kind and size. The whole mapping and all basis and gate-definition
    /// reconciliations are validated before any operation is applied, so
    /// a failing compose leaves this circuit exactly as it was.
    pub fn compose(&mut self, other: &Circuit, wire_map: &[(RegBit, RegBit)]) -> CircuitResult<()> {
        let resolved = self.resolve_wire_map(other, wire_map)?;

        // Reconcile other's basis and gate definitions before mutating.
        for element in other.basis.iter() {
            self.basis.check(element)?;
            if let Some(data) = self.gates.get(&element.name) {
                data.check_against(element)?;
            }
        }
        for (name, data) in &other.gates {
            if let Some(existing) = self.gates.get(name) {
                if existing != data {
                    return Err(CircuitError::InequivalentGate { name: name.clone() });
                }
            } else if let Some(element) = self.basis.get(name) {
                data.check_against(element)?;
            }
        }

        // All checks passed: merge catalogs, then replay the operations.
        for element in other.basis.iter() {
            self.basis.insert(element.clone())?;
        }
        for (name, data) in &other.gates {
            self.gates.entry(name.clone()).or_insert_with(|| data.clone());
        }

        for op in other.dag.ops() {
            let qargs = op
                .qargs
                .iter()
                .map(|b| resolved[&Wire::Qubit(b.clone())].bit().clone())
                .collect();
            let cargs = op
                .cargs
                .iter()
                .map(|b| resolved[&Wire::Clbit(b.clone())].bit().clone())
                .collect();
            let condition = op.condition.as_ref().map(|cond| {
                let bit = resolved[&Wire::Clbit(cond.bit.clone())].bit().clone();
                Condition::new(bit, cond.value)
            });
            self.apply_operation_back(&op.name, qargs, cargs, op.params.clone(), condition)?;
        }

        Ok(())
    }

    /// Validate a wire map and expand it to a total mapping over all of
    /// `other`'s wires.
    fn resolve_wire_map(
        &self,
        other: &Circuit,
        wire_map: &[(RegBit, RegBit)],
    ) -> CircuitResult<FxHashMap<Wire, Wire>> {
        let mut resolved: FxHashMap<Wire, Wire> = FxHashMap::default();
        let mut values: FxHashSet<Wire> = FxHashSet::default();
        // Indices covered per mapped register of `other`.
        let mut covered: FxHashMap<(RegisterKind, String), FxHashSet<u32>> = FxHashMap::default();

        for (key, value) in wire_map {
            let kind = other
                .kind_of(&key.register)
                .filter(|k| {
                    other
                        .register(*k, &key.register)
                        .is_some_and(|r| key.index < r.size)
                })
                .ok_or_else(|| CircuitError::InvalidWireMapKey { wire: key.clone() })?;

            // The value must be a wire of this circuit with the same kind.
            if self
                .register(kind, &value.register)
                .is_none_or(|r| value.index >= r.size)
            {
                let flipped = match kind {
                    RegisterKind::Quantum => RegisterKind::Classical,
                    RegisterKind::Classical => RegisterKind::Quantum,
                };
                if self
                    .register(flipped, &value.register)
                    .is_some_and(|r| value.index < r.size)
                {
                    return Err(CircuitError::InconsistentWireMap {
                        expected: kind,
                        key: key.clone(),
                        value: value.clone(),
                    });
                }
                return Err(CircuitError::InvalidWireMapValue {
                    wire: value.clone(),
                });
            }

            let key_wire = Wire::of(kind, key.clone());
            let value_wire = Wire::of(kind, value.clone());
            if !values.insert(value_wire.clone()) {
                return Err(CircuitError::DuplicatesInWireMap);
            }
            if resolved.insert(key_wire, value_wire).is_some() {
                return Err(CircuitError::DuplicatesInWireMap);
            }
            covered
                .entry((kind, key.register.clone()))
                .or_default()
                .insert(key.index);
        }

        // A register mentioned in the map must be covered wholly.
        for ((kind, name), indices) in &covered {
            let size = other
                .register(*kind, name)
                .map(|r| r.size as usize)
                .unwrap_or(0);
            if indices.len() != size {
                return Err(CircuitError::WireFrag { name: name.clone() });
            }
        }

        // Identity-map registers of `other` the map does not mention, when
        // this circuit has a same-name, same-kind, same-size register.
        for reg in other.registers() {
            if covered.contains_key(&(reg.kind, reg.name.clone())) {
                continue;
            }
            let Some(own) = self.register(reg.kind, &reg.name) else {
                continue;
            };
            if own.size != reg.size {
                continue;
            }
            for i in 0..reg.size {
                let wire = Wire::of(reg.kind, RegBit::new(reg.name.clone(), i));
                if !values.insert(wire.clone()) {
                    return Err(CircuitError::DuplicatesInWireMap);
                }
                resolved.insert(wire.clone(), wire);
            }
        }

        // The resolved mapping must cover other's wires exactly.
        let expected = other.num_wires();
        if resolved.len() != expected {
            return Err(CircuitError::TotalWires {
                expected,
                got: resolved.len(),
            });
        }
        for wire in other.dag.wires() {
            if !resolved.contains_key(wire) {
                return Err(CircuitError::MissingWire {
                    wire: wire.bit().clone(),
                });
            }
        }

        Ok(resolved)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Look up a register of the given kind.
    pub fn register(&self, kind: RegisterKind, name: &str) -> Option<&Register> {
        match kind {
            RegisterKind::Quantum => self.qregs.get(name),
            RegisterKind::Classical => self.cregs.get(name),
        }
    }

    /// The kind of the register with this name, preferring quantum when
    /// the name exists in both namespaces.
    pub fn kind_of(&self, name: &str) -> Option<RegisterKind> {
        if self.qregs.contains_key(name) {
            Some(RegisterKind::Quantum)
        } else if self.cregs.contains_key(name) {
            Some(RegisterKind::Classical)
        } else {
            None
        }
    }

    /// Iterate over all registers, both kinds.
    pub fn registers(&self) -> impl Iterator<Item = &Register> {
        self.qregs.values().chain(self.cregs.values())
    }

    /// Total number of qubits across quantum registers.
    pub fn num_qubits(&self) -> usize {
        self.qregs.values().map(|r| r.size as usize).sum()
    }

    /// Total number of classical bits across classical registers.
    pub fn num_clbits(&self) -> usize {
        self.cregs.values().map(|r| r.size as usize).sum()
    }

    /// Total number of wires.
    pub fn num_wires(&self) -> usize {
        self.num_qubits() + self.num_clbits()
    }

    /// Number of applied operations.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Iterate over operations in arrival order.
    pub fn ops(&self) -> impl Iterator<Item = &Operation> {
        self.dag.ops()
    }

    /// The accepted basis catalog.
    pub fn basis(&self) -> &BasisTable {
        &self.basis
    }

    /// Look up a composite gate definition.
    pub fn gate_data(&self, name: &str) -> Option<&GateData> {
        self.gates.get(name)
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circuit_with_regs() -> Circuit {
        let mut circuit = Circuit::new();
        circuit.add_qreg("q", 2).unwrap();
        circuit.add_creg("c", 2).unwrap();
        circuit
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let mut circuit = circuit_with_regs();
        let err = circuit.add_qreg("q", 3).unwrap_err();
        assert!(matches!(err, CircuitError::DuplicateRegister { name } if name == "q"));
    }

    #[test]
    fn test_register_namespaces_independent() {
        let mut circuit = Circuit::new();
        circuit.add_qreg("r", 1).unwrap();
        // Same name as a classical register is legal.
        circuit.add_creg("r", 1).unwrap();
        assert_eq!(circuit.num_wires(), 2);
    }

    #[test]
    fn test_apply_unknown_basis_op() {
        let mut circuit = circuit_with_regs();
        let err = circuit
            .apply_operation_back("X", vec![RegBit::new("q", 0)], vec![], vec![], None)
            .unwrap_err();
        assert!(matches!(err, CircuitError::NoBasisOp { name } if name == "X"));
    }

    #[test]
    fn test_arity_mismatch_leaves_graph_unchanged() {
        let mut circuit = circuit_with_regs();
        circuit
            .add_basis_element("CX", GateArity::Fixed(2), 0, 0)
            .unwrap();

        let err = circuit
            .apply_operation_back("CX", vec![RegBit::new("q", 0)], vec![], vec![], None)
            .unwrap_err();
        assert!(matches!(
            err,
            CircuitError::QubitsNumber {
                expected: 2,
                got: 1,
                ..
            }
        ));
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_apply_links_chains() {
        let mut circuit = circuit_with_regs();
        circuit
            .add_basis_element("U", GateArity::Fixed(1), 0, 3)
            .unwrap();
        circuit
            .add_basis_element("measure", GateArity::Fixed(1), 1, 0)
            .unwrap();

        circuit
            .apply_operation_back(
                "U",
                vec![RegBit::new("q", 0)],
                vec![],
                vec!["0.5".into(), "0.0".into(), "0.0".into()],
                None,
            )
            .unwrap();
        circuit
            .apply_operation_back(
                "measure",
                vec![RegBit::new("q", 0)],
                vec![RegBit::new("c", 0)],
                vec![],
                None,
            )
            .unwrap();

        assert_eq!(circuit.num_ops(), 2);
        assert_eq!(
            circuit.dag().chain_len(&Wire::Qubit(RegBit::new("q", 0))),
            2
        );
        assert_eq!(
            circuit.dag().chain_len(&Wire::Clbit(RegBit::new("c", 0))),
            1
        );
        circuit.dag().verify_integrity().unwrap();
    }

    #[test]
    fn test_wrong_kind_argument() {
        let mut circuit = circuit_with_regs();
        circuit
            .add_basis_element("reset", GateArity::Fixed(1), 0, 0)
            .unwrap();

        // "c" exists, but only as a classical register.
        let err = circuit
            .apply_operation_back("reset", vec![RegBit::new("c", 0)], vec![], vec![], None)
            .unwrap_err();
        assert!(matches!(
            err,
            CircuitError::WireType {
                expected: RegisterKind::Quantum,
                ..
            }
        ));
    }

    #[test]
    fn test_condition_requires_classical_register() {
        let mut circuit = circuit_with_regs();
        circuit
            .add_basis_element("U", GateArity::Fixed(1), 0, 3)
            .unwrap();

        let err = circuit
            .apply_operation_back(
                "U",
                vec![RegBit::new("q", 0)],
                vec![],
                vec!["0.0".into(), "0.0".into(), "0.0".into()],
                Some(Condition::new(RegBit::new("nope", 0), 1)),
            )
            .unwrap_err();
        assert!(matches!(err, CircuitError::CregCondition { name } if name == "U"));
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_gate_data_reconciliation() {
        let mut circuit = Circuit::new();
        circuit
            .add_basis_element("foo", GateArity::Fixed(2), 0, 1)
            .unwrap();

        // Matching definition is accepted, twice.
        let data = GateData::with_body(2, 1, "cx a,b;");
        circuit.add_gate_data("foo", data.clone()).unwrap();
        circuit.add_gate_data("foo", data).unwrap();

        // A differing re-definition is rejected.
        let err = circuit
            .add_gate_data("foo", GateData::with_body(2, 1, "cz a,b;"))
            .unwrap_err();
        assert!(matches!(err, CircuitError::InequivalentGate { name } if name == "foo"));

        // A basis registration clashing with recorded gate data is rejected.
        circuit.add_gate_data("bar", GateData::opaque(1, 0)).unwrap();
        let err = circuit
            .add_basis_element("bar", GateArity::Fixed(2), 0, 0)
            .unwrap_err();
        assert!(matches!(err, CircuitError::GateMatch { name } if name == "bar"));
    }

    #[test]
    fn test_variadic_barrier() {
        let mut circuit = circuit_with_regs();
        circuit
            .add_basis_element("barrier", GateArity::Variadic, 0, 0)
            .unwrap();

        circuit
            .apply_operation_back(
                "barrier",
                vec![RegBit::new("q", 0), RegBit::new("q", 1)],
                vec![],
                vec![],
                None,
            )
            .unwrap();
        assert_eq!(circuit.num_ops(), 1);
    }
}
