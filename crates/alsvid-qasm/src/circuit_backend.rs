//! Backend that builds a circuit graph from structural events.

use rustc_hash::FxHashMap;

use alsvid_ir::{Circuit, Condition, GateArity, GateData, RegBit};

use crate::ast::format_real;
use crate::backend::UnrollerBackend;
use crate::error::{UnrollError, UnrollResult};

/// Decimal digits used when rendering float parameters.
const DEFAULT_PRECISION: usize = 15;

/// Emission scope of the backend.
///
/// While a composite gate whose name is already in the accepted basis is
/// being expanded by the driver, the backend suppresses the primitive
/// events belonging to its body so the gate is not emitted twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitScope {
    /// Emit operations as they are seen.
    Listening,
    /// Inside the named composite gate; primitive events are ignored.
    Suppressed {
        /// Name of the active composite scope.
        gate: String,
    },
}

/// Backend that creates a [`Circuit`] from the event stream.
///
/// Tracks the emission scope and the currently attached classical
/// condition, forwards validated calls into the circuit graph, and grows
/// the basis catalog lazily as new primitive kinds are first seen.
#[derive(Debug)]
pub struct CircuitBackend {
    /// Names accepted for emission as primitives.
    basis: Vec<String>,
    /// The circuit under construction.
    circuit: Circuit,
    /// Recorded composite gate definitions.
    gates: FxHashMap<String, GateData>,
    /// Current emission scope.
    scope: EmitScope,
    /// Currently attached classical condition, if any.
    condition: Option<Condition>,
    /// Rendering precision for float parameters.
    precision: usize,
}

impl CircuitBackend {
    /// Create a backend with an initial accepted basis.
    pub fn new(basis: impl IntoIterator<Item = String>) -> Self {
        Self {
            basis: basis.into_iter().collect(),
            circuit: Circuit::new(),
            gates: FxHashMap::default(),
            scope: EmitScope::Listening,
            condition: None,
            precision: DEFAULT_PRECISION,
        }
    }

    /// The circuit built so far.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Consume the backend and return the built circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// The current emission scope.
    pub fn scope(&self) -> &EmitScope {
        &self.scope
    }

    #[inline]
    fn is_listening(&self) -> bool {
        self.scope == EmitScope::Listening
    }

    fn format(&self, value: f64) -> String {
        format_real(value, self.precision)
    }
}

impl Default for CircuitBackend {
    fn default() -> Self {
        Self::new([])
    }
}

impl UnrollerBackend for CircuitBackend {
    fn set_basis(&mut self, basis: Vec<String>) {
        self.basis = basis;
    }

    fn version(&mut self, _version: &str) {}

    fn new_qreg(&mut self, name: &str, size: u32) -> UnrollResult<()> {
        self.circuit.add_qreg(name, size)?;
        Ok(())
    }

    fn new_creg(&mut self, name: &str, size: u32) -> UnrollResult<()> {
        self.circuit.add_creg(name, size)?;
        Ok(())
    }

    fn define_gate(&mut self, name: &str, gatedata: GateData) -> UnrollResult<()> {
        self.gates.insert(name.to_string(), gatedata.clone());
        self.circuit.add_gate_data(name, gatedata)?;
        Ok(())
    }

    fn u(&mut self, params: (f64, f64, f64), qubit: RegBit) -> UnrollResult<()> {
        if !self.is_listening() {
            return Ok(());
        }
        let condition = self.condition.clone();
        if !self.basis.iter().any(|b| b == "U") {
            self.basis.push("U".to_string());
            self.circuit
                .add_basis_element("U", GateArity::Fixed(1), 0, 3)?;
        }
        self.circuit.apply_operation_back(
            "U",
            vec![qubit],
            vec![],
            vec![
                self.format(params.0),
                self.format(params.1),
                self.format(params.2),
            ],
            condition,
        )?;
        Ok(())
    }

    fn cx(&mut self, qubit0: RegBit, qubit1: RegBit) -> UnrollResult<()> {
        if !self.is_listening() {
            return Ok(());
        }
        let condition = self.condition.clone();
        if !self.basis.iter().any(|b| b == "CX") {
            self.basis.push("CX".to_string());
            self.circuit
                .add_basis_element("CX", GateArity::Fixed(2), 0, 0)?;
        }
        self.circuit
            .apply_operation_back("CX", vec![qubit0, qubit1], vec![], vec![], condition)?;
        Ok(())
    }

    fn measure(&mut self, qubit: RegBit, clbit: RegBit) -> UnrollResult<()> {
        // Measurement is not suppressed inside gate expansion.
        let condition = self.condition.clone();
        if !self.basis.iter().any(|b| b == "measure") {
            self.basis.push("measure".to_string());
            self.circuit
                .add_basis_element("measure", GateArity::Fixed(1), 1, 0)?;
        }
        self.circuit
            .apply_operation_back("measure", vec![qubit], vec![clbit], vec![], condition)?;
        Ok(())
    }

    fn barrier(&mut self, qubitlists: &[Vec<RegBit>]) -> UnrollResult<()> {
        if !self.is_listening() {
            return Ok(());
        }
        let names: Vec<RegBit> = qubitlists.iter().flatten().cloned().collect();
        if !self.basis.iter().any(|b| b == "barrier") {
            self.basis.push("barrier".to_string());
            self.circuit
                .add_basis_element("barrier", GateArity::Variadic, 0, 0)?;
        }
        self.circuit
            .apply_operation_back("barrier", names, vec![], vec![], None)?;
        Ok(())
    }

    fn reset(&mut self, qubit: RegBit) -> UnrollResult<()> {
        // Reset always acts, like measurement.
        let condition = self.condition.clone();
        if !self.basis.iter().any(|b| b == "reset") {
            self.basis.push("reset".to_string());
            self.circuit
                .add_basis_element("reset", GateArity::Fixed(1), 0, 0)?;
        }
        self.circuit
            .apply_operation_back("reset", vec![qubit], vec![], vec![], condition)?;
        Ok(())
    }

    fn set_condition(&mut self, creg: RegBit, value: i64) {
        self.condition = Some(Condition::new(creg, value));
    }

    fn drop_condition(&mut self) {
        self.condition = None;
    }

    fn start_gate(&mut self, name: &str, args: &[f64], qubits: &[RegBit]) -> UnrollResult<()> {
        let in_basis = self.basis.iter().any(|b| b == name);

        if self.is_listening() && !in_basis {
            // The gate must be expandable: an opaque gate outside the
            // accepted basis has no known decomposition.
            if let Some(gate) = self.gates.get(name) {
                if gate.opaque {
                    return Err(UnrollError::Opaque {
                        name: name.to_string(),
                    });
                }
            }
        }

        if self.is_listening() && in_basis {
            let condition = self.condition.clone();
            self.scope = EmitScope::Suppressed {
                gate: name.to_string(),
            };
            self.circuit.add_basis_element(
                name,
                GateArity::Fixed(qubits.len() as u32),
                0,
                args.len() as u32,
            )?;
            let params = args.iter().map(|a| self.format(*a)).collect();
            self.circuit
                .apply_operation_back(name, qubits.to_vec(), vec![], params, condition)?;
        }
        Ok(())
    }

    fn end_gate(&mut self, name: &str, _args: &[f64], _qubits: &[RegBit]) {
        match &self.scope {
            EmitScope::Suppressed { gate } if gate == name => {
                self.scope = EmitScope::Listening;
            }
            EmitScope::Suppressed { gate } => {
                // Mismatched end events cannot corrupt graph state; keep
                // the scope but leave a trace for debugging.
                tracing::debug!(active = %gate, got = %name, "ignoring mismatched end_gate");
            }
            EmitScope::Listening => {
                tracing::debug!(got = %name, "ignoring end_gate while listening");
            }
        }
    }
}
