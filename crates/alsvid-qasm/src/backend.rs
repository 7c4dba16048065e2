//! The unroller backend interface.

use alsvid_ir::{GateData, RegBit};

use crate::error::UnrollResult;

/// Sink for the structural events produced by walking a parsed circuit
/// description in document order.
///
/// The concrete [`CircuitBackend`](crate::CircuitBackend) builds a
/// circuit graph from the events; alternative backends (a pretty-printer,
/// a pure validator) can be substituted without touching the driver. A
/// returned error must be propagated by the driver: the walk aborts and
/// is never resumed past a failed event.
pub trait UnrollerBackend {
    /// Declare the set of user-defined gate names to emit as primitives.
    fn set_basis(&mut self, basis: Vec<String>);

    /// Observe the source's version string.
    fn version(&mut self, version: &str);

    /// Create a new quantum register.
    fn new_qreg(&mut self, name: &str, size: u32) -> UnrollResult<()>;

    /// Create a new classical register.
    fn new_creg(&mut self, name: &str, size: u32) -> UnrollResult<()>;

    /// Define a new composite gate.
    fn define_gate(&mut self, name: &str, gatedata: GateData) -> UnrollResult<()>;

    /// Fundamental single-qubit gate with three float parameters.
    fn u(&mut self, params: (f64, f64, f64), qubit: RegBit) -> UnrollResult<()>;

    /// Fundamental two-qubit gate: control and target qubits.
    fn cx(&mut self, qubit0: RegBit, qubit1: RegBit) -> UnrollResult<()>;

    /// Measurement from a qubit into a classical bit.
    fn measure(&mut self, qubit: RegBit, clbit: RegBit) -> UnrollResult<()>;

    /// Barrier over a list of qubit lists.
    fn barrier(&mut self, qubitlists: &[Vec<RegBit>]) -> UnrollResult<()>;

    /// Reset a qubit.
    fn reset(&mut self, qubit: RegBit) -> UnrollResult<()>;

    /// Attach the current classical condition.
    fn set_condition(&mut self, creg: RegBit, value: i64);

    /// Drop the current classical condition.
    fn drop_condition(&mut self);

    /// Begin a composite gate application.
    fn start_gate(&mut self, name: &str, args: &[f64], qubits: &[RegBit]) -> UnrollResult<()>;

    /// End a composite gate application.
    fn end_gate(&mut self, name: &str, args: &[f64], qubits: &[RegBit]);
}
