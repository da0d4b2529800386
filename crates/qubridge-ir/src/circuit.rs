//! High-level circuit builder API.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind, OpType};
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::ParameterExpression;
use crate::qubit::{Clbit, ClbitId, QuantumRegister, Qubit, QubitId};

/// Name of the register used by [`Circuit::with_size`] and [`Circuit::add_qubit`].
pub const DEFAULT_QREG: &str = "q";

/// Name of the register used by [`Circuit::with_size`] and [`Circuit::add_clbit`].
pub const DEFAULT_CREG: &str = "c";

/// A quantum circuit: an ordered list of instructions over declared qubits
/// and classical bits.
///
/// Instructions are validated as they are appended, so every instruction in
/// a circuit references declared wires with the arity its gate requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in declaration order; `qubits[i].id == QubitId(i)`.
    qubits: Vec<Qubit>,
    /// Classical bits in declaration order; `clbits[i].id == ClbitId(i)`.
    clbits: Vec<Clbit>,
    /// Quantum registers in declaration order.
    qregs: Vec<QuantumRegister>,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
    /// Global phase in half-turns.
    phase: f64,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            qregs: vec![],
            instructions: vec![],
            phase: 0.0,
        }
    }

    /// Create a circuit with a default quantum register `q` and classical
    /// register `c`.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Append a qubit to the default register.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.qubits.len() as u32);
        let pos = match self.qregs.iter().position(|r| r.name == DEFAULT_QREG) {
            Some(pos) => pos,
            None => {
                self.qregs.push(QuantumRegister {
                    name: DEFAULT_QREG.into(),
                    qubits: vec![],
                });
                self.qregs.len() - 1
            }
        };
        let reg = &mut self.qregs[pos];
        let index = reg.qubits.len() as u32;
        reg.qubits.push(id);
        self.qubits.push(Qubit::new(id, DEFAULT_QREG, index));
        id
    }

    /// Declare a new quantum register.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<QubitId>> {
        let name = name.into();
        if self.qregs.iter().any(|r| r.name == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        let mut ids = Vec::with_capacity(size as usize);
        for i in 0..size {
            let id = QubitId(self.qubits.len() as u32);
            self.qubits.push(Qubit::new(id, &name, i));
            ids.push(id);
        }
        self.qregs.push(QuantumRegister {
            name,
            qubits: ids.clone(),
        });
        Ok(ids)
    }

    /// Append a classical bit to the default register.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.clbits.len() as u32);
        let index = self
            .clbits
            .iter()
            .filter(|c| c.register == DEFAULT_CREG)
            .count() as u32;
        self.clbits.push(Clbit::new(id, DEFAULT_CREG, index));
        id
    }

    /// Declare a new classical register.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<ClbitId>> {
        let name = name.into();
        if self.clbits.iter().any(|c| c.register == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        let ids = (0..size)
            .map(|i| {
                let id = ClbitId(self.clbits.len() as u32);
                self.clbits.push(Clbit::new(id, &name, i));
                id
            })
            .collect();
        Ok(ids)
    }

    /// Append an instruction after validating its operands.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.check(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn check(&self, inst: &Instruction) -> IrResult<()> {
        let gate_name = || Some(inst.name().to_string());

        let mut seen = FxHashSet::default();
        for &qubit in &inst.qubits {
            if qubit.0 as usize >= self.qubits.len() {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name(),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name(),
                });
            }
        }
        for &clbit in &inst.clbits {
            if clbit.0 as usize >= self.clbits.len() {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name(),
                });
            }
        }

        let expected = match &inst.kind {
            InstructionKind::Gate(gate) => {
                if let GateKind::Standard(op) = gate.kind {
                    if gate.params.len() != op.num_params() {
                        return Err(IrError::ParameterCountMismatch {
                            gate_name: op.name().to_string(),
                            expected: op.num_params(),
                            got: gate.params.len(),
                        });
                    }
                }
                Some(gate.num_qubits())
            }
            InstructionKind::Measure | InstructionKind::Reset => Some(1),
            InstructionKind::Barrier => None,
        };
        if let Some(expected) = expected {
            let got = inst.qubits.len() as u32;
            if got != expected {
                return Err(IrError::QubitCountMismatch {
                    gate_name: inst.name().to_string(),
                    expected,
                    got,
                });
            }
        }
        if inst.is_measure() && inst.clbits.len() != 1 {
            return Err(IrError::QubitCountMismatch {
                gate_name: "measure".into(),
                expected: 1,
                got: inst.clbits.len() as u32,
            });
        }
        Ok(())
    }

    fn fixed(&mut self, op: OpType, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.append(Instruction::gate(op, qubits.iter().copied()))
    }

    fn rotation(
        &mut self,
        op: OpType,
        params: Vec<ParameterExpression>,
        qubits: &[QubitId],
    ) -> IrResult<&mut Self> {
        let gate = Gate::new(op, params)?;
        self.append(Instruction::gate(gate, qubits.iter().copied()))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::H, &[qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::X, &[qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::Y, &[qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::Z, &[qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::S, &[qubit])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::Sdg, &[qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::T, &[qubit])
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::Tdg, &[qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::SX, &[qubit])
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::SXdg, &[qubit])
    }

    /// Apply Rx rotation; `angle` in half-turns.
    pub fn rx(
        &mut self,
        angle: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::Rx, vec![angle.into()], &[qubit])
    }

    /// Apply Ry rotation; `angle` in half-turns.
    pub fn ry(
        &mut self,
        angle: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::Ry, vec![angle.into()], &[qubit])
    }

    /// Apply Rz rotation; `angle` in half-turns.
    pub fn rz(
        &mut self,
        angle: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::Rz, vec![angle.into()], &[qubit])
    }

    /// Apply U1(λ).
    pub fn u1(
        &mut self,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::U1, vec![lambda.into()], &[qubit])
    }

    /// Apply U2(φ, λ).
    pub fn u2(
        &mut self,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::U2, vec![phi.into(), lambda.into()], &[qubit])
    }

    /// Apply U3(θ, φ, λ).
    pub fn u3(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(
            OpType::U3,
            vec![theta.into(), phi.into(), lambda.into()],
            &[qubit],
        )
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::CX, &[control, target])
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::CY, &[control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::CZ, &[control, target])
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::CH, &[control, target])
    }

    /// Apply controlled-Rz gate.
    pub fn crz(
        &mut self,
        angle: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::CRz, vec![angle.into()], &[control, target])
    }

    /// Apply controlled-phase gate.
    pub fn cp(
        &mut self,
        angle: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::CP, vec![angle.into()], &[control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::Swap, &[q1, q2])
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::ISwap, &[q1, q2])
    }

    /// Apply ZZ-phase interaction.
    pub fn zz_phase(
        &mut self,
        angle: impl Into<ParameterExpression>,
        q1: QubitId,
        q2: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::ZZPhase, vec![angle.into()], &[q1, q2])
    }

    // =========================================================================
    // Three-qubit gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::CCX, &[c1, c2, target])
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.fixed(OpType::CSwap, &[control, t1, t2])
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits))
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.append(Instruction::measure(qubit, clbit))
    }

    /// Measure every qubit `i` into classical bit `i`, adding bits to the
    /// default register as needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.clbits.len() < self.qubits.len() {
            self.add_clbit();
        }
        for i in 0..self.qubits.len() as u32 {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::reset(qubit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.append(Instruction::barrier(qubits))
    }

    /// Add to the global phase, in half-turns.
    pub fn add_phase(&mut self, half_turns: f64) -> &mut Self {
        self.phase += half_turns;
        self
    }

    /// Return a copy with the given symbols substituted.
    pub fn bind_parameters(&self, bindings: &FxHashMap<String, f64>) -> Self {
        let mut bound = self.clone();
        for inst in &mut bound.instructions {
            if let InstructionKind::Gate(gate) = &mut inst.kind {
                for param in &mut gate.params {
                    *param = param.bind(bindings);
                }
            }
        }
        bound
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the qubits in declaration order.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in declaration order.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Get the quantum registers in declaration order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterate over instructions in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Global phase in half-turns.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Number of gate instructions (measures, resets and barriers excluded).
    pub fn n_gates(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Number of gates of the given kind.
    pub fn n_gates_of_type(&self, op: OpType) -> usize {
        self.instructions
            .iter()
            .filter_map(Instruction::as_gate)
            .filter(|g| g.kind.op_type() == Some(op))
            .count()
    }

    /// Names of all free symbols used by gate parameters.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        self.instructions
            .iter()
            .filter_map(Instruction::as_gate)
            .flat_map(|g| g.params.iter().flat_map(ParameterExpression::symbols))
            .collect()
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a measured Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure(QubitId(0), ClbitId(0))?
            .measure(QubitId(1), ClbitId(1))?;
        Ok(circuit)
    }

    /// Create a measured GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }

        let mut circuit = Self::with_size("ghz", n, n);
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
