//! Prepared payload stored inside a [`qubridge_hal::PreparedCircuit`].

use rustc_hash::{FxHashMap, FxHashSet};

use qubridge_ir::{Circuit, ClbitId, InstructionKind};
use qubridge_sim::NativeCircuit;

use crate::convert::{ConvertOptions, QubitMap, circuit_to_native};
use crate::error::{ConvertError, ConvertResult};

/// Native circuit plus what is needed to read results back in source terms.
#[derive(Debug, Clone)]
pub struct QulacsCircuit {
    native: NativeCircuit,
    map: QubitMap,
    readout: Readout,
}

impl QulacsCircuit {
    /// Convert `circuit` with ILO numbering and resolve its measurements.
    ///
    /// Measurements must be terminal: a gate on an already measured qubit is
    /// rejected.
    pub fn compile(circuit: &Circuit) -> ConvertResult<Self> {
        let options = ConvertOptions::reversed();
        let native = circuit_to_native(circuit, &options)?;
        let map = QubitMap::for_circuit(circuit, &options);
        let readout = Readout::for_circuit(circuit, &map)?;
        Ok(Self {
            native,
            map,
            readout,
        })
    }

    /// The converted circuit.
    pub fn native(&self) -> &NativeCircuit {
        &self.native
    }

    /// Source qubit to native index.
    pub fn qubit_map(&self) -> &QubitMap {
        &self.map
    }

    pub(crate) fn readout(&self) -> &Readout {
        &self.readout
    }
}

/// Which native bit feeds each classical bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Readout {
    columns: Vec<Option<usize>>,
}

impl Readout {
    fn for_circuit(circuit: &Circuit, map: &QubitMap) -> ConvertResult<Self> {
        let column_of: FxHashMap<ClbitId, usize> = circuit
            .clbits()
            .iter()
            .enumerate()
            .map(|(col, bit)| (bit.id, col))
            .collect();
        let mut columns = vec![None; column_of.len()];
        let mut measured = FxHashSet::default();

        for (position, inst) in circuit.iter().enumerate() {
            match &inst.kind {
                InstructionKind::Measure => {
                    let (Some(&qubit), Some(clbit)) = (inst.qubits.first(), inst.clbits.first())
                    else {
                        continue;
                    };
                    if let Some(&col) = column_of.get(clbit) {
                        columns[col] = Some(map.index(qubit)?);
                    }
                    measured.insert(qubit);
                }
                InstructionKind::Barrier => {}
                InstructionKind::Gate(_) | InstructionKind::Reset => {
                    if let Some(qubit) = inst.qubits.iter().find(|q| measured.contains(*q)) {
                        return Err(ConvertError::MeasuredQubitReused {
                            gate: inst.name().to_string(),
                            position,
                            qubit: qubit.0,
                        });
                    }
                }
            }
        }
        Ok(Self { columns })
    }

    /// Number of classical bits.
    pub(crate) fn width(&self) -> usize {
        self.columns.len()
    }

    /// Classical bits for a sampled native basis index; unwritten bits are 0.
    pub(crate) fn row(&self, outcome: usize) -> Vec<u8> {
        self.columns
            .iter()
            .map(|column| column.map_or(0, |bit| ((outcome >> bit) & 1) as u8))
            .collect()
    }
}
