//! Assignment of integer ids to wires for serialization.
//!
//! Left inputs get `0..L`, right inputs `L..L+R`, outputs the top `O` ids of the
//! circuit's wire count. Everything else is numbered in first-use order while walking
//! the gate list. The wire count covers every wire ever allocated, so a wire that no
//! gate or boundary group touches leaves a hole in the id space.

use crate::error::{CircuitError, Result};
use crate::wire::CircuitId;
use crate::{Circuit, Wire};

#[derive(Clone, Debug)]
pub struct WireNumbering {
    circuit: CircuitId,
    ids: Vec<Option<usize>>,
    next: usize,
    left: usize,
    right: usize,
    outputs: usize,
}

impl WireNumbering {
    pub(crate) fn assign(
        circuit: &Circuit,
        left: &[Wire],
        right: &[Wire],
        outputs: &[Wire],
    ) -> Result<Self> {
        let total = circuit.wire_count();
        let mut numbering = WireNumbering {
            circuit: circuit.id(),
            ids: vec![None; total],
            next: 0,
            left: left.len(),
            right: right.len(),
            outputs: outputs.len(),
        };

        for wire in left.iter().chain(right) {
            numbering.claim(*wire)?;
        }

        let base = total.checked_sub(outputs.len()).ok_or_else(|| {
            CircuitError::BadSpec(format!(
                "{} output wires but the circuit only has {} wires",
                outputs.len(),
                total
            ))
        })?;
        for (i, wire) in outputs.iter().enumerate() {
            *numbering.slot(*wire)? = Some(base + i);
        }

        for gate in circuit.gates() {
            for wire in gate.inputs() {
                numbering.claim(*wire)?;
            }
            numbering.claim(gate.output())?;
        }

        Ok(numbering)
    }

    fn slot(&mut self, wire: Wire) -> Result<&mut Option<usize>> {
        if wire.circuit != self.circuit {
            return Err(CircuitError::ForeignWire(wire));
        }
        self.ids
            .get_mut(wire.index)
            .ok_or(CircuitError::ForeignWire(wire))
    }

    /// Hands out the next id unless the wire already has one.
    fn claim(&mut self, wire: Wire) -> Result<usize> {
        let next = self.next;
        let slot = self.slot(wire)?;
        match *slot {
            Some(id) => Ok(id),
            None => {
                *slot = Some(next);
                self.next += 1;
                Ok(next)
            }
        }
    }

    pub fn id(&self, wire: Wire) -> Option<usize> {
        if wire.circuit != self.circuit {
            return None;
        }
        self.ids.get(wire.index).copied().flatten()
    }

    /// Size of the id space, i.e. the wire count written to the header.
    pub fn total(&self) -> usize {
        self.ids.len()
    }

    pub fn left_count(&self) -> usize {
        self.left
    }

    pub fn right_count(&self) -> usize {
        self.right
    }

    pub fn output_count(&self) -> usize {
        self.outputs
    }

    /// Number of wires that actually received an id.
    pub fn assigned(&self) -> usize {
        self.ids.iter().filter(|id| id.is_some()).count()
    }
}
