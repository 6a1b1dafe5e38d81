//! Export functionality for JSON lines.

use serde_json::json;
use std::io::Write;

use crate::error::{CircuitError, Result};
use crate::exporters::Export;
use crate::numbering::WireNumbering;
use crate::{Circuit, Gate, Wire};

pub struct JSONL;

impl Export for JSONL {
    fn export_gate(gate: &Gate, numbering: &WireNumbering, sink: &mut impl Write) -> Result<()> {
        let id = |wire: Wire| numbering.id(wire).ok_or(CircuitError::ForeignWire(wire));
        let inputs = gate
            .inputs()
            .iter()
            .map(|wire| id(*wire))
            .collect::<Result<Vec<usize>>>()?;
        let output = id(gate.output())?;
        writeln!(
            sink,
            "{}",
            json!({ "op": gate.operation().to_string(), "inputs": inputs, "output": output })
        )?;
        Ok(())
    }

    fn export_circuit(
        circuit: &Circuit,
        numbering: &WireNumbering,
        sink: &mut impl Write,
    ) -> Result<()> {
        writeln!(
            sink,
            "{}",
            json!({
                "gates": circuit.gate_count(),
                "wires": numbering.total(),
                "left": numbering.left_count(),
                "right": numbering.right_count(),
                "outputs": numbering.output_count(),
            })
        )?;
        for gate in circuit.gates() {
            Self::export_gate(gate, numbering, sink)?;
        }

        Ok(())
    }
}
