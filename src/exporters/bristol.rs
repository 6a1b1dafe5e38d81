use std::io::Write;

use crate::error::Result;
use crate::exporters::Export;
use crate::numbering::WireNumbering;
use crate::{Circuit, Gate};

pub struct BristolFashion;

impl Export for BristolFashion {
    fn export_gate(gate: &Gate, numbering: &WireNumbering, sink: &mut impl Write) -> Result<()> {
        writeln!(sink, "{}", gate.render(numbering)?)?;
        Ok(())
    }

    fn export_circuit(
        circuit: &Circuit,
        numbering: &WireNumbering,
        sink: &mut impl Write,
    ) -> Result<()> {
        // Header fields.
        writeln!(sink, "{} {}", circuit.gate_count(), numbering.total())?;
        writeln!(
            sink,
            "{} {} {}",
            numbering.left_count(),
            numbering.right_count(),
            numbering.output_count()
        )?;
        writeln!(sink)?;

        // Circuit body, in append order.
        for gate in circuit.gates() {
            Self::export_gate(gate, numbering, sink)?;
        }
        // An empty body still ends the file with a newline.
        if circuit.gates().is_empty() {
            writeln!(sink)?;
        }

        Ok(())
    }
}
