use std::io::Write;

use crate::error::Result;
use crate::numbering::WireNumbering;
use crate::{Circuit, Gate};

mod bristol;
mod jsonl;

pub use bristol::BristolFashion;
pub use jsonl::JSONL;

/// The core export trait.
///
/// Individual exporters (such as for Bristol-fashion circuits) are expected
/// to implement this trait. Both methods receive a finished numbering, so
/// exporters only look ids up and never assign them.
pub trait Export {
    fn export_gate(gate: &Gate, numbering: &WireNumbering, sink: &mut impl Write) -> Result<()>;

    fn export_circuit(
        circuit: &Circuit,
        numbering: &WireNumbering,
        sink: &mut impl Write,
    ) -> Result<()>;
}
