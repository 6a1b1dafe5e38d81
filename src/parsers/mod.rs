mod bristol;

pub use bristol::{CircuitTemplate, GateDescription};
