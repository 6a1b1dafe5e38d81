use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::Result;
use crate::exporters::{BristolFashion, Export};
use crate::numbering::WireNumbering;
use crate::wire::{expand_name, CircuitId};
use crate::{Gate, Wire, WireSpec};

/// Owns the wires, the name registry and the ordered gate list of one circuit.
#[derive(Debug)]
pub struct Circuit {
    id: CircuitId,
    wire_count: usize,
    wires_by_name: HashMap<String, Wire>,
    gates: Vec<Gate>,
}

impl Default for Circuit {
    fn default() -> Self {
        Circuit::new()
    }
}

impl Circuit {
    pub fn new() -> Self {
        Circuit {
            id: CircuitId::fresh(),
            wire_count: 0,
            wires_by_name: HashMap::new(),
            gates: Vec::new(),
        }
    }

    pub(crate) fn id(&self) -> CircuitId {
        self.id
    }

    /// With no name, allocates a fresh wire. With a name, returns the wire registered
    /// under it, allocating and registering one on first use.
    pub fn get_wire(&mut self, name: Option<&str>) -> Wire {
        match name {
            None => {
                let wire = Wire {
                    circuit: self.id,
                    index: self.wire_count,
                };
                self.wire_count += 1;
                wire
            }
            Some(name) => match self.wires_by_name.get(name) {
                Some(wire) => *wire,
                None => {
                    let wire = self.get_wire(None);
                    self.wires_by_name.insert(name.to_string(), wire);
                    wire
                }
            },
        }
    }

    pub fn fresh_wire(&mut self) -> Wire {
        self.get_wire(None)
    }

    pub fn named_wire(&mut self, name: &str) -> Wire {
        self.get_wire(Some(name))
    }

    /// Looks up a named wire without allocating.
    pub fn lookup(&self, name: &str) -> Option<Wire> {
        self.wires_by_name.get(name).copied()
    }

    pub fn contains(&self, wire: Wire) -> bool {
        wire.circuit == self.id && wire.index < self.wire_count
    }

    pub fn add_gate(&mut self, gate: Gate) {
        self.gates.push(gate);
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Every wire ever allocated, used or not.
    pub fn wire_count(&self) -> usize {
        self.wire_count
    }

    /// Resolves a spec into an ordered group of wires. Names are allocated on first use.
    pub fn convert_to_wires(&mut self, spec: impl Into<WireSpec>) -> Result<Vec<Wire>> {
        match spec.into() {
            WireSpec::Wire(wire) => Ok(vec![wire]),
            WireSpec::Wires(wires) => Ok(wires),
            WireSpec::Name(name) => Ok(expand_name(&name)?
                .iter()
                .map(|name| self.named_wire(name))
                .collect()),
            WireSpec::List(specs) => {
                let mut wires = Vec::new();
                for spec in specs {
                    wires.extend(self.convert_to_wires(spec)?);
                }
                Ok(wires)
            }
        }
    }

    /// Numbers every wire for serialization. See [`WireNumbering`].
    pub fn number_wires(
        &self,
        left_inputs: &[Wire],
        right_inputs: &[Wire],
        outputs: &[Wire],
    ) -> Result<WireNumbering> {
        WireNumbering::assign(self, left_inputs, right_inputs, outputs)
    }

    /// Ids of the named wires that ended up in the numbering, sorted by name.
    pub fn named_wire_ids(&self, numbering: &WireNumbering) -> BTreeMap<String, usize> {
        self.wires_by_name
            .iter()
            .filter_map(|(name, wire)| numbering.id(*wire).map(|id| (name.clone(), id)))
            .collect()
    }

    /// Resolves the three boundary groups and numbers the circuit.
    fn resolve_boundary(
        &mut self,
        left_inputs: impl Into<WireSpec>,
        right_inputs: impl Into<WireSpec>,
        outputs: impl Into<WireSpec>,
    ) -> Result<WireNumbering> {
        let left = self.convert_to_wires(left_inputs)?;
        let right = self.convert_to_wires(right_inputs)?;
        let outputs = self.convert_to_wires(outputs)?;
        let numbering = self.number_wires(&left, &right, &outputs)?;

        for (name, id) in self.named_wire_ids(&numbering) {
            trace!("    {}: {}", name, id);
        }
        Ok(numbering)
    }

    /// Writes the circuit to `sink` in the format of `E`.
    pub fn export<E: Export>(
        &mut self,
        left_inputs: impl Into<WireSpec>,
        right_inputs: impl Into<WireSpec>,
        outputs: impl Into<WireSpec>,
        sink: &mut impl Write,
    ) -> Result<()> {
        let numbering = self.resolve_boundary(left_inputs, right_inputs, outputs)?;
        E::export_circuit(self, &numbering, sink)
    }

    /// Renders the circuit as a Bristol Fashion netlist.
    pub fn build_description(
        &mut self,
        left_inputs: impl Into<WireSpec>,
        right_inputs: impl Into<WireSpec>,
        outputs: impl Into<WireSpec>,
    ) -> Result<String> {
        let mut buf = Vec::new();
        self.export::<BristolFashion>(left_inputs, right_inputs, outputs, &mut buf)?;
        // The exporter only ever writes UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Writes the Bristol Fashion netlist to `path`, replacing any existing file.
    /// Nothing is written unless the whole description could be built.
    pub fn save(
        &mut self,
        path: impl AsRef<Path>,
        left_inputs: impl Into<WireSpec>,
        right_inputs: impl Into<WireSpec>,
        outputs: impl Into<WireSpec>,
    ) -> Result<()> {
        let description = self.build_description(left_inputs, right_inputs, outputs)?;
        fs::write(path.as_ref(), description)?;
        debug!(
            "Wrote {} gates over {} wires to {}",
            self.gate_count(),
            self.wire_count(),
            path.as_ref().display()
        );
        Ok(())
    }
}
