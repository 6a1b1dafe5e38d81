use std::collections::HashMap;

use tracing::debug;

use crate::error::{CircuitError, Result};
use crate::{Circuit, CircuitTemplate, Gate, Operation, Wire, WireSpec};

/// The construction steps a circuit can be built from.
#[derive(Copy, Clone, Debug)]
pub enum ComponentKind<'t> {
    AndGate,
    XorGate,
    InvGate,
    /// Inlines a parsed template with fresh internal wires.
    Subcircuit(&'t CircuitTemplate),
}

impl ComponentKind<'_> {
    /// Required width of each input group, in order.
    pub fn input_sizes(&self) -> Vec<usize> {
        match self {
            ComponentKind::AndGate | ComponentKind::XorGate => vec![1, 1],
            ComponentKind::InvGate => vec![1],
            ComponentKind::Subcircuit(template) => vec![
                template.left_input_width(),
                template.right_input_width(),
            ],
        }
    }

    pub fn output_size(&self) -> usize {
        match self {
            ComponentKind::AndGate | ComponentKind::XorGate | ComponentKind::InvGate => 1,
            ComponentKind::Subcircuit(template) => template.output_width(),
        }
    }

    /// Appends the gates that compute `output` from `inputs`. The groups have already been
    /// checked against `input_sizes` and `output_size`.
    fn produce_gates(&self, circuit: &mut Circuit, inputs: &[Vec<Wire>], output: &[Wire]) {
        let primitive = |operation: Operation| {
            Gate::new(
                operation,
                inputs.iter().map(|input| input[0]).collect(),
                output[0],
            )
        };

        match self {
            ComponentKind::AndGate => circuit.add_gate(primitive(Operation::And)),
            ComponentKind::XorGate => circuit.add_gate(primitive(Operation::Xor)),
            ComponentKind::InvGate => circuit.add_gate(primitive(Operation::Inv)),
            ComponentKind::Subcircuit(template) => {
                expand_template(template, circuit, &inputs[0], &inputs[1], output)
            }
        }
    }
}

/// Binds the template's boundary indices to the given wires and copies its gates into
/// `circuit`. Any other index gets a fresh wire the first time it shows up, so two
/// instantiations never share internal wires.
fn expand_template(
    template: &CircuitTemplate,
    circuit: &mut Circuit,
    left: &[Wire],
    right: &[Wire],
    output: &[Wire],
) {
    let mut name_to_wire: HashMap<String, Wire> = HashMap::new();
    for (i, wire) in left.iter().enumerate() {
        name_to_wire.insert(i.to_string(), *wire);
    }
    for (i, wire) in right.iter().enumerate() {
        name_to_wire.insert((template.left_input_width() + i).to_string(), *wire);
    }
    let output_base = template.wire_count() - output.len();
    for (i, wire) in output.iter().enumerate() {
        name_to_wire.insert((output_base + i).to_string(), *wire);
    }

    fn resolve(map: &mut HashMap<String, Wire>, circuit: &mut Circuit, name: &str) -> Wire {
        match map.get(name) {
            Some(wire) => *wire,
            None => {
                let wire = circuit.fresh_wire();
                map.insert(name.to_string(), wire);
                wire
            }
        }
    }

    for desc in template.gate_descriptions() {
        let inputs = desc
            .inputs
            .iter()
            .map(|name| resolve(&mut name_to_wire, circuit, name))
            .collect();
        let output = resolve(&mut name_to_wire, circuit, &desc.output);
        circuit.add_gate(Gate::new(desc.operation.clone(), inputs, output));
    }

    debug!(
        "Inlined {} gates, {} wires materialized",
        template.gate_count(),
        name_to_wire
            .len()
            .saturating_sub(left.len() + right.len() + output.len())
    );
}

/// A constructed component. Only its output group outlives construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    output: Vec<Wire>,
}

impl Component {
    /// Resolves `inputs`, checks them against the shape of `kind`, allocates the output
    /// wires and appends the component's gates to `circuit`.
    pub fn new(
        circuit: &mut Circuit,
        kind: ComponentKind<'_>,
        inputs: Vec<WireSpec>,
    ) -> Result<Self> {
        let inputs = inputs
            .into_iter()
            .map(|spec| circuit.convert_to_wires(spec))
            .collect::<Result<Vec<_>>>()?;

        let input_sizes = kind.input_sizes();
        if inputs.len() != input_sizes.len() {
            return Err(CircuitError::InputCount {
                expected: input_sizes.len(),
                got: inputs.len(),
            });
        }
        for (i, (input, size)) in inputs.iter().zip(input_sizes).enumerate() {
            if input.len() != size {
                return Err(CircuitError::InputWidth {
                    input: i,
                    expected: size,
                    got: input.len(),
                });
            }
        }

        let output: Vec<Wire> = (0..kind.output_size())
            .map(|_| circuit.fresh_wire())
            .collect();
        kind.produce_gates(circuit, &inputs, &output);

        Ok(Component { output })
    }

    pub fn and(
        circuit: &mut Circuit,
        a: impl Into<WireSpec>,
        b: impl Into<WireSpec>,
    ) -> Result<Self> {
        Component::new(circuit, ComponentKind::AndGate, vec![a.into(), b.into()])
    }

    pub fn xor(
        circuit: &mut Circuit,
        a: impl Into<WireSpec>,
        b: impl Into<WireSpec>,
    ) -> Result<Self> {
        Component::new(circuit, ComponentKind::XorGate, vec![a.into(), b.into()])
    }

    pub fn inv(circuit: &mut Circuit, a: impl Into<WireSpec>) -> Result<Self> {
        Component::new(circuit, ComponentKind::InvGate, vec![a.into()])
    }

    pub fn output(&self) -> &[Wire] {
        &self.output
    }
}

impl From<&Component> for WireSpec {
    fn from(component: &Component) -> Self {
        WireSpec::Wires(component.output.clone())
    }
}

impl From<Component> for WireSpec {
    fn from(component: Component) -> Self {
        WireSpec::Wires(component.output)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Circuit, CircuitError, Component, ComponentKind, Operation};

    #[test]
    fn test_primitive_gates() {
        let mut c = Circuit::new();
        let x = Component::and(&mut c, "a", "b").unwrap();
        let y = Component::xor(&mut c, &x, "b").unwrap();
        let z = Component::inv(&mut c, &y).unwrap();

        let gates = c.gates();
        assert_eq!(gates.len(), 3);
        assert_eq!(gates[0].operation(), &Operation::And);
        assert_eq!(
            gates[0].inputs(),
            &[c.lookup("a").unwrap(), c.lookup("b").unwrap()]
        );
        assert_eq!(gates[0].output(), x.output()[0]);
        assert_eq!(gates[1].operation(), &Operation::Xor);
        assert_eq!(gates[1].inputs()[0], x.output()[0]);
        assert_eq!(gates[2].operation(), &Operation::Inv);
        assert_eq!(gates[2].inputs(), y.output());
        assert_eq!(z.output().len(), 1);
    }

    #[test]
    fn test_wrong_width_rejected() {
        let mut c = Circuit::new();
        assert!(matches!(
            Component::and(&mut c, "a::2", "b"),
            Err(CircuitError::InputWidth { input: 0, expected: 1, got: 2 })
        ));
        assert!(matches!(
            Component::xor(&mut c, "a", "b::0"),
            Err(CircuitError::InputWidth { input: 1, expected: 1, got: 0 })
        ));
        assert!(matches!(
            Component::inv(&mut c, vec!["a", "b"]),
            Err(CircuitError::InputWidth { input: 0, expected: 1, got: 2 })
        ));
        assert_eq!(c.gate_count(), 0);
    }

    #[test]
    fn test_wrong_input_count_rejected() {
        let mut c = Circuit::new();
        assert!(matches!(
            Component::new(&mut c, ComponentKind::InvGate, vec!["a".into(), "b".into()]),
            Err(CircuitError::InputCount { expected: 1, got: 2 })
        ));
        assert!(matches!(
            Component::new(&mut c, ComponentKind::AndGate, vec!["a".into()]),
            Err(CircuitError::InputCount { expected: 2, got: 1 })
        ));
        assert_eq!(c.gate_count(), 0);
    }

    #[test]
    fn test_bad_spec_propagates() {
        let mut c = Circuit::new();
        assert!(matches!(
            Component::and(&mut c, "a::two", "b"),
            Err(CircuitError::BadSpec(_))
        ));
    }
}
