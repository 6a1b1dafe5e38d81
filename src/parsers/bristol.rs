//! Reader for Bristol Fashion netlists, turning a file into a reusable [`CircuitTemplate`].
//!
//! The layout is two header lines (`gates wires`, then `left right outputs`) followed by
//! one line per gate: `<n_in> <n_out> <inputs..> <output> <OP>`. Blank lines between
//! gates are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CircuitError, TemplateError};
use crate::{Circuit, Component, ComponentKind, Operation, WireSpec};

/// One gate of a template. Wire indices are kept as symbolic keys and only become wires
/// when the template is instantiated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDescription {
    pub operation: Operation,
    pub inputs: Vec<String>,
    pub output: String,
}

/// A parsed netlist. Indices `0..L` are left inputs, `L..L+R` right inputs and the top
/// `O` indices below `wire_count` the outputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitTemplate {
    gate_count: usize,
    wire_count: usize,
    left_input_width: usize,
    right_input_width: usize,
    output_width: usize,
    gate_descriptions: Vec<GateDescription>,
}

/// Reads one header line of exactly `expected` integers.
fn header_line<I>(
    lines: &mut I,
    line: usize,
    expected: usize,
) -> Result<Vec<usize>, TemplateError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let text = match lines.next() {
        Some(text) => text?,
        None => {
            return Err(TemplateError::Header {
                line,
                reason: "unexpected end of file".to_string(),
            })
        }
    };

    let fields = text
        .split_whitespace()
        .map(|field| {
            field.parse::<usize>().map_err(|e| TemplateError::Header {
                line,
                reason: format!("{:?}: {}", field, e),
            })
        })
        .collect::<Result<Vec<usize>, TemplateError>>()?;

    if fields.len() != expected {
        return Err(TemplateError::Header {
            line,
            reason: format!("expected {} fields, got {}", expected, fields.len()),
        });
    }
    Ok(fields)
}

/// Parses a gate line into its operation, input indices and output index.
fn parse_gate(
    text: &str,
    line: usize,
    wire_count: usize,
) -> Result<GateDescription, TemplateError> {
    let malformed = |reason: String| TemplateError::MalformedGate { line, reason };

    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(malformed(format!(
            "expected at least 4 fields, got {}",
            tokens.len()
        )));
    }

    let arity = |token: &str| {
        token
            .parse::<usize>()
            .map_err(|e| malformed(format!("bad arity {:?}: {}", token, e)))
    };
    let n_in = arity(tokens[0])?;
    let n_out = arity(tokens[1])?;
    if n_out != 1 {
        return Err(malformed(format!("{} outputs, expected 1", n_out)));
    }
    if !(1..=2).contains(&n_in) {
        return Err(malformed(format!("{} inputs, expected 1 or 2", n_in)));
    }
    if tokens.len() != 2 + n_in + n_out + 1 {
        return Err(malformed(format!(
            "{} fields for a {}-input gate",
            tokens.len(),
            n_in
        )));
    }

    // Indices are re-rendered so that `07` and `7` name the same wire.
    let index = |token: &str| match token.parse::<usize>() {
        Ok(i) if i < wire_count => Ok(i.to_string()),
        _ => Err(malformed(format!(
            "wire index {:?} outside 0..{}",
            token, wire_count
        ))),
    };
    let inputs = tokens[2..2 + n_in]
        .iter()
        .map(|token| index(*token))
        .collect::<Result<Vec<String>, TemplateError>>()?;
    let output = index(tokens[2 + n_in])?;

    Ok(GateDescription {
        operation: tokens[3 + n_in].into(),
        inputs,
        output,
    })
}

impl CircuitTemplate {
    /// Reads and parses the netlist at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let template = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!(
            "Read {} x {} -> {} with {} gates from: {}",
            template.left_input_width,
            template.right_input_width,
            template.output_width,
            template.gate_count,
            path.display()
        );
        Ok(template)
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, TemplateError> {
        let mut lines = reader.lines();
        let counts = header_line(&mut lines, 1, 2)?;
        let widths = header_line(&mut lines, 2, 3)?;

        let mut template = CircuitTemplate {
            gate_count: counts[0],
            wire_count: counts[1],
            left_input_width: widths[0],
            right_input_width: widths[1],
            output_width: widths[2],
            gate_descriptions: Vec::new(),
        };
        template.check_widths()?;

        for (i, text) in lines.enumerate() {
            let text = text?;
            if text.trim().is_empty() {
                continue;
            }
            // Two header lines precede the body; line numbers are 1-based.
            let gate = parse_gate(&text, i + 3, template.wire_count)?;
            template.gate_descriptions.push(gate);
        }
        template.check_gate_count()?;

        Ok(template)
    }

    /// Restores a template previously cached with [`CircuitTemplate::to_json`].
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let template: CircuitTemplate = serde_json::from_str(json)?;
        template.check_widths()?;
        template.check_gate_count()?;
        Ok(template)
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string(self)?)
    }

    fn check_widths(&self) -> Result<(), TemplateError> {
        let inputs_fit = self
            .left_input_width
            .checked_add(self.right_input_width)
            .map_or(false, |n| n <= self.wire_count);
        if !inputs_fit || self.output_width > self.wire_count
        {
            return Err(TemplateError::Header {
                line: 2,
                reason: format!(
                    "{} x {} -> {} does not fit in {} wires",
                    self.left_input_width,
                    self.right_input_width,
                    self.output_width,
                    self.wire_count
                ),
            });
        }
        Ok(())
    }

    fn check_gate_count(&self) -> Result<(), TemplateError> {
        if self.gate_descriptions.len() != self.gate_count {
            return Err(TemplateError::GateCount {
                expected: self.gate_count,
                got: self.gate_descriptions.len(),
            });
        }
        Ok(())
    }

    /// Inlines this template into `circuit`, fed by `left_inputs` and `right_inputs`.
    pub fn instantiate(
        &self,
        circuit: &mut Circuit,
        left_inputs: impl Into<WireSpec>,
        right_inputs: impl Into<WireSpec>,
    ) -> Result<Component, CircuitError> {
        Component::new(
            circuit,
            ComponentKind::Subcircuit(self),
            vec![left_inputs.into(), right_inputs.into()],
        )
    }

    pub fn gate_count(&self) -> usize {
        self.gate_count
    }

    pub fn wire_count(&self) -> usize {
        self.wire_count
    }

    pub fn left_input_width(&self) -> usize {
        self.left_input_width
    }

    pub fn right_input_width(&self) -> usize {
        self.right_input_width
    }

    pub fn output_width(&self) -> usize {
        self.output_width
    }

    pub fn gate_descriptions(&self) -> &[GateDescription] {
        &self.gate_descriptions
    }
}

impl FromStr for CircuitTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use crate::parsers::bristol::parse_gate;
    use crate::{Circuit, CircuitError, CircuitTemplate, Operation, TemplateError};

    /// `not(l_0 & r_0)` and `l_1 ^ r_1`, through one internal wire.
    const SAMPLE: &str = "3 7\n2 2 2\n\n2 1 0 2 4 AND\n2 1 1 3 6 XOR\n1 1 4 5 INV\n";

    #[test]
    fn test_gate_parsing() {
        let gate = parse_gate("2 1 0 2 4 AND", 4, 7).unwrap();
        assert_eq!(gate.operation, Operation::And);
        assert_eq!(gate.inputs, vec!["0", "2"]);
        assert_eq!(gate.output, "4");

        let gate = parse_gate("  1 1 04\t5 EQW ", 4, 7).unwrap();
        assert_eq!(gate.operation, Operation::Other("EQW".into()));
        assert_eq!(gate.inputs, vec!["4"]);
    }

    #[test]
    fn test_malformed_gates() {
        for line in [
            "2 1 0 4 AND",
            "2 1 0 2 3 4 AND",
            "3 1 0 1 2 3 AND",
            "2 2 0 1 2 3 AND",
            "x 1 0 1 AND",
            "2 1 0 9 4 AND",
            "1 1 a 4 INV",
            "AND",
        ]
        .iter()
        {
            assert!(
                matches!(
                    parse_gate(line, 5, 7),
                    Err(TemplateError::MalformedGate { line: 5, .. })
                ),
                "{} should be rejected",
                line
            );
        }
    }

    #[test]
    fn test_template_parsing() {
        let template: CircuitTemplate = SAMPLE.parse().unwrap();
        assert_eq!(template.gate_count(), 3);
        assert_eq!(template.wire_count(), 7);
        assert_eq!(template.left_input_width(), 2);
        assert_eq!(template.right_input_width(), 2);
        assert_eq!(template.output_width(), 2);
        assert_eq!(template.gate_descriptions().len(), 3);
        assert_eq!(template.gate_descriptions()[2].operation, Operation::Inv);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = "2 4\n1 1 1\n\n\n2 1 0 1 2 XOR\n   \n1 1 2 3 INV\n\n";
        let template: CircuitTemplate = text.parse().unwrap();
        assert_eq!(template.gate_descriptions().len(), 2);
    }

    #[test]
    fn test_gate_count_mismatch() {
        let text = "3 4\n1 1 1\n\n2 1 0 1 2 XOR\n1 1 2 3 INV\n";
        assert!(matches!(
            text.parse::<CircuitTemplate>(),
            Err(TemplateError::GateCount {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_bad_headers() {
        for (text, bad_line) in [
            ("", 1),
            ("3\n1 1 1\n", 1),
            ("3 4 5\n1 1 1\n", 1),
            ("3 4\n", 2),
            ("3 4\n1 1\n", 2),
            ("3 four\n1 1 1\n", 1),
            ("0 4\n3 2 1\n", 2),
            ("0 4\n1 1 5\n", 2),
            ("0 4\n18446744073709551615 1 0\n", 2),
        ]
        .iter()
        {
            match text.parse::<CircuitTemplate>() {
                Err(TemplateError::Header { line, .. }) => {
                    assert_eq!(line, *bad_line, "{:?}", text)
                }
                other => panic!("{:?} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("bristol_builder_no_such_template.txt");
        assert!(matches!(
            CircuitTemplate::load(&path),
            Err(TemplateError::Io(_))
        ));
    }

    #[test]
    fn test_json_cache() {
        let template: CircuitTemplate = SAMPLE.parse().unwrap();
        let cached = CircuitTemplate::from_json(&template.to_json().unwrap()).unwrap();
        assert_eq!(template, cached);

        assert!(matches!(
            CircuitTemplate::from_json("{}"),
            Err(TemplateError::Json(_))
        ));
    }

    #[test]
    fn test_json_cache_rejects_overflowing_widths() {
        let template: CircuitTemplate = SAMPLE.parse().unwrap();
        let json = template
            .to_json()
            .unwrap()
            .replace("\"left_input_width\":2", "\"left_input_width\":18446744073709551615");
        assert!(matches!(
            CircuitTemplate::from_json(&json),
            Err(TemplateError::Header { line: 2, .. })
        ));
    }

    #[test]
    fn test_instantiation_binds_boundary() {
        let template: CircuitTemplate = SAMPLE.parse().unwrap();
        let mut c = Circuit::new();
        let sub = template.instantiate(&mut c, "a::2", "b::2").unwrap();
        let a0 = c.lookup("a_0").unwrap();
        let a1 = c.lookup("a_1").unwrap();
        let b0 = c.lookup("b_0").unwrap();
        let b1 = c.lookup("b_1").unwrap();

        let gates = c.gates();
        assert_eq!(gates.len(), 3);
        assert_eq!(gates[0].inputs(), &[a0, b0]);
        assert_eq!(gates[1].inputs(), &[a1, b1]);
        assert_eq!(gates[1].output(), sub.output()[1]);
        assert_eq!(gates[2].inputs(), &[gates[0].output()]);
        assert_eq!(gates[2].output(), sub.output()[0]);
        // Four inputs, two outputs, one internal wire.
        assert_eq!(c.wire_count(), 7);
    }

    #[test]
    fn test_instantiations_do_not_alias() {
        let template: CircuitTemplate = SAMPLE.parse().unwrap();
        let mut c = Circuit::new();
        let first = template.instantiate(&mut c, "a::2", "b::2").unwrap();
        let second = template.instantiate(&mut c, "a::2", &first).unwrap();

        assert_eq!(c.gate_count(), 6);
        assert_eq!(c.wire_count(), 10);
        let gates = c.gates();
        assert_ne!(gates[0].output(), gates[3].output());
        assert_ne!(first.output(), second.output());
        assert_eq!(gates[3].inputs()[1], first.output()[0]);
    }

    #[test]
    fn test_instantiation_width_checked() {
        let template: CircuitTemplate = SAMPLE.parse().unwrap();
        let mut c = Circuit::new();
        assert!(matches!(
            template.instantiate(&mut c, "a::3", "b::2"),
            Err(CircuitError::InputWidth {
                input: 0,
                expected: 2,
                got: 3
            })
        ));
        assert_eq!(c.gate_count(), 0);
    }

    #[test]
    fn test_padded_indices_bind_boundary() {
        let template: CircuitTemplate = "1 3\n1 1 1\n\n2 1 00 01 002 XOR\n".parse().unwrap();
        let mut c = Circuit::new();
        let sub = template.instantiate(&mut c, "a", "b").unwrap();

        let gate = &c.gates()[0];
        assert_eq!(gate.inputs(), &[c.lookup("a").unwrap(), c.lookup("b").unwrap()]);
        assert_eq!(gate.output(), sub.output()[0]);
        assert_eq!(c.wire_count(), 3);
    }

    #[test]
    fn test_description_round_trip() {
        let template: CircuitTemplate = SAMPLE.parse().unwrap();
        let mut c = Circuit::new();
        let sub = template.instantiate(&mut c, "a::2", "b::2").unwrap();
        assert_eq!(c.build_description("a::2", "b::2", &sub).unwrap(), SAMPLE);
    }
}
