use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, Result};
use crate::numbering::WireNumbering;
use crate::Wire;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, VariantCount)]
pub enum Operation {
    And,
    Xor,
    /// Single input
    Inv,
    /// Any other token found in a template. Passed through untouched.
    Other(String),
}

impl Operation {
    /// Number of inputs the operation takes, if known
    pub fn arity(&self) -> Option<usize> {
        match self {
            Operation::And | Operation::Xor => Some(2),
            Operation::Inv => Some(1),
            Operation::Other(_) => None,
        }
    }
}

impl From<&str> for Operation {
    fn from(token: &str) -> Self {
        match token {
            "AND" => Operation::And,
            "XOR" => Operation::Xor,
            "INV" => Operation::Inv,
            _ => Operation::Other(token.to_string()),
        }
    }
}

impl FromStr for Operation {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::And => f.write_str("AND"),
            Operation::Xor => f.write_str("XOR"),
            Operation::Inv => f.write_str("INV"),
            Operation::Other(token) => f.write_str(token),
        }
    }
}

/// One operation, its ordered inputs and its single output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    operation: Operation,
    inputs: Vec<Wire>,
    output: Wire,
}

impl Gate {
    pub fn new(operation: Operation, inputs: Vec<Wire>, output: Wire) -> Self {
        Gate {
            operation,
            inputs,
            output,
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn inputs(&self) -> &[Wire] {
        &self.inputs
    }

    pub fn output(&self) -> Wire {
        self.output
    }

    /// Renders the gate as a Bristol line: `<n_in> 1 <inputs..> <output> <OP>`.
    ///
    /// Every wire of the gate must have been numbered already.
    pub fn render(&self, numbering: &WireNumbering) -> Result<String> {
        let id = |wire: Wire| numbering.id(wire).ok_or(CircuitError::ForeignWire(wire));

        let mut fields = vec![self.inputs.len().to_string(), "1".to_string()];
        for wire in &self.inputs {
            fields.push(id(*wire)?.to_string());
        }
        fields.push(id(self.output)?.to_string());
        fields.push(self.operation.to_string());
        Ok(fields.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use crate::Operation;

    #[test]
    fn test_operation_tokens() {
        for token in ["AND", "XOR", "INV", "EQW"].iter() {
            let op: Operation = token.parse().unwrap();
            assert_eq!(op.to_string(), *token);
        }
        assert_eq!("EQW".parse::<Operation>().unwrap().arity(), None);
        assert_eq!("INV".parse::<Operation>().unwrap().arity(), Some(1));
        assert_eq!("and".parse::<Operation>().unwrap(), Operation::Other("and".into()));
    }
}
