use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{CircuitError, Result};

static NEXT_CIRCUIT: AtomicUsize = AtomicUsize::new(0);

/// Tags every wire with the circuit that allocated it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CircuitId(usize);

impl CircuitId {
    pub(crate) fn fresh() -> Self {
        CircuitId(NEXT_CIRCUIT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A single Boolean signal. Only meaningful inside the circuit that allocated it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Wire {
    pub(crate) circuit: CircuitId,
    pub(crate) index: usize,
}

impl Wire {
    /// Position of this wire in its circuit's allocation order.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Anything that can be resolved into an ordered group of wires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireSpec {
    Wire(Wire),
    /// A wire name, or `name::N` for the group `name_0 .. name_{N-1}`
    Name(String),
    /// Flattened left to right
    List(Vec<WireSpec>),
    Wires(Vec<Wire>),
}

impl From<Wire> for WireSpec {
    fn from(wire: Wire) -> Self {
        WireSpec::Wire(wire)
    }
}

impl From<&Wire> for WireSpec {
    fn from(wire: &Wire) -> Self {
        WireSpec::Wire(*wire)
    }
}

impl From<&str> for WireSpec {
    fn from(name: &str) -> Self {
        WireSpec::Name(name.to_string())
    }
}

impl From<String> for WireSpec {
    fn from(name: String) -> Self {
        WireSpec::Name(name)
    }
}

impl From<&[Wire]> for WireSpec {
    fn from(wires: &[Wire]) -> Self {
        WireSpec::Wires(wires.to_vec())
    }
}

impl<T: Into<WireSpec>> From<Vec<T>> for WireSpec {
    fn from(specs: Vec<T>) -> Self {
        WireSpec::List(specs.into_iter().map(Into::into).collect())
    }
}

/// Builds a [`WireSpec::List`] out of values of mixed types.
///
/// ```
/// use bristol_builder::{spec, Circuit, Component};
///
/// let mut c = Circuit::new();
/// let x = Component::and(&mut c, "a", "b").unwrap();
/// let w = c.fresh_wire();
/// let _ = spec![&x, w, "c::2"];
/// ```
#[macro_export]
macro_rules! spec {
    ($($x:expr),* $(,)?) => {
        $crate::WireSpec::List(vec![$($crate::WireSpec::from($x)),*])
    };
}

/// Expands `name::N` into the names of its `N` members. Any other name stands for itself.
pub fn expand_name(name: &str) -> Result<Vec<String>> {
    match name.rsplit_once("::") {
        None => Ok(vec![name.to_string()]),
        Some((prefix, size)) => {
            let size: usize = size.parse().map_err(|_| {
                CircuitError::BadSpec(format!("can't read group size in {:?}", name))
            })?;
            Ok((0..size).map(|i| format!("{}_{}", prefix, i)).collect())
        }
    }
}
