//! Builds Boolean circuits out of AND, XOR and INV gates and previously compiled
//! sub-circuits, and writes them as Bristol Fashion netlists.
//!
//! ```
//! use bristol_builder::{spec, Circuit, Component};
//!
//! let mut c = Circuit::new();
//! let x = Component::and(&mut c, "l_0", "l_1").unwrap();
//! let y = Component::and(&mut c, "r_0", "r_1").unwrap();
//! let z1 = Component::xor(&mut c, &x, &y).unwrap();
//! let z2 = Component::and(&mut c, &x, &y).unwrap();
//!
//! let text = c.build_description("l::2", "r::2", spec![&z1, &z2]).unwrap();
//! assert!(text.starts_with("4 8\n2 2 2\n"));
//! ```

#[macro_use]
extern crate variant_count;

mod circuit;
mod component;
mod error;
pub mod exporters;
mod gate;
pub mod logging;
mod numbering;
pub mod parsers;
mod wire;

pub use circuit::Circuit;
pub use component::{Component, ComponentKind};
pub use error::{CircuitError, Result, TemplateError};
pub use gate::{Gate, Operation};
pub use numbering::WireNumbering;
pub use parsers::{CircuitTemplate, GateDescription};
pub use wire::{expand_name, Wire, WireSpec};
