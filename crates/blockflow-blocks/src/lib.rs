//! Blockflow Blocks - concrete block kinds
//!
//! This crate provides the block kinds a diagram is built from, all
//! implementing [`blockflow_core::Block`]:
//!
//! - [`Constant`] - Emits a fixed value
//! - [`Series`] - Arithmetic progression as an array
//! - [`Arithmetic`] - Element-wise add/subtract/multiply/divide/modulus/power
//! - [`Logic`] - Boolean gates
//! - [`Sticker`] - Display sink
//! - [`GlobalVariable`] / [`GlobalRef`] - Publish and read graph-wide globals
//! - [`Bundle`] - Collects `N` inputs into one array
//! - [`History`] - Sliding window of past samples (plot buffer)
//! - [`Accumulator`] - Running sum / counter
//! - [`Random`] - Seeded pseudo-random source
//! - [`Transpose`] / [`Magnitude`] - Matrix and vector helpers
//! - [`Fft`] - Discrete Fourier transform of an array
//!
//! Every block writes its result on an output port named `Out` unless noted
//! otherwise; multi-input blocks label inputs `A`, `B` or `In1..InN`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use blockflow_core::{Flowchart, PortRef, Value};
//! use blockflow_blocks::{Arithmetic, Series, Sticker};
//!
//! let mut chart = Flowchart::default();
//! let series = chart.add_block(Box::new(Series::new("s")))?;
//! let add = chart.add_block(Box::new(Arithmetic::new("add")))?;
//! let sticker = chart.add_block(Box::new(Sticker::new("show")))?;
//! chart.set_block_property(add, "operand", Value::Scalar(10.0))?;
//! chart.add_connector(PortRef::new(series, "Out"), PortRef::new(add, "A"))?;
//! chart.add_connector(PortRef::new(add, "Out"), PortRef::new(sticker, "In"))?;
//! chart.update_results()?;
//! ```

/// Implements the uid/kind/port accessors of [`blockflow_core::Block`] for a
/// struct with `uid: String` and `ports: Ports` fields.
macro_rules! block_plumbing {
    ($kind:expr) => {
        fn uid(&self) -> &str {
            &self.uid
        }
        fn set_uid(&mut self, uid: String) {
            self.uid = uid;
        }
        fn kind(&self) -> &'static str {
            $kind
        }
        fn ports(&self) -> &blockflow_core::Ports {
            &self.ports
        }
        fn ports_mut(&mut self) -> &mut blockflow_core::Ports {
            &mut self.ports
        }
    };
}

pub mod accumulator;
pub mod arithmetic;
pub mod bundle;
pub mod constant;
pub mod fft;
pub mod global;
pub mod history;
pub mod logic;
pub mod matrix;
pub mod random;
pub mod series;
pub mod sticker;

// Re-export main types at crate root
pub use accumulator::Accumulator;
pub use arithmetic::{Arithmetic, Operation};
pub use bundle::Bundle;
pub use constant::Constant;
pub use fft::Fft;
pub use global::{GlobalRef, GlobalVariable};
pub use history::History;
pub use logic::{Gate, Logic};
pub use matrix::{Magnitude, Transpose};
pub use random::Random;
pub use series::Series;
pub use sticker::Sticker;
