//! Utility modules

pub mod cleanup;
pub mod values;

pub use cleanup::*;
pub use values::*;
