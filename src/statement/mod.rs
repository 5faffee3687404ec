//! Statement tokenizing and transaction assembly

pub mod assembler;
pub mod lexer;
pub mod targets;

pub use assembler::*;
pub use lexer::{tokenize, TagBlock};
