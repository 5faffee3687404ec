//! # MT940 Core
//!
//! A parser turning SWIFT MT940 bank statements into typed statements,
//! transactions and balances.
//!
//! ## Features
//!
//! - **Tag catalog**: patterns with named fields for every supported tag,
//!   verified against sample payloads
//! - **Robust tokenizing**: multi-line continuations and marker-like lines
//!   inside free-text details are kept with their tag
//! - **Exact money**: amounts are integer minor units, never floating point
//! - **Date handling**: two-digit years and year-less entry dates resolved
//!   around the turn of the year
//! - **Structured errors**: every failure names its kind, tag and raw text
//!
//! ## Quick Start
//!
//! ```rust
//! use mt940_core::parse;
//!
//! let statement = parse(
//!     ":20:REF1\n\
//!      :25:NL08DEUT0319809633EUR\n\
//!      :28C:3/00001\n\
//!      :60F:C200101EUR100,00\n\
//!      :61:2001020102D12,50NTRFNONREF\n\
//!      :86:Coffee\n\
//!      :62F:C200102EUR87,50\n",
//! )
//! .unwrap();
//!
//! assert_eq!(statement.account_identification.as_deref(), Some("NL08DEUT0319809633EUR"));
//! assert_eq!(statement.transactions[0].amount().unwrap().minor_units, -1250);
//! ```

pub mod config;
pub mod statement;
pub mod tags;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::ParserOptions;
pub use statement::{tokenize, Assembler, Mt940Parser, TagBlock};
pub use tags::{match_tag, Tag, TagResult};
pub use traits::*;
pub use types::*;

/// Parse one statement with the default options
pub fn parse(text: &str) -> Mt940Result<Transactions> {
    Mt940Parser::default().parse(text)
}
