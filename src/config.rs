//! Parser configuration

use serde::{Deserialize, Serialize};

use crate::utils::ENTRY_DATE_WINDOW_DAYS;

/// Options controlling how a statement is parsed
///
/// Every field has a default, so a partial document deserializes into a
/// complete set of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Drop carriage returns, trailing whitespace, blank lines and `-`
    /// separator lines before tokenizing
    pub strip_separators: bool,
    /// Start a new transaction when a second statement line (tag 61) shows up
    /// in the same transaction, carrying over reference and opening balance.
    /// When disabled the second statement line is rejected.
    pub split_repeated_statement_lines: bool,
    /// Days between value date and entry date before the entry date is moved
    /// into the neighbouring year
    pub entry_date_window_days: i64,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            strip_separators: true,
            split_repeated_statement_lines: true,
            entry_date_window_days: ENTRY_DATE_WINDOW_DAYS,
        }
    }
}

impl ParserOptions {
    pub fn strip_separators(mut self, strip: bool) -> Self {
        self.strip_separators = strip;
        self
    }

    pub fn split_repeated_statement_lines(mut self, split: bool) -> Self {
        self.split_repeated_statement_lines = split;
        self
    }

    pub fn entry_date_window_days(mut self, days: i64) -> Self {
        self.entry_date_window_days = days;
        self
    }
}
