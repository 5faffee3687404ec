//! Statement parser orchestrating lexer, matcher and transaction assembly

use log::debug;

use crate::config::ParserOptions;
use crate::statement::lexer::tokenize;
use crate::tags::{match_tag, TagResult};
use crate::traits::{apply_to_first, TagTarget};
use crate::types::*;
use crate::utils::strip_statement;

/// Tag id that opens a new transaction
pub const TRANSACTION_REFERENCE_TAG: &str = "20";

/// State machine threading parsed tags into transactions
#[derive(Debug)]
pub struct Assembler<'o> {
    options: &'o ParserOptions,
    statement: Transactions,
    /// `None` until the first transaction reference is seen
    open: Option<Transaction>,
}

impl<'o> Assembler<'o> {
    pub fn new(options: &'o ParserOptions) -> Self {
        Self {
            options,
            statement: Transactions::new(),
            open: None,
        }
    }

    /// The transaction tags are currently applied to
    pub fn open_transaction(&self) -> Option<&Transaction> {
        self.open.as_ref()
    }

    fn close_open(&mut self) {
        if let Some(transaction) = self.open.take() {
            debug!("closing transaction {:?}", transaction.transaction_reference);
            self.statement.add(transaction);
        }
    }

    fn open_reference(&mut self, reference: &str) {
        if let Some(transaction) = self
            .open
            .as_mut()
            .filter(|transaction| transaction.transaction_reference.is_empty())
        {
            transaction.transaction_reference = reference.to_string();
            return;
        }

        self.close_open();
        self.open = Some(Transaction::new(reference.to_string()));
    }

    /// Close the open transaction and continue in a new one sharing its
    /// reference and opening balances
    fn carry_over(&mut self) {
        let Some(current) = self.open.take() else {
            return;
        };

        let next = Transaction {
            transaction_reference: current.transaction_reference.clone(),
            related_reference: current.related_reference.clone(),
            opening_balance: current.opening_balance.clone(),
            final_opening_balance: current.final_opening_balance.clone(),
            intermediate_opening_balance: current.intermediate_opening_balance.clone(),
            ..Default::default()
        };

        debug!(
            "repeated statement line in transaction {:?}, continuing in a new one",
            current.transaction_reference
        );
        self.statement.add(current);
        self.open = Some(next);
    }

    /// Route one parsed tag
    pub fn feed(&mut self, tag: &TagResult) -> Mt940Result<()> {
        let options = self.options;

        if tag.tag().id == TRANSACTION_REFERENCE_TAG {
            self.open_reference(tag.field("transaction_reference"));
            return Ok(());
        }

        let repeated_line = tag.tag().id == "61"
            && self
                .open
                .as_ref()
                .is_some_and(|transaction| transaction.statement_line.is_some());
        if repeated_line && options.split_repeated_statement_lines {
            self.carry_over();
        }

        let mut targets: Vec<&mut dyn TagTarget> = Vec::with_capacity(2);
        if let Some(transaction) = self.open.as_mut() {
            targets.push(transaction);
        }
        targets.push(&mut self.statement);

        apply_to_first(&mut targets, tag, options)
    }

    /// Append the open transaction and hand out the result
    pub fn finish(mut self) -> Transactions {
        self.close_open();
        self.statement
    }
}

/// MT940 statement parser
///
/// Holds no per-statement state, so one parser can be shared and reused.
#[derive(Debug, Clone, Default)]
pub struct Mt940Parser {
    options: ParserOptions,
}

impl Mt940Parser {
    /// Create a parser with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options
    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse the full text of one statement
    pub fn parse(&self, text: &str) -> Mt940Result<Transactions> {
        let cleaned;
        let text = if self.options.strip_separators {
            cleaned = strip_statement(text);
            cleaned.as_str()
        } else {
            text
        };

        let mut assembler = Assembler::new(&self.options);
        for block in tokenize(text)? {
            let tag = match_tag(block.tag_id, block.raw)?;
            assembler.feed(&tag)?;
        }

        let statement = assembler.finish();
        debug!("parsed statement with {} transactions", statement.len());
        Ok(statement)
    }
}
