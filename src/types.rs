//! Core types and data structures for parsed MT940 statements

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Debit/credit mark of a balance or statement line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebitCredit {
    /// `D` - money leaving the account
    Debit,
    /// `C` - money entering the account
    Credit,
    /// `RD` - reversal of an earlier debit, books like a credit
    ReversalDebit,
    /// `RC` - reversal of an earlier credit, books like a debit
    ReversalCredit,
}

impl DebitCredit {
    /// Parse the status characters used on the wire
    pub fn from_mark(mark: &str) -> Option<Self> {
        match mark {
            "D" => Some(DebitCredit::Debit),
            "C" => Some(DebitCredit::Credit),
            "RD" => Some(DebitCredit::ReversalDebit),
            "RC" => Some(DebitCredit::ReversalCredit),
            _ => None,
        }
    }

    /// Wire representation of the mark
    pub fn as_str(&self) -> &'static str {
        match self {
            DebitCredit::Debit => "D",
            DebitCredit::Credit => "C",
            DebitCredit::ReversalDebit => "RD",
            DebitCredit::ReversalCredit => "RC",
        }
    }

    /// Whether amounts carrying this mark reduce the account balance
    pub fn is_negative(&self) -> bool {
        matches!(self, DebitCredit::Debit | DebitCredit::ReversalCredit)
    }
}

/// Monetary value in minor units (hundredths)
///
/// The sign is applied from the accompanying [`DebitCredit`] mark, the
/// parsed text itself is always unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Amount {
    pub minor_units: i64,
}

impl Amount {
    pub fn from_minor_units(minor_units: i64) -> Self {
        Self { minor_units }
    }

    /// Apply the sign of a debit/credit mark
    pub fn signed(self, status: DebitCredit) -> Self {
        if status.is_negative() {
            Self::from_minor_units(-self.minor_units)
        } else {
            self
        }
    }

    /// Exact decimal representation with two fractional digits
    pub fn to_decimal(&self) -> BigDecimal {
        BigDecimal::new(self.minor_units.into(), 2)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let abs = self.minor_units.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Which balance a balance-shaped tag reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceRole {
    /// Tag 60
    Opening,
    /// Tag 60F
    FinalOpening,
    /// Tag 60M
    IntermediateOpening,
    /// Tag 62
    Closing,
    /// Tag 62F
    FinalClosing,
    /// Tag 62M
    IntermediateClosing,
    /// Tag 64
    Available,
    /// Tag 65
    ForwardAvailable,
}

impl BalanceRole {
    /// Role reported by a balance tag id, if the id is balance-shaped
    pub fn for_tag(tag_id: &str) -> Option<Self> {
        match tag_id {
            "60" => Some(BalanceRole::Opening),
            "60F" => Some(BalanceRole::FinalOpening),
            "60M" => Some(BalanceRole::IntermediateOpening),
            "62" => Some(BalanceRole::Closing),
            "62F" => Some(BalanceRole::FinalClosing),
            "62M" => Some(BalanceRole::IntermediateClosing),
            "64" => Some(BalanceRole::Available),
            "65" => Some(BalanceRole::ForwardAvailable),
            _ => None,
        }
    }

    pub fn is_opening(&self) -> bool {
        matches!(
            self,
            BalanceRole::Opening | BalanceRole::FinalOpening | BalanceRole::IntermediateOpening
        )
    }
}

/// Balance as reported by tags 60*, 62*, 64 and 65
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Slot the balance belongs to, taken from the tag id
    pub role: BalanceRole,
    /// Debit/credit mark as sent
    pub status: DebitCredit,
    /// Signed amount
    pub amount: Amount,
    /// Booking date of the balance
    pub date: NaiveDate,
    /// ISO 4217 currency code, stored as received
    pub currency: String,
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {}", self.amount, self.currency, self.date)
    }
}

/// One movement on the account (tag 61)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Date the movement takes effect for interest
    pub value_date: NaiveDate,
    /// Booking date, year resolved against the value date
    pub entry_date: Option<NaiveDate>,
    /// Debit/credit mark, including reversals
    pub status: DebitCredit,
    /// Third character of the currency code, when the bank sends it
    pub funds_code: Option<String>,
    /// Signed amount
    pub amount: Amount,
    /// Transaction type identification code, e.g. `NTRF`
    pub id: Option<String>,
    /// Reference for the account owner, at most 16 characters
    pub customer_reference: Option<String>,
    /// Reference of the servicing bank, after `//`
    pub bank_reference: Option<String>,
    /// Supplementary details on the line following the statement line
    pub extra_details: Option<String>,
}

/// A single transaction bounded by transaction reference tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Tag 20
    pub transaction_reference: String,
    /// Tag 21
    pub related_reference: Option<String>,
    /// Tag 61
    pub statement_line: Option<StatementLine>,
    /// Tag 60
    pub opening_balance: Option<Balance>,
    /// Tag 60F
    pub final_opening_balance: Option<Balance>,
    /// Tag 60M
    pub intermediate_opening_balance: Option<Balance>,
    /// Tag 62
    pub closing_balance: Option<Balance>,
    /// Tag 62F
    pub final_closing_balance: Option<Balance>,
    /// Tag 62M
    pub intermediate_closing_balance: Option<Balance>,
    /// Tag 64
    pub available_balance: Option<Balance>,
    /// Tag 65
    pub forward_available_balance: Option<Balance>,
    /// Tag 86, may span several lines
    pub details: Option<String>,
}

impl Transaction {
    /// Create an empty transaction with the given reference
    pub fn new(transaction_reference: String) -> Self {
        Self {
            transaction_reference,
            ..Default::default()
        }
    }

    /// Store a balance in the field matching its role
    pub fn set_balance(&mut self, balance: Balance) {
        let slot = match balance.role {
            BalanceRole::Opening => &mut self.opening_balance,
            BalanceRole::FinalOpening => &mut self.final_opening_balance,
            BalanceRole::IntermediateOpening => &mut self.intermediate_opening_balance,
            BalanceRole::Closing => &mut self.closing_balance,
            BalanceRole::FinalClosing => &mut self.final_closing_balance,
            BalanceRole::IntermediateClosing => &mut self.intermediate_closing_balance,
            BalanceRole::Available => &mut self.available_balance,
            BalanceRole::ForwardAvailable => &mut self.forward_available_balance,
        };
        *slot = Some(balance);
    }

    /// All balances present, in currency lookup order
    pub fn balances(&self) -> impl Iterator<Item = &Balance> {
        [
            &self.final_opening_balance,
            &self.opening_balance,
            &self.intermediate_opening_balance,
            &self.available_balance,
            &self.forward_available_balance,
            &self.final_closing_balance,
            &self.closing_balance,
            &self.intermediate_closing_balance,
        ]
        .into_iter()
        .flatten()
    }

    /// Signed amount of the statement line, if any
    pub fn amount(&self) -> Option<Amount> {
        self.statement_line.as_ref().map(|line| line.amount)
    }
}

/// Date and time the statement was produced (tag 13D)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeIndication {
    /// Local date and time of the statement
    pub date_time: NaiveDateTime,
    /// UTC offset as sent, e.g. `+0100`
    pub offset: Option<String>,
}

/// Floor limit below which movements are not reported (tag 34F)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorLimit {
    pub currency: String,
    /// Unsigned limit
    pub amount: Amount,
}

/// Number and sum of entries in one direction (tags 90D and 90C)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    /// `Debit` for tag 90D, `Credit` for tag 90C
    pub status: DebitCredit,
    /// Number of entries, zero when the bank omits it
    pub count: u32,
    pub currency: String,
    /// Signed sum of the entries
    pub amount: Amount,
}

/// Bank specific record carried by a non-SWIFT tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonSwiftRecord {
    /// Two-digit record id
    pub id: String,
    /// Rest of the line after the id
    pub data: String,
}

/// Statement envelope holding the transactions of one parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transactions {
    /// Tag 25
    pub account_identification: Option<String>,
    /// Tag 28C
    pub statement_number: Option<String>,
    /// Tag 28C
    pub sequence_number: Option<String>,
    /// Tag 13D
    pub date_time_indication: Option<DateTimeIndication>,
    /// Tag 34F without mark or with `D`
    pub debit_floor_limit: Option<FloorLimit>,
    /// Tag 34F without mark or with `C`
    pub credit_floor_limit: Option<FloorLimit>,
    /// Tag 90D
    pub debit_entries: Option<EntrySummary>,
    /// Tag 90C
    pub credit_entries: Option<EntrySummary>,
    /// Tag NS lines shaped as a two-digit id followed by data
    pub non_swift: Vec<NonSwiftRecord>,
    /// Tag NS payloads as received, one line per payload line
    pub non_swift_text: Option<String>,
    pub transactions: Vec<Transaction>,
}

impl Transactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished transaction
    pub fn add(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    /// Currency of the statement
    ///
    /// Taken from the first balance found on any transaction, falling back
    /// to the floor limits.
    pub fn currency(&self) -> Option<&str> {
        self.transactions
            .iter()
            .flat_map(|transaction| transaction.balances())
            .map(|balance| balance.currency.as_str())
            .chain(self.credit_floor_limit.iter().map(|l| l.currency.as_str()))
            .chain(self.debit_floor_limit.iter().map(|l| l.currency.as_str()))
            .next()
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

/// Stable discriminant of [`Mt940Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NoTagsFound,
    UnknownTag,
    MalformedTag,
    TagDidNotMatch,
    MalformedAmount,
    InvalidDate,
    TagDoesNotApply,
}

/// Errors that can occur while parsing a statement
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Mt940Error {
    #[error("No tags found in statement")]
    NoTagsFound,
    #[error("Unknown tag {tag_id}: {raw:?}")]
    UnknownTag { tag_id: String, raw: String },
    #[error("Malformed tag {tag_id}: {raw:?}")]
    MalformedTag { tag_id: String, raw: String },
    #[error("Tag {tag_id} did not match its pattern: {raw:?}")]
    TagDidNotMatch { tag_id: String, raw: String },
    #[error("Malformed amount {raw:?}{}", tag_suffix(.tag_id))]
    MalformedAmount { tag_id: Option<String>, raw: String },
    #[error("Invalid date {raw:?}{}", tag_suffix(.tag_id))]
    InvalidDate { tag_id: Option<String>, raw: String },
    #[error("Tag {tag_id} does not apply to the transaction or the statement")]
    TagDoesNotApply { tag_id: String },
}

fn tag_suffix(tag_id: &Option<String>) -> String {
    tag_id
        .as_ref()
        .map(|id| format!(" in tag {}", id))
        .unwrap_or_default()
}

impl Mt940Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Mt940Error::NoTagsFound => ErrorKind::NoTagsFound,
            Mt940Error::UnknownTag { .. } => ErrorKind::UnknownTag,
            Mt940Error::MalformedTag { .. } => ErrorKind::MalformedTag,
            Mt940Error::TagDidNotMatch { .. } => ErrorKind::TagDidNotMatch,
            Mt940Error::MalformedAmount { .. } => ErrorKind::MalformedAmount,
            Mt940Error::InvalidDate { .. } => ErrorKind::InvalidDate,
            Mt940Error::TagDoesNotApply { .. } => ErrorKind::TagDoesNotApply,
        }
    }

    /// Id of the tag that broke the parse, when known
    pub fn tag_id(&self) -> Option<&str> {
        match self {
            Mt940Error::NoTagsFound => None,
            // text outside any tag carries no id
            Mt940Error::MalformedTag { tag_id, .. } if tag_id.is_empty() => None,
            Mt940Error::UnknownTag { tag_id, .. }
            | Mt940Error::MalformedTag { tag_id, .. }
            | Mt940Error::TagDidNotMatch { tag_id, .. }
            | Mt940Error::TagDoesNotApply { tag_id } => Some(tag_id),
            Mt940Error::MalformedAmount { tag_id, .. } | Mt940Error::InvalidDate { tag_id, .. } => {
                tag_id.as_deref()
            }
        }
    }

    /// Offending raw text, for diagnostics only
    pub fn raw(&self) -> Option<&str> {
        match self {
            Mt940Error::NoTagsFound | Mt940Error::TagDoesNotApply { .. } => None,
            Mt940Error::UnknownTag { raw, .. }
            | Mt940Error::MalformedTag { raw, .. }
            | Mt940Error::TagDidNotMatch { raw, .. }
            | Mt940Error::MalformedAmount { raw, .. }
            | Mt940Error::InvalidDate { raw, .. } => Some(raw),
        }
    }

    /// Attach the tag id to a value parser error that has none yet
    pub fn in_tag(self, id: &str) -> Self {
        match self {
            Mt940Error::MalformedAmount { tag_id: None, raw } => Mt940Error::MalformedAmount {
                tag_id: Some(id.to_string()),
                raw,
            },
            Mt940Error::InvalidDate { tag_id: None, raw } => Mt940Error::InvalidDate {
                tag_id: Some(id.to_string()),
                raw,
            },
            other => other,
        }
    }
}

/// Result type for parse operations
pub type Mt940Result<T> = Result<T, Mt940Error>;
