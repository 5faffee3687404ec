//! Application of parsed tags to transactions and the statement envelope

use log::trace;

use crate::config::ParserOptions;
use crate::tags::TagResult;
use crate::traits::TagTarget;
use crate::types::*;
use crate::utils::{parse_date, parse_date_time, resolve_entry_date};

fn status(tag: &TagResult, mark: &str) -> Mt940Result<DebitCredit> {
    DebitCredit::from_mark(mark).ok_or_else(|| Mt940Error::TagDidNotMatch {
        tag_id: tag.tag_id().to_string(),
        raw: mark.to_string(),
    })
}

fn amount(tag: &TagResult) -> Mt940Result<Amount> {
    Amount::parse(tag.field("amount")).map_err(|e| e.in_tag(tag.tag_id()))
}

fn date(tag: &TagResult) -> Mt940Result<chrono::NaiveDate> {
    parse_date(tag.field("year"), tag.field("month"), tag.field("day"))
        .map_err(|e| e.in_tag(tag.tag_id()))
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// Append free text, joining repeated occurrences with a newline
fn append_line(target: &mut Option<String>, text: &str) {
    match target {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(text);
        }
        None => *target = Some(text.to_string()),
    }
}

/// Build a balance from a balance-shaped tag
pub fn balance(tag: &TagResult, role: BalanceRole) -> Mt940Result<Balance> {
    let status = status(tag, tag.field("status"))?;
    Ok(Balance {
        role,
        status,
        amount: amount(tag)?.signed(status),
        date: date(tag)?,
        currency: tag.field("currency").to_string(),
    })
}

/// Build a statement line from a tag 61
pub fn statement_line(tag: &TagResult, options: &ParserOptions) -> Mt940Result<StatementLine> {
    let status = status(tag, tag.field("status"))?;
    let value_date = date(tag)?;

    let entry_date = match (tag.optional("entry_month"), tag.optional("entry_day")) {
        (Some(month), Some(day)) => Some(
            resolve_entry_date(value_date, month, day, options.entry_date_window_days)
                .map_err(|e| e.in_tag(tag.tag_id()))?,
        ),
        _ => None,
    };

    Ok(StatementLine {
        value_date,
        entry_date,
        status,
        funds_code: owned(tag.optional("funds_code")),
        amount: amount(tag)?.signed(status),
        id: owned(tag.optional("id")),
        customer_reference: owned(tag.optional("customer_reference")),
        bank_reference: owned(tag.optional("bank_reference")),
        extra_details: owned(tag.optional("extra_details")),
    })
}

impl TagTarget for Transaction {
    fn apply_tag(&mut self, tag: &TagResult, options: &ParserOptions) -> Mt940Result<bool> {
        let id = tag.tag().id;

        if let Some(role) = BalanceRole::for_tag(id) {
            self.set_balance(balance(tag, role)?);
        } else {
            match id {
                "21" => {
                    self.related_reference = Some(tag.field("related_reference").to_string());
                }
                "61" => {
                    if self.statement_line.is_some() {
                        return Ok(false);
                    }
                    self.statement_line = Some(statement_line(tag, options)?);
                }
                "86" => append_line(&mut self.details, tag.field("transaction_details")),
                _ => return Ok(false),
            }
        }

        trace!("tag {} applied to transaction {:?}", tag.tag_id(), self.transaction_reference);
        Ok(true)
    }
}

impl TagTarget for Transactions {
    fn apply_tag(&mut self, tag: &TagResult, _options: &ParserOptions) -> Mt940Result<bool> {
        match tag.tag().id {
            "25" => {
                self.account_identification = Some(tag.field("account_identification").to_string());
            }
            "28" | "28C" => {
                self.statement_number = Some(tag.field("statement_number").to_string());
                self.sequence_number = owned(tag.optional("sequence_number"));
            }
            "13" | "13D" => {
                let date_time = parse_date_time(
                    tag.field("year"),
                    tag.field("month"),
                    tag.field("day"),
                    tag.field("hour"),
                    tag.field("minute"),
                )
                .map_err(|e| e.in_tag(tag.tag_id()))?;
                self.date_time_indication = Some(DateTimeIndication {
                    date_time,
                    offset: owned(tag.optional("offset")),
                });
            }
            "34" | "34F" => {
                let limit = FloorLimit {
                    currency: tag.field("currency").to_string(),
                    amount: amount(tag)?,
                };
                match tag.optional("status") {
                    Some("D") => self.debit_floor_limit = Some(limit),
                    Some("C") => self.credit_floor_limit = Some(limit),
                    _ => {
                        self.debit_floor_limit = Some(limit.clone());
                        self.credit_floor_limit = Some(limit);
                    }
                }
            }
            "90D" | "90C" => {
                let status = if tag.tag().id == "90D" {
                    DebitCredit::Debit
                } else {
                    DebitCredit::Credit
                };
                let count = match tag.optional("number") {
                    Some(number) => number.parse().map_err(|_| Mt940Error::TagDidNotMatch {
                        tag_id: tag.tag_id().to_string(),
                        raw: number.to_string(),
                    })?,
                    None => 0,
                };
                let summary = EntrySummary {
                    status,
                    count,
                    currency: tag.field("currency").to_string(),
                    amount: amount(tag)?.signed(status),
                };
                match status {
                    DebitCredit::Debit => self.debit_entries = Some(summary),
                    _ => self.credit_entries = Some(summary),
                }
            }
            "NS" => {
                self.non_swift.extend(tag.records().iter().map(|record| NonSwiftRecord {
                    id: record.get("ns_id").cloned().unwrap_or_default(),
                    data: record.get("ns_data").cloned().unwrap_or_default(),
                }));
                append_line(&mut self.non_swift_text, tag.field("non_swift"));
            }
            _ => return Ok(false),
        }

        trace!("tag {} applied to statement", tag.tag_id());
        Ok(true)
    }
}
