//! Parse an MT940 statement and print its transactions
//!
//! Usage: `cargo run --example parse_statement [FILE]`
//! Without a file a built-in sample statement is used. Set `RUST_LOG=debug`
//! to see the tokenizer decisions.

use mt940_core::{Mt940Parser, ParserOptions};
use std::fs;

const SAMPLE: &str = ":20:STARTUMS
:25:NL08DEUT0319809633EUR
:28C:3/00001
:60F:C230306EUR1000,00
:61:2303060306D43,60NTRFNONREF//B230306-01
:86:Card payment
Supermarket 0815
:62F:C230306EUR956,40
:20:STARTUMS2
:60F:C230306EUR956,40
:61:2303070307C2500,NTRFSALARY
:86:Salary March
:62F:C230307EUR3456,40
:64:C230307EUR3456,40
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let text = match std::env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };

    let parser = Mt940Parser::with_options(ParserOptions::default());
    let statement = parser.parse(&text)?;

    println!("📄 MT940 Statement\n");
    println!(
        "  Account:   {}",
        statement.account_identification.as_deref().unwrap_or("-")
    );
    println!(
        "  Statement: {}/{}",
        statement.statement_number.as_deref().unwrap_or("-"),
        statement.sequence_number.as_deref().unwrap_or("-")
    );
    println!("  Currency:  {}", statement.currency().unwrap_or("-"));
    println!();

    println!("💳 Transactions ({}):", statement.len());
    for transaction in &statement {
        let Some(line) = &transaction.statement_line else {
            println!("  {:<16} (no statement line)", transaction.transaction_reference);
            continue;
        };

        println!(
            "  {:<16} {} {:>12}  {}",
            transaction.transaction_reference,
            line.value_date,
            line.amount.to_string(),
            transaction
                .details
                .as_deref()
                .unwrap_or("")
                .replace('\n', " ")
        );

        if let Some(balance) = &transaction.final_closing_balance {
            println!("  {:<16} closing {}", "", balance);
        }
    }

    Ok(())
}
