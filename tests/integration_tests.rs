//! Integration tests for mt940-core

use chrono::NaiveDate;
use mt940_core::{
    parse, tags::catalog, BalanceRole, DebitCredit, ErrorKind, Mt940Error, Mt940Parser,
    ParserOptions, Transactions,
};

const TWO_TRANSACTIONS: &str = ":20:REF1
:61:2001020102D12,50NTRFNONREF
:86:details1
:20:REF2
:61:2001030103C100,00NTRFINVOICE 42//B123
:86:details2
";

const BANK_STATEMENT: &str = "\r
:20:STARTUMS\r
:25:NL08DEUT0319809633EUR\r
:28C:3/00001\r
:60F:C230306DKK985623,04\r
:61:2303060306DK366336,2NTRFArbi/deposit//1323333800\r
:86:/RREF/3825-0031367289 /EREF/1309101116-0000001\r
/ORDP//NAME/AB AG/REMI/Inv. 1000217666\r
:32:0001 looks like a tag but is part of the text\r
:77B:so is this line\r
:62F:C230306DKK619286,84\r
:64:C230306DKK619286,84\r
-\r
:20:STARTUMS2\r
:60F:C230306DKK619286,84\r
:61:2303070307C1000,NTRFNONREF\r
:86:Deposit\r
:62F:C230307DKK620286,84\r
-\r
";

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_two_transaction_statement() {
    let statement = parse(TWO_TRANSACTIONS).unwrap();

    assert_eq!(statement.len(), 2);
    let first = &statement.transactions[0];
    let second = &statement.transactions[1];

    assert_eq!(first.transaction_reference, "REF1");
    assert_eq!(first.details.as_deref(), Some("details1"));
    assert_eq!(first.amount().unwrap().minor_units, -1250);

    assert_eq!(second.transaction_reference, "REF2");
    assert_eq!(second.details.as_deref(), Some("details2"));
    let line = second.statement_line.as_ref().unwrap();
    assert_eq!(line.amount.minor_units, 10000);
    assert_eq!(line.status, DebitCredit::Credit);
    assert_eq!(line.customer_reference.as_deref(), Some("INVOICE 42"));
    assert_eq!(line.bank_reference.as_deref(), Some("B123"));
}

#[test]
fn test_full_statement() {
    let statement = parse(BANK_STATEMENT).unwrap();

    assert_eq!(
        statement.account_identification.as_deref(),
        Some("NL08DEUT0319809633EUR")
    );
    assert_eq!(statement.statement_number.as_deref(), Some("3"));
    assert_eq!(statement.sequence_number.as_deref(), Some("00001"));
    assert_eq!(statement.currency(), Some("DKK"));
    assert_eq!(statement.len(), 2);

    let first = &statement.transactions[0];
    assert_eq!(first.transaction_reference, "STARTUMS");

    let opening = first.final_opening_balance.as_ref().unwrap();
    assert_eq!(opening.role, BalanceRole::FinalOpening);
    assert_eq!(opening.amount.minor_units, 98562304);
    assert_eq!(opening.date, ymd(2023, 3, 6));

    let line = first.statement_line.as_ref().unwrap();
    assert_eq!(line.value_date, ymd(2023, 3, 6));
    assert_eq!(line.entry_date, Some(ymd(2023, 3, 6)));
    assert_eq!(line.funds_code.as_deref(), Some("K"));
    assert_eq!(line.amount.minor_units, -36633620);
    assert_eq!(line.id.as_deref(), Some("NTRF"));

    assert_eq!(
        first.details.as_deref(),
        Some(
            "/RREF/3825-0031367289 /EREF/1309101116-0000001\n\
             /ORDP//NAME/AB AG/REMI/Inv. 1000217666\n\
             :32:0001 looks like a tag but is part of the text\n\
             :77B:so is this line"
        )
    );
    assert_eq!(
        first.available_balance.as_ref().unwrap().amount.minor_units,
        61928684
    );

    let second = &statement.transactions[1];
    assert_eq!(second.transaction_reference, "STARTUMS2");
    assert_eq!(second.amount().unwrap().minor_units, 100000);
    assert_eq!(second.details.as_deref(), Some("Deposit"));
}

#[test]
fn test_marker_like_details_do_not_create_transactions() {
    let text = ":20:REF1
:61:2001020102D12,50NTRFNONREF
:86:payment for order
:21:RELATED1
:20:REF2
:61:2001030103C1,00NTRFNONREF
:86:transfer
:45:not a tag, part of the text, see :20:XYZ
:99:also part of the text
";
    let statement = parse(text).unwrap();
    let real_references = text.lines().filter(|l| l.starts_with(":20:")).count();
    assert_eq!(statement.len(), real_references);
    assert_eq!(
        statement.transactions[0].related_reference.as_deref(),
        Some("RELATED1")
    );
    assert_eq!(
        statement.transactions[1].details.as_deref(),
        Some("transfer\n:45:not a tag, part of the text, see :20:XYZ\n:99:also part of the text")
    );
}

#[test]
fn test_unknown_tag_is_an_error() {
    let err = parse(":20:REF1\n:99:x\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownTag);
    assert_eq!(err.tag_id(), Some("99"));
}

#[test]
fn test_no_tags() {
    let err = parse("\n-\nnothing here\n").unwrap_err();
    assert_eq!(err, Mt940Error::NoTagsFound);
}

#[test]
fn test_malformed_amount_aborts_parse() {
    let err = parse(":20:REF1\n:60F:C180220GBP1,234\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAmount);
    assert_eq!(err.tag_id(), Some("60F"));
    assert_eq!(err.raw(), Some("1,234"));
}

#[test]
fn test_pattern_mismatch_aborts_parse() {
    let err = parse(":20:REF1\n:61:not a statement line\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagDidNotMatch);
    assert_eq!(err.tag_id(), Some("61"));
}

#[test]
fn test_tag_before_any_reference_does_not_apply() {
    let err = parse(":61:2001020102D12,50NTRFNONREF\n:20:REF1\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagDoesNotApply);
    assert_eq!(err.tag_id(), Some("61"));
}

#[test]
fn test_entry_date_around_new_year() {
    let statement = parse(
        ":20:REF1\n:61:2012310101C1,00NTRFNONREF\n:20:REF2\n:61:2101011231D1,00NTRFNONREF\n",
    )
    .unwrap();

    let forward = statement.transactions[0].statement_line.as_ref().unwrap();
    assert_eq!(forward.value_date, ymd(2020, 12, 31));
    assert_eq!(forward.entry_date, Some(ymd(2021, 1, 1)));

    let backward = statement.transactions[1].statement_line.as_ref().unwrap();
    assert_eq!(backward.value_date, ymd(2021, 1, 1));
    assert_eq!(backward.entry_date, Some(ymd(2020, 12, 31)));
}

#[test]
fn test_statement_envelope_extras() {
    let statement = parse(
        ":13D:2303061405+0100
:20:REF1
:34F:EURD10,
:34F:EURC20,
:61:2303060306C5,00NTRFNONREF
:90D:0EUR0,
:90C:1EUR5,00
:NS:22Company name
23Main street 1
",
    )
    .unwrap();

    assert_eq!(
        statement.date_time_indication.as_ref().unwrap().offset.as_deref(),
        Some("+0100")
    );
    assert_eq!(
        statement.debit_floor_limit.as_ref().unwrap().amount.minor_units,
        1000
    );
    assert_eq!(
        statement.credit_floor_limit.as_ref().unwrap().amount.minor_units,
        2000
    );
    assert_eq!(statement.debit_entries.as_ref().unwrap().count, 0);
    assert_eq!(statement.credit_entries.as_ref().unwrap().amount.minor_units, 500);
    assert_eq!(statement.non_swift.len(), 2);
    assert_eq!(
        statement.non_swift_text.as_deref(),
        Some("22Company name\n23Main street 1")
    );
    assert_eq!(statement.currency(), Some("EUR"));
}

#[test]
fn test_parser_is_reusable() {
    let parser = Mt940Parser::new();
    let first = parser.parse(TWO_TRANSACTIONS).unwrap();
    let second = parser.parse(TWO_TRANSACTIONS).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_custom_entry_date_window() {
    let parser = Mt940Parser::with_options(ParserOptions::default().entry_date_window_days(400));
    let statement = parser
        .parse(":20:REF1\n:61:2012310101C1,00NTRFNONREF\n")
        .unwrap();
    let line = statement.transactions[0].statement_line.as_ref().unwrap();
    assert_eq!(line.entry_date, Some(ymd(2020, 1, 1)));
}

#[test]
fn test_result_serializes() {
    let statement = parse(TWO_TRANSACTIONS).unwrap();
    let json = serde_json::to_string(&statement).unwrap();
    let back: Transactions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, statement);
}

#[test]
fn test_catalog_examples_all_match() {
    for tag in catalog::tags() {
        for example in tag.examples {
            let (tag_id, _) = mt940_core::tags::split_marker(example).unwrap();
            let result = mt940_core::match_tag(tag_id, example).unwrap();
            for name in tag.group_names() {
                assert!(result.get(name).is_some(), "{} lacks {}", tag.id, name);
            }
        }
    }
}

#[test]
fn test_every_balance_tag_lands_in_its_slot() {
    let statement = parse(
        ":20:REF1
:60:C230301EUR1,00
:60F:C230301EUR2,00
:60M:D230301EUR3,00
:61:2303010301C1,00NTRFNONREF
:62:C230301EUR4,00
:62F:C230301EUR5,00
:62M:D230301EUR6,00
:64:C230301EUR7,00
:65:C230302EUR8,00
",
    )
    .unwrap();
    let transaction = &statement.transactions[0];

    let slots = [
        (&transaction.opening_balance, BalanceRole::Opening, 100),
        (&transaction.final_opening_balance, BalanceRole::FinalOpening, 200),
        (&transaction.intermediate_opening_balance, BalanceRole::IntermediateOpening, -300),
        (&transaction.closing_balance, BalanceRole::Closing, 400),
        (&transaction.final_closing_balance, BalanceRole::FinalClosing, 500),
        (&transaction.intermediate_closing_balance, BalanceRole::IntermediateClosing, -600),
        (&transaction.available_balance, BalanceRole::Available, 700),
        (&transaction.forward_available_balance, BalanceRole::ForwardAvailable, 800),
    ];
    for (slot, role, minor_units) in slots {
        let balance = slot.as_ref().unwrap_or_else(|| panic!("{role:?} missing"));
        assert_eq!(balance.role, role);
        assert_eq!(balance.amount.minor_units, minor_units, "{role:?}");
        assert_eq!(balance.currency, "EUR");
    }
    assert_eq!(transaction.balances().count(), 8);
    assert_eq!(
        transaction.forward_available_balance.as_ref().unwrap().date,
        ymd(2023, 3, 2)
    );
}

#[test]
fn test_text_before_first_tag_aborts_parse() {
    let err = parse("GARBAGE HEADER LINE\n:20:REF1\n:86:x\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedTag);
    assert_eq!(err.raw(), Some("GARBAGE HEADER LINE"));

    let statement = parse("\n-\n:20:REF1\n:86:x\n").unwrap();
    assert_eq!(statement.len(), 1);
}

#[test]
fn test_non_swift_single_line_is_kept() {
    let statement = parse(":20:REF1\n:NS:single line\n").unwrap();
    assert!(statement.non_swift.is_empty());
    assert_eq!(statement.non_swift_text.as_deref(), Some("single line"));
}

#[test]
fn test_customer_reference_length_is_enforced() {
    let statement = parse(":20:REF1\n:61:2001020102D12,50NTRFA/B/C//BANK/1\n").unwrap();
    let line = statement.transactions[0].statement_line.as_ref().unwrap();
    assert_eq!(line.customer_reference.as_deref(), Some("A/B/C"));
    assert_eq!(line.bank_reference.as_deref(), Some("BANK/1"));

    let err = parse(":20:REF1\n:61:2001020102D12,50NTRFA/B/C/D/E/F/G/H/I/J/K/L/M/N/O/P/\n")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagDidNotMatch);
    assert_eq!(err.tag_id(), Some("61"));
}
