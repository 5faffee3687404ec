//! Catalog of the MT940 field tags understood by the parser

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// A field tag of the MT940 format
///
/// The pattern declares a named group for every field the tag can carry and
/// is always matched against the whole marker-stripped payload.
#[derive(Clone)]
pub struct Tag {
    /// Tag id as it appears between the colons, e.g. `61` or `28C`
    pub id: &'static str,
    /// Descriptive name of the field
    pub name: &'static str,
    pattern: Regex,
    sub_pattern: Option<Regex>,
    /// Sample tag lines, marker included, used to verify the pattern
    pub examples: &'static [&'static str],
}

impl Tag {
    fn new(
        id: &'static str,
        name: &'static str,
        pattern: &Regex,
        examples: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            name,
            pattern: pattern.clone(),
            sub_pattern: None,
            examples,
        }
    }

    fn with_sub_pattern(mut self, sub_pattern: &Regex) -> Self {
        self.sub_pattern = Some(sub_pattern.clone());
        self
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Pattern applied to each payload line, for tags made of sub-records
    pub fn sub_pattern(&self) -> Option<&Regex> {
        self.sub_pattern.as_ref()
    }

    /// Names of the groups declared by the pattern
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.pattern.capture_names().flatten()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("tag patterns are valid")
}

static BALANCE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"^(?P<status>[DC])(?P<year>[0-9]{2})(?P<month>[0-9]{2})(?P<day>[0-9]{2})(?P<currency>.{3})(?P<amount>[0-9,]{0,16})$",
    )
});

static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"^(?P<year>[0-9]{2})(?P<month>[0-9]{2})(?P<day>[0-9]{2})(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})(?P<offset>[+-][0-9]{4})?$",
    )
});

static STATEMENT_NUMBER: Lazy<Regex> = Lazy::new(|| {
    compile(r"^(?P<statement_number>[0-9]{1,5})(?:/?(?P<sequence_number>[0-9]{1,5}))?$")
});

static FLOOR_LIMIT: Lazy<Regex> = Lazy::new(|| {
    compile(r"^(?P<currency>[A-Z]{3})(?P<status>[DC]?)(?P<amount>[0-9,]{0,16})$")
});

// value date, entry date, mark, funds code, amount, type code, customer
// reference, bank reference after the first `//`, supplementary details on
// the next line. The customer reference is lazy so it stops at that `//`.
static STATEMENT_LINE: Lazy<Regex> = Lazy::new(|| {
    compile(concat!(
        r"^(?P<year>[0-9]{2})(?P<month>[0-9]{2})(?P<day>[0-9]{2})",
        r"(?:(?P<entry_month>[0-9]{2})(?P<entry_day>[0-9]{2}))?",
        r"(?P<status>R?[DC])",
        r"(?:(?P<funds_code>[A-Z])[\n ]?)?",
        r"(?P<amount>[0-9,]{1,15})",
        r"(?P<id>[A-Z][A-Z0-9 ]{3})?",
        r"(?P<customer_reference>[^\n]{0,16}?)",
        r"(?://(?P<bank_reference>[^\n]{0,16}))?",
        r"(?:\n(?P<extra_details>[^\n]{0,34}))?$",
    ))
});

static SUM_ENTRIES: Lazy<Regex> = Lazy::new(|| {
    compile(r"^(?P<number>[0-9]{0,5})(?P<currency>[A-Z]{3})(?P<amount>[0-9,]{1,15})$")
});

static NON_SWIFT: Lazy<Regex> = Lazy::new(|| compile(r"(?s)^(?P<non_swift>.*)$"));

static NON_SWIFT_RECORD: Lazy<Regex> =
    Lazy::new(|| compile(r"^(?P<ns_id>[0-9]{2})(?P<ns_data>.*)$"));

static TAGS: Lazy<HashMap<&'static str, Tag>> = Lazy::new(|| {
    let tags = vec![
        Tag::new(
            "13",
            "DateTimeIndication",
            &DATE_TIME,
            &[":13:1303061405"],
        ),
        Tag::new(
            "13D",
            "DateTimeIndication",
            &DATE_TIME,
            &[":13D:1303061405+0100", ":13D:2012311159-0500"],
        ),
        Tag::new(
            "20",
            "TransactionReferenceNumber",
            &compile(r"^(?P<transaction_reference>.{0,16})$"),
            &[":20:0000000030210056", ":20:STARTUMS"],
        ),
        Tag::new(
            "21",
            "RelatedReference",
            &compile(r"^(?P<related_reference>.{0,16})$"),
            &[":21:NONREF"],
        ),
        Tag::new(
            "25",
            "AccountIdentification",
            &compile(r"^(?P<account_identification>.{0,35})$"),
            &[
                ":25:0123456789",
                ":25:NL08DEUT0319809633EUR",
                ":25:DK0230003617012345",
                ":25:FI0281199710012345",
                ":25:GB02DABA30128122012345",
                ":25:IE02DABA95182390012345",
                ":25:NO0281013312345",
                ":25:PL02236000050000004550212345",
                ":25:SE031200000001220012345",
                ":25:FI0734499400012345",
                ":25:81199710012345",
            ],
        ),
        Tag::new("28", "StatementNumber", &STATEMENT_NUMBER, &[":28:00012"]),
        Tag::new(
            "28C",
            "StatementNumber",
            &STATEMENT_NUMBER,
            &[":28C:3/00001", ":28C:355/00001", ":28C:5/1", ":28C:00532/001"],
        ),
        Tag::new(
            "34",
            "FloorLimitIndicator",
            &FLOOR_LIMIT,
            &[":34:EUR0,"],
        ),
        Tag::new(
            "34F",
            "FloorLimitIndicator",
            &FLOOR_LIMIT,
            &[":34F:EURD100,", ":34F:CHF0,00"],
        ),
        Tag::new(
            "60",
            "OpeningBalance",
            &BALANCE,
            &[":60:C111111EUR960", ":60:C111118EUR5480,16"],
        ),
        Tag::new(
            "60F",
            "FinalOpeningBalance",
            &BALANCE,
            &[":60F:C180220GBP16,00", ":60F:C230306DKK985623,04"],
        ),
        Tag::new(
            "60M",
            "IntermediateOpeningBalance",
            &BALANCE,
            &[":60M:D230301DKK1200,50"],
        ),
        Tag::new(
            "61",
            "StatementLine",
            &STATEMENT_LINE,
            &[
                ":61:1112021202D43,6N477NONREF",
                ":61:2303010228CK366336,2NTRFArbi/deposit//1323333800",
                ":61:1801220122C500,00NTRFNONREF//0000123\nSupplementary text",
                ":61:2012310101RC12,NCHK",
            ],
        ),
        Tag::new(
            "62",
            "ClosingBalance",
            &BALANCE,
            &[":62:C111111EUR960"],
        ),
        Tag::new(
            "62F",
            "FinalClosingBalance",
            &BALANCE,
            &[":62F:C230228DKK12724930,14"],
        ),
        Tag::new(
            "62M",
            "IntermediateClosingBalance",
            &BALANCE,
            &[":62M:C230228DKK12724930,14"],
        ),
        Tag::new(
            "64",
            "AvailableBalance",
            &BALANCE,
            &[":64:C230228DKK6698733,27", ":64:C180220GBP16,00"],
        ),
        Tag::new(
            "65",
            "ForwardAvailableBalance",
            &BALANCE,
            &[":65:C230301DKK6698733,27"],
        ),
        Tag::new(
            "86",
            "InformationToAccountOwner",
            &compile(r"(?s)^(?P<transaction_details>.*)$"),
            &[
                ":86:/RREF/3825-0031367289 /EREF/1309101116-0000001 /ORDP//NAME/AB AG/REMI/Inv. 1000217666 - 22.724,00, Inv. 1000217693 - 68.130,00,inv. 1000217801 - 16.470,00 /RCMT/EUR 100.000,00 /CHRG/DKK 4,00",
                ":86:Salary October\nEmployer Ltd",
            ],
        ),
        Tag::new(
            "90D",
            "SumDebitEntries",
            &SUM_ENTRIES,
            &[":90D:72EUR12345,67"],
        ),
        Tag::new(
            "90C",
            "SumCreditEntries",
            &SUM_ENTRIES,
            &[":90C:3EUR500,"],
        ),
        Tag::new(
            "NS",
            "NonSwift",
            &NON_SWIFT,
            &[":NS:22Company name\n23Main street 1", ":NS:single line"],
        )
        .with_sub_pattern(&NON_SWIFT_RECORD),
    ];

    tags.into_iter().map(|tag| (tag.id, tag)).collect()
});

/// Look up a tag by its exact id
pub fn get(id: &str) -> Option<&'static Tag> {
    TAGS.get(id)
}

/// Look up a tag by id, falling back to its two-character base id
///
/// `13D` resolves to the `13D` entry when there is one and to `13` otherwise.
pub fn lookup(id: &str) -> Option<&'static Tag> {
    get(id).or_else(|| id.get(..2).and_then(get))
}

/// Whether the id resolves to a catalog entry
pub fn is_known(id: &str) -> bool {
    lookup(id).is_some()
}

/// All tags of the catalog, in no particular order
pub fn tags() -> impl Iterator<Item = &'static Tag> {
    TAGS.values()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_match_keys() {
        for (id, tag) in TAGS.iter() {
            assert_eq!(*id, tag.id);
        }
    }

    #[test]
    fn test_lookup_falls_back_to_base_id() {
        assert_eq!(lookup("60F").map(|t| t.id), Some("60F"));
        assert_eq!(lookup("62X").map(|t| t.id), Some("62"));
        assert_eq!(lookup("NSX").map(|t| t.id), Some("NS"));
        assert!(lookup("99").is_none());
        assert!(lookup("32B").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_balance_tags_share_groups() {
        let expected: Vec<&str> = get("60F").unwrap().group_names().collect();
        for id in ["60", "60M", "62", "62F", "62M", "64", "65"] {
            let names: Vec<&str> = get(id).unwrap().group_names().collect();
            assert_eq!(names, expected, "{id}");
        }
    }

    #[test]
    fn test_statement_line_group_order() {
        let names: Vec<&str> = get("61").unwrap().group_names().collect();
        assert_eq!(
            names,
            vec![
                "year",
                "month",
                "day",
                "entry_month",
                "entry_day",
                "status",
                "funds_code",
                "amount",
                "id",
                "customer_reference",
                "bank_reference",
                "extra_details",
            ]
        );
    }

    #[test]
    fn test_only_non_swift_has_sub_pattern() {
        for tag in tags() {
            assert_eq!(tag.sub_pattern().is_some(), tag.id == "NS", "{}", tag.id);
        }
    }
}
