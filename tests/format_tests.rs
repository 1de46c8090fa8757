// Integration tests for the grammar formatter

use ebnftty::format::{format, FormatConfig, NewlineKind, QuoteStyle};
use ebnftty::{parse, parse_document};
use std::fs;
use std::path::Path;

fn read_grammar(name: &str) -> String {
    let path = Path::new("grammars").join(name);
    fs::read_to_string(path).expect("Failed to read sample grammar")
}

fn format_source(source: &str, config: &FormatConfig) -> String {
    let document = parse_document(source).expect("Parsing failed");
    format(&document, source, config)
}

#[test]
fn test_sample_grammars_keep_structure() {
    for name in ["iso14977.ebnf", "arithmetic.ebnf"] {
        let source = read_grammar(name);
        let formatted = format_source(&source, &FormatConfig::default());

        let before = parse(&source).expect("Parsing failed");
        let after = parse(&formatted).expect("Formatted output should parse");
        assert_eq!(before.to_string(), after.to_string(), "structure changed in {}", name);
    }
}

#[test]
fn test_sample_grammars_format_idempotently() {
    let config = FormatConfig::default();
    for name in ["iso14977.ebnf", "arithmetic.ebnf"] {
        let once = format_source(&read_grammar(name), &config);
        let twice = format_source(&once, &config);
        assert_eq!(once, twice, "second pass changed {}", name);
    }
}

#[test]
fn test_comments_survive_formatting() {
    let source = read_grammar("arithmetic.ebnf");
    let formatted = format_source(&source, &FormatConfig::default());

    let before = parse_document(&source).unwrap();
    let after = parse_document(&formatted).unwrap();
    let texts = |document: &ebnftty::ParseResult| {
        let mut texts: Vec<String> = document
            .comments
            .values()
            .flatten()
            .map(|comment| comment.text.trim().to_string())
            .collect();
        texts.sort();
        texts
    };
    assert_eq!(texts(&before), texts(&after));
    assert!(formatted.starts_with("(* Integer arithmetic with the usual precedence *)\n"));
}

#[test]
fn test_arithmetic_layout() {
    let formatted = format_source(&read_grammar("arithmetic.ebnf"), &FormatConfig::default());
    let expected = "\
(* Integer arithmetic with the usual precedence *)
expression = term, { ( '+' | '-' ), term } ;
term       = factor, { ( '*' | '/' ), factor } ;
factor     = [ '-' ], ( number | '(', expression, ')' ) ;

number = digit, { digit } ;
digit  = '0' | '1' | '2' | '3' | '4' | '5' | '6' | '7' | '8' | '9' ;

(* Exactly three digits, and a digit other than zero *)
area_code = 3 * digit ;
nonzero   = digit - '0' ;
";
    assert_eq!(formatted, expected);
}

#[test]
fn test_long_rules_break_at_alternatives() {
    let config = FormatConfig {
        line_width: 40,
        ..FormatConfig::default()
    };
    let formatted = format_source("letter = 'a' | 'b' | 'c' | 'd' | 'e' | 'f' | 'g' ;", &config);
    assert_eq!(
        formatted,
        "letter = 'a'\n       | 'b'\n       | 'c'\n       | 'd'\n       | 'e'\n       | 'f'\n       | 'g' ;\n"
    );
}

#[test]
fn test_quote_and_newline_options() {
    let config = FormatConfig {
        quote_style: QuoteStyle::Double,
        newline: NewlineKind::Windows,
        ..FormatConfig::default()
    };
    let formatted = format_source("q = 'x' | '\"' ;\nr = 'y' ;", &config);
    assert_eq!(formatted, "q = \"x\" | '\"' ;\r\nr = \"y\" ;\r\n");
}

#[test]
fn test_crlf_output_leaves_multiline_literals_alone() {
    let config = FormatConfig {
        newline: NewlineKind::Windows,
        ..FormatConfig::default()
    };
    let source = "r = 'a\nb' | ? x\ny ? ;";
    let formatted = format_source(source, &config);

    assert_eq!(formatted, "r = 'a\nb' | ? x\ny ? ;\r\n");
    assert_eq!(
        parse(&formatted).unwrap().to_string(),
        parse(source).unwrap().to_string()
    );
}
