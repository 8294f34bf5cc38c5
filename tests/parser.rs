use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;
use std::fs;

use bytesize::ByteSize;
use lax_json::decoders::Encoding;
use lax_json::errors::{Details, Stage};
use lax_json::parser::DEFAULT_MAX_DEPTH;
use lax_json::{parse, parse_bytes, JsonValue};

macro_rules! relative_dir {
    ($d : expr) => {{
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join($d)
    }};
}

fn num(value: f64) -> JsonValue<'static> {
    JsonValue::Number(value)
}

fn id(text: &'static str) -> JsonValue<'static> {
    JsonValue::Identifier(Cow::Borrowed(text))
}

fn string(text: &'static str) -> JsonValue<'static> {
    JsonValue::String(Cow::Borrowed(text))
}

fn object(members: Vec<(&'static str, JsonValue<'static>)>) -> JsonValue<'static> {
    JsonValue::Object(
        members
            .into_iter()
            .map(|(k, v)| (Cow::Borrowed(k), v))
            .collect::<HashMap<_, _>>(),
    )
}

#[test]
fn should_parse_flat_objects() {
    let parsed = parse(r#"{name: "lax", "count": 12, kind: $special, neg: -3}"#).unwrap();
    assert_eq!(
        parsed,
        object(vec![
            ("name", string("lax")),
            ("count", num(12.0)),
            ("kind", id("$special")),
            ("neg", num(-3.0)),
        ])
    );
}

#[test]
fn should_parse_flat_arrays() {
    let parsed = parse(r#"[1, "two", three]"#).unwrap();
    assert_eq!(
        parsed,
        JsonValue::Array(vec![num(1.0), string("two"), id("three")])
    );
}

#[test]
fn should_parse_empty_containers() {
    assert_eq!(parse("{}").unwrap(), object(vec![]));
    assert_eq!(parse("[]").unwrap(), JsonValue::Array(vec![]));
    assert_eq!(parse(" \n{ \t}\r\n").unwrap(), object(vec![]));
}

#[test]
fn should_parse_nested_objects() {
    let parsed = parse("{a:{b:1}}").unwrap();
    assert_eq!(parsed, object(vec![("a", object(vec![("b", num(1.0))]))]));
}

#[test]
fn should_parse_nested_arrays() {
    let parsed = parse("[1,[2,3],4]").unwrap();
    assert_eq!(
        parsed,
        JsonValue::Array(vec![
            num(1.0),
            JsonValue::Array(vec![num(2.0), num(3.0)]),
            num(4.0)
        ])
    );
}

#[test]
fn should_resume_objects_after_nested_values() {
    let parsed = parse("{a: {b: [1, {c: 2}]}, d: [], e: x}").unwrap();
    assert_eq!(
        parsed,
        object(vec![
            (
                "a",
                object(vec![(
                    "b",
                    JsonValue::Array(vec![num(1.0), object(vec![("c", num(2.0))])])
                )])
            ),
            ("d", JsonValue::Array(vec![])),
            ("e", id("x")),
        ])
    );
}

#[test]
fn should_be_insensitive_to_whitespace() {
    let pieces = [
        "{", "a", ":", "[", "1", ",", "\"s p\"", ",", "{", "b", ":", "c", "}", "]", ",", "d",
        ":", "-2", "}",
    ];
    let compact = pieces.concat();
    let expected = parse(&compact).unwrap();
    for separator in [" ", "\t", "\n", "\r\n", " \t\n\r ", "\n\n\n"] {
        let spaced = format!("{}{}{}", separator, pieces.join(separator), separator);
        assert_eq!(parse(&spaced).unwrap(), expected, "separator {:?}", separator);
    }
}

#[test]
fn should_decode_string_escapes_in_values() {
    let parsed = parse(r#"{s: "a\nb", t: "q\"uote"}"#).unwrap();
    assert_eq!(parsed.get("s").and_then(|s| s.as_str()), Some("a\nb"));
    assert_eq!(parsed.get("t").and_then(|s| s.as_str()), Some("q\"uote"));
}

#[test]
fn should_let_the_last_duplicate_key_win() {
    let parsed = parse(r#"{a: 1, "a": 2, b: 3, a: last}"#).unwrap();
    assert_eq!(parsed.as_object().map(|o| o.len()), Some(2));
    assert_eq!(parsed.get("a"), Some(&id("last")));
}

#[test]
fn should_tolerate_mechanical_separators() {
    let parsed = parse("{a: 1 b: [,1,,2,], c: 3,}").unwrap();
    assert_eq!(
        parsed,
        object(vec![
            ("a", num(1.0)),
            ("b", JsonValue::Array(vec![num(1.0), num(2.0)])),
            ("c", num(3.0)),
        ])
    );
}

#[test]
fn should_fail_on_missing_values_and_colons() {
    let err = parse("{a:}").unwrap_err();
    assert!(err.is_parser_error());
    assert_eq!(err.details, Details::UnexpectedToken("}".to_string()));

    let err = parse("{a 1}").unwrap_err();
    assert!(err.is_parser_error());
    assert_eq!(err.details, Details::PairExpected("1".to_string()));
}

#[test]
fn should_fail_on_unrecognised_characters() {
    let err = parse("#").unwrap_err();
    assert!(err.is_lexer_error());
    assert_eq!(err.details, Details::InvalidCharacter('#'));
    assert_eq!(err.coords.unwrap().absolute, 0);
}

#[test]
fn should_fail_on_unknown_escapes() {
    let err = parse(r#"["\q"]"#).unwrap_err();
    assert!(err.is_lexer_error());
    assert_eq!(err.details, Details::InvalidEscapeSequence('q'));
}

#[test]
fn should_fail_on_fractional_numbers() {
    let err = parse("[3.14]").unwrap_err();
    assert!(err.is_lexer_error());
    assert_eq!(err.details, Details::InvalidCharacter('.'));
    assert_eq!(err.coords.unwrap().absolute, 2);
}

#[test]
fn should_fail_on_unterminated_input() {
    assert_eq!(
        parse("{a: 1,").unwrap_err().details,
        Details::UnterminatedObject
    );
    assert_eq!(parse("{a").unwrap_err().details, Details::UnterminatedObject);
    assert_eq!(parse("{a:").unwrap_err().details, Details::UnterminatedObject);
    assert_eq!(parse("[1, [2").unwrap_err().details, Details::UnterminatedArray);
    assert_eq!(
        parse(r#"{a: "open"#).unwrap_err().details,
        Details::UnterminatedString
    );
}

#[test]
fn should_report_errors_with_context() {
    let err = parse("{\n  a: ]\n}").unwrap_err();
    let coords = err.coords.unwrap();
    assert_eq!((coords.line, coords.column), (2, 6));
    assert_eq!(
        err.to_string(),
        "parser error at [abs: 7, line: 2, column: 6]: unexpected token: ]"
    );
}

#[test]
fn should_parse_byte_input() {
    let parsed = parse_bytes("[\"ünïcödé\", ok]".as_bytes(), Encoding::Utf8).unwrap();
    assert_eq!(
        parsed,
        JsonValue::Array(vec![string("ünïcödé"), id("ok")])
    );
}

#[test]
fn should_reject_undecodable_bytes() {
    for (bytes, encoding) in [
        (&b"[\"\xe9\"]"[..], Encoding::Ascii),
        (&b"[\"\xff\"]"[..], Encoding::Utf8),
    ] {
        let err = parse_bytes(bytes, encoding).unwrap_err();
        assert_eq!(err.stage, Stage::Decoder);
        assert_eq!(err.details, Details::InvalidEncodedInput);
    }
}

#[test]
fn should_fail_cleanly_on_very_deep_nesting() {
    let source = format!("{}{}", "[".repeat(20_000), "]".repeat(20_000));
    let err = parse(&source).unwrap_err();
    assert!(err.is_parser_error());
    assert_eq!(err.details, Details::MaxDepthExceeded(DEFAULT_MAX_DEPTH));

    let source = "{a: ".repeat(20_000);
    assert_eq!(
        parse(&source).unwrap_err().details,
        Details::MaxDepthExceeded(DEFAULT_MAX_DEPTH)
    );
}

#[test]
fn should_accept_nesting_up_to_the_default_limit() {
    let source = format!(
        "{}{}",
        "[".repeat(DEFAULT_MAX_DEPTH),
        "]".repeat(DEFAULT_MAX_DEPTH)
    );
    assert!(parse(&source).is_ok());
}

#[test]
fn should_report_bad_tokens_ahead_of_later_bad_characters() {
    let err = parse("{1 #}").unwrap_err();
    assert!(err.is_parser_error());
    assert_eq!(err.details, Details::UnexpectedToken("1".to_string()));
    assert_eq!(err.coords.unwrap().absolute, 1);

    let err = parse("{a: , #}").unwrap_err();
    assert!(err.is_parser_error());
    assert_eq!(err.details, Details::UnexpectedToken(",".to_string()));
    assert_eq!(err.coords.unwrap().absolute, 4);
}

#[test]
fn should_parse_basic_test_files() {
    for f in fs::read_dir(relative_dir!("tests/fixtures/valid")).unwrap() {
        let path = f.unwrap().path();
        if path.is_file() {
            let source = fs::read_to_string(&path).unwrap();
            let start = Instant::now();
            let parsed = parse(&source);
            if parsed.is_err() {
                println!("Parse of {:?} failed with errors: {:?}", &path, &parsed);
            }
            assert!(parsed.is_ok());
            println!(
                "Parsed {} in {:?} [{:?}]",
                ByteSize(source.len() as u64),
                start.elapsed(),
                path,
            );
        }
    }
}

#[test]
fn should_successfully_bail() {
    for f in fs::read_dir(relative_dir!("tests/fixtures/invalid")).unwrap() {
        let path = f.unwrap().path();
        if path.is_file() {
            let source = fs::read_to_string(&path).unwrap();
            let parsed = parse(&source);
            println!("Parse result for {:?} = {:?}", &path, parsed);
            assert!(parsed.is_err());
        }
    }
}

#[test]
fn should_parse_the_config_fixture() {
    let source = fs::read_to_string(relative_dir!("tests/fixtures/valid/config.lax")).unwrap();
    let parsed = parse(&source).unwrap();
    assert_eq!(parsed.get("enabled"), Some(&id("true")));
    assert_eq!(parsed.get("$schema"), Some(&string("urn:lax:config")));
    let owner = parsed.get("owner").unwrap();
    assert_eq!(owner.get("display name"), Some(&string("J. Coombes")));
    assert_eq!(
        owner.get("teams"),
        Some(&JsonValue::Array(vec![id("core"), id("parsers")]))
    );
    assert_eq!(
        parsed.get("paths"),
        Some(&JsonValue::Array(vec![
            string("C:\\tmp"),
            string("/usr/local"),
            string("tab\tseparated")
        ]))
    );
    assert_eq!(
        parsed.get("limits").and_then(|l| l.get("width")),
        Some(&num(-1.0))
    );
}
