// tests/cli_tests.rs

#![cfg(feature = "cli")]

use flux_syntax::cli::{execute_parse, execute_tokens, load_script, CliError, ParseCommandOptions};
use pretty_assertions::assert_eq;
use std::fs;

fn parse_options(script: &str) -> ParseCommandOptions {
    ParseCommandOptions {
        script: script.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_parse_prints_json() {
    let json = execute_parse(&parse_options("a / 2")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "body": [{
                "type": "ExpressionStatement",
                "expression": {
                    "type": "BinaryExpression",
                    "operator": "/",
                    "left": {"type": "Identifier", "name": "a"},
                    "right": {"type": "IntegerLiteral", "value": 2}
                }
            }]
        })
    );
}

#[test]
fn test_pretty_output_spans_lines() {
    let options = ParseCommandOptions {
        pretty: true,
        ..parse_options("x = 1")
    };
    let json = execute_parse(&options).unwrap();
    assert!(json.lines().count() > 1);
    assert!(json.starts_with("{\n  \"body\""));
}

#[test]
fn test_parse_errors_are_rendered() {
    let test_cases = vec![
        ("a = )", false, vec!["1:5: expected expression, found ')'"]),
        (
            "a = )\nb = ]",
            true,
            vec![
                "1:5: expected expression, found ')'",
                "2:5: expected expression, found ']'",
            ],
        ),
        ("a = )\nb = ]", false, vec!["1:5: expected expression, found ')'"]),
    ];

    for (script, recover, expected) in test_cases {
        let options = ParseCommandOptions {
            recover,
            ..parse_options(script)
        };
        match execute_parse(&options) {
            Err(CliError::Parse(lines)) => assert_eq!(lines, expected, "Failed for: {:?}", script),
            other => panic!("expected parse errors for {script:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_parse_error_display_is_one_line_per_error() {
    let options = ParseCommandOptions {
        recover: true,
        ..parse_options("a = )\nb = ]")
    };
    let err = execute_parse(&options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "1:5: expected expression, found ')'\n2:5: expected expression, found ']'"
    );
}

#[test]
fn test_tokens_dump() {
    let lines = execute_tokens("from(bucket: \"b\") // src\n  |> count()");
    assert_eq!(
        lines,
        vec![
            r#"1:1 Ident "from""#,
            r#"1:5 LParen "(""#,
            r#"1:6 Ident "bucket""#,
            r#"1:12 Colon ":""#,
            r#"1:14 String "\"b\"""#,
            r#"1:17 RParen ")""#,
            r#"1:19 Comment "// src""#,
            r#"2:3 PipeForward "|>""#,
            r#"2:6 Ident "count""#,
            r#"2:11 LParen "(""#,
            r#"2:12 RParen ")""#,
            r#"2:13 Eof """#,
        ]
    );
}

#[test]
fn test_load_script() {
    assert_eq!(load_script("a = 1").unwrap(), "a = 1");

    let path = std::env::temp_dir().join(format!("flux-cli-{}.flux", std::process::id()));
    fs::write(&path, "b = 2\n").unwrap();
    let loaded = load_script(&format!("@{}", path.display())).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(loaded, "b = 2\n");

    let missing = load_script("@/definitely/not/here.flux").unwrap_err();
    assert!(matches!(missing, CliError::ReadScript { .. }));
    assert!(missing.to_string().starts_with("failed to read /definitely/not/here.flux"));
}
